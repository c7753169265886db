//! JWS Flattened JSON Serialization construction, in `jwk` or `kid` form.
use crate::crypto::{KeyPair, b64url};
use crate::error::Result;
use serde_json::json;

/// A signed request body, ready to POST with
/// `Content-Type: application/jose+json`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FlattenedJws {
    pub protected: String,
    pub payload: String,
    pub signature: String,
}

/// Builds and signs a JWS over `payload` (raw JSON, or `&[]` for a
/// POST-as-GET), addressed to `url`, consuming `nonce`.
///
/// Uses the `jwk` form when `kid` is `None`/empty, otherwise the `kid`
/// form — callers are expected to have already checked §4.1 invariant 1
/// (a nonce is present) before calling this.
pub fn sign(
    account_key: &KeyPair,
    kid: Option<&str>,
    nonce: &str,
    url: &str,
    payload: &[u8],
) -> Result<FlattenedJws> {
    let protected = match kid.filter(|k| !k.is_empty()) {
        Some(kid) => json!({
            "alg": "ES256",
            "nonce": nonce,
            "url": url,
            "kid": kid,
        }),
        None => json!({
            "alg": "ES256",
            "nonce": nonce,
            "url": url,
            "jwk": account_key.public_jwk().to_value(),
        }),
    };

    let protected_b64 = b64url(protected.to_string().as_bytes());
    let payload_b64 = if payload.is_empty() {
        String::new()
    } else {
        b64url(payload)
    };

    let signing_input = format!("{protected_b64}.{payload_b64}");
    let signature = account_key.sign(signing_input.as_bytes())?;

    Ok(FlattenedJws {
        protected: protected_b64,
        payload: payload_b64,
        signature: b64url(&signature),
    })
}
