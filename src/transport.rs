//! Transport Layer: `fetch` (unsigned GET) and `sign_and_send` (signed
//! POST), both funneled through a blocking `reqwest::Client` since the
//! whole client is single-threaded and strictly sequential (§5).
use crate::crypto::KeyPair;
use crate::error::{AcmeError, Result};
use crate::protocol::jws;
use crate::session::{LastResponse, Session};
use reqwest::blocking::Client;
use std::time::Duration;

const JOSE_CONTENT_TYPE: &str = "application/jose+json";

pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AcmeError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Unsigned GET. Returns the HTTP status code, or 0 on transport
    /// failure. Replaces `session.last_response`.
    pub fn fetch(&self, session: &mut Session, url: &str) -> u16 {
        match self.client.get(url).send() {
            Ok(response) => {
                let status = response.status().as_u16();
                let last_response = to_last_response(response);
                session.record_response(last_response);
                status
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "GET request failed");
                status_zero_response(session);
                0
            }
        }
    }

    /// Signed POST (JWS Flattened JSON Serialization, §4.1). `payload`
    /// is the raw JSON body to sign and send, or `&[]` for POST-as-GET.
    /// Fails immediately — without touching the network — if no nonce
    /// is held.
    pub fn sign_and_send(
        &self,
        session: &mut Session,
        account_key: &KeyPair,
        url: &str,
        payload: &[u8],
    ) -> Result<u16> {
        let nonce = session
            .nonce
            .clone()
            .ok_or_else(|| AcmeError::protocol("need a nonce first"))?;

        let kid = session.kid.clone();
        let jws = jws::sign(account_key, kid.as_deref(), &nonce, url, payload)?;
        let body = serde_json::json!({
            "protected": jws.protected,
            "payload": jws.payload,
            "signature": jws.signature,
        });

        // `.json()` would overwrite our Content-Type with `application/json`,
        // so the body is serialized and attached by hand.
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, JOSE_CONTENT_TYPE)
            .body(body.to_string())
            .send();

        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                let last_response = to_last_response(response);
                session.record_response(last_response);
                Ok(status)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "signed POST failed");
                status_zero_response(session);
                Ok(0)
            }
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new().expect("HTTP client construction should not fail")
    }
}

fn status_zero_response(session: &mut Session) {
    session.last_response = LastResponse::default();
}

fn to_last_response(response: reqwest::blocking::Response) -> LastResponse {
    let status_code = response.status().as_u16();
    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let content_type = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.clone());
    let body = response.text().unwrap_or_default();
    let parsed_json = content_type
        .as_deref()
        .filter(|ct| ct.contains("json"))
        .and_then(|_| serde_json::from_str(&body).ok());

    LastResponse {
        status_code,
        headers,
        body,
        content_type,
        parsed_json,
    }
}
