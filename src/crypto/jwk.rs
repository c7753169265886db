//! JSON Web Key representation and RFC 7638 thumbprinting.
use super::encoding::{b64url, sha256};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// The public half of an account or domain key, in JWK form.
///
/// Every key this client generates is ECDSA P-256 (the default produced by
/// `rcgen`'s `aws_lc_rs` backend), so only the EC member set is modeled —
/// there is no RSA/OKP branch to keep in sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,
    pub x: String,
    pub y: String,
}

impl Jwk {
    pub fn ec_p256(x: &[u8], y: &[u8]) -> Self {
        Self {
            kty: "EC".to_string(),
            crv: "P-256".to_string(),
            x: b64url(x),
            y: b64url(y),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("Jwk always serializes")
    }

    /// RFC 7638 thumbprint: base64url(SHA-256(canonical JSON of required
    /// members)). `serde_json::Value`'s default map type is a `BTreeMap`,
    /// so `json!` already emits `crv`, `kty`, `x`, `y` in the lexicographic
    /// order RFC 7638 requires — no manual sorting needed.
    pub fn thumbprint(&self) -> String {
        let canonical = json!({
            "crv": self.crv,
            "kty": self.kty,
            "x": self.x,
            "y": self.y,
        });
        b64url(&sha256(canonical.to_string().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// P4: thumbprinting is deterministic.
    #[test]
    fn thumbprint_is_deterministic() {
        let jwk = Jwk::ec_p256(&[1u8; 32], &[2u8; 32]);
        assert_eq!(jwk.thumbprint(), jwk.thumbprint());
    }

    #[test]
    fn thumbprint_members_are_sorted_lexicographically() {
        let jwk = Jwk::ec_p256(&[1u8; 32], &[2u8; 32]);
        let canonical = json!({
            "crv": jwk.crv,
            "kty": jwk.kty,
            "x": jwk.x,
            "y": jwk.y,
        });
        assert_eq!(
            canonical.to_string(),
            format!(
                r#"{{"crv":"P-256","kty":"EC","x":"{}","y":"{}"}}"#,
                jwk.x, jwk.y
            )
        );
    }

    #[test]
    fn different_keys_have_different_thumbprints() {
        let a = Jwk::ec_p256(&[1u8; 32], &[2u8; 32]);
        let b = Jwk::ec_p256(&[3u8; 32], &[4u8; 32]);
        assert_ne!(a.thumbprint(), b.thumbprint());
    }
}
