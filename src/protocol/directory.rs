//! ACME directory document (RFC 8555 §7.1.1).
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Directory {
    #[serde(rename = "newNonce")]
    pub new_nonce: String,
    #[serde(rename = "newAccount")]
    pub new_account: String,
    #[serde(rename = "newOrder")]
    pub new_order: String,
    #[serde(rename = "revokeCert")]
    pub revoke_cert: String,
    #[serde(rename = "keyChange", default)]
    pub key_change: Option<String>,
    #[serde(default)]
    pub meta: Option<DirectoryMeta>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DirectoryMeta {
    #[serde(rename = "termsOfService", default)]
    pub terms_of_service: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(rename = "externalAccountRequired", default)]
    pub external_account_required: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directory_with_meta() {
        let json = r#"{
            "newNonce": "https://example.com/acme/new-nonce",
            "newAccount": "https://example.com/acme/new-account",
            "newOrder": "https://example.com/acme/new-order",
            "revokeCert": "https://example.com/acme/revoke-cert",
            "keyChange": "https://example.com/acme/key-change",
            "meta": { "termsOfService": "https://example.com/tos" }
        }"#;
        let dir: Directory = serde_json::from_str(json).unwrap();
        assert_eq!(
            dir.meta.unwrap().terms_of_service,
            Some("https://example.com/tos".to_string())
        );
    }

    #[test]
    fn parses_directory_without_meta() {
        let json = r#"{
            "newNonce": "https://example.com/acme/new-nonce",
            "newAccount": "https://example.com/acme/new-account",
            "newOrder": "https://example.com/acme/new-order",
            "revokeCert": "https://example.com/acme/revoke-cert"
        }"#;
        let dir: Directory = serde_json::from_str(json).unwrap();
        assert!(dir.meta.is_none());
    }
}
