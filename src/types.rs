/// Shared data types for the ACME protocol
use serde::{Deserialize, Serialize};

/// An identifier being authorized — always `{"type": "dns", "value": ...}`
/// for this client; IP identifiers are not produced anywhere in the
/// control flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub value: String,
}

impl Identifier {
    pub fn dns(domain: impl Into<String>) -> Self {
        Self {
            id_type: "dns".to_string(),
            value: domain.into(),
        }
    }
}

/// Build the `identifiers` payload for a new-order request — see P6.
pub fn identifiers_payload(domains: &[String]) -> serde_json::Value {
    let identifiers: Vec<Identifier> = domains.iter().map(Identifier::dns).collect();
    serde_json::json!({ "identifiers": identifiers })
}

/// Account contact, rendered as a `mailto:` URI.
#[derive(Debug, Clone)]
pub struct Contact {
    pub email: String,
}

impl Contact {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn to_uri(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

/// Certificate revocation reason codes (RFC 5280 §5.3.1, subset accepted
/// by ACME revocation requests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RevocationReason {
    Unspecified = 0,
    KeyCompromise = 1,
    CaCompromise = 2,
    AffiliationChanged = 3,
    Superseded = 4,
    CessationOfOperation = 5,
    CertificateHold = 6,
    RemoveFromCrl = 8,
    PrivilegeWithdrawn = 9,
    AaCompromise = 10,
}

impl RevocationReason {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::str::FromStr for RevocationReason {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.parse::<u8>().map_err(|e| e.to_string())? {
            0 => Ok(RevocationReason::Unspecified),
            1 => Ok(RevocationReason::KeyCompromise),
            2 => Ok(RevocationReason::CaCompromise),
            3 => Ok(RevocationReason::AffiliationChanged),
            4 => Ok(RevocationReason::Superseded),
            5 => Ok(RevocationReason::CessationOfOperation),
            6 => Ok(RevocationReason::CertificateHold),
            8 => Ok(RevocationReason::RemoveFromCrl),
            9 => Ok(RevocationReason::PrivilegeWithdrawn),
            10 => Ok(RevocationReason::AaCompromise),
            other => Err(format!("unsupported revocation reason code {other}")),
        }
    }
}
