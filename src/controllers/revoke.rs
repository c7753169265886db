//! Revocation Controller (§4.5): revoke a previously issued certificate.
use crate::crypto::{KeyPair, b64url};
use crate::error::{AcmeError, Result};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::RevocationReason;
use std::path::Path;

pub fn revoke(
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    certfile: &Path,
    reason: RevocationReason,
) -> Result<()> {
    let revoke_url = session
        .directory
        .as_ref()
        .ok_or_else(|| AcmeError::protocol("directory not bootstrapped"))?
        .revoke_cert
        .clone();

    let pem_contents = std::fs::read_to_string(certfile)?;
    let parsed = pem::parse(&pem_contents)
        .map_err(|e| AcmeError::input(format!("failed to parse certificate PEM: {e}")))?;

    let payload = revoke_payload(parsed.contents(), reason);

    let status = transport.sign_and_send(session, account_key, &revoke_url, payload.to_string().as_bytes())?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "revocation returned HTTP {status}, expected 200"
        )));
    }
    Ok(())
}

/// Builds the `revokeCert` request body: base64url DER plus the numeric
/// reason code — §4.5.
fn revoke_payload(der: &[u8], reason: RevocationReason) -> serde_json::Value {
    serde_json::json!({
        "certificate": b64url(der),
        "reason": reason.as_u8(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoke_payload_encodes_der_and_reason() {
        let payload = revoke_payload(b"der-bytes", RevocationReason::KeyCompromise);
        assert_eq!(payload["certificate"], b64url(b"der-bytes"));
        assert_eq!(payload["reason"], 1);
    }

    #[test]
    fn revoke_payload_defaults_reason_to_unspecified_value() {
        let payload = revoke_payload(b"x", RevocationReason::Unspecified);
        assert_eq!(payload["reason"], 0);
    }
}
