//! Certificate freshness check gating reissuance (`-d DAYS` / `-f`).
use crate::error::{AcmeError, Result};
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

/// Days remaining until the leaf certificate's `notAfter`, or `None` if
/// no certificate exists yet at `pem_path` (a fresh issuance is due).
pub fn days_until_expiry(pem: &str) -> Result<i64> {
    let parsed = pem::parse(pem)
        .map_err(|e| AcmeError::input(format!("failed to parse certificate PEM: {e}")))?;
    let (_, cert) = X509Certificate::from_der(parsed.contents())
        .map_err(|e| AcmeError::protocol(format!("failed to parse certificate DER: {e}")))?;

    match cert.validity().time_to_expiration() {
        Some(remaining) => Ok(remaining.whole_days()),
        None => Ok(0),
    }
}

/// Whether the certificate at `pem_path` should be reissued: forced,
/// missing, or within `min_days` of expiry.
pub fn needs_reissue(pem_path: &std::path::Path, min_days: u32, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    if !pem_path.exists() {
        return Ok(true);
    }
    let pem_contents = std::fs::read_to_string(pem_path)?;
    let remaining = days_until_expiry(&pem_contents)?;
    Ok(remaining < i64::from(min_days))
}
