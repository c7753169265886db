//! Certificate Signing Request generation for the `issue` action.
use crate::error::{AcmeError, Result};
use rcgen::{CertificateParams, DistinguishedName, DnType};

use super::keypair::KeyPair;

/// Build a PKCS#10 CSR in DER form for `domain_key`, covering `domains`
/// (the first domain becomes the Subject Common Name, all domains become
/// Subject Alternative Names, per CA/Browser Forum baseline requirements).
pub fn generate_csr_der(domain_key: &KeyPair, domains: &[String]) -> Result<Vec<u8>> {
    let mut params = CertificateParams::new(domains.to_vec())
        .map_err(|e| AcmeError::input(format!("invalid domain name for CSR: {e}")))?;

    let mut dn = DistinguishedName::new();
    if let Some(first) = domains.first() {
        dn.push(DnType::CommonName, first.clone());
    }
    params.distinguished_name = dn;

    let csr = params
        .serialize_request(domain_key.rcgen_key_pair())
        .map_err(|e| AcmeError::protocol(format!("CSR generation failed: {e}")))?;

    Ok(csr.der().to_vec())
}
