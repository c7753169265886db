//! Account/domain key pairs: generation, PEM load/save, JWK export, and
//! ECDSA P-256 signing for JWS.
use crate::error::{AcmeError, Result};

use super::jwk::Jwk;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaKeyPair};

/// Wraps an `rcgen::KeyPair` (used for PEM storage and CSR generation) and
/// signs JWS payloads through `aws-lc-rs` — the crypto backend the teacher
/// already pulls in by default, just never wired to a working `sign()`.
pub struct KeyPair {
    inner: rcgen::KeyPair,
}

impl KeyPair {
    /// Generate a fresh ECDSA P-256 key pair.
    pub fn generate() -> Result<Self> {
        let inner = rcgen::KeyPair::generate()
            .map_err(|e| AcmeError::filesystem(format!("key generation failed: {e}")))?;
        Ok(Self { inner })
    }

    /// Load a key pair from a PEM-encoded PKCS#8 private key.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = rcgen::KeyPair::from_pem(pem)
            .map_err(|e| AcmeError::filesystem(format!("failed to parse key PEM: {e}")))?;
        Ok(Self { inner })
    }

    pub fn to_pem(&self) -> String {
        self.inner.serialize_pem()
    }

    /// An independently owned copy, for call sites that need to hold a
    /// key alongside a mutable borrow of whatever struct contains it.
    pub fn try_clone(&self) -> Result<Self> {
        Self::from_pem(&self.to_pem())
    }

    /// The teacher's own `rcgen::KeyPair` reference, for CSR generation.
    pub fn rcgen_key_pair(&self) -> &rcgen::KeyPair {
        &self.inner
    }

    /// Public key as a JWK, for the `jwk` protected-header form and for
    /// thumbprinting.
    pub fn public_jwk(&self) -> Jwk {
        let raw = self.inner.public_key_raw();
        // SEC1 uncompressed point: 0x04 || X(32) || Y(32).
        let (x, y) = raw[1..].split_at(32);
        Jwk::ec_p256(x, y)
    }

    /// Sign `message` with ECDSA P-256 / SHA-256, producing the raw,
    /// fixed-width `r || s` signature the JWS `ES256` algorithm requires
    /// (as opposed to the ASN.1 DER signature X.509 uses).
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let pkcs8 = self.inner.serialize_der();
        let rng = SystemRandom::new();
        let signing_key = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &pkcs8, &rng)
            .map_err(|e| AcmeError::protocol(format!("failed to load signing key: {e}")))?;
        let signature = signing_key
            .sign(&rng, message)
            .map_err(|e| AcmeError::protocol(format!("signing failed: {e}")))?;
        Ok(signature.as_ref().to_vec())
    }
}
