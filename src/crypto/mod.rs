//! Crypto provider: key generation/storage, JWK export and thumbprinting,
//! ECDSA signing, CSR generation, and base64url/SHA-256 helpers. Everything
//! the rest of the client needs from cryptography lives here.
pub mod csr;
pub mod encoding;
pub mod freshness;
pub mod jwk;
pub mod keypair;

pub use csr::generate_csr_der;
pub use encoding::{b64url, b64url_decode, sha256};
pub use freshness::{days_until_expiry, needs_reissue};
pub use jwk::Jwk;
pub use keypair::KeyPair;
