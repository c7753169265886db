/// Error handling for the ACME client
use thiserror::Error;

/// Result type for ACME operations
pub type Result<T> = std::result::Result<T, AcmeError>;

/// Error taxonomy for the ACME client.
///
/// Mirrors the error categories a single-threaded, sequential CLI can hit:
/// the network, the ACME server's own problem documents, an unexpected
/// protocol state, a misbehaving validation hook, bad input, or the
/// filesystem. Every operation that can fail returns one of these instead
/// of a bare boolean, so the `accountDoesNotExist` fallback can be
/// pattern-matched rather than string-compared.
#[derive(Error, Debug)]
pub enum AcmeError {
    /// HTTP/TCP/DNS failure reaching the CA.
    #[error("transport error: {0}")]
    Transport(String),

    /// The CA returned an `application/problem+json` document, or a body
    /// with a top-level `error` object.
    #[error("ACME problem: {0}")]
    AcmeProblem(serde_json::Value),

    /// Unexpected protocol state: wrong HTTP status, missing header,
    /// malformed JSON, status outside the expected set.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The validation hook exited with a code outside the "accept"
    /// contract. Carries the raw exit code (negative for exec failure).
    #[error("hook exited with status {0}")]
    Hook(i32),

    /// Bad CLI arguments or an invalid domain name.
    #[error("invalid input: {0}")]
    Input(String),

    /// A filesystem operation (create directory, read/write key or
    /// certificate, set permissions) failed.
    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl AcmeError {
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        AcmeError::Transport(msg.into())
    }

    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        AcmeError::Protocol(msg.into())
    }

    pub fn input<S: Into<String>>(msg: S) -> Self {
        AcmeError::Input(msg.into())
    }

    pub fn filesystem<S: Into<String>>(msg: S) -> Self {
        AcmeError::Filesystem(msg.into())
    }
}

impl From<std::io::Error> for AcmeError {
    fn from(e: std::io::Error) -> Self {
        AcmeError::Filesystem(e.to_string())
    }
}

impl From<serde_json::Error> for AcmeError {
    fn from(e: serde_json::Error) -> Self {
        AcmeError::Protocol(format!("JSON error: {e}"))
    }
}

impl From<reqwest::Error> for AcmeError {
    fn from(e: reqwest::Error) -> Self {
        AcmeError::Transport(e.to_string())
    }
}
