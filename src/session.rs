//! The process-singleton `Session`: account/domain keys, the directory,
//! the current nonce, the account's `kid`, and the last HTTP response.
use crate::crypto::KeyPair;
use crate::protocol::directory::Directory;

/// Everything captured from the most recent HTTP exchange. Replacing it
/// (via `Session::record_response`) drops the previous body/headers.
#[derive(Debug, Clone, Default)]
pub struct LastResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub content_type: Option<String>,
    pub parsed_json: Option<serde_json::Value>,
}

impl LastResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// An ACME error is either `application/problem+json` content, or a
    /// top-level `error` object in an otherwise-JSON body.
    pub fn is_acme_problem(&self) -> bool {
        if self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/problem+json"))
        {
            return true;
        }
        self.parsed_json
            .as_ref()
            .and_then(|v| v.get("error"))
            .is_some()
    }

    pub fn problem_document(&self) -> Option<&serde_json::Value> {
        if !self.is_acme_problem() {
            return None;
        }
        match &self.parsed_json {
            Some(v) if v.get("error").is_some() => v.get("error"),
            other => other.as_ref(),
        }
    }

    /// An `AcmeProblem` carrying the server's full problem document when
    /// one was returned, otherwise a generic `Protocol` error with
    /// `fallback` — surfaces the exact JSON an operator needs per §4.1's
    /// error classification rule.
    pub fn to_error(&self, fallback: impl Into<String>) -> crate::error::AcmeError {
        match self.problem_document() {
            Some(doc) => crate::error::AcmeError::AcmeProblem(doc.clone()),
            None => crate::error::AcmeError::protocol(fallback.into()),
        }
    }
}

/// Holds account key, domain key, directory, nonce, kid and the last
/// response. Created at program start, torn down at exit.
pub struct Session {
    pub account_key: KeyPair,
    pub domain_key: Option<KeyPair>,
    pub directory: Option<Directory>,
    pub nonce: Option<String>,
    pub kid: Option<String>,
    pub last_response: LastResponse,
    pub account: Option<serde_json::Value>,
    pub order: Option<serde_json::Value>,
}

impl Session {
    pub fn new(account_key: KeyPair) -> Self {
        Self {
            account_key,
            domain_key: None,
            directory: None,
            nonce: None,
            kid: None,
            last_response: LastResponse::default(),
            account: None,
            order: None,
        }
    }

    /// Whether the protected header should use `jwk` (true) or `kid`
    /// (false) form. `jwk` iff `kid` is empty — P2.
    pub fn use_jwk_form(&self) -> bool {
        self.kid.as_deref().is_none_or(str::is_empty)
    }

    /// Records a fresh response, adopting any `Replay-Nonce` header
    /// unconditionally and overwriting `last_response`.
    pub fn record_response(&mut self, response: LastResponse) {
        if let Some(new_nonce) = response.header("replay-nonce") {
            self.nonce = Some(new_nonce.to_string());
        }
        self.last_response = response;
    }
}
