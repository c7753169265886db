//! Shared end-to-end test harness: a synchronous mock ACME server (the
//! client itself is synchronous, so the test harness is too — no tokio
//! dev-dependency) plus small helpers for building an in-process
//! `Session`/`Transport` pair and throwaway hook scripts.
#![allow(dead_code)]

use acmectl::crypto::KeyPair;
use acmectl::session::Session;
use acmectl::transport::Transport;
use serde_json::json;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

pub struct MockAcmeServer {
    pub server: mockito::ServerGuard,
}

impl MockAcmeServer {
    pub fn new() -> Self {
        Self {
            server: mockito::Server::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Stubs the directory document. `with_tos` controls whether
    /// `meta.termsOfService` is present (gates the ToS confirmation).
    pub fn mock_directory(&mut self, with_tos: bool) -> mockito::Mock {
        let url = self.url();
        let mut body = json!({
            "newNonce": format!("{url}/new-nonce"),
            "newAccount": format!("{url}/new-account"),
            "newOrder": format!("{url}/new-order"),
            "revokeCert": format!("{url}/revoke-cert"),
            "keyChange": format!("{url}/key-change"),
        });
        if with_tos {
            body["meta"] = json!({ "termsOfService": "https://example.com/tos" });
        }
        self.server
            .mock("GET", "/directory")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    /// Stubs the unsigned `newNonce` GET — always 204, always a fresh
    /// `Replay-Nonce`.
    pub fn mock_new_nonce(&mut self, nonce: &str) -> mockito::Mock {
        self.server
            .mock("GET", "/new-nonce")
            .with_status(204)
            .with_header("replay-nonce", nonce)
            .create()
    }
}

impl Default for MockAcmeServer {
    fn default() -> Self {
        Self::new()
    }
}

/// A throwaway directory under the OS temp dir, unique per test binary
/// process (tests within one binary still share it, so callers that need
/// isolation should pick distinct file names under it).
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("acmectl-e2e-{label}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Writes an executable `/bin/sh` hook script to `path` that appends
/// every invocation's `method type token key_auth` to `log_path` and
/// exits 0 for every challenge type except those listed in
/// `decline_types`, which it exits 1 for on `begin` (and still exits 0
/// for `done`/`failed`, matching a well-behaved real hook).
pub fn write_hook_script(path: &PathBuf, log_path: &PathBuf, decline_types: &[&str]) {
    let decline_cases: String = decline_types
        .iter()
        .map(|t| format!("    {t}) [ \"$1\" = begin ] && exit 1 ;;\n"))
        .collect();
    let script = format!(
        "#!/bin/sh\necho \"$1 $2 $4 $5\" >> {log}\ncase \"$2\" in\n{decline_cases}esac\nexit 0\n",
        log = log_path.display(),
    );
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

pub fn read_hook_log(log_path: &PathBuf) -> Vec<String> {
    fs::read_to_string(log_path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// A fresh `Session` wrapping a freshly generated account key, plus a
/// `Transport` ready to talk to a mock server.
pub fn session_and_transport() -> (Session, Transport) {
    let session = Session::new(KeyPair::generate().unwrap());
    let transport = Transport::new().unwrap();
    (session, transport)
}
