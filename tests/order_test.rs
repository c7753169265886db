//! End-to-end scenarios 3, 4 & 5 from spec §8: issuance through a
//! dns-01 hook, hook challenge-type fallback, and nonce freshness.
mod common;

use acmectl::confirm::AlwaysYes;
use acmectl::controllers::{account, order};
use common::{MockAcmeServer, read_hook_log, scratch_dir, session_and_transport, write_hook_script};
use mockito::Matcher;

fn mock_retrieved_account(mock: &mut MockAcmeServer) -> mockito::Mock {
    let url = mock.url();
    mock.server
        .mock("POST", "/new-account")
        .with_status(200)
        .with_header("replay-nonce", "nonce-account")
        .with_header("location", &format!("{url}/account/1"))
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"valid","contact":[]}"#)
        .create()
}

/// Scenario 3: a single domain, one `dns-01` challenge, hook accepts.
/// Expect the certificate PEM written to disk and the hook invoked as
/// `begin` then `done`.
#[test]
fn issue_single_domain_with_dns01_hook() {
    let mut mock = MockAcmeServer::new();
    let url = mock.url();
    let _dir = mock.mock_directory(false);
    let _nonce = mock.mock_new_nonce("nonce-0");
    let _account = mock_retrieved_account(&mut mock);

    let _new_order = mock
        .server
        .mock("POST", "/new-order")
        .with_status(201)
        .with_header("replay-nonce", "nonce-order")
        .with_header("location", &format!("{url}/order/1"))
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "pending",
                "identifiers": [{"type": "dns", "value": "example.com"}],
                "authorizations": [format!("{url}/authz/1")],
                "finalize": format!("{url}/order/1/finalize"),
            })
            .to_string(),
        )
        .create();

    let _authz = mock
        .server
        .mock("POST", "/authz/1")
        .with_status(200)
        .with_header("replay-nonce", "nonce-authz")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "pending",
                "identifier": {"type": "dns", "value": "example.com"},
                "challenges": [{
                    "type": "dns-01",
                    "status": "pending",
                    "url": format!("{url}/chal/dns"),
                    "token": "token-dns",
                }],
            })
            .to_string(),
        )
        .create();

    // Activation (non-empty payload) and the subsequent poll-as-GET
    // (empty payload) are distinguished by the JWS `payload` field.
    let _activate = mock
        .server
        .mock("POST", "/chal/dns")
        .match_body(Matcher::Regex(r#""payload":"e30""#.to_string()))
        .with_status(200)
        .with_header("replay-nonce", "nonce-chal-activate")
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"processing"}"#)
        .create();
    let _poll = mock
        .server
        .mock("POST", "/chal/dns")
        .match_body(Matcher::Regex(r#""payload":""#.to_string()))
        .with_status(200)
        .with_header("replay-nonce", "nonce-chal-poll")
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"valid"}"#)
        .create();

    let _order_ready_poll = mock
        .server
        .mock("POST", "/order/1")
        .with_status(200)
        .with_header("replay-nonce", "nonce-order-ready")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "ready",
                "finalize": format!("{url}/order/1/finalize"),
            })
            .to_string(),
        )
        .create();

    let _finalize = mock
        .server
        .mock("POST", "/order/1/finalize")
        .with_status(200)
        .with_header("replay-nonce", "nonce-finalize")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "valid",
                "certificate": format!("{url}/cert/1"),
            })
            .to_string(),
        )
        .create();

    let _cert = mock
        .server
        .mock("POST", "/cert/1")
        .with_status(200)
        .with_header("replay-nonce", "nonce-cert")
        .with_header("content-type", "application/pem-certificate-chain")
        .with_body("-----BEGIN CERTIFICATE-----\nMOCK\n-----END CERTIFICATE-----\n")
        .create();

    let scratch = scratch_dir("issue-dns01");
    let hook_path = scratch.join("hook.sh");
    let log_path = scratch.join("hook.log");
    write_hook_script(&hook_path, &log_path, &[]);
    let cert_path = scratch.join("cert.pem");

    let (mut session, transport) = session_and_transport();
    account::bootstrap(&transport, &mut session, &format!("{url}/directory")).unwrap();
    let account_key = session.account_key.try_clone().unwrap();
    account::retrieve_account(&transport, &mut session, &account_key).unwrap();

    let domain_key = acmectl::crypto::KeyPair::generate().unwrap();
    order::issue(
        &transport,
        &mut session,
        &account_key,
        &domain_key,
        &["example.com".to_string()],
        Some(hook_path.to_str().unwrap()),
        &AlwaysYes,
        &cert_path,
    )
    .unwrap();

    let written = std::fs::read_to_string(&cert_path).unwrap();
    assert!(written.contains("BEGIN CERTIFICATE"));

    let log = read_hook_log(&log_path);
    assert_eq!(log.len(), 2, "hook should be called for begin then done: {log:?}");
    assert!(log[0].starts_with("begin dns-01"));
    assert!(log[1].starts_with("done dns-01"));

    std::fs::remove_dir_all(&scratch).ok();
}

/// Scenario 4: the authorization offers both `dns-01` and `http-01`; the
/// hook declines `dns-01` and accepts `http-01`. Expect the `dns-01`
/// challenge URL is never activated, and the `http-01` key authorization
/// is the raw `token.thumbprint` (no hashing).
#[test]
fn hook_declines_dns01_accepts_http01() {
    let mut mock = MockAcmeServer::new();
    let url = mock.url();
    let _dir = mock.mock_directory(false);
    let _nonce = mock.mock_new_nonce("nonce-0");
    let _account = mock_retrieved_account(&mut mock);

    let _new_order = mock
        .server
        .mock("POST", "/new-order")
        .with_status(201)
        .with_header("replay-nonce", "nonce-order")
        .with_header("location", &format!("{url}/order/1"))
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "pending",
                "identifiers": [{"type": "dns", "value": "example.com"}],
                "authorizations": [format!("{url}/authz/1")],
                "finalize": format!("{url}/order/1/finalize"),
            })
            .to_string(),
        )
        .create();

    let _authz = mock
        .server
        .mock("POST", "/authz/1")
        .with_status(200)
        .with_header("replay-nonce", "nonce-authz")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "pending",
                "identifier": {"type": "dns", "value": "example.com"},
                "challenges": [
                    {
                        "type": "dns-01",
                        "status": "pending",
                        "url": format!("{url}/chal/dns"),
                        "token": "token-dns",
                    },
                    {
                        "type": "http-01",
                        "status": "pending",
                        "url": format!("{url}/chal/http"),
                        "token": "token-http",
                    },
                ],
            })
            .to_string(),
        )
        .create();

    // No mock is registered for /chal/dns at all: if the controller ever
    // activates it, the request has no matching stub and the test fails.
    let _activate_http = mock
        .server
        .mock("POST", "/chal/http")
        .match_body(Matcher::Regex(r#""payload":"e30""#.to_string()))
        .with_status(200)
        .with_header("replay-nonce", "nonce-http-activate")
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"processing"}"#)
        .create();
    let _poll_http = mock
        .server
        .mock("POST", "/chal/http")
        .match_body(Matcher::Regex(r#""payload":""#.to_string()))
        .with_status(200)
        .with_header("replay-nonce", "nonce-http-poll")
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"valid"}"#)
        .create();

    let _order_ready_poll = mock
        .server
        .mock("POST", "/order/1")
        .with_status(200)
        .with_header("replay-nonce", "nonce-order-ready")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "ready",
                "finalize": format!("{url}/order/1/finalize"),
            })
            .to_string(),
        )
        .create();

    let _finalize = mock
        .server
        .mock("POST", "/order/1/finalize")
        .with_status(200)
        .with_header("replay-nonce", "nonce-finalize")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "status": "valid",
                "certificate": format!("{url}/cert/1"),
            })
            .to_string(),
        )
        .create();

    let _cert = mock
        .server
        .mock("POST", "/cert/1")
        .with_status(200)
        .with_header("replay-nonce", "nonce-cert")
        .with_body("-----BEGIN CERTIFICATE-----\nMOCK\n-----END CERTIFICATE-----\n")
        .create();

    let scratch = scratch_dir("issue-fallback");
    let hook_path = scratch.join("hook.sh");
    let log_path = scratch.join("hook.log");
    write_hook_script(&hook_path, &log_path, &["dns-01"]);
    let cert_path = scratch.join("cert.pem");

    let (mut session, transport) = session_and_transport();
    account::bootstrap(&transport, &mut session, &format!("{url}/directory")).unwrap();
    let account_key = session.account_key.try_clone().unwrap();
    account::retrieve_account(&transport, &mut session, &account_key).unwrap();
    let thumbprint = account_key.public_jwk().thumbprint();

    let domain_key = acmectl::crypto::KeyPair::generate().unwrap();
    order::issue(
        &transport,
        &mut session,
        &account_key,
        &domain_key,
        &["example.com".to_string()],
        Some(hook_path.to_str().unwrap()),
        &AlwaysYes,
        &cert_path,
    )
    .unwrap();

    let log = read_hook_log(&log_path);
    // dns-01 "begin" was tried and declined; http-01 "begin" then "done".
    assert_eq!(log.len(), 3, "expected dns-01 decline then http-01 accept+done: {log:?}");
    assert!(log[0].starts_with("begin dns-01"));
    assert_eq!(log[1], format!("begin http-01 token-http token-http.{thumbprint}"));
    assert_eq!(log[2], format!("done http-01 token-http token-http.{thumbprint}"));

    std::fs::remove_dir_all(&scratch).ok();
}

/// Scenario 5: every response carries a fresh `Replay-Nonce`. The
/// session's nonce must equal the latest value after each call — never a
/// stale one — which `Session::record_response`'s unconditional adoption
/// guarantees independent of how many signed POSTs are made in sequence.
#[test]
fn nonce_is_refreshed_on_every_response() {
    let mut mock = MockAcmeServer::new();
    let url = mock.url();
    let _dir = mock.mock_directory(false);
    let _nonce = mock.mock_new_nonce("nonce-bootstrap");
    let _probe_1 = mock
        .server
        .mock("POST", "/new-account")
        .with_status(400)
        .with_header("replay-nonce", "nonce-after-probe-1")
        .with_header("content-type", "application/problem+json")
        .with_body(r#"{"type":"urn:ietf:params:acme:error:accountDoesNotExist"}"#)
        .expect(1)
        .create();

    let (mut session, transport) = session_and_transport();
    account::bootstrap(&transport, &mut session, &format!("{url}/directory")).unwrap();
    assert_eq!(session.nonce.as_deref(), Some("nonce-bootstrap"));

    let account_key = session.account_key.try_clone().unwrap();
    let err = account::retrieve_account(&transport, &mut session, &account_key).unwrap_err();
    assert!(format!("{err}").contains("no account exists"));
    assert_eq!(session.nonce.as_deref(), Some("nonce-after-probe-1"));
}
