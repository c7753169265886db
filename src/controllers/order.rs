//! Order Controller (§4.3): drives an order from creation through
//! finalization to a downloaded certificate chain.
use crate::confirm::Confirmer;
use crate::controllers::authz;
use crate::crypto::{KeyPair, b64url, generate_csr_der};
use crate::error::{AcmeError, Result};
use crate::session::Session;
use crate::storage;
use crate::transport::Transport;
use crate::types::identifiers_payload;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(crate::config::POLL_INTERVAL_SECS);

struct OrderLocation {
    url: String,
}

fn order_status(session: &Session) -> Result<String> {
    session
        .order
        .as_ref()
        .and_then(|o| o.get("status"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| AcmeError::protocol("order missing status"))
}

/// Runs the full issuance flow for `domains` (first entry is the
/// subject/common name, the rest are SANs), writing the resulting
/// certificate chain to `cert_path`.
pub fn issue(
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    domain_key: &KeyPair,
    domains: &[String],
    hook: Option<&str>,
    confirmer: &dyn Confirmer,
    cert_path: &Path,
) -> Result<()> {
    let new_order_url = session
        .directory
        .as_ref()
        .ok_or_else(|| AcmeError::protocol("directory not bootstrapped"))?
        .new_order
        .clone();

    let payload = identifiers_payload(domains);
    let status = transport.sign_and_send(session, account_key, &new_order_url, payload.to_string().as_bytes())?;
    if status != 201 {
        return Err(AcmeError::protocol(format!(
            "new order returned HTTP {status}, expected 201"
        )));
    }
    let order_location = OrderLocation {
        url: session
            .last_response
            .header("location")
            .ok_or_else(|| AcmeError::protocol("new order response missing Location header"))?
            .to_string(),
    };
    session.order = session.last_response.parsed_json.clone();

    let initial_status = order_status(session)?;
    if initial_status != "pending" && initial_status != "ready" {
        return Err(AcmeError::protocol(format!(
            "new order has unexpected status {initial_status}"
        )));
    }

    if initial_status == "pending" {
        let authorizations = session
            .order
            .as_ref()
            .and_then(|o| o.get("authorizations"))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        for authorization in &authorizations {
            let url = authorization
                .as_str()
                .ok_or_else(|| AcmeError::protocol("authorization entry was not a URL string"))?;
            authz::execute_authorization(transport, session, account_key, hook, confirmer, url)?;
        }

        poll_order_until(&order_location.url, transport, session, account_key, &["pending", "ready"], "ready")?;
    }

    let der = generate_csr_der(domain_key, domains)?;
    let finalize_url = session
        .order
        .as_ref()
        .and_then(|o| o.get("finalize"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| AcmeError::protocol("order missing finalize URL"))?
        .to_string();
    let finalize_payload = serde_json::json!({ "csr": b64url(&der) });
    let status = transport.sign_and_send(
        session,
        account_key,
        &finalize_url,
        finalize_payload.to_string().as_bytes(),
    )?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "finalize returned HTTP {status}, expected 200"
        )));
    }
    session.order = session.last_response.parsed_json.clone();

    poll_order_until(
        &order_location.url,
        transport,
        session,
        account_key,
        &["processing", "valid"],
        "valid",
    )?;

    let certificate_url = session
        .order
        .as_ref()
        .and_then(|o| o.get("certificate"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| AcmeError::protocol("order missing certificate URL"))?
        .to_string();
    let status = transport.sign_and_send(session, account_key, &certificate_url, b"")?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "certificate download returned HTTP {status}, expected 200"
        )));
    }

    storage::write_public_pem(cert_path, &session.last_response.body)?;
    Ok(())
}

/// Polls the order URL every 5 seconds until its status is `target`,
/// failing immediately if a status outside `allowed` is seen.
fn poll_order_until(
    order_url: &str,
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    allowed: &[&str],
    target: &str,
) -> Result<()> {
    loop {
        let current = order_status(session)?;
        if current == target {
            return Ok(());
        }
        if !allowed.contains(&current.as_str()) {
            return Err(AcmeError::protocol(format!(
                "order reached unexpected status {current}, expected one of {allowed:?}"
            )));
        }
        sleep(POLL_INTERVAL);
        let status = transport.sign_and_send(session, account_key, order_url, b"")?;
        if status != 200 {
            return Err(AcmeError::protocol(format!(
                "order poll returned HTTP {status}, expected 200"
            )));
        }
        session.order = session.last_response.parsed_json.clone();
    }
}
