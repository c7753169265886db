//! Authorization Controller (§4.4): drives one authorization's
//! challenge to completion via the hook (or an interactive prompt).
use crate::confirm::Confirmer;
use crate::crypto::{KeyPair, b64url, sha256};
use crate::error::{AcmeError, Result};
use crate::hook::{HookOutcome, run_hook};
use crate::session::Session;
use crate::transport::Transport;
use std::thread::sleep;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(crate::config::POLL_INTERVAL_SECS);

/// Computes the key authorization for one challenge. `dns-01` hashes
/// `token.thumbprint`; every other type sends it raw — P3.
pub fn key_authorization(challenge_type: &str, token: &str, thumbprint: &str) -> String {
    let raw = format!("{token}.{thumbprint}");
    if challenge_type == "dns-01" {
        b64url(&sha256(raw.as_bytes()))
    } else {
        raw
    }
}

/// Drives a single authorization URL to `valid`, or fails it.
pub fn execute_authorization(
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    hook: Option<&str>,
    confirmer: &dyn Confirmer,
    authorization_url: &str,
) -> Result<()> {
    let status = transport.sign_and_send(session, account_key, authorization_url, b"")?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "authorization fetch returned HTTP {status}, expected 200"
        )));
    }
    let authorization = session
        .last_response
        .parsed_json
        .clone()
        .ok_or_else(|| AcmeError::protocol("authorization response was not JSON"))?;

    let auth_status = authorization
        .get("status")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AcmeError::protocol("authorization missing status"))?;

    if auth_status == "valid" {
        return Ok(());
    }
    if auth_status != "pending" {
        return Err(AcmeError::protocol(format!(
            "authorization has unexpected status {auth_status}"
        )));
    }

    let identifier = authorization
        .get("identifier")
        .ok_or_else(|| AcmeError::protocol("authorization missing identifier"))?;
    if identifier.get("type").and_then(|v| v.as_str()) != Some("dns") {
        return Err(AcmeError::protocol("authorization identifier is not type dns"));
    }
    let identifier_value = identifier
        .get("value")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AcmeError::protocol("authorization identifier missing value"))?
        .to_string();

    let challenges = authorization
        .get("challenges")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let thumbprint = account_key.public_jwk().thumbprint();

    for challenge in &challenges {
        if challenge.get("status").and_then(|v| v.as_str()) != Some("pending") {
            continue;
        }
        let challenge_type = challenge
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AcmeError::protocol("challenge missing type"))?;
        let challenge_url = challenge
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AcmeError::protocol("challenge missing url"))?
            .to_string();
        let token = challenge
            .get("token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AcmeError::protocol("challenge missing token"))?
            .to_string();

        let key_auth = key_authorization(challenge_type, &token, &thumbprint);

        let accepted = match hook {
            Some(hook) => match run_hook(hook, "begin", challenge_type, &identifier_value, &token, &key_auth) {
                HookOutcome::Accepted => true,
                HookOutcome::Declined(_) => false,
                HookOutcome::ExecFailed => {
                    return Err(AcmeError::Hook(-1));
                }
            },
            None => confirmer.confirm(&format!(
                "Provision {challenge_type} response for {identifier_value}\n  token: {token}\n  key authorization: {key_auth}\nDone?"
            )),
        };

        if !accepted {
            continue;
        }

        // Committed to this challenge: no fallback after activation.
        let result = activate_and_poll(transport, session, account_key, &challenge_url);

        if let Some(hook) = hook {
            let method = if result.is_ok() { "done" } else { "failed" };
            let _ = run_hook(hook, method, challenge_type, &identifier_value, &token, &key_auth);
        }

        return result;
    }

    Err(AcmeError::protocol(format!(
        "no challenge for {identifier_value} was accepted"
    )))
}

fn activate_and_poll(
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    challenge_url: &str,
) -> Result<()> {
    let status = transport.sign_and_send(session, account_key, challenge_url, b"{}")?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "challenge activation returned HTTP {status}, expected 200"
        )));
    }

    loop {
        let status = transport.sign_and_send(session, account_key, challenge_url, b"")?;
        if status != 200 {
            return Err(AcmeError::protocol(format!(
                "challenge poll returned HTTP {status}, expected 200"
            )));
        }
        let challenge_status = session
            .last_response
            .parsed_json
            .as_ref()
            .and_then(|v| v.get("status"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| AcmeError::protocol("challenge missing status"))?
            .to_string();

        match challenge_status.as_str() {
            "valid" => return Ok(()),
            "processing" | "pending" => sleep(POLL_INTERVAL),
            other => {
                return Err(AcmeError::protocol(format!(
                    "challenge reached terminal status {other}"
                )));
            }
        }
    }
}
