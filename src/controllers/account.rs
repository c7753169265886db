//! Directory & Account Controller (§4.2): bootstrap, and
//! create/retrieve/update/deactivate account.
use crate::confirm::Confirmer;
use crate::crypto::KeyPair;
use crate::error::{AcmeError, Result};
use crate::protocol::directory::Directory;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::Contact;

const ACCOUNT_DOES_NOT_EXIST: &str = "urn:ietf:params:acme:error:accountDoesNotExist";

/// GETs the directory URL (requiring 200), then GETs `newNonce`
/// (requiring 204). After this, the session holds a fresh nonce.
pub fn bootstrap(transport: &Transport, session: &mut Session, directory_url: &str) -> Result<()> {
    let status = transport.fetch(session, directory_url);
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "directory fetch returned HTTP {status}"
        )));
    }
    let directory: Directory = session
        .last_response
        .parsed_json
        .clone()
        .ok_or_else(|| AcmeError::protocol("directory response was not JSON"))
        .and_then(|v| {
            serde_json::from_value(v).map_err(|e| AcmeError::protocol(format!("malformed directory: {e}")))
        })?;

    let new_nonce_url = directory.new_nonce.clone();
    session.directory = Some(directory);

    let status = transport.fetch(session, &new_nonce_url);
    if status != 204 {
        return Err(AcmeError::protocol(format!(
            "newNonce returned HTTP {status}, expected 204"
        )));
    }
    Ok(())
}

fn directory(session: &Session) -> Result<Directory> {
    session
        .directory
        .clone()
        .ok_or_else(|| AcmeError::protocol("directory not bootstrapped"))
}

fn location_header(session: &Session) -> Result<String> {
    session
        .last_response
        .header("location")
        .map(str::to_string)
        .ok_or_else(|| AcmeError::protocol("response missing Location header"))
}

fn is_account_does_not_exist(session: &Session) -> bool {
    session
        .last_response
        .problem_document()
        .and_then(|doc| doc.get("type"))
        .and_then(|v| v.as_str())
        .map(|t| t == ACCOUNT_DOES_NOT_EXIST)
        .unwrap_or(false)
}

/// `new` subcommand: fails if the account already exists (that
/// subcommand's semantics is "create new", not "use existing").
pub fn create_account(
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    email: Option<&str>,
    confirmer: &dyn Confirmer,
) -> Result<()> {
    let new_account_url = directory(session)?.new_account.clone();

    let probe = serde_json::json!({ "onlyReturnExisting": true });
    let status = transport.sign_and_send(
        session,
        account_key,
        &new_account_url,
        probe.to_string().as_bytes(),
    )?;

    if status == 200 {
        let kid = location_header(session).unwrap_or_default();
        return Err(AcmeError::protocol(format!(
            "account already exists at {kid}"
        )));
    }

    if status != 400 || !is_account_does_not_exist(session) {
        return Err(session
            .last_response
            .to_error(format!("unexpected response probing for existing account: HTTP {status}")));
    }

    let terms_of_service = directory(session)?
        .meta
        .and_then(|m| m.terms_of_service);
    if let Some(tos) = &terms_of_service {
        let accepted = confirmer.confirm(&format!("Accept the terms of service at {tos}?"));
        if !accepted {
            return Err(AcmeError::input("terms of service not accepted"));
        }
    }

    let mut payload = serde_json::json!({ "termsOfServiceAgreed": true });
    if let Some(email) = email {
        payload["contact"] = serde_json::json!([Contact::email(email).to_uri()]);
    }

    let status = transport.sign_and_send(
        session,
        account_key,
        &new_account_url,
        payload.to_string().as_bytes(),
    )?;

    if status != 201 {
        return Err(AcmeError::protocol(format!(
            "account creation returned HTTP {status}, expected 201"
        )));
    }
    let body_status = session
        .last_response
        .parsed_json
        .as_ref()
        .and_then(|v| v.get("status"))
        .and_then(|v| v.as_str());
    if body_status != Some("valid") {
        return Err(AcmeError::protocol(format!(
            "account creation returned status {body_status:?}, expected \"valid\""
        )));
    }

    session.kid = Some(location_header(session)?);
    Ok(())
}

/// Retrieves the existing account, populating `session.kid` and
/// `session.account`.
pub fn retrieve_account(transport: &Transport, session: &mut Session, account_key: &KeyPair) -> Result<()> {
    let new_account_url = directory(session)?.new_account.clone();
    let payload = serde_json::json!({ "onlyReturnExisting": true });
    let status = transport.sign_and_send(
        session,
        account_key,
        &new_account_url,
        payload.to_string().as_bytes(),
    )?;

    if status == 400 && is_account_does_not_exist(session) {
        return Err(AcmeError::protocol(
            "no account exists for this key; run the \"new\" subcommand first",
        ));
    }
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "account retrieval returned HTTP {status}, expected 200"
        )));
    }

    session.kid = Some(location_header(session)?);
    session.account = session.last_response.parsed_json.clone();
    Ok(())
}

fn canonical_contact(contact: &str) -> Option<String> {
    let lower = contact.to_ascii_lowercase();
    let rest = lower.strip_prefix("mailto:")?;
    Some(rest.to_string())
}

/// Compares `email` against the account's existing contacts and POSTs
/// an update only if they differ. Per §9's documented comparison
/// policy, both the domain and local-part of the `mailto:` address are
/// lowercased before comparison — a deliberate simplification versus
/// RFC 5321's case-sensitive local-part.
pub fn update_account(
    transport: &Transport,
    session: &mut Session,
    account_key: &KeyPair,
    email: Option<&str>,
) -> Result<()> {
    let kid = session
        .kid
        .clone()
        .ok_or_else(|| AcmeError::protocol("account not established"))?;

    let existing = session
        .account
        .as_ref()
        .and_then(|a| a.get("contact"))
        .and_then(|c| c.as_array())
        .and_then(|contacts| contacts.first())
        .and_then(|v| v.as_str())
        .and_then(canonical_contact);

    let requested = email.map(|e| e.to_ascii_lowercase());

    if existing == requested {
        return Ok(());
    }

    let payload = match email {
        Some(email) => serde_json::json!({ "contact": [Contact::email(email).to_uri()] }),
        None => serde_json::json!({ "contact": [] }),
    };

    let status = transport.sign_and_send(session, account_key, &kid, payload.to_string().as_bytes())?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "account update returned HTTP {status}, expected 200"
        )));
    }
    Ok(())
}

pub fn deactivate_account(transport: &Transport, session: &mut Session, account_key: &KeyPair) -> Result<()> {
    let kid = session
        .kid
        .clone()
        .ok_or_else(|| AcmeError::protocol("account not established"))?;
    let payload = serde_json::json!({ "status": "deactivated" });
    let status = transport.sign_and_send(session, account_key, &kid, payload.to_string().as_bytes())?;
    if status != 200 {
        return Err(AcmeError::protocol(format!(
            "account deactivation returned HTTP {status}, expected 200"
        )));
    }
    Ok(())
}
