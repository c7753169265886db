//! Hook Runner (§4.6): invokes the external validator as a child
//! process and interprets its exit status per the ABI in §6.
use std::process::Command;

/// Outcome of invoking the hook for one challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Exit code 0: the hook provisioned the response.
    Accepted,
    /// Exit code > 0 (on `begin`): the hook declines this challenge type.
    Declined(i32),
    /// Failure to exec the child process at all.
    ExecFailed,
}

/// Runs `hook` with argv `(method, type, identifier, token, key_auth)`.
/// The child inherits the parent's environment; its stdio is not
/// captured. The parent blocks until the child exits.
pub fn run_hook(
    hook: &str,
    method: &str,
    challenge_type: &str,
    identifier: &str,
    token: &str,
    key_auth: &str,
) -> HookOutcome {
    let status = Command::new(hook)
        .arg(method)
        .arg(challenge_type)
        .arg(identifier)
        .arg(token)
        .arg(key_auth)
        .status();

    match status {
        Ok(status) if status.success() => HookOutcome::Accepted,
        Ok(status) => HookOutcome::Declined(status.code().unwrap_or(-1)),
        Err(e) => {
            tracing::warn!(hook, error = %e, "failed to execute hook");
            HookOutcome::ExecFailed
        }
    }
}
