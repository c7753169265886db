//! `acmectl` binary entry point. Exit code is 0 on success, nonzero on
//! any failure (§4.8) — the failure's diagnostic is logged to stderr
//! before the process exits.
use std::process::ExitCode;

fn main() -> ExitCode {
    match acmectl::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
