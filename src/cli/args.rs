//! CLI argument parsing — mirrors the surface in §6 exactly:
//! `uacme [-a URL] [-c DIR] [-d DAYS] [-f] [-h HOOK] [-n] [-s] [-v]... [-V] [-y] <subcommand>`.
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "acmectl", version, about = "A sequential, hook-driven ACME v2 client")]
pub struct Cli {
    /// Directory URL override.
    #[arg(short = 'a', long = "acme-url", value_name = "URL")]
    pub directory_url: Option<String>,

    /// Config directory.
    #[arg(short = 'c', long = "confdir", value_name = "DIR", default_value = crate::config::DEFAULT_CONFDIR)]
    pub confdir: String,

    /// Minimum remaining days before reissue.
    #[arg(short = 'd', long = "days", value_name = "DAYS", default_value_t = crate::config::DEFAULT_MIN_DAYS)]
    pub min_days: u32,

    /// Force reissue even if the certificate is not near expiry.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Hook program path, invoked to provision/clean up challenge responses.
    #[arg(short = 'h', long = "hook", value_name = "HOOK")]
    pub hook: Option<String>,

    /// Never create directories or keys; require them to already exist.
    #[arg(short = 'n', long = "never-create")]
    pub never_create: bool,

    /// Use the staging directory instead of production.
    #[arg(short = 's', long = "staging")]
    pub staging: bool,

    /// Increase verbosity (repeatable).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Auto-accept terms of service.
    #[arg(short = 'y', long = "yes")]
    pub auto_accept_tos: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new account.
    New {
        /// Contact email address.
        email: Option<String>,
    },
    /// Update the account's contact email.
    Update {
        /// New contact email address (omit to clear).
        email: Option<String>,
    },
    /// Deactivate the account.
    Deactivate,
    /// Issue (or reissue) a certificate.
    Issue {
        /// Primary domain name.
        domain: String,
        /// Additional subject alternative names.
        alt_names: Vec<String>,
    },
    /// Revoke a previously issued certificate.
    Revoke {
        /// Path to the PEM certificate file.
        certfile: String,
        /// Revocation reason code (RFC 5280 §5.3.1).
        #[arg(long, default_value = "0")]
        reason: crate::types::RevocationReason,
    },
}
