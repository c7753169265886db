//! Runtime configuration assembled from CLI flags (§6). No file-based
//! configuration layer — every setting is a command-line flag.
use crate::cli::args::Cli;
use std::path::PathBuf;

pub const LETS_ENCRYPT_DIRECTORY: &str = "https://acme-v02.api.letsencrypt.org/directory";
pub const LETS_ENCRYPT_STAGING_DIRECTORY: &str =
    "https://acme-staging-v02.api.letsencrypt.org/directory";
pub const DEFAULT_CONFDIR: &str = "/etc/ssl/uacme";
pub const DEFAULT_MIN_DAYS: u32 = 30;
pub const POLL_INTERVAL_SECS: u64 = 5;

/// The flags in `Cli` collected into one value, threaded by reference
/// through dispatch rather than read off `Cli` at every call site —
/// the teacher's own preference for a plain settings struct, here with
/// no file-backed layer behind it.
#[derive(Debug, Clone)]
pub struct Config {
    pub directory_url: String,
    pub confdir: PathBuf,
    pub min_days: u32,
    pub force: bool,
    pub hook: Option<String>,
    pub never_create: bool,
    pub auto_accept_tos: bool,
    pub verbosity: u8,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            directory_url: Self::resolve_directory_url(cli.directory_url.as_deref(), cli.staging),
            confdir: PathBuf::from(&cli.confdir),
            min_days: cli.min_days,
            force: cli.force,
            hook: cli.hook.clone(),
            never_create: cli.never_create,
            auto_accept_tos: cli.auto_accept_tos,
            verbosity: cli.verbose,
        }
    }

    pub fn resolve_directory_url(directory_override: Option<&str>, staging: bool) -> String {
        if let Some(url) = directory_override {
            return url.to_string();
        }
        if staging {
            LETS_ENCRYPT_STAGING_DIRECTORY.to_string()
        } else {
            LETS_ENCRYPT_DIRECTORY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins_over_staging_flag() {
        assert_eq!(
            Config::resolve_directory_url(Some("https://custom/directory"), true),
            "https://custom/directory"
        );
    }

    #[test]
    fn staging_flag_selects_staging_directory() {
        assert_eq!(
            Config::resolve_directory_url(None, true),
            LETS_ENCRYPT_STAGING_DIRECTORY
        );
    }

    #[test]
    fn default_is_production_directory() {
        assert_eq!(Config::resolve_directory_url(None, false), LETS_ENCRYPT_DIRECTORY);
    }
}
