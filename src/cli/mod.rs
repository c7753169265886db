//! Entry point: argument parsing, logging setup, and subcommand
//! dispatch (§4.8). Composes the controllers; exit code is 0 iff every
//! composed step succeeded.
pub mod args;

use crate::confirm::{AlwaysYes, Confirmer, TerminalConfirmer};
use crate::config::Config;
use crate::controllers::{account, order, revoke};
use crate::crypto::{self, KeyPair};
use crate::error::{AcmeError, Result};
use crate::session::Session;
use crate::storage::{self, Layout};
use crate::transport::Transport;
use crate::validate::{base_domain, validate_domain};
use args::{Cli, Command};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initializes `tracing` at a level derived from `-v`'s repeat count,
/// overridable via `RUST_LOG`.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::from_cli(&cli);

    // Input errors are fatal before any network call (§7) — dispatch's
    // domain validation runs ahead of directory bootstrap, not inside
    // the `Issue` arm after it.
    if let Command::Issue { domain, alt_names } = &cli.command {
        validate_domain(domain)?;
        for alt in alt_names {
            validate_domain(alt)?;
        }
    }

    let layout = Layout::new(&config.confdir);
    layout.ensure_roots(config.never_create)?;

    let account_key = load_or_generate_account_key(&layout, config.never_create)?;
    let mut session = Session::new(account_key);
    let transport = Transport::new()?;

    account::bootstrap(&transport, &mut session, &config.directory_url)?;

    let account_key = session.account_key.try_clone()?;

    match cli.command {
        Command::New { email } => {
            let confirmer: Box<dyn Confirmer> = confirmer_for_tos(config.auto_accept_tos);
            account::create_account(&transport, &mut session, &account_key, email.as_deref(), confirmer.as_ref())?;
            tracing::info!(kid = session.kid.as_deref().unwrap_or_default(), "account created");
        }
        Command::Update { email } => {
            account::retrieve_account(&transport, &mut session, &account_key)?;
            account::update_account(&transport, &mut session, &account_key, email.as_deref())?;
        }
        Command::Deactivate => {
            account::retrieve_account(&transport, &mut session, &account_key)?;
            account::deactivate_account(&transport, &mut session, &account_key)?;
        }
        Command::Issue { domain, alt_names } => {
            let mut domains = vec![domain.clone()];
            domains.extend(alt_names);
            let base = base_domain(&domain).to_string();

            let cert_path = layout.cert_path(&base);
            if !crypto::needs_reissue(&cert_path, config.min_days, config.force)? {
                tracing::info!(domain = %base, "certificate is fresh, skipping reissue");
                return Ok(());
            }

            account::retrieve_account(&transport, &mut session, &account_key)?;

            layout.ensure_domain_dirs(&base, config.never_create)?;
            let domain_key = load_or_generate_domain_key(&layout, &base, config.never_create)?;

            let confirmer: Box<dyn Confirmer> = confirmer_for_challenges();
            order::issue(
                &transport,
                &mut session,
                &account_key,
                &domain_key,
                &domains,
                config.hook.as_deref(),
                confirmer.as_ref(),
                &cert_path,
            )?;
            tracing::info!(domain = %base, path = %cert_path.display(), "certificate issued");
        }
        Command::Revoke { certfile, reason } => {
            account::retrieve_account(&transport, &mut session, &account_key)?;
            revoke::revoke(&transport, &mut session, &account_key, std::path::Path::new(&certfile), reason)?;
        }
    }

    Ok(())
}

/// `-y` selects auto-accept for ToS, per §9 — never for challenges.
fn confirmer_for_tos(auto_accept: bool) -> Box<dyn Confirmer> {
    if auto_accept {
        Box::new(AlwaysYes)
    } else {
        Box::new(TerminalConfirmer)
    }
}

fn confirmer_for_challenges() -> Box<dyn Confirmer> {
    Box::new(TerminalConfirmer)
}

fn load_or_generate_account_key(layout: &Layout, never_create: bool) -> Result<KeyPair> {
    let path = layout.account_key_path();
    if path.exists() {
        return KeyPair::from_pem(&storage::read_pem(&path)?);
    }
    if never_create {
        return Err(AcmeError::filesystem(format!(
            "{} does not exist and -n forbids creating it",
            path.display()
        )));
    }
    let key = KeyPair::generate()?;
    storage::write_private_pem(&path, &key.to_pem())?;
    Ok(key)
}

fn load_or_generate_domain_key(layout: &Layout, base_domain: &str, never_create: bool) -> Result<KeyPair> {
    let path = layout.domain_key_path(base_domain);
    if path.exists() {
        return KeyPair::from_pem(&storage::read_pem(&path)?);
    }
    if never_create {
        return Err(AcmeError::filesystem(format!(
            "{} does not exist and -n forbids creating it",
            path.display()
        )));
    }
    let key = KeyPair::generate()?;
    storage::write_private_pem(&path, &key.to_pem())?;
    Ok(key)
}
