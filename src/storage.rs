//! Filesystem layout helpers (§6): account key, per-domain keys, and
//! issued certificate chains, laid out under a single config directory
//! with the modes the table in §6 prescribes.
use crate::error::{AcmeError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct Layout {
    confdir: PathBuf,
}

impl Layout {
    pub fn new(confdir: impl Into<PathBuf>) -> Self {
        Self {
            confdir: confdir.into(),
        }
    }

    pub fn account_key_path(&self) -> PathBuf {
        self.confdir.join("private").join("key.pem")
    }

    pub fn domain_key_path(&self, base_domain: &str) -> PathBuf {
        self.confdir
            .join("private")
            .join(base_domain)
            .join("key.pem")
    }

    pub fn cert_path(&self, base_domain: &str) -> PathBuf {
        self.confdir.join(base_domain).join("cert.pem")
    }

    /// Creates `<confdir>/` (0755) and `<confdir>/private/` (0700) if
    /// they don't already exist. Returns an error if `never_create` is
    /// set (`-n`) and either is missing.
    pub fn ensure_roots(&self, never_create: bool) -> Result<()> {
        ensure_dir(&self.confdir, 0o755, never_create)?;
        ensure_dir(&self.confdir.join("private"), 0o700, never_create)
    }

    /// Creates the per-domain private key directory (0700) and the
    /// per-domain certificate directory (0755, the file inside it gets
    /// 0644), subject to `never_create`.
    pub fn ensure_domain_dirs(&self, base_domain: &str, never_create: bool) -> Result<()> {
        ensure_dir(
            &self.confdir.join("private").join(base_domain),
            0o700,
            never_create,
        )?;
        ensure_dir(&self.confdir.join(base_domain), 0o755, never_create)
    }
}

fn ensure_dir(path: &Path, mode: u32, never_create: bool) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if never_create {
        return Err(AcmeError::filesystem(format!(
            "{} does not exist and -n forbids creating it",
            path.display()
        )));
    }
    fs::create_dir_all(path)?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

/// Writes `pem` to `path` with mode `0600`, atomically enough for a
/// single-threaded CLI (write then chmod).
pub fn write_private_pem(path: &Path, pem: &str) -> Result<()> {
    fs::write(path, pem)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

/// Writes `pem` to `path` with mode `0644` (the issued certificate
/// chain — not sensitive, world-readable).
pub fn write_public_pem(path: &Path, pem: &str) -> Result<()> {
    fs::write(path, pem)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    Ok(())
}

pub fn read_pem(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
