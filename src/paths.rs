//! Default locations, `~` expansion, and backups of an existing output file.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::MigrateError;

/// The user's home directory.
///
/// # Errors
///
/// Returns [`MigrateError::NoHomeDir`] when it cannot be determined.
pub fn home_dir() -> Result<PathBuf, MigrateError> {
    dirs::home_dir().ok_or(MigrateError::NoHomeDir)
}

/// Expand a leading `~` (alone or followed by `/`) to `home`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use zsh2fish::paths::expand_tilde_with;
/// let home = Path::new("/home/me");
/// assert_eq!(expand_tilde_with("~/.zshrc", home), PathBuf::from("/home/me/.zshrc"));
/// assert_eq!(expand_tilde_with("~", home), PathBuf::from("/home/me"));
/// assert_eq!(expand_tilde_with("/etc/zshrc", home), PathBuf::from("/etc/zshrc"));
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Expand a leading `~` using the real home directory.
///
/// # Errors
///
/// Returns [`MigrateError::NoHomeDir`] if the path needs the home directory
/// and it cannot be determined.
pub fn expand_tilde(path: &str) -> Result<PathBuf, MigrateError> {
    if path == "~" || path.starts_with("~/") {
        Ok(expand_tilde_with(path, &home_dir()?))
    } else {
        Ok(PathBuf::from(path))
    }
}

/// `~/.zshrc`.
#[must_use]
pub fn default_input_in(home: &Path) -> PathBuf {
    home.join(".zshrc")
}

/// `$XDG_CONFIG_HOME/fish/config.fish`, or `~/.config/fish/config.fish`
/// when the variable is unset or empty.
#[must_use]
pub fn default_output_in(xdg_config_home: Option<&OsStr>, home: &Path) -> PathBuf {
    match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(base) => Path::new(base).join("fish").join("config.fish"),
        None => home.join(".config").join("fish").join("config.fish"),
    }
}

/// Default input path for this user.
///
/// # Errors
///
/// Returns [`MigrateError::NoHomeDir`] if the home directory is unknown.
pub fn default_input() -> Result<PathBuf, MigrateError> {
    Ok(default_input_in(&home_dir()?))
}

/// Default output path for this user and environment.
///
/// # Errors
///
/// Returns [`MigrateError::NoHomeDir`] if the home directory is unknown.
pub fn default_output() -> Result<PathBuf, MigrateError> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME");
    Ok(default_output_in(xdg.as_deref(), &home_dir()?))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// First free backup path: `<dest>.bak`, then `<dest>.bak.1`, `<dest>.bak.2`, …
#[must_use]
pub fn backup_path(dest: &Path) -> PathBuf {
    let bak = with_suffix(dest, ".bak");
    if !bak.exists() {
        return bak;
    }
    (1..)
        .map(|n| with_suffix(dest, &format!(".bak.{n}")))
        .find(|p| !p.exists())
        .unwrap_or(bak)
}

/// Copy `dest` to its first free backup path if it exists.
///
/// Returns the backup path, or `None` when there was nothing to back up.
///
/// # Errors
///
/// Returns [`MigrateError::Backup`] if the copy fails.
pub fn create_backup(dest: &Path) -> Result<Option<PathBuf>, MigrateError> {
    if !dest.exists() {
        return Ok(None);
    }
    let backup = backup_path(dest);
    fs::copy(dest, &backup).map_err(|source| MigrateError::Backup {
        path: dest.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;
    info!(from = %dest.display(), to = %backup.display(), "backup created");
    Ok(Some(backup))
}
