//! crates/config/src/paths.rs
//! Well-known locations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable that relocates the configuration root.
pub const CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";

/// File name of the profile map inside `<config home>/zssh`.
pub const CONFIG_FILE_NAME: &str = "config.json";

const APP_DIR: &str = "zssh";

/// Configuration root: `$XDG_CONFIG_HOME` when set and non-empty, otherwise
/// the platform configuration directory.
#[must_use]
pub fn config_home() -> Option<PathBuf> {
    config_home_from(std::env::var_os(CONFIG_HOME_ENV))
}

pub(crate) fn config_home_from(xdg: Option<OsString>) -> Option<PathBuf> {
    match xdg {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => dirs::config_dir(),
    }
}

/// `<config home>/zssh/config.json`.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    config_home()
        .map(|home| home.join(APP_DIR).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::MissingDirectory("configuration"))
}

/// `<config home>/zssh/known_hosts`.
pub fn known_hosts_path() -> Result<PathBuf, ConfigError> {
    config_home()
        .map(|home| home.join(APP_DIR).join("known_hosts"))
        .ok_or(ConfigError::MissingDirectory("configuration"))
}

pub(crate) fn default_key_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".ssh").join("id_rsa"))
        .ok_or(ConfigError::MissingDirectory("home"))
}

/// Expands a leading `~` or `~/` against the home directory.
///
/// Other paths, including `~user/...`, are returned unchanged.
pub fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    let Some(text) = path.to_str() else {
        return Ok(path.to_path_buf());
    };
    let rest = match text {
        "~" => "",
        _ => match text.strip_prefix("~/") {
            Some(rest) => rest,
            None => return Ok(path.to_path_buf()),
        },
    };
    let home = dirs::home_dir().ok_or(ConfigError::MissingDirectory("home"))?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}
