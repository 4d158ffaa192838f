#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `config` turns three layers of input into the [`Settings`] a client run
//! uses: command-line [`Overrides`], the [`Profile`] stored for the target
//! identity, and built-in defaults. The first layer that supplies a value
//! wins.
//!
//! # Design
//!
//! - Profiles live in one JSON object keyed by target identity at
//!   `$XDG_CONFIG_HOME/zssh/config.json`, falling back to the platform
//!   configuration directory. [`ProfileMap::load`] treats a missing file as
//!   an empty map.
//! - Paths stored in a profile may start with `~/`; they are expanded against
//!   the home directory during [`Settings::resolve`].
//! - A connect timeout of `0` seconds disables the timeout.
//!
//! # Errors
//!
//! [`ConfigError`] covers unreadable or malformed profile files and a
//! missing home directory when a default path is needed.
//!
//! # Examples
//!
//! ```
//! use config::{Overrides, Profile, Settings};
//!
//! let profile: Profile = serde_json::from_str(r#"{"service": "db-ssh", "user": "ops"}"#)
//!     .expect("profile");
//! let overrides = Overrides {
//!     service: Some("admin-ssh".to_owned()),
//!     ssh_key_path: Some("/keys/id_ed25519".into()),
//!     known_hosts: Some("/tmp/known_hosts".into()),
//!     ..Overrides::default()
//! };
//! let settings = Settings::resolve(&overrides, Some(&profile)).expect("settings");
//! assert_eq!(settings.service(), "admin-ssh");
//! assert_eq!(settings.user(), Some("ops"));
//! ```

mod error;
mod paths;
mod profile;
mod settings;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use paths::{
    CONFIG_FILE_NAME, CONFIG_HOME_ENV, config_file_path, config_home, expand_home,
    known_hosts_path,
};
pub use profile::{Profile, ProfileMap};
pub use settings::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_SERVICE, Overrides, Settings};
