//! crates/cli/src/options.rs
//! Options shared by both binaries and their resolution into settings.

use std::fs;
use std::path::PathBuf;

use clap::ArgMatches;
use config::{Overrides, ProfileMap, Settings, config_file_path};
use connect::BEARER_TOKEN_ENV;
use operand::{OperandError, RemoteTarget, current_user, explicit_user, parse_target_as};

use crate::error::CliError;

/// Placeholder user while the profile that may supply one is looked up.
const PENDING_USER: &str = "-";

/// Values of the common options as given on the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CommonOptions {
    pub(crate) overrides: Overrides,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) token_file: Option<PathBuf>,
}

/// Everything needed to connect to one target.
#[derive(Clone, Debug)]
pub(crate) struct Prepared {
    pub(crate) target: RemoteTarget,
    pub(crate) settings: Settings,
    pub(crate) token: Option<String>,
}

impl CommonOptions {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            overrides: Overrides {
                ssh_key_path: matches.get_one::<PathBuf>("ssh-key-path").cloned(),
                service: matches.get_one::<String>("service").cloned(),
                known_hosts: matches.get_one::<PathBuf>("known-hosts").cloned(),
                proxy_command: matches.get_one::<String>("proxy-command").cloned(),
                connect_timeout_secs: matches.get_one::<u64>("connect-timeout").copied(),
                debug: matches.get_flag("debug"),
            },
            config_path: matches.get_one::<PathBuf>("config").cloned(),
            token_file: matches.get_one::<PathBuf>("token-file").cloned(),
        }
    }

    /// Parses `operand` and layers flags, the target's profile and defaults.
    ///
    /// The login user comes from the operand, then the profile, then the
    /// local account.
    pub(crate) fn prepare(&self, operand: &str) -> Result<Prepared, CliError> {
        let target = parse_target_as(operand, PENDING_USER)?;
        let profiles = self.profiles()?;
        let profile = profiles.get(target.host());
        let settings = Settings::resolve(&self.overrides, profile)?;

        let target = match explicit_user(operand) {
            Some(_) => target,
            None => {
                let user = settings
                    .user()
                    .map(str::to_owned)
                    .or_else(current_user)
                    .ok_or(OperandError::UnknownUser)?;
                target.with_user(user)
            }
        };

        Ok(Prepared {
            target,
            settings,
            token: self.token()?,
        })
    }

    fn profiles(&self) -> Result<ProfileMap, CliError> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => config_file_path()?,
        };
        Ok(ProfileMap::load(&path)?)
    }

    /// Bearer token from `--token-file`, else from the environment.
    pub(crate) fn token(&self) -> Result<Option<String>, CliError> {
        let token = match &self.token_file {
            Some(path) => fs::read_to_string(path).map_err(|source| CliError::TokenFile {
                path: path.clone(),
                source,
            })?,
            None => std::env::var(BEARER_TOKEN_ENV).unwrap_or_default(),
        };
        let token = token.trim();
        Ok((!token.is_empty()).then(|| token.to_owned()))
    }
}
