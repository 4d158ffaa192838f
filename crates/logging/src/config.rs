//! crates/logging/src/config.rs
//! Console logging configuration derived from command-line switches.

use std::io;

use is_terminal::IsTerminal;

/// Environment variable that replaces the default filter directives.
pub const LOG_ENV: &str = "ZSSH_LOG";

const INFO_DIRECTIVES: &str = "info,russh=warn,russh_sftp=warn";
const DEBUG_DIRECTIVES: &str = "debug,russh=info,russh_sftp=info";

/// Console logging settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LogConfig {
    debug: bool,
    ansi: bool,
}

impl LogConfig {
    /// Creates a configuration with explicit debug and colour settings.
    #[must_use]
    pub const fn new(debug: bool, ansi: bool) -> Self {
        Self { debug, ansi }
    }

    /// Creates a configuration for the given `--debug` flag, enabling colours
    /// only when stderr is attached to a terminal.
    #[must_use]
    pub fn for_terminal(debug: bool) -> Self {
        Self::new(debug, io::stderr().is_terminal())
    }

    /// Reports whether debug-level events are enabled by default.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Reports whether ANSI colour sequences may be written.
    #[must_use]
    pub const fn ansi(&self) -> bool {
        self.ansi
    }

    /// Filter directives used when [`LOG_ENV`] is unset.
    ///
    /// The SSH and SFTP libraries are kept one level quieter than the clients
    /// themselves; their debug output is mostly packet traces.
    #[must_use]
    pub const fn default_directives(&self) -> &'static str {
        if self.debug {
            DEBUG_DIRECTIVES
        } else {
            INFO_DIRECTIVES
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_directives_quiet_the_ssh_stack() {
        let config = LogConfig::new(false, false);
        assert_eq!(config.default_directives(), INFO_DIRECTIVES);
        assert!(config.default_directives().contains("russh=warn"));
    }

    #[test]
    fn debug_flag_switches_directives() {
        let config = LogConfig::new(true, true);
        assert!(config.debug());
        assert!(config.ansi());
        assert!(config.default_directives().starts_with("debug"));
    }

    #[test]
    fn default_is_plain_info() {
        let config = LogConfig::default();
        assert!(!config.debug());
        assert!(!config.ansi());
    }
}
