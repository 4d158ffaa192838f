//! Process exit codes shared by `zssh` and `zscp`.
//!
//! Where a failure has an rsync `errcode.h` counterpart the same number is
//! used: `1` usage, `5` session start, `11` file I/O, `23` partial transfer,
//! `30` timeout. `2`, `6` and `7` are specific to these clients.

use std::fmt;

/// Exit codes returned by the client binaries.
///
/// `zssh <target> <command>` exits with the remote command's own status
/// instead; these codes cover failures before or around the remote work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful completion.
    Ok = 0,

    /// Syntax or usage error.
    ///
    /// Returned when command-line arguments are invalid, including a copy
    /// whose operands are both local or both remote.
    Syntax = 1,

    /// Configuration error.
    ///
    /// Returned when the profile file cannot be read or parsed, or a default
    /// path cannot be determined.
    Config = 2,

    /// Error starting the client session.
    ///
    /// Returned when dialing, the SSH handshake, or opening a channel fails.
    StartClient = 5,

    /// Authentication failure.
    ///
    /// Returned when no usable credential was found or the server accepted
    /// none of them.
    Auth = 6,

    /// Host key verification failure.
    ///
    /// Returned when the server key conflicts with the known-hosts record or
    /// the user declined an unknown key.
    HostKey = 7,

    /// Error in local file I/O.
    ///
    /// Returned when a local source is missing or a local file cannot be
    /// read.
    FileIo = 11,

    /// Partial transfer due to error.
    PartialTransfer = 23,

    /// Dial, handshake, or authentication timed out.
    Timeout = 30,
}

impl ExitCode {
    /// Returns the numeric exit code value.
    ///
    /// # Examples
    ///
    /// ```
    /// use cli::ExitCode;
    ///
    /// assert_eq!(ExitCode::Ok.as_i32(), 0);
    /// assert_eq!(ExitCode::PartialTransfer.as_i32(), 23);
    /// ```
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a human-readable description of this exit code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::Config => "configuration error",
            Self::StartClient => "error starting client session",
            Self::Auth => "authentication failed",
            Self::HostKey => "host key verification failed",
            Self::FileIo => "error in file IO",
            Self::PartialTransfer => "partial transfer",
            Self::Timeout => "timeout while connecting",
        }
    }

    /// Returns `true` if this represents a successful exit.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Creates an exit code from an i32 value.
    ///
    /// Returns `None` if the value doesn't correspond to a known exit code.
    ///
    /// ```
    /// use cli::ExitCode;
    ///
    /// assert_eq!(ExitCode::from_i32(7), Some(ExitCode::HostKey));
    /// assert_eq!(ExitCode::from_i32(999), None);
    /// ```
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::Syntax),
            2 => Some(Self::Config),
            5 => Some(Self::StartClient),
            6 => Some(Self::Auth),
            7 => Some(Self::HostKey),
            11 => Some(Self::FileIo),
            23 => Some(Self::PartialTransfer),
            30 => Some(Self::Timeout),
            _ => None,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}
