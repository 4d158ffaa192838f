#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-ends of the workspace: [`run_zssh`]
//! opens an interactive shell or runs one command on a target reached through
//! the overlay, and [`run_zscp`] copies files to or from it over SFTP. The
//! binaries in `src/bin` are thin wrappers around these two functions.
//!
//! # Design
//!
//! Both entry points accept an iterator of arguments together with handles
//! for standard output and error. A [`clap`](https://docs.rs/clap/) command
//! definition parses the arguments; help and version output go to the
//! standard output handle and usage errors to the error handle. Everything
//! after parsing follows one path:
//!
//! 1. Classify operands. For `zscp` exactly one side is remote; local sources
//!    are made absolute and must exist before anything is dialed.
//! 2. Resolve settings: command-line flags over the target's profile over the
//!    defaults.
//! 3. Install logging, build a tokio runtime, dial, handshake and
//!    authenticate.
//! 4. Run the shell, the command, or the copy.
//!
//! # Errors
//!
//! Failures are printed as a single line prefixed with the program name and
//! mapped onto an [`ExitCode`]. `zssh TARGET COMMAND` exits with the remote
//! command's status.
//!
//! # Examples
//!
//! ```
//! use cli::{ExitCode, run_zscp};
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run_zscp(["zscp", "a.txt", "b.txt"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, ExitCode::Syntax.as_i32());
//! assert!(String::from_utf8_lossy(&stderr).contains("must be remote"));
//! ```

mod client;
mod command;
mod error;
mod exit_code;
mod frontend;
mod options;
mod zscp;
mod zssh;


pub use error::CliError;
pub use exit_code::ExitCode;
pub use frontend::exit_code_from;
pub use zscp::run_zscp;
pub use zssh::run_zssh;
