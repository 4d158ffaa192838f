//! crates/cli/src/frontend.rs
//! Argument parsing and diagnostics common to both entry points.

use std::ffi::OsString;
use std::io::Write;

use clap::{ArgMatches, Command, error::ErrorKind};

use crate::error::CliError;
use crate::exit_code::ExitCode;

/// Parses `arguments`, writing help and version output to `stdout` and
/// usage errors to `stderr`. `Err` carries the exit code to return.
pub(crate) fn parse_arguments<I, T, Out, Err>(
    command: Command,
    arguments: I,
    stdout: &mut Out,
    stderr: &mut Err,
) -> Result<ArgMatches, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    match command.try_get_matches_from(arguments) {
        Ok(matches) => Ok(matches),
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = write!(stdout, "{}", error.render());
                let _ = stdout.flush();
                Err(ExitCode::Ok.as_i32())
            }
            _ => {
                let _ = write!(stderr, "{}", error.render());
                let _ = stderr.flush();
                Err(ExitCode::Syntax.as_i32())
            }
        },
    }
}

/// Prints `error` as one line and returns its exit code.
pub(crate) fn report<Err: Write>(program: &str, error: &CliError, stderr: &mut Err) -> i32 {
    let _ = writeln!(stderr, "{program}: {error}");
    let _ = stderr.flush();
    error.exit_code().as_i32()
}

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Converts a status returned by [`run_zssh`](crate::run_zssh) or
/// [`run_zscp`](crate::run_zscp) into a process exit code.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
