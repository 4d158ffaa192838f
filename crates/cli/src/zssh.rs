//! crates/cli/src/zssh.rs
//! Remote shell and command execution.

use std::ffi::OsString;
use std::io::Write;

use clap::ArgMatches;
use connect::{ConnectError, PtyRequest, RawModeGuard, Session};
use logging::Logger;
use tracing::debug;

use crate::client::{connect, init_logging, runtime};
use crate::command::{ZSSH, zssh_command};
use crate::error::CliError;
use crate::frontend::{parse_arguments, report};
use crate::options::CommonOptions;

/// Runs `zssh` with `arguments`, returning the process exit code.
///
/// Help, version and diagnostics go to `stdout` and `stderr`. Remote output
/// is written to the process's own standard streams.
pub fn run_zssh<I, T, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let matches = match parse_arguments(zssh_command(), arguments, stdout, stderr) {
        Ok(matches) => matches,
        Err(code) => return code,
    };
    match execute(&matches, stderr) {
        Ok(status) => status,
        Err(error) => report(ZSSH, &error, stderr),
    }
}

fn execute<Err: Write>(matches: &ArgMatches, stderr: &mut Err) -> Result<i32, CliError> {
    let options = CommonOptions::from_matches(matches);
    let operand = matches
        .get_one::<String>("target")
        .ok_or_else(|| CliError::Usage("missing target".to_owned()))?;
    let command = remote_command(matches);

    let prepared = options.prepare(operand)?;
    if !prepared.target.path().is_empty() {
        return Err(CliError::Usage(format!(
            "'{operand}' names a path; zssh takes [USER@]TARGET"
        )));
    }
    init_logging(ZSSH, prepared.settings.debug(), stderr);
    let logger = Logger::new(ZSSH);

    let runtime = runtime()?;
    let outcome = runtime.block_on(async {
        let session = connect(&prepared, &logger).await?;
        let status = match &command {
            Some(command) => {
                session
                    .exec(command, tokio::io::stdout(), tokio::io::stderr())
                    .await
            }
            None => interactive(&session).await,
        };
        if let Err(error) = session.close().await {
            debug!(parent: logger.span(), "disconnect failed: {}", error);
        }
        status
    });
    // The stdin reader blocks a pool thread until the next keystroke.
    runtime.shutdown_background();

    let status = outcome?;
    debug!(parent: logger.span(), "remote exit status {}", status);
    Ok(exit_status(status))
}

/// Joins the trailing words into one command line, or `None` for a shell.
pub(crate) fn remote_command(matches: &ArgMatches) -> Option<String> {
    let joined = matches
        .get_many::<String>("command")?
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.trim().is_empty()).then_some(joined)
}

async fn interactive(session: &Session) -> Result<u32, ConnectError> {
    let guard = RawModeGuard::enter()?;
    let pty = guard.is_active().then(PtyRequest::from_environment);
    let status = session
        .shell(
            tokio::io::stdin(),
            tokio::io::stdout(),
            tokio::io::stderr(),
            pty,
        )
        .await;
    drop(guard);
    status
}

/// Clamps a remote status to the range a process can exit with.
pub(crate) fn exit_status(status: u32) -> i32 {
    i32::try_from(status.min(255)).unwrap_or(255)
}
