//! crates/cli/src/zscp.rs
//! File copies over the SFTP subsystem.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use logging::Logger;
use operand::is_remote;
use sync::{FailurePolicy, SftpFs, SyncEngine, SyncReport, SyncTask};
use tracing::debug;

use crate::client::{connect, init_logging, runtime};
use crate::command::{ZSCP, zscp_command};
use crate::error::CliError;
use crate::exit_code::ExitCode;
use crate::frontend::{parse_arguments, report};
use crate::options::CommonOptions;

/// Direction and endpoints of one copy, as classified from the operands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Plan {
    /// Local sources into a remote destination.
    Push {
        sources: Vec<PathBuf>,
        destination: String,
    },
    /// One remote source into a local destination.
    Pull { source: String, destination: PathBuf },
}

impl Plan {
    /// Classifies `operands`; the last one is the destination.
    pub(crate) fn from_operands(operands: &[OsString]) -> Result<Self, CliError> {
        let Some((destination, sources)) = operands.split_last() else {
            return Err(usage("expected a source and a destination"));
        };
        if sources.is_empty() {
            return Err(usage("expected a source and a destination"));
        }
        let remote_sources = sources.iter().filter(|source| is_remote(source)).count();

        match (remote_sources, is_remote(destination)) {
            (0, true) => Ok(Self::Push {
                sources: sources.iter().map(PathBuf::from).collect(),
                destination: lossy(destination),
            }),
            (0, false) => Err(usage(
                "one side of the copy must be remote ([USER@]TARGET:PATH)",
            )),
            (_, true) => Err(usage("copies between two remote locations are not supported")),
            (1, false) if sources.len() == 1 => Ok(Self::Pull {
                source: lossy(&sources[0]),
                destination: PathBuf::from(destination),
            }),
            (_, false) if remote_sources == sources.len() => Err(usage(
                "copies from a remote host take exactly one source",
            )),
            (_, false) => Err(usage(
                "local and remote sources cannot be mixed in one copy",
            )),
        }
    }

    /// The remote operand of the copy.
    pub(crate) fn remote_operand(&self) -> &str {
        match self {
            Self::Push { destination, .. } => destination,
            Self::Pull { source, .. } => source,
        }
    }

    /// Makes local paths absolute. Push sources must exist.
    pub(crate) fn absolutize(self) -> Result<Self, CliError> {
        match self {
            Self::Push {
                sources,
                destination,
            } => Ok(Self::Push {
                sources: sources
                    .iter()
                    .map(|source| local_source(source))
                    .collect::<Result<_, _>>()?,
                destination,
            }),
            Self::Pull {
                source,
                destination,
            } => Ok(Self::Pull {
                destination: absolute(&destination)?,
                source,
            }),
        }
    }
}

/// Runs `zscp` with `arguments`, returning the process exit code.
pub fn run_zscp<I, T, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let matches = match parse_arguments(zscp_command(), arguments, stdout, stderr) {
        Ok(matches) => matches,
        Err(code) => return code,
    };
    match execute(&matches, stderr) {
        Ok(()) => ExitCode::Ok.as_i32(),
        Err(error) => report(ZSCP, &error, stderr),
    }
}

fn execute<Err: Write>(matches: &ArgMatches, stderr: &mut Err) -> Result<(), CliError> {
    let options = CommonOptions::from_matches(matches);
    let operands: Vec<OsString> = matches
        .get_many::<OsString>("operands")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let recursive = matches.get_flag("recursive");
    let policy = if matches.get_flag("fail-fast") {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };

    let plan = Plan::from_operands(&operands)?.absolutize()?;
    let prepared = options.prepare(plan.remote_operand())?;
    init_logging(ZSCP, prepared.settings.debug(), stderr);
    let logger = Logger::new(ZSCP);

    let runtime = runtime()?;
    let report = runtime.block_on(async {
        let session = connect(&prepared, &logger).await?;
        let fs = SftpFs::new(session.open_sftp().await?);
        let remote_path = prepared.target.path();

        let engine = SyncEngine::new(&fs).logger(logger.child("sync"));
        let outcome = match &plan {
            Plan::Push { sources, .. } => {
                engine
                    .push_sources(sources, remote_path, recursive, policy)
                    .await
            }
            Plan::Pull { destination, .. } => {
                let task = SyncTask::pull(remote_path, destination.clone())
                    .recursive(recursive)
                    .failure_policy(policy);
                engine.run(&task).await
            }
        };

        if let Err(error) = fs.close().await {
            debug!(parent: logger.span(), "closing sftp failed: {}", error);
        }
        if let Err(error) = session.close().await {
            debug!(parent: logger.span(), "disconnect failed: {}", error);
        }
        outcome.map_err(CliError::from)
    });
    runtime.shutdown_background();

    let report: SyncReport = report?;
    debug!(
        parent: logger.span(),
        "{} file(s), {} byte(s) copied", report.files_transferred(), report.bytes_transferred()
    );
    Ok(())
}

fn local_source(path: &Path) -> Result<PathBuf, CliError> {
    let absolute = absolute(path)?;
    fs::symlink_metadata(&absolute).map_err(|source| CliError::LocalSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(absolute)
}

fn absolute(path: &Path) -> Result<PathBuf, CliError> {
    std::path::absolute(path).map_err(|source| CliError::LocalSource {
        path: path.to_path_buf(),
        source,
    })
}

fn lossy(text: &OsStr) -> String {
    text.to_string_lossy().into_owned()
}

fn usage(message: &str) -> CliError {
    CliError::Usage(message.to_owned())
}
