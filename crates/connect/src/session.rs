//! crates/connect/src/session.rs
//! Channel operations on an authenticated connection.

use std::fmt;
use std::io;

use logging::Logger;
use russh::client::Handle;
use russh::{ChannelMsg, ChannelReadHalf, Disconnect};
use russh_sftp::client::SftpSession;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinError;
use tracing::{debug, warn};

use crate::error::ConnectError;
use crate::handler::ClientHandler;
use crate::terminal::terminal_size;

/// Exit status reported when the server closes a channel without one.
const MISSING_EXIT_STATUS: u32 = 255;

/// Extended-data stream number for stderr.
const EXTENDED_STDERR: u32 = 1;

/// Output chunks buffered per stream before the demux stops reading the
/// channel.
const OUTPUT_QUEUE_DEPTH: usize = 32;

/// Terminal parameters for an interactive shell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PtyRequest {
    /// Value for the remote `TERM`.
    pub term: String,
    /// Width in character cells.
    pub columns: u32,
    /// Height in character cells.
    pub rows: u32,
}

impl PtyRequest {
    /// Uses `TERM` (default `xterm`) and the size of the local terminal.
    #[must_use]
    pub fn from_environment() -> Self {
        let term = std::env::var("TERM")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "xterm".to_owned());
        let (columns, rows) = terminal_size();
        Self {
            term,
            columns,
            rows,
        }
    }
}

/// An authenticated SSH connection.
///
/// The session exclusively owns the connection it was established over.
pub struct Session {
    handle: Handle<ClientHandler>,
    user: String,
    peer_address: String,
    logger: Logger,
}

impl Session {
    pub(crate) fn new(
        handle: Handle<ClientHandler>,
        user: String,
        peer_address: String,
        logger: Logger,
    ) -> Self {
        Self {
            handle,
            user,
            peer_address,
            logger,
        }
    }

    /// Authenticated login name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Peer address reported by the dialer.
    #[must_use]
    pub fn peer_address(&self) -> &str {
        &self.peer_address
    }

    /// Whether the transport has gone away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Starts the SFTP subsystem on a new channel.
    pub async fn open_sftp(&self) -> Result<SftpSession, ConnectError> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(ConnectError::Channel)?;
        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(ConnectError::Channel)?;
        debug!(parent: self.logger.span(), "sftp subsystem started");
        Ok(SftpSession::new(channel.into_stream()).await?)
    }

    /// Runs `command` and copies its output to `stdout` and `stderr`.
    ///
    /// Returns the remote exit status once the channel has closed and both
    /// output streams have been fully written.
    pub async fn exec<O, E>(&self, command: &str, stdout: O, stderr: E) -> Result<u32, ConnectError>
    where
        O: AsyncWrite + Unpin + Send + 'static,
        E: AsyncWrite + Unpin + Send + 'static,
    {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(ConnectError::Channel)?;
        debug!(parent: self.logger.span(), "exec: {}", command);
        channel
            .exec(true, command)
            .await
            .map_err(ConnectError::Channel)?;
        let (read_half, write_half) = channel.split();
        write_half.eof().await.map_err(ConnectError::Channel)?;

        let status = self.drain(read_half, stdout, stderr).await?;
        drop(write_half);
        Ok(status)
    }

    /// Runs an interactive shell, forwarding `stdin` until the remote side
    /// closes the channel.
    pub async fn shell<I, O, E>(
        &self,
        mut stdin: I,
        stdout: O,
        stderr: E,
        pty: Option<PtyRequest>,
    ) -> Result<u32, ConnectError>
    where
        I: AsyncRead + Unpin + Send + 'static,
        O: AsyncWrite + Unpin + Send + 'static,
        E: AsyncWrite + Unpin + Send + 'static,
    {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(ConnectError::Channel)?;
        if let Some(pty) = &pty {
            debug!(
                parent: self.logger.span(),
                "requesting pty {} {}x{}", pty.term, pty.columns, pty.rows
            );
            channel
                .request_pty(false, &pty.term, pty.columns, pty.rows, 0, 0, &[])
                .await
                .map_err(ConnectError::Channel)?;
        }
        channel
            .request_shell(true)
            .await
            .map_err(ConnectError::Channel)?;

        let (read_half, write_half) = channel.split();
        let input_logger = self.logger.clone();
        let input = tokio::spawn(async move {
            let mut writer = write_half.make_writer();
            match tokio::io::copy(&mut stdin, &mut writer).await {
                Ok(bytes) => debug!(parent: input_logger.span(), "stdin closed after {} bytes", bytes),
                Err(error) => debug!(parent: input_logger.span(), "stdin forwarding stopped: {}", error),
            }
            let _ = writer.shutdown().await;
            let _ = write_half.eof().await;
        });

        let status = self.drain(read_half, stdout, stderr).await;
        input.abort();
        status
    }

    /// Disconnects politely.
    pub async fn close(self) -> Result<(), ConnectError> {
        debug!(parent: self.logger.span(), "closing session to {}", self.peer_address);
        if self.handle.is_closed() {
            return Ok(());
        }
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(ConnectError::Channel)
    }

    async fn drain<O, E>(
        &self,
        mut read_half: ChannelReadHalf,
        stdout: O,
        stderr: E,
    ) -> Result<u32, ConnectError>
    where
        O: AsyncWrite + Unpin + Send + 'static,
        E: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, out_rx) = mpsc::channel(OUTPUT_QUEUE_DEPTH);
        let (err_tx, err_rx) = mpsc::channel(OUTPUT_QUEUE_DEPTH);
        let out_pump = tokio::spawn(pump(out_rx, stdout));
        let err_pump = tokio::spawn(pump(err_rx, stderr));

        let demux_logger = self.logger.clone();
        let demux = tokio::spawn(async move {
            let mut demux = Demux::new(out_tx, err_tx, demux_logger);
            while let Some(message) = read_half.wait().await {
                if demux.route(message).await == Flow::Closed {
                    break;
                }
            }
            demux.exit_status()
        });

        let (status, out, err) = tokio::join!(demux, out_pump, err_pump);
        let status = status.map_err(join_error)?;
        out.map_err(join_error)??;
        err.map_err(join_error)??;

        Ok(status.unwrap_or_else(|| {
            warn!(parent: self.logger.span(), "remote side sent no exit status");
            MISSING_EXIT_STATUS
        }))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("peer_address", &self.peer_address)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

fn join_error(error: JoinError) -> ConnectError {
    ConnectError::Io(io::Error::other(error.to_string()))
}

/// Copies queued chunks to `writer` until the sender goes away.
async fn pump<W>(mut chunks: Receiver<Vec<u8>>, mut writer: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(chunk) = chunks.recv().await {
        writer.write_all(&chunk).await?;
        writer.flush().await?;
    }
    writer.flush().await
}

#[derive(Debug, Eq, PartialEq)]
enum Flow {
    Open,
    Closed,
}

/// Splits channel messages into stdout and stderr chunks and tracks the exit
/// status.
///
/// A full queue suspends routing, which stops reads from the channel and lets
/// the SSH window throttle the remote writer.
struct Demux {
    stdout: Sender<Vec<u8>>,
    stderr: Sender<Vec<u8>>,
    exit_status: Option<u32>,
    logger: Logger,
}

impl Demux {
    fn new(
        stdout: Sender<Vec<u8>>,
        stderr: Sender<Vec<u8>>,
        logger: Logger,
    ) -> Self {
        Self {
            stdout,
            stderr,
            exit_status: None,
            logger,
        }
    }

    async fn route(&mut self, message: ChannelMsg) -> Flow {
        match message {
            ChannelMsg::Data { data } => {
                let _ = self.stdout.send(data.to_vec()).await;
            }
            ChannelMsg::ExtendedData { data, ext } => {
                if ext != EXTENDED_STDERR {
                    debug!(parent: self.logger.span(), "extended data stream {} routed to stderr", ext);
                }
                let _ = self.stderr.send(data.to_vec()).await;
            }
            ChannelMsg::ExitStatus { exit_status } => {
                debug!(parent: self.logger.span(), "exit status {}", exit_status);
                self.exit_status = Some(exit_status);
            }
            ChannelMsg::ExitSignal {
                signal_name,
                error_message,
                ..
            } => {
                warn!(
                    parent: self.logger.span(),
                    "remote process killed by {:?} {}", signal_name, error_message
                );
                self.exit_status.get_or_insert(MISSING_EXIT_STATUS);
            }
            ChannelMsg::Eof => debug!(parent: self.logger.span(), "remote eof"),
            ChannelMsg::Close => return Flow::Closed,
            _ => {}
        }
        Flow::Open
    }

    fn exit_status(&self) -> Option<u32> {
        self.exit_status
    }
}
