#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `sync` copies files and directory trees between the local machine and a
//! remote filesystem reached through SFTP. A [`SyncTask`] names a direction,
//! the two roots, whether to recurse and what to do on failure; a
//! [`SyncEngine`] executes it against any [`RemoteFs`].
//!
//! # Design
//!
//! - Pushes walk the local tree with [`walk`] and pulls walk the remote tree
//!   with the same visiting order: depth first, entries sorted by name. The
//!   same task against an unchanged tree therefore yields the same
//!   [`PathMapping`] sequence.
//! - A recursive transfer always keeps the source directory's own name:
//!   `foo` pushed to `R` lands in `R/foo`.
//! - Remote directory creation never fails a batch on its own. A file that
//!   cannot be written beneath a directory that could not be created is
//!   reported as [`TransferError::RemoteDirCreateHard`].
//! - Remote paths beginning with `~` are made relative to the login directory
//!   and then resolved through the server; unresolvable paths are used
//!   literally. Pull sources are glob patterns; a pattern without matches is
//!   used literally too.
//! - Transfers are sequential: one walk and one file in flight.
//!
//! # Errors
//!
//! Per-node failures are [`TransferError`]s collected in the [`SyncReport`].
//! Under [`FailurePolicy::Continue`] the batch carries on; under
//! [`FailurePolicy::Abort`] it stops at the first failure. Either way a batch
//! with failures ends in [`SyncError::Partial`].
//!
//! # Examples
//!
//! ```
//! use sync::{MemoryFs, SyncEngine, SyncTask};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let remote = MemoryFs::new();
//! remote.add_file("reports/q3.txt", "revenue");
//! let local = tempfile::tempdir().expect("tempdir");
//!
//! let task = SyncTask::pull("~/reports/q3.txt", local.path());
//! let report = SyncEngine::new(&remote).run(&task).await.expect("pull");
//! assert_eq!(report.files_transferred(), 1);
//! assert_eq!(std::fs::read(local.path().join("q3.txt")).expect("read"), b"revenue");
//! # }
//! ```

mod destination;
mod engine;
mod error;
mod expand;
mod memory;
mod pull;
mod push;
mod remote;
mod report;
mod sftp;
mod task;


pub use destination::{pull_destination, push_destination, sibling_destination};
pub use engine::{SyncEngine, sync};
pub use error::{RemoteError, RemoteErrorKind, SyncError, TransferError};
pub use expand::{expand, has_magic};
pub use memory::MemoryFs;
pub use remote::{
    RemoteEntry, RemoteFs, RemoteMetadata, RemoteReader, basename, dirname, is_plain_name, join,
};
pub use report::{PathMapping, SyncFailure, SyncReport};
pub use sftp::SftpFs;
pub use task::{Direction, FailurePolicy, SyncTask};
