#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates a local directory tree for `zscp` uploads. Entries are
//! produced depth-first with each directory's children sorted
//! lexicographically, so the same tree always yields the same sequence of
//! remote paths.
//!
//! # Design
//!
//! - [`WalkBuilder`] selects the root, whether the root itself is emitted, and
//!   the [`logging::Logger`] traversal events are attributed to.
//! - [`Walker`] implements [`Iterator`] and yields [`WalkEntry`] values. A
//!   directory entry is always yielded before its children.
//! - Symbolic links are reported as such and never descended into.
//!
//! # Invariants
//!
//! - Relative paths never contain `..` and are empty only for the root.
//! - A directory that cannot be listed produces one [`WalkError`] after its
//!   own entry; traversal then continues with its next sibling. Only a root
//!   that cannot be inspected prevents the walk from starting.
//!
//! # Examples
//!
//! ```
//! use walk::WalkBuilder;
//! use std::fs;
//! use std::path::PathBuf;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("foo");
//! fs::create_dir_all(root.join("bar"))?;
//! fs::write(root.join("a.txt"), b"a")?;
//! fs::write(root.join("bar").join("b.txt"), b"b")?;
//!
//! let paths: Vec<PathBuf> = WalkBuilder::new(&root)
//!     .include_root(false)
//!     .build()?
//!     .map(|entry| entry.map(|entry| entry.relative_path().to_path_buf()))
//!     .collect::<Result<_, walk::WalkError>>()?;
//!
//! assert_eq!(
//!     paths,
//!     [PathBuf::from("a.txt"), PathBuf::from("bar"), PathBuf::from("bar/b.txt")]
//! );
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;


pub use builder::WalkBuilder;
pub use entry::{EntryKind, WalkEntry};
pub use error::WalkError;
pub use walker::Walker;
