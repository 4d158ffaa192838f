#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `auth` works out which SSH credentials a session may offer: the private
//! key file named on the command line (default `~/.ssh/id_rsa`) and, when
//! one is reachable, the identities held by an SSH agent.
//!
//! # Design
//!
//! [`AuthResolver`] performs discovery on the first call to
//! [`AuthResolver::resolve`] and caches the outcome in a
//! [`tokio::sync::OnceCell`]. Concurrent first callers wait for the same
//! in-flight resolution. Every later call returns a clone of the cached
//! `Arc<[AuthMethod]>` or of the cached [`AuthError`].
//!
//! The key file is classified by [`load_private_key`]: unreadable files,
//! public keys passed by mistake, passphrase-protected keys and unparseable
//! content each map to their own [`AuthError`] variant.
//!
//! # Invariants
//!
//! - Methods are ordered: the key file first, then the agent.
//! - A key-file failure is fatal only when the agent contributes nothing.
//!   Otherwise it is logged at error level and the agent is used alone.
//! - A missing agent is not an error.
//!
//! # Examples
//!
//! ```no_run
//! use auth::{AgentSource, AuthResolver};
//!
//! # async fn demo() -> Result<(), auth::AuthError> {
//! let resolver = AuthResolver::new("/home/ops/.ssh/id_ed25519").agent(AgentSource::Environment);
//! let methods = resolver.resolve().await?;
//! assert!(!methods.is_empty());
//! # Ok(())
//! # }
//! ```

mod agent;
mod error;
mod key;
mod resolver;

#[cfg(test)]
mod tests;

pub use agent::{AgentHandle, AgentSource, DynAgentClient};
pub use error::AuthError;
pub use key::load_private_key;
pub use resolver::{AuthMethod, AuthResolver};
