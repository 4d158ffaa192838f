//! crates/operand/src/user.rs
//! Local account name lookup.

/// Returns the name of the account running this process.
///
/// Windows account names of the form `DOMAIN\user` are reduced to `user`.
#[must_use]
pub fn current_user() -> Option<String> {
    lookup().map(|name| strip_domain(&name).to_owned())
}

/// Keeps only the part of `name` after the last backslash.
#[must_use]
pub fn strip_domain(name: &str) -> &str {
    name.rsplit_once('\\').map_or(name, |(_, user)| user)
}

#[cfg(unix)]
fn lookup() -> Option<String> {
    uzers::get_current_username()
        .and_then(|name| name.into_string().ok())
        .or_else(|| std::env::var("USER").ok())
        .filter(|name| !name.is_empty())
}

#[cfg(not(unix))]
fn lookup() -> Option<String> {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .ok()
        .filter(|name| !name.is_empty())
}
