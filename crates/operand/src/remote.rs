//! crates/operand/src/remote.rs
//! Remote/local classification and home-relative path handling.

use std::ffi::OsStr;

/// Reports whether `arg` names a remote location.
///
/// The first `:` marks the host/path split. It does not count when the text
/// before it contains a path separator, when it completes a single-letter
/// drive prefix, or when the argument starts with a Windows extended prefix.
#[must_use]
pub fn is_remote(arg: &OsStr) -> bool {
    let text = arg.to_string_lossy();

    if has_windows_prefix(&text) {
        return false;
    }

    let Some(colon_index) = text.find(':') else {
        return false;
    };

    let before = &text[..colon_index];
    if before.contains('/') || before.contains('\\') {
        return false;
    }

    if colon_index == 1 && before.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return false;
    }

    true
}

/// Strips the remote home marker from a path.
///
/// `~` becomes the empty path and `~/rest` becomes `rest`; SFTP resolves
/// relative paths against the login directory. Anything else is returned as
/// given.
#[must_use]
pub fn home_relative(path: &str) -> &str {
    if path == "~" {
        return "";
    }
    path.strip_prefix("~/").unwrap_or(path)
}

fn has_windows_prefix(text: &str) -> bool {
    const PREFIXES: [&str; 4] = [r"\\?\", r"\\.\", "//?/", "//./"];
    PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}
