//! crates/known_hosts/src/host.rs
//! Peer address normalization.

use crate::error::HostKeyError;

const ANNOTATION_DELIMITERS: [char; 5] = ['(', '#', '?', ',', '/'];

/// Reduces a peer address to the stable name records are keyed by.
///
/// Surrounding whitespace is trimmed and everything from the first inner
/// whitespace or one of `( # ? , /` onwards is dropped. `[name]:port` becomes
/// `name` and a trailing `:port` is removed from plain names. The result is
/// ASCII-lowercased.
pub fn normalize_host(raw: &str) -> Result<String, HostKeyError> {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|ch: char| ch.is_whitespace() || ANNOTATION_DELIMITERS.contains(&ch))
        .unwrap_or(trimmed.len());
    let name = strip_port(&trimmed[..end]);

    if name.is_empty() {
        return Err(HostKeyError::InvalidHost(raw.to_owned()));
    }
    Ok(name.to_ascii_lowercase())
}

fn strip_port(name: &str) -> &str {
    if let Some(bracketed) = name.strip_prefix('[') {
        return bracketed.split_once(']').map_or(bracketed, |(inner, _)| inner);
    }

    match name.rsplit_once(':') {
        Some((host, port))
            if !host.contains(':')
                && !port.is_empty()
                && port.bytes().all(|byte| byte.is_ascii_digit()) =>
        {
            host
        }
        _ => name,
    }
}
