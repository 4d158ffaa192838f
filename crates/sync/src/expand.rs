//! Remote glob expansion.

use glob::{MatchOptions, Pattern};
use logging::Logger;
use tracing::debug;

use crate::remote::{self, RemoteFs};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Whether `text` contains glob metacharacters.
#[must_use]
pub fn has_magic(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

/// Expands `pattern` against the remote filesystem.
///
/// Matches are sorted. A pattern without metacharacters, an invalid pattern
/// or a pattern with no match yields the literal pattern alone, so a missing
/// path surfaces as a "no such file" error when it is opened.
pub async fn expand(fs: &dyn RemoteFs, pattern: &str, logger: &Logger) -> Vec<String> {
    if !has_magic(pattern) {
        return vec![pattern.to_owned()];
    }

    let mut candidates = vec![if pattern.starts_with('/') {
        "/".to_owned()
    } else {
        String::new()
    }];
    for component in pattern.split('/').filter(|segment| !segment.is_empty()) {
        if !has_magic(component) {
            for candidate in &mut candidates {
                *candidate = remote::join(candidate, component);
            }
            continue;
        }

        let Ok(matcher) = Pattern::new(component) else {
            debug!(parent: logger.span(), "invalid glob '{}', using it literally", pattern);
            return vec![pattern.to_owned()];
        };
        let mut next = Vec::new();
        for candidate in &candidates {
            let Ok(entries) = fs.read_dir(candidate).await else {
                continue;
            };
            let mut names: Vec<String> = entries
                .into_iter()
                .map(|entry| entry.name)
                .filter(|name| {
                    remote::is_plain_name(name) && matcher.matches_with(name, MATCH_OPTIONS)
                })
                .collect();
            names.sort();
            next.extend(names.iter().map(|name| remote::join(candidate, name)));
        }
        candidates = next;
    }

    let mut matches = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if fs.metadata(&candidate).await.is_ok() {
            matches.push(candidate);
        }
    }
    if matches.is_empty() {
        debug!(parent: logger.span(), "glob '{}' matched nothing, using it literally", pattern);
        return vec![pattern.to_owned()];
    }
    matches.sort();
    matches
}
