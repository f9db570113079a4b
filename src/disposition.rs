//! Filename extraction from `Content-Disposition` headers.
//!
//! Backends do not reliably quote the filename, so two forms are tried: a
//! strict `filename=VALUE` up to the next `;`, then a permissive form which
//! tolerates whitespace around `=` and accepts either a quoted string or a
//! bare token.

use log::debug;

use crate::DEFAULT_FILENAME;

const KEY: &str = "filename";

/// Extract the suggested filename, falling back to [`DEFAULT_FILENAME`].
pub fn filename(header: Option<&str>) -> String {
    header
        .and_then(|value| strict(value).or_else(|| permissive(value)))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_owned())
}

/// `filename=([^;]+)` with every quote removed. The result may be empty
/// when the value consisted only of quotes.
pub fn strict(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();
    let needle = "filename=";

    let mut from = 0;
    while let Some(found) = lower[from..].find(needle) {
        let start = from + found + needle.len();
        let rest = &header[start..];
        let end = rest.find(';').unwrap_or(rest.len());
        if end > 0 {
            let name: String = rest[..end]
                .chars()
                .filter(|c| *c != '"' && *c != '\'')
                .collect();
            let name = name.trim();
            debug!("Extracted filename: {}", name);
            return Some(name.to_owned());
        }
        from = start;
    }

    None
}

/// `filename\s*=\s*(?:(['"])([^'"]+)\1|([^;\s]+))`
pub fn permissive(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();

    let mut from = 0;
    while let Some(found) = lower[from..].find(KEY) {
        let after_key = from + found + KEY.len();
        if let Some(name) = value_after_key(&header[after_key..]) {
            debug!("Extracted filename (alternative): {}", name);
            return Some(name);
        }
        from = after_key;
    }

    None
}

fn value_after_key(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?;
    let rest = rest.trim_start();

    quoted(rest)
        .or_else(|| token(rest))
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
}

fn quoted(rest: &str) -> Option<&str> {
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &rest[quote.len_utf8()..];
    let end = body.find(|c: char| c == '"' || c == '\'')?;
    if end == 0 || !body[end..].starts_with(quote) {
        return None;
    }
    Some(&body[..end])
}

fn token(rest: &str) -> Option<&str> {
    let end = rest
        .find(|c: char| c == ';' || c.is_whitespace())
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}
