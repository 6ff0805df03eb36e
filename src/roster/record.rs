//! Splits a row's tokens around the identifier into name and major

use super::UNKNOWN_MAJOR;

/// Name is everything before `id_index`, major everything after.
///
/// Tokens are joined with single spaces and otherwise left as-is, so
/// hyphens and punctuation survive. An empty tail yields [`UNKNOWN_MAJOR`].
pub fn split(tokens: &[&str], id_index: usize) -> (String, String) {
    let name = tokens[..id_index.min(tokens.len())].join(" ");
    let major = match tokens.get(id_index + 1..) {
        Some(rest) if !rest.is_empty() => rest.join(" "),
        _ => UNKNOWN_MAJOR.to_string(),
    };
    (name, major)
}
