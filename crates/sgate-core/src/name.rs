//! Script name sanitization.
//!
//! Turns an untrusted identifier from a query or path parameter into a
//! [`ScriptName`]: ASCII letters, digits, `_` and `-` only, at most
//! [`MAX_NAME_LEN`] characters. No `.`, `/` or `\` can survive, so a
//! `ScriptName` is always a single, non-traversing path component.

use std::fmt;

/// Maximum length of a sanitized script name, in characters.
pub const MAX_NAME_LEN: usize = 80;

/// Sanitized, filesystem-safe script identifier.
///
/// Only constructible through [`sanitize`]; may be empty (callers treat an
/// empty name as a bad request).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptName(String);

impl ScriptName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScriptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScriptName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Sanitizes a raw identifier.
///
/// - Trims leading/trailing whitespace
/// - Drops every character outside `[A-Za-z0-9_-]`
/// - Truncates to [`MAX_NAME_LEN`] characters
///
/// Total: an all-invalid input yields an empty name.
pub fn sanitize(raw: &str) -> ScriptName {
    // Every kept char is ASCII, so char count == byte count after filtering.
    let name: String = raw
        .trim()
        .chars()
        .filter(|&c| is_allowed(c))
        .take(MAX_NAME_LEN)
        .collect();
    ScriptName(name)
}
