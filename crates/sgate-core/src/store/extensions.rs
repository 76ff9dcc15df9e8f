//! Closed, ordered list of candidate script extensions.

use thiserror::Error;

/// Extensions tried when nothing is configured, in precedence order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".lua", ".txt"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("extension list is empty")]
    Empty,
    #[error("invalid extension {0:?}: expected '.' followed by ASCII letters or digits")]
    Invalid(String),
    #[error("duplicate extension {0:?}")]
    Duplicate(String),
}

/// Ordered candidate suffixes. Earlier entries win when several files exist.
///
/// Each entry is a `.` followed by one or more ASCII alphanumerics, so joining
/// one onto a [`ScriptName`](crate::name::ScriptName) can never leave the
/// scripts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateExtensions(Vec<String>);

impl CandidateExtensions {
    pub fn new<I, S>(exts: I) -> Result<Self, ExtensionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for ext in exts {
            let ext = ext.into();
            let valid = ext.len() > 1
                && ext.starts_with('.')
                && ext[1..].chars().all(|c| c.is_ascii_alphanumeric());
            if !valid {
                return Err(ExtensionError::Invalid(ext));
            }
            if out.contains(&ext) {
                return Err(ExtensionError::Duplicate(ext));
            }
            out.push(ext);
        }
        if out.is_empty() {
            return Err(ExtensionError::Empty);
        }
        Ok(Self(out))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for CandidateExtensions {
    fn default() -> Self {
        Self(DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
    }
}
