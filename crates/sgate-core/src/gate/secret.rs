//! Shared secret for the key-gated access policy.

use std::fmt;
use subtle::ConstantTimeEq;

/// Process-wide shared key, loaded once at startup.
///
/// Surrounding whitespace is stripped once at construction; comparison
/// against the stripped value is exact. A blank secret means "not
/// configured": every check against it fails closed. The value never
/// appears in `Debug` output.
#[derive(Clone, Default)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// Constant-time comparison of `presented` against the configured value.
    /// Always false when unconfigured or when `presented` is empty.
    pub fn verify(&self, presented: &str) -> bool {
        if !self.is_configured() || presented.is_empty() {
            return false;
        }
        bool::from(self.0.as_bytes().ct_eq(presented.as_bytes()))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            f.write_str("Secret(<redacted>)")
        } else {
            f.write_str("Secret(<unset>)")
        }
    }
}
