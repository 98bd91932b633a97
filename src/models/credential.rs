//! API credential held in memory for the current session.

use std::fmt;

/// Opaque API key supplied by the user.
///
/// The value is never inspected beyond checking that it is non-blank; whether
/// it is actually valid is decided by the search provider. The `Debug`
/// implementation redacts the key so it cannot leak into logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw credential string exactly as the user entered it
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// An unset credential
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether the credential counts as set (non-empty after trimming)
    pub fn is_set(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// The raw value, for handing to the search provider
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Connection badge shown next to the key input
    pub fn status_label(&self) -> &'static str {
        if self.is_set() {
            "Connected"
        } else {
            "Not Connected"
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            f.write_str("Credential(***)")
        } else {
            f.write_str("Credential(<unset>)")
        }
    }
}

impl From<&str> for Credential {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Credential {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<Option<String>> for Credential {
    fn from(raw: Option<String>) -> Self {
        raw.map(Self).unwrap_or_default()
    }
}
