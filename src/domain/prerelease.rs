//! Prerelease segment of a tag, e.g. the `rc.2` in `v1.4.0-rc.2`
//!
//! A prerelease is always an identifier plus a positive counter. Bare
//! identifiers (`-beta`) and multi-part identifiers (`-rc.1.2`) are not part of
//! the grammar this tool manages.

use crate::error::{Result, TaggerError};
use std::fmt;

/// Prerelease identifier with its counter
///
/// Ordering compares the identifier first (byte-wise), then the counter, so
/// `rc.2 > rc.1` and `rc.1 > beta.9`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prerelease {
    /// The identifier, e.g. "rc" or "beta"
    pub identifier: String,
    /// Counter, starting at 1
    pub number: u64,
}

impl Prerelease {
    /// Create a new prerelease segment
    pub fn new(identifier: impl Into<String>, number: u64) -> Self {
        Prerelease {
            identifier: identifier.into(),
            number,
        }
    }

    /// First prerelease for an identifier (`<identifier>.1`)
    pub fn first(identifier: impl Into<String>) -> Self {
        Prerelease::new(identifier, 1)
    }

    /// The next counter value for the same identifier
    pub fn increment(&self) -> Result<Self> {
        let number = self.number.checked_add(1).ok_or_else(|| {
            TaggerError::version(format!(
                "prerelease counter overflow for '{}'",
                self.identifier
            ))
        })?;
        Ok(Prerelease::new(self.identifier.clone(), number))
    }

    /// Whether this prerelease uses the given identifier
    pub fn has_identifier(&self, identifier: &str) -> bool {
        self.identifier == identifier
    }
}

/// Check that a string can be used as a prerelease identifier.
///
/// Identifiers must be non-empty and must not contain `.` (the counter
/// separator) or whitespace.
pub fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        return Err(TaggerError::config("prerelease identifier must not be empty"));
    }
    if identifier.contains('.') || identifier.chars().any(char::is_whitespace) {
        return Err(TaggerError::config(format!(
            "invalid prerelease identifier '{}': dots and whitespace are not allowed",
            identifier
        )));
    }
    Ok(())
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.identifier, self.number)
    }
}
