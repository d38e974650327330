use crate::domain::Prerelease;
use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Numeric version with an optional prerelease segment
///
/// Ordering is major, minor, patch, then prerelease, where a release sorts
/// after every prerelease of the same triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<Prerelease>,
}

impl Version {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Starting point when a repository has no matching tag yet
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    /// Replace the prerelease segment
    pub fn with_prerelease(mut self, prerelease: Option<Prerelease>) -> Self {
        self.prerelease = prerelease;
        self
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The `(major, minor, patch)` triple
    pub fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Same version with the prerelease dropped
    pub fn release(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Increment one component, resetting the lower ones and dropping the prerelease
    pub fn bump(&self, component: Component) -> Result<Self> {
        let overflow = |name: &str| {
            TaggerError::version(format!("{} component overflow bumping {}", name, self))
        };
        let bumped = match component {
            Component::Major => Version::new(
                self.major.checked_add(1).ok_or_else(|| overflow("major"))?,
                0,
                0,
            ),
            Component::Minor => Version::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(|| overflow("minor"))?,
                0,
            ),
            Component::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(|| overflow("patch"))?,
            ),
        };
        Ok(bumped)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple()
            .cmp(&other.triple())
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Numeric component targeted by a bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Major,
    Minor,
    Patch,
}

/// Kind of bump requested for the next tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Major,
    Minor,
    #[default]
    Patch,
    Prerelease,
}

impl FromStr for BumpKind {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            "prerelease" => Ok(BumpKind::Prerelease),
            other => Err(TaggerError::config(format!(
                "unknown bump kind '{}' (expected major, minor, patch or prerelease)",
                other
            ))),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::Prerelease => "prerelease",
        };
        f.write_str(name)
    }
}
