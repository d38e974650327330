use crate::domain::{Prerelease, Version};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

const REFS_TAGS: &str = "refs/tags/";

/// `[v]MAJOR.MINOR.PATCH[-IDENTIFIER.NUMBER]`, ASCII digits only
const CORE_PATTERN: &str =
    r"^(v)?([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([^.\s]+)\.([0-9]+))?$";

fn core_pattern() -> Option<&'static Regex> {
    static CORE: OnceLock<Option<Regex>> = OnceLock::new();
    CORE.get_or_init(|| Regex::new(CORE_PATTERN).ok()).as_ref()
}

/// Why a tag string is not a candidate
///
/// Returned for tags that belong to another naming scheme. Callers filter
/// these out; only an explicit user-supplied tag turns one into a hard error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagParseError {
    #[error("missing prefix '{0}'")]
    MissingPrefix(String),

    #[error("missing suffix '{0}'")]
    MissingSuffix(String),

    #[error("'{0}' is not [v]MAJOR.MINOR.PATCH[-IDENTIFIER.NUMBER]")]
    Grammar(String),

    #[error("number '{0}' is out of range")]
    OutOfRange(String),

    #[error("prerelease counter must be positive")]
    ZeroPrerelease,
}

/// Tag naming format (e.g. prefix "rel-", suffix "-beta")
///
/// `leading_v` only applies to tags minted from scratch; parsed tags keep
/// whatever marker they had. A prefix that already ends in `v` (such as
/// `v` or `api-v`) supplies the marker itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormat {
    pub prefix: String,
    pub suffix: String,
    pub leading_v: bool,
}

impl TagFormat {
    /// Create a new tag format
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>, leading_v: bool) -> Self {
        TagFormat {
            prefix: prefix.into(),
            suffix: suffix.into(),
            leading_v,
        }
    }

    /// Check whether a tag string is a candidate under this format
    pub fn matches(&self, raw: &str) -> bool {
        Tag::parse(raw, self).is_ok()
    }

    /// Whether a freshly minted tag gets its own `v` marker
    pub fn marker(&self) -> bool {
        self.leading_v && !self.prefix.ends_with('v')
    }

    /// Short human form such as `rel-*-beta`
    pub fn describe(&self) -> String {
        format!("{}*{}", self.prefix, self.suffix)
    }
}

impl Default for TagFormat {
    fn default() -> Self {
        TagFormat::new("", "", true)
    }
}

/// A parsed tag: version plus the literal text around it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub prefix: String,
    pub leading_v: bool,
    pub version: Version,
    pub suffix: String,
}

impl Tag {
    /// Create a tag in the given format
    pub fn new(format: &TagFormat, version: Version) -> Self {
        Tag {
            prefix: format.prefix.clone(),
            leading_v: format.marker(),
            version,
            suffix: format.suffix.clone(),
        }
    }

    /// Same affixes, different version
    pub fn with_version(&self, version: Version) -> Self {
        Tag {
            prefix: self.prefix.clone(),
            leading_v: self.leading_v,
            version,
            suffix: self.suffix.clone(),
        }
    }

    /// Parse a tag string under a format.
    ///
    /// Surrounding whitespace and a leading `refs/tags/` are ignored. The
    /// prefix and suffix must match literally (case-sensitive); numbers are
    /// canonicalised, so `v01.2.3` parses to the same tag as `v1.2.3`.
    pub fn parse(raw: &str, format: &TagFormat) -> Result<Self, TagParseError> {
        let name = raw.trim();
        let name = name.strip_prefix(REFS_TAGS).unwrap_or(name);

        let rest = name
            .strip_prefix(format.prefix.as_str())
            .ok_or_else(|| TagParseError::MissingPrefix(format.prefix.clone()))?;
        let core = rest
            .strip_suffix(format.suffix.as_str())
            .ok_or_else(|| TagParseError::MissingSuffix(format.suffix.clone()))?;

        let captures = core_pattern()
            .and_then(|re| re.captures(core))
            .ok_or_else(|| TagParseError::Grammar(core.to_string()))?;

        let number = |index: usize| -> Result<u64, TagParseError> {
            let digits = captures.get(index).map(|m| m.as_str()).unwrap_or_default();
            digits
                .parse::<u64>()
                .map_err(|_| TagParseError::OutOfRange(digits.to_string()))
        };

        let prerelease = match captures.get(5) {
            Some(identifier) => {
                let counter = number(6)?;
                if counter == 0 {
                    return Err(TagParseError::ZeroPrerelease);
                }
                Some(Prerelease::new(identifier.as_str(), counter))
            }
            None => None,
        };

        Ok(Tag {
            prefix: format.prefix.clone(),
            leading_v: captures.get(1).is_some(),
            version: Version {
                major: number(2)?,
                minor: number(3)?,
                patch: number(4)?,
                prerelease,
            },
            suffix: format.suffix.clone(),
        })
    }

    /// Tag name as it would be created
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// The tag without its prefix. With `strip_leading_v` the `v` marker is
    /// dropped as well; the suffix is always kept.
    pub fn version_string(&self, strip_leading_v: bool) -> String {
        let marker = if self.leading_v && !strip_leading_v {
            "v"
        } else {
            ""
        };
        format!("{}{}{}", marker, self.version, self.suffix)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        if self.leading_v {
            f.write_str("v")?;
        }
        write!(f, "{}{}", self.version, self.suffix)
    }
}
