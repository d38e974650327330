//! Next-version arithmetic
//!
//! Pure functions: given the highest existing tag (if any) and a bump request,
//! compute the tag to create. Nothing here talks to a repository.

use crate::domain::prerelease::validate_identifier;
use crate::domain::{BumpKind, Component, Prerelease, Tag, TagFormat, Version};
use crate::error::{Result, TaggerError};

/// Identifier used when prerelease numbering is enabled without naming one
pub const DEFAULT_PRERELEASE_IDENTIFIER: &str = "rc";

/// Whether new tags get a prerelease segment, and which identifier it uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrereleaseSetting {
    pub enabled: bool,
    pub identifier: String,
}

impl PrereleaseSetting {
    /// Create a setting, validating the identifier
    pub fn new(enabled: bool, identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(PrereleaseSetting {
            enabled,
            identifier,
        })
    }

    /// Releases only
    pub fn disabled() -> Self {
        PrereleaseSetting {
            enabled: false,
            identifier: DEFAULT_PRERELEASE_IDENTIFIER.to_string(),
        }
    }

    /// Resolve the action's `prereleaseIdentifier` input.
    ///
    /// The input doubles as a switch and a name: `true`/`false` toggle
    /// prerelease numbering with `default_identifier`, any other value enables
    /// it under that identifier.
    pub fn from_action_input(raw: &str, default_identifier: &str) -> Result<Self> {
        let value = raw.trim();
        match value.to_lowercase().as_str() {
            "" | "true" => PrereleaseSetting::new(true, default_identifier),
            "false" => PrereleaseSetting::new(false, default_identifier),
            _ => PrereleaseSetting::new(true, value),
        }
    }
}

impl Default for PrereleaseSetting {
    fn default() -> Self {
        PrereleaseSetting {
            enabled: true,
            identifier: DEFAULT_PRERELEASE_IDENTIFIER.to_string(),
        }
    }
}

/// Everything the bumper needs to mint the next tag
#[derive(Debug, Clone, PartialEq)]
pub struct BumpRequest {
    pub kind: BumpKind,
    pub prerelease: PrereleaseSetting,
    /// User-supplied tag that replaces the computed one
    pub explicit_tag: Option<String>,
    pub format: TagFormat,
}

impl BumpRequest {
    pub fn new(kind: BumpKind, prerelease: PrereleaseSetting, format: TagFormat) -> Self {
        BumpRequest {
            kind,
            prerelease,
            explicit_tag: None,
            format,
        }
    }

    pub fn with_explicit_tag(mut self, tag: impl Into<String>) -> Self {
        self.explicit_tag = Some(tag.into());
        self
    }
}

/// Validate a user-supplied tag against the configured format.
///
/// Unlike listed candidates, a tag the user typed must parse; anything else
/// aborts the run.
pub fn explicit_tag(raw: &str, format: &TagFormat) -> Result<Tag> {
    Tag::parse(raw, format)
        .map_err(|e| TaggerError::invalid_explicit_tag(raw.trim(), e.to_string()))
}

/// Compute the next tag.
///
/// Rules:
/// - **Major / Minor / Patch**: increment that component, reset lower ones,
///   drop any prerelease
/// - **Prerelease**: target the release slot of the current prerelease, or the
///   next patch when the current tag is a release
/// - With prerelease enabled, a current prerelease with the same identifier and
///   the same triple as the target has its counter advanced; otherwise the
///   target gets `<identifier>.1`
///
/// No current tag behaves like bumping from `0.0.0` in the request's format.
/// An explicit tag in the request bypasses all of this.
///
/// # Example
/// ```ignore
/// let current = Tag::parse("v1.2.3-rc.1", &format)?;
/// let next = bump(Some(&current), &request)?; // Prerelease kind, "rc" enabled
/// assert_eq!(next.to_string(), "v1.2.3-rc.2");
/// ```
pub fn bump(current: Option<&Tag>, request: &BumpRequest) -> Result<Tag> {
    if let Some(raw) = &request.explicit_tag {
        return explicit_tag(raw, &request.format);
    }

    let base = current
        .map(|tag| tag.version.clone())
        .unwrap_or_else(Version::zero);

    let target = match request.kind {
        BumpKind::Major => base.bump(Component::Major)?,
        BumpKind::Minor => base.bump(Component::Minor)?,
        BumpKind::Patch => base.bump(Component::Patch)?,
        BumpKind::Prerelease if base.is_prerelease() => base.release(),
        BumpKind::Prerelease => base.bump(Component::Patch)?,
    };

    let version = if request.prerelease.enabled {
        let identifier = &request.prerelease.identifier;
        let next = match base.prerelease.as_ref() {
            Some(existing)
                if existing.has_identifier(identifier) && base.triple() == target.triple() =>
            {
                existing.increment()?
            }
            _ => Prerelease::first(identifier.as_str()),
        };
        target.with_prerelease(Some(next))
    } else {
        target
    };

    Ok(match current {
        Some(tag) => tag.with_version(version),
        None => Tag::new(&request.format, version),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format() -> TagFormat {
        TagFormat::new("", "", false)
    }

    fn request(kind: BumpKind, prerelease: bool) -> BumpRequest {
        let setting = if prerelease {
            PrereleaseSetting::default()
        } else {
            PrereleaseSetting::disabled()
        };
        BumpRequest::new(kind, setting, format())
    }

    fn tag(raw: &str) -> Tag {
        Tag::parse(raw, &format()).unwrap()
    }

    fn next(current: Option<&str>, kind: BumpKind, prerelease: bool) -> String {
        let current = current.map(tag);
        bump(current.as_ref(), &request(kind, prerelease))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_release_bumps() {
        assert_eq!(next(Some("1.2.3"), BumpKind::Major, false), "2.0.0");
        assert_eq!(next(Some("1.2.3"), BumpKind::Minor, false), "1.3.0");
        assert_eq!(next(Some("1.2.3"), BumpKind::Patch, false), "1.2.4");
    }

    #[test]
    fn test_release_bumps_drop_prerelease() {
        assert_eq!(next(Some("1.2.3-rc.4"), BumpKind::Major, false), "2.0.0");
        assert_eq!(next(Some("1.2.3-rc.4"), BumpKind::Minor, false), "1.3.0");
        assert_eq!(next(Some("1.2.3-rc.4"), BumpKind::Patch, false), "1.2.4");
    }

    #[test]
    fn test_no_prior_tag_starts_from_zero() {
        assert_eq!(next(None, BumpKind::Patch, false), "0.0.1");
        assert_eq!(next(None, BumpKind::Minor, false), "0.1.0");
        assert_eq!(next(None, BumpKind::Major, false), "1.0.0");
    }

    #[test]
    fn test_no_prior_tag_with_prerelease() {
        assert_eq!(next(None, BumpKind::Patch, true), "0.0.1-rc.1");
        assert_eq!(next(None, BumpKind::Prerelease, true), "0.0.1-rc.1");
    }

    #[test]
    fn test_no_prior_tag_uses_request_format() {
        let request = BumpRequest::new(
            BumpKind::Minor,
            PrereleaseSetting::disabled(),
            TagFormat::new("rel-", "-beta", true),
        );
        assert_eq!(bump(None, &request).unwrap().to_string(), "rel-v0.1.0-beta");
    }

    #[test]
    fn test_prerelease_counter_advances_on_matching_triple() {
        assert_eq!(
            next(Some("1.2.3-rc.1"), BumpKind::Prerelease, true),
            "1.2.3-rc.2"
        );
        assert_eq!(
            next(Some("1.2.3-rc.9"), BumpKind::Prerelease, true),
            "1.2.3-rc.10"
        );
    }

    #[test]
    fn test_prerelease_kind_on_release_patches_first() {
        assert_eq!(next(Some("1.2.3"), BumpKind::Prerelease, true), "1.2.4-rc.1");
    }

    #[test]
    fn test_prerelease_kind_with_other_identifier_restarts_counter() {
        assert_eq!(
            next(Some("1.2.3-beta.4"), BumpKind::Prerelease, true),
            "1.2.3-rc.1"
        );
    }

    #[test]
    fn test_prerelease_kind_disabled_finalises_prerelease() {
        assert_eq!(next(Some("1.2.3-rc.2"), BumpKind::Prerelease, false), "1.2.3");
        assert_eq!(next(Some("1.2.3"), BumpKind::Prerelease, false), "1.2.4");
    }

    #[test]
    fn test_prerelease_enabled_with_component_bump_starts_new_counter() {
        assert_eq!(next(Some("1.2.3-rc.1"), BumpKind::Patch, true), "1.2.4-rc.1");
        assert_eq!(next(Some("1.2.3"), BumpKind::Minor, true), "1.3.0-rc.1");
        assert_eq!(next(Some("1.2.3-rc.3"), BumpKind::Major, true), "2.0.0-rc.1");
    }

    #[test]
    fn test_bump_keeps_current_affixes() {
        let format = TagFormat::new("rel-", "", false);
        let current = Tag::parse("rel-v1.1.0", &format).unwrap();
        let request = BumpRequest::new(BumpKind::Minor, PrereleaseSetting::disabled(), format);
        assert_eq!(
            bump(Some(&current), &request).unwrap().to_string(),
            "rel-v1.2.0"
        );
    }

    #[test]
    fn test_component_bumps_are_monotonic() {
        for raw in ["0.0.0", "1.2.3", "1.2.3-rc.7", "9.0.0-alpha.1"] {
            let current = tag(raw);
            for kind in [BumpKind::Major, BumpKind::Minor, BumpKind::Patch] {
                for prerelease in [false, true] {
                    let bumped = bump(Some(&current), &request(kind, prerelease)).unwrap();
                    assert!(
                        bumped.version > current.version,
                        "{} -> {} ({}, prerelease={})",
                        raw,
                        bumped,
                        kind,
                        prerelease
                    );
                }
            }
        }
    }

    #[test]
    fn test_explicit_tag_bypasses_arithmetic() {
        let current = tag("5.0.0");
        let request = request(BumpKind::Major, true).with_explicit_tag("v9.9.9");
        assert_eq!(
            bump(Some(&current), &request).unwrap().to_string(),
            "v9.9.9"
        );
    }

    #[test]
    fn test_invalid_explicit_tag_is_fatal() {
        let request = request(BumpKind::Patch, false).with_explicit_tag("release-candidate");
        let err = bump(None, &request).unwrap_err();
        assert!(matches!(err, TaggerError::InvalidExplicitTag { .. }));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let current = tag("18446744073709551615.0.0");
        assert!(bump(Some(&current), &request(BumpKind::Major, false)).is_err());
    }

    #[test]
    fn test_action_input_true_false() {
        let on = PrereleaseSetting::from_action_input("true", "rc").unwrap();
        assert!(on.enabled);
        assert_eq!(on.identifier, "rc");

        let off = PrereleaseSetting::from_action_input("FALSE", "rc").unwrap();
        assert!(!off.enabled);
    }

    #[test]
    fn test_action_input_names_identifier() {
        let setting = PrereleaseSetting::from_action_input("beta", "rc").unwrap();
        assert!(setting.enabled);
        assert_eq!(setting.identifier, "beta");
    }

    #[test]
    fn test_action_input_rejects_bad_identifier() {
        assert!(PrereleaseSetting::from_action_input("rc.1", "rc").is_err());
    }
}
