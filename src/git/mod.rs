//! Tag storage abstraction layer
//!
//! This module provides a trait-based abstraction over the place tags live,
//! allowing the resolver to run against a hosted remote, a local clone, or an
//! in-memory fake.
//!
//! # Overview
//!
//! The primary abstraction is the [TagRepository] trait. The concrete
//! implementations include:
//!
//! - [github::GitHubRepository]: GitHub REST API (tag listing and ref creation)
//! - [repository::Git2Repository]: a local repository through the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! # Usage
//!
//! Code should depend on the [TagRepository] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use release_tagger::git::TagRepository;
//! # fn example<R: TagRepository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let listing = repo.list_tags(None)?;
//! println!("{} tags", listing.names.len());
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod mock;
pub mod repository;

pub use github::GitHubRepository;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagFormat;
use crate::error::Result;

/// Number of tags considered when the full history is not requested
pub const RECENT_TAG_WINDOW: usize = 100;

/// Bounded listing: stop once `limit` names parse under `format`
///
/// Names from other tag schemes are still returned but do not count toward
/// the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagWindow {
    pub format: TagFormat,
    pub limit: usize,
}

impl TagWindow {
    pub fn new(format: TagFormat, limit: usize) -> Self {
        TagWindow { format, limit }
    }
}

/// Names returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagListing {
    pub names: Vec<String>,
    /// Tags were left unread because the window filled up
    pub truncated: bool,
}

/// Accumulates listed names until a window fills up
///
/// Backends feed names in listing order and stop as soon as [push] reports
/// the window is full.
///
/// [push]: TagCollector::push
pub struct TagCollector<'a> {
    window: Option<&'a TagWindow>,
    names: Vec<String>,
    candidates: usize,
}

impl<'a> TagCollector<'a> {
    pub fn new(window: Option<&'a TagWindow>) -> Self {
        TagCollector {
            window,
            names: Vec::new(),
            candidates: 0,
        }
    }

    /// Whether `limit` candidates have been collected
    pub fn is_full(&self) -> bool {
        matches!(self.window, Some(window) if self.candidates >= window.limit)
    }

    /// Keep `name` unless the window is already full.
    ///
    /// Returns `false` when the name was refused; the listing is then
    /// truncated.
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        let name = name.into();
        if let Some(window) = self.window {
            if window.format.matches(&name) {
                self.candidates += 1;
            }
        }
        self.names.push(name);
        true
    }

    pub fn finish(self, truncated: bool) -> TagListing {
        TagListing {
            names: self.names,
            truncated,
        }
    }
}

/// Where existing tags are read from and the new tag is written to
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`.
///
/// ## Error Handling
///
/// Implementations map their underlying failures onto
/// [crate::error::TaggerError]: credential problems become `Authentication`,
/// failed creation becomes `RemoteCreate` with the backend's message kept
/// verbatim.
pub trait TagRepository: Send + Sync {
    /// List tag names.
    ///
    /// With `window` set to `None` the listing is exhaustive (every page is
    /// consumed). With a window, a backend that pages through a remote may
    /// stop once `window.limit` names parsing under `window.format` have been
    /// read, newest first, and sets `truncated` when it left tags unread.
    /// Backends that can list everything cheaply ignore the window.
    ///
    /// # Returns
    /// * `Ok(TagListing)` - Tag names, unparsed
    /// * `Err` - If the backend cannot be read
    fn list_tags(&self, window: Option<&TagWindow>) -> Result<TagListing>;

    /// Create a tag named `name` pointing at `target`.
    ///
    /// Must not overwrite an existing tag; a duplicate is an error.
    ///
    /// # Arguments
    /// * `name` - Full tag name, e.g. "v1.2.0"
    /// * `target` - Commit to tag (a SHA, or any revision the backend accepts)
    fn create_tag(&self, name: &str, target: &str) -> Result<()>;
}

impl<T: TagRepository + ?Sized> TagRepository for Box<T> {
    fn list_tags(&self, window: Option<&TagWindow>) -> Result<TagListing> {
        (**self).list_tags(window)
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        (**self).create_tag(name, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_window(limit: usize) -> TagWindow {
        TagWindow::new(TagFormat::new("rel-", "", false), limit)
    }

    #[test]
    fn test_collector_counts_only_candidates() {
        let window = rel_window(2);
        let mut collector = TagCollector::new(Some(&window));

        assert!(collector.push("nightly-1"));
        assert!(collector.push("rel-1.0.0"));
        assert!(collector.push("nightly-2"));
        assert!(!collector.is_full());
        assert!(collector.push("rel-0.9.0"));
        assert!(collector.is_full());
        assert!(!collector.push("rel-0.8.0"));

        let listing = collector.finish(true);
        assert_eq!(
            listing.names,
            vec!["nightly-1", "rel-1.0.0", "nightly-2", "rel-0.9.0"]
        );
        assert!(listing.truncated);
    }

    #[test]
    fn test_collector_without_window_keeps_everything() {
        let mut collector = TagCollector::new(None);
        for i in 0..500 {
            assert!(collector.push(format!("v0.0.{}", i)));
        }
        assert!(!collector.is_full());
        assert_eq!(collector.finish(false).names.len(), 500);
    }
}
