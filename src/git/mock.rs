use crate::error::{Result, TaggerError};
use crate::git::{TagCollector, TagListing, TagRepository, TagWindow};
use std::sync::{Mutex, MutexGuard};

/// Mock repository for testing without a remote
///
/// Tags are listed in insertion order, standing in for a remote's
/// newest-first order, and a window stops the listing the way a paging
/// remote does. Created tags are recorded and also
/// become visible to later listings, so a second run sees the first one's tag.
#[derive(Default)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    tags: Vec<String>,
    created: Vec<(String, String)>,
    list_calls: usize,
    fail_list: Option<ListFailure>,
    fail_create: Option<String>,
}

#[derive(Clone, Copy)]
enum ListFailure {
    Authentication,
    Remote,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository holding the given tags
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let repo = Self::new();
        for tag in tags {
            repo.add_tag(tag);
        }
        repo
    }

    /// Add an existing tag
    pub fn add_tag(&self, name: impl Into<String>) {
        self.state().tags.push(name.into());
    }

    /// Make every listing fail with an authentication error
    pub fn reject_credentials(&self) {
        self.state().fail_list = Some(ListFailure::Authentication);
    }

    /// Make every listing fail with a remote error
    pub fn fail_listing(&self) {
        self.state().fail_list = Some(ListFailure::Remote);
    }

    /// Make tag creation fail with the given remote message
    pub fn fail_create(&self, message: impl Into<String>) {
        self.state().fail_create = Some(message.into());
    }

    /// Tags created so far, as `(name, target)`
    pub fn created(&self) -> Vec<(String, String)> {
        self.state().created.clone()
    }

    /// Number of `list_tags` calls made
    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TagRepository for MockRepository {
    fn list_tags(&self, window: Option<&TagWindow>) -> Result<TagListing> {
        let mut state = self.state();
        state.list_calls += 1;
        match state.fail_list {
            Some(ListFailure::Authentication) => {
                return Err(TaggerError::authentication("mock credentials rejected"))
            }
            Some(ListFailure::Remote) => {
                return Err(TaggerError::remote("mock listing unavailable"))
            }
            None => {}
        }

        let mut collector = TagCollector::new(window);
        let mut truncated = false;
        for tag in &state.tags {
            if !collector.push(tag.as_str()) {
                truncated = true;
                break;
            }
        }
        Ok(collector.finish(truncated))
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        let mut state = self.state();
        if let Some(message) = &state.fail_create {
            return Err(TaggerError::remote_create(name, message.clone()));
        }
        if state.tags.iter().any(|t| t == name) {
            return Err(TaggerError::remote_create(name, "Reference already exists"));
        }
        state.tags.push(name.to_string());
        state.created.push((name.to_string(), target.to_string()));
        Ok(())
    }
}
