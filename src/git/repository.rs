use crate::error::{Result, TaggerError};
use crate::git::{TagListing, TagWindow};
use git2::Repository as Git2Repo;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Wrapper around git2::Repository with our trait interface
///
/// Reads and writes tags in a local clone. Nothing is pushed.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn repo(&self) -> MutexGuard<'_, Git2Repo> {
        self.repo.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl super::TagRepository for Git2Repository {
    /// Always exhaustive; `tag_names` comes back alphabetical, not newest
    /// first.
    fn list_tags(&self, _window: Option<&TagWindow>) -> Result<TagListing> {
        let repo = self.repo();
        let tags = repo.tag_names(None)?;

        Ok(TagListing {
            names: tags.iter().flatten().map(|s| s.to_string()).collect(),
            truncated: false,
        })
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        let repo = self.repo();
        let commit = repo
            .revparse_single(target)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| {
                TaggerError::remote_create(name, format!("cannot resolve '{}': {}", target, e))
            })?;

        repo.tag_lightweight(name, commit.as_object(), false)
            .map_err(|e| TaggerError::remote_create(name, e.message()))?;

        tracing::debug!(tag = name, commit = %commit.id(), "created local tag");
        Ok(())
    }
}
