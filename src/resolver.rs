//! Tag resolution: list → parse → select highest → bump → create or simulate.

use crate::boundary::BoundaryWarning;
use crate::bump::{self, BumpRequest};
use crate::domain::{Tag, TagFormat};
use crate::error::Result;
use crate::git::{TagRepository, TagWindow};

/// One resolution run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub bump: BumpRequest,
    /// Compute the tag but do not create it
    pub dry_run: bool,
    /// Commit the new tag points at
    pub target: String,
    /// Number of matching tags to read before listing may stop; `None`
    /// lists every page
    pub window: Option<usize>,
}

/// Outcome of a resolution run
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The new tag
    pub tag: Tag,
    /// Highest existing candidate the new tag was derived from
    pub previous: Option<Tag>,
    /// True when the tag was only computed (dry run)
    pub simulated: bool,
    pub warnings: Vec<BoundaryWarning>,
}

impl Resolution {
    pub fn name(&self) -> String {
        self.tag.name()
    }
}

/// Parse listed tag names, keeping those that follow `format`.
///
/// Names that do not parse are returned as `MalformedCandidate` warnings
/// rather than errors: they usually belong to another naming scheme.
pub fn parse_candidates<I, S>(names: I, format: &TagFormat) -> (Vec<Tag>, Vec<BoundaryWarning>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut candidates = Vec::new();
    let mut skipped = Vec::new();

    for name in names {
        let name = name.as_ref();
        match Tag::parse(name, format) {
            Ok(tag) => candidates.push(tag),
            Err(reason) => skipped.push(BoundaryWarning::MalformedCandidate {
                tag: name.to_string(),
                reason: reason.to_string(),
            }),
        }
    }

    (candidates, skipped)
}

/// Highest candidate by version; affixes do not take part in the comparison.
pub fn select_highest(candidates: &[Tag]) -> Option<&Tag> {
    candidates.iter().max_by(|a, b| a.version.cmp(&b.version))
}

/// Resolves the next tag against a repository backend
pub struct TagResolver<'a, R: TagRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: TagRepository + ?Sized> TagResolver<'a, R> {
    /// Create a resolver over a repository
    pub fn new(repo: &'a R) -> Self {
        TagResolver { repo }
    }

    /// Run one resolution.
    ///
    /// An explicit tag skips the listing entirely. Otherwise every listed tag
    /// is parsed, the highest candidate is bumped, and the result is created
    /// unless the request is a dry run. Creation is attempted once; a failure
    /// is returned as-is.
    pub fn resolve(&self, request: &ResolveRequest) -> Result<Resolution> {
        let format = &request.bump.format;
        let mut warnings = Vec::new();

        let (previous, tag) = match &request.bump.explicit_tag {
            Some(raw) => {
                tracing::info!(tag = raw.as_str(), "using explicit tag");
                (None, bump::explicit_tag(raw, format)?)
            }
            None => {
                let window = request
                    .window
                    .map(|limit| TagWindow::new(format.clone(), limit));
                let listing = self.repo.list_tags(window.as_ref())?;
                tracing::debug!(count = listing.names.len(), "listed existing tags");
                if let Some(window) = window.as_ref().filter(|_| listing.truncated) {
                    warnings.push(BoundaryWarning::TruncatedHistory {
                        limit: window.limit,
                    });
                }

                let (candidates, skipped) = parse_candidates(&listing.names, format);
                for warning in &skipped {
                    tracing::debug!("{}", warning);
                }
                warnings.extend(skipped);

                let previous = select_highest(&candidates).cloned();
                match &previous {
                    Some(tag) => tracing::info!(previous = %tag, "highest matching tag"),
                    None => warnings.push(BoundaryWarning::NoPriorTag {
                        format: format.describe(),
                    }),
                }

                let next = bump::bump(previous.as_ref(), &request.bump)?;
                (previous, next)
            }
        };

        let name = tag.name();
        if request.dry_run {
            tracing::info!(tag = name.as_str(), "dry run, tag not created");
        } else {
            self.repo.create_tag(&name, &request.target)?;
            tracing::info!(tag = name.as_str(), target = request.target.as_str(), "tag created");
        }

        Ok(Resolution {
            tag,
            previous,
            simulated: request.dry_run,
            warnings,
        })
    }
}
