use std::fmt;

/// Warnings raised while collecting candidate tags.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Listed tag does not follow the configured naming scheme
    MalformedCandidate { tag: String, reason: String },
    /// No existing tag matched; the next tag is minted from 0.0.0
    NoPriorTag { format: String },
    /// Listing stopped at the recent-tags window with tags left unread
    TruncatedHistory { limit: usize },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::MalformedCandidate { tag, reason } => {
                write!(f, "Skipping tag '{}': {}", tag, reason)
            }
            BoundaryWarning::NoPriorTag { format } => {
                write!(
                    f,
                    "No existing tag matches '{}', starting from 0.0.0",
                    format
                )
            }
            BoundaryWarning::TruncatedHistory { limit } => {
                write!(
                    f,
                    "Stopped listing after the {} most recent matching tags (enable fetch_all_tags to scan every page)",
                    limit
                )
            }
        }
    }
}

impl BoundaryWarning {
    /// Malformed candidates are routine in repositories with several tag
    /// schemes, so they are only worth a debug line.
    pub fn is_noise(&self) -> bool {
        matches!(self, BoundaryWarning::MalformedCandidate { .. })
    }
}
