use thiserror::Error;

/// Unified error type for release-tagger operations
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Invalid explicit tag '{tag}': {reason}")]
    InvalidExplicitTag { tag: String, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Failed to create tag '{tag}': {message}")]
    RemoteCreate { tag: String, message: String },

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-tagger
pub type Result<T> = std::result::Result<T, TaggerError>;

impl TaggerError {
    /// Create an explicit tag error with the offending value
    pub fn invalid_explicit_tag(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        TaggerError::InvalidExplicitTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create an authentication error with context
    pub fn authentication(msg: impl Into<String>) -> Self {
        TaggerError::Authentication(msg.into())
    }

    /// Create a tag creation error, keeping the remote message verbatim
    pub fn remote_create(tag: impl Into<String>, message: impl Into<String>) -> Self {
        TaggerError::RemoteCreate {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        TaggerError::Remote(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TaggerError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TaggerError::Version(msg.into())
    }
}
