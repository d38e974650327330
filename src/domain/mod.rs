//! Domain logic - the tag model, independent of where tags are stored

pub mod prerelease;
pub mod tag;
pub mod version;

pub use prerelease::Prerelease;
pub use tag::{Tag, TagFormat, TagParseError};
pub use version::{BumpKind, Component, Version};
