//! Action outputs (`tag`, `version`, `previous_tag`).
//!
//! GitHub Actions collects step outputs from `key=value` lines appended to the
//! file named by `GITHUB_OUTPUT`. Outside Actions the same lines go to stdout.

use crate::error::Result;
use crate::resolver::Resolution;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Values reported to the surrounding workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutputs {
    pub tag: String,
    pub version: String,
    pub previous_tag: Option<String>,
}

impl ActionOutputs {
    /// Build outputs from a resolution.
    ///
    /// `version` is the tag without its configured prefix, and without the
    /// `v` marker when `strip_leading_v` is set.
    pub fn from_resolution(resolution: &Resolution, strip_leading_v: bool) -> Self {
        ActionOutputs {
            tag: resolution.tag.name(),
            version: resolution.tag.version_string(strip_leading_v),
            previous_tag: resolution.previous.as_ref().map(|tag| tag.name()),
        }
    }

    /// `key=value` lines, one per output
    pub fn render(&self) -> String {
        format!(
            "tag={}\nversion={}\nprevious_tag={}\n",
            self.tag,
            self.version,
            self.previous_tag.as_deref().unwrap_or_default()
        )
    }

    /// Append the outputs to `path`, or print them when no path is given
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(self.render().as_bytes())?;
                tracing::debug!(path = %path.display(), "wrote action outputs");
            }
            None => print!("{}", self.render()),
        }
        Ok(())
    }
}
