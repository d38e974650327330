use crate::bump::DEFAULT_PRERELEASE_IDENTIFIER;
use crate::domain::BumpKind;
use crate::error::{Result, TaggerError};
use crate::git::github::DEFAULT_API_URL;
use crate::git::RECENT_TAG_WINDOW;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const LOCAL_CONFIG: &str = "./tagger.toml";
const USER_CONFIG: &str = ".tagger.toml";

/// Represents the complete configuration for release-tagger.
///
/// Every field has a default, so an empty file (or no file) is valid. Values
/// given on the command line or through action inputs take precedence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub bump: BumpConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_true() -> bool {
    true
}

fn default_prerelease_identifier() -> String {
    DEFAULT_PRERELEASE_IDENTIFIER.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_recent_window() -> usize {
    RECENT_TAG_WINDOW
}

/// How tag names are built around the version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,

    /// Put a `v` before the version when no existing tag dictates otherwise
    #[serde(default = "default_true")]
    pub leading_v: bool,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            prefix: String::new(),
            suffix: String::new(),
            leading_v: true,
        }
    }
}

/// Bump defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpConfig {
    #[serde(default)]
    pub default: BumpKind,

    #[serde(default = "default_true")]
    pub prerelease: bool,

    #[serde(default = "default_prerelease_identifier")]
    pub prerelease_identifier: String,
}

impl Default for BumpConfig {
    fn default() -> Self {
        BumpConfig {
            default: BumpKind::Patch,
            prerelease: true,
            prerelease_identifier: default_prerelease_identifier(),
        }
    }
}

/// Which tag store to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Github,
    Local,
}

impl FromStr for Backend {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(Backend::Github),
            "local" => Ok(Backend::Local),
            other => Err(TaggerError::config(format!(
                "unknown backend '{}' (expected github or local)",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Github => f.write_str("github"),
            Backend::Local => f.write_str("local"),
        }
    }
}

/// Tag store settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page through every tag instead of the recent window
    #[serde(default)]
    pub fetch_all_tags: bool,

    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            backend: Backend::Github,
            api_url: default_api_url(),
            fetch_all_tags: false,
            recent_window: RECENT_TAG_WINDOW,
        }
    }
}

/// Controls the reported outputs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Drop the `v` marker from the `version` output
    #[serde(default = "default_true")]
    pub strip_leading_v: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            strip_leading_v: true,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `tagger.toml` in current directory
/// 3. `.tagger.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG).exists() {
        fs::read_to_string(LOCAL_CONFIG)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).map_err(|e| TaggerError::config(e.to_string()))?;
    if config.remote.recent_window == 0 {
        return Err(TaggerError::config("remote.recent_window must be at least 1"));
    }
    Ok(config)
}

/// Parse a boolean-like action input.
///
/// Accepts `1/true/yes/on` and `0/false/no/off` (any case); an empty value is
/// false.
pub fn parse_bool_input(raw: &str) -> std::result::Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tag.prefix, "");
        assert!(config.tag.leading_v);
        assert_eq!(config.bump.default, BumpKind::Patch);
        assert!(config.bump.prerelease);
        assert_eq!(config.bump.prerelease_identifier, "rc");
        assert_eq!(config.remote.backend, Backend::Github);
        assert_eq!(config.remote.recent_window, 100);
        assert!(config.output.strip_leading_v);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config("[bump]\ndefault = \"minor\"\n").unwrap();
        assert_eq!(config.bump.default, BumpKind::Minor);
        assert_eq!(config.bump.prerelease_identifier, "rc");
        assert!(config.bump.prerelease);
    }

    #[test]
    fn test_rejects_unknown_bump_kind() {
        assert!(parse_config("[bump]\ndefault = \"huge\"\n").is_err());
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(parse_config("[remote]\nrecent_window = 0\n").is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("GitHub".parse::<Backend>().unwrap(), Backend::Github);
        assert_eq!("local".parse::<Backend>().unwrap(), Backend::Local);
        assert!("gitlab".parse::<Backend>().is_err());
    }

    #[test]
    fn test_parse_bool_input() {
        for truthy in ["1", "true", "TRUE", "yes", "on", " on "] {
            assert_eq!(parse_bool_input(truthy), Ok(true), "{:?}", truthy);
        }
        for falsy in ["", "0", "false", "No", "off"] {
            assert_eq!(parse_bool_input(falsy), Ok(false), "{:?}", falsy);
        }
        assert!(parse_bool_input("maybe").is_err());
    }
}
