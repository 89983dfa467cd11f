// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [output]
/// dir = "target/docdag"
/// repository = "/home/me/.m2/repository"
///
/// [probe]
/// timeout_secs = 10
/// offline = false
///
/// [[override]]
/// dependency = "com.google.guava:guava"
/// url = "https://guava.dev/releases/@version/api/docs/"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Output layout from `[output]`.
    #[serde(default)]
    pub output: OutputSection,

    /// Probe behaviour from `[probe]`.
    #[serde(default)]
    pub probe: ProbeSection,

    /// Ordered url overrides from `[[override]]` entries.
    #[serde(default, rename = "override")]
    pub overrides: Vec<UrlOverride>,
}

/// Validated configuration. Constructed through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub output: OutputSection,
    pub probe: ProbeSection,
    pub overrides: Vec<UrlOverride>,
}

impl ConfigFile {
    /// Used by `validate.rs` once the raw config has passed checks.
    pub(crate) fn new_unchecked(
        output: OutputSection,
        probe: ProbeSection,
        overrides: Vec<UrlOverride>,
    ) -> Self {
        Self {
            output,
            probe,
            overrides,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Directory (relative to each module) where per-artifact documentation
    /// trees and fetched indices are kept.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Local artifact repository root. If unset, `run()` falls back to
    /// `$HOME/.m2/repository`.
    #[serde(default)]
    pub repository: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target/docdag")
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            repository: None,
        }
    }
}

/// `[probe]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSection {
    /// Connect/read timeout for remote existence checks and fetches.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip all remote probing; aggregate from local state only.
    #[serde(default)]
    pub offline: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            offline: false,
        }
    }
}

/// One `[[override]]` entry: an explicit documentation base url for a
/// dependency coordinate.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UrlOverride {
    /// `group:artifact` coordinate the override applies to.
    pub dependency: String,

    /// Documentation base url; may contain an `@version` token replaced by
    /// the resolved artifact version.
    pub url: String,
}
