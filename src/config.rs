//! Conversion configuration.
//!
//! Every field has a default, so a missing file or a partial TOML file is
//! valid:
//!
//! ```toml
//! tool_name = "apf-align"
//! log_alignment_mismatches = true
//!
//! [suffixes]
//! annotation = ".apf.json"
//!
//! [reader]
//! include_triggers = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// File name suffixes used to pair annotation files with their companions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suffixes {
    pub annotation: String,
    pub companion: String,
    pub output: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            annotation: ".apf.json".into(),
            companion: ".tok.json".into(),
            output: ".graph.json".into(),
        }
    }
}

/// Which annotation families the reader turns into entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// `timex2` records become `TIM` entities
    pub include_timex: bool,
    /// `value` records become entities with abbreviated types
    pub include_values: bool,
    /// Event mention anchors become `TRIGGER` entity mentions and arguments
    pub include_triggers: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            include_timex: true,
            include_values: true,
            include_triggers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Recorded in the metadata of every emitted annotation set
    pub tool_name: String,
    /// Compare aligned entity mention tokens against the annotation text
    pub log_alignment_mismatches: bool,
    /// Run the entity mention consistency pre-pass
    pub check_consistency: bool,
    pub suffixes: Suffixes,
    pub reader: ReaderConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            tool_name: "apf-align".into(),
            log_alignment_mismatches: true,
            check_consistency: true,
            suffixes: Suffixes::default(),
            reader: ReaderConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Load from a TOML file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
