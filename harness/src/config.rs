//! Harness configuration file.
//!
//! ```json
//! {
//!   "model":   { "geometry": ..., "materials": [...], "settings": {...} },
//!   "library": { "energy_groups": [0.0, 0.625e-6, 20.0],
//!                "mgxs_types": ["transport", "chi"],
//!                "domain_type": "material" },
//!   "engine":  { "kind": "process", "executable": "transport" },
//!   "statepoint_pattern": "statepoint.10.*",
//!   "link_summary": true,
//!   "hash_output": true
//! }
//! ```
//!
//! Only `model`, `library` and `engine` are required.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engines::EngineConfig;
use crate::error::ConfigError;
use crate::extract::{default_pattern, ExtractOptions};
use crate::library::{Library, LibrarySpec};
use crate::model::BaseModel;
use crate::workdir::matched_reference;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    pub model: BaseModel,
    pub library: LibrarySpec,
    pub engine: EngineConfig,
    /// Result-file pattern; `statepoint.<batches>.*` when absent.
    #[serde(default)]
    pub statepoint_pattern: Option<String>,
    #[serde(default = "default_true")]
    pub link_summary: bool,
    #[serde(default = "default_true")]
    pub hash_output: bool,
}

impl HarnessConfig {
    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise any
    /// error of [`HarnessConfig::from_slice`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_slice(&bytes)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse a configuration document. Structure only; see [`HarnessConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid JSON, unknown keys, or
    /// missing required keys.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse {
            detail: e.to_string(),
        })
    }

    /// Check the model and build the library it describes.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] of [`BaseModel::validate`] or
    /// [`Library::build`], or [`ConfigError::PatternMatchesReference`] when
    /// the result-file pattern would pick up a reference file.
    pub fn validate(&self) -> Result<Library, ConfigError> {
        self.model.validate()?;
        let pattern = self.statepoint_pattern();
        if let Some(reference) = matched_reference(&pattern) {
            return Err(ConfigError::PatternMatchesReference { pattern, reference });
        }
        Library::build(&self.library, &self.model)
    }

    /// The effective result-file pattern.
    #[must_use]
    pub fn statepoint_pattern(&self) -> String {
        self.statepoint_pattern
            .clone()
            .unwrap_or_else(|| default_pattern(self.model.settings.batches))
    }

    /// Extraction options implied by this configuration.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            link_summary: self.link_summary,
            hash_output: self.hash_output,
            ..ExtractOptions::new(self.statepoint_pattern())
        }
    }
}
