//! Cleaning configuration file support.
//!
//! This module reads pipeline settings from a TOML file. Every key is
//! optional; missing keys fall back to the defaults of [`CleaningConfig`].
//!
//! ```toml
//! [pipeline]
//! reject_empty_input = true
//! reject_null_timestamps = false
//! utc_offset_minutes = 0
//! validate = true
//!
//! [pipeline.policies]
//! email = "max"
//! updated = "last"
//!
//! [output]
//! format = "jsonl"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{CleaningError, CleaningResult};
use crate::io::loaders::RecordFormat;
use crate::preprocessing::pipeline::CleaningConfig;
use crate::transformations::CollisionPolicies;

/// Cleaning configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSettings {
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Pipeline behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default)]
    pub policies: CollisionPolicies,
    #[serde(default = "default_true")]
    pub reject_empty_input: bool,
    #[serde(default)]
    pub reject_null_timestamps: bool,
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_true")]
    pub validate: bool,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_format")]
    pub format: String,
}

fn default_true() -> bool {
    true
}

fn default_output_format() -> String {
    "json".to_string()
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            policies: CollisionPolicies::default(),
            reject_empty_input: default_true(),
            reject_null_timestamps: false,
            utc_offset_minutes: 0,
            validate: default_true(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

impl CleaningSettings {
    /// Load cleaning configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(CleaningSettings)` if successful
    /// * `Err(CleaningError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> CleaningResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CleaningError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse cleaning configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CleaningResult<Self> {
        toml::from_str(content).map_err(|e| {
            CleaningError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load cleaning configuration from the default location.
    ///
    /// Searches for `cleaning.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(Some(CleaningSettings))` if found and parsed successfully
    /// * `Ok(None)` if no config file exists in any location
    /// * `Err(CleaningError)` if a config file exists but cannot be read or parsed
    pub fn from_default_location() -> CleaningResult<Option<Self>> {
        Self::from_first_existing(&[
            PathBuf::from("cleaning.toml"),
            PathBuf::from("rust_backend/cleaning.toml"),
            PathBuf::from("../cleaning.toml"),
        ])
    }

    /// Load the first of `search_paths` that exists.
    ///
    /// Later paths are not consulted once one exists, even if it fails to parse.
    pub fn from_first_existing<P: AsRef<Path>>(search_paths: &[P]) -> CleaningResult<Option<Self>> {
        for path in search_paths {
            let path = path.as_ref();
            if path.exists() {
                log::debug!("Using cleaning config {}", path.display());
                return Self::from_file(path).map(Some);
            }
        }

        Ok(None)
    }

    /// Build the pipeline configuration.
    pub fn to_pipeline_config(&self) -> CleaningConfig {
        CleaningConfig {
            policies: self.pipeline.policies,
            reject_empty_input: self.pipeline.reject_empty_input,
            reject_null_timestamps: self.pipeline.reject_null_timestamps,
            utc_offset_minutes: self.pipeline.utc_offset_minutes,
            validate: self.pipeline.validate,
        }
    }

    /// Get the configured output format.
    pub fn output_format(&self) -> CleaningResult<RecordFormat> {
        self.output
            .format
            .parse()
            .map_err(CleaningError::Configuration)
    }
}
