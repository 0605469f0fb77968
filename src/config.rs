//! Generation configuration
//!
//! Loaded from a YAML file (`bbtgen.yaml` by convention); every field has a
//! default, so an empty file is a valid configuration. CLI flags override
//! file values.
//!
//! ```yaml
//! seed: 42
//! max_depth: 8
//! max_repeats_per_state: 2
//! exclude_initial_to_final: true
//! strict_ranges: false
//! date_field: Date
//! max_pattern_repeat: 5
//! ```

use crate::error::{Error, Result};
use crate::state::{MatrixOptions, SequenceLimits};
use crate::syntax::SyntaxOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationConfig {
    /// Seed for the random source; drawn from entropy and reported when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Maximum transitions in one state sequence
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum occurrences of one state in a sequence
    #[serde(default = "default_max_repeats")]
    pub max_repeats_per_state: usize,

    /// Treat a missing initial→final edge as excluded instead of invalid
    #[serde(default = "default_true")]
    pub exclude_initial_to_final: bool,

    /// Abort when range conditions overlap or are inverted
    #[serde(default)]
    pub strict_ranges: bool,

    /// Field that receives a generated calendar date
    #[serde(default = "default_date_field")]
    pub date_field: String,

    /// Extra repetitions past a pattern quantifier's minimum
    #[serde(default = "default_max_pattern_repeat")]
    pub max_pattern_repeat: u32,
}

fn default_max_depth() -> usize {
    8
}

fn default_max_repeats() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_date_field() -> String {
    "Date".to_string()
}

fn default_max_pattern_repeat() -> u32 {
    5
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: default_max_depth(),
            max_repeats_per_state: default_max_repeats(),
            exclude_initial_to_final: true,
            strict_ranges: false,
            date_field: default_date_field(),
            max_pattern_repeat: default_max_pattern_repeat(),
        }
    }
}

impl GenerationConfig {
    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GenerationConfig = serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".into()));
        }
        if self.max_repeats_per_state == 0 {
            return Err(Error::Config(
                "max_repeats_per_state must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn sequence_limits(&self) -> SequenceLimits {
        SequenceLimits {
            max_depth: self.max_depth,
            max_repeats_per_state: self.max_repeats_per_state,
        }
    }

    pub fn matrix_options(&self) -> MatrixOptions {
        MatrixOptions {
            exclude_initial_to_final: self.exclude_initial_to_final,
        }
    }

    pub fn syntax_options(&self) -> SyntaxOptions {
        SyntaxOptions {
            date_field: self.date_field.clone(),
            max_repeat: self.max_pattern_repeat,
        }
    }
}
