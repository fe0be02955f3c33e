//! Configuration file support.
//!
//! A TOML file with a `[generator]` and a `[battery]` section. Missing
//! fields fall back to the reference parameters: an 8-bit register seeded
//! with `0b10011011`, taps `(8, 7, 6, 1)`, block size 128 and pattern
//! length 16.

use crate::analysis::BatteryConfig;
use crate::error::{RandomnessError, Result};
use crate::generator::Lfsr;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Generator parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Initial register contents.
    pub seed: u64,
    /// 1-indexed tap positions.
    pub taps: Vec<u32>,
    /// Register width in bits.
    pub nbits: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0b1001_1011,
            taps: vec![8, 7, 6, 1],
            nbits: 8,
        }
    }
}

impl GeneratorConfig {
    /// Builds a validated generator.
    pub fn build(&self) -> Result<Lfsr> {
        Lfsr::new(self.seed, &self.taps, self.nbits)
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    /// The file parsed but holds out-of-range parameters.
    #[error(transparent)]
    Invalid(#[from] RandomnessError),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[generator]` section.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// `[battery]` section.
    #[serde(default)]
    pub battery: BatteryConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        content.parse()
    }

    /// Validates both sections.
    pub fn validate(&self) -> Result<()> {
        self.generator.build()?;
        self.battery.validate()
    }
}

impl std::str::FromStr for FileConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(s).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
