//! TOML configuration file support.
//!
//! Settings shared by several runs can live in a config file instead of flags:
//!
//! ```toml
//! # nutau.toml
//! [generation]
//! json_root = "json"
//! cut = "muon_free"
//! scan_points = 21
//! energy_bins = 15
//!
//! [io]
//! batch_size = 100000
//! compression_level = 3
//! ```
//!
//! Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for nutau.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Record generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Event file settings.
    #[serde(default)]
    pub io: IoConfig,
}

/// Configuration for the generate and directories commands.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationConfig {
    /// Root of the USER, ANTARES and PARAMETERS directories.
    pub json_root: Option<PathBuf>,

    /// Cut policy name.
    pub cut: Option<String>,

    /// Scan points of fixed mode.
    pub scan_points: Option<usize>,

    /// Log-spaced reconstructed-energy edges.
    pub energy_bins: Option<usize>,
}

/// Configuration for commands reading and writing Parquet event files.
#[derive(Debug, Default, Deserialize)]
pub struct IoConfig {
    /// Rows per record batch when reading.
    pub batch_size: Option<usize>,

    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,
}

impl Config {
    /// Load the file at `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
