//! CLI configuration
//!
//! Settings come from an optional TOML file; command-line flags override
//! whatever the file sets.
//!
//! ```toml
//! k1 = 1.2
//! b = 0.75
//! top_k = 3
//! format = "text"
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use okapi_core::Bm25Params;
use okapi_engine::PersistFormat;
use serde::Deserialize;
use std::path::Path;

/// Number of results `search` prints when nothing else is configured.
pub const DEFAULT_TOP_K: usize = 3;

/// File stem `build` writes when `--index` is not given.
pub const DEFAULT_INDEX_STEM: &str = "index";

/// On-disk index format selectable from the command line or config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    /// Line-oriented text form
    #[default]
    Text,
    /// JSON form
    Json,
}

impl IndexFormat {
    /// File extension used for default index file names
    pub fn extension(self) -> &'static str {
        match self {
            IndexFormat::Text => "txt",
            IndexFormat::Json => "json",
        }
    }
}

impl From<IndexFormat> for PersistFormat {
    fn from(format: IndexFormat) -> Self {
        match format {
            IndexFormat::Text => PersistFormat::Text,
            IndexFormat::Json => PersistFormat::Json,
        }
    }
}

/// Settings shared by all subcommands
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// BM25 term-frequency saturation
    pub k1: f64,
    /// BM25 length normalization
    pub b: f64,
    /// Results printed by `search`
    pub top_k: usize,
    /// Format written by `build`
    pub format: IndexFormat,
}

impl Default for Config {
    fn default() -> Self {
        let params = Bm25Params::default();
        Config {
            k1: params.k1,
            b: params.b,
            top_k: DEFAULT_TOP_K,
            format: IndexFormat::default(),
        }
    }
}

impl Config {
    /// Load the config file if one is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse TOML config content.
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.params()?;
        Ok(config)
    }

    /// Validated BM25 parameters
    pub fn params(&self) -> Result<Bm25Params> {
        Ok(Bm25Params::new(self.k1, self.b)?)
    }
}
