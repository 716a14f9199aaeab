//! Configuration management for family tree projection
use crate::lineage::walker::DEFAULT_MAX_VISITS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub traversal: TraversalSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalSettings {
    /// Upper bound on person visits before a walk is abandoned
    pub max_visits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub pretty: bool,
    pub include_ids: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Outline,
}

impl Default for TraversalSettings {
    fn default() -> Self {
        Self {
            max_visits: DEFAULT_MAX_VISITS,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
            include_ids: false,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "outline" => Ok(Self::Outline),
            other => Err(anyhow::anyhow!("Unknown output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Outline => "outline",
        };
        f.write_str(name)
    }
}

impl TreeConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: TreeConfig =
            serde_yaml::from_str(&content).with_context(|| "Failed to parse configuration file")?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = TreeConfig::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields with any `FAMILY_TREE_*` variables that are set
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(max_visits) = lookup("FAMILY_TREE_MAX_VISITS") {
            self.traversal.max_visits = max_visits
                .parse()
                .context("FAMILY_TREE_MAX_VISITS must be a positive integer")?;
        }

        if let Some(format) = lookup("FAMILY_TREE_FORMAT") {
            self.output.format = format.parse()?;
        }

        if let Some(include_ids) = lookup("FAMILY_TREE_INCLUDE_IDS") {
            self.output.include_ids = include_ids
                .parse()
                .context("FAMILY_TREE_INCLUDE_IDS must be true or false")?;
        }

        Ok(())
    }

    /// Merge with another configuration (other takes precedence where it
    /// differs from the defaults)
    pub fn merge_with(&mut self, other: TreeConfig) {
        let defaults = TreeConfig::default();

        if other.traversal.max_visits != defaults.traversal.max_visits {
            self.traversal.max_visits = other.traversal.max_visits;
        }
        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.pretty != defaults.output.pretty {
            self.output.pretty = other.output.pretty;
        }
        if other.output.include_ids != defaults.output.include_ids {
            self.output.include_ids = other.output.include_ids;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.traversal.max_visits == 0 {
            return Err(anyhow::anyhow!("Traversal max_visits must be greater than 0"));
        }

        Ok(())
    }
}
