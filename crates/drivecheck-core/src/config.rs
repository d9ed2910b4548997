//! drivecheck configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::TestMode;
use crate::parser::parse_catalog;

/// Top-level drivecheck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrivecheckConfig {
    /// Mode a new session starts in.
    #[serde(default = "default_mode")]
    pub default_mode: TestMode,
    /// Catalog TOML file. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Overrides the catalog's pass threshold.
    #[serde(default)]
    pub pass_threshold_percent: Option<f64>,
    /// Output format: text, json, markdown.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_mode() -> TestMode {
    TestMode::G2
}
fn default_format() -> String {
    "text".to_string()
}

impl Default for DrivecheckConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            catalog: None,
            pass_threshold_percent: None,
            format: default_format(),
        }
    }
}

impl DrivecheckConfig {
    /// Build the catalog this configuration points at.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let catalog = match &self.catalog {
            Some(path) => parse_catalog(path)?,
            None => Catalog::builtin(),
        };
        match self.pass_threshold_percent {
            Some(threshold) => Ok(catalog.with_threshold(threshold)?),
            None => Ok(catalog),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `drivecheck.toml` in the current directory
/// 2. `~/.config/drivecheck/config.toml`
///
/// Environment variable overrides: `DRIVECHECK_CATALOG`, `DRIVECHECK_PASS_THRESHOLD`.
pub fn load_config() -> Result<DrivecheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DrivecheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("drivecheck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DrivecheckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DrivecheckConfig::default(),
    };

    if let Ok(catalog) = std::env::var("DRIVECHECK_CATALOG") {
        if !catalog.is_empty() {
            config.catalog = Some(PathBuf::from(catalog));
        }
    }

    if let Ok(threshold) = std::env::var("DRIVECHECK_PASS_THRESHOLD") {
        let value = threshold
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid DRIVECHECK_PASS_THRESHOLD: '{threshold}'"))?;
        config.pass_threshold_percent = Some(value);
    }

    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("drivecheck"))
}
