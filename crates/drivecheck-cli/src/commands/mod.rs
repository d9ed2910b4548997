pub mod checklist;
pub mod init;
pub mod reference;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use drivecheck_core::config::{load_config_from, DrivecheckConfig};

/// Load the config file and apply command-line overrides on top of it.
pub(crate) fn resolve_config(
    config_path: Option<PathBuf>,
    catalog: Option<PathBuf>,
    threshold: Option<f64>,
    format: Option<String>,
) -> Result<DrivecheckConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if catalog.is_some() {
        config.catalog = catalog;
    }
    if threshold.is_some() {
        config.pass_threshold_percent = threshold;
    }
    if let Some(format) = format {
        config.format = format;
    }
    Ok(config)
}
