//! TOML checklist catalog parser.
//!
//! Loads catalogs from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::{Catalog, CategoryExtras, PASS_THRESHOLD_PERCENT};
use crate::model::{ChecklistCategory, ChecklistItem, TestMode};

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    catalog: TomlCatalogHeader,
    #[serde(default)]
    categories: Vec<TomlCategory>,
    #[serde(default)]
    extras: Vec<TomlExtras>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    #[serde(default = "default_threshold")]
    pass_threshold_percent: f64,
}

impl Default for TomlCatalogHeader {
    fn default() -> Self {
        Self {
            pass_threshold_percent: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    PASS_THRESHOLD_PERCENT
}

#[derive(Debug, Deserialize)]
struct TomlCategory {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlExtras {
    category: String,
    #[serde(default)]
    items: Vec<TomlItem>,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: String,
    title: String,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    modes: Option<Vec<String>>,
}

impl TomlItem {
    fn into_item(self) -> Result<ChecklistItem> {
        let modes = self
            .modes
            .map(|modes| {
                modes
                    .iter()
                    .map(|m| m.parse::<TestMode>())
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()
            .with_context(|| format!("item '{}'", self.id))?;

        Ok(ChecklistItem {
            id: self.id,
            title: self.title,
            detail: self.detail,
            modes,
        })
    }
}

fn convert_items(items: Vec<TomlItem>) -> Result<Vec<ChecklistItem>> {
    items.into_iter().map(TomlItem::into_item).collect()
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let categories = parsed
        .categories
        .into_iter()
        .map(|c| {
            Ok(ChecklistCategory {
                id: c.id,
                title: c.title,
                description: c.description,
                items: convert_items(c.items)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let extras = parsed
        .extras
        .into_iter()
        .map(|e| {
            Ok(CategoryExtras {
                category_id: e.category,
                items: convert_items(e.items)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Catalog::new(categories, extras, parsed.catalog.pass_threshold_percent)
        .with_context(|| format!("invalid catalog: {}", source_path.display()))
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            catalogs.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The mode the warning applies to, if it is mode-specific.
    pub mode: Option<TestMode>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_categories = HashSet::new();
    for category in catalog.categories() {
        if !seen_categories.insert(category.id.as_str()) {
            warnings.push(ValidationWarning {
                mode: None,
                message: format!("duplicate category ID: {}", category.id),
            });
        }
        if category.title.trim().is_empty() {
            warnings.push(ValidationWarning {
                mode: None,
                message: format!("category '{}' has an empty title", category.id),
            });
        }
        for item in &category.items {
            if item.title.trim().is_empty() {
                warnings.push(ValidationWarning {
                    mode: None,
                    message: format!("item '{}' has an empty title", item.id),
                });
            }
            if item.modes.as_ref().is_some_and(|m| m.is_empty()) {
                warnings.push(ValidationWarning {
                    mode: None,
                    message: format!("item '{}' applies to no mode", item.id),
                });
            }
        }
    }

    for mode in TestMode::ALL {
        let definition = catalog.definition(mode);

        for category in &definition.categories {
            if category.items.is_empty() {
                warnings.push(ValidationWarning {
                    mode: Some(mode),
                    message: format!("category '{}' has no items", category.id),
                });
            }
        }

        if definition.item_count() == 0 {
            warnings.push(ValidationWarning {
                mode: Some(mode),
                message: "checklist is empty and can never be submitted".into(),
            });
        }
    }

    warnings
}
