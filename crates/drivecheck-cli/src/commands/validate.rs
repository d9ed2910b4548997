//! The `drivecheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use drivecheck_core::model::TestMode;
use drivecheck_core::parser::{load_catalog_directory, parse_catalog, validate_catalog};

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalogs = if catalog_path.is_dir() {
        load_catalog_directory(&catalog_path)?
    } else {
        vec![parse_catalog(&catalog_path)?]
    };

    let mut total_warnings = 0;

    for catalog in &catalogs {
        let counts: Vec<String> = TestMode::ALL
            .iter()
            .map(|&mode| format!("{mode}: {} items", catalog.definition(mode).item_count()))
            .collect();
        println!(
            "Catalog: {} categories ({})",
            catalog.categories().len(),
            counts.join(", ")
        );

        let warnings = validate_catalog(catalog);
        for w in &warnings {
            let prefix = w
                .mode
                .map(|mode| format!("  [{mode}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
