//! The `drivecheck checklist` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use drivecheck_core::model::{ChecklistDefinition, TestMode};

use super::resolve_config;

pub fn execute(
    mode: Option<String>,
    catalog_path: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path, catalog_path, None, format)?;
    let mode: TestMode = match mode {
        Some(m) => m.parse()?,
        None => config.default_mode,
    };
    let definition = config.load_catalog()?.definition(mode);

    match config.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&definition)?),
        _ => print_definition(&definition),
    }

    Ok(())
}

fn print_definition(definition: &ChecklistDefinition) {
    println!(
        "Checklist {} ({} items, pass >= {}%)",
        definition.mode,
        definition.item_count(),
        definition.pass_threshold_percent
    );

    for category in &definition.categories {
        println!("\n{}", category.title);
        if let Some(description) = &category.description {
            println!("  {description}");
        }
        if category.items.is_empty() {
            println!("  (no items for {})", definition.mode);
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["Item", "Title", "Detail"]);
        for item in &category.items {
            table.add_row(vec![
                Cell::new(&item.id),
                Cell::new(&item.title),
                Cell::new(item.detail.as_deref().unwrap_or("")),
            ]);
        }
        println!("{table}");
    }
}
