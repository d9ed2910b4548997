//! The `drivecheck run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use drivecheck_core::metrics::format_percent;
use drivecheck_core::report::SessionReport;
use drivecheck_core::script::{GradingScript, Outcome};
use drivecheck_core::session::Session;

use super::resolve_config;

pub fn execute(
    script_path: PathBuf,
    catalog_path: Option<PathBuf>,
    threshold: Option<f64>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(t) = threshold {
        anyhow::ensure!(
            (0.0..=100.0).contains(&t),
            "threshold must be between 0 and 100"
        );
    }

    let config = resolve_config(config_path, catalog_path, threshold, format)?;
    let catalog = Arc::new(config.load_catalog()?);
    let script = GradingScript::from_path(&script_path)?;
    tracing::debug!(
        script = %script_path.display(),
        actions = script.actions.len(),
        "replaying grading script"
    );

    let mut session = Session::with_mode(catalog, config.default_mode);
    let outcomes = script.replay(&mut session)?;

    for (index, outcome) in outcomes.iter().enumerate() {
        if let Outcome::NotReady { remaining } = outcome {
            eprintln!("  action #{}: submit refused, answer {remaining} more", index + 1);
        }
    }

    let report = session.report();
    match config.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_summary(&session, &report),
    }

    Ok(())
}

fn print_summary(session: &Session, report: &SessionReport) {
    let metrics = session.metrics();

    println!(
        "Mode {}: progress {}/{} ({})",
        report.mode,
        report.answered,
        report.total,
        format_percent(metrics.completion_percent)
    );

    if !report.submitted {
        if metrics.can_submit {
            println!(
                "Not submitted. Submit ({} readiness)",
                format_percent(metrics.readiness_percent)
            );
        } else {
            println!("Not submitted. Answer {} more", metrics.remaining());
        }
        return;
    }

    println!(
        "Readiness Score: {} (pass >= {}%) - {}",
        format_percent(metrics.readiness_percent),
        report.pass_threshold_percent,
        report.verdict
    );

    let mut table = Table::new();
    table.set_header(vec!["Category", "Answered", "Yes", "Readiness"]);
    for category in &report.categories {
        table.add_row(vec![
            Cell::new(&category.title),
            Cell::new(format!("{}/{}", category.answered, category.total)),
            Cell::new(category.yes),
            Cell::new(format_percent(category.readiness_percent)),
        ]);
    }
    println!("\n{table}");

    println!("\nStrengths:");
    if report.strengths.is_empty() {
        println!("  No strengths recorded yet.");
    }
    for item in &report.strengths {
        println!("  + {} · {}", item.title, item.category_title);
    }

    println!("\nAreas to improve:");
    if report.improvements.is_empty() {
        println!("  No issues flagged.");
    }
    for item in &report.improvements {
        println!("  - {} · {}", item.title, item.category_title);
    }
}
