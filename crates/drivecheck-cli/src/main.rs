//! drivecheck CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "drivecheck",
    version,
    about = "Passenger checklist for G2/G practice drives"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the checklist for a test mode
    Checklist {
        /// Test mode: G2 or G (default: configured mode)
        #[arg(long)]
        mode: Option<String>,

        /// Catalog TOML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replay a grading script and print the results
    Run {
        /// Path to the grading script
        #[arg(long)]
        script: PathBuf,

        /// Catalog TOML file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Override the pass threshold percent
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format: text, json, markdown
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Show the quick-reference notes for a test mode
    Reference {
        /// Test mode: G2 or G
        #[arg(long, default_value = "G2")]
        mode: String,
    },

    /// Create starter config, catalog, and grading script
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "drivecheck=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Checklist {
            mode,
            catalog,
            format,
            config,
        } => commands::checklist::execute(mode, catalog, format, config),
        Commands::Run {
            script,
            catalog,
            threshold,
            format,
            config,
        } => commands::run::execute(script, catalog, threshold, format, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Reference { mode } => commands::reference::execute(mode),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
