//! Regnet CLI - Command-line interface for the company relationship network.

use clap::Parser;
use regnet_cli::cli::CliFormat;
use regnet_cli::commands;
use regnet_cli::config::OutputFormat;
use regnet_cli::{Cli, Command, Config, Formatter};
use regnet_ingest::RelationshipIngestor;
use regnet_network::GraphExpander;
use regnet_risk::RiskAnalyzer;
use regnet_store::SqliteGraphStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing (log to stderr, stdout carries the JSON output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> regnet_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    // Determine output format
    let format = match cli.format {
        Some(CliFormat::Json) => OutputFormat::Json,
        Some(CliFormat::Table) => OutputFormat::Table,
        None => config.settings.format,
    };
    let formatter = Formatter::new(format, !cli.no_color && config.settings.color);

    // Handle commands
    match cli.command {
        Command::Ingest(args) => {
            let mut store = open_store(&config)?;
            let ingestor = RelationshipIngestor::new(config.ingest.clone());
            commands::execute_ingest(args, &mut store, &ingestor, &formatter)?;
        }
        Command::Graph(args) => {
            let store = open_store(&config)?;
            let expander = GraphExpander::new(config.network.clone());
            let analyzer = RiskAnalyzer::new(config.risk.clone());
            commands::execute_graph(args, &store, &expander, &analyzer, &formatter)?;
        }
        Command::Report(args) => {
            let analyzer = RiskAnalyzer::new(config.risk.clone());
            commands::execute_report(args, &analyzer, &formatter)?;
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> regnet_cli::Result<SqliteGraphStore> {
    info!("Opening graph store at {}", config.database_path.display());
    Ok(SqliteGraphStore::new(&config.database_path)?)
}
