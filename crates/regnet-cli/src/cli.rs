//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Regnet CLI - Build and screen company-registry relationship networks.
#[derive(Debug, Parser)]
#[command(name = "regnet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REGNET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Graph database path (overrides the configuration file)
    #[arg(long, global = true, env = "REGNET_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliFormat {
    /// JSON format (default)
    Json,
    /// Table format
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a registry record from a JSON file
    Ingest(IngestArgs),

    /// Build the relationship network around a company
    Graph(GraphArgs),

    /// Print the risk report of a materialized graph
    Report(ReportArgs),
}

/// Kind of record held by an ingest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    /// Company with seat, executives and shareholders
    Company,
    /// Debt of an already-ingested company
    Debt,
    /// Former name of an already-ingested company
    HistoricalName,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON file with the record ("-" reads stdin)
    pub file: PathBuf,

    /// Registry identifier (overrides the record's own)
    #[arg(short, long)]
    pub registry_id: Option<String>,

    /// Country code (overrides the record's own)
    #[arg(short = 'C', long)]
    pub country: Option<String>,

    /// Record kind
    #[arg(short, long, value_enum, default_value = "company")]
    pub kind: RecordKind,
}

/// Arguments for the graph command.
#[derive(Debug, Parser)]
pub struct GraphArgs {
    /// Registry identifier of the anchor company
    #[arg(short, long)]
    pub registry_id: String,

    /// Country code of the anchor company
    #[arg(short = 'C', long)]
    pub country: String,

    /// Maximum number of related companies
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Rescore nodes and attach the risk summary
    #[arg(long)]
    pub risk: bool,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// JSON file with `nodes` and `edges` ("-" reads stdin)
    pub file: PathBuf,
}
