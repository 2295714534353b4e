//! Report command implementation.

use crate::cli::ReportArgs;
use crate::commands::read_input;
use crate::error::Result;
use crate::output::Formatter;
use regnet_domain::GraphView;
use regnet_risk::{RiskAnalyzer, RiskReport};

/// Execute the report command.
pub fn execute_report(args: ReportArgs, analyzer: &RiskAnalyzer, formatter: &Formatter) -> Result<RiskReport> {
    let raw = read_input(&args.file)?;
    let graph: GraphView = serde_json::from_str(&raw)?;

    let report = analyzer.generate_risk_report(&graph.nodes, &graph.edges);

    println!("{}", formatter.format_risk_report(&report)?);
    Ok(report)
}
