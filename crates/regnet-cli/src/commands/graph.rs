//! Graph command implementation.

use crate::cli::GraphArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use regnet_domain::GraphView;
use regnet_network::GraphExpander;
use regnet_risk::RiskAnalyzer;
use regnet_store::SqliteGraphStore;

/// Execute the graph command.
pub fn execute_graph(
    args: GraphArgs,
    store: &SqliteGraphStore,
    expander: &GraphExpander,
    analyzer: &RiskAnalyzer,
    formatter: &Formatter,
) -> Result<GraphView> {
    if args.registry_id.trim().is_empty() || args.country.trim().is_empty() {
        return Err(CliError::InvalidInput(
            "registry id and country are required".to_string(),
        ));
    }

    let country = args.country.trim().to_uppercase();
    let registry_id = args.registry_id.trim();

    let mut graph = match args.limit {
        Some(limit) => expander.build_company_graph_with_limit(store, registry_id, &country, limit)?,
        None => expander.build_company_graph(store, registry_id, &country)?,
    };

    let risk = if args.risk {
        Some(analyzer.annotate(&mut graph).summary)
    } else {
        None
    };

    println!("{}", formatter.format_graph(&graph, risk)?);
    Ok(graph)
}
