//! Two-hop company network expansion

use crate::{ExpanderConfig, NetworkError};
use regnet_domain::identity::company_id;
use regnet_domain::traits::GraphStore;
use regnet_domain::{EdgeType, GraphView, ViewEdge, ViewNode};
use std::collections::HashSet;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Builds the network around an anchor company
///
/// The network is the anchor's 1-hop neighbourhood plus the 1-hop
/// neighbourhoods of every company in the same country that shares a
/// director or owner with it.
///
/// # Examples
///
/// ```no_run
/// use regnet_network::{ExpanderConfig, GraphExpander};
/// use regnet_store::SqliteGraphStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteGraphStore::new("regnet.db")?;
/// let expander = GraphExpander::new(ExpanderConfig::default());
///
/// let graph = expander.build_company_graph(&store, "123", "SK")?;
/// println!(
///     "{} nodes, {} related companies",
///     graph.nodes.len(),
///     graph.summary.same_person_or_owner_companies.unwrap_or(0)
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphExpander {
    config: ExpanderConfig,
}

impl GraphExpander {
    /// Create a new expander with the given configuration
    pub fn new(config: ExpanderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Anchor node, its outgoing edges and their target nodes
    ///
    /// Edges are kept even when their target node is missing from the store;
    /// an unknown company with no edges yields an empty view.
    pub fn base_graph<S>(&self, store: &S, company_node_id: &str) -> Result<GraphView, NetworkError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let mut graph = GraphView::new();
        let mut seen = HashSet::new();

        if let Some(center) = store.get_node(company_node_id).map_err(store_error)? {
            seen.insert(center.id.clone());
            graph.nodes.push(ViewNode::from(center));
        }

        for edge in store.get_edges_from(company_node_id).map_err(store_error)? {
            if seen.insert(edge.target.clone()) {
                if let Some(target) = store.get_node(&edge.target).map_err(store_error)? {
                    graph.nodes.push(ViewNode::from(target));
                }
            }
            graph.edges.push(ViewEdge::from(edge));
        }

        Ok(graph)
    }

    /// Build the network for `registry_id` with the configured sibling limit
    pub fn build_company_graph<S>(
        &self,
        store: &S,
        registry_id: &str,
        country: &str,
    ) -> Result<GraphView, NetworkError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        self.build_company_graph_with_limit(
            store,
            registry_id,
            country,
            self.config.limit_related_per_anchor,
        )
    }

    /// Build the network for `registry_id`, merging at most `limit` sibling companies
    pub fn build_company_graph_with_limit<S>(
        &self,
        store: &S,
        registry_id: &str,
        country: &str,
        limit: usize,
    ) -> Result<GraphView, NetworkError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let anchor = company_id(country, registry_id);
        let mut graph = self.base_graph(store, &anchor)?;
        graph.summary.same_person_or_owner_companies = Some(0);

        // Directors and owners of the anchor
        let related: Vec<String> = store
            .fetch_edges_from(&anchor, &EdgeType::CONTROL)
            .map_err(store_error)?
            .into_iter()
            .map(|e| e.target)
            .collect();
        if related.is_empty() {
            debug!("Company {} has no directors or owners on record", anchor);
            return Ok(graph);
        }

        // Other companies controlled by the same people
        let overfetch = self.config.reverse_lookup_limit(limit);
        let reverse = store
            .fetch_edges_into(&related, &EdgeType::CONTROL, overfetch)
            .map_err(store_error)?;

        let prefix = format!("{}_", country.to_lowercase());
        let mut seen = HashSet::new();
        let siblings: Vec<String> = reverse
            .into_iter()
            .map(|e| e.source)
            .filter(|source| *source != anchor && source.starts_with(&prefix))
            .filter(|source| seen.insert(source.clone()))
            .take(limit)
            .collect();

        for sibling in &siblings {
            let sub = self.base_graph(store, sibling)?;
            graph.merge(sub);
        }

        info!(
            "Built network for {}: {} nodes, {} edges, {} related companies",
            anchor,
            graph.nodes.len(),
            graph.edges.len(),
            siblings.len()
        );

        graph.summary.same_person_or_owner_companies = Some(siblings.len());
        Ok(graph)
    }

    /// Build the network, degrading to the 1-hop base graph on failure
    ///
    /// Never fails: if the base graph cannot be read either, an empty view
    /// with a zero count is returned.
    pub fn build_company_graph_or_base<S>(
        &self,
        store: &S,
        registry_id: &str,
        country: &str,
    ) -> GraphView
    where
        S: GraphStore,
        S::Error: Display,
    {
        match self.build_company_graph(store, registry_id, country) {
            Ok(graph) => graph,
            Err(e) => {
                warn!("Network expansion failed for {} {}: {}", country, registry_id, e);
                let anchor = company_id(country, registry_id);
                let mut graph = self.base_graph(store, &anchor).unwrap_or_else(|e| {
                    warn!("Base graph failed for {}: {}", anchor, e);
                    GraphView::new()
                });
                graph.summary.same_person_or_owner_companies = Some(0);
                graph
            }
        }
    }
}

fn store_error<E: Display>(e: E) -> NetworkError {
    NetworkError::Store(e.to_string())
}
