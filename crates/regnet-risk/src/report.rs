//! Risk reports over a materialized graph

use crate::detector::{
    detect_circular_structures, detect_virtual_seats, detect_white_horses, RiskFindings, VirtualSeat,
    WhiteHorse,
};
use crate::scorer::calculate_enhanced_risk_score;
use crate::RiskConfig;
use regnet_domain::{GraphView, NodeType, ViewEdge, ViewNode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Counts attached to a [`RiskReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Number of flagged persons
    pub white_horse_count: usize,
    /// Number of ownership cycles
    pub circular_structure_count: usize,
    /// Number of flagged addresses
    pub virtual_seat_count: usize,
    /// Companies whose enhanced score reached the high-risk threshold
    pub high_risk_companies: usize,
}

/// Detector findings plus every node rescored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskReport {
    /// Persons managing many companies
    pub white_horses: Vec<WhiteHorse>,
    /// Company ownership cycles
    pub circular_structures: Vec<Vec<String>>,
    /// Addresses hosting many companies
    pub virtual_seats: Vec<VirtualSeat>,
    /// Input nodes, in input order, with `risk_score` replaced by the enhanced score
    pub enhanced_nodes: Vec<ViewNode>,
    /// Counts
    pub summary: RiskSummary,
}

/// Runs the fraud-pattern detectors and rescoring with one configuration
///
/// # Examples
///
/// ```
/// use regnet_risk::{RiskAnalyzer, RiskConfig};
/// use regnet_domain::GraphView;
///
/// let analyzer = RiskAnalyzer::new(RiskConfig::default());
/// let report = analyzer.generate_risk_report(&[], &[]);
/// assert_eq!(report.summary.white_horse_count, 0);
/// assert!(report.enhanced_nodes.is_empty());
///
/// let mut graph = GraphView::new();
/// analyzer.annotate(&mut graph);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RiskAnalyzer {
    config: RiskConfig,
}

impl RiskAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Run all three detectors once
    pub fn detect(&self, nodes: &[ViewNode], edges: &[ViewEdge]) -> RiskFindings {
        RiskFindings {
            white_horses: detect_white_horses(nodes, edges, self.config.white_horse_min_companies),
            circular_structures: detect_circular_structures(nodes, edges, self.config.cycle_min_length),
            virtual_seats: detect_virtual_seats(nodes, edges, self.config.virtual_seat_min_companies),
        }
    }

    /// Enhanced score of a single node
    pub fn score(&self, node: &ViewNode, findings: &RiskFindings) -> i32 {
        calculate_enhanced_risk_score(node, findings, &self.config)
    }

    /// Detect patterns and rescore every node
    pub fn generate_risk_report(&self, nodes: &[ViewNode], edges: &[ViewEdge]) -> RiskReport {
        let findings = self.detect(nodes, edges);

        let enhanced_nodes: Vec<ViewNode> = nodes
            .iter()
            .map(|node| ViewNode {
                risk_score: self.score(node, &findings),
                ..node.clone()
            })
            .collect();

        let high_risk_companies = enhanced_nodes
            .iter()
            .filter(|n| n.node_type == Some(NodeType::Company))
            .filter(|n| n.risk_score >= self.config.high_risk_threshold)
            .count();

        let summary = RiskSummary {
            white_horse_count: findings.white_horses.len(),
            circular_structure_count: findings.circular_structures.len(),
            virtual_seat_count: findings.virtual_seats.len(),
            high_risk_companies,
        };

        if summary.white_horse_count + summary.circular_structure_count + summary.virtual_seat_count > 0 {
            info!(
                "Risk patterns in {} nodes: {} white horses, {} carousels, {} virtual seats",
                nodes.len(),
                summary.white_horse_count,
                summary.circular_structure_count,
                summary.virtual_seat_count
            );
        } else {
            debug!("No risk patterns in {} nodes", nodes.len());
        }

        RiskReport {
            white_horses: findings.white_horses,
            circular_structures: findings.circular_structures,
            virtual_seats: findings.virtual_seats,
            enhanced_nodes,
            summary,
        }
    }

    /// Replace the scores of a graph's nodes with their enhanced scores
    ///
    /// Returns the report the scores came from.
    pub fn annotate(&self, graph: &mut GraphView) -> RiskReport {
        let report = self.generate_risk_report(&graph.nodes, &graph.edges);
        graph.nodes = report.enhanced_nodes.clone();
        report
    }
}

/// [`RiskAnalyzer::generate_risk_report`] with default thresholds
pub fn generate_risk_report(nodes: &[ViewNode], edges: &[ViewEdge]) -> RiskReport {
    RiskAnalyzer::default().generate_risk_report(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regnet_domain::EdgeType;

    fn node(id: &str, node_type: NodeType) -> ViewNode {
        ViewNode {
            id: id.to_string(),
            label: id.to_string(),
            node_type: Some(node_type),
            ..Default::default()
        }
    }

    fn edge(source: &str, target: &str, edge_type: EdgeType) -> ViewEdge {
        ViewEdge {
            source: source.to_string(),
            target: target.to_string(),
            edge_type: Some(edge_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_counts_high_risk_companies() {
        let mut a = node("A", NodeType::Company);
        a.risk_score = 3;
        let nodes = vec![a, node("B", NodeType::Company), node("C", NodeType::Company)];
        let edges = vec![
            edge("A", "B", EdgeType::OwnedBy),
            edge("B", "C", EdgeType::OwnedBy),
            edge("C", "A", EdgeType::OwnedBy),
        ];

        let report = generate_risk_report(&nodes, &edges);

        assert_eq!(report.summary.circular_structure_count, 1);
        let scores: Vec<_> = report.enhanced_nodes.iter().map(|n| n.risk_score).collect();
        assert_eq!(scores, vec![7, 4, 4]);
        assert_eq!(report.summary.high_risk_companies, 1);
    }

    #[test]
    fn test_report_keeps_skipped_nodes() {
        let nodes = vec![
            ViewNode::default(),
            ViewNode {
                id: "d".to_string(),
                node_type: Some(NodeType::Debt),
                ..Default::default()
            },
        ];

        let report = generate_risk_report(&nodes, &[]);

        assert_eq!(report.enhanced_nodes.len(), 2);
        assert_eq!(report.enhanced_nodes[0].risk_score, 0);
        assert_eq!(report.enhanced_nodes[1].risk_score, 8);
    }

    #[test]
    fn test_annotate_rescores_graph() {
        let mut graph = GraphView::new();
        graph.nodes.push(node("p", NodeType::Person));
        for i in 0..5 {
            let id = format!("c{}", i);
            graph.nodes.push(node(&id, NodeType::Company));
            graph.edges.push(edge(&id, "p", EdgeType::ManagedBy));
        }

        let report = RiskAnalyzer::default().annotate(&mut graph);

        assert_eq!(report.summary.white_horse_count, 1);
        assert_eq!(graph.node("p").unwrap().risk_score, 3);
        assert_eq!(graph.nodes.len(), 6);
    }
}
