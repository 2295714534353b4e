//! Regnet Risk
//!
//! Flags structural fraud patterns in a company network and rescores its
//! nodes.
//!
//! The detectors look for:
//! - **White horses**: persons managing an unusual number of companies
//! - **Ownership carousels**: cycles of company-to-company ownership
//! - **Virtual seats**: addresses hosting many companies
//!
//! Findings feed an enhanced 0..=10 risk score per node. Detection runs on
//! the nodes and edges of one response and never fails: malformed nodes and
//! dangling edges are skipped.
//!
//! # Examples
//!
//! ```
//! use regnet_domain::GraphView;
//! use regnet_risk::generate_risk_report;
//!
//! let graph: GraphView = serde_json::from_str(r#"{
//!     "nodes": [
//!         {"id": "sk_1", "type": "company"},
//!         {"id": "sk_2", "type": "company"},
//!         {"id": "sk_3", "type": "company"}
//!     ],
//!     "edges": [
//!         {"source": "sk_1", "target": "sk_2", "type": "OWNED_BY"},
//!         {"source": "sk_2", "target": "sk_3", "type": "OWNED_BY"},
//!         {"source": "sk_3", "target": "sk_1", "type": "OWNED_BY"}
//!     ]
//! }"#).unwrap();
//!
//! let report = generate_risk_report(&graph.nodes, &graph.edges);
//! assert_eq!(report.summary.circular_structure_count, 1);
//! ```

#![warn(missing_docs)]

mod config;
pub mod detector;
mod report;
mod scorer;

pub use config::RiskConfig;
pub use detector::{
    detect_circular_structures, detect_virtual_seats, detect_white_horses, RiskFindings, VirtualSeat,
    WhiteHorse,
};
pub use report::{generate_risk_report, RiskAnalyzer, RiskReport, RiskSummary};
pub use scorer::calculate_enhanced_risk_score;
