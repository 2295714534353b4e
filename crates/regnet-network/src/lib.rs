//! Regnet Network
//!
//! Builds the relationship network around a company on demand.
//!
//! # Overview
//!
//! Starting from an anchor company, the expander collects:
//! - **The base graph**: the anchor, its outgoing edges and their targets
//! - **Related companies**: other companies of the same country that share a
//!   director (`MANAGED_BY`) or an owner (`OWNED_BY`) with the anchor
//! - **Their base graphs**: merged into one [`GraphView`](regnet_domain::GraphView)
//!
//! The number of related companies is bounded by
//! [`ExpanderConfig::limit_related_per_anchor`], and the reverse lookup reads
//! at most `limit × overfetch_factor` edges, so the cost of a request does not
//! grow with the size of the registry.
//!
//! # Usage
//!
//! ```no_run
//! use regnet_network::GraphExpander;
//! use regnet_store::SqliteGraphStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteGraphStore::new("regnet.db")?;
//! let expander = GraphExpander::default();
//!
//! let graph = expander.build_company_graph_or_base(&store, "123", "SK");
//! println!("{}", serde_json::to_string_pretty(&graph)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod expander;

pub use config::ExpanderConfig;
pub use error::NetworkError;
pub use expander::GraphExpander;
