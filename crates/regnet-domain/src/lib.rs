//! Regnet Domain Layer
//!
//! This crate holds the data model and the pure logic shared by every other
//! regnet crate. It performs no I/O: storage, ingestion, traversal and risk
//! analysis live in their own crates and depend on the types defined here.
//!
//! ## Key Concepts
//!
//! - **Node**: a company, person, address, unresolved owner (`company_ref`) or debt record
//! - **Edge**: a directed, typed relationship identified by `(source, target, type)`
//! - **Details**: a schema-less JSON map merged key by key on every sighting
//! - **Identity**: deterministic, content-addressed node ids derived from canonicalized names
//! - **GraphView**: the materialized node/edge set returned to callers and fed to risk analysis
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod details;
pub mod edge;
pub mod identity;
pub mod node;
pub mod traits;
pub mod view;

// Re-exports for convenience
pub use details::{merge_details, Details};
pub use edge::{Edge, EdgeType, EdgeUpsert};
pub use identity::EntityKind;
pub use node::{Node, NodeType, NodeUpsert};
pub use traits::{GraphStore, UpsertOutcome};
pub use view::{GraphSummary, GraphView, ViewEdge, ViewNode};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since the Unix epoch
///
/// Clocks set before 1970 collapse to 0 instead of failing.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
