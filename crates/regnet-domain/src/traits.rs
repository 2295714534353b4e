//! Trait definitions for external interactions
//!
//! These traits define the boundary between domain logic and persistence.
//! Infrastructure implementations live in other crates (regnet-store).

use crate::{Edge, EdgeType, EdgeUpsert, Node, NodeUpsert};

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The row did not exist and was created
    Inserted,
    /// The row existed; details were merged and `updated_at` bumped
    Updated,
}

/// Trait for persisting and reading the relationship graph
///
/// Implemented by the infrastructure layer (regnet-store). Every write is an
/// independent unit: a failed upsert must leave the store unchanged and must
/// not affect other upserts issued by the same caller.
pub trait GraphStore {
    /// Error type for store operations
    type Error;

    /// Insert a node, or merge its details into the existing row
    fn upsert_node(&mut self, node: NodeUpsert) -> Result<UpsertOutcome, Self::Error>;

    /// Insert an edge, or merge its details into the existing `(source, target, type)` row
    fn upsert_edge(&mut self, edge: EdgeUpsert) -> Result<UpsertOutcome, Self::Error>;

    /// Get a node by id
    fn get_node(&self, id: &str) -> Result<Option<Node>, Self::Error>;

    /// All outgoing edges of a node, in insertion order
    fn get_edges_from(&self, source_id: &str) -> Result<Vec<Edge>, Self::Error>;

    /// Outgoing edges of a node restricted to the given types, in insertion order
    fn fetch_edges_from(&self, source_id: &str, types: &[EdgeType]) -> Result<Vec<Edge>, Self::Error>;

    /// Edges of the given types pointing at any of `target_ids`, at most `limit`, in insertion order
    fn fetch_edges_into(
        &self,
        target_ids: &[String],
        types: &[EdgeType],
        limit: usize,
    ) -> Result<Vec<Edge>, Self::Error>;

    /// Total number of stored nodes
    fn node_count(&self) -> Result<usize, Self::Error>;

    /// Total number of stored edges
    fn edge_count(&self) -> Result<usize, Self::Error>;
}
