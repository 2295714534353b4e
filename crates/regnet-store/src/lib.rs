//! Regnet Storage Layer
//!
//! Implements the [`GraphStore`] trait on SQLite.
//!
//! # Architecture
//!
//! - `nodes` table keyed by the content-addressed node id
//! - `edges` table with a unique `(source, target, type)` constraint and
//!   indexes on `source`, `target` and `type` for the expander's lookups
//! - `details` columns hold JSON objects, shallow-merged on every upsert
//!
//! Each upsert runs in its own `IMMEDIATE` transaction. A failed upsert is
//! logged, rolled back and returned to its caller; it never poisons the
//! connection for subsequent writes.
//!
//! # Examples
//!
//! ```no_run
//! use regnet_store::SqliteGraphStore;
//!
//! let store = SqliteGraphStore::new(":memory:").unwrap();
//! // Store is now ready for graph operations
//! ```

#![warn(missing_docs)]

use regnet_domain::traits::{GraphStore, UpsertOutcome};
use regnet_domain::{
    current_timestamp_ms, merge_details, Details, Edge, EdgeType, EdgeUpsert, Node, NodeType,
    NodeUpsert,
};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// How long a writer waits for a competing writer's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const EDGE_COLUMNS: &str = "source, target, type, weight, details, created_at, updated_at";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Details column could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of [`GraphStore`]
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should open its own
/// `SqliteGraphStore` on the same database file; SQLite serializes their
/// writes. Concurrent upserts of the same id are last-writer-wins on the
/// merged details (no optimistic concurrency token).
pub struct SqliteGraphStore {
    conn: Connection,
}

impl SqliteGraphStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing). The
    /// schema is created idempotently, so reopening an existing file keeps
    /// its data.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use regnet_store::SqliteGraphStore;
    ///
    /// let store = SqliteGraphStore::new("regnet.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Get a single edge by its `(source, target, type)` identity
    pub fn get_edge(
        &self,
        source: &str,
        target: &str,
        edge_type: EdgeType,
    ) -> Result<Option<Edge>, StoreError> {
        let sql = format!(
            "SELECT {} FROM edges WHERE source = ?1 AND target = ?2 AND type = ?3",
            EDGE_COLUMNS
        );
        let edge = self
            .conn
            .query_row(&sql, params![source, target, edge_type.as_str()], row_to_edge)
            .optional()?;
        Ok(edge)
    }

    fn write_node(&mut self, node: &NodeUpsert) -> Result<UpsertOutcome, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT details FROM nodes WHERE id = ?1",
                params![&node.id],
                |row| row.get(0),
            )
            .optional()?;

        let (details, outcome) = match existing {
            Some(raw) => {
                let mut current = parse_details(&raw)?;
                merge_details(&mut current, &node.details);
                (current, UpsertOutcome::Updated)
            }
            None => (node.details.clone(), UpsertOutcome::Inserted),
        };
        let now = current_timestamp_ms() as i64;

        // Label, type and country are fixed at first sighting
        tx.execute(
            "INSERT INTO nodes (id, label, type, country, details, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(id) DO UPDATE SET
             details = excluded.details, updated_at = excluded.updated_at",
            params![
                &node.id,
                &node.label,
                node.node_type.as_str(),
                &node.country,
                serde_json::to_string(&details)?,
                now,
            ],
        )?;

        tx.commit()?;
        Ok(outcome)
    }

    fn write_edge(&mut self, edge: &EdgeUpsert) -> Result<UpsertOutcome, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT details FROM edges WHERE source = ?1 AND target = ?2 AND type = ?3",
                params![&edge.source, &edge.target, edge.edge_type.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let (details, outcome) = match existing {
            Some(raw) => {
                let mut current = parse_details(&raw)?;
                merge_details(&mut current, &edge.details);
                (current, UpsertOutcome::Updated)
            }
            None => (edge.details.clone(), UpsertOutcome::Inserted),
        };
        let now = current_timestamp_ms() as i64;

        tx.execute(
            "INSERT INTO edges (source, target, type, weight, details, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(source, target, type) DO UPDATE SET
             details = excluded.details, updated_at = excluded.updated_at",
            params![
                &edge.source,
                &edge.target,
                edge.edge_type.as_str(),
                edge.weight,
                serde_json::to_string(&details)?,
                now,
            ],
        )?;

        tx.commit()?;
        Ok(outcome)
    }

    fn query_edges(
        &self,
        sql: &str,
        params: Vec<Box<dyn rusqlite::ToSql>>,
    ) -> Result<Vec<Edge>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let edges = stmt
            .query_map(params_from_iter(params.iter()), row_to_edge)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    fn count(&self, table: &str) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl GraphStore for SqliteGraphStore {
    type Error = StoreError;

    fn upsert_node(&mut self, node: NodeUpsert) -> Result<UpsertOutcome, Self::Error> {
        let result = self.write_node(&node);
        match &result {
            Ok(outcome) => debug!("Upserted node {} ({:?})", node.id, outcome),
            Err(e) => warn!("Error upserting node {}: {}", node.id, e),
        }
        result
    }

    fn upsert_edge(&mut self, edge: EdgeUpsert) -> Result<UpsertOutcome, Self::Error> {
        let result = self.write_edge(&edge);
        match &result {
            Ok(outcome) => debug!(
                "Upserted edge {} -[{}]-> {} ({:?})",
                edge.source, edge.edge_type, edge.target, outcome
            ),
            Err(e) => warn!(
                "Error upserting edge {} -[{}]-> {}: {}",
                edge.source, edge.edge_type, edge.target, e
            ),
        }
        result
    }

    fn get_node(&self, id: &str) -> Result<Option<Node>, Self::Error> {
        let node = self
            .conn
            .query_row(
                "SELECT id, label, type, country, details, created_at, updated_at
                 FROM nodes WHERE id = ?1",
                params![id],
                row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    fn get_edges_from(&self, source_id: &str) -> Result<Vec<Edge>, Self::Error> {
        let sql = format!("SELECT {} FROM edges WHERE source = ? ORDER BY id", EDGE_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        params.push(Box::new(source_id.to_string()));
        self.query_edges(&sql, params)
    }

    fn fetch_edges_from(&self, source_id: &str, types: &[EdgeType]) -> Result<Vec<Edge>, Self::Error> {
        if types.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM edges WHERE source = ? AND type IN ({}) ORDER BY id",
            EDGE_COLUMNS,
            placeholders(types.len())
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        params.push(Box::new(source_id.to_string()));
        params.extend(types.iter().map(|t| Box::new(t.as_str()) as Box<dyn rusqlite::ToSql>));

        self.query_edges(&sql, params)
    }

    fn fetch_edges_into(
        &self,
        target_ids: &[String],
        types: &[EdgeType],
        limit: usize,
    ) -> Result<Vec<Edge>, Self::Error> {
        if target_ids.is_empty() || types.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM edges WHERE target IN ({}) AND type IN ({}) ORDER BY id LIMIT ?",
            EDGE_COLUMNS,
            placeholders(target_ids.len()),
            placeholders(types.len())
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        params.extend(target_ids.iter().map(|t| Box::new(t.clone()) as Box<dyn rusqlite::ToSql>));
        params.extend(types.iter().map(|t| Box::new(t.as_str()) as Box<dyn rusqlite::ToSql>));
        params.push(Box::new(limit as i64));

        self.query_edges(&sql, params)
    }

    fn node_count(&self) -> Result<usize, Self::Error> {
        self.count("nodes")
    }

    fn edge_count(&self) -> Result<usize, Self::Error> {
        self.count("edges")
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn parse_details(raw: &str) -> Result<Details, StoreError> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidData(format!(
            "Expected a JSON object for details, got {}",
            other
        ))),
    }
}

fn conversion_error(
    column: usize,
    ty: rusqlite::types::Type,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(e))
}

fn row_to_node(row: &rusqlite::Row<'_>) -> rusqlite::Result<Node> {
    let type_str: String = row.get(2)?;
    let node_type = NodeType::parse(&type_str).ok_or_else(|| {
        conversion_error(
            2,
            rusqlite::types::Type::Text,
            StoreError::InvalidData(format!("Unknown node type: {}", type_str)),
        )
    })?;

    let raw_details: String = row.get(4)?;
    let details = parse_details(&raw_details)
        .map_err(|e| conversion_error(4, rusqlite::types::Type::Text, e))?;

    Ok(Node {
        id: row.get(0)?,
        label: row.get(1)?,
        node_type,
        country: row.get(3)?,
        details,
        created_at: row.get::<_, i64>(5)? as u64,
        updated_at: row.get::<_, i64>(6)? as u64,
    })
}

fn row_to_edge(row: &rusqlite::Row<'_>) -> rusqlite::Result<Edge> {
    let type_str: String = row.get(2)?;
    let edge_type = EdgeType::parse(&type_str).ok_or_else(|| {
        conversion_error(
            2,
            rusqlite::types::Type::Text,
            StoreError::InvalidData(format!("Unknown edge type: {}", type_str)),
        )
    })?;

    let raw_details: String = row.get(4)?;
    let details = parse_details(&raw_details)
        .map_err(|e| conversion_error(4, rusqlite::types::Type::Text, e))?;

    Ok(Edge {
        source: row.get(0)?,
        target: row.get(1)?,
        edge_type,
        weight: row.get(3)?,
        details,
        created_at: row.get::<_, i64>(5)? as u64,
        updated_at: row.get::<_, i64>(6)? as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_corrupt_details_surfaces_error_and_rolls_back() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        store
            .conn
            .execute(
                "INSERT INTO nodes (id, label, type, country, details, created_at, updated_at)
                 VALUES ('sk_1', 'Broken', 'company', 'SK', 'not json', 1, 1)",
                [],
            )
            .unwrap();

        let mut details = Details::new();
        details.insert("source".into(), json!("ORSR"));
        let result = store.upsert_node(
            NodeUpsert::new("sk_1", "Broken", NodeType::Company, "SK").with_details(details),
        );
        assert!(result.is_err(), "Corrupt details must be reported");

        let raw: String = store
            .conn
            .query_row("SELECT details FROM nodes WHERE id = 'sk_1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(raw, "not json");

        // The connection stays usable for unrelated writes
        let ok = store.upsert_node(NodeUpsert::new("sk_2", "Fine", NodeType::Company, "SK"));
        assert_eq!(ok.unwrap(), UpsertOutcome::Inserted);
    }

    #[test]
    fn test_non_object_details_rejected() {
        assert!(parse_details("[1, 2]").is_err());
        assert!(parse_details("{}").unwrap().is_empty());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
