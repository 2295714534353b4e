//! Edge module - directed, typed relationships between nodes
//!
//! Edges are never nodes themselves. Several edge types may connect the
//! same ordered pair; an edge's identity is the `(source, target, type)` triple.

use crate::Details;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of relationship an edge records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Company is owned by a person or another legal entity
    OwnedBy,

    /// Company is managed by a person (executive, director)
    ManagedBy,

    /// Company has its registered seat at an address
    LocatedAt,

    /// Company has an outstanding debt
    HasDebt,

    /// Company was formerly registered under another name
    HistoricalName,
}

impl EdgeType {
    /// Edge types that link a company to the people/entities behind it
    pub const CONTROL: [EdgeType; 2] = [EdgeType::ManagedBy, EdgeType::OwnedBy];

    /// Get the edge type name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::OwnedBy => "OWNED_BY",
            EdgeType::ManagedBy => "MANAGED_BY",
            EdgeType::LocatedAt => "LOCATED_AT",
            EdgeType::HasDebt => "HAS_DEBT",
            EdgeType::HistoricalName => "HISTORICAL_NAME",
        }
    }

    /// Parse an edge type from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OWNED_BY" => Some(EdgeType::OwnedBy),
            "MANAGED_BY" => Some(EdgeType::ManagedBy),
            "LOCATED_AT" => Some(EdgeType::LocatedAt),
            "HAS_DEBT" => Some(EdgeType::HasDebt),
            "HISTORICAL_NAME" => Some(EdgeType::HistoricalName),
            _ => None,
        }
    }
}

impl std::str::FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid edge type: {}", s))
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Relationship type
    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    /// Relationship weight
    pub weight: f64,

    /// Provenance and relationship metadata (role, share percentage, ...)
    pub details: Details,

    /// First sighting (ms since epoch)
    pub created_at: u64,

    /// Most recent sighting (ms since epoch)
    pub updated_at: u64,
}

/// Write request for an edge keyed by `(source, target, type)`
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeUpsert {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Relationship type
    pub edge_type: EdgeType,

    /// Details to merge into the stored map
    pub details: Details,

    /// Weight written on first insert
    pub weight: f64,
}

impl EdgeUpsert {
    /// Create an upsert request with default weight (1.0) and empty details
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
            details: Details::new(),
            weight: 1.0,
        }
    }

    /// Attach details to merge
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    /// Override the default weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_names() {
        assert_eq!(EdgeType::ManagedBy.as_str(), "MANAGED_BY");
        assert_eq!(EdgeType::parse("owned_by"), Some(EdgeType::OwnedBy));
        assert_eq!(
            serde_json::to_string(&EdgeType::HistoricalName).unwrap(),
            "\"HISTORICAL_NAME\""
        );
        assert!(EdgeType::parse("KNOWS").is_none());
    }

    #[test]
    fn test_upsert_defaults() {
        let e = EdgeUpsert::new("sk_1", "pers_sk_abc", EdgeType::ManagedBy);
        assert_eq!(e.weight, 1.0);
        assert!(e.details.is_empty());
    }
}
