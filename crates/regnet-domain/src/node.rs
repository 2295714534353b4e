//! Node module - entities of the relationship network

use crate::Details;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// A company resolved to its own registry record
    Company,

    /// A natural person (executive or shareholder)
    Person,

    /// A registered seat or residence address
    Address,

    /// A legal-entity owner known only by name, not yet linked to a registry record
    CompanyRef,

    /// An outstanding debt recorded against a company
    Debt,
}

impl NodeType {
    /// Get the node type name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Company => "company",
            NodeType::Person => "person",
            NodeType::Address => "address",
            NodeType::CompanyRef => "company_ref",
            NodeType::Debt => "debt",
        }
    }

    /// Parse a node type from its stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "company" => Some(NodeType::Company),
            "person" => Some(NodeType::Person),
            "address" => Some(NodeType::Address),
            "company_ref" => Some(NodeType::CompanyRef),
            "debt" => Some(NodeType::Debt),
            _ => None,
        }
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid node type: {}", s))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted node
///
/// The id is a pure function of the entity's logical identity (see
/// [`crate::identity`]), so every sighting of the same real-world entity
/// lands on the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique id within the store
    pub id: String,

    /// Display name
    pub label: String,

    /// Entity kind
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Two-letter country code of the registry namespace
    pub country: String,

    /// Provenance and provider metadata
    pub details: Details,

    /// First sighting (ms since epoch)
    pub created_at: u64,

    /// Most recent sighting (ms since epoch)
    pub updated_at: u64,
}

/// Write request for a node: insert on first sight, merge details afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpsert {
    /// Target node id
    pub id: String,

    /// Display name (used only when the node is first inserted)
    pub label: String,

    /// Entity kind
    pub node_type: NodeType,

    /// Country code
    pub country: String,

    /// Details to merge into the stored map
    pub details: Details,
}

impl NodeUpsert {
    /// Create an upsert request with empty details
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        node_type: NodeType,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            country: country.into(),
            details: Details::new(),
        }
    }

    /// Attach details to merge
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_round_trip_names() {
        for t in [
            NodeType::Company,
            NodeType::Person,
            NodeType::Address,
            NodeType::CompanyRef,
            NodeType::Debt,
        ] {
            assert_eq!(NodeType::parse(t.as_str()), Some(t));
        }
        assert_eq!(NodeType::parse("COMPANY_REF"), Some(NodeType::CompanyRef));
        assert!("shell".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_node_type_serde_name() {
        let json = serde_json::to_string(&NodeType::CompanyRef).unwrap();
        assert_eq!(json, "\"company_ref\"");
    }
}
