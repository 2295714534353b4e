//! Materialized response graphs
//!
//! A [`GraphView`] is a per-request snapshot of nodes and edges, detached
//! from the store. It is what the network expander returns and what risk
//! analysis consumes. Because views may also arrive from upstream JSON, the
//! view types deserialize leniently: a missing or null id becomes empty and an
//! unknown or missing type becomes `None`, leaving consumers to skip them.

use crate::{Details, Edge, EdgeType, Node, NodeType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

/// A node as returned to callers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewNode {
    /// Node id (empty when upstream data omitted it)
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// Display name
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,

    /// Entity kind, `None` when missing or unrecognized
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_parse",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_type: Option<NodeType>,

    /// Country code
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,

    /// Details map
    #[serde(default, deserialize_with = "lenient_details")]
    pub details: Details,

    /// Risk score on a 0..=10 scale
    #[serde(default, deserialize_with = "lenient_score")]
    pub risk_score: i32,
}

/// An edge as returned to callers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewEdge {
    /// Source node id
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,

    /// Target node id
    #[serde(default, deserialize_with = "lenient_string")]
    pub target: String,

    /// Relationship type, `None` when missing or unrecognized
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_parse",
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_type: Option<EdgeType>,

    /// Details map
    #[serde(default, deserialize_with = "lenient_details")]
    pub details: Details,
}

impl ViewEdge {
    fn key(&self) -> (String, String, Option<EdgeType>) {
        (self.source.clone(), self.target.clone(), self.edge_type)
    }
}

/// Summary attached by the network expander
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of sibling companies sharing a director or owner with the anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_person_or_owner_companies: Option<usize>,
}

/// A materialized node/edge set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphView {
    /// Nodes, unique by id, in first-seen order
    #[serde(default)]
    pub nodes: Vec<ViewNode>,

    /// Edges, unique by `(source, target, type)`, in first-seen order
    #[serde(default)]
    pub edges: Vec<ViewEdge>,

    /// Expansion summary
    #[serde(default)]
    pub summary: GraphSummary,
}

impl GraphView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the view holds no nodes and no edges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Whether a node with this id is present
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Union `other` into `self`
    ///
    /// Nodes are keyed by id and edges by `(source, target, type)`. On a key
    /// conflict the value from `other` replaces the existing one in place, so
    /// first-seen order is preserved. The summary of `self` is kept.
    pub fn merge(&mut self, other: GraphView) {
        let mut node_pos: HashMap<String, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        for node in other.nodes {
            match node_pos.get(&node.id) {
                Some(&i) => self.nodes[i] = node,
                None => {
                    node_pos.insert(node.id.clone(), self.nodes.len());
                    self.nodes.push(node);
                }
            }
        }

        let mut edge_pos: HashMap<(String, String, Option<EdgeType>), usize> = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key(), i))
            .collect();
        for edge in other.edges {
            let key = edge.key();
            match edge_pos.get(&key) {
                Some(&i) => self.edges[i] = edge,
                None => {
                    edge_pos.insert(key, self.edges.len());
                    self.edges.push(edge);
                }
            }
        }
    }
}

impl From<Node> for ViewNode {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            label: node.label,
            node_type: Some(node.node_type),
            country: node.country,
            details: node.details,
            risk_score: 0,
        }
    }
}

impl From<Edge> for ViewEdge {
    fn from(edge: Edge) -> Self {
        Self {
            source: edge.source,
            target: edge.target,
            edge_type: Some(edge.edge_type),
            details: edge.details,
        }
    }
}

fn lenient_parse<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(text)) => text,
        _ => String::new(),
    })
}

fn lenient_details<'de, D>(deserializer: D) -> Result<Details, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Object(map)) => map,
        Some(Value::String(text)) if !text.is_empty() => {
            let mut map = Details::new();
            map.insert("text".to_string(), Value::String(text));
            map
        }
        _ => Details::new(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_f64)
        .map(|s| s.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, label: &str) -> ViewNode {
        ViewNode {
            id: id.to_string(),
            label: label.to_string(),
            node_type: Some(NodeType::Company),
            ..Default::default()
        }
    }

    fn edge(source: &str, target: &str, t: EdgeType) -> ViewEdge {
        ViewEdge {
            source: source.to_string(),
            target: target.to_string(),
            edge_type: Some(t),
            details: Details::new(),
        }
    }

    #[test]
    fn test_merge_union_later_wins() {
        let mut a = GraphView {
            nodes: vec![node("sk_1", "old"), node("sk_2", "two")],
            edges: vec![edge("sk_1", "p", EdgeType::ManagedBy)],
            summary: GraphSummary::default(),
        };
        let b = GraphView {
            nodes: vec![node("sk_1", "new"), node("sk_3", "three")],
            edges: vec![
                edge("sk_1", "p", EdgeType::ManagedBy),
                edge("sk_1", "p", EdgeType::OwnedBy),
            ],
            summary: GraphSummary::default(),
        };

        a.merge(b);

        let ids: Vec<_> = a.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["sk_1", "sk_2", "sk_3"]);
        assert_eq!(a.node("sk_1").unwrap().label, "new");
        assert_eq!(a.edges.len(), 2);
    }

    #[test]
    fn test_lenient_deserialization() {
        let view: GraphView = serde_json::from_value(json!({
            "nodes": [
                {"id": "sk_1", "type": "company", "risk_score": 3, "details": "IČO: 1"},
                {"label": "no id", "type": "person"},
                {"id": "x", "type": "spaceship", "risk_score": 2.6}
            ],
            "edges": [
                {"source": "sk_1", "target": "x", "type": "MANAGED_BY"},
                {"source": "sk_1", "target": "x"}
            ]
        }))
        .unwrap();

        assert_eq!(view.nodes[0].node_type, Some(NodeType::Company));
        assert_eq!(view.nodes[0].risk_score, 3);
        assert_eq!(view.nodes[0].details["text"], json!("IČO: 1"));
        assert_eq!(view.nodes[1].id, "");
        assert_eq!(view.nodes[2].node_type, None);
        assert_eq!(view.nodes[2].risk_score, 3);
        assert_eq!(view.edges[0].edge_type, Some(EdgeType::ManagedBy));
        assert_eq!(view.edges[1].edge_type, None);
    }

    #[test]
    fn test_null_strings_become_empty() {
        let view: GraphView = serde_json::from_value(json!({
            "nodes": [
                {"id": null, "type": "company"},
                {"id": "sk_1", "label": null, "country": 42, "type": "company"}
            ],
            "edges": [{"source": null, "target": ["sk_1"], "type": "OWNED_BY"}]
        }))
        .unwrap();

        assert_eq!(view.nodes[0].id, "");
        assert_eq!(view.nodes[1].id, "sk_1");
        assert_eq!(view.nodes[1].label, "");
        assert_eq!(view.nodes[1].country, "");
        assert_eq!(view.edges[0].source, "");
        assert_eq!(view.edges[0].target, "");
        assert_eq!(view.edges[0].edge_type, Some(EdgeType::OwnedBy));
    }

    #[test]
    fn test_summary_serialization() {
        let mut view = GraphView::new();
        assert_eq!(serde_json::to_value(&view).unwrap()["summary"], json!({}));

        view.summary.same_person_or_owner_companies = Some(2);
        assert_eq!(
            serde_json::to_value(&view).unwrap()["summary"]["same_person_or_owner_companies"],
            json!(2)
        );
    }
}
