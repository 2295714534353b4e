//! Structural fraud-pattern detectors
//!
//! All detectors work on a materialized node/edge list of a single response.
//! Nodes without an id or type, and edges that lack a type or point at nodes
//! missing from the list, are ignored.

use regnet_domain::{EdgeType, NodeType, ViewEdge, ViewNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A person managing many companies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhiteHorse {
    /// Person node id
    pub person_id: String,
    /// Number of distinct companies managed
    pub company_count: usize,
}

/// An address hosting many companies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualSeat {
    /// Address node id
    pub address_id: String,
    /// Number of distinct companies registered there
    pub company_count: usize,
}

/// Output of all three detectors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskFindings {
    /// Flagged persons, in first-seen order
    pub white_horses: Vec<WhiteHorse>,
    /// Ownership cycles, each listed from the node where the search entered it
    pub circular_structures: Vec<Vec<String>>,
    /// Flagged addresses, in first-seen order
    pub virtual_seats: Vec<VirtualSeat>,
}

impl RiskFindings {
    /// Company count of a flagged person
    pub fn white_horse_count(&self, person_id: &str) -> Option<usize> {
        self.white_horses
            .iter()
            .find(|w| w.person_id == person_id)
            .map(|w| w.company_count)
    }

    /// Company count of a flagged address
    pub fn virtual_seat_count(&self, address_id: &str) -> Option<usize> {
        self.virtual_seats
            .iter()
            .find(|v| v.address_id == address_id)
            .map(|v| v.company_count)
    }

    /// Whether a node lies on any reported cycle
    pub fn in_cycle(&self, node_id: &str) -> bool {
        self.circular_structures
            .iter()
            .any(|cycle| cycle.iter().any(|id| id == node_id))
    }
}

/// Node types by id, first occurrence wins
fn index_nodes(nodes: &[ViewNode]) -> HashMap<&str, NodeType> {
    let mut index = HashMap::new();
    for node in nodes {
        if node.id.is_empty() {
            continue;
        }
        if let Some(node_type) = node.node_type {
            index.entry(node.id.as_str()).or_insert(node_type);
        }
    }
    index
}

/// Edges of `edge_type` from a `from` node to a `to` node, both present in `nodes`
fn typed_edges<'a>(
    nodes: &'a [ViewNode],
    edges: &'a [ViewEdge],
    edge_type: EdgeType,
    from: NodeType,
    to: NodeType,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    let index = index_nodes(nodes);
    edges
        .iter()
        .filter(move |e| e.edge_type == Some(edge_type))
        .filter(move |e| {
            index.get(e.source.as_str()) == Some(&from) && index.get(e.target.as_str()) == Some(&to)
        })
        .map(|e| (e.source.as_str(), e.target.as_str()))
}

/// Distinct sources per target, targets in first-seen order
fn fan_in<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<(&'a str, usize)> {
    let mut order = Vec::new();
    let mut sources: HashMap<&str, HashSet<&str>> = HashMap::new();
    for (source, target) in pairs {
        let set = sources.entry(target).or_insert_with(|| {
            order.push(target);
            HashSet::new()
        });
        set.insert(source);
    }
    order
        .into_iter()
        .map(|target| (target, sources.get(target).map_or(0, HashSet::len)))
        .collect()
}

/// Persons linked by `MANAGED_BY` to at least `min_companies` distinct companies
pub fn detect_white_horses(nodes: &[ViewNode], edges: &[ViewEdge], min_companies: usize) -> Vec<WhiteHorse> {
    fan_in(typed_edges(nodes, edges, EdgeType::ManagedBy, NodeType::Company, NodeType::Person))
        .into_iter()
        .filter(|(_, count)| *count >= min_companies)
        .map(|(person, company_count)| WhiteHorse {
            person_id: person.to_string(),
            company_count,
        })
        .collect()
}

/// Addresses linked by `LOCATED_AT` to at least `min_companies` distinct companies
pub fn detect_virtual_seats(nodes: &[ViewNode], edges: &[ViewEdge], min_companies: usize) -> Vec<VirtualSeat> {
    fan_in(typed_edges(nodes, edges, EdgeType::LocatedAt, NodeType::Company, NodeType::Address))
        .into_iter()
        .filter(|(_, count)| *count >= min_companies)
        .map(|(address, company_count)| VirtualSeat {
            address_id: address.to_string(),
            company_count,
        })
        .collect()
}

/// Company-to-company `OWNED_BY` cycles of at least `min_length` nodes
///
/// Depth-first search from every unvisited company in first-seen order.
/// `visited` is shared across start nodes, so a node is expanded once per
/// call; a cycle is reported when the search meets a node on its current
/// path. Rotations of an already reported cycle are dropped.
pub fn detect_circular_structures(
    nodes: &[ViewNode],
    edges: &[ViewEdge],
    min_length: usize,
) -> Vec<Vec<String>> {
    let mut order: Vec<&str> = Vec::new();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (source, target) in typed_edges(nodes, edges, EdgeType::OwnedBy, NodeType::Company, NodeType::Company) {
        let next = adjacency.entry(source).or_insert_with(|| {
            order.push(source);
            Vec::new()
        });
        if !next.contains(&target) {
            next.push(target);
        }
    }

    let mut cycles = Vec::new();
    let mut reported: HashSet<Vec<&str>> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for &start in &order {
        if !visited.insert(start) {
            continue;
        }

        let mut path: Vec<&str> = vec![start];
        let mut on_path: HashMap<&str, usize> = HashMap::from([(start, 0)]);
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let neighbour = adjacency.get(node).and_then(|n| n.get(cursor)).copied();
            frame.1 += 1;

            match neighbour {
                Some(next) => {
                    if let Some(&pos) = on_path.get(next) {
                        let cycle = &path[pos..];
                        if cycle.len() >= min_length && reported.insert(canonical_rotation(cycle)) {
                            cycles.push(cycle.iter().map(|id| id.to_string()).collect());
                        }
                    } else if visited.insert(next) {
                        on_path.insert(next, path.len());
                        path.push(next);
                        stack.push((next, 0));
                    }
                }
                None => {
                    stack.pop();
                    path.pop();
                    on_path.remove(node);
                }
            }
        }
    }

    cycles
}

/// The rotation of `cycle` starting at its smallest id
fn canonical_rotation<'a>(cycle: &[&'a str]) -> Vec<&'a str> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map_or(0, |(i, _)| i);
    cycle[start..].iter().chain(&cycle[..start]).copied().collect()
}
