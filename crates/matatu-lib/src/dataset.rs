//! Network dataset loading.
//!
//! Datasets are JSON documents with a node list and an edge list. Loading is
//! the strict boundary of the engine: non-positive or non-finite travel
//! times and edges referencing undeclared nodes are rejected here, so the
//! permissive [`Network`] construction below never sees malformed input.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::network::{Network, NodeId};
use crate::spatial::GridBounds;

/// A node as declared by a dataset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    /// Optional human-readable label, used by boundary layers for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// An undirected edge as declared by a dataset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub travel_time: f64,
}

/// On-disk network description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFile {
    /// Bounding box for the spatial grid; defaults to the library's bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<GridBounds>,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl NetworkFile {
    /// Validate the records and build the network plus its name table.
    pub fn into_network(self) -> Result<(Network, HashMap<NodeId, String>)> {
        let mut network = Network::with_bounds(self.bounds.unwrap_or_default());
        let mut names = HashMap::new();

        for node in &self.nodes {
            network.add_node(node.id, node.lat, node.lon);
            if let Some(name) = &node.name {
                names.insert(node.id, name.clone());
            }
        }

        for edge in &self.edges {
            if !edge.travel_time.is_finite() || edge.travel_time <= 0.0 {
                return Err(Error::InvalidEdgeWeight {
                    from: edge.from,
                    to: edge.to,
                    travel_time: edge.travel_time,
                });
            }
            for id in [edge.from, edge.to] {
                if !network.contains(id) {
                    return Err(Error::UnknownNode { id });
                }
            }
            network.add_edge(edge.from, edge.to, edge.travel_time);
        }

        Ok((network, names))
    }
}

/// Load a network and its node name table from a JSON dataset file.
pub fn load_network(path: &Path) -> Result<(Network, HashMap<NodeId, String>)> {
    let file = File::open(path)?;
    let dataset: NetworkFile = serde_json::from_reader(BufReader::new(file))?;
    let node_count = dataset.nodes.len();
    let edge_count = dataset.edges.len();

    let loaded = dataset.into_network()?;
    info!(
        path = %path.display(),
        nodes = node_count,
        edges = edge_count,
        "loaded network dataset"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> &'static str {
        r#"{
            "nodes": [
                {"id": 0, "name": "Old Taxi Park", "lat": 0.3146, "lon": 32.5761},
                {"id": 1, "name": "Garden City", "lat": 0.3191, "lon": 32.5836},
                {"id": 2, "lat": 0.3175, "lon": 32.58}
            ],
            "edges": [
                {"from": 0, "to": 1, "travel_time": 5.0},
                {"from": 1, "to": 2, "travel_time": 3.0}
            ]
        }"#
    }

    #[test]
    fn parses_and_builds_a_network() {
        let dataset: NetworkFile = serde_json::from_str(sample_json()).expect("valid json");
        let (network, names) = dataset.into_network().expect("valid dataset");

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_travel_time(0, 1), Some(5.0));
        assert_eq!(network.edge_travel_time(2, 1), Some(3.0));
        assert_eq!(names.get(&0).map(String::as_str), Some("Old Taxi Park"));
        assert!(!names.contains_key(&2));
    }

    #[test]
    fn rejects_non_positive_travel_time() {
        let json = r#"{
            "nodes": [
                {"id": 0, "lat": 0.31, "lon": 32.55},
                {"id": 1, "lat": 0.32, "lon": 32.56}
            ],
            "edges": [{"from": 0, "to": 1, "travel_time": -2.0}]
        }"#;
        let dataset: NetworkFile = serde_json::from_str(json).expect("valid json");
        assert!(matches!(
            dataset.into_network(),
            Err(Error::InvalidEdgeWeight { from: 0, to: 1, .. })
        ));
    }

    #[test]
    fn rejects_edges_referencing_undeclared_nodes() {
        let json = r#"{
            "nodes": [{"id": 0, "lat": 0.31, "lon": 32.55}],
            "edges": [{"from": 0, "to": 9, "travel_time": 1.0}]
        }"#;
        let dataset: NetworkFile = serde_json::from_str(json).expect("valid json");
        assert!(matches!(
            dataset.into_network(),
            Err(Error::UnknownNode { id: 9 })
        ));
    }

    #[test]
    fn load_network_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(sample_json().as_bytes()).expect("write");

        let (network, names) = load_network(file.path()).expect("loads");
        assert_eq!(network.node_count(), 3);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn load_network_surfaces_json_errors() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"not json").expect("write");
        assert!(matches!(
            load_network(file.path()),
            Err(Error::Json(_))
        ));
    }
}
