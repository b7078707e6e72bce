use std::collections::HashSet;

use serde::Serialize;

use crate::graph::{EdgeRecord, NodeIndex, NodeRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Connectivity {
    pub total_nodes: usize,
    pub connected_count: usize,
    pub co_occurrence_rate: f64,
}

pub fn co_occurrence_rate(connected_count: usize, total_nodes: usize) -> f64 {
    if total_nodes == 0 {
        return 0.0;
    }
    connected_count as f64 / total_nodes as f64 * 100.0
}

/// Per-node flag (same order as `nodes`) telling whether any edge endpoint lands on the node.
pub fn connected_mask<'a>(
    nodes: &[&'a NodeRecord],
    edges: &[&'a EdgeRecord],
    index: &NodeIndex<'a>,
) -> Vec<bool> {
    let endpoints = edges
        .iter()
        .flat_map(|&edge| [edge.start_endpoint(), edge.end_endpoint()])
        .filter_map(|endpoint| index.endpoint_key(endpoint))
        .collect::<HashSet<_>>();

    nodes
        .iter()
        .map(|&node| {
            index
                .node_key(node)
                .is_some_and(|key| endpoints.contains(&key))
        })
        .collect()
}

pub fn measure<'a>(
    nodes: &[&'a NodeRecord],
    edges: &[&'a EdgeRecord],
    index: &NodeIndex<'a>,
) -> (Connectivity, Vec<bool>) {
    let mask = connected_mask(nodes, edges, index);
    let connected_count = mask.iter().filter(|&&connected| connected).count();
    let total_nodes = nodes.len();

    let connectivity = Connectivity {
        total_nodes,
        connected_count,
        co_occurrence_rate: co_occurrence_rate(connected_count, total_nodes),
    };
    (connectivity, mask)
}
