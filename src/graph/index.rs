use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use super::model::{EdgeRecord, NodeRecord, Position};

/// Exact-equality hash key for a position. `-0.0` and `0.0` share a key; NaN has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey(u64, u64);

impl PositionKey {
    pub fn new(position: Position) -> Option<Self> {
        if position.x.is_nan() || position.y.is_nan() {
            return None;
        }

        Some(Self(canonical_bits(position.x), canonical_bits(position.y)))
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinMode {
    Identifier,
    Coordinate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoinKey<'a> {
    Id(&'a str),
    Position(PositionKey),
}

#[derive(Clone, Copy, Debug)]
pub struct Endpoint<'a> {
    pub id: Option<&'a str>,
    pub position: Position,
}

impl EdgeRecord {
    pub fn start_endpoint(&self) -> Endpoint<'_> {
        Endpoint {
            id: self.source.as_deref(),
            position: self.start,
        }
    }

    pub fn end_endpoint(&self) -> Endpoint<'_> {
        Endpoint {
            id: self.target.as_deref(),
            position: self.end,
        }
    }
}

/// Resolves edge endpoints to the nodes of one period.
///
/// Joins on explicit ids when every node and every edge endpoint of the period carries one,
/// otherwise on exact position equality. Duplicate keys keep the first node.
pub struct NodeIndex<'a> {
    mode: JoinMode,
    by_key: HashMap<JoinKey<'a>, &'a NodeRecord>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(nodes: &[&'a NodeRecord], edges: &[&'a EdgeRecord]) -> Self {
        let identified = !nodes.is_empty()
            && nodes.iter().all(|node| node.id.is_some())
            && edges
                .iter()
                .all(|edge| edge.source.is_some() && edge.target.is_some());
        let mode = if identified {
            JoinMode::Identifier
        } else {
            JoinMode::Coordinate
        };

        let mut by_key = HashMap::with_capacity(nodes.len());
        for &node in nodes {
            let Some(key) = Self::key_for(mode, node.id.as_deref(), node.position) else {
                continue;
            };

            match by_key.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
                Entry::Occupied(_) => {
                    debug!(?key, theme = %node.theme, "duplicate node key in period, keeping first");
                }
            }
        }

        Self { mode, by_key }
    }

    fn key_for(mode: JoinMode, id: Option<&'a str>, position: Position) -> Option<JoinKey<'a>> {
        match (mode, id) {
            (JoinMode::Identifier, Some(id)) => Some(JoinKey::Id(id)),
            _ => PositionKey::new(position).map(JoinKey::Position),
        }
    }

    pub fn mode(&self) -> JoinMode {
        self.mode
    }

    pub fn node_key(&self, node: &'a NodeRecord) -> Option<JoinKey<'a>> {
        Self::key_for(self.mode, node.id.as_deref(), node.position)
    }

    pub fn endpoint_key(&self, endpoint: Endpoint<'a>) -> Option<JoinKey<'a>> {
        Self::key_for(self.mode, endpoint.id, endpoint.position)
    }

    pub fn resolve(&self, endpoint: Endpoint<'a>) -> Option<&'a NodeRecord> {
        let key = self.endpoint_key(endpoint)?;
        self.by_key.get(&key).copied()
    }

    pub fn resolve_cluster(&self, endpoint: Endpoint<'a>) -> Option<&'a str> {
        self.resolve(endpoint)?.cluster_name.as_deref()
    }
}
