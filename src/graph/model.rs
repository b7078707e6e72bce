use serde::Serialize;

use crate::util::truncate_to_int;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Nodes,
    Edges,
}

impl TableKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Edges => "edges",
        }
    }
}

/// Degraded-data notice raised while loading a table, meant for display by the UI layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub table: TableKind,
    pub message: String,
}

impl Notice {
    pub fn missing_sentiment(table: TableKind) -> Self {
        Self {
            table,
            message: format!(
                "Sentiment data not found in {}. Using default values.",
                table.label()
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `(x, y) -> (-y, x)`, the display orientation used by the dashboard.
    pub fn quarter_turn(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id: Option<String>,
    pub quarter: String,
    pub position: Position,
    pub cluster_name: Option<String>,
    pub theme: String,
    pub avg_score: f64,
    pub scaled_size: f64,
    pub sentiment: f64,
}

impl NodeRecord {
    pub fn avg_score_display(&self) -> i64 {
        truncate_to_int(self.avg_score)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub source: Option<String>,
    pub target: Option<String>,
    pub quarter: String,
    pub start: Position,
    pub end: Position,
    pub weight: f64,
    pub color: String,
    pub sentiment: f64,
    pub theme_1: String,
    pub theme_2: String,
}

/// Borrowed view of one period's nodes and edges.
#[derive(Clone, Debug, Default)]
pub struct PeriodSlice<'a> {
    pub nodes: Vec<&'a NodeRecord>,
    pub edges: Vec<&'a EdgeRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    notices: Vec<Notice>,
}

impl Dataset {
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>, notices: Vec<Notice>) -> Self {
        Self {
            nodes,
            edges,
            notices,
        }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn period_slice(&self, quarter: &str) -> PeriodSlice<'_> {
        PeriodSlice {
            nodes: self
                .nodes
                .iter()
                .filter(|node| node.quarter == quarter)
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|edge| edge.quarter == quarter)
                .collect(),
        }
    }

    pub fn rotated(&self) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|node| NodeRecord {
                position: node.position.quarter_turn(),
                ..node.clone()
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| EdgeRecord {
                start: edge.start.quarter_turn(),
                end: edge.end.quarter_turn(),
                ..edge.clone()
            })
            .collect();

        Self {
            nodes,
            edges,
            notices: self.notices.clone(),
        }
    }
}
