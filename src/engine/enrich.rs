use serde::Serialize;

use crate::graph::{EdgeRecord, NodeIndex, NodeRecord, Position};
use crate::util::truncate_to_int;

use super::style::edge_width;

pub const UNKNOWN_CLUSTER: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub width_scale: f64,
    pub width_max: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeLine {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub weight: f64,
    pub width: f64,
    pub color: String,
    pub sentiment: f64,
    pub source_cluster: String,
    pub target_cluster: String,
    pub hover_text: String,
}

impl EdgeLine {
    pub fn length(&self) -> f64 {
        Position::new(self.x0, self.y0).distance_to(Position::new(self.x1, self.y1))
    }
}

pub fn edge_hover_text(
    source_cluster: &str,
    target_cluster: &str,
    edge: &EdgeRecord,
) -> String {
    format!(
        "<b>Topics:</b> {source_cluster} ↔ {target_cluster}<br><b>Themes:</b> {} ↔ {}<br><b>Engagement Score:</b> {}<br><b>Sentiment:</b> {:.2}",
        edge.theme_1,
        edge.theme_2,
        truncate_to_int(edge.weight),
        edge.sentiment
    )
}

pub fn node_hover_text(cluster: &str, node: &NodeRecord) -> String {
    format!(
        "<b>Topic:</b> {cluster}<br><b>Theme:</b> {}<br><b>Engagement Score:</b> {}<br><b>Sentiment:</b> {:.2}",
        node.theme,
        node.avg_score_display(),
        node.sentiment
    )
}

/// Each endpoint is resolved independently; a side with no matching node reads "Unknown".
pub fn enrich_edges<'a>(
    edges: &[&'a EdgeRecord],
    index: &NodeIndex<'a>,
    style: EdgeStyle,
) -> Vec<EdgeLine> {
    edges
        .iter()
        .map(|&edge| {
            let source_cluster = index
                .resolve_cluster(edge.start_endpoint())
                .unwrap_or(UNKNOWN_CLUSTER);
            let target_cluster = index
                .resolve_cluster(edge.end_endpoint())
                .unwrap_or(UNKNOWN_CLUSTER);

            EdgeLine {
                x0: edge.start.x,
                y0: edge.start.y,
                x1: edge.end.x,
                y1: edge.end.y,
                weight: edge.weight,
                width: edge_width(edge.weight, style.width_scale, style.width_max),
                color: edge.color.clone(),
                sentiment: edge.sentiment,
                source_cluster: source_cluster.to_string(),
                target_cluster: target_cluster.to_string(),
                hover_text: edge_hover_text(source_cluster, target_cluster, edge),
            }
        })
        .collect()
}
