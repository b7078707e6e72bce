use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::NodeRecord;
use crate::period::Period;
use crate::util::format_count;

use super::centroid::ClusterLabel;
use super::clusters::ClusterStats;
use super::enrich::{EdgeLine, node_hover_text};
use super::hover::HoverPoint;
use super::style::{contrasting_text_color, hover_background};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    pub cluster: String,
    pub theme: String,
    pub avg_score_display: i64,
    pub sentiment: f64,
    pub connected: bool,
    pub hover_text: String,
    pub hover_bgcolor: String,
    pub hover_font_color: String,
}

impl NodePoint {
    pub fn new(node: &NodeRecord, cluster: &str, color: &str, size_divisor: f64, connected: bool) -> Self {
        let size = if size_divisor > 0.0 {
            node.scaled_size / size_divisor
        } else {
            node.scaled_size
        };

        Self {
            x: node.position.x,
            y: node.position.y,
            size,
            color: color.to_string(),
            cluster: cluster.to_string(),
            theme: node.theme.clone(),
            avg_score_display: node.avg_score_display(),
            sentiment: node.sentiment,
            connected,
            hover_text: node_hover_text(cluster, node),
            hover_bgcolor: hover_background(color),
            hover_font_color: contrasting_text_color(color).to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub connected_count: usize,
    pub co_occurrence_rate: f64,
}

impl Summary {
    pub fn headline(&self, label: &str) -> String {
        format!(
            "Quarter {label}: {} connected themes out of {} total ({:.1}% co-occurrence rate) • {} narrative connections",
            format_count(self.connected_count),
            format_count(self.total_nodes),
            self.co_occurrence_rate,
            format_count(self.total_edges)
        )
    }
}

/// Render-ready output for one period. Maps are ordered so serialization is byte-stable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderPayload {
    pub period: Period,
    #[serde(flatten)]
    pub summary: Summary,
    pub is_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    pub edges: Vec<EdgeLine>,
    pub hover_points: Vec<HoverPoint>,
    pub nodes: Vec<NodePoint>,
    pub labels: Vec<ClusterLabel>,
    pub cluster_color_map: BTreeMap<String, String>,
    pub clusters: Vec<ClusterStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlighted: Vec<usize>,
}

pub(super) struct PayloadParts {
    pub(super) period: Period,
    pub(super) summary: Summary,
    pub(super) edges: Vec<EdgeLine>,
    pub(super) hover_points: Vec<HoverPoint>,
    pub(super) nodes: Vec<NodePoint>,
    pub(super) labels: Vec<ClusterLabel>,
    pub(super) cluster_color_map: BTreeMap<String, String>,
    pub(super) clusters: Vec<ClusterStats>,
}

pub(super) fn assemble(parts: PayloadParts) -> RenderPayload {
    let is_empty = parts.summary.total_nodes == 0;
    let empty_message =
        is_empty.then(|| format!("No data available for {}", parts.period.label));

    RenderPayload {
        period: parts.period,
        summary: parts.summary,
        is_empty,
        empty_message,
        edges: parts.edges,
        hover_points: parts.hover_points,
        nodes: parts.nodes,
        labels: parts.labels,
        cluster_color_map: parts.cluster_color_map,
        clusters: parts.clusters,
        highlighted: Vec::new(),
    }
}

impl RenderPayload {
    pub fn headline(&self) -> String {
        self.summary.headline(&self.period.label)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
