use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::Serialize;

use crate::graph::{NodeRecord, Position};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelLayout {
    pub arc_span: f64,
    pub radius: f64,
}

/// Size-weighted mean position; plain mean when the sizes sum to zero.
pub fn weighted_centroid(members: &[&NodeRecord]) -> Option<Position> {
    if members.is_empty() {
        return None;
    }

    let total_weight = members.iter().map(|node| node.scaled_size).sum::<f64>();
    if total_weight.is_finite() && total_weight.abs() > f64::EPSILON {
        let (x, y) = members.iter().fold((0.0, 0.0), |(x, y), node| {
            (
                x + node.position.x * node.scaled_size,
                y + node.position.y * node.scaled_size,
            )
        });
        return Some(Position::new(x / total_weight, y / total_weight));
    }

    let count = members.len() as f64;
    let (x, y) = members
        .iter()
        .fold((0.0, 0.0), |(x, y), node| (x + node.position.x, y + node.position.y));
    Some(Position::new(x / count, y / count))
}

/// Evenly spaced angles over `arc_span` (end excluded), shifted by `PI / count`.
pub fn label_angles(count: usize, arc_span: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let step = arc_span / count as f64;
    let phase = PI / count as f64;
    (0..count).map(|index| index as f64 * step + phase).collect()
}

/// One label per group, placed at the offset centroid in the map's (sorted) key order.
pub fn layout_labels(
    groups: &BTreeMap<&str, Vec<&NodeRecord>>,
    color_map: &BTreeMap<String, String>,
    fallback_color: &str,
    layout: LabelLayout,
) -> Vec<ClusterLabel> {
    let centroids = groups
        .iter()
        .filter_map(|(&name, members)| weighted_centroid(members).map(|centroid| (name, centroid)))
        .collect::<Vec<_>>();
    let angles = label_angles(centroids.len(), layout.arc_span);

    centroids
        .into_iter()
        .zip(angles)
        .map(|((name, centroid), angle)| ClusterLabel {
            x: centroid.x + layout.radius * angle.cos(),
            y: centroid.y + layout.radius * angle.sin(),
            text: name.to_string(),
            color: color_map
                .get(name)
                .cloned()
                .unwrap_or_else(|| fallback_color.to_string()),
        })
        .collect()
}
