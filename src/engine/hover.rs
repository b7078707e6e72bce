use serde::Serialize;

use crate::graph::Position;

use super::enrich::EdgeLine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverSampling {
    pub density: f64,
    pub min_points: usize,
    /// Optional per-edge ceiling applied after the minimum; `None` keeps the formula exact.
    pub max_points: Option<usize>,
}

/// Invisible hit-test point along an edge, carrying the edge's annotation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoverPoint {
    pub x: f64,
    pub y: f64,
    pub hover_text: String,
    pub color: String,
}

/// `max(min_points, floor(length * density))`, clamped to `max_points` when one is set.
pub fn hover_point_count(length: f64, sampling: HoverSampling) -> usize {
    let scaled = (length * sampling.density).floor();
    let scaled = if scaled.is_finite() && scaled > 0.0 {
        scaled as usize
    } else {
        0
    };
    let count = scaled.max(sampling.min_points);
    match sampling.max_points {
        Some(max_points) => count.min(max_points),
        None => count,
    }
}

pub fn sample_edge(edge: &EdgeLine, sampling: HoverSampling) -> Vec<HoverPoint> {
    let start = Position::new(edge.x0, edge.y0);
    let end = Position::new(edge.x1, edge.y1);
    let count = hover_point_count(edge.length(), sampling);

    (0..count)
        .map(|index| {
            let t = if count > 1 {
                index as f64 / (count - 1) as f64
            } else {
                0.0
            };
            let point = start.lerp(end, t);
            HoverPoint {
                x: point.x,
                y: point.y,
                hover_text: edge.hover_text.clone(),
                color: edge.color.clone(),
            }
        })
        .collect()
}

pub fn sample_edges(edges: &[EdgeLine], sampling: HoverSampling) -> Vec<HoverPoint> {
    edges
        .iter()
        .flat_map(|edge| sample_edge(edge, sampling))
        .collect()
}
