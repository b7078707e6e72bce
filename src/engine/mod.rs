use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::{Dataset, NodeIndex, NodeRecord};
use crate::period::{Period, PeriodIndex};
use crate::search::search_themes;
use crate::topics::TopicCatalog;

mod centroid;
mod clusters;
mod connectivity;
mod enrich;
mod hover;
mod payload;
mod report;
mod style;

pub use centroid::{ClusterLabel, LabelLayout, label_angles, layout_labels, weighted_centroid};
pub use clusters::{ClusterStats, CoOccurrence, aggregate_clusters, ranked_by_share};
pub use connectivity::{Connectivity, co_occurrence_rate, connected_mask, measure};
pub use enrich::{EdgeLine, EdgeStyle, UNKNOWN_CLUSTER, edge_hover_text, enrich_edges, node_hover_text};
pub use hover::{HoverPoint, HoverSampling, hover_point_count, sample_edge, sample_edges};
pub use payload::{NodePoint, RenderPayload, Summary};
pub use report::{BatchReport, PeriodReport};

use self::payload::{PayloadParts, assemble};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeScope {
    /// Every node of the period with a cluster name.
    #[default]
    All,
    /// Only nodes touched by at least one edge.
    Connected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub arc_span: f64,
    pub label_radius: f64,
    pub hover_density: f64,
    pub min_hover_points: usize,
    /// Per-edge hover point ceiling; unset by default.
    pub max_hover_points: Option<usize>,
    pub node_scope: NodeScope,
    pub node_size_divisor: f64,
    pub edge_width_scale: f64,
    pub edge_width_max: f64,
    pub rotate_quarter_turn: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arc_span: 1.2 * PI,
            label_radius: 0.27,
            hover_density: 20.0,
            min_hover_points: 5,
            max_hover_points: None,
            node_scope: NodeScope::All,
            node_size_divisor: 1.0,
            edge_width_scale: 0.02,
            edge_width_max: 8.0,
            rotate_quarter_turn: false,
        }
    }
}

impl EngineConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid engine config in {}", path.display()))
    }

    fn label_layout(&self) -> LabelLayout {
        LabelLayout {
            arc_span: self.arc_span,
            radius: self.label_radius,
        }
    }

    fn hover_sampling(&self) -> HoverSampling {
        HoverSampling {
            density: self.hover_density,
            min_points: self.min_hover_points,
            max_points: self.max_hover_points,
        }
    }

    fn edge_style(&self) -> EdgeStyle {
        EdgeStyle {
            width_scale: self.edge_width_scale,
            width_max: self.edge_width_max,
        }
    }
}

/// Turns the loaded tables into a render payload for any period.
///
/// Every call recomputes from the read-only tables; nothing derived is cached between calls,
/// so payloads for different periods can be prepared concurrently.
pub struct NarrativeEngine {
    dataset: Arc<Dataset>,
    catalog: TopicCatalog,
    config: EngineConfig,
}

impl NarrativeEngine {
    pub fn new(dataset: Arc<Dataset>, catalog: TopicCatalog, config: EngineConfig) -> Self {
        let dataset = if config.rotate_quarter_turn {
            Arc::new(dataset.rotated())
        } else {
            dataset
        };

        Self {
            dataset,
            catalog,
            config,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn periods(&self) -> PeriodIndex {
        PeriodIndex::from_dataset(&self.dataset)
    }

    pub fn report<'a>(&'a self, payload: &'a RenderPayload) -> PeriodReport<'a> {
        PeriodReport {
            notices: self.dataset.notices(),
            payload,
        }
    }

    pub fn batch_report<'a>(&'a self, periods: &'a [RenderPayload]) -> BatchReport<'a> {
        BatchReport {
            notices: self.dataset.notices(),
            periods,
        }
    }

    pub fn prepare_key(&self, key: &str) -> RenderPayload {
        self.prepare(&Period::new(key))
    }

    pub fn prepare_with_search(&self, period: &Period, query: &str) -> RenderPayload {
        let mut payload = self.prepare(period);
        payload.highlighted = search_themes(&payload.nodes, query);
        payload
    }

    /// One payload per period in period order. Periods are split into contiguous chunks,
    /// one scoped thread per chunk, at most one chunk per available core.
    pub fn prepare_all(&self) -> Vec<RenderPayload> {
        let periods = self.periods();
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = periods.len().div_ceil(workers).max(1);

        thread::scope(|scope| {
            let handles = periods
                .periods()
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|period| self.prepare(period))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }

    pub fn prepare(&self, period: &Period) -> RenderPayload {
        let slice = self.dataset.period_slice(&period.key);
        let index = NodeIndex::build(&slice.nodes, &slice.edges);
        debug!(
            period = %period.key,
            nodes = slice.nodes.len(),
            edges = slice.edges.len(),
            mode = ?index.mode(),
            "preparing period"
        );

        let (connectivity, mask) = measure(&slice.nodes, &slice.edges, &index);
        let cluster_stats = aggregate_clusters(&slice.nodes, &slice.edges, &index, &self.catalog);

        let mut groups: BTreeMap<&str, Vec<&NodeRecord>> = BTreeMap::new();
        let mut group_flags: BTreeMap<&str, Vec<bool>> = BTreeMap::new();
        for (&node, &connected) in slice.nodes.iter().zip(&mask) {
            if self.config.node_scope == NodeScope::Connected && !connected {
                continue;
            }
            let Some(cluster) = node.cluster_name.as_deref() else {
                continue;
            };
            groups.entry(cluster).or_default().push(node);
            group_flags.entry(cluster).or_default().push(connected);
        }

        let cluster_color_map = self.catalog.color_map(groups.keys().copied());
        let fallback_color = self.catalog.fallback.color.as_str();

        let nodes = groups
            .iter()
            .flat_map(|(&cluster, members)| {
                let color = cluster_color_map
                    .get(cluster)
                    .map(String::as_str)
                    .unwrap_or(fallback_color);
                let flags = group_flags.get(cluster).map(Vec::as_slice).unwrap_or(&[]);
                members.iter().zip(flags).map(move |(&node, &connected)| {
                    NodePoint::new(node, cluster, color, self.config.node_size_divisor, connected)
                })
            })
            .collect::<Vec<_>>();

        let labels = layout_labels(
            &groups,
            &cluster_color_map,
            fallback_color,
            self.config.label_layout(),
        );
        let edges = enrich_edges(&slice.edges, &index, self.config.edge_style());
        let hover_points = sample_edges(&edges, self.config.hover_sampling());

        let summary = Summary {
            total_nodes: connectivity.total_nodes,
            total_edges: slice.edges.len(),
            connected_count: connectivity.connected_count,
            co_occurrence_rate: connectivity.co_occurrence_rate,
        };
        info!(
            period = %period.label,
            total_nodes = summary.total_nodes,
            total_edges = summary.total_edges,
            connected = summary.connected_count,
            hover_points = hover_points.len(),
            "prepared render payload"
        );

        assemble(PayloadParts {
            period: period.clone(),
            summary,
            edges,
            hover_points,
            nodes,
            labels,
            cluster_color_map,
            clusters: ranked_by_share(&cluster_stats),
        })
    }
}
