use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::graph::{EdgeRecord, NodeIndex, NodeRecord};
use crate::topics::TopicCatalog;
use crate::util::{short_name, truncate_to_int};

const TOP_CO_OCCURRENCES: usize = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoOccurrence {
    pub cluster: String,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterStats {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
    pub avg_sentiment: f64,
    pub co_occurrences: Vec<CoOccurrence>,
    pub co_occurrence_text: String,
    pub color: String,
    pub icon: String,
    pub description: String,
}

impl ClusterStats {
    /// Accumulated weight per own node, as a capped whole percentage.
    pub fn co_occurrence_share(&self, co_occurrence: &CoOccurrence) -> i64 {
        if self.count == 0 {
            return 0;
        }
        truncate_to_int(co_occurrence.weight / self.count as f64 * 100.0).min(99)
    }

    fn describe_co_occurrences(&self) -> String {
        if self.co_occurrences.is_empty() {
            return "Independent flow".to_string();
        }

        let parts = self
            .co_occurrences
            .iter()
            .map(|entry| {
                format!(
                    "{} ({}%)",
                    short_name(&entry.cluster),
                    self.co_occurrence_share(entry)
                )
            })
            .collect::<Vec<_>>();
        format!("Co-occurs with: {}", parts.join(", "))
    }
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    sentiment_sum: f64,
    // insertion order is the tie-break for equal weights
    partners: Vec<(String, f64)>,
    partner_slots: HashMap<String, usize>,
}

impl Accumulator {
    fn attribute(&mut self, other: &str, weight: f64) {
        match self.partner_slots.get(other) {
            Some(&slot) => self.partners[slot].1 += weight,
            None => {
                self.partner_slots.insert(other.to_string(), self.partners.len());
                self.partners.push((other.to_string(), weight));
            }
        }
    }

    fn top_partners(mut self) -> Vec<CoOccurrence> {
        self.partners.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.partners
            .into_iter()
            .take(TOP_CO_OCCURRENCES)
            .map(|(cluster, weight)| CoOccurrence { cluster, weight })
            .collect()
    }
}

/// Per-cluster counts, shares, mean sentiment and the two heaviest partner clusters.
///
/// Nodes without a cluster name count toward the period total but belong to no cluster.
/// An edge contributes only when both endpoints resolve and land in different clusters.
pub fn aggregate_clusters<'a>(
    nodes: &[&'a NodeRecord],
    edges: &[&'a EdgeRecord],
    index: &NodeIndex<'a>,
    catalog: &TopicCatalog,
) -> BTreeMap<String, ClusterStats> {
    let total_nodes = nodes.len();
    let mut accumulators: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for node in nodes {
        let Some(cluster) = node.cluster_name.as_deref() else {
            continue;
        };
        let accumulator = accumulators.entry(cluster).or_default();
        accumulator.count += 1;
        accumulator.sentiment_sum += node.sentiment;
    }

    for &edge in edges {
        let (Some(start), Some(end)) = (
            index.resolve_cluster(edge.start_endpoint()),
            index.resolve_cluster(edge.end_endpoint()),
        ) else {
            continue;
        };
        if start == end {
            continue;
        }

        if let Some(accumulator) = accumulators.get_mut(start) {
            accumulator.attribute(end, edge.weight);
        }
        if let Some(accumulator) = accumulators.get_mut(end) {
            accumulator.attribute(start, edge.weight);
        }
    }

    accumulators
        .into_iter()
        .map(|(name, accumulator)| {
            let style = catalog.style(name);
            let count = accumulator.count;
            let mut stats = ClusterStats {
                name: name.to_string(),
                count,
                percentage: count as f64 / total_nodes as f64 * 100.0,
                avg_sentiment: accumulator.sentiment_sum / count as f64,
                co_occurrences: accumulator.top_partners(),
                co_occurrence_text: String::new(),
                color: style.color.clone(),
                icon: style.icon.clone(),
                description: style.description.clone(),
            };
            stats.co_occurrence_text = stats.describe_co_occurrences();
            (name.to_string(), stats)
        })
        .collect()
}

/// Clusters by share, largest first; equal shares keep name order.
pub fn ranked_by_share(clusters: &BTreeMap<String, ClusterStats>) -> Vec<ClusterStats> {
    let mut ranked = clusters.values().cloned().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    ranked
}
