use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicStyle {
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

impl TopicStyle {
    fn new(color: &str, icon: &str, description: &str) -> Self {
        Self {
            color: color.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
        }
    }
}

/// Static topic lookup: sidebar style per cluster, a fallback entry for unknown
/// clusters, and the ordered palette assigned to clusters on the graph itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicCatalog {
    pub topics: BTreeMap<String, TopicStyle>,
    pub fallback: TopicStyle,
    pub palette: Vec<String>,
}

impl Default for TopicCatalog {
    fn default() -> Self {
        let topics = [
            ("Self-Regulation", "#1f77b4", "🎯", "Steady flow"),
            ("Awareness", "#84cc16", "🌿", "Clear stream"),
            ("Buddhism & Spirituality", "#f59e0b", "🕉️", "Mountain spring"),
            ("Concentration & Flow", "#ef4444", "🎯", "Fast current"),
            ("Practice, Retreat, & Meta", "#a855f7", "🏛️", "Deep wellspring"),
            ("Anxiety & Mental Health", "#22c55e", "💚", "Growing tributary"),
            ("Meditation & Mindfulness", "#17becf", "🧘", "Main river"),
        ]
        .into_iter()
        .map(|(name, color, icon, description)| {
            (name.to_string(), TopicStyle::new(color, icon, description))
        })
        .collect();

        Self {
            topics,
            fallback: TopicStyle::new("#64748b", "📊", "Flow pattern"),
            palette: [
                "#1f77b4", "#808000", "#ff7f0e", "#d62728", "#9467bd", "#8c564b", "#17becf",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl TopicCatalog {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read topic catalog {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid topic catalog in {}", path.display()))
    }

    pub fn style(&self, cluster: &str) -> &TopicStyle {
        self.topics.get(cluster).unwrap_or(&self.fallback)
    }

    pub fn palette_color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return &self.fallback.color;
        }
        &self.palette[index % self.palette.len()]
    }

    /// Palette colors assigned in sorted cluster order.
    pub fn color_map<'a>(&self, clusters: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, String> {
        let mut names = clusters.into_iter().collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();

        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (name.to_string(), self.palette_color(index).to_string()))
            .collect()
    }
}
