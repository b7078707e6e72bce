//! Graph-preparation engine for narrative co-occurrence maps.
//!
//! Themes are nodes positioned upstream, edges join themes that appear together. For a
//! selected period the engine filters to connected themes, aggregates topic clusters,
//! places cluster labels, annotates edges and samples hover points, and returns a
//! serializable [`RenderPayload`] for a rendering layer to draw.

pub mod engine;
pub mod error;
pub mod graph;
pub mod period;
pub mod search;
pub mod table;
pub mod topics;
pub mod util;

pub use engine::{
    BatchReport, EngineConfig, NarrativeEngine, NodeScope, PeriodReport, RenderPayload, Summary,
};
pub use error::TableError;
pub use graph::{Dataset, EdgeRecord, NodeRecord, Notice, Position, TableKind};
pub use period::{Period, PeriodIndex, period_label};
pub use table::{TableCache, dataset_from_json, dataset_from_values, load_dataset};
pub use topics::{TopicCatalog, TopicStyle};
