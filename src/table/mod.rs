mod cache;
mod collect;
mod parse;
mod source;

pub use cache::TableCache;
pub use collect::{DEFAULT_EDGE_COLOR, dataset_from_json, dataset_from_values, load_dataset};
