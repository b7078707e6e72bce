use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::Result;
use tracing::debug;

use crate::graph::Dataset;

use super::collect::load_dataset;

/// Loaded tables keyed by source location. Entries live until the process exits.
#[derive(Default)]
pub struct TableCache {
    entries: Mutex<HashMap<(PathBuf, PathBuf), Arc<Dataset>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static TableCache {
        static CACHE: OnceLock<TableCache> = OnceLock::new();
        CACHE.get_or_init(TableCache::new)
    }

    pub fn load(&self, nodes_path: &Path, edges_path: &Path) -> Result<Arc<Dataset>> {
        let key = (nodes_path.to_path_buf(), edges_path.to_path_buf());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(dataset) = entries.get(&key) {
            debug!(nodes = %nodes_path.display(), edges = %edges_path.display(), "table cache hit");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_dataset(nodes_path, edges_path)?);
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
