use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::graph::TableKind;

pub(super) fn read_table_source(path: &Path, table: TableKind) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read {} table from {}", table.label(), path.display()))?;

    String::from_utf8(bytes).map_err(|error| {
        anyhow!(
            "{} table at {} was not valid UTF-8: {error}",
            table.label(),
            path.display()
        )
    })
}
