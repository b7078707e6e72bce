use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::TableError;
use crate::graph::{Dataset, EdgeRecord, NodeRecord, Notice, Position, TableKind};

use super::parse::{Row, coerce_f64, coerce_string, has_column, parse_table, rows_from_value};
use super::source::read_table_source;

const NODE_COLUMNS: [&str; 7] = [
    "quarter",
    "x",
    "y",
    "cluster_name",
    "theme",
    "avg_score",
    "scaled_size",
];
const EDGE_COLUMNS: [&str; 9] = [
    "quarter", "x0", "y0", "x1", "y1", "weight", "color", "theme_1", "theme_2",
];

pub const DEFAULT_EDGE_COLOR: &str = "#808080";

pub fn load_dataset(nodes_path: &Path, edges_path: &Path) -> Result<Dataset> {
    let nodes_raw = read_table_source(nodes_path, TableKind::Nodes)?;
    let edges_raw = read_table_source(edges_path, TableKind::Edges)?;

    dataset_from_json(&nodes_raw, &edges_raw).with_context(|| {
        format!(
            "failed to load tables from {} and {}",
            nodes_path.display(),
            edges_path.display()
        )
    })
}

pub fn dataset_from_json(nodes_raw: &str, edges_raw: &str) -> Result<Dataset> {
    let node_rows = parse_table(nodes_raw, TableKind::Nodes)?;
    let edge_rows = parse_table(edges_raw, TableKind::Edges)?;
    dataset_from_rows(node_rows, edge_rows)
}

pub fn dataset_from_values(nodes: Value, edges: Value) -> Result<Dataset> {
    let node_rows = rows_from_value(nodes, TableKind::Nodes)?;
    let edge_rows = rows_from_value(edges, TableKind::Edges)?;
    dataset_from_rows(node_rows, edge_rows)
}

fn dataset_from_rows(node_rows: Vec<Row>, edge_rows: Vec<Row>) -> Result<Dataset> {
    require_columns(&node_rows, TableKind::Nodes, &NODE_COLUMNS)?;
    require_columns(&edge_rows, TableKind::Edges, &EDGE_COLUMNS)?;

    let mut notices = Vec::new();
    for (rows, table) in [(&node_rows, TableKind::Nodes), (&edge_rows, TableKind::Edges)] {
        if !rows.is_empty() && !has_column(rows, "sentiment") {
            let notice = Notice::missing_sentiment(table);
            warn!(table = table.label(), "{}", notice.message);
            notices.push(notice);
        }
    }

    let nodes = node_rows
        .iter()
        .enumerate()
        .map(|(row, values)| node_from_row(row, values))
        .collect::<Vec<_>>();
    let edges = edge_rows
        .iter()
        .enumerate()
        .map(|(row, values)| edge_from_row(row, values))
        .collect::<Vec<_>>();

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        notices = notices.len(),
        "loaded narrative tables"
    );

    Ok(Dataset::new(nodes, edges, notices))
}

fn require_columns(rows: &[Row], table: TableKind, columns: &[&'static str]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    match columns.iter().find(|column| !has_column(rows, column)) {
        Some(&column) => Err(TableError::MissingColumn { table, column }.into()),
        None => Ok(()),
    }
}

fn number(values: &Row, column: &str, row: usize, table: TableKind) -> f64 {
    let value = values.get(column);
    match coerce_f64(value) {
        Some(number) => number,
        None => {
            if value.is_some_and(|value| !value.is_null()) {
                debug!(table = table.label(), row, column, "non-numeric value, using 0.0");
            }
            0.0
        }
    }
}

fn text(values: &Row, column: &str) -> String {
    coerce_string(values.get(column)).unwrap_or_default()
}

fn node_from_row(row: usize, values: &Row) -> NodeRecord {
    let table = TableKind::Nodes;
    NodeRecord {
        id: coerce_string(values.get("id")),
        quarter: text(values, "quarter"),
        position: Position::new(
            number(values, "x", row, table),
            number(values, "y", row, table),
        ),
        cluster_name: coerce_string(values.get("cluster_name")),
        theme: text(values, "theme"),
        avg_score: number(values, "avg_score", row, table),
        scaled_size: number(values, "scaled_size", row, table),
        sentiment: number(values, "sentiment", row, table),
    }
}

fn edge_from_row(row: usize, values: &Row) -> EdgeRecord {
    let table = TableKind::Edges;
    EdgeRecord {
        source: coerce_string(values.get("source")),
        target: coerce_string(values.get("target")),
        quarter: text(values, "quarter"),
        start: Position::new(
            number(values, "x0", row, table),
            number(values, "y0", row, table),
        ),
        end: Position::new(
            number(values, "x1", row, table),
            number(values, "y1", row, table),
        ),
        weight: number(values, "weight", row, table),
        color: coerce_string(values.get("color"))
            .unwrap_or_else(|| DEFAULT_EDGE_COLOR.to_string()),
        sentiment: number(values, "sentiment", row, table),
        theme_1: text(values, "theme_1"),
        theme_2: text(values, "theme_2"),
    }
}
