use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::error::TableError;
use crate::graph::TableKind;

pub(super) type Row = Map<String, Value>;

/// Accepts an array of row objects, an object wrapping one under `records`/`data`,
/// or a column-oriented object whose columns are arrays or index-keyed objects.
pub(super) fn parse_table(raw: &str, table: TableKind) -> Result<Vec<Row>> {
    let parsed: Value = serde_json::from_str(raw)
        .with_context(|| format!("invalid JSON in {} table", table.label()))?;
    rows_from_value(parsed, table)
}

pub(super) fn rows_from_value(value: Value, table: TableKind) -> Result<Vec<Row>> {
    match value {
        Value::Array(items) => rows_from_array(items, table),
        Value::Object(mut object) => {
            for wrapper in ["records", "data"] {
                if matches!(object.get(wrapper), Some(Value::Array(_)))
                    && let Some(Value::Array(items)) = object.remove(wrapper)
                {
                    return rows_from_array(items, table);
                }
            }
            rows_from_columns(object, table)
        }
        _ => Err(TableError::NotTabular(table).into()),
    }
}

fn rows_from_array(items: Vec<Value>, table: TableKind) -> Result<Vec<Row>> {
    items
        .into_iter()
        .enumerate()
        .map(|(row, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(TableError::RowNotObject { table, row }.into()),
        })
        .collect()
}

fn rows_from_columns(object: Row, table: TableKind) -> Result<Vec<Row>> {
    let mut columns = Vec::with_capacity(object.len());
    for (name, column) in object {
        let values = match column {
            Value::Array(values) => values,
            Value::Object(indexed) => ordered_index_values(indexed),
            _ => return Err(TableError::NotTabular(table).into()),
        };
        columns.push((name, values));
    }

    let expected = columns.first().map(|(_, values)| values.len()).unwrap_or(0);
    if let Some((column, values)) = columns.iter().find(|(_, values)| values.len() != expected) {
        return Err(TableError::ColumnLengthMismatch {
            table,
            column: column.clone(),
            expected,
            found: values.len(),
        }
        .into());
    }

    let mut rows = vec![Row::new(); expected];
    for (name, values) in columns {
        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(name.clone(), value);
        }
    }
    Ok(rows)
}

// pandas' default `to_json` shape: {"col": {"0": v, "1": v}}
fn ordered_index_values(indexed: Row) -> Vec<Value> {
    let mut numbered = BTreeMap::new();
    let mut other = Vec::new();
    for (key, value) in indexed {
        match key.parse::<u64>() {
            Ok(position) => {
                numbered.insert(position, value);
            }
            Err(_) => other.push(value),
        }
    }
    numbered.into_values().chain(other).collect()
}

pub(super) fn has_column(rows: &[Row], column: &str) -> bool {
    rows.iter().any(|row| row.contains_key(column))
}

/// Numbers, numeric strings, booleans and single-element collections of those.
pub(super) fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Array(items) if items.len() == 1 => coerce_f64(items.first()),
        _ => None,
    }
    .filter(|number| !number.is_nan())
}

pub(super) fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(items) if items.len() == 1 => coerce_string(items.first()),
        _ => None,
    }
}
