use thiserror::Error;

use crate::graph::TableKind;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("{} table is not tabular JSON: expected an array of rows or an object of columns", .0.label())]
    NotTabular(TableKind),

    #[error("{} table column `{column}` has {found} values, expected {expected}", .table.label())]
    ColumnLengthMismatch {
        table: TableKind,
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("{} table is missing required column `{column}`", .table.label())]
    MissingColumn { table: TableKind, column: &'static str },

    #[error("{} table row {row} is not an object", .table.label())]
    RowNotObject { table: TableKind, row: usize },
}
