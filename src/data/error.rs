use std::io;

use thiserror::Error;

/// Failure to build a [`RecordSet`](super::model::RecordSet) from a source.
///
/// Loading is all-or-nothing: any of these aborts the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// An aggregate was asked for over zero eligible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data")]
pub struct NoData;
