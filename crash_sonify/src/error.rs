// Error taxonomy for the sonification pipeline.
//
// Errors come in three layers:
// - `FieldError`: one record could not be mapped by one generator. Always
//   names the 0-based record index so the offending row can be found.
// - `TableError`: the source table could not be read or decoded.
// - `SonifyError`: what the pipeline surfaces. A `FieldError` is wrapped with
//   the p-field that was being computed; structural and config problems are
//   reported directly.
//
// Nothing in the pipeline recovers from any of these. The first error aborts
// the batch and no score text is produced.

use crate::params::Field;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("record {index}: {column} value {value:?} is not a valid number")]
    InputFormat {
        index: usize,
        column: &'static str,
        value: String,
    },

    #[error("record {index}: {column} timestamp {value:?} does not match format {format:?}")]
    TimestampParse {
        index: usize,
        column: &'static str,
        value: String,
        format: String,
    },

    #[error("record {index}: {column} value {value:?} has no mapping")]
    UnmappedCategory {
        index: usize,
        column: &'static str,
        value: String,
    },

    #[error("record {index}: elapsed time of {elapsed_seconds}s must be more than 1 second")]
    NonPositiveDuration { index: usize, elapsed_seconds: f64 },
}

impl FieldError {
    /// Index of the record that failed.
    pub fn record_index(&self) -> usize {
        match self {
            FieldError::InputFormat { index, .. }
            | FieldError::TimestampParse { index, .. }
            | FieldError::UnmappedCategory { index, .. }
            | FieldError::NonPositiveDuration { index, .. } => *index,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum SonifyError {
    #[error("failed to compute {field}")]
    Field {
        field: Field,
        #[source]
        source: FieldError,
    },

    #[error("parameter table is missing field {field}")]
    MissingField { field: Field },

    #[error("parameter field {field} was computed twice")]
    DuplicateField { field: Field },

    #[error("parameter column {field} has {actual} values, expected {expected}")]
    ColumnLength {
        field: Field,
        expected: usize,
        actual: usize,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to load record table {}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

impl SonifyError {
    /// Attach the file being read to a table loading failure.
    pub fn table(path: &Path) -> impl FnOnce(TableError) -> SonifyError + '_ {
        move |source| SonifyError::Table {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach the p-field being computed to a generator failure.
    pub fn field(field: Field) -> impl FnOnce(FieldError) -> SonifyError {
        move |source| SonifyError::Field { field, source }
    }
}
