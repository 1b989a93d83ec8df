use std::fmt;

use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Pipeline step at which a single row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStage {
    /// Converting the raw record into an entity via the import context.
    Materialize,
    /// Entity `check()`.
    Validate,
    /// Entity `store()`.
    Store,
}

impl fmt::Display for RowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowStage::Materialize => "materialize",
            RowStage::Validate => "validate",
            RowStage::Store => "store",
        };
        f.write_str(s)
    }
}

/// Error returned by an import context or a processed entity for a single row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The raw record could not be converted into an entity.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// The entity failed validation.
    #[error("invalid entity: {0}")]
    Invalid(String),

    /// The entity could not be persisted.
    #[error("storage failed: {0}")]
    Storage(String),
}

/// Error type returned by import operations.
///
/// Whole-run failures (I/O, CSV decoding, configuration) abort an operation before or during
/// traversal. [`ImportError::Row`] carries the failure of a single row; see
/// [`ImportError::is_row_failure`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. data file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error that is not a per-row malformation.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Import `mode`/`params` could not be interpreted.
    #[error("invalid import configuration: {message}")]
    Config { message: String },

    /// A single row failed while being processed.
    #[error("row {index} (line {line}) failed to {stage}: {source}")]
    Row {
        index: usize,
        line: u64,
        stage: RowStage,
        #[source]
        source: EntityError,
    },

    /// The backing store for a model query failed.
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl ImportError {
    /// Returns `true` if this error belongs to one row rather than the whole run.
    pub fn is_row_failure(&self) -> bool {
        matches!(self, ImportError::Row { .. })
    }
}
