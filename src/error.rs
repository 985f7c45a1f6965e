use thiserror::Error;

use crate::table::TableError;

/// Errors raised while scanning one chunk.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("line at offset {offset} has no separator")]
    MissingSeparator { offset: u64 },

    #[error("line at offset {offset}: {source}")]
    Table {
        offset: u64,
        #[source]
        source: TableError,
    },
}

impl ScanError {
    /// Shifts the reported offset by `base`, turning a chunk-relative offset
    /// into a file offset.
    pub fn rebase(self, base: u64) -> Self {
        match self {
            ScanError::MissingSeparator { offset } => ScanError::MissingSeparator {
                offset: offset + base,
            },
            ScanError::Table { offset, source } => ScanError::Table {
                offset: offset + base,
                source,
            },
        }
    }

    pub fn offset(&self) -> u64 {
        match self {
            ScanError::MissingSeparator { offset } | ScanError::Table { offset, .. } => *offset,
        }
    }
}

/// Errors that abort an aggregation run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
