//! Error types for ingestion, aggregation and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning CSV rows into typed records.
///
/// `line` is the 1-based line number in the source file, header included.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: column `{field}` must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: column `{field}` has unknown value {value:?}")]
    UnknownCategory {
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Invariant violations inside the grouped aggregator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("record removed from group {key} which never received it")]
    UnknownGroup { key: String },

    #[error("record removed from empty group {key}")]
    GroupUnderflow { key: String },

    #[error("grouping handle {id} no longer refers to a registered grouping")]
    StaleHandle { id: usize },

    #[error("dimension {id} does not belong to this cross-filter")]
    UnknownDimension { id: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for operations spanning several concerns.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
