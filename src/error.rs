//! Error types for mastore
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::tig::TigClass;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for store operations
///
/// Loading a tig outside the session's partition is not an error; those
/// lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store not found: {0}")]
    NotFound(PathBuf),

    #[error("Store already exists: {0}")]
    AlreadyExists(PathBuf),

    // -------------------------------------------------------------------------
    // Addressing Errors
    // -------------------------------------------------------------------------
    #[error("Tig {id} out of range (store holds {len})")]
    OutOfRange { id: u32, len: u32 },

    #[error("{class} {id} was never written")]
    NotWritten { class: TigClass, id: u32 },

    #[error("Partition {0} out of range")]
    InvalidPartition(u32),

    #[error("Version {0} out of range")]
    InvalidVersion(u32),

    // -------------------------------------------------------------------------
    // Corruption Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt metadata: {0}")]
    CorruptMetadata(String),

    #[error("Corrupt payload at v{version:03}.p{partition:03} offset {offset}: {reason}")]
    CorruptPayload {
        version: u32,
        partition: u32,
        offset: u64,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Partitioning Errors
    // -------------------------------------------------------------------------
    #[error("Operation not supported on a partitioned store: {0}")]
    UnsupportedInPartitionedMode(&'static str),

    #[error("Tig {id} claimed by partitions {first} and {second}")]
    PartitionOverlap { id: u32, first: u32, second: u32 },

    #[error("Cannot restrict to unitig partition {unitig} and contig partition {contig} at once")]
    ConflictingRestriction { unitig: u32, contig: u32 },

    // -------------------------------------------------------------------------
    // Access Errors
    // -------------------------------------------------------------------------
    #[error("Store is opened read-only")]
    ReadOnly,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
