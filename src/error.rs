// In: src/error.rs

//! This module defines the single, unified error type for the indisort crate.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Only loading and configuration can fail. Sorting an already-built index has no
//! failure mode, so the ordering engine never returns this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndisortError {
    // =========================================================================
    // === Load & Schema Errors
    // =========================================================================
    #[error("Unsupported data type for a key column: {0}")]
    UnsupportedType(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The logical index is not a permutation of the store's rows.
    #[error("Invalid logical index: {0}")]
    InvalidIndex(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the Parquet reader.
    #[error("Parquet decode failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// An error originating from the underlying I/O subsystem (e.g., directory not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, raised while reading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, IndisortError>;
