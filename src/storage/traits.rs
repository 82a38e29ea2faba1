//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and
//! associated error types.

use crate::catalog::{Code, NodeRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a record
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Error creating output directory {} for code '{code}': {source}", .path.display())]
    CreateDir {
        code: Code,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error saving data for code '{code}' to {}: {source}", .path.display())]
    Io {
        code: Code,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error for code '{code}': {source}")]
    Serialization {
        code: Code,
        source: serde_json::Error,
    },
}

impl StoreError {
    /// The code whose record could not be saved
    pub fn code(&self) -> &Code {
        match self {
            Self::CreateDir { code, .. } | Self::Io { code, .. } | Self::Serialization { code, .. } => {
                code
            }
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for record store implementations
///
/// A store keeps exactly one record per code. Saving a code again replaces
/// the previous record.
pub trait RecordStore {
    /// Persists `record` under `code`
    ///
    /// # Returns
    ///
    /// The location the record was written to
    fn save(&self, code: &Code, record: &NodeRecord) -> StoreResult<PathBuf>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn save(&self, code: &Code, record: &NodeRecord) -> StoreResult<PathBuf> {
        (**self).save(code, record)
    }
}
