//! # Storage Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / lock poisoning                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← Adds key / path context                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartError::Storage (rocketshoes-cart) ← kind = Unexpected             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Generic per-operation notice                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a stored value failed.
    #[error("Failed to read '{key}' from {path}: {source}")]
    ReadFailed {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a value failed.
    ///
    /// ## When This Occurs
    /// - Disk full
    /// - Data directory removed or made read-only while running
    #[error("Failed to write '{key}' to {path}: {source}")]
    WriteFailed {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data directory could not be created or located.
    #[error("Storage directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// A thread panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
