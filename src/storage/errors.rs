//! Storage error types
//!
//! Two classes of failure exist:
//! - I/O failures (disk, permissions): the operation fails, the store stays usable
//! - Corruption (checksum or framing failure): the log cannot be trusted and
//!   opening the store is refused
//!
//! A record cut short at the very end of the log is a torn append, reported
//! separately so the store can drop it and keep everything before it.

use std::io;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Disk I/O failure
    #[error("Storage I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Record checksum or framing failure
    #[error("Data corruption at byte offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// Final record is incomplete (append interrupted by a crash)
    #[error("Torn record at byte offset {offset}: {reason}")]
    TornTail { offset: u64, reason: String },

    /// A failed append could not be removed from the log
    #[error("Failed to roll back log to byte offset {offset} after {failure}: {source}")]
    RollbackFailed {
        offset: u64,
        failure: String,
        #[source]
        source: io::Error,
    },

    /// Record body is not a valid item document
    #[error("Invalid item document {item_id}: {source}")]
    InvalidDocument {
        item_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Create a new storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a corruption error with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Create a torn-tail error for an incomplete final record
    pub fn torn_tail_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::TornTail {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns whether the log can no longer be trusted as read
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StorageError::Corruption { .. }
                | StorageError::TornTail { .. }
                | StorageError::InvalidDocument { .. }
        )
    }

    /// Returns whether only the final record is incomplete
    pub fn is_torn_tail(&self) -> bool {
        matches!(self, StorageError::TornTail { .. })
    }
}
