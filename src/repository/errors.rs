//! # Repository Errors

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Faults raised by an item repository.
///
/// "Not found" is not an error: lookups report it through
/// [`Lookup::NotFound`](super::Lookup::NotFound).
#[derive(Debug, Error)]
pub enum RepoError {
    /// The underlying document store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No persistence connection is available
    #[error("Persistence unavailable: {0}")]
    Detached(String),

    /// A previous operation panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// The blocking store task did not complete
    #[error("Store task failed: {0}")]
    TaskFailed(String),

    /// The connection string names a backend this service cannot reach
    #[error("Unsupported connection string scheme: {0}")]
    UnsupportedConnection(String),
}
