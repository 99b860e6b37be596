//! Runtime-selected repository backend.

use std::path::Path;

use super::detached::DetachedItemRepository;
use super::document::DocumentItemRepository;
use super::errors::{RepoError, RepoResult};
use super::memory::MemoryItemRepository;
use super::{ItemRepository, Lookup};
use crate::model::{Item, ItemFields, ItemPatch};

/// The backend behind a connection string.
///
/// Supported connection strings:
/// - `memory://` (process-local, not persisted)
/// - `file://<dir>` or `file:<dir>` (append-only log under `<dir>`)
pub enum ItemStore {
    Memory(MemoryItemRepository),
    Document(DocumentItemRepository),
    Detached(DetachedItemRepository),
}

impl ItemStore {
    /// Connect to the store named by `connection_string`.
    ///
    /// Errors never echo the full connection string, only its scheme.
    pub fn connect(connection_string: &str) -> RepoResult<Self> {
        let trimmed = connection_string.trim();

        if trimmed == "memory://" || trimmed == "memory:" {
            return Ok(ItemStore::Memory(MemoryItemRepository::new()));
        }

        if let Some(dir) = trimmed
            .strip_prefix("file://")
            .or_else(|| trimmed.strip_prefix("file:"))
        {
            if dir.is_empty() {
                return Err(RepoError::UnsupportedConnection(
                    "file (missing directory)".to_string(),
                ));
            }
            let repo = DocumentItemRepository::open(Path::new(dir))?;
            return Ok(ItemStore::Document(repo));
        }

        let scheme = trimmed.split(':').next().unwrap_or_default();
        Err(RepoError::UnsupportedConnection(scheme.to_string()))
    }

    /// Store with no persistence connection
    pub fn detached(reason: impl Into<String>) -> Self {
        ItemStore::Detached(DetachedItemRepository::new(reason))
    }

    /// Backend name, for logs
    pub fn backend(&self) -> &'static str {
        match self {
            ItemStore::Memory(_) => "memory",
            ItemStore::Document(_) => "file",
            ItemStore::Detached(_) => "detached",
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, ItemStore::Detached(_))
    }

    /// Why the store is detached, if it is
    pub fn detached_reason(&self) -> Option<&str> {
        match self {
            ItemStore::Detached(repo) => Some(repo.reason()),
            _ => None,
        }
    }
}

impl ItemRepository for ItemStore {
    async fn insert(&self, fields: ItemFields) -> RepoResult<Item> {
        match self {
            ItemStore::Memory(repo) => repo.insert(fields).await,
            ItemStore::Document(repo) => repo.insert(fields).await,
            ItemStore::Detached(repo) => repo.insert(fields).await,
        }
    }

    async fn list_all(&self) -> RepoResult<Vec<Item>> {
        match self {
            ItemStore::Memory(repo) => repo.list_all().await,
            ItemStore::Document(repo) => repo.list_all().await,
            ItemStore::Detached(repo) => repo.list_all().await,
        }
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<Lookup<Item>> {
        match self {
            ItemStore::Memory(repo) => repo.get_by_id(id).await,
            ItemStore::Document(repo) => repo.get_by_id(id).await,
            ItemStore::Detached(repo) => repo.get_by_id(id).await,
        }
    }

    async fn update_by_id(&self, id: &str, patch: ItemPatch) -> RepoResult<Lookup<Item>> {
        match self {
            ItemStore::Memory(repo) => repo.update_by_id(id, patch).await,
            ItemStore::Document(repo) => repo.update_by_id(id, patch).await,
            ItemStore::Detached(repo) => repo.update_by_id(id, patch).await,
        }
    }

    async fn delete_by_id(&self, id: &str) -> RepoResult<Lookup<()>> {
        match self {
            ItemStore::Memory(repo) => repo.delete_by_id(id).await,
            ItemStore::Document(repo) => repo.delete_by_id(id).await,
            ItemStore::Detached(repo) => repo.delete_by_id(id).await,
        }
    }
}
