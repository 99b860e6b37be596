//! Repository used when no persistence connection exists.
//!
//! Every operation fails, so item routes answer 500 while the diagnostic
//! routes keep working.

use super::errors::{RepoError, RepoResult};
use super::{ItemRepository, Lookup};
use crate::model::{Item, ItemFields, ItemPatch};

#[derive(Debug, Clone)]
pub struct DetachedItemRepository {
    reason: String,
}

impl DetachedItemRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn fault(&self) -> RepoError {
        RepoError::Detached(self.reason.clone())
    }
}

impl ItemRepository for DetachedItemRepository {
    async fn insert(&self, _fields: ItemFields) -> RepoResult<Item> {
        Err(self.fault())
    }

    async fn list_all(&self) -> RepoResult<Vec<Item>> {
        Err(self.fault())
    }

    async fn get_by_id(&self, _id: &str) -> RepoResult<Lookup<Item>> {
        Err(self.fault())
    }

    async fn update_by_id(&self, _id: &str, _patch: ItemPatch) -> RepoResult<Lookup<Item>> {
        Err(self.fault())
    }

    async fn delete_by_id(&self, _id: &str) -> RepoResult<Lookup<()>> {
        Err(self.fault())
    }
}
