//! Process-local item repository.
//!
//! Backs the `memory://` connection string and the HTTP tests. Contents are
//! lost when the process exits.

use std::sync::RwLock;

use super::errors::{RepoError, RepoResult};
use super::table::ItemTable;
use super::{ItemRepository, Lookup};
use crate::model::{Item, ItemFields, ItemId, ItemPatch};

#[derive(Debug, Default)]
pub struct MemoryItemRepository {
    table: RwLock<ItemTable>,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemRepository for MemoryItemRepository {
    async fn insert(&self, fields: ItemFields) -> RepoResult<Item> {
        let item = Item::new(ItemId::generate(), fields);
        let mut table = self.table.write().map_err(|_| RepoError::LockPoisoned)?;
        table.upsert(item.clone());
        Ok(item)
    }

    async fn list_all(&self) -> RepoResult<Vec<Item>> {
        let table = self.table.read().map_err(|_| RepoError::LockPoisoned)?;
        Ok(table.list())
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<Lookup<Item>> {
        let Some(id) = ItemId::parse(id) else {
            return Ok(Lookup::NotFound);
        };

        let table = self.table.read().map_err(|_| RepoError::LockPoisoned)?;
        Ok(table.get(&id).cloned().into())
    }

    async fn update_by_id(&self, id: &str, patch: ItemPatch) -> RepoResult<Lookup<Item>> {
        let Some(id) = ItemId::parse(id) else {
            return Ok(Lookup::NotFound);
        };

        let mut table = self.table.write().map_err(|_| RepoError::LockPoisoned)?;
        let Some(existing) = table.get(&id) else {
            return Ok(Lookup::NotFound);
        };

        let mut updated = existing.clone();
        patch.apply(&mut updated.fields);
        table.upsert(updated.clone());

        Ok(Lookup::Found(updated))
    }

    async fn delete_by_id(&self, id: &str) -> RepoResult<Lookup<()>> {
        let Some(id) = ItemId::parse(id) else {
            return Ok(Lookup::NotFound);
        };

        let mut table = self.table.write().map_err(|_| RepoError::LockPoisoned)?;
        Ok(table.remove(&id).map(|_| ()).into())
    }
}
