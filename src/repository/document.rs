//! File-backed item repository.
//!
//! Backs `file://<dir>` connection strings. The item log under `<dir>` is
//! replayed into an in-memory table on open; every mutation is appended to
//! the log and fsynced before the table is updated and the call returns.
//! An incomplete final record (crash during an append) is logged and cut
//! off on open; corruption anywhere else refuses the open.
//! Blocking file I/O runs on the tokio blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::errors::{RepoError, RepoResult};
use super::table::ItemTable;
use super::{ItemRepository, Lookup};
use crate::model::{Item, ItemFields, ItemId, ItemPatch};
use crate::storage::{StorageError, StorageReader, StorageResult, StorageWriter};

struct DocumentStore {
    writer: StorageWriter,
    table: ItemTable,
}

impl DocumentStore {
    fn open(store_dir: &Path) -> StorageResult<Self> {
        let mut writer = StorageWriter::open(store_dir)?;
        let (table, torn_at) = Self::replay(writer.path())?;

        if let Some(offset) = torn_at {
            writer.truncate_to(offset)?;
        }

        Ok(Self { writer, table })
    }

    /// Rebuild the table from the log. Latest record per id wins.
    ///
    /// Also returns the offset of a torn final record, if one was found.
    fn replay(storage_path: &Path) -> StorageResult<(ItemTable, Option<u64>)> {
        let mut table = ItemTable::new();
        let mut reader = StorageReader::open(storage_path)?;

        loop {
            let offset = reader.current_offset();
            let record = match reader.read_next() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) if e.is_torn_tail() => {
                    warn!(
                        path = %storage_path.display(),
                        offset,
                        error = %e,
                        "dropping incomplete final record"
                    );
                    return Ok((table, Some(offset)));
                }
                Err(e) => return Err(e),
            };

            let id = ItemId::parse(&record.item_id).ok_or_else(|| {
                StorageError::corruption_at_offset(
                    offset,
                    format!("Invalid item id: {}", record.item_id),
                )
            })?;

            if record.is_tombstone {
                table.remove(&id);
                continue;
            }

            let item = record.decode_item()?;
            if item.id != id {
                return Err(StorageError::corruption_at_offset(
                    offset,
                    format!("Record id {} does not match document id {}", id, item.id),
                ));
            }
            table.upsert(item);
        }

        Ok((table, None))
    }

    fn insert(&mut self, fields: ItemFields) -> RepoResult<Item> {
        let item = Item::new(ItemId::generate(), fields);
        self.writer.write_item(&item)?;
        self.table.upsert(item.clone());
        Ok(item)
    }

    fn update(&mut self, id: ItemId, patch: ItemPatch) -> RepoResult<Lookup<Item>> {
        let Some(existing) = self.table.get(&id) else {
            return Ok(Lookup::NotFound);
        };

        let mut updated = existing.clone();
        patch.apply(&mut updated.fields);

        self.writer.write_item(&updated)?;
        self.table.upsert(updated.clone());
        Ok(Lookup::Found(updated))
    }

    fn delete(&mut self, id: ItemId) -> RepoResult<Lookup<()>> {
        if self.table.get(&id).is_none() {
            return Ok(Lookup::NotFound);
        }

        self.writer.write_tombstone(&id)?;
        self.table.remove(&id);
        Ok(Lookup::Found(()))
    }
}

/// Item repository persisted to an append-only log file.
#[derive(Clone)]
pub struct DocumentItemRepository {
    inner: Arc<Mutex<DocumentStore>>,
}

impl DocumentItemRepository {
    /// Open (or create) the item collection under `store_dir`.
    ///
    /// Fails if the existing log is corrupted.
    pub fn open(store_dir: &Path) -> RepoResult<Self> {
        let store = DocumentStore::open(store_dir)?;
        debug!(
            path = %store.writer.path().display(),
            items = store.table.len(),
            "item log replayed"
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(store)),
        })
    }

    /// Run `op` against the locked store on the blocking pool.
    async fn run<T, F>(&self, op: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut DocumentStore) -> RepoResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut store = inner.lock().map_err(|_| RepoError::LockPoisoned)?;
            op(&mut *store)
        })
        .await
        .map_err(|e| RepoError::TaskFailed(e.to_string()))?
    }
}

impl ItemRepository for DocumentItemRepository {
    async fn insert(&self, fields: ItemFields) -> RepoResult<Item> {
        self.run(move |store| store.insert(fields)).await
    }

    async fn list_all(&self) -> RepoResult<Vec<Item>> {
        self.run(|store| Ok(store.table.list())).await
    }

    async fn get_by_id(&self, id: &str) -> RepoResult<Lookup<Item>> {
        let Some(id) = ItemId::parse(id) else {
            return Ok(Lookup::NotFound);
        };
        self.run(move |store| Ok(Lookup::from(store.table.get(&id).cloned())))
            .await
    }

    async fn update_by_id(&self, id: &str, patch: ItemPatch) -> RepoResult<Lookup<Item>> {
        let Some(id) = ItemId::parse(id) else {
            return Ok(Lookup::NotFound);
        };
        self.run(move |store| store.update(id, patch)).await
    }

    async fn delete_by_id(&self, id: &str) -> RepoResult<Lookup<()>> {
        let Some(id) = ItemId::parse(id) else {
            return Ok(Lookup::NotFound);
        };
        self.run(move |store| store.delete(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentItemRepository::open(temp_dir.path()).unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crud_against_log() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentItemRepository::open(temp_dir.path()).unwrap();

        let item = repo.insert(ItemFields::new("Widget", 12.5, true)).await.unwrap();
        let id = item.id.to_string();

        assert_eq!(repo.get_by_id(&id).await.unwrap(), Lookup::Found(item.clone()));

        let patch = ItemPatch {
            in_stock: Some(Some(false)),
            ..ItemPatch::default()
        };
        let updated = repo.update_by_id(&id, patch).await.unwrap().found().unwrap();
        assert_eq!(updated.fields, ItemFields::new("Widget", 12.5, false));

        assert!(repo.delete_by_id(&id).await.unwrap().is_found());
        assert_eq!(repo.get_by_id(&id).await.unwrap(), Lookup::NotFound);
        assert_eq!(repo.delete_by_id(&id).await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentItemRepository::open(temp_dir.path()).unwrap();

        assert_eq!(repo.get_by_id("123").await.unwrap(), Lookup::NotFound);
        assert_eq!(
            repo.update_by_id("123", ItemPatch::default()).await.unwrap(),
            Lookup::NotFound
        );
        assert_eq!(repo.delete_by_id("123").await.unwrap(), Lookup::NotFound);
    }
}
