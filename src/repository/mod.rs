//! # Item Repository
//!
//! Persistence-facing abstraction over the item collection. The HTTP layer
//! only sees [`ItemRepository`]; the concrete backend is picked at startup
//! from the connection string (see [`ItemStore::connect`]).
//!
//! Every lookup by id reports one of three outcomes:
//! - `Ok(Lookup::Found(_))`
//! - `Ok(Lookup::NotFound)`, also returned for a malformed id
//! - `Err(RepoError)` for any store fault

use std::future::Future;

mod detached;
mod document;
mod errors;
mod memory;
mod store;
mod table;

pub use detached::DetachedItemRepository;
pub use document::DocumentItemRepository;
pub use errors::{RepoError, RepoResult};
pub use memory::MemoryItemRepository;
pub use store::ItemStore;
pub use table::ItemTable;

use crate::model::{Item, ItemFields, ItemPatch};

/// Outcome of an operation that targets a single item by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }
}

/// CRUD over the item collection.
///
/// Each call is one round trip to the store. Ids are passed in their raw
/// string form; a string that is not a valid id resolves to
/// [`Lookup::NotFound`].
pub trait ItemRepository: Send + Sync + 'static {
    /// Store a new item under a fresh id and return it.
    fn insert(&self, fields: ItemFields) -> impl Future<Output = RepoResult<Item>> + Send;

    /// All items, in insertion order.
    fn list_all(&self) -> impl Future<Output = RepoResult<Vec<Item>>> + Send;

    fn get_by_id(&self, id: &str) -> impl Future<Output = RepoResult<Lookup<Item>>> + Send;

    /// Apply the fields present in `patch` and return the updated item.
    fn update_by_id(
        &self,
        id: &str,
        patch: ItemPatch,
    ) -> impl Future<Output = RepoResult<Lookup<Item>>> + Send;

    fn delete_by_id(&self, id: &str) -> impl Future<Output = RepoResult<Lookup<()>>> + Send;
}
