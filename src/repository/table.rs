//! Insertion-ordered item table shared by the in-process backends.

use std::collections::HashMap;

use crate::model::{Item, ItemId};

/// Items keyed by id, listed in the order they were first inserted.
#[derive(Debug, Default)]
pub struct ItemTable {
    order: Vec<ItemId>,
    items: HashMap<ItemId, Item>,
}

impl ItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item. A replaced item keeps its position.
    pub fn upsert(&mut self, item: Item) {
        if self.items.insert(item.id, item.clone()).is_none() {
            self.order.push(item.id);
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let removed = self.items.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// All items in insertion order
    pub fn list(&self) -> Vec<Item> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
