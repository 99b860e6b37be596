//! Item data model

mod item;

pub use item::{Item, ItemFields, ItemId, ItemPatch};
