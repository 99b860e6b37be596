//! Embedded item document storage
//!
//! The item collection is an append-only record file with no in-place
//! updates.
//!
//! # Design Principles
//!
//! - Append-only, fsync on every write
//! - Checksum-verified on every read
//! - Latest record wins for the same item id
//! - A tombstone record deletes the item

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{StorageError, StorageResult};
pub use reader::StorageReader;
pub use record::ItemRecord;
pub use writer::{StorageWriter, ITEMS_FILE_NAME};
