//! Append-only item log writer
//!
//! Every write is followed by fsync. An operation is not acknowledged until
//! its record is durable. Records are never rewritten in place.
//!
//! A failed append is cut back off the file so the log always ends on a
//! complete record.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::ItemRecord;
use crate::model::{Item, ItemId};

/// File name of the item collection inside the store directory
pub const ITEMS_FILE_NAME: &str = "items.dat";

/// Writer that appends records to `<dir>/items.dat`.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
    /// Set when a failed append could not be removed
    dirty_tail: bool,
}

impl StorageWriter {
    /// Opens or creates the log inside `store_dir`, creating the directory
    /// if needed.
    pub fn open(store_dir: &Path) -> StorageResult<Self> {
        if !store_dir.exists() {
            fs::create_dir_all(store_dir).map_err(|e| {
                StorageError::io_error(
                    format!("Failed to create store directory: {}", store_dir.display()),
                    e,
                )
            })?;
        }

        let storage_path = store_dir.join(ITEMS_FILE_NAME);

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::io_error(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path,
            file,
            current_offset,
            dirty_tail: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record and fsyncs. Returns the byte offset of the record.
    ///
    /// On failure the partial record is cut back off the log, or
    /// `RollbackFailed` is returned and the cut is retried on the next write.
    pub fn write(&mut self, record: &ItemRecord) -> StorageResult<u64> {
        let offset = self.current_offset;

        if self.dirty_tail {
            self.restore_tail(offset)
                .map_err(|e| StorageError::RollbackFailed {
                    offset,
                    failure: "an earlier failed write".to_string(),
                    source: e,
                })?;
            self.dirty_tail = false;
        }

        let serialized = record.serialize();

        if let Err(e) = self.file.write_all(&serialized) {
            let failure =
                StorageError::io_error(format!("Failed to write item: {}", record.item_id), e);
            return Err(self.roll_back(offset, failure));
        }

        if let Err(e) = self.file.sync_all() {
            let failure = StorageError::io_error(
                format!("fsync failed after writing item: {}", record.item_id),
                e,
            );
            return Err(self.roll_back(offset, failure));
        }

        self.current_offset += serialized.len() as u64;

        Ok(offset)
    }

    /// Drops everything after `offset` (a torn final record found on replay).
    pub fn truncate_to(&mut self, offset: u64) -> StorageResult<()> {
        self.restore_tail(offset).map_err(|e| {
            StorageError::io_error(format!("Failed to truncate log to byte offset {}", offset), e)
        })?;
        self.current_offset = offset;
        self.dirty_tail = false;
        Ok(())
    }

    fn roll_back(&mut self, offset: u64, failure: StorageError) -> StorageError {
        match self.restore_tail(offset) {
            Ok(()) => failure,
            Err(e) => {
                self.dirty_tail = true;
                StorageError::RollbackFailed {
                    offset,
                    failure: failure.to_string(),
                    source: e,
                }
            }
        }
    }

    fn restore_tail(&self, offset: u64) -> io::Result<()> {
        if self.file.metadata()?.len() == offset {
            return Ok(());
        }
        self.file.set_len(offset)?;
        self.file.sync_all()
    }

    /// Appends the full current state of an item.
    pub fn write_item(&mut self, item: &Item) -> StorageResult<u64> {
        let record = ItemRecord::live(item)?;
        self.write(&record)
    }

    /// Appends a tombstone for an item.
    pub fn write_tombstone(&mut self, id: &ItemId) -> StorageResult<u64> {
        self.write(&ItemRecord::tombstone(id))
    }
}
