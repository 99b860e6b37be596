//! Sequential item log reader
//!
//! Every record is checksum-verified as it is read. Any framing or checksum
//! failure is reported as corruption with the byte offset of the bad record.
//! A final record that runs past the end of the file is reported as a torn
//! tail instead.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{ItemRecord, MIN_RECORD_SIZE};

/// Reader for a full scan of the item log.
pub struct StorageReader {
    storage_path: PathBuf,
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl StorageReader {
    /// Opens the log file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::io_error(
                format!("Failed to open storage file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next record.
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(TornTail)` if the final record is incomplete
    /// - `Err(Corruption)` on framing or checksum failure
    pub fn read_next(&mut self) -> StorageResult<Option<ItemRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        let min_size = MIN_RECORD_SIZE as u64;

        if remaining < min_size {
            return Err(StorageError::torn_tail_at_offset(
                self.current_offset,
                format!(
                    "Truncated storage: {} bytes remaining, minimum record size is {}",
                    remaining, min_size
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < min_size {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::torn_tail_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);

        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, bytes_consumed) = ItemRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += bytes_consumed as u64;

        Ok(Some(record))
    }

    /// Reads all remaining records.
    pub fn read_all(&mut self) -> StorageResult<Vec<ItemRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::super::writer::StorageWriter;
    use super::*;
    use crate::model::{Item, ItemFields, ItemId};
    use std::fs;
    use tempfile::TempDir;

    fn sample_item(name: &str) -> Item {
        Item::new(ItemId::generate(), ItemFields::new(name, 1.0, true))
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = StorageWriter::open(temp_dir.path()).unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_read_multiple_records_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = StorageWriter::open(temp_dir.path()).unwrap();

        let first = sample_item("first");
        let second = sample_item("second");
        writer.write_item(&first).unwrap();
        writer.write_item(&second).unwrap();
        writer.write_tombstone(&first.id).unwrap();

        let mut reader = StorageReader::open(writer.path()).unwrap();
        let records = reader.read_all().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].item_id, first.id.to_string());
        assert_eq!(records[1].item_id, second.id.to_string());
        assert!(records[2].is_tombstone);
        assert_eq!(reader.current_offset(), writer.current_offset());
    }

    #[test]
    fn test_corruption_detected() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.write_item(&sample_item("doc")).unwrap();
            writer.path().to_path_buf()
        };

        let mut contents = fs::read(&path).unwrap();
        let mid = contents.len() / 2;
        contents[mid] ^= 0xFF;
        fs::write(&path, contents).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        let err = reader.read_next().unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_truncated_tail_detected() {
        let temp_dir = TempDir::new().unwrap();
        let path = {
            let mut writer = StorageWriter::open(temp_dir.path()).unwrap();
            writer.write_item(&sample_item("a")).unwrap();
            writer.write_item(&sample_item("b")).unwrap();
            writer.path().to_path_buf()
        };

        let contents = fs::read(&path).unwrap();
        fs::write(&path, &contents[..contents.len() - 5]).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());
        assert!(reader.read_next().unwrap_err().is_torn_tail());
    }
}
