//! Item log record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Item ID          | (length-prefixed string)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Item Document    | (length-prefixed JSON bytes, empty for tombstones)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Cursor, Read};

use super::checksum::compute_checksum;
use super::errors::{StorageError, StorageResult};
use crate::model::{Item, ItemId};

/// len + id len + tombstone + body len + checksum
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 4 + 1 + 4 + 4;

/// One entry of the item log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// Item identifier in string form
    pub item_id: String,
    /// Whether this record deletes the item
    pub is_tombstone: bool,
    /// Full item document as JSON (empty for tombstones)
    pub body: Vec<u8>,
}

impl ItemRecord {
    /// Record holding the full current state of an item
    pub fn live(item: &Item) -> StorageResult<Self> {
        let body = serde_json::to_vec(item).map_err(|source| StorageError::InvalidDocument {
            item_id: item.id.to_string(),
            source,
        })?;

        Ok(Self {
            item_id: item.id.to_string(),
            is_tombstone: false,
            body,
        })
    }

    /// Record deleting an item
    pub fn tombstone(id: &ItemId) -> Self {
        Self {
            item_id: id.to_string(),
            is_tombstone: true,
            body: Vec::new(),
        }
    }

    /// Decode the item document carried by a live record.
    pub fn decode_item(&self) -> StorageResult<Item> {
        serde_json::from_slice(&self.body).map_err(|source| StorageError::InvalidDocument {
            item_id: self.item_id.clone(),
            source,
        })
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.item_id.len() + 1 + 4 + self.body.len());

        buf.extend_from_slice(&(self.item_id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.item_id.as_bytes());

        buf.push(if self.is_tombstone { 1 } else { 0 });

        buf.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[4..checksum_offset]);

        let item_id = String::from_utf8(read_bytes(&mut cursor)?).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
        })?;

        let mut tombstone_buf = [0u8; 1];
        cursor.read_exact(&mut tombstone_buf)?;
        let is_tombstone = tombstone_buf[0] != 0;

        let body = read_bytes(&mut cursor)?;

        Ok((
            Self {
                item_id,
                is_tombstone,
                body,
            },
            record_length,
        ))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
