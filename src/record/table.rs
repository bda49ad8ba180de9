//! Record Table
//!
//! Dense array of `TigRecord`s for one class, with flat-file persistence.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::layout::{check_partition, check_version};
use crate::tig::{TigClass, TigSummary};

use super::{
    TigRecord, FOOTER_SIZE, FORMAT, HEADER_SIZE, MAGIC, RECORD_SIZE, TABLE_FLAG_FIXED_MAP,
};

/// Smallest capacity allocated by `grow`
const MIN_CAPACITY: u32 = 1024;

/// Records for every id of one class
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    class: TigClass,
    records: Vec<TigRecord>,
    /// Allocated slots; always `>= records.len()`
    capacity: u32,
    /// Written by a store created with a fixed partition map
    fixed_map: bool,
}

impl RecordTable {
    /// Create an empty table
    pub fn new(class: TigClass) -> Self {
        Self {
            class,
            records: Vec::new(),
            capacity: 0,
            fixed_map: false,
        }
    }

    pub fn class(&self) -> TigClass {
        self.class
    }

    /// Number of ids, valid or not
    pub fn len(&self) -> u32 {
        self.records.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// True when the store was created with a fixed partition map
    pub fn is_fixed_map(&self) -> bool {
        self.fixed_map
    }

    pub(crate) fn set_fixed_map(&mut self, fixed_map: bool) {
        self.fixed_map = fixed_map;
    }

    /// Extend to `to_len` ids; new slots are not valid. Never shrinks.
    pub fn grow(&mut self, to_len: u32) {
        if to_len <= self.len() {
            return;
        }

        if to_len > self.capacity {
            self.capacity = to_len
                .max(self.capacity.saturating_mul(2))
                .max(MIN_CAPACITY);
            self.records
                .reserve(self.capacity as usize - self.records.len());
        }

        self.records.resize(to_len as usize, TigRecord::default());
    }

    /// Get the record for `id`
    pub fn get(&self, id: u32) -> Result<&TigRecord> {
        self.records.get(id as usize).ok_or(StoreError::OutOfRange {
            id,
            len: self.len(),
        })
    }

    /// Record a write of `id`, growing the table if needed
    ///
    /// The only way a record becomes valid.
    pub fn set_entry(
        &mut self,
        id: u32,
        partition: u32,
        version: u32,
        offset: u64,
        summary: TigSummary,
    ) -> Result<()> {
        let partition = check_partition(partition)? as u16;
        let version = check_version(version)? as u16;

        self.grow(id.saturating_add(1));
        let record = &mut self.records[id as usize];

        record.valid = true;
        record.deleted = false;
        record.partition = partition;
        record.version = version;
        record.offset = offset;
        record.summary = summary;

        Ok(())
    }

    /// Mark `id` deleted, stamping the (version, partition) that deleted it.
    /// The slot is kept; ids are never reused.
    pub fn mark_deleted(&mut self, id: u32, partition: u32, version: u32) -> Result<()> {
        let partition = check_partition(partition)? as u16;
        let version = check_version(version)? as u16;
        let len = self.len();

        let record = self
            .records
            .get_mut(id as usize)
            .ok_or(StoreError::OutOfRange { id, len })?;

        record.deleted = true;
        record.partition = partition;
        record.version = version;

        Ok(())
    }

    /// Mutable access to the embedded summary of `id`
    pub fn summary_mut(&mut self, id: u32) -> Result<&mut TigSummary> {
        let len = self.len();
        self.records
            .get_mut(id as usize)
            .map(|r| &mut r.summary)
            .ok_or(StoreError::OutOfRange { id, len })
    }

    /// Overwrite `id` with a record taken from another table (merging)
    pub(crate) fn adopt(&mut self, id: u32, record: TigRecord) {
        self.grow(id.saturating_add(1));
        self.records[id as usize] = record;
    }

    /// Iterate over (id, record)
    pub fn iter(&self) -> impl Iterator<Item = (u32, &TigRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(id, record)| (id as u32, record))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Encode the whole table
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            HEADER_SIZE + self.records.len() * RECORD_SIZE + FOOTER_SIZE,
        );

        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&FORMAT.to_le_bytes());
        buf.push(self.class.code());
        buf.push(if self.fixed_map { TABLE_FLAG_FIXED_MAP } else { 0 });
        buf.extend_from_slice(&self.len().to_le_bytes());
        buf.extend_from_slice(&self.capacity.max(self.len()).to_le_bytes());

        for record in &self.records {
            record.encode(&mut buf);
        }

        let crc = crc32fast::hash(&buf[HEADER_SIZE..]);
        buf.extend_from_slice(&crc.to_le_bytes());

        buf
    }

    /// Decode a table written by `to_bytes`
    pub fn from_bytes(class: TigClass, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(StoreError::CorruptMetadata(format!(
                "{} table truncated: {} bytes",
                class,
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(StoreError::CorruptMetadata(format!(
                "invalid table magic: expected MATB, got {:?}",
                &bytes[0..4]
            )));
        }

        let format = u16::from_le_bytes([bytes[4], bytes[5]]);
        if format != FORMAT {
            return Err(StoreError::CorruptMetadata(format!(
                "unsupported table format: {}",
                format
            )));
        }

        if bytes[6] != class.code() {
            return Err(StoreError::CorruptMetadata(format!(
                "expected a {} table, found class tag {:#04x}",
                class, bytes[6]
            )));
        }

        let flags = bytes[7];
        if flags & !TABLE_FLAG_FIXED_MAP != 0 {
            return Err(StoreError::CorruptMetadata(format!(
                "{} table has unknown flags {:#04x}",
                class, flags
            )));
        }

        let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let capacity = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

        if len > capacity {
            return Err(StoreError::CorruptMetadata(format!(
                "{} table length {} exceeds capacity {}",
                class, len, capacity
            )));
        }

        let expected = HEADER_SIZE as u64 + u64::from(len) * RECORD_SIZE as u64 + FOOTER_SIZE as u64;
        if bytes.len() as u64 != expected {
            return Err(StoreError::CorruptMetadata(format!(
                "{} table of {} records should be {} bytes, found {}",
                class,
                len,
                expected,
                bytes.len()
            )));
        }

        let body_end = bytes.len() - FOOTER_SIZE;
        let body = &bytes[HEADER_SIZE..body_end];
        let stored_crc = u32::from_le_bytes([
            bytes[body_end],
            bytes[body_end + 1],
            bytes[body_end + 2],
            bytes[body_end + 3],
        ]);
        if crc32fast::hash(body) != stored_crc {
            return Err(StoreError::CorruptMetadata(format!(
                "{} table checksum mismatch",
                class
            )));
        }

        let records = body
            .chunks_exact(RECORD_SIZE)
            .enumerate()
            .map(|(id, chunk)| TigRecord::decode(id as u32, chunk))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            class,
            records,
            capacity,
            fixed_map: flags & TABLE_FLAG_FIXED_MAP != 0,
        })
    }

    /// Write the table to `path`, replacing any previous file atomically
    pub fn serialize(&self, path: &Path) -> Result<()> {
        let tmp = tmp_path(path);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(&self.to_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;

        tracing::debug!(
            "Wrote {} table {} ({} records)",
            self.class,
            path.display(),
            self.len()
        );

        Ok(())
    }

    /// Read a table from `path`
    pub fn deserialize(class: TigClass, path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let table = Self::from_bytes(class, &bytes)?;

        tracing::debug!(
            "Loaded {} table {} ({} records)",
            class,
            path.display(),
            table.len()
        );

        Ok(table)
    }

    /// Read a table if the file exists
    pub fn deserialize_if_exists(class: TigClass, path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::deserialize(class, path).map(Some)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

