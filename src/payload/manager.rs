//! Payload Manager
//!
//! Routes reads and writes to the payload file of a (version, partition)
//! pair, opening each file on first use.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::config::PayloadSyncStrategy;
use crate::error::{Result, StoreError};
use crate::layout::StoreLayout;
use crate::tig::MultiAlign;

use super::PayloadFile;

/// Manages every payload file of a store
///
/// Files are keyed by `(version, partition)`; sparse ids cost nothing.
pub struct PayloadManager {
    layout: StoreLayout,
    writable: bool,
    sync_strategy: PayloadSyncStrategy,
    files: HashMap<(u32, u32), PayloadFile>,
}

impl PayloadManager {
    pub fn new(layout: StoreLayout, writable: bool, sync_strategy: PayloadSyncStrategy) -> Self {
        Self {
            layout,
            writable,
            sync_strategy,
            files: HashMap::new(),
        }
    }

    /// Serialize `tig` into (version, partition), returning its offset
    pub fn append(&mut self, version: u32, partition: u32, tig: &MultiAlign) -> Result<u64> {
        if !self.writable {
            return Err(StoreError::ReadOnly);
        }

        let data =
            bincode::serialize(tig).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let sync_every_write = self.sync_strategy == PayloadSyncStrategy::EveryWrite;
        let file = self.file(version, partition, true)?;
        let offset = file.append(&data)?;
        if sync_every_write {
            file.sync()?;
        }

        tracing::trace!(
            "Appended tig {} to v{:03}.p{:03} at offset {}",
            tig.id,
            version,
            partition,
            offset
        );

        Ok(offset)
    }

    /// Deserialize the tig stored at `offset` of (version, partition)
    pub fn read(&mut self, version: u32, partition: u32, offset: u64) -> Result<MultiAlign> {
        let data = self.file(version, partition, false)?.read_at(offset)?;

        bincode::deserialize(&data).map_err(|e| StoreError::CorruptPayload {
            version,
            partition,
            offset,
            reason: e.to_string(),
        })
    }

    /// fsync every open file
    pub fn sync_all(&mut self) -> Result<()> {
        if !self.writable {
            return Ok(());
        }
        for file in self.files.values_mut() {
            file.sync()?;
        }
        Ok(())
    }

    /// Number of payload files currently open
    pub fn open_file_count(&self) -> usize {
        self.files.len()
    }

    /// Current length of the payload file of (version, partition), if open
    pub fn file_len(&self, version: u32, partition: u32) -> Option<u64> {
        self.files.get(&(version, partition)).map(|f| f.len())
    }

    fn file(&mut self, version: u32, partition: u32, create: bool) -> Result<&mut PayloadFile> {
        match self.files.entry((version, partition)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.layout.payload_path(version, partition);
                let file = PayloadFile::open(&path, version, partition, self.writable, create)?;
                Ok(entry.insert(file))
            }
        }
    }
}
