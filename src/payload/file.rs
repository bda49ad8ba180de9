//! Payload File
//!
//! One append-only `v<NNN>[.p<PPP>].dat` file.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

use super::FRAME_HEADER_SIZE;

/// An open payload file
#[derive(Debug)]
pub struct PayloadFile {
    path: PathBuf,
    file: File,
    /// Current file length; the next frame starts here
    len: u64,
    version: u32,
    partition: u32,
}

impl PayloadFile {
    /// Open the payload file of (version, partition)
    ///
    /// With `create`, a missing file is created empty. Without it, a missing
    /// file is `StoreError::NotFound`. Files opened without `writable`
    /// reject appends.
    pub fn open(
        path: &Path,
        version: u32,
        partition: u32,
        writable: bool,
        create: bool,
    ) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .append(writable)
            .create(writable && create)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
                _ => StoreError::Io(e),
            })?;

        let len = file.metadata()?.len();

        tracing::debug!("Opened payload file {} ({} bytes)", path.display(), len);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            version,
            partition,
        })
    }

    /// Append one frame, returning the offset it starts at
    pub fn append(&mut self, data: &[u8]) -> Result<u64> {
        let data_len = u32::try_from(data.len()).map_err(|_| {
            StoreError::Serialization(format!("payload of {} bytes too large", data.len()))
        })?;

        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE as usize + data.len());
        frame.extend_from_slice(&data_len.to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
        frame.extend_from_slice(data);

        let offset = self.len;
        self.file.write_all(&frame)?;
        self.len += frame.len() as u64;

        Ok(offset)
    }

    /// Read the frame starting at `offset`
    pub fn read_at(&mut self, offset: u64) -> Result<Vec<u8>> {
        match offset.checked_add(FRAME_HEADER_SIZE) {
            Some(end) if end <= self.len => {}
            _ => return Err(self.corrupt(offset, "offset past end of file")),
        }

        self.file.seek(SeekFrom::Start(offset))?;

        let mut header = [0u8; FRAME_HEADER_SIZE as usize];
        self.file.read_exact(&mut header)?;

        let data_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let stored_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let frame_end = (offset + FRAME_HEADER_SIZE).checked_add(u64::from(data_len));
        match frame_end {
            Some(end) if end <= self.len => {}
            _ => return Err(self.corrupt(offset, "frame runs past end of file")),
        }

        let mut data = vec![0u8; data_len as usize];
        self.file.read_exact(&mut data)?;

        if crc32fast::hash(&data) != stored_crc {
            return Err(self.corrupt(offset, "checksum mismatch"));
        }

        Ok(data)
    }

    /// Force appended frames to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    /// Current file length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, offset: u64, reason: &str) -> StoreError {
        StoreError::CorruptPayload {
            version: self.version,
            partition: self.partition,
            offset,
            reason: reason.to_string(),
        }
    }
}
