//! Tig Record
//!
//! One fixed-width metadata record.

use crate::error::{Result, StoreError};
use crate::layout::{MAX_PARTITION, MAX_VERSION};
use crate::tig::{ContigStatus, TigSummary, UnitigFur, UnitigStatus};

use super::{FLAG_DELETED, FLAG_VALID, RECORD_SIZE};

/// Metadata for one tig
///
/// When `valid && !deleted`, `(version, partition, offset)` locates the
/// current payload bytes of the tig.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TigRecord {
    pub(super) summary: TigSummary,
    pub(super) valid: bool,
    pub(super) deleted: bool,
    pub(super) partition: u16,
    pub(super) version: u16,
    pub(super) offset: u64,
}

impl TigRecord {
    /// True once the id has ever been written
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Valid and not deleted
    pub fn is_live(&self) -> bool {
        self.valid && !self.deleted
    }

    /// Partition that owns the latest write
    pub fn partition(&self) -> u32 {
        u32::from(self.partition)
    }

    /// Version that owns the latest write
    pub fn version(&self) -> u32 {
        u32::from(self.version)
    }

    /// Byte offset of the latest payload in its (version, partition) file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn summary(&self) -> &TigSummary {
        &self.summary
    }

    /// Append the fixed-width encoding to `buf`
    pub(super) fn encode(&self, buf: &mut Vec<u8>) {
        let s = &self.summary;

        let mut flags = 0u8;
        if self.valid {
            flags |= FLAG_VALID;
        }
        if self.deleted {
            flags |= FLAG_DELETED;
        }

        buf.extend_from_slice(&s.coverage_stat.to_le_bytes());
        buf.extend_from_slice(&s.microhet_prob.to_le_bytes());
        buf.push(s.unitig_status.to_byte());
        buf.push(s.unique_rept.to_byte());
        buf.push(s.contig_status.to_byte());
        buf.push(flags);
        buf.extend_from_slice(&s.num_frags.to_le_bytes());
        buf.extend_from_slice(&s.num_unitigs.to_le_bytes());
        buf.extend_from_slice(&self.partition.to_le_bytes());
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.offset.to_le_bytes());
    }

    /// Decode one record; `id` is only used for error messages
    pub(super) fn decode(id: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECORD_SIZE {
            return Err(corrupt(id, "short record"));
        }

        let unitig_status =
            UnitigStatus::from_byte(bytes[16]).ok_or_else(|| corrupt(id, "unitig status"))?;
        let unique_rept =
            UnitigFur::from_byte(bytes[17]).ok_or_else(|| corrupt(id, "unitig FUR"))?;
        let contig_status =
            ContigStatus::from_byte(bytes[18]).ok_or_else(|| corrupt(id, "contig status"))?;

        let flags = bytes[19];
        if flags & !(FLAG_VALID | FLAG_DELETED) != 0 {
            return Err(corrupt(id, "unknown flag bits"));
        }

        let partition = u16::from_le_bytes([bytes[28], bytes[29]]);
        let version = u16::from_le_bytes([bytes[30], bytes[31]]);
        if u32::from(partition) > MAX_PARTITION {
            return Err(corrupt(id, "partition out of range"));
        }
        if u32::from(version) > MAX_VERSION {
            return Err(corrupt(id, "version out of range"));
        }

        Ok(Self {
            summary: TigSummary {
                coverage_stat: f64::from_le_bytes(array(&bytes[0..8])),
                microhet_prob: f64::from_le_bytes(array(&bytes[8..16])),
                unitig_status,
                unique_rept,
                contig_status,
                num_frags: u32::from_le_bytes(array(&bytes[20..24])),
                num_unitigs: u32::from_le_bytes(array(&bytes[24..28])),
            },
            valid: flags & FLAG_VALID != 0,
            deleted: flags & FLAG_DELETED != 0,
            partition,
            version,
            offset: u64::from_le_bytes(array(&bytes[32..40])),
        })
    }
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn corrupt(id: u32, what: &str) -> StoreError {
    StoreError::CorruptMetadata(format!("record {}: {}", id, what))
}
