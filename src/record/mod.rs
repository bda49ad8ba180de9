//! Record Module
//!
//! Fixed-size metadata records, one per tig id and class, locating the
//! latest payload of each tig and carrying a copy of its summary.
//!
//! ## Responsibilities
//! - Track presence, deletion, owning partition and version, payload offset
//! - Grow densely: ids are `[0, len)` and `len` never shrinks
//! - Persist whole tables as flat files
//!
//! ## Table File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Header (16 bytes)                                            │
//! │   Magic "MATB" (4) | Format u16 (2) | Class u8 | Flags u8    │
//! │   Len u32 (4) | Capacity u32 (4)                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Records (Len x 40 bytes)                                     │
//! │   CovStat f64 | MicroHet f64 | UtgStatus u8 | FUR u8         │
//! │   CtgStatus u8 | Flags u8 | NumFrags u32 | NumUnitigs u32    │
//! │   Partition u16 | Version u16 | Offset u64                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                             │
//! │   RecordCRC u32                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//! Record flags: bit 0 = valid, bit 1 = deleted.
//! Table flags: bit 0 = store created with a fixed partition map.

mod entry;
mod table;

pub use entry::TigRecord;
pub use table::RecordTable;

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying a record table
pub(crate) const MAGIC: &[u8; 4] = b"MATB";

/// Current table format version
pub(crate) const FORMAT: u16 = 1;

/// Header size: Magic (4) + Format (2) + Class (1) + Flags (1) + Len (4) + Capacity (4)
pub(crate) const HEADER_SIZE: usize = 16;

/// Encoded size of one record
pub const RECORD_SIZE: usize = 40;

/// Footer size: RecordCRC (4)
pub(crate) const FOOTER_SIZE: usize = 4;

pub(crate) const FLAG_VALID: u8 = 0b01;
pub(crate) const FLAG_DELETED: u8 = 0b10;

/// Table flag: the store was created partitioned and can never advance
pub(crate) const TABLE_FLAG_FIXED_MAP: u8 = 0b01;
