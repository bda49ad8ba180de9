//! Payload Module
//!
//! Append-only files holding serialized `MultiAlign`s, one file per
//! (version, partition).
//!
//! ## Responsibilities
//! - Append a serialized tig and return the offset it starts at
//! - Read a tig back from an explicit offset (never by scanning)
//! - Open files lazily and keep them open for the life of the store
//!
//! Old copies of a tig stay in their files; only the offset in the record
//! table is authoritative. Space is never reclaimed.
//!
//! ## Frame Format
//! ```text
//! ┌─────────┬─────────┬──────────────────────────┐
//! │ Len (4) │ CRC (4) │ bincode(MultiAlign)      │
//! └─────────┴─────────┴──────────────────────────┘
//! ```

mod file;
mod manager;

pub use file::PayloadFile;
pub use manager::PayloadManager;

/// Frame header size: Len (4) + CRC (4)
pub const FRAME_HEADER_SIZE: u64 = 8;
