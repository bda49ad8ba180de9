//! # mastore
//!
//! A disk-resident store of multi-alignments (unitigs and contigs) with:
//! - Versions: successive generations of the whole store
//! - Partitions: disjoint id sets written independently, merged on open
//! - Metadata-only summary access without reading payloads
//! - An in-memory, store-owned cache of loaded tigs
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     MultiAlignStore                         │
//! │        (create / open / insert / load / next_version)       │
//! └──────┬──────────────────┬──────────────────┬────────────────┘
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//! ┌─────────────┐   ┌──────────────┐   ┌───────────────┐
//! │  Partition  │   │ RecordTable  │◄─►│   TigCache    │
//! │ Controller  │   │ (utg / ctg)  │   │ (owned tigs)  │
//! └─────────────┘   └──────┬───────┘   └───────────────┘
//!                          │ (version, partition, offset)
//!                          ▼
//!                  ┌───────────────┐
//!                  │PayloadManager │
//!                  │ (append-only) │
//!                  └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod tig;
pub mod layout;
pub mod record;
pub mod payload;
pub mod partition;
pub mod cache;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use cache::TigMut;
pub use config::{store_path, OverlapPolicy, PayloadSyncStrategy, StoreConfig};
pub use partition::{PartitionMap, Restriction, StoreMode};
pub use store::MultiAlignStore;
pub use tig::{ContigStatus, MultiAlign, Placement, TigClass, TigSummary, UnitigFur, UnitigStatus};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of mastore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
