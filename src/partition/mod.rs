//! Partition Module
//!
//! Governs which (version, partition) pairs a session reads and writes.
//!
//! ## State Machine
//! ```text
//!   create ──────────────► Unpartitioned-Writable ──next_version──┐
//!                               │      ▲                          │
//!                               │      └──────────────────────────┘
//!                               │ write_to_partitioned
//!                               ▼
//!   create_partitioned ──► Partitioned-Writable (routed by map, version locked)
//!
//!   open(p = 0)   ──► Unpartitioned-Writable | Merged-ReadOnly
//!   open(p != 0)  ──► Partitioned-Writable(p) | Partitioned-ReadOnly(p)
//! ```
//!
//! Partition 0 is the unpartitioned store.

mod controller;
mod merge;

pub use controller::{PartitionController, StoreMode};
pub use merge::{load_merged, merge_partitions, MergeReport};

use std::collections::BTreeSet;

use crate::error::{Result, StoreError};
use crate::layout::check_partition;
use crate::tig::TigClass;

/// Assignment of tig ids to partitions
///
/// Ids mapped to 0, or beyond the end of the map, stay unpartitioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionMap {
    parts: Vec<u16>,
}

impl PartitionMap {
    /// Build a map from one partition id per tig id
    pub fn new(parts: Vec<u32>) -> Result<Self> {
        let parts = parts
            .into_iter()
            .map(|p| check_partition(p).map(|p| p as u16))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { parts })
    }

    /// Partition assigned to `id`
    pub fn partition_of(&self, id: u32) -> u32 {
        self.parts
            .get(id as usize)
            .map(|&p| u32::from(p))
            .unwrap_or(0)
    }

    /// Distinct nonzero partitions, ascending
    pub fn partitions(&self) -> BTreeSet<u32> {
        self.parts
            .iter()
            .filter(|&&p| p != 0)
            .map(|&p| u32::from(p))
            .collect()
    }

    /// Number of ids covered by the map
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl TryFrom<Vec<u32>> for PartitionMap {
    type Error = StoreError;

    fn try_from(parts: Vec<u32>) -> Result<Self> {
        Self::new(parts)
    }
}

/// Partition a session is restricted to
///
/// A unitig restriction hides every contig and every unitig outside the
/// partition. A contig restriction hides contigs outside the partition but
/// leaves all unitigs readable. Either way, every write is stamped with
/// the restricted partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Restriction {
    #[default]
    None,
    Unitig(u32),
    Contig(u32),
}

impl Restriction {
    /// Build from the (unitig, contig) partition arguments of `open`; at
    /// most one may be nonzero.
    pub fn from_args(unitig_partition: u32, contig_partition: u32) -> Result<Self> {
        check_partition(unitig_partition)?;
        check_partition(contig_partition)?;

        match (unitig_partition, contig_partition) {
            (0, 0) => Ok(Restriction::None),
            (p, 0) => Ok(Restriction::Unitig(p)),
            (0, p) => Ok(Restriction::Contig(p)),
            (unitig, contig) => Err(StoreError::ConflictingRestriction { unitig, contig }),
        }
    }

    /// The restricted partition, if any
    pub fn partition(self) -> Option<u32> {
        match self {
            Restriction::None => None,
            Restriction::Unitig(p) | Restriction::Contig(p) => Some(p),
        }
    }

    pub fn is_restricted(self) -> bool {
        self != Restriction::None
    }

    /// Whether a tig of `class` owned by `partition` may be read
    pub fn allows(self, class: TigClass, partition: u32) -> bool {
        match self {
            Restriction::None => true,
            Restriction::Unitig(p) => class == TigClass::Unitig && partition == p,
            Restriction::Contig(p) => class == TigClass::Unitig || partition == p,
        }
    }
}
