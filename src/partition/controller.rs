//! Partition/Version Controller
//!
//! Decides where writes go and which tigs reads may see.

use crate::error::{Result, StoreError};
use crate::layout::check_version;
use crate::tig::TigClass;

use super::{PartitionMap, Restriction};

/// Observable state of a store session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    UnpartitionedWritable,
    UnpartitionedReadOnly,
    /// Writes are routed by partition maps (`Restriction::None`) or forced
    /// into the restricted partition
    PartitionedWritable(Restriction),
    PartitionedReadOnly(Restriction),
    /// Read-only view consolidated from partition tables
    MergedReadOnly,
}

/// Version and partition state of one store session
#[derive(Debug, Clone)]
pub struct PartitionController {
    /// Version writes go to
    current_version: u32,
    writable: bool,
    restriction: Restriction,
    unitig_map: Option<PartitionMap>,
    contig_map: Option<PartitionMap>,
    /// Tables were consolidated from partition files at open
    merged: bool,
    /// Store was created with a fixed partition map; versions never advance
    fixed_map: bool,
}

impl PartitionController {
    /// Unrestricted session without partition maps
    pub fn unpartitioned(current_version: u32, writable: bool, merged: bool) -> Self {
        Self {
            current_version,
            writable,
            restriction: Restriction::None,
            unitig_map: None,
            contig_map: None,
            merged,
            fixed_map: false,
        }
    }

    /// Writable session routing writes through partition maps
    pub fn mapped(
        current_version: u32,
        unitig_map: Option<PartitionMap>,
        contig_map: Option<PartitionMap>,
    ) -> Self {
        Self {
            current_version,
            writable: true,
            restriction: Restriction::None,
            unitig_map,
            contig_map,
            merged: false,
            fixed_map: true,
        }
    }

    /// Session restricted to one partition
    pub fn restricted(current_version: u32, restriction: Restriction, writable: bool) -> Self {
        Self {
            current_version,
            writable,
            restriction,
            unitig_map: None,
            contig_map: None,
            merged: false,
            fixed_map: false,
        }
    }

    /// Mark the store as created with a fixed partition map
    pub fn with_fixed_map(mut self, fixed_map: bool) -> Self {
        self.fixed_map = fixed_map;
        self
    }

    pub fn is_fixed_map(&self) -> bool {
        self.fixed_map
    }

    pub fn mode(&self) -> StoreMode {
        if self.restriction.is_restricted() {
            return if self.writable {
                StoreMode::PartitionedWritable(self.restriction)
            } else {
                StoreMode::PartitionedReadOnly(self.restriction)
            };
        }

        match (self.writable, self.has_maps(), self.merged) {
            (true, true, _) => StoreMode::PartitionedWritable(Restriction::None),
            (true, false, _) => StoreMode::UnpartitionedWritable,
            (false, _, true) => StoreMode::MergedReadOnly,
            (false, _, false) => StoreMode::UnpartitionedReadOnly,
        }
    }

    pub fn current_version(&self) -> u32 {
        self.current_version
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn restriction(&self) -> Restriction {
        self.restriction
    }

    fn has_maps(&self) -> bool {
        self.unitig_map.is_some() || self.contig_map.is_some()
    }

    fn map(&self, class: TigClass) -> Option<&PartitionMap> {
        match class {
            TigClass::Unitig => self.unitig_map.as_ref(),
            TigClass::Contig => self.contig_map.as_ref(),
        }
    }

    /// Fail unless writes are allowed
    pub fn check_writable(&self) -> Result<()> {
        if !self.writable {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }

    /// Validate a `next_version` call, returning the version it would create
    pub fn check_next_version(&self) -> Result<u32> {
        self.check_writable()?;

        if self.restriction.is_restricted() || self.has_maps() || self.fixed_map {
            return Err(StoreError::UnsupportedInPartitionedMode("next_version"));
        }

        check_version(self.current_version + 1)
    }

    /// Move writes to `version` (after `check_next_version`)
    pub fn advance_to(&mut self, version: u32) {
        self.current_version = version;
    }

    /// Start routing writes through partition maps. Irrevocable for the
    /// session: `next_version` fails from here on.
    pub fn write_to_partitioned(
        &mut self,
        unitig_map: Option<PartitionMap>,
        contig_map: Option<PartitionMap>,
    ) -> Result<()> {
        self.check_writable()?;

        if self.restriction.is_restricted() || self.has_maps() {
            return Err(StoreError::UnsupportedInPartitionedMode("write_to_partitioned"));
        }

        self.unitig_map = unitig_map;
        self.contig_map = contig_map;
        Ok(())
    }

    /// Partition a write of (`class`, `id`) lands in
    pub fn write_partition(&self, class: TigClass, id: u32) -> u32 {
        if let Some(p) = self.restriction.partition() {
            return p;
        }
        self.map(class).map(|m| m.partition_of(id)).unwrap_or(0)
    }

    /// Whether a tig of `class` owned by `partition` is visible
    pub fn allows_read(&self, class: TigClass, partition: u32) -> bool {
        self.restriction.allows(class, partition)
    }

    /// Partitions whose `class` table this session writes when persisting
    /// (0 is the unpartitioned table)
    pub fn persist_targets(&self, class: TigClass) -> Vec<u32> {
        if let Some(p) = self.restriction.partition() {
            return vec![p];
        }

        let mut targets = vec![0];
        if let Some(map) = self.map(class) {
            targets.extend(map.partitions());
        }
        targets
    }
}
