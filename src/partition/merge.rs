//! Partition merge
//!
//! Consolidates the per-partition record tables of one version into a
//! single table.
//!
//! Every partition table holds records for ALL ids, but only the records
//! its own partition wrote at that version are current. Those are the
//! records copied; everything else keeps the unpartitioned value.

use crate::config::OverlapPolicy;
use crate::error::{Result, StoreError};
use crate::layout::StoreLayout;
use crate::record::RecordTable;
use crate::tig::TigClass;

/// Outcome of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Partitions scanned, ascending
    pub partitions: Vec<u32>,
    /// Records copied from partition tables
    pub adopted: u32,
    /// Ids claimed by more than one partition (only under `LastWins`)
    pub overlaps: u32,
}

/// Merge partition tables into `base`
///
/// `partitions` must be in ascending partition order. A record is taken
/// from partition `p` when it is valid, owned by `p` and written at
/// `version`. Under `OverlapPolicy::LastWins` the highest partition wins.
pub fn merge_partitions(
    base: &mut RecordTable,
    version: u32,
    partitions: impl IntoIterator<Item = (u32, RecordTable)>,
    policy: OverlapPolicy,
) -> Result<MergeReport> {
    let mut report = MergeReport::default();
    // owner[id] = partition that supplied the record, 0 if none yet
    let mut owner: Vec<u32> = Vec::new();

    for (partition, table) in partitions {
        report.partitions.push(partition);
        base.grow(table.len());
        if table.is_fixed_map() {
            base.set_fixed_map(true);
        }
        if owner.len() < table.len() as usize {
            owner.resize(table.len() as usize, 0);
        }

        for (id, record) in table.iter() {
            if !record.is_valid()
                || record.partition() != partition
                || record.version() != version
            {
                continue;
            }

            let previous = owner[id as usize];
            if previous != 0 && previous != partition {
                match policy {
                    OverlapPolicy::Reject => {
                        return Err(StoreError::PartitionOverlap {
                            id,
                            first: previous,
                            second: partition,
                        });
                    }
                    OverlapPolicy::LastWins => {
                        tracing::warn!(
                            "{} {} claimed by partitions {} and {}; keeping partition {}",
                            table.class(),
                            id,
                            previous,
                            partition,
                            partition
                        );
                        report.overlaps += 1;
                    }
                }
            }

            base.adopt(id, *record);
            owner[id as usize] = partition;
            report.adopted += 1;
        }
    }

    Ok(report)
}

/// Load the consolidated `class` table of `version`
///
/// Starts from the unpartitioned table (if any) and merges every partition
/// table found on disk for that version.
pub fn load_merged(
    layout: &StoreLayout,
    class: TigClass,
    version: u32,
    policy: OverlapPolicy,
) -> Result<(RecordTable, MergeReport)> {
    let base_path = layout.table_path(version, 0, class);
    let base = RecordTable::deserialize_if_exists(class, &base_path)?;
    let partitions = layout.partitions(version, class)?;

    if base.is_none() && partitions.is_empty() {
        return Err(StoreError::NotFound(base_path));
    }

    let mut table = base.unwrap_or_else(|| RecordTable::new(class));
    let tables = partitions
        .iter()
        .map(|&p| {
            RecordTable::deserialize(class, &layout.table_path(version, p, class))
                .map(|t| (p, t))
        })
        .collect::<Result<Vec<_>>>()?;

    let report = merge_partitions(&mut table, version, tables, policy)?;

    if !report.partitions.is_empty() {
        tracing::info!(
            "Merged {} {} records from partitions {:?} of v{:03}",
            report.adopted,
            class,
            report.partitions,
            version
        );
    }

    Ok((table, report))
}
