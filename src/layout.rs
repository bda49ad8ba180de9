//! Store Layout
//!
//! File naming inside a `<name>.maStore/` directory.
//!
//! ```text
//! x.maStore/
//!   v001.dat         v001.utg         v001.ctg          (unpartitioned)
//!   v002.p001.dat    v002.p001.utg    v002.p001.ctg     (partition 1)
//!   v002.p002.dat    v002.p002.utg    v002.p002.ctg     (partition 2)
//! ```
//!
//! `.dat` files hold payloads, `.utg`/`.ctg` files hold record tables.
//! Partition 0 means "unpartitioned" and has no `.pNNN` component.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::tig::TigClass;

/// Highest partition id (names use three fixed-width digits)
pub const MAX_PARTITION: u32 = 999;

/// Highest version id (names use three fixed-width digits)
pub const MAX_VERSION: u32 = 999;

/// Extension of payload files
pub const PAYLOAD_EXTENSION: &str = "dat";

/// Reject partition ids that do not fit the naming scheme
pub fn check_partition(partition: u32) -> Result<u32> {
    if partition > MAX_PARTITION {
        return Err(StoreError::InvalidPartition(partition));
    }
    Ok(partition)
}

/// Reject version ids that do not fit the naming scheme (versions start at 1)
pub fn check_version(version: u32) -> Result<u32> {
    if version == 0 || version > MAX_VERSION {
        return Err(StoreError::InvalidVersion(version));
    }
    Ok(version)
}

/// Build a file name: `v001.dat`, `v002.p003.utg`
pub fn file_name(version: u32, partition: u32, extension: &str) -> String {
    if partition == 0 {
        format!("v{:03}.{}", version, extension)
    } else {
        format!("v{:03}.p{:03}.{}", version, partition, extension)
    }
}

/// Parse a file name back into (version, partition, extension)
/// "v002.p003.utg" → Some((2, 3, "utg")), "v001.dat" → Some((1, 0, "dat"))
pub fn parse_file_name(name: &str) -> Option<(u32, u32, &str)> {
    let rest = name.strip_prefix('v')?;
    let mut parts = rest.split('.');

    let version: u32 = parts.next()?.parse().ok()?;
    let second = parts.next()?;

    let (partition, extension) = match second.strip_prefix('p') {
        Some(digits) => (digits.parse().ok()?, parts.next()?),
        None => (0, second),
    };

    if parts.next().is_some() {
        return None;
    }

    Some((version, partition, extension))
}

/// Paths of one store directory
#[derive(Debug, Clone)]
pub struct StoreLayout {
    dir: PathBuf,
}

impl StoreLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Payload file for (version, partition)
    pub fn payload_path(&self, version: u32, partition: u32) -> PathBuf {
        self.dir.join(file_name(version, partition, PAYLOAD_EXTENSION))
    }

    /// Record table file for (version, partition, class)
    pub fn table_path(&self, version: u32, partition: u32, class: TigClass) -> PathBuf {
        self.dir.join(file_name(version, partition, class.extension()))
    }

    /// Every (version, partition, class) with a record table on disk
    fn table_files(&self) -> Result<Vec<(u32, u32, TigClass)>> {
        if !self.dir.is_dir() {
            return Err(StoreError::NotFound(self.dir.clone()));
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if let Some((version, partition, extension)) = parse_file_name(name) {
                let class = match extension {
                    "utg" => TigClass::Unitig,
                    "ctg" => TigClass::Contig,
                    _ => continue,
                };
                found.push((version, partition, class));
            }
        }
        Ok(found)
    }

    /// Versions with at least one record table
    pub fn versions(&self) -> Result<BTreeSet<u32>> {
        Ok(self.table_files()?.into_iter().map(|(v, _, _)| v).collect())
    }

    /// Highest version with at least one record table
    pub fn latest_version(&self) -> Result<Option<u32>> {
        Ok(self.versions()?.into_iter().next_back())
    }

    /// Nonzero partitions holding a `class` table at `version`, ascending
    pub fn partitions(&self, version: u32, class: TigClass) -> Result<BTreeSet<u32>> {
        Ok(self
            .table_files()?
            .into_iter()
            .filter(|&(v, p, c)| v == version && p != 0 && c == class)
            .map(|(_, p, _)| p)
            .collect())
    }

    /// Nonzero partitions holding a table of either class at `version`
    pub fn all_partitions(&self, version: u32) -> Result<BTreeSet<u32>> {
        Ok(self
            .table_files()?
            .into_iter()
            .filter(|&(v, p, _)| v == version && p != 0)
            .map(|(_, p, _)| p)
            .collect())
    }
}
