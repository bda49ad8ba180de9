//! Configuration for mastore
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

/// Directory suffix for every store
pub const STORE_SUFFIX: &str = ".maStore";

/// Derive the store directory for a name prefix: `asm` → `asm.maStore`
pub fn store_path(prefix: impl AsRef<Path>) -> PathBuf {
    let mut path = prefix.as_ref().as_os_str().to_owned();
    path.push(STORE_SUFFIX);
    PathBuf::from(path)
}

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Store directory
    /// Internal structure:
    ///   {store_dir}/
    ///     ├── v001.dat        (payloads, unpartitioned)
    ///     ├── v001.utg        (unitig records)
    ///     ├── v001.ctg        (contig records)
    ///     └── v002.p001.*     (same, per partition)
    pub store_dir: PathBuf,

    /// How often payload files are fsynced
    pub sync_strategy: PayloadSyncStrategy,

    // -------------------------------------------------------------------------
    // Partition Configuration
    // -------------------------------------------------------------------------
    /// What to do when two partitions claim the same tig during a merge
    pub overlap_policy: OverlapPolicy,
}

/// Payload sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSyncStrategy {
    /// fsync after every appended payload (safest, slowest)
    EveryWrite,

    /// fsync open payload files only when tables are persisted
    OnClose,
}

/// Merge behaviour when a tig is written by more than one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Fail the open with `StoreError::PartitionOverlap`
    Reject,

    /// Keep the record from the highest partition and log a warning
    LastWins,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_dir: store_path("./assembly"),
            sync_strategy: PayloadSyncStrategy::OnClose,
            overlap_policy: OverlapPolicy::Reject,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Default config rooted at `path`
    pub fn with_dir(path: impl Into<PathBuf>) -> Self {
        Self::builder().store_dir(path).build()
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the store directory
    pub fn store_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_dir = path.into();
        self
    }

    /// Set the payload sync strategy
    pub fn sync_strategy(mut self, strategy: PayloadSyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the merge overlap policy
    pub fn overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.config.overlap_policy = policy;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
