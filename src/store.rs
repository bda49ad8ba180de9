//! Store Module
//!
//! The store facade that composes record tables, payload files, the cache
//! and the partition controller.
//!
//! ## Responsibilities
//! - Create and open stores (unpartitioned, partitioned, restricted, merged)
//! - Insert, delete, load and copy tigs
//! - Summary accessors that never touch payload files
//! - Persist record tables on version change and close

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::cache::{TigCache, TigMut};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::layout::{check_version, StoreLayout};
use crate::partition::{
    load_merged, PartitionController, PartitionMap, Restriction, StoreMode,
};
use crate::payload::PayloadManager;
use crate::record::{RecordTable, TigRecord};
use crate::tig::{
    ContigStatus, MultiAlign, TigClass, TigSummary, UnitigFur, UnitigStatus,
};

/// Disk-resident store of unitig and contig multi-alignments
///
/// ## Ownership
/// Objects handed to `insert` with `keep_in_cache` and objects returned by
/// `load` belong to the store; callers get borrows. `copy` returns an
/// owned clone and never touches the cache.
///
/// ## Concurrency
/// None inside a process: one store value, one thread. Independent
/// processes may write disjoint partitions of the same version at once;
/// all of them must finish before the store is opened unrestricted.
pub struct MultiAlignStore {
    config: StoreConfig,
    layout: StoreLayout,
    partitions: PartitionController,

    unitigs: RecordTable,
    contigs: RecordTable,

    unitig_cache: TigCache,
    contig_cache: TigCache,

    payloads: PayloadManager,

    /// Tables already persisted by `close`
    closed: bool,
}

impl MultiAlignStore {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a new unpartitioned store at version 1
    pub fn create(config: StoreConfig) -> Result<Self> {
        let layout = Self::prepare_new(&config)?;
        let partitions = PartitionController::unpartitioned(1, true, false);

        let mut store = Self::assemble(
            config,
            layout,
            partitions,
            RecordTable::new(TigClass::Unitig),
            RecordTable::new(TigClass::Contig),
        );
        store.persist()?;

        tracing::info!("Created store {}", store.store_dir().display());
        Ok(store)
    }

    /// Create a new store at version 1 whose writes are routed by partition
    /// maps. The tables remember this: the store never leaves version 1, in
    /// this session or any later one.
    pub fn create_partitioned(
        config: StoreConfig,
        unitig_map: Option<PartitionMap>,
        contig_map: Option<PartitionMap>,
    ) -> Result<Self> {
        if unitig_map.is_none() && contig_map.is_none() {
            return Err(StoreError::Config(
                "a partitioned store needs at least one partition map".to_string(),
            ));
        }

        let layout = Self::prepare_new(&config)?;
        let partitions = PartitionController::mapped(1, unitig_map, contig_map);

        let mut unitigs = RecordTable::new(TigClass::Unitig);
        let mut contigs = RecordTable::new(TigClass::Contig);
        unitigs.set_fixed_map(true);
        contigs.set_fixed_map(true);

        let mut store = Self::assemble(config, layout, partitions, unitigs, contigs);
        store.persist()?;

        tracing::info!(
            "Created partitioned store {}",
            store.store_dir().display()
        );
        Ok(store)
    }

    /// Open an existing store at `version`
    ///
    /// With both partitions 0, tables of every partition present at that
    /// version are merged. When writable and partition tables were merged,
    /// writes go to `version + 1`, unless the store was created with
    /// `create_partitioned`: such a store never advances, so that open fails
    /// with `UnsupportedInPartitionedMode`. With a nonzero partition, access
    /// is restricted to that partition and writes stay in it.
    pub fn open(
        config: StoreConfig,
        version: u32,
        unitig_partition: u32,
        contig_partition: u32,
        writable: bool,
    ) -> Result<Self> {
        let layout = StoreLayout::new(&config.store_dir);
        if !layout.dir().is_dir() {
            return Err(StoreError::NotFound(layout.dir().to_path_buf()));
        }

        check_version(version)?;
        let restriction = Restriction::from_args(unitig_partition, contig_partition)?;
        let policy = config.overlap_policy;

        let (unitigs, contigs, partitions) = match restriction {
            Restriction::None => {
                let (unitigs, _) = load_merged(&layout, TigClass::Unitig, version, policy)?;
                let (contigs, _) = load_merged(&layout, TigClass::Contig, version, policy)?;

                let fixed_map = unitigs.is_fixed_map() || contigs.is_fixed_map();
                let merged = !layout.all_partitions(version)?.is_empty();
                let current = if writable && merged {
                    if fixed_map {
                        return Err(StoreError::UnsupportedInPartitionedMode(
                            "writable unrestricted open of a store created partitioned",
                        ));
                    }
                    Self::forward_version(&layout, version)?
                } else {
                    version
                };

                let partitions = PartitionController::unpartitioned(current, writable, merged)
                    .with_fixed_map(fixed_map);
                (unitigs, contigs, partitions)
            }
            Restriction::Unitig(p) | Restriction::Contig(p) => {
                let restricted = if let Restriction::Unitig(_) = restriction {
                    TigClass::Unitig
                } else {
                    TigClass::Contig
                };

                let load = |class: TigClass| -> Result<RecordTable> {
                    let path = layout.table_path(version, p, class);
                    if class == restricted {
                        return RecordTable::deserialize(class, &path);
                    }
                    match RecordTable::deserialize_if_exists(class, &path)? {
                        Some(table) => Ok(table),
                        None => load_merged(&layout, class, version, policy).map(|(t, _)| t),
                    }
                };

                let unitigs = load(TigClass::Unitig)?;
                let contigs = load(TigClass::Contig)?;
                let fixed_map = unitigs.is_fixed_map() || contigs.is_fixed_map();

                let partitions = PartitionController::restricted(version, restriction, writable)
                    .with_fixed_map(fixed_map);
                (unitigs, contigs, partitions)
            }
        };

        let store = Self::assemble(config, layout, partitions, unitigs, contigs);

        tracing::info!(
            "Opened store {} at v{:03} ({:?}, {} unitigs, {} contigs)",
            store.store_dir().display(),
            version,
            store.mode(),
            store.num_unitigs(),
            store.num_contigs()
        );

        Ok(store)
    }

    /// Create an unpartitioned store at `path` with default settings
    pub fn create_path(path: &Path) -> Result<Self> {
        Self::create(StoreConfig::with_dir(path))
    }

    /// Open the store at `path` with default settings
    pub fn open_path(
        path: &Path,
        version: u32,
        unitig_partition: u32,
        contig_partition: u32,
        writable: bool,
    ) -> Result<Self> {
        Self::open(
            StoreConfig::with_dir(path),
            version,
            unitig_partition,
            contig_partition,
            writable,
        )
    }

    /// Highest version with a record table in the store at `path`
    pub fn find_latest_version(path: &Path) -> Result<Option<u32>> {
        StoreLayout::new(path).latest_version()
    }

    fn prepare_new(config: &StoreConfig) -> Result<StoreLayout> {
        let layout = StoreLayout::new(&config.store_dir);
        fs::create_dir_all(layout.dir())?;

        if layout.latest_version()?.is_some() {
            return Err(StoreError::AlreadyExists(layout.dir().to_path_buf()));
        }
        Ok(layout)
    }

    /// Version a writable merged session writes into
    fn forward_version(layout: &StoreLayout, version: u32) -> Result<u32> {
        let next = check_version(version + 1)?;
        if layout.versions()?.contains(&next) {
            return Err(StoreError::AlreadyExists(
                layout.table_path(next, 0, TigClass::Unitig),
            ));
        }
        Ok(next)
    }

    fn assemble(
        config: StoreConfig,
        layout: StoreLayout,
        partitions: PartitionController,
        unitigs: RecordTable,
        contigs: RecordTable,
    ) -> Self {
        let mut unitig_cache = TigCache::new();
        unitig_cache.grow(unitigs.len());
        let mut contig_cache = TigCache::new();
        contig_cache.grow(contigs.len());

        let payloads = PayloadManager::new(
            layout.clone(),
            partitions.is_writable(),
            config.sync_strategy,
        );

        Self {
            config,
            layout,
            partitions,
            unitigs,
            contigs,
            unitig_cache,
            contig_cache,
            payloads,
            closed: false,
        }
    }

    // =========================================================================
    // Version / Partition Transitions
    // =========================================================================

    /// Persist the current version and start writing the next one
    ///
    /// Records stay addressable; they keep pointing at the version that
    /// last wrote them.
    pub fn next_version(&mut self) -> Result<u32> {
        let next = self.partitions.check_next_version()?;

        self.persist()?;
        self.partitions.advance_to(next);

        tracing::info!("Store {} now writing v{:03}", self.store_dir().display(), next);
        Ok(next)
    }

    /// Route subsequent writes through partition maps
    ///
    /// Ids mapped to 0 (or not covered) stay unpartitioned and are invisible
    /// to sessions opened on a partition. `next_version` fails afterwards.
    pub fn write_to_partitioned(
        &mut self,
        unitig_map: Option<PartitionMap>,
        contig_map: Option<PartitionMap>,
    ) -> Result<()> {
        self.partitions.write_to_partitioned(unitig_map, contig_map)?;

        tracing::info!(
            "Store {} writing partitioned data at v{:03}",
            self.store_dir().display(),
            self.current_version()
        );
        Ok(())
    }

    // =========================================================================
    // Tig Operations
    // =========================================================================

    /// Add or replace a tig
    ///
    /// The tig is appended to the payload file of the current version and
    /// its effective partition. With `keep_in_cache` the store keeps the
    /// object; otherwise it is dropped after writing.
    pub fn insert(&mut self, tig: MultiAlign, class: TigClass, keep_in_cache: bool) -> Result<()> {
        self.partitions.check_writable()?;

        let id = tig.id;
        let version = self.partitions.current_version();
        let partition = self.partitions.write_partition(class, id);

        let offset = self.payloads.append(version, partition, &tig)?;

        let (table, cache) = self.parts_mut(class);
        table.set_entry(id, partition, version, offset, tig.summary)?;
        cache.grow(table.len());

        if keep_in_cache {
            cache.put(tig);
        } else {
            cache.evict(id);
        }

        tracing::trace!(
            "Inserted {} {} into v{:03}.p{:03} at {}",
            class,
            id,
            version,
            partition,
            offset
        );
        Ok(())
    }

    /// Mark a tig deleted and drop it from the cache. Payload bytes and the
    /// id slot are kept.
    pub fn delete(&mut self, id: u32, class: TigClass) -> Result<()> {
        self.partitions.check_writable()?;

        let version = self.partitions.current_version();
        let partition = self.partitions.write_partition(class, id);

        let (table, cache) = self.parts_mut(class);
        table.mark_deleted(id, partition, version)?;
        cache.evict(id);

        tracing::trace!("Deleted {} {}", class, id);
        Ok(())
    }

    /// Load and cache a tig, returning a borrow of the store's copy
    ///
    /// `Ok(None)` when the tig was never written, is deleted, or lies outside
    /// the session's partition.
    pub fn load(&mut self, id: u32, class: TigClass) -> Result<Option<&MultiAlign>> {
        match self.visible_record(id, class)? {
            Some(record) => {
                self.ensure_cached(id, class, &record)?;
                Ok(self.cache(class).get(id))
            }
            None => Ok(None),
        }
    }

    /// Like `load`, but the borrow is mutable; writable sessions only
    ///
    /// Summary edits reach the record table when the returned `TigMut` is
    /// dropped. Other edits must be written back with `insert`.
    pub fn load_mut(&mut self, id: u32, class: TigClass) -> Result<Option<TigMut<'_>>> {
        self.partitions.check_writable()?;

        let Some(record) = self.visible_record(id, class)? else {
            return Ok(None);
        };
        self.ensure_cached(id, class, &record)?;

        let (table, cache) = self.parts_mut(class);
        let summary = table.summary_mut(id)?;
        Ok(cache.get_mut(id).map(|tig| TigMut::new(id, tig, summary)))
    }

    /// Load a tig into a caller-owned value without caching it
    pub fn copy(&mut self, id: u32, class: TigClass) -> Result<Option<MultiAlign>> {
        let Some(record) = self.visible_record(id, class)? else {
            return Ok(None);
        };

        if let Some(cached) = self.cache(class).get(id) {
            return Ok(Some(cached.clone()));
        }
        self.read_payload(id, &record).map(Some)
    }

    /// Write cached summaries back into the record tables and drop every
    /// cached object. Payloads are already on disk, so nothing is lost;
    /// dropped objects are re-read on the next `load`.
    pub fn flush_cache(&mut self) -> Result<()> {
        let mut flushed = 0usize;

        for class in TigClass::ALL {
            let (table, cache) = self.parts_mut(class);
            for (id, tig) in cache.drain() {
                *table.summary_mut(id)? = tig.summary;
                flushed += 1;
            }
        }

        tracing::debug!("Flushed {} cached tigs", flushed);
        Ok(())
    }

    /// Ids of `class` this session can load, ascending
    pub fn tig_ids(&self, class: TigClass) -> impl Iterator<Item = u32> + '_ {
        self.table(class)
            .iter()
            .filter(move |(_, r)| r.is_live() && self.partitions.allows_read(class, r.partition()))
            .map(|(id, _)| id)
    }

    pub fn num_unitigs(&self) -> u32 {
        self.unitigs.len()
    }

    pub fn num_contigs(&self) -> u32 {
        self.contigs.len()
    }

    /// Number of ids of `class`, including deleted and never-written ones
    pub fn num_tigs(&self, class: TigClass) -> u32 {
        self.table(class).len()
    }

    /// Copy of the metadata record of a tig
    pub fn record(&self, id: u32, class: TigClass) -> Result<TigRecord> {
        self.table(class).get(id).copied()
    }

    pub fn is_deleted(&self, id: u32, class: TigClass) -> Result<bool> {
        Ok(self.table(class).get(id)?.is_deleted())
    }

    /// Number of cached objects of `class`
    pub fn cached_count(&self, class: TigClass) -> usize {
        self.cache(class).cached_count()
    }

    // =========================================================================
    // Summary Accessors (no payload access)
    // =========================================================================

    pub fn summary(&self, id: u32, class: TigClass) -> Result<TigSummary> {
        Ok(*self.table(class).get(id)?.summary())
    }

    pub fn unitig_coverage_stat(&self, id: u32) -> Result<f64> {
        Ok(self.summary(id, TigClass::Unitig)?.coverage_stat)
    }

    pub fn unitig_microhet_prob(&self, id: u32) -> Result<f64> {
        Ok(self.summary(id, TigClass::Unitig)?.microhet_prob)
    }

    pub fn unitig_status(&self, id: u32) -> Result<UnitigStatus> {
        Ok(self.summary(id, TigClass::Unitig)?.unitig_status)
    }

    pub fn unitig_fur(&self, id: u32) -> Result<UnitigFur> {
        Ok(self.summary(id, TigClass::Unitig)?.unique_rept)
    }

    pub fn contig_status(&self, id: u32) -> Result<ContigStatus> {
        Ok(self.summary(id, TigClass::Contig)?.contig_status)
    }

    /// Fragments placed in a tig
    pub fn num_frags(&self, id: u32, class: TigClass) -> Result<u32> {
        Ok(self.summary(id, class)?.num_frags)
    }

    /// Unitigs placed in a tig
    pub fn num_unitigs_in(&self, id: u32, class: TigClass) -> Result<u32> {
        Ok(self.summary(id, class)?.num_unitigs)
    }

    pub fn set_unitig_coverage_stat(&mut self, id: u32, coverage_stat: f64) -> Result<()> {
        self.update_summary(id, TigClass::Unitig, |s| s.coverage_stat = coverage_stat)
    }

    pub fn set_unitig_microhet_prob(&mut self, id: u32, microhet_prob: f64) -> Result<()> {
        self.update_summary(id, TigClass::Unitig, |s| s.microhet_prob = microhet_prob)
    }

    pub fn set_unitig_status(&mut self, id: u32, status: UnitigStatus) -> Result<()> {
        self.update_summary(id, TigClass::Unitig, |s| s.unitig_status = status)
    }

    pub fn set_unitig_fur(&mut self, id: u32, fur: UnitigFur) -> Result<()> {
        self.update_summary(id, TigClass::Unitig, |s| s.unique_rept = fur)
    }

    pub fn set_contig_status(&mut self, id: u32, status: ContigStatus) -> Result<()> {
        self.update_summary(id, TigClass::Contig, |s| s.contig_status = status)
    }

    /// Apply `edit` to the record summary and to the cached object, if any.
    /// Ids never written have no tig to describe and are rejected.
    fn update_summary(
        &mut self,
        id: u32,
        class: TigClass,
        edit: impl Fn(&mut TigSummary),
    ) -> Result<()> {
        self.partitions.check_writable()?;
        if !self.table(class).get(id)?.is_valid() {
            return Err(StoreError::NotWritten { class, id });
        }

        let (table, cache) = self.parts_mut(class);
        edit(table.summary_mut(id)?);
        if let Some(tig) = cache.get_mut(id) {
            edit(&mut tig.summary);
        }
        Ok(())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Write one record in human-readable form
    pub fn dump_record(&self, id: u32, class: TigClass, out: &mut impl Write) -> Result<()> {
        let r = self.table(class).get(id)?;

        writeln!(out, "{}Record.valid      = {}", class, u8::from(r.is_valid()))?;
        writeln!(out, "{}Record.deleted    = {}", class, u8::from(r.is_deleted()))?;
        writeln!(out, "{}Record.partition  = {}", class, r.partition())?;
        writeln!(out, "{}Record.version    = {}", class, r.version())?;
        writeln!(out, "{}Record.offset     = {}", class, r.offset())?;
        Ok(())
    }

    /// Write every record of a class, one tab-separated line each
    pub fn dump_table(&self, class: TigClass, out: &mut impl Write) -> Result<()> {
        for (id, r) in self.table(class).iter() {
            writeln!(
                out,
                "{}\tvalid\t{}\tdeleted\t{}\tpartition\t{}\tversion\t{}\toffset\t{}",
                id,
                u8::from(r.is_valid()),
                u8::from(r.is_deleted()),
                r.partition(),
                r.version(),
                r.offset()
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Persist tables (when writable) and sync payload files
    pub fn close(mut self) -> Result<()> {
        self.persist()?;
        self.closed = true;

        tracing::info!("Closed store {}", self.store_dir().display());
        Ok(())
    }

    /// Write the tables this session owns at the current version
    fn persist(&mut self) -> Result<()> {
        if !self.partitions.is_writable() {
            return Ok(());
        }

        self.payloads.sync_all()?;
        self.sync_cached_summaries()?;

        let version = self.partitions.current_version();
        for class in TigClass::ALL {
            for partition in self.partitions.persist_targets(class) {
                let path = self.layout.table_path(version, partition, class);
                self.table(class).serialize(&path)?;
            }
        }
        Ok(())
    }

    /// Copy summaries of cached objects into the record tables
    fn sync_cached_summaries(&mut self) -> Result<()> {
        for class in TigClass::ALL {
            let (table, cache) = self.parts_mut(class);
            for (id, tig) in cache.iter() {
                *table.summary_mut(id)? = tig.summary;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn store_dir(&self) -> &Path {
        self.layout.dir()
    }

    /// Version writes go to
    pub fn current_version(&self) -> u32 {
        self.partitions.current_version()
    }

    pub fn is_writable(&self) -> bool {
        self.partitions.is_writable()
    }

    pub fn mode(&self) -> StoreMode {
        self.partitions.mode()
    }

    pub fn restriction(&self) -> Restriction {
        self.partitions.restriction()
    }

    /// Highest version with a record table on disk
    pub fn latest_version(&self) -> Result<Option<u32>> {
        self.layout.latest_version()
    }

    /// Partitions with record tables at `version`
    pub fn partitions(&self, version: u32) -> Result<BTreeSet<u32>> {
        self.layout.all_partitions(version)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn table(&self, class: TigClass) -> &RecordTable {
        match class {
            TigClass::Unitig => &self.unitigs,
            TigClass::Contig => &self.contigs,
        }
    }

    fn cache(&self, class: TigClass) -> &TigCache {
        match class {
            TigClass::Unitig => &self.unitig_cache,
            TigClass::Contig => &self.contig_cache,
        }
    }

    fn cache_mut(&mut self, class: TigClass) -> &mut TigCache {
        match class {
            TigClass::Unitig => &mut self.unitig_cache,
            TigClass::Contig => &mut self.contig_cache,
        }
    }

    fn parts_mut(&mut self, class: TigClass) -> (&mut RecordTable, &mut TigCache) {
        match class {
            TigClass::Unitig => (&mut self.unitigs, &mut self.unitig_cache),
            TigClass::Contig => (&mut self.contigs, &mut self.contig_cache),
        }
    }

    /// The record of a tig this session may load
    fn visible_record(&self, id: u32, class: TigClass) -> Result<Option<TigRecord>> {
        let record = *self.table(class).get(id)?;

        if !record.is_live() {
            return Ok(None);
        }
        if !self.partitions.allows_read(class, record.partition()) {
            tracing::trace!(
                "{} {} is in partition {}, not visible from {:?}",
                class,
                id,
                record.partition(),
                self.restriction()
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn ensure_cached(&mut self, id: u32, class: TigClass, record: &TigRecord) -> Result<()> {
        if self.cache(class).contains(id) {
            return Ok(());
        }
        let tig = self.read_payload(id, record)?;
        self.cache_mut(class).put(tig);
        Ok(())
    }

    /// Read a payload; the record's summary replaces the stored one
    fn read_payload(&mut self, id: u32, record: &TigRecord) -> Result<MultiAlign> {
        let mut tig = self
            .payloads
            .read(record.version(), record.partition(), record.offset())?;

        if tig.id != id {
            return Err(StoreError::CorruptPayload {
                version: record.version(),
                partition: record.partition(),
                offset: record.offset(),
                reason: format!("expected tig {}, found tig {}", id, tig.id),
            });
        }

        tig.summary = *record.summary();
        Ok(tig)
    }
}

impl Drop for MultiAlignStore {
    fn drop(&mut self) {
        if self.closed || !self.partitions.is_writable() {
            return;
        }
        if let Err(e) = self.persist() {
            tracing::error!(
                "Failed to persist store {} on drop: {}",
                self.layout.dir().display(),
                e
            );
        }
    }
}
