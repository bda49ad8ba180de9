//! Tests for MultiAlignStore (unpartitioned)
//!
//! These tests verify:
//! - Create / open / close lifecycle and on-disk layout
//! - Insert, load, copy, delete semantics
//! - Cache ownership and flush behaviour
//! - Summary accessors and setters
//! - Versioning with next_version

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use mastore::{
    store_path, ContigStatus, MultiAlign, MultiAlignStore, OverlapPolicy, PayloadSyncStrategy,
    Placement, StoreConfig, StoreError, StoreMode, TigClass, TigSummary, UnitigFur, UnitigStatus,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = store_path(temp_dir.path().join("asm"));
    (temp_dir, path)
}

fn unitig(id: u32, coverage_stat: f64) -> MultiAlign {
    let mut ma = MultiAlign::new(id)
        .with_consensus(b"ACGTTGCA", b"IIIIIIII")
        .with_summary(TigSummary {
            coverage_stat,
            microhet_prob: 0.25,
            unitig_status: UnitigStatus::Unique,
            ..TigSummary::default()
        });
    ma.add_fragment(Placement { ident: 100 + id, begin: 0, end: 8 });
    ma
}

fn contig(id: u32) -> MultiAlign {
    let mut ma = MultiAlign::new(id).with_consensus(b"GGGCCC", b"555555");
    ma.summary.contig_status = ContigStatus::Placed;
    ma.add_unitig(Placement { ident: id, begin: 0, end: 6 });
    ma
}

/// Contents of every file in the store directory
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .map(|e| (e.file_name().to_string_lossy().into_owned(), fs::read(e.path()).unwrap()))
        .collect()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_create_writes_version_one_tables() {
    let (_temp, path) = setup_temp_store();

    let store = MultiAlignStore::create_path(&path).unwrap();

    assert_eq!(store.current_version(), 1);
    assert_eq!(store.mode(), StoreMode::UnpartitionedWritable);
    assert_eq!(store.num_unitigs(), 0);
    assert_eq!(store.num_contigs(), 0);
    assert!(path.join("v001.utg").exists());
    assert!(path.join("v001.ctg").exists());
}

#[test]
fn test_create_over_existing_store_fails() {
    let (_temp, path) = setup_temp_store();
    MultiAlignStore::create_path(&path).unwrap().close().unwrap();

    let result = MultiAlignStore::create_path(&path);

    assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
}

#[test]
fn test_open_missing_store() {
    let (_temp, path) = setup_temp_store();

    let result = MultiAlignStore::open_path(&path, 1, 0, 0, false);

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_open_missing_version() {
    let (_temp, path) = setup_temp_store();
    MultiAlignStore::create_path(&path).unwrap().close().unwrap();

    let result = MultiAlignStore::open_path(&path, 4, 0, 0, false);

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_open_version_zero_invalid() {
    let (_temp, path) = setup_temp_store();
    MultiAlignStore::create_path(&path).unwrap().close().unwrap();

    let result = MultiAlignStore::open_path(&path, 0, 0, 0, false);

    assert!(matches!(result, Err(StoreError::InvalidVersion(0))));
}

#[test]
fn test_open_with_both_restrictions_fails() {
    let (_temp, path) = setup_temp_store();
    MultiAlignStore::create_path(&path).unwrap().close().unwrap();

    let result = MultiAlignStore::open_path(&path, 1, 1, 2, false);

    assert!(matches!(
        result,
        Err(StoreError::ConflictingRestriction { unitig: 1, contig: 2 })
    ));
}

#[test]
fn test_close_and_reopen_preserves_tigs() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();
        store.insert(unitig(1, 2.0), TigClass::Unitig, true).unwrap();
        store.insert(contig(0), TigClass::Contig, false).unwrap();
        store.close().unwrap();
    }

    let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();

    assert_eq!(store.mode(), StoreMode::UnpartitionedReadOnly);
    assert_eq!(store.num_unitigs(), 2);
    assert_eq!(store.num_contigs(), 1);
    assert_eq!(store.load(1, TigClass::Unitig).unwrap().unwrap(), &unitig(1, 2.0));
    assert_eq!(store.load(0, TigClass::Contig).unwrap().unwrap(), &contig(0));
}

#[test]
fn test_drop_persists_writable_store() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(3, 4.0), TigClass::Unitig, false).unwrap();
    }

    let store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();

    assert_eq!(store.num_unitigs(), 4);
    assert_eq!(store.unitig_coverage_stat(3).unwrap(), 4.0);
}

#[test]
fn test_reopen_writable_continues_same_version() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();
        store.close().unwrap();
    }
    {
        let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, true).unwrap();
        assert_eq!(store.current_version(), 1);
        store.insert(unitig(1, 2.0), TigClass::Unitig, false).unwrap();
        store.close().unwrap();
    }

    let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();
    assert_eq!(store.num_unitigs(), 2);
    assert!(store.load(0, TigClass::Unitig).unwrap().is_some());
    assert!(store.load(1, TigClass::Unitig).unwrap().is_some());
}

#[test]
fn test_every_write_sync_strategy() {
    let (_temp, path) = setup_temp_store();
    let config = StoreConfig::builder()
        .store_dir(&path)
        .sync_strategy(PayloadSyncStrategy::EveryWrite)
        .overlap_policy(OverlapPolicy::Reject)
        .build();

    let mut store = MultiAlignStore::create(config).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();

    assert!(fs::metadata(path.join("v001.dat")).unwrap().len() > 0);
}

// =============================================================================
// Insert / Load / Copy Tests
// =============================================================================

#[test]
fn test_insert_then_load_round_trip() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    let original = unitig(0, 1.5);

    store.insert(original.clone(), TigClass::Unitig, false).unwrap();
    assert_eq!(store.cached_count(TigClass::Unitig), 0);

    let loaded = store.load(0, TigClass::Unitig).unwrap().unwrap();
    assert_eq!(loaded, &original);
    assert_eq!(store.cached_count(TigClass::Unitig), 1);
}

#[test]
fn test_insert_keep_in_cache_owns_object() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();

    store.insert(unitig(2, 3.0), TigClass::Unitig, true).unwrap();

    assert_eq!(store.cached_count(TigClass::Unitig), 1);
    assert_eq!(store.num_unitigs(), 3);
    assert_eq!(store.load(2, TigClass::Unitig).unwrap().unwrap().summary.coverage_stat, 3.0);
}

#[test]
fn test_insert_replaces_previous_copy() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();

    store.insert(unitig(0, 1.0), TigClass::Unitig, true).unwrap();
    let first = store.record(0, TigClass::Unitig).unwrap();
    store.insert(unitig(0, 7.0), TigClass::Unitig, false).unwrap();
    let second = store.record(0, TigClass::Unitig).unwrap();

    assert!(second.offset() > first.offset());
    assert_eq!(store.cached_count(TigClass::Unitig), 0);
    assert_eq!(store.load(0, TigClass::Unitig).unwrap().unwrap().summary.coverage_stat, 7.0);
}

#[test]
fn test_load_out_of_range() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();

    let result = store.load(1, TigClass::Unitig);

    assert!(matches!(result, Err(StoreError::OutOfRange { id: 1, len: 1 })));
}

#[test]
fn test_load_never_written_id_is_empty() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(4, 1.0), TigClass::Unitig, false).unwrap();

    assert!(store.load(2, TigClass::Unitig).unwrap().is_none());
    assert!(!store.record(2, TigClass::Unitig).unwrap().is_valid());
}

#[test]
fn test_unitigs_and_contigs_are_separate() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();

    store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();
    store.insert(contig(0), TigClass::Contig, false).unwrap();

    assert_eq!(store.load(0, TigClass::Unitig).unwrap().unwrap().consensus, b"ACGTTGCA");
    assert_eq!(store.load(0, TigClass::Contig).unwrap().unwrap().consensus, b"GGGCCC");
}

#[test]
fn test_copy_does_not_cache() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();

    let mut copy = store.copy(0, TigClass::Unitig).unwrap().unwrap();

    assert_eq!(copy, unitig(0, 1.5));
    assert_eq!(store.cached_count(TigClass::Unitig), 0);

    // The copy belongs to the caller
    copy.summary.coverage_stat = 99.0;
    assert_eq!(store.unitig_coverage_stat(0).unwrap(), 1.5);
}

#[test]
fn test_copy_of_cached_tig_reflects_cache() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, true).unwrap();
    store.set_unitig_coverage_stat(0, 6.0).unwrap();

    let copy = store.copy(0, TigClass::Unitig).unwrap().unwrap();

    assert_eq!(copy.summary.coverage_stat, 6.0);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_hides_tig_but_keeps_slot() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, true).unwrap();
    store.insert(unitig(1, 2.0), TigClass::Unitig, true).unwrap();

    store.delete(0, TigClass::Unitig).unwrap();

    assert!(store.load(0, TigClass::Unitig).unwrap().is_none());
    assert!(store.copy(0, TigClass::Unitig).unwrap().is_none());
    assert_eq!(store.num_unitigs(), 2);
    assert_eq!(store.cached_count(TigClass::Unitig), 1);

    let record = store.record(0, TigClass::Unitig).unwrap();
    assert!(record.is_valid());
    assert!(record.is_deleted());
}

#[test]
fn test_delete_survives_reopen() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(contig(0), TigClass::Contig, false).unwrap();
        store.delete(0, TigClass::Contig).unwrap();
        store.close().unwrap();
    }

    let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();

    assert!(store.is_deleted(0, TigClass::Contig).unwrap());
    assert!(store.load(0, TigClass::Contig).unwrap().is_none());
    assert_eq!(store.num_contigs(), 1);
}

#[test]
fn test_delete_out_of_range() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();

    assert!(matches!(
        store.delete(0, TigClass::Unitig),
        Err(StoreError::OutOfRange { .. })
    ));
}

#[test]
fn test_tig_ids_skip_deleted_and_unwritten() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    for id in [0, 1, 3, 4] {
        store.insert(unitig(id, 1.0), TigClass::Unitig, false).unwrap();
    }
    store.delete(3, TigClass::Unitig).unwrap();

    let ids: Vec<u32> = store.tig_ids(TigClass::Unitig).collect();

    assert_eq!(ids, vec![0, 1, 4]);
}

// =============================================================================
// Flush Tests
// =============================================================================

#[test]
fn test_flush_empties_cache() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, true).unwrap();
    store.insert(contig(0), TigClass::Contig, true).unwrap();

    store.flush_cache().unwrap();

    assert_eq!(store.cached_count(TigClass::Unitig), 0);
    assert_eq!(store.cached_count(TigClass::Contig), 0);
    assert_eq!(store.load(0, TigClass::Unitig).unwrap().unwrap(), &unitig(0, 1.0));
}

#[test]
fn test_load_mut_summary_edit_reaches_record() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, true).unwrap();

    {
        let mut tig = store.load_mut(0, TigClass::Unitig).unwrap().unwrap();
        tig.summary.coverage_stat = 9.0;
        tig.summary.unique_rept = UnitigFur::ForcedRepeat;
    }

    // No flush needed: record and cached copy agree as soon as the borrow ends
    assert_eq!(store.unitig_coverage_stat(0).unwrap(), 9.0);
    assert_eq!(store.unitig_fur(0).unwrap(), UnitigFur::ForcedRepeat);
    let loaded_summary = store.load(0, TigClass::Unitig).unwrap().unwrap().summary;
    assert_eq!(
        loaded_summary,
        store.summary(0, TigClass::Unitig).unwrap()
    );

    store.flush_cache().unwrap();
    let reloaded = store.load(0, TigClass::Unitig).unwrap().unwrap();
    assert_eq!(reloaded.summary.coverage_stat, 9.0);
    assert_eq!(reloaded.summary.unique_rept, UnitigFur::ForcedRepeat);
}

#[test]
fn test_load_mut_cannot_move_tig_to_another_id() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();

    {
        let mut tig = store.load_mut(0, TigClass::Unitig).unwrap().unwrap();
        tig.id = 7;
        tig.summary.coverage_stat = 3.0;
    }
    store.flush_cache().unwrap();

    assert_eq!(store.num_unitigs(), 1);
    assert_eq!(store.cached_count(TigClass::Unitig), 0);
    assert_eq!(store.unitig_coverage_stat(0).unwrap(), 3.0);
    assert_eq!(store.load(0, TigClass::Unitig).unwrap().unwrap().id, 0);
}

#[test]
fn test_load_mut_rejected_when_read_only() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();
        store.close().unwrap();
    }
    let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();

    assert!(matches!(
        store.load_mut(0, TigClass::Unitig),
        Err(StoreError::ReadOnly)
    ));
}

#[test]
fn test_flush_is_idempotent() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, true).unwrap();
    store.insert(unitig(1, 2.0), TigClass::Unitig, false).unwrap();
    store.load(1, TigClass::Unitig).unwrap();

    store.flush_cache().unwrap();
    let mut first = Vec::new();
    store.dump_table(TigClass::Unitig, &mut first).unwrap();
    let summaries: Vec<TigSummary> =
        (0..2).map(|id| store.summary(id, TigClass::Unitig).unwrap()).collect();
    let files = snapshot(&path);

    store.flush_cache().unwrap();
    let mut second = Vec::new();
    store.dump_table(TigClass::Unitig, &mut second).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        summaries,
        (0..2).map(|id| store.summary(id, TigClass::Unitig).unwrap()).collect::<Vec<_>>()
    );
    assert_eq!(files, snapshot(&path));
}

// =============================================================================
// Summary Accessor Tests
// =============================================================================

#[test]
fn test_summary_getters_read_records() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();
    store.insert(contig(0), TigClass::Contig, false).unwrap();

    assert_eq!(store.unitig_coverage_stat(0).unwrap(), 1.5);
    assert_eq!(store.unitig_microhet_prob(0).unwrap(), 0.25);
    assert_eq!(store.unitig_status(0).unwrap(), UnitigStatus::Unique);
    assert_eq!(store.unitig_fur(0).unwrap(), UnitigFur::ForcedNone);
    assert_eq!(store.contig_status(0).unwrap(), ContigStatus::Placed);
    assert_eq!(store.num_frags(0, TigClass::Unitig).unwrap(), 1);
    assert_eq!(store.num_unitigs_in(0, TigClass::Contig).unwrap(), 1);
    assert_eq!(store.cached_count(TigClass::Unitig), 0);
}

#[test]
fn test_summary_getter_out_of_range() {
    let (_temp, path) = setup_temp_store();
    let store = MultiAlignStore::create_path(&path).unwrap();

    assert!(matches!(
        store.unitig_coverage_stat(0),
        Err(StoreError::OutOfRange { id: 0, len: 0 })
    ));
}

#[test]
fn test_setters_update_record_and_cache() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, true).unwrap();
    store.insert(contig(0), TigClass::Contig, true).unwrap();

    store.set_unitig_coverage_stat(0, 2.5).unwrap();
    store.set_unitig_microhet_prob(0, 0.75).unwrap();
    store.set_unitig_status(0, UnitigStatus::Separable).unwrap();
    store.set_unitig_fur(0, UnitigFur::ForcedUnique).unwrap();
    store.set_contig_status(0, ContigStatus::Unplaced).unwrap();

    let cached = store.load(0, TigClass::Unitig).unwrap().unwrap().summary;
    assert_eq!(cached, store.summary(0, TigClass::Unitig).unwrap());
    assert_eq!(cached.coverage_stat, 2.5);
    assert_eq!(cached.microhet_prob, 0.75);
    assert_eq!(cached.unitig_status, UnitigStatus::Separable);
    assert_eq!(cached.unique_rept, UnitigFur::ForcedUnique);

    let contig = store.load(0, TigClass::Contig).unwrap().unwrap().summary;
    assert_eq!(contig.contig_status, ContigStatus::Unplaced);
}

#[test]
fn test_setter_applies_to_uncached_tig_on_load() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();

    store.set_unitig_coverage_stat(0, 8.0).unwrap();

    let loaded = store.load(0, TigClass::Unitig).unwrap().unwrap();
    assert_eq!(loaded.summary.coverage_stat, 8.0);
}

#[test]
fn test_setter_on_never_written_id_fails() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(2, 1.0), TigClass::Unitig, false).unwrap();

    let result = store.set_unitig_coverage_stat(1, 5.0);

    assert!(matches!(
        result,
        Err(StoreError::NotWritten { class: TigClass::Unitig, id: 1 })
    ));
    assert_eq!(store.unitig_coverage_stat(1).unwrap(), 0.0);
    assert!(!store.record(1, TigClass::Unitig).unwrap().is_valid());
}

#[test]
fn test_setter_on_deleted_tig_still_allowed() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(contig(0), TigClass::Contig, false).unwrap();
    store.delete(0, TigClass::Contig).unwrap();

    store.set_contig_status(0, ContigStatus::Unplaced).unwrap();

    assert_eq!(store.contig_status(0).unwrap(), ContigStatus::Unplaced);
}

#[test]
fn test_setters_rejected_when_read_only() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();
        store.close().unwrap();
    }
    let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();

    assert!(matches!(store.set_unitig_coverage_stat(0, 2.0), Err(StoreError::ReadOnly)));
    assert!(matches!(
        store.insert(unitig(1, 1.0), TigClass::Unitig, false),
        Err(StoreError::ReadOnly)
    ));
    assert!(matches!(store.delete(0, TigClass::Unitig), Err(StoreError::ReadOnly)));
    assert!(matches!(store.next_version(), Err(StoreError::ReadOnly)));
}

// =============================================================================
// Version Tests
// =============================================================================

#[test]
fn test_next_version_keeps_records_addressable() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();

    assert_eq!(store.next_version().unwrap(), 2);
    store.insert(unitig(1, 2.0), TigClass::Unitig, false).unwrap();

    assert_eq!(store.record(0, TigClass::Unitig).unwrap().version(), 1);
    assert_eq!(store.record(1, TigClass::Unitig).unwrap().version(), 2);
    assert!(store.load(0, TigClass::Unitig).unwrap().is_some());
    assert!(path.join("v002.dat").exists());
    store.close().unwrap();

    let mut store = MultiAlignStore::open_path(&path, 2, 0, 0, false).unwrap();
    assert_eq!(store.load(0, TigClass::Unitig).unwrap().unwrap(), &unitig(0, 1.0));
    assert_eq!(store.load(1, TigClass::Unitig).unwrap().unwrap(), &unitig(1, 2.0));
}

#[test]
fn test_older_version_is_unchanged() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();
        store.next_version().unwrap();
        store.insert(unitig(0, 5.0), TigClass::Unitig, false).unwrap();
        store.insert(unitig(1, 6.0), TigClass::Unitig, false).unwrap();
        store.close().unwrap();
    }

    let mut store = MultiAlignStore::open_path(&path, 1, 0, 0, false).unwrap();

    assert_eq!(store.num_unitigs(), 1);
    assert_eq!(store.load(0, TigClass::Unitig).unwrap().unwrap().summary.coverage_stat, 1.0);
    assert_eq!(store.latest_version().unwrap(), Some(2));
}

#[test]
fn test_coverage_update_after_next_version_is_persisted() {
    let (_temp, path) = setup_temp_store();
    {
        let mut store = MultiAlignStore::create_path(&path).unwrap();
        store.insert(unitig(0, 1.5), TigClass::Unitig, false).unwrap();
        store.next_version().unwrap();
        store.set_unitig_coverage_stat(0, 2.5).unwrap();
        store.close().unwrap();
    }

    let latest = MultiAlignStore::find_latest_version(&path).unwrap().unwrap();
    let store = MultiAlignStore::open_path(&path, latest, 0, 0, false).unwrap();

    assert_eq!(latest, 2);
    assert_eq!(store.unitig_coverage_stat(0).unwrap(), 2.5);
}

// =============================================================================
// Diagnostics Tests
// =============================================================================

#[test]
fn test_dump_record() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(unitig(0, 1.0), TigClass::Unitig, false).unwrap();

    let mut out = Vec::new();
    store.dump_record(0, TigClass::Unitig, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("unitigRecord.valid      = 1"));
    assert!(text.contains("unitigRecord.deleted    = 0"));
    assert!(text.contains("unitigRecord.version    = 1"));
    assert!(text.contains("unitigRecord.offset     = 0"));
}

#[test]
fn test_dump_table_one_line_per_id() {
    let (_temp, path) = setup_temp_store();
    let mut store = MultiAlignStore::create_path(&path).unwrap();
    store.insert(contig(2), TigClass::Contig, false).unwrap();

    let mut out = Vec::new();
    store.dump_table(TigClass::Contig, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("0\tvalid\t0"));
    assert!(lines[2].starts_with("2\tvalid\t1\tdeleted\t0\tpartition\t0\tversion\t1"));
}
