use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sales_core::persistence::{read_table, RETENTION, SNAPSHOT_HEADER};
use sales_core::{
    CanonicalRecord, CanonicalTable, MemoryReporter, Month, PipelineEvent, SnapshotStore,
};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn store_in(dir: &Path) -> (SnapshotStore, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::new());
    (SnapshotStore::new(dir, reporter.clone()), reporter)
}

fn stamp(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn sample_table() -> CanonicalTable {
    CanonicalTable::new(vec![
        CanonicalRecord::new(Month::Maio, Some(2023), 100, true),
        CanonicalRecord::new(Month::Marco, Some(2023), 50, false),
        CanonicalRecord::new(Month::Janeiro, None, 7, false),
    ])
}

fn set_modified(path: &Path, time: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

#[test]
fn test_load_latest_without_snapshots_is_no_data() {
    let dir = TempDir::new().unwrap();

    let (missing, _) = store_in(&dir.path().join("never-created"));
    assert!(missing.load_latest().unwrap().is_none());

    let (empty, _) = store_in(dir.path());
    assert!(empty.load_latest().unwrap().is_none());
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let (store, reporter) = store_in(&dir.path().join("Data"));
    let table = sample_table();

    let path = store.save_at(&table, stamp(1, 9)).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "vendas_macarrao_tratadas_20240301_090000.csv"
    );

    let loaded = store.load_latest().unwrap().unwrap();
    assert_eq!(loaded.path, path);
    assert_eq!(loaded.table, table);

    assert_eq!(
        reporter.events(),
        vec![PipelineEvent::SnapshotSaved { path, rows: 3 }]
    );
}

#[test]
fn test_snapshot_file_format() {
    let dir = TempDir::new().unwrap();
    let (store, _) = store_in(dir.path());

    let path = store.save_at(&sample_table(), stamp(2, 10)).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines[0], SNAPSHOT_HEADER.join(","));
    assert_eq!(lines[0], "Mes,Ano,Vendas,Publicidade,Data");
    assert_eq!(lines[1], "Maio,2023,100,1,2023-05-01");
    assert_eq!(lines[2], "Março,2023,50,0,2023-03-01");
    assert_eq!(lines[3], "Janeiro,,7,0,");
}

#[test]
fn test_empty_table_still_has_header() {
    let dir = TempDir::new().unwrap();
    let (store, _) = store_in(dir.path());

    let path = store.save_at(&CanonicalTable::default(), stamp(3, 0)).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap().trim_end(),
        "Mes,Ano,Vendas,Publicidade,Data"
    );
    assert!(read_table(&path).unwrap().is_empty());
}

#[test]
fn test_same_second_saves_get_distinct_names() {
    let dir = TempDir::new().unwrap();
    let (store, _) = store_in(dir.path());
    let first_table = sample_table();
    let second_table = CanonicalTable::new(vec![CanonicalRecord::new(
        Month::Junho,
        Some(2024),
        1,
        false,
    )]);

    let first = store.save_at(&first_table, stamp(4, 12)).unwrap();
    let second = store.save_at(&second_table, stamp(4, 12)).unwrap();
    assert_ne!(first, second);

    // Identical modification times fall back to the greatest file name
    let now = SystemTime::now();
    set_modified(&first, now);
    set_modified(&second, now);

    let latest = store.load_latest().unwrap().unwrap();
    assert_eq!(latest.path, second);
    assert_eq!(latest.table, second_table);
}

#[test]
fn test_latest_is_chosen_by_modification_time() {
    let dir = TempDir::new().unwrap();
    let (store, _) = store_in(dir.path());

    let newer_name = store.save_at(&sample_table(), stamp(20, 0)).unwrap();
    let older_name = store.save_at(&CanonicalTable::default(), stamp(10, 0)).unwrap();

    let now = SystemTime::now();
    set_modified(&newer_name, now - DAY);
    set_modified(&older_name, now);

    let latest = store.latest().unwrap().unwrap();
    assert_eq!(latest.path, older_name);
}

#[test]
fn test_prune_removes_only_stale_snapshots() {
    let dir = TempDir::new().unwrap();
    let (store, reporter) = store_in(dir.path());
    let table = sample_table();
    let now = SystemTime::now();

    let stale = store.save_at(&table, stamp(1, 0)).unwrap();
    let just_stale = store.save_at(&table, stamp(2, 0)).unwrap();
    let just_fresh = store.save_at(&table, stamp(3, 0)).unwrap();
    let fresh = store.save_at(&table, stamp(4, 0)).unwrap();
    let unrelated = dir.path().join("notes.csv");
    fs::write(&unrelated, "keep me").unwrap();

    set_modified(&stale, now - 8 * DAY);
    set_modified(&just_stale, now - RETENTION - Duration::from_secs(1));
    set_modified(&just_fresh, now - RETENTION + Duration::from_secs(1));
    set_modified(&fresh, now);
    set_modified(&unrelated, now - 30 * DAY);
    reporter.clear();

    let mut removed = store.prune_at(now);
    removed.sort();
    assert_eq!(removed, vec![stale.clone(), just_stale.clone()]);

    assert!(!stale.exists());
    assert!(!just_stale.exists());
    assert!(just_fresh.exists());
    assert!(fresh.exists());
    assert!(unrelated.exists());

    let removals: Vec<PipelineEvent> = reporter
        .events()
        .into_iter()
        .filter(|e| matches!(e, PipelineEvent::SnapshotRemoved { .. }))
        .collect();
    assert_eq!(removals.len(), 2);

    // A second pass has nothing left to do
    assert!(store.prune_at(now).is_empty());
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn test_prune_on_missing_directory_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let (store, reporter) = store_in(&dir.path().join("absent"));

    assert!(store.prune().is_empty());
    assert!(reporter.events().is_empty());
}

#[test]
fn test_save_failure_is_reported_not_raised() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("Data");
    fs::write(&blocker, "a file where the directory should be").unwrap();
    let (store, reporter) = store_in(&blocker);

    assert_eq!(store.save_at(&sample_table(), stamp(5, 0)), None);

    let events = reporter.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], PipelineEvent::SnapshotSaveFailed { .. }));
}

#[test]
fn test_custom_prefix_scopes_the_store() {
    let dir = TempDir::new().unwrap();
    let reporter = Arc::new(MemoryReporter::new());
    let default_store = SnapshotStore::new(dir.path(), reporter.clone());
    let other_store = SnapshotStore::new(dir.path(), reporter).with_prefix("outro_");

    default_store.save_at(&sample_table(), stamp(6, 0)).unwrap();

    assert_eq!(default_store.list().unwrap().len(), 1);
    assert!(other_store.load_latest().unwrap().is_none());
}
