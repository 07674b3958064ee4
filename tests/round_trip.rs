use jot::io::slots::{self, SlotRead};
use jot::io::storage::{DirStore, KvStore, MemoryStore};
use jot::ops::store::{StoreOptions, TaskStore};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

/// Copy both fixture slots into a fresh data directory
fn seeded_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), fixture("tasks.json")).unwrap();
    fs::write(tmp.path().join("completed.json"), fixture("completed.json")).unwrap();
    tmp
}

// ============================================================================
// Slot round-trip tests
// ============================================================================

#[test]
fn round_trip_tasks_slot() {
    let source = fixture("tasks.json");
    let storage = MemoryStore::with_values([("tasks", source.as_str())]);

    let tasks = match slots::read_tasks(&storage) {
        SlotRead::Present(tasks) => tasks,
        other => panic!("expected tasks, got {:?}", other),
    };
    let tmp = TempDir::new().unwrap();
    let out = DirStore::open(tmp.path()).unwrap();
    slots::write_tasks(&out, &tasks).unwrap();

    assert_eq!(fs::read_to_string(out.slot_path("tasks")).unwrap(), source);
}

#[test]
fn round_trip_completed_slot() {
    let source = fixture("completed.json");
    let storage = MemoryStore::with_values([("completed", source.as_str())]);

    let selected = slots::read_completed(&storage).unwrap_or_default();
    let tmp = TempDir::new().unwrap();
    let out = DirStore::open(tmp.path()).unwrap();
    slots::write_completed(&out, &selected).unwrap();

    assert_eq!(out.get("completed").unwrap().unwrap(), source);
}

// ============================================================================
// Store round-trip tests
// ============================================================================

#[test]
fn store_loads_fixture() {
    let tmp = seeded_dir();
    let store = TaskStore::open(DirStore::open(tmp.path()).unwrap(), StoreOptions::default());

    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Walk dog", "Buy milk"]);
    assert!(store.is_selected(1760000000001));
    assert!(store.tasks()[1].completed);
    assert_eq!(store.completed_count(), 1);
}

#[test]
fn toggle_twice_restores_files() {
    let tmp = seeded_dir();
    let mut store = TaskStore::open(DirStore::open(tmp.path()).unwrap(), StoreOptions::default());

    store.toggle_selected(1760000000002);
    store.toggle_selected(1760000000002);
    assert!(store.take_write_error().is_none());

    let tasks = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    let completed = fs::read_to_string(tmp.path().join("completed.json")).unwrap();
    assert_eq!(tasks, fixture("tasks.json"));
    assert_eq!(completed, fixture("completed.json"));
}

#[test]
fn reopen_sees_mutations() {
    let tmp = seeded_dir();
    {
        let mut store =
            TaskStore::open(DirStore::open(tmp.path()).unwrap(), StoreOptions::default());
        store.add_task("Water plants").unwrap();
        store.delete_task(1760000000002);
        store.toggle_all();
    }

    let store = TaskStore::open(DirStore::open(tmp.path()).unwrap(), StoreOptions::default());
    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Water plants", "Buy milk"]);
    assert!(store.all_selected());
    assert!(store.tasks().iter().all(|t| t.completed));
}

#[test]
fn inconsistent_flags_are_rederived_on_open() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), fixture("tasks.json")).unwrap();
    fs::write(tmp.path().join("completed.json"), "[1760000000002]").unwrap();

    let storage = DirStore::open(tmp.path()).unwrap();
    let store = TaskStore::open(storage, StoreOptions::default());
    assert!(store.tasks()[0].completed);
    assert!(!store.tasks()[1].completed);
}
