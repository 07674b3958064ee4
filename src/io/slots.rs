//! Reading and writing the two persisted slots (`tasks` and `completed`).
//!
//! Reads are strict: a slot either parses into a fully typed value, is absent,
//! or is reported as malformed together with its raw text. Nothing in between.

use indexmap::IndexSet;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::storage::{KvStore, StorageError};
use crate::model::task::{Task, TaskId};

/// Slot holding the task sequence, newest first
pub const TASKS_SLOT: &str = "tasks";
/// Slot holding the selected (completed) ids
pub const COMPLETED_SLOT: &str = "completed";

/// Outcome of reading one slot
#[derive(Debug)]
pub enum SlotRead<T> {
    Absent,
    Present(T),
    Malformed { raw: String, error: String },
}

impl<T: Default> SlotRead<T> {
    /// The parsed value, or the default for absent and malformed slots
    pub fn unwrap_or_default(self) -> T {
        match self {
            SlotRead::Present(value) => value,
            SlotRead::Absent | SlotRead::Malformed { .. } => T::default(),
        }
    }
}

fn read_slot<T: DeserializeOwned>(storage: &dyn KvStore, slot: &str) -> SlotRead<T> {
    let raw = match storage.get(slot) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SlotRead::Absent,
        Err(e) => {
            tracing::warn!(slot, "could not read slot, using empty default: {}", e);
            return SlotRead::Absent;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => SlotRead::Present(value),
        Err(e) => SlotRead::Malformed {
            raw,
            error: e.to_string(),
        },
    }
}

/// Read the task sequence
pub fn read_tasks(storage: &dyn KvStore) -> SlotRead<Vec<Task>> {
    read_slot(storage, TASKS_SLOT)
}

/// Read the selection set. Duplicate ids collapse; first occurrence wins the position.
pub fn read_completed(storage: &dyn KvStore) -> SlotRead<IndexSet<TaskId>> {
    match read_slot::<Vec<TaskId>>(storage, COMPLETED_SLOT) {
        SlotRead::Present(ids) => SlotRead::Present(ids.into_iter().collect()),
        SlotRead::Absent => SlotRead::Absent,
        SlotRead::Malformed { raw, error } => SlotRead::Malformed { raw, error },
    }
}

fn write_slot<T: Serialize + ?Sized>(
    storage: &dyn KvStore,
    slot: &'static str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)
        .map_err(|e| StorageError::EncodeError { slot, source: e })?;
    match storage.set(slot, &json) {
        Ok(()) => {
            tracing::debug!(slot, bytes = json.len(), "slot written");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(slot, "slot write failed: {}", e);
            if let Some(dir) = storage.location() {
                recovery::log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Write, "slot write failed")
                        .field("Slot", slot)
                        .field("Error", e.to_string())
                        .body(json),
                );
            }
            Err(e)
        }
    }
}

/// Overwrite the `tasks` slot with the full sequence
pub fn write_tasks(storage: &dyn KvStore, tasks: &[Task]) -> Result<(), StorageError> {
    write_slot(storage, TASKS_SLOT, tasks)
}

/// Overwrite the `completed` slot with the selection, in set order
pub fn write_completed(
    storage: &dyn KvStore,
    selected: &IndexSet<TaskId>,
) -> Result<(), StorageError> {
    let ids: Vec<TaskId> = selected.iter().copied().collect();
    write_slot(storage, COMPLETED_SLOT, &ids)
}

/// Record a malformed slot in the recovery log (when the store lives on disk)
/// so its content survives being replaced by the empty default. Content already
/// kept by the newest entry for the same slot is not logged again.
pub fn preserve_malformed(storage: &dyn KvStore, slot: &str, raw: &str, error: &str) {
    tracing::warn!(slot, "stored data is malformed, starting empty: {}", error);
    if let Some(dir) = storage.location() {
        if already_preserved(dir, slot, raw) {
            tracing::debug!(slot, "malformed content already in recovery log");
            return;
        }
        recovery::log_recovery(
            dir,
            RecoveryEntry::new(RecoveryCategory::Parser, "unreadable slot replaced")
                .field("Slot", slot)
                .field("Error", error)
                .body(raw),
        );
    }
}

fn already_preserved(dir: &std::path::Path, slot: &str, raw: &str) -> bool {
    recovery::read_recovery_entries(dir)
        .into_iter()
        .find(|e| {
            e.category == RecoveryCategory::Parser
                && e.fields.iter().any(|(k, v)| k == "Slot" && v == slot)
        })
        .is_some_and(|e| e.body.lines().eq(raw.lines()))
}
