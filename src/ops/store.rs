use chrono::{DateTime, Local, TimeZone};
use indexmap::IndexSet;

use crate::io::slots::{self, COMPLETED_SLOT, SlotRead, TASKS_SLOT};
use crate::io::storage::{KvStore, StorageError};
use crate::model::config::StoreConfig;
use crate::model::task::{Task, TaskId};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Please enter a task")]
    EmptyTitle,
    #[error("no task id left above {0}")]
    IdSpaceExhausted(TaskId),
}

/// Behaviour switches for a [`TaskStore`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Remove a deleted task's id from the selection set
    pub prune_selection_on_delete: bool,
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        StoreOptions {
            prune_selection_on_delete: config.prune_selection_on_delete,
        }
    }
}

/// The task list and its selection set, mirrored to storage on every change.
///
/// The selection set is the source of truth for "done": each task's
/// `completed` flag is re-derived from it whenever it changes.
pub struct TaskStore<S: KvStore> {
    storage: S,
    options: StoreOptions,
    tasks: Vec<Task>,
    selected: IndexSet<TaskId>,
    last_write_error: Option<StorageError>,
}

impl<S: KvStore> TaskStore<S> {
    /// Load both slots from `storage`. Absent or malformed slots start empty.
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let tasks = match slots::read_tasks(&storage) {
            SlotRead::Malformed { raw, error } => {
                slots::preserve_malformed(&storage, TASKS_SLOT, &raw, &error);
                Vec::new()
            }
            read => read.unwrap_or_default(),
        };
        let selected = match slots::read_completed(&storage) {
            SlotRead::Malformed { raw, error } => {
                slots::preserve_malformed(&storage, COMPLETED_SLOT, &raw, &error);
                IndexSet::new()
            }
            read => read.unwrap_or_default(),
        };

        tracing::info!(
            tasks = tasks.len(),
            selected = selected.len(),
            "task store opened"
        );

        let mut store = TaskStore {
            storage,
            options,
            tasks,
            selected,
            last_write_error: None,
        };
        store.sync_completed_flags();
        store
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a task stamped with the current local time. See [`Self::add_task_at`].
    pub fn add_task(&mut self, title: &str) -> Result<Task, StoreError> {
        self.add_task_at(title, &Local::now())
    }

    /// Trim `title` and prepend a new task created at `now`.
    /// An empty or all-whitespace title changes nothing.
    pub fn add_task_at<Tz: TimeZone>(
        &mut self,
        title: &str,
        now: &DateTime<Tz>,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let id = self.next_id(now.timestamp_millis())?;
        let task = Task::new(id, title.to_string(), now);
        tracing::debug!(id, "task added");
        self.tasks.insert(0, task.clone());
        self.persist_tasks();
        Ok(task)
    }

    /// Remove the task with `id`. Returns the removed task, or `None` if absent.
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(idx);
        tracing::debug!(id, "task deleted");
        self.persist_tasks();

        if self.options.prune_selection_on_delete && self.selected.shift_remove(&id) {
            self.persist_completed();
        }
        Some(task)
    }

    /// Replace the selection set wholesale. Ids are not checked against the task list.
    pub fn set_selected(&mut self, ids: impl IntoIterator<Item = TaskId>) {
        let next: IndexSet<TaskId> = ids.into_iter().collect();
        if next.iter().eq(self.selected.iter()) {
            return;
        }
        self.selected = next;
        self.persist_completed();
        if self.sync_completed_flags() {
            self.persist_tasks();
        }
    }

    /// Flip one id in or out of the selection set
    pub fn toggle_selected(&mut self, id: TaskId) {
        let mut next = self.selected.clone();
        if !next.shift_remove(&id) {
            next.insert(id);
        }
        self.set_selected(next);
    }

    /// Select every task, or clear the selection when every task is already
    /// selected. Returns whether all tasks are selected afterwards.
    pub fn toggle_all(&mut self) -> bool {
        if self.all_selected() {
            self.set_selected(std::iter::empty());
            false
        } else {
            let ids: Vec<TaskId> = self.tasks.iter().map(|t| t.id).collect();
            self.set_selected(ids);
            !self.tasks.is_empty()
        }
    }

    /// Drop selected ids that name no task. Returns how many were dropped.
    pub fn prune_stale_selection(&mut self) -> usize {
        let before = self.selected.len();
        let kept: Vec<TaskId> = self
            .selected
            .iter()
            .copied()
            .filter(|id| self.tasks.iter().any(|t| t.id == *id))
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.set_selected(kept);
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Tasks, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn selected(&self) -> &IndexSet<TaskId> {
        &self.selected
    }

    pub fn is_selected(&self, id: TaskId) -> bool {
        self.selected.contains(&id)
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks currently selected (stale ids are not counted)
    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| self.selected.contains(&t.id))
            .count()
    }

    /// Whether there is at least one task and every task is selected
    pub fn all_selected(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| self.selected.contains(&t.id))
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// The most recent persistence failure since the last call, if any
    pub fn take_write_error(&mut self) -> Option<StorageError> {
        self.last_write_error.take()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Next id: the clock's milliseconds, bumped past every id already in use
    fn next_id(&self, now_millis: i64) -> Result<TaskId, StoreError> {
        let max_used = self
            .tasks
            .iter()
            .map(|t| t.id)
            .chain(self.selected.iter().copied())
            .max();
        match max_used {
            Some(max) if max >= now_millis => max
                .checked_add(1)
                .ok_or(StoreError::IdSpaceExhausted(max)),
            _ => Ok(now_millis),
        }
    }

    /// Re-derive `completed` flags from the selection. Returns true if any changed.
    fn sync_completed_flags(&mut self) -> bool {
        let mut changed = false;
        for task in &mut self.tasks {
            let done = self.selected.contains(&task.id);
            if task.completed != done {
                task.completed = done;
                changed = true;
            }
        }
        changed
    }

    fn persist_tasks(&mut self) {
        if let Err(e) = slots::write_tasks(&self.storage, &self.tasks) {
            self.last_write_error = Some(e);
        }
    }

    fn persist_completed(&mut self) {
        if let Err(e) = slots::write_completed(&self.storage, &self.selected) {
            self.last_write_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;
    use chrono::Utc;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_790_000_000 + secs, 0).unwrap()
    }

    fn empty_store() -> TaskStore<MemoryStore> {
        TaskStore::open(MemoryStore::new(), StoreOptions::default())
    }

    fn titles(store: &TaskStore<MemoryStore>) -> Vec<&str> {
        store.tasks().iter().map(|t| t.title.as_str()).collect()
    }

    fn reopen(store: TaskStore<MemoryStore>) -> TaskStore<MemoryStore> {
        let options = store.options();
        TaskStore::open(store.into_storage(), options)
    }

    // --- add ---

    #[test]
    fn add_prepends_trimmed_task() {
        let mut store = empty_store();
        store.add_task_at("Buy milk", &at(0)).unwrap();
        store.add_task_at("  Walk dog \t", &at(1)).unwrap();

        assert_eq!(titles(&store), vec!["Walk dog", "Buy milk"]);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn add_grows_by_exactly_one_at_front() {
        let mut store = empty_store();
        for (i, title) in ["a", " b", "c ", "\u{3000}d", "x y z"].iter().enumerate() {
            let before = store.len();
            let task = store.add_task_at(title, &at(i as i64)).unwrap();
            assert_eq!(store.len(), before + 1);
            assert_eq!(store.tasks()[0], task);
        }
    }

    #[test]
    fn add_rejects_blank_titles_without_mutation() {
        let mut store = empty_store();
        store.add_task_at("keep", &at(0)).unwrap();
        let written = store.storage().raw(TASKS_SLOT);

        for blank in ["", " ", "\t\n", "   \u{00A0} "] {
            let result = store.add_task_at(blank, &at(1));
            assert!(matches!(result, Err(StoreError::EmptyTitle)));
        }
        assert_eq!(titles(&store), vec!["keep"]);
        assert_eq!(store.storage().raw(TASKS_SLOT), written);
    }

    #[test]
    fn empty_title_message() {
        assert_eq!(StoreError::EmptyTitle.to_string(), "Please enter a task");
    }

    #[test]
    fn ids_come_from_the_clock() {
        let mut store = empty_store();
        let task = store.add_task_at("one", &at(0)).unwrap();
        assert_eq!(task.id, at(0).timestamp_millis());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        let b = store.add_task_at("b", &at(0)).unwrap();
        let c = store.add_task_at("c", &at(0)).unwrap();
        assert_eq!(b.id, a.id + 1);
        assert_eq!(c.id, b.id + 1);
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let mut store = empty_store();
        store.set_selected([i64::MAX]);
        let err = store.add_task_at("x", &at(0)).unwrap_err();
        assert!(matches!(err, StoreError::IdSpaceExhausted(i64::MAX)));
        assert!(store.is_empty());
    }

    #[test]
    fn stored_max_id_does_not_panic_on_add() {
        let raw = format!(
            r#"[{{"id":{},"title":"last","completed":false,"createdAt":"1:2:3 - 4/5/2026"}}]"#,
            i64::MAX
        );
        let storage = MemoryStore::with_values([(TASKS_SLOT, raw.as_str())]);
        let mut store = TaskStore::open(storage, StoreOptions::default());
        assert!(store.add_task("y").is_err());
        assert_eq!(titles(&store), vec!["last"]);
        assert_eq!(store.storage().raw(TASKS_SLOT), Some(raw));
    }

    #[test]
    fn ids_increase_when_clock_goes_backwards() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(100)).unwrap();
        let b = store.add_task_at("b", &at(5)).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn new_id_never_reuses_a_stale_selected_id() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        store.toggle_selected(a.id);
        store.delete_task(a.id);
        let b = store.add_task_at("b", &at(0)).unwrap();
        assert_ne!(b.id, a.id);
        assert!(!store.is_selected(b.id));
    }

    #[test]
    fn created_at_is_fixed_at_creation() {
        let mut store = empty_store();
        let when = Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap();
        let task = store.add_task_at("stamp", &when).unwrap();
        assert_eq!(task.created_at, "4:5:6 - 3/2/2026");

        let store = reopen(store);
        assert_eq!(store.tasks()[0].created_at, "4:5:6 - 3/2/2026");
    }

    // --- delete ---

    #[test]
    fn delete_present_id_removes_exactly_one() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        let b = store.add_task_at("b", &at(1)).unwrap();
        let c = store.add_task_at("c", &at(2)).unwrap();

        let removed = store.delete_task(b.id).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(store.len(), 2);
        assert!(store.find(b.id).is_none());
        assert_eq!(
            store.tasks().iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![c.id, a.id]
        );
    }

    #[test]
    fn delete_absent_id_is_noop() {
        let mut store = empty_store();
        store.add_task_at("a", &at(0)).unwrap();
        let before = store.tasks().to_vec();
        let written = store.storage().raw(TASKS_SLOT);

        assert!(store.delete_task(12345).is_none());
        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(store.storage().raw(TASKS_SLOT), written);
    }

    #[test]
    fn delete_keeps_stale_selection_by_default() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        store.toggle_selected(a.id);
        store.delete_task(a.id);

        assert!(store.is_selected(a.id));
        assert_eq!(store.completed_count(), 0);
        assert_eq!(store.storage().raw(COMPLETED_SLOT).unwrap(), format!("[{}]", a.id));
    }

    #[test]
    fn delete_prunes_selection_when_enabled() {
        let options = StoreOptions {
            prune_selection_on_delete: true,
        };
        let mut store = TaskStore::open(MemoryStore::new(), options);
        let a = store.add_task_at("a", &at(0)).unwrap();
        let b = store.add_task_at("b", &at(1)).unwrap();
        store.set_selected([a.id, b.id]);
        store.delete_task(a.id);

        assert!(!store.is_selected(a.id));
        assert!(store.is_selected(b.id));
        assert_eq!(store.storage().raw(COMPLETED_SLOT).unwrap(), format!("[{}]", b.id));
    }

    // --- selection ---

    #[test]
    fn set_selected_replaces_wholesale_without_validation() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        store.set_selected([a.id, 999]);
        assert!(store.is_selected(a.id));
        assert!(store.is_selected(999));

        store.set_selected([7]);
        assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn selection_drives_completed_flag() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        let b = store.add_task_at("b", &at(1)).unwrap();

        store.toggle_selected(a.id);
        assert!(store.find(a.id).unwrap().completed);
        assert!(!store.find(b.id).unwrap().completed);

        store.toggle_selected(a.id);
        assert!(!store.find(a.id).unwrap().completed);
        assert!(store.selected().is_empty());
    }

    #[test]
    fn completed_flag_is_persisted_with_selection() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        store.toggle_selected(a.id);

        let raw = store.storage().raw(TASKS_SLOT).unwrap();
        assert!(raw.contains(r#""completed":true"#));
    }

    #[test]
    fn identical_selection_does_not_rewrite() {
        let storage = MemoryStore::new();
        let mut store = TaskStore::open(storage, StoreOptions::default());
        store.set_selected(std::iter::empty());
        assert_eq!(store.storage().raw(COMPLETED_SLOT), None);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut store = empty_store();
        assert!(!store.toggle_all());

        let a = store.add_task_at("a", &at(0)).unwrap();
        let b = store.add_task_at("b", &at(1)).unwrap();
        store.toggle_selected(a.id);

        assert!(store.toggle_all());
        assert!(store.is_selected(a.id) && store.is_selected(b.id));
        assert!(store.all_selected());

        assert!(!store.toggle_all());
        assert!(store.selected().is_empty());
    }

    #[test]
    fn prune_stale_selection_counts_removed() {
        let mut store = empty_store();
        let a = store.add_task_at("a", &at(0)).unwrap();
        store.set_selected([a.id, 1, 2]);
        assert_eq!(store.prune_stale_selection(), 2);
        assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), vec![a.id]);
        assert_eq!(store.prune_stale_selection(), 0);
    }

    // --- persistence ---

    #[test]
    fn scenario_buy_milk_walk_dog_reload() {
        let mut store = empty_store();
        let milk = store.add_task_at("Buy milk", &at(0)).unwrap();
        assert_eq!(titles(&store), vec!["Buy milk"]);
        store.add_task_at("Walk dog", &at(1)).unwrap();
        assert_eq!(titles(&store), vec!["Walk dog", "Buy milk"]);

        store.toggle_selected(milk.id);
        assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), vec![milk.id]);

        let store = reopen(store);
        assert_eq!(titles(&store), vec!["Walk dog", "Buy milk"]);
        assert_eq!(store.selected().iter().copied().collect::<Vec<_>>(), vec![milk.id]);
        assert!(store.find(milk.id).unwrap().completed);
    }

    #[test]
    fn reload_reproduces_sequence() {
        let mut store = empty_store();
        for i in 0..5 {
            store.add_task_at(&format!("task {}", i), &at(i)).unwrap();
        }
        let before = store.tasks().to_vec();
        let store = reopen(store);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn malformed_slots_open_empty() {
        let storage = MemoryStore::with_values([
            (TASKS_SLOT, "{\"not\": \"a list\"}"),
            (COMPLETED_SLOT, "[1, 2"),
        ]);
        let store = TaskStore::open(storage, StoreOptions::default());
        assert!(store.is_empty());
        assert!(store.selected().is_empty());
    }

    #[test]
    fn one_malformed_slot_does_not_discard_the_other() {
        let storage = MemoryStore::with_values([
            (
                TASKS_SLOT,
                r#"[{"id":5,"title":"kept","completed":false,"createdAt":"1:1:1 - 1/1/2026"}]"#,
            ),
            (COMPLETED_SLOT, "garbage"),
        ]);
        let store = TaskStore::open(storage, StoreOptions::default());
        assert_eq!(titles(&store), vec!["kept"]);
        assert!(store.selected().is_empty());
    }

    #[test]
    fn open_rederives_stale_completed_flags() {
        let storage = MemoryStore::with_values([
            (
                TASKS_SLOT,
                r#"[{"id":5,"title":"a","completed":true,"createdAt":"x"},{"id":4,"title":"b","completed":false,"createdAt":"y"}]"#,
            ),
            (COMPLETED_SLOT, "[4]"),
        ]);
        let store = TaskStore::open(storage, StoreOptions::default());
        assert!(!store.find(5).unwrap().completed);
        assert!(store.find(4).unwrap().completed);
    }

    #[test]
    fn write_failure_keeps_state_and_is_reported() {
        let mut store = TaskStore::open(MemoryStore::read_only(), StoreOptions::default());
        store.add_task_at("still here", &at(0)).unwrap();

        assert_eq!(titles(&store), vec!["still here"]);
        assert!(store.take_write_error().is_some());
        assert!(store.take_write_error().is_none());
    }
}
