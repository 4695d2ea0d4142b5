use chrono::NaiveDate;

use crate::models::{Buckets, Task, TaskId};
use crate::period;
use crate::storage::{LoadedTasks, Storage, StorageError};

/// The bucket mapping plus its write-through persistence.
///
/// Every mutation rewrites the whole task file before returning. When the
/// write fails the in-memory mutation is kept and the error propagates: only
/// durability was lost, and the caller decides what to tell the user.
#[derive(Debug)]
pub struct TaskStore {
    storage: Storage,
    buckets: Buckets,
    next_id: TaskId,
}

impl TaskStore {
    /// Loads persisted tasks, upgrading two historical layouts on the way in:
    /// a bare-array root becomes `today`'s daily bucket, and records without
    /// ids get fresh ones. Either upgrade rewrites the file immediately.
    pub fn load(storage: Storage, today: NaiveDate) -> Result<Self, StorageError> {
        let mut needs_rewrite = false;
        let buckets = match storage.load_tasks()? {
            None => Buckets::new(),
            Some(LoadedTasks::Buckets(buckets)) => buckets,
            Some(LoadedTasks::Legacy(tasks)) => {
                // Freeze the flat file before it is overwritten for good.
                storage.preserve_legacy_copy()?;
                let key = period::day_key(today);
                log::info!(
                    "upgrading legacy task file: {} record(s) moved under {key}",
                    tasks.len()
                );
                needs_rewrite = true;
                Buckets::from([(key, tasks)])
            }
        };

        let mut store = Self {
            storage,
            buckets,
            next_id: 1,
        };
        if store.repair_ids() > 0 {
            needs_rewrite = true;
        }
        if needs_rewrite {
            store.save()?;
        }
        Ok(store)
    }

    /// Rewrites the whole mapping to disk. Every mutation calls this; it is
    /// public so a shell can force a flush, e.g. on exit.
    pub fn save(&self) -> Result<(), StorageError> {
        self.storage.save_tasks(&self.buckets)
    }

    /// Read-only view of the whole mapping. Does not materialize anything.
    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// The task list under `key`, inserting an empty one if the key is new.
    /// The mapping grows on read; the file catches up on the next mutation.
    pub fn bucket(&mut self, key: &str) -> &[Task] {
        self.buckets.entry(key.to_string()).or_default()
    }

    /// Appends a pending task with the trimmed `name` to the bucket for `key`
    /// and persists. A name that trims to nothing is rejected without
    /// touching memory or disk; the caller gets `None` back.
    pub fn add_task(&mut self, key: &str, name: &str) -> Result<Option<Task>, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let task = Task {
            id: self.next_id,
            name: name.to_string(),
            done: false,
        };
        self.next_id = self.next_id.saturating_add(1);
        self.buckets
            .entry(key.to_string())
            .or_default()
            .push(task.clone());
        self.save()?;
        Ok(Some(task))
    }

    /// Marks the task `id` in the bucket for `key` as done and persists.
    /// Marking an already-done task persists again without changing state.
    /// An unknown key or id is a silent no-op: `Ok(false)`, nothing written.
    pub fn mark_done(&mut self, key: &str, id: TaskId) -> Result<bool, StorageError> {
        let task = self
            .buckets
            .get_mut(key)
            .and_then(|bucket| bucket.iter_mut().find(|task| task.id == id));
        let Some(task) = task else {
            return Ok(false);
        };
        task.done = true;
        self.save()?;
        Ok(true)
    }

    /// Removes the task `id` from the bucket for `key` and persists. The
    /// bucket stays in the mapping even when this empties it. An unknown key
    /// or id is a silent no-op: `Ok(false)`, nothing written.
    pub fn delete_task(&mut self, key: &str, id: TaskId) -> Result<bool, StorageError> {
        let Some(bucket) = self.buckets.get_mut(key) else {
            return Ok(false);
        };
        let before = bucket.len();
        bucket.retain(|task| task.id != id);
        if bucket.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Seeds the id counter past everything persisted and hands fresh ids to
    /// records that need one: zero marks a record from before ids existed,
    /// and a duplicate means the file was edited by hand. Returns how many
    /// ids were assigned.
    fn repair_ids(&mut self) -> usize {
        let max_id = self
            .buckets
            .values()
            .flatten()
            .map(|task| task.id)
            .max()
            .unwrap_or(0);
        // A ceiling id in a hand-edited file must not wrap the counter back
        // to the zero sentinel.
        self.next_id = max_id.saturating_add(1);

        let mut seen = std::collections::HashSet::<TaskId>::new();
        let mut assigned = 0;
        for task in self.buckets.values_mut().flatten() {
            if task.id == 0 || !seen.insert(task.id) {
                task.id = self.next_id;
                self.next_id = self.next_id.saturating_add(1);
                assigned += 1;
            }
        }
        if assigned > 0 {
            log::info!("assigned fresh ids to {assigned} task record(s)");
        }
        assigned
    }
}
