//! Task store: the in-memory task table plus its persistence discipline.

use crate::codec::{self, CodecError};
use crate::types::{MAX_TASKS, Task, clip_description, now_secs};
use crate::vcs::{LogEntry, Vcs};
use eyre::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Expected, recoverable store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The store already holds the maximum number of tasks.
    CapacityExceeded,
    /// No task with the given id.
    NotFound(u32),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::CapacityExceeded => {
                write!(f, "maximum number of tasks reached ({MAX_TASKS})")
            }
            StoreError::NotFound(id) => write!(f, "task with ID {id} not found"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The authoritative, ordered task table.
///
/// Insertion order is storage order is display order. Every mutation
/// rewrites the backing file in full before it is reported as applied;
/// when the write fails the in-memory change is rolled back, so memory
/// never diverges from disk.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    vcs: Option<Box<dyn Vcs>>,
    load_error: Option<CodecError>,
}

impl TaskStore {
    /// Open the store backed by `path`.
    ///
    /// An absent file yields an empty store. A corrupt file also yields an
    /// empty store, with the decode error retained (see [`Self::load_error`])
    /// so the caller can warn the user; startup proceeds either way.
    pub fn open(path: &Path) -> Result<Self> {
        let (tasks, load_error) = match fs::read(path) {
            Ok(bytes) => match codec::decode(&bytes) {
                Ok(tasks) => (tasks, None),
                Err(e) => {
                    warn!("task file {} is corrupt ({e}), starting empty", path.display());
                    (Vec::new(), Some(e))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Vec::new(), None),
            Err(e) => {
                return Err(e).context(format!("Failed to read task file {}", path.display()));
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            tasks,
            vcs: None,
            load_error,
        })
    }

    /// Attach a sidecar to be notified after each successful mutation.
    pub fn with_vcs(mut self, vcs: Box<dyn Vcs>) -> Self {
        self.vcs = Some(vcs);
        self
    }

    /// The decode error swallowed during [`Self::open`], if any.
    pub fn load_error(&self) -> Option<&CodecError> {
        self.load_error.as_ref()
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a new task and persist.
    ///
    /// Ids follow the last element: `last.id + 1`, or 1 for an empty
    /// store. Deleting the tail task therefore frees its id for the next
    /// add; the file format carries no separate counter.
    pub fn add(&mut self, description: &str) -> Result<Task> {
        if self.tasks.len() >= MAX_TASKS {
            return Err(eyre::eyre!(StoreError::CapacityExceeded));
        }

        let now = now_secs();
        let task = Task {
            id: self.tasks.last().map_or(1, |t| t.id + 1),
            description: clip_description(description),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.tasks.push(task.clone());
        if let Err(e) = self.save() {
            self.tasks.pop();
            return Err(e);
        }

        self.notify(&format!("Add task {}: {}", task.id, task.description));
        Ok(task)
    }

    /// Replace a task's description and persist.
    pub fn edit(&mut self, id: u32, description: &str) -> Result<Task> {
        let idx = self.index_of(id)?;
        let previous = self.tasks[idx].clone();

        self.tasks[idx].description = clip_description(description);
        self.tasks[idx].updated_at = now_secs();

        if let Err(e) = self.save() {
            self.tasks[idx] = previous;
            return Err(e);
        }

        self.notify(&format!("Edit task {id}"));
        Ok(self.tasks[idx].clone())
    }

    /// Mark a task completed and persist. Completing an already-completed
    /// task succeeds and still bumps `updated_at`.
    pub fn complete(&mut self, id: u32) -> Result<Task> {
        let idx = self.index_of(id)?;
        let previous = self.tasks[idx].clone();

        self.tasks[idx].completed = true;
        self.tasks[idx].updated_at = now_secs();

        if let Err(e) = self.save() {
            self.tasks[idx] = previous;
            return Err(e);
        }

        self.notify(&format!("Complete task {id}"));
        Ok(self.tasks[idx].clone())
    }

    /// Remove a task, preserving the order of the rest, and persist.
    pub fn delete(&mut self, id: u32) -> Result<()> {
        let idx = self.index_of(id)?;
        let removed = self.tasks.remove(idx);

        if let Err(e) = self.save() {
            self.tasks.insert(idx, removed);
            return Err(e);
        }

        self.notify(&format!("Delete task {id}"));
        Ok(())
    }

    /// Query the sidecar for a task's snapshot history. Without a sidecar
    /// there is no history to report.
    pub fn history(&self, id: u32) -> Result<Vec<LogEntry>> {
        match &self.vcs {
            Some(vcs) => vcs.history(id),
            None => Ok(Vec::new()),
        }
    }

    fn index_of(&self, id: u32) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| eyre::eyre!(StoreError::NotFound(id)))
    }

    /// Rewrite the whole backing file: stage the encoded bytes into a temp
    /// file in the same directory, then rename it over the backing path.
    fn save(&self) -> Result<()> {
        let bytes = codec::encode(&self.tasks);

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)
            .context(format!("Failed to stage write for {}", self.path.display()))?;
        staged.write_all(&bytes).context("Failed to write task records")?;
        staged.as_file().sync_all().context("Failed to sync task records")?;
        staged
            .persist(&self.path)
            .context(format!("Failed to replace {}", self.path.display()))?;

        debug!("persisted {} task(s) to {}", self.tasks.len(), self.path.display());
        Ok(())
    }

    fn notify(&self, message: &str) {
        if let Some(vcs) = &self.vcs
            && let Err(e) = vcs.snapshot(&self.path, message)
        {
            warn!("version control snapshot failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_store() -> (TempDir, TaskStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::open(&temp_dir.path().join("tasks.dat")).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_add_and_get() {
        let (_temp_dir, mut store) = setup_test_store();

        let task = store.add("Test task").unwrap();
        assert_eq!(task.id, 1);
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);

        let retrieved = store.get(task.id).unwrap();
        assert_eq!(retrieved.description, "Test task");
    }

    #[test]
    fn test_ids_follow_last_element() {
        let (_temp_dir, mut store) = setup_test_store();

        assert_eq!(store.add("one").unwrap().id, 1);
        assert_eq!(store.add("two").unwrap().id, 2);
        assert_eq!(store.add("three").unwrap().id, 3);

        // Deleting the tail frees its id for the next add.
        store.delete(3).unwrap();
        assert_eq!(store.add("three again").unwrap().id, 3);

        // Deleting from the middle does not.
        store.delete(2).unwrap();
        assert_eq!(store.add("four").unwrap().id, 4);
    }

    #[test]
    fn test_delete_preserves_order() {
        let (_temp_dir, mut store) = setup_test_store();

        store.add("one").unwrap();
        store.add("two").unwrap();
        store.add("three").unwrap();
        store.delete(2).unwrap();

        let ids: Vec<u32> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_edit_keeps_identity() {
        let (_temp_dir, mut store) = setup_test_store();

        let original = store.add("before").unwrap();
        let edited = store.edit(1, "after").unwrap();

        assert_eq!(edited.id, 1);
        assert_eq!(edited.description, "after");
        assert_eq!(edited.created_at, original.created_at);
        assert!(edited.updated_at >= original.updated_at);
    }

    #[test]
    fn test_description_clipped_on_add() {
        let (_temp_dir, mut store) = setup_test_store();

        let task = store.add(&"x".repeat(400)).unwrap();
        assert_eq!(task.description.len(), crate::types::MAX_DESC_BYTES);
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (_temp_dir, store) = setup_test_store();
        assert!(store.tasks().is_empty());
        assert!(store.load_error().is_none());
    }
}
