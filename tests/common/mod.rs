//! Shared test infrastructure for taskpad integration tests.
//!
//! Provides TestEnv for consistent setup/teardown and a recording fake
//! sidecar so no test needs a git installation.

#![allow(dead_code)]

use eyre::{Result, eyre};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use taskpad::{LogEntry, Task, TaskStore, Vcs};
use tempfile::TempDir;

/// Snapshot calls observed by a [`RecordingVcs`].
pub type SnapshotLog = Rc<RefCell<Vec<(PathBuf, String)>>>;

/// Fake sidecar that records snapshot calls and serves canned history.
pub struct RecordingVcs {
    pub snapshots: SnapshotLog,
    pub entries: Vec<LogEntry>,
    pub fail: bool,
}

impl Vcs for RecordingVcs {
    fn snapshot(&self, file: &Path, message: &str) -> Result<()> {
        self.snapshots
            .borrow_mut()
            .push((file.to_path_buf(), message.to_string()));
        if self.fail {
            return Err(eyre!("snapshot rejected"));
        }
        Ok(())
    }

    fn history(&self, id: u32) -> Result<Vec<LogEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.subject.contains(&format!("task {id}")))
            .cloned()
            .collect())
    }
}

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: TaskStore,
    pub snapshots: SnapshotLog,
}

impl TestEnv {
    /// A store on a fresh temp file, wired to a recording sidecar.
    pub fn new() -> Self {
        Self::with_failing_vcs(false)
    }

    /// Same, but the sidecar rejects every snapshot.
    pub fn with_failing_vcs(fail: bool) -> Self {
        Self::build(fail, Vec::new())
    }

    /// A store whose sidecar serves the given canned history.
    pub fn with_history(entries: Vec<LogEntry>) -> Self {
        Self::build(false, entries)
    }

    fn build(fail: bool, entries: Vec<LogEntry>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let snapshots: SnapshotLog = Rc::new(RefCell::new(Vec::new()));
        let vcs = RecordingVcs {
            snapshots: Rc::clone(&snapshots),
            entries,
            fail,
        };
        let store = TaskStore::open(&temp_dir.path().join("tasks.dat"))
            .expect("Failed to open store")
            .with_vcs(Box::new(vcs));
        Self {
            temp_dir,
            store,
            snapshots,
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.temp_dir.path().join("tasks.dat")
    }

    /// Add a task, panicking on failure.
    pub fn add(&mut self, description: &str) -> Task {
        self.store.add(description).expect("Failed to add task")
    }

    /// Ids currently in the store, in order.
    pub fn ids(&self) -> Vec<u32> {
        self.store.tasks().iter().map(|t| t.id).collect()
    }

    /// Reload the store from disk, dropping the sidecar.
    pub fn reopen(&mut self) {
        self.store = TaskStore::open(&self.file_path()).expect("Failed to reopen store");
    }

    /// Message of the most recent snapshot call.
    pub fn last_snapshot(&self) -> Option<String> {
        self.snapshots.borrow().last().map(|(_, m)| m.clone())
    }

    /// Number of snapshot calls so far.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.borrow().len()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
