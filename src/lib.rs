//! Taskpad: a task tracker persisting to a fixed-layout binary file.
//!
//! The task file holds a 4-byte record count followed by fixed-width task
//! records; every mutation rewrites the file in full, and an optional git
//! sidecar snapshots the file after each change.
//!
//! # Example
//!
//! ```no_run
//! use taskpad::TaskStore;
//! use std::path::Path;
//!
//! // Open the store (an absent file means an empty store)
//! let mut store = TaskStore::open(Path::new("tasks.dat")).unwrap();
//!
//! // Track some work
//! let task = store.add("Buy milk").unwrap();
//! store.complete(task.id).unwrap();
//!
//! // The table keeps insertion order
//! assert_eq!(store.tasks().len(), 1);
//! assert!(store.tasks()[0].completed);
//! ```

mod store;
mod types;

pub mod codec;
pub mod vcs;

// Re-export public API
pub use codec::{CodecError, RECORD_SIZE};
pub use store::{StoreError, TaskStore};
pub use types::{MAX_DESC_BYTES, MAX_TASKS, Task, clip_description, now_secs};
pub use vcs::{GitVcs, LogEntry, Vcs};
