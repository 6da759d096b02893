//! Core data types for taskpad.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of tasks the store (and the file header) accepts.
pub const MAX_TASKS: usize = 100;

/// Maximum encoded description length in bytes.
pub const MAX_DESC_BYTES: usize = 255;

/// The unit of work tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Positive, unique within the store.
    pub id: u32,

    /// What needs doing. Bounded to [`MAX_DESC_BYTES`] encoded bytes.
    pub description: String,

    /// Whether the task has been finished.
    pub completed: bool,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,

    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Clamp a description to [`MAX_DESC_BYTES`] encoded bytes, cutting at a
/// character boundary. Longer input is dropped silently; truncation is the
/// documented policy of the task file, not an error.
pub fn clip_description(input: &str) -> String {
    if input.len() <= MAX_DESC_BYTES {
        return input.to_string();
    }
    let mut end = MAX_DESC_BYTES;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    input[..end].to_string()
}

/// Current time at whole-second resolution, the resolution of the task
/// file's timestamp fields. Keeping memory at the same resolution means a
/// store always round-trips through disk unchanged.
pub fn now_secs() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
