//! Binary codec for the task file.
//!
//! The file is a 4-byte record count followed by fixed-width records,
//! all little-endian regardless of host platform:
//!
//! ```text
//! u32        task_count   (0 ..= MAX_TASKS)
//! per record (279 bytes):
//!   u32        id
//!   [u8; 255]  description  (NUL-padded, up to 255 content bytes)
//!   u32        completed    (0 or 1)
//!   i64        created_at   (seconds since Unix epoch)
//!   i64        updated_at   (seconds since Unix epoch)
//! ```
//!
//! Encoding and decoding are pure transformations; decoding either yields
//! the complete task list or a [`CodecError`] with nothing applied.

use crate::types::{MAX_DESC_BYTES, MAX_TASKS, Task, clip_description};
use chrono::{DateTime, Utc};

/// Bytes per encoded task record.
pub const RECORD_SIZE: usize = 4 + MAX_DESC_BYTES + 4 + 8 + 8;

/// Decode failures for the task file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Header missing, or the declared count is out of bounds.
    CorruptHeader,
    /// The stream ends before the declared records do.
    TruncatedRecord,
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::CorruptHeader => write!(f, "task file header is corrupt"),
            CodecError::TruncatedRecord => write!(f, "task file ends mid-record"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Serialize a task list into the fixed binary layout.
///
/// Descriptions longer than the field are clipped; everything else is
/// written verbatim. The output always decodes back to an equal list.
pub fn encode(tasks: &[Task]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + tasks.len() * RECORD_SIZE);
    buf.extend_from_slice(&(tasks.len() as u32).to_le_bytes());

    for task in tasks {
        buf.extend_from_slice(&task.id.to_le_bytes());

        let desc = clip_description(&task.description);
        let mut field = [0u8; MAX_DESC_BYTES];
        field[..desc.len()].copy_from_slice(desc.as_bytes());
        buf.extend_from_slice(&field);

        buf.extend_from_slice(&u32::from(task.completed).to_le_bytes());
        buf.extend_from_slice(&task.created_at.timestamp().to_le_bytes());
        buf.extend_from_slice(&task.updated_at.timestamp().to_le_bytes());
    }

    buf
}

/// Parse a task file back into the ordered task list.
///
/// Fails with [`CodecError::CorruptHeader`] when the count field is missing
/// or exceeds [`MAX_TASKS`], and [`CodecError::TruncatedRecord`] when the
/// stream is shorter than the count declares. Bytes past the declared
/// records are ignored.
pub fn decode(bytes: &[u8]) -> Result<Vec<Task>, CodecError> {
    if bytes.len() < 4 {
        return Err(CodecError::CorruptHeader);
    }
    let count = read_u32(bytes, 0) as usize;
    if count > MAX_TASKS {
        return Err(CodecError::CorruptHeader);
    }
    if bytes.len() < 4 + count * RECORD_SIZE {
        return Err(CodecError::TruncatedRecord);
    }

    let mut tasks = Vec::with_capacity(count);
    for i in 0..count {
        let at = 4 + i * RECORD_SIZE;
        tasks.push(decode_record(&bytes[at..at + RECORD_SIZE]));
    }
    Ok(tasks)
}

fn decode_record(record: &[u8]) -> Task {
    let id = read_u32(record, 0);

    let field = &record[4..4 + MAX_DESC_BYTES];
    let end = field.iter().position(|&b| b == 0).unwrap_or(MAX_DESC_BYTES);
    let description = String::from_utf8_lossy(&field[..end]).into_owned();

    let completed = read_u32(record, 4 + MAX_DESC_BYTES) != 0;
    let created_at = read_timestamp(record, 8 + MAX_DESC_BYTES);
    let updated_at = read_timestamp(record, 16 + MAX_DESC_BYTES);

    Task {
        id,
        description,
        completed,
        created_at,
        updated_at,
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

fn read_timestamp(bytes: &[u8], at: usize) -> DateTime<Utc> {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    let secs = i64::from_le_bytes(raw);
    // Seconds outside chrono's representable range only appear in damaged
    // files; the record itself is still structurally sound.
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::now_secs;

    fn make_task(id: u32, description: &str) -> Task {
        let now = now_secs();
        Task {
            id,
            description: description.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_record_size() {
        assert_eq!(RECORD_SIZE, 279);
    }

    #[test]
    fn test_empty_list_is_header_only() {
        let bytes = encode(&[]);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert_eq!(decode(&bytes).unwrap(), vec![]);
    }

    #[test]
    fn test_roundtrip() {
        let tasks = vec![make_task(1, "buy milk"), make_task(2, "walk the dog")];
        let decoded = decode(&encode(&tasks)).unwrap();
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_header_too_short() {
        assert_eq!(decode(&[1, 0]), Err(CodecError::CorruptHeader));
    }

    #[test]
    fn test_count_out_of_bounds() {
        let bytes = ((MAX_TASKS + 1) as u32).to_le_bytes();
        assert_eq!(decode(&bytes), Err(CodecError::CorruptHeader));
    }

    #[test]
    fn test_description_padding_stripped() {
        let bytes = encode(&[make_task(1, "short")]);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded[0].description, "short");
    }
}
