//! Version-control sidecar for the task file.
//!
//! The store notifies a [`Vcs`] collaborator after each successful
//! mutation; the git implementation snapshots the task file as a commit
//! and answers history queries from the commit log. Store operations never
//! depend on the sidecar succeeding.

use eyre::{Context, Result, eyre};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One historical snapshot referencing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Abbreviated commit hash.
    pub hash: String,
    /// Commit date, `YYYY-MM-DD`.
    pub date: String,
    /// Commit subject line.
    pub subject: String,
}

/// A collaborator that snapshots the task file after each mutation and
/// answers per-task history queries.
pub trait Vcs {
    /// Record the current contents of `file` under `message`.
    fn snapshot(&self, file: &Path, message: &str) -> Result<()>;

    /// Snapshots whose messages reference the given task id, newest first.
    fn history(&self, id: u32) -> Result<Vec<LogEntry>>;
}

/// Git-backed sidecar, shelling out to the `git` binary.
pub struct GitVcs {
    workdir: PathBuf,
}

impl GitVcs {
    /// Create a sidecar rooted at `workdir`, initializing a repository
    /// there (with a first commit) if none exists yet.
    pub fn init(workdir: &Path) -> Result<Self> {
        let vcs = Self {
            workdir: workdir.to_path_buf(),
        };

        if !vcs.workdir.join(".git").exists() {
            info!("initializing git repository in {}", vcs.workdir.display());
            vcs.git(&["init"])?;
            fs::write(vcs.workdir.join(".gitignore"), "*.log\n").context("Failed to write .gitignore")?;
            vcs.git(&["add", "."])?;
            vcs.git(&["commit", "-m", "Initial commit"])?;
        }

        Ok(vcs)
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .context("Failed to run git")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(eyre!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                detail.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Vcs for GitVcs {
    fn snapshot(&self, file: &Path, message: &str) -> Result<()> {
        self.git(&["add", &file.to_string_lossy()])?;
        match self.git(&["commit", "-m", message]) {
            Ok(_) => {
                debug!("snapshot: {message}");
                Ok(())
            }
            // A mutation that leaves the file byte-identical (e.g. an edit
            // to the same text) stages nothing; that is not a failure.
            Err(e) if e.to_string().contains("nothing to commit") => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn history(&self, id: u32) -> Result<Vec<LogEntry>> {
        let grep = format!("task {id}");
        let out = self.git(&[
            "log",
            "--pretty=format:%h%x09%ad%x09%s",
            "--date=short",
            "--grep",
            &grep,
        ])?;
        Ok(parse_log(&out))
    }
}

/// Parse `git log` output in `%h\t%ad\t%s` form.
fn parse_log(out: &str) -> Vec<LogEntry> {
    out.lines()
        .filter_map(|line| {
            let mut cols = line.splitn(3, '\t');
            Some(LogEntry {
                hash: cols.next()?.to_string(),
                date: cols.next()?.to_string(),
                subject: cols.next()?.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log() {
        let out = "abc1234\t2026-08-07\tComplete task 3\ndef5678\t2026-08-01\tAdd task 3: buy milk\n";
        let entries = parse_log(out);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].hash, "abc1234");
        assert_eq!(entries[0].date, "2026-08-07");
        assert_eq!(entries[0].subject, "Complete task 3");
        assert_eq!(entries[1].subject, "Add task 3: buy milk");
    }

    #[test]
    fn test_parse_log_empty() {
        assert!(parse_log("").is_empty());
    }

    #[test]
    fn test_parse_log_skips_malformed_lines() {
        let out = "abc1234\t2026-08-07\tDelete task 9\nnot-a-log-line\n";
        let entries = parse_log(out);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, "Delete task 9");
    }
}
