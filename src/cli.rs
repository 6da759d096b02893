//! CLI argument parsing for taskpad.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tp",
    about = "Task tracker with a git-backed binary task file",
    version,
    after_help = "Run without a subcommand to enter the interactive prompt."
)]
pub struct Cli {
    /// Path to the task file
    #[arg(short = 'f', long, global = true, default_value = "tasks.dat")]
    pub file: PathBuf,

    /// Disable the git snapshot sidecar
    #[arg(long, global = true)]
    pub no_vcs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task description
        description: String,
    },

    /// Edit a task's description
    Edit {
        /// Task ID
        id: u32,

        /// New description
        description: String,
    },

    /// Mark a task as completed
    Complete {
        /// Task ID
        id: u32,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u32,
    },

    /// Show all tasks
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show version history for a task
    History {
        /// Task ID
        id: u32,

        /// Emit JSON instead of plain lines
        #[arg(long)]
        json: bool,
    },
}
