//! taskpad CLI - a task tracker with a git-backed binary task file.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use taskpad::{GitVcs, LogEntry, Task, TaskStore};

mod cli;
mod repl;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskpad")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskpad.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn format_status(completed: bool) -> ColoredString {
    if completed {
        format!("{:<10}", "completed").blue()
    } else {
        format!("{:<10}", "pending").yellow()
    }
}

/// Render the task table the way `list` always has: id, description,
/// status, last modified.
pub(crate) fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", "No tasks available".dimmed());
        return;
    }

    println!("\n{:<4} {:<50} {:<10} {:<20}", "ID", "Description", "Status", "Last Modified");
    println!("{}", "-".repeat(86));
    for task in tasks {
        println!(
            "{:<4} {:<50} {} {:<20}",
            task.id,
            task.description,
            format_status(task.completed),
            task.updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"),
        );
    }
    println!();
}

pub(crate) fn print_history(id: u32, entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("{}", format!("No history for task {id}").dimmed());
        return;
    }

    println!("History for task {id}:");
    for entry in entries {
        println!("  {} {} {}", entry.hash.yellow(), entry.date.dimmed(), entry.subject);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut store = TaskStore::open(&cli.file).context("Failed to open task store")?;

    if let Some(e) = store.load_error() {
        eprintln!(
            "{} task file {} is corrupt ({e}); starting with an empty list",
            "Warning:".yellow().bold(),
            cli.file.display()
        );
    }

    if !cli.no_vcs {
        let workdir = match cli.file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        match GitVcs::init(workdir) {
            Ok(vcs) => store = store.with_vcs(Box::new(vcs)),
            // The store works fine without its sidecar; history just
            // won't accumulate.
            Err(e) => warn!("git sidecar unavailable: {e}"),
        }
    }

    match cli.command {
        None => {
            println!("taskpad {}", env!("CARGO_PKG_VERSION"));
            repl::run(&mut store)?;
        }

        Some(Command::Add { description }) => {
            let task = store.add(&description)?;
            println!("{} Task added with ID: {}", "✓".green(), task.id.to_string().cyan());
        }

        Some(Command::Edit { id, description }) => {
            store.edit(id, &description)?;
            println!("{} Task {id} updated.", "✓".green());
        }

        Some(Command::Complete { id }) => {
            store.complete(id)?;
            println!("{} Task {id} marked as completed.", "✓".green());
        }

        Some(Command::Delete { id }) => {
            store.delete(id)?;
            println!("{} Task {id} deleted.", "✓".green());
        }

        Some(Command::List { json }) => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.tasks())?);
            } else {
                print_tasks(store.tasks());
            }
        }

        Some(Command::History { id, json }) => {
            let entries = store.history(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_history(id, &entries);
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }

    Ok(())
}
