//! Interactive command loop.
//!
//! Line grammar: `add <text>`, `edit <id> <text>`, `complete <id>`,
//! `delete <id>`, `list`, `history <id>`, `help`, `exit`. Descriptions may
//! be wrapped in double quotes.

use crate::{print_history, print_tasks};
use colored::*;
use eyre::Result;
use std::io::{self, BufRead, Write};
use taskpad::TaskStore;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Add(String),
    Edit(u32, String),
    Complete(u32),
    Delete(u32),
    List,
    History(u32),
    Help,
    Exit,
}

/// Parse a single input line into a command, or a usage hint.
pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word {
        "add" => {
            let description = unquote(rest);
            if description.is_empty() {
                return Err("usage: add \"task description\"".to_string());
            }
            Ok(ReplCommand::Add(description.to_string()))
        }
        "edit" => {
            let (id_str, rest) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: edit ID \"new description\"")?;
            let description = unquote(rest.trim());
            if description.is_empty() {
                return Err("usage: edit ID \"new description\"".to_string());
            }
            Ok(ReplCommand::Edit(parse_id(id_str)?, description.to_string()))
        }
        "complete" => Ok(ReplCommand::Complete(parse_id(rest)?)),
        "delete" => Ok(ReplCommand::Delete(parse_id(rest)?)),
        "history" => Ok(ReplCommand::History(parse_id(rest)?)),
        "list" => Ok(ReplCommand::List),
        "help" => Ok(ReplCommand::Help),
        "exit" | "quit" => Ok(ReplCommand::Exit),
        _ => Err("Unknown command. Type 'help' for available commands.".to_string()),
    }
}

fn parse_id(s: &str) -> Result<u32, String> {
    let s = s.trim();
    s.parse::<u32>().map_err(|_| format!("'{s}' is not a task ID"))
}

/// Strip one pair of surrounding double quotes, if present.
fn unquote(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

pub fn print_help() {
    println!("\nCommands:");
    println!("  add \"task description\"       - Add a new task");
    println!("  edit ID \"new description\"    - Edit a task's description");
    println!("  complete ID                  - Mark a task as completed");
    println!("  delete ID                    - Delete a task");
    println!("  list                         - Show all tasks");
    println!("  history ID                   - Show version history of a task");
    println!("  help                         - Show this help message");
    println!("  exit                         - Exit the program\n");
}

/// Run the interactive prompt until `exit` or EOF on stdin.
pub fn run(store: &mut TaskStore) -> Result<()> {
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(command) => match dispatch(store, command) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => eprintln!("{} {e}", "Error:".red().bold()),
            },
            Err(usage) => eprintln!("{usage}"),
        }
    }

    Ok(())
}

/// Execute one command. Returns `false` when the loop should stop.
fn dispatch(store: &mut TaskStore, command: ReplCommand) -> Result<bool> {
    match command {
        ReplCommand::Add(description) => {
            let task = store.add(&description)?;
            println!("{} Task added with ID: {}", "✓".green(), task.id.to_string().cyan());
        }
        ReplCommand::Edit(id, description) => {
            store.edit(id, &description)?;
            println!("{} Task {id} updated.", "✓".green());
        }
        ReplCommand::Complete(id) => {
            store.complete(id)?;
            println!("{} Task {id} marked as completed.", "✓".green());
        }
        ReplCommand::Delete(id) => {
            store.delete(id)?;
            println!("{} Task {id} deleted.", "✓".green());
        }
        ReplCommand::List => print_tasks(store.tasks()),
        ReplCommand::History(id) => {
            let entries = store.history(id)?;
            print_history(id, &entries);
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Exit => return Ok(false),
    }
    Ok(true)
}
