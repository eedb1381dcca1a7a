//! Task management commands for CLI.

use std::path::Path;
use std::rc::Rc;

use clap::Subcommand;
use pomofocus_core::{SystemClock, TaskRegistry};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Estimated pomodoros
        #[arg(
            long,
            short,
            default_value = "1",
            value_parser = clap::value_parser!(u32).range(1..=10)
        )]
        estimate: u32,
    },
    /// List tasks
    List,
    /// Toggle a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(db: Option<&Path>, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(db)?;
    let mut registry = TaskRegistry::load(store, Rc::new(SystemClock));

    match action {
        TaskAction::Add { title, estimate } => {
            let task = registry
                .add(&title, estimate)
                .ok_or("task title must not be empty")?;
            println!("{}", serde_json::to_string_pretty(task)?);
        }
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(registry.tasks())?);
        }
        TaskAction::Toggle { id } => {
            if !registry.toggle_complete(&id) {
                return Err(format!("Task not found: {id}").into());
            }
            let task = registry.get(&id).ok_or(format!("Task not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(task)?);
        }
        TaskAction::Delete { id } => {
            if !registry.remove(&id) {
                return Err(format!("Task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
