//! Task management commands for CLI.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::Subcommand;
use neuromind_core::{build_task_list, Difficulty, PlannerDb, Priority, Task, TaskFilter};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Due date: RFC 3339, or local "YYYY-MM-DD HH:MM"
        #[arg(long)]
        due: Option<String>,
        /// Duration in minutes (default: 60)
        #[arg(long, default_value = "60")]
        duration: u32,
        /// Priority: low, medium or high (default: low)
        #[arg(long, default_value = "low")]
        priority: Priority,
        /// Difficulty: easy, medium or hard (default: medium)
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// Parent task ID, making this a sub-task
        #[arg(long)]
        parent: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks grouped under their parents
    List {
        /// all, upcoming or completed (default: all)
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// Only overdue, incomplete tasks
        #[arg(long)]
        overdue: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task and its sub-tasks
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TaskAction::Add {
            title,
            description,
            due,
            duration,
            priority,
            difficulty,
            parent,
            json,
        } => {
            if let Some(ref parent_id) = parent {
                let parent_task = db
                    .get_task(parent_id)?
                    .ok_or(format!("Parent task not found: {parent_id}"))?;
                if !parent_task.is_top_level() {
                    return Err(format!("Task {parent_id} is a sub-task and cannot have sub-tasks").into());
                }
            }

            let mut task = Task::new(title.trim())
                .with_priority(priority)
                .with_duration(duration);
            task.description = description.filter(|d| !d.trim().is_empty());
            task.difficulty = difficulty;
            task.parent_id = parent;
            if let Some(due) = due {
                task.due_date = Some(parse_due(&due)?);
            }

            db.insert_task(&task)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task created: {}", task.id);
            }
        }
        TaskAction::List {
            filter,
            overdue,
            json,
        } => {
            let tasks = db.list_tasks()?;
            let list = build_task_list(&tasks, filter, overdue, Utc::now());
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.is_empty() {
                println!("No tasks.");
            } else {
                for group in &list {
                    println!("{}", describe(&group.parent));
                    for sub in &group.sub_tasks {
                        println!("  - {}", describe(sub));
                    }
                }
            }
        }
        TaskAction::Complete { id } => {
            let mut task = db.get_task(&id)?.ok_or(format!("Task not found: {id}"))?;
            task.is_completed = true;
            task.updated_at = Utc::now();
            db.update_task(&task)?;
            println!("Task completed: {id}");
        }
        TaskAction::Delete { id } => {
            let removed = db.delete_task(&id)?;
            if removed == 0 {
                return Err(format!("Task not found: {id}").into());
            }
            println!("Task deleted: {id} ({removed} removed)");
        }
    }
    Ok(())
}

fn describe(task: &Task) -> String {
    let check = if task.is_completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|d| format!(" due {}", d.with_timezone(&Local).format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    format!(
        "[{check}] {} ({}, {}m{due}) {}",
        task.title, task.priority, task.duration_minutes, task.id
    )
}

/// Parse a due date given as RFC 3339 or as local wall time.
fn parse_due(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map_err(|_| format!("invalid due date '{value}': expected RFC 3339 or YYYY-MM-DD HH:MM"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("due date '{value}' does not exist in the local time zone"))
}
