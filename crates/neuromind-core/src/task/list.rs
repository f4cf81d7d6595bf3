//! Task list derivation: filtering and parent/sub-task grouping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::{compare_due_dates, Task};
use crate::error::ValidationError;

/// Which tasks a list view shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// Every incomplete task
    #[default]
    All,
    /// Incomplete tasks that have a due date
    Upcoming,
    /// Completed tasks
    Completed,
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "upcoming" => Ok(TaskFilter::Upcoming),
            "completed" => Ok(TaskFilter::Completed),
            _ => Err(ValidationError::InvalidValue {
                field: "filter".into(),
                message: format!("expected all, upcoming or completed, got '{s}'"),
            }),
        }
    }
}

/// A top-level task with the sub-tasks that passed the same filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchicalTask {
    pub parent: Task,
    pub sub_tasks: Vec<Task>,
}

/// Build the grouped task list.
///
/// In reschedule mode only overdue, incomplete tasks are considered before
/// the filter is applied. Parents are ordered by due date with undated ones
/// last; sub-tasks keep their input order. Sub-tasks whose parent was
/// filtered out are not shown.
pub fn build_task_list(
    tasks: &[Task],
    filter: TaskFilter,
    reschedule_mode: bool,
    now: DateTime<Utc>,
) -> Vec<HierarchicalTask> {
    let filtered: Vec<&Task> = tasks
        .iter()
        .filter(|t| !reschedule_mode || t.is_overdue_at(now))
        .filter(|t| match filter {
            TaskFilter::All => !t.is_completed,
            TaskFilter::Upcoming => !t.is_completed && t.due_date.is_some(),
            TaskFilter::Completed => t.is_completed,
        })
        .collect();

    let mut sub_tasks_by_parent: HashMap<&str, Vec<Task>> = HashMap::new();
    for task in filtered.iter().filter(|t| !t.is_top_level()) {
        if let Some(parent_id) = task.parent_id.as_deref() {
            sub_tasks_by_parent
                .entry(parent_id)
                .or_default()
                .push((*task).clone());
        }
    }

    let mut parents: Vec<&Task> = filtered.into_iter().filter(|t| t.is_top_level()).collect();
    parents.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date));

    parents
        .into_iter()
        .map(|parent| HierarchicalTask {
            sub_tasks: sub_tasks_by_parent.remove(parent.id.as_str()).unwrap_or_default(),
            parent: parent.clone(),
        })
        .collect()
}
