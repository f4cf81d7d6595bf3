//! Rescheduling of overdue tasks.
//!
//! Proposals come from the scheduler's forward search. Accepting them moves
//! each task's due date to the end of its proposed slot; the updated copies
//! are returned for the caller to persist.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::scheduler::{ProposedSlot, Scheduler};
use crate::task::list::{build_task_list, TaskFilter};
use crate::task::Task;
use crate::timetable::TimetableEntry;

/// Proposals keyed by task id.
pub type Proposals = BTreeMap<String, ProposedSlot>;

/// Find a new slot for every overdue, incomplete top-level task.
///
/// `now_local` drives the search floor, `now_utc` the overdue check; both
/// should describe the same instant. Tasks with no slot in the horizon are
/// absent from the result.
pub fn propose_reschedules(
    scheduler: &Scheduler,
    tasks: &[Task],
    entries: &[TimetableEntry],
    now_local: NaiveDateTime,
    now_utc: DateTime<Utc>,
) -> Proposals {
    build_task_list(tasks, TaskFilter::All, true, now_utc)
        .into_iter()
        .filter_map(|h| {
            scheduler
                .find_next_available_slot_at(&h.parent, entries, now_local)
                .map(|slot| (h.parent.id, slot))
        })
        .collect()
}

/// Apply accepted proposals.
///
/// Each proposed task gets its due date set to the proposal's date at the
/// slot's end (as wall time in `tz`) and is marked incomplete. Proposals for
/// unknown task ids are ignored.
pub fn accept_proposals<Tz: TimeZone>(tasks: &[Task], proposals: &Proposals, tz: &Tz) -> Vec<Task> {
    let mut updated = Vec::new();

    for (task_id, proposal) in proposals {
        let Some(task) = tasks.iter().find(|t| &t.id == task_id) else {
            tracing::warn!(%task_id, "proposal for unknown task ignored");
            continue;
        };

        let local_due = proposal.date.and_time(proposal.time_slot.end);
        let Some(due) = tz.from_local_datetime(&local_due).earliest() else {
            tracing::warn!(%task_id, %local_due, "proposed due date does not exist in time zone");
            continue;
        };

        let mut task = task.clone();
        task.due_date = Some(due.with_timezone(&Utc));
        task.is_completed = false;
        updated.push(task);
    }

    updated
}
