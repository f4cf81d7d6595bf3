//! Forward search for the next day with room for a task.

use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime, Timelike};

use super::{ProposedSlot, Scheduler, MAX_HORIZON_DAYS};
use crate::task::Task;
use crate::timetable::TimetableEntry;

impl Scheduler {
    /// Find the first slot, from now on, long enough for `task`.
    ///
    /// Reads the local wall clock once; see
    /// [`Scheduler::find_next_available_slot_at`].
    pub fn find_next_available_slot(
        &self,
        task: &Task,
        entries: &[TimetableEntry],
    ) -> Option<ProposedSlot> {
        let now = Local::now().naive_local();
        self.find_next_available_slot_at(task, entries, now)
    }

    /// Scan `horizon_days` days starting at `now`'s date.
    ///
    /// On the first day the part of the window before `now` (rounded up to
    /// the minute) counts as busy. The first day with a free slot of at
    /// least the task's duration wins; the proposal is the leading part of
    /// that slot.
    pub fn find_next_available_slot_at(
        &self,
        task: &Task,
        entries: &[TimetableEntry],
        now: NaiveDateTime,
    ) -> Option<ProposedSlot> {
        if task.duration_minutes == 0 {
            return None;
        }

        let today = now.date();
        let elapsed_until = ceil_to_minute(now.time());
        let horizon = self.config.horizon_days.min(MAX_HORIZON_DAYS);

        for offset in 0..horizon {
            let date = today.checked_add_signed(Duration::days(i64::from(offset)))?;
            let day = date.weekday();

            let slots = if offset == 0 && elapsed_until > self.config.day_start {
                let mut day_entries: Vec<TimetableEntry> = entries
                    .iter()
                    .filter(|e| e.day_of_week == day)
                    .cloned()
                    .collect();
                day_entries.push(TimetableEntry::busy(day, self.config.day_start, elapsed_until));
                self.free_slots(day, &day_entries)
            } else {
                self.free_slots(day, entries)
            };

            tracing::trace!(%date, free = slots.len(), "scanning day");

            if let Some(slot) = slots.iter().find(|s| s.can_fit(task.duration_minutes)) {
                let proposal = ProposedSlot {
                    date,
                    time_slot: slot.carve(task.duration_minutes),
                };
                tracing::debug!(
                    task_id = %task.id,
                    %date,
                    slot = %proposal.time_slot,
                    "found next available slot"
                );
                return Some(proposal);
            }
        }

        tracing::debug!(task_id = %task.id, horizon, "no slot within horizon");
        None
    }
}

/// Round up to a whole minute. Times in the last minute of the day saturate.
fn ceil_to_minute(time: NaiveTime) -> NaiveTime {
    let floor = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
    if floor == time {
        return time;
    }
    let (next, wrapped) = floor.overflowing_add_signed(Duration::minutes(1));
    if wrapped != 0 {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(floor)
    } else {
        next
    }
}
