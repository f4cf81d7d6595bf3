//! Greedy first-fit packing of tasks into one day's free slots.

use super::{DailyPlan, Scheduler, TimeSlot};
use crate::task::{compare_for_scheduling, Task};

impl Scheduler {
    /// Assign pending tasks to sub-intervals of `free_slots`.
    ///
    /// Only incomplete top-level tasks are considered, taken in
    /// [`compare_for_scheduling`] order. Each task goes at the start of the
    /// earliest slot long enough to hold it; any remainder of that slot goes
    /// back into the pool. Tasks that fit nowhere are left out of the plan.
    pub fn schedule_tasks(&self, tasks: &[Task], free_slots: &[TimeSlot]) -> DailyPlan {
        let mut pending: Vec<&Task> = tasks
            .iter()
            .filter(|t| !t.is_completed && t.is_top_level())
            .collect();
        pending.sort_by(|a, b| compare_for_scheduling(a, b));

        let mut pool: Vec<TimeSlot> = free_slots.to_vec();
        pool.sort_by_key(|s| s.start);

        let mut plan = DailyPlan::new();

        for task in pending {
            if task.duration_minutes == 0 {
                tracing::debug!(task_id = %task.id, "skipping zero-length task");
                continue;
            }

            let Some(index) = pool.iter().position(|s| s.can_fit(task.duration_minutes)) else {
                tracing::debug!(
                    task_id = %task.id,
                    duration = task.duration_minutes,
                    "no free slot large enough"
                );
                continue;
            };

            let slot = pool.remove(index);
            let placed = slot.carve(task.duration_minutes);

            if placed.end < slot.end {
                let rest = TimeSlot::new(placed.end, slot.end);
                let at = pool.partition_point(|s| s.start <= rest.start);
                pool.insert(at, rest);
            }

            tracing::debug!(task_id = %task.id, slot = %placed, "placed task");
            plan.insert(placed, task.clone());
        }

        plan
    }
}
