//! Dashboard summary, recomputed from snapshots whenever the store changes.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::feedback::FeedbackLog;
use crate::scheduler::{plan_entries, PlanEntry, Scheduler};
use crate::task::{Priority, Task};
use crate::timetable::TimetableEntry;

const MAX_UPCOMING_EVENTS: usize = 2;
const MAX_PRIORITY_TASKS: usize = 3;
const BURNOUT_LOOKBACK: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub greeting: String,
    pub pending_count: usize,
    pub completed_count: usize,
    pub upcoming_events: Vec<TimetableEntry>,
    pub priority_tasks: Vec<Task>,
    pub todays_plan: Vec<PlanEntry>,
    pub show_burnout_warning: bool,
}

/// Build the dashboard.
///
/// `feedback` must be newest first. `now_local` selects today's weekday and
/// the upcoming events; `now_utc` decides which tasks are overdue.
pub fn build_dashboard(
    scheduler: &Scheduler,
    tasks: &[Task],
    entries: &[TimetableEntry],
    feedback: &[FeedbackLog],
    now_local: NaiveDateTime,
    now_utc: DateTime<Utc>,
) -> DashboardSummary {
    let pending: Vec<Task> = tasks.iter().filter(|t| !t.is_completed).cloned().collect();
    let completed_count = tasks.len() - pending.len();
    let today = now_local.date().weekday();
    let time_now = now_local.time();

    let mut upcoming_events: Vec<TimetableEntry> = entries
        .iter()
        .filter(|e| e.day_of_week == today && e.end_time > time_now)
        .cloned()
        .collect();
    upcoming_events.sort_by_key(|e| e.start_time);
    upcoming_events.truncate(MAX_UPCOMING_EVENTS);

    let overdue = pending.iter().filter(|t| t.is_overdue_at(now_utc));
    let high_priority = pending
        .iter()
        .filter(|t| t.priority == Priority::High && !t.is_overdue_at(now_utc));
    let mut seen = HashSet::new();
    let priority_tasks: Vec<Task> = overdue
        .chain(high_priority)
        .filter(|t| seen.insert(t.id.clone()))
        .take(MAX_PRIORITY_TASKS)
        .cloned()
        .collect();

    let free_slots = scheduler.free_slots(today, entries);
    let plan = scheduler.schedule_tasks(&pending, &free_slots);

    DashboardSummary {
        greeting: greeting_for_hour(now_local.hour()).to_string(),
        pending_count: pending.len(),
        completed_count,
        upcoming_events,
        priority_tasks,
        todays_plan: plan_entries(&plan),
        show_burnout_warning: burnout_warning(feedback),
    }
}

/// Warn when each of the last two check-ins was stressed or tired.
pub fn burnout_warning(feedback: &[FeedbackLog]) -> bool {
    feedback.len() >= BURNOUT_LOOKBACK
        && feedback[..BURNOUT_LOOKBACK].iter().all(|f| f.mood.is_strained())
}

pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        _ => "Good Evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Mood;
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday_at(h: u32, m: u32) -> (NaiveDateTime, DateTime<Utc>) {
        let local = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_time(t(h, m));
        (local, Utc.from_utc_datetime(&local))
    }

    fn log(mood: Mood) -> FeedbackLog {
        FeedbackLog::new(mood, 5, 0, None).unwrap()
    }

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting_for_hour(0), "Good Morning");
        assert_eq!(greeting_for_hour(11), "Good Morning");
        assert_eq!(greeting_for_hour(12), "Good Afternoon");
        assert_eq!(greeting_for_hour(16), "Good Afternoon");
        assert_eq!(greeting_for_hour(17), "Good Evening");
    }

    #[test]
    fn burnout_needs_two_strained_logs() {
        assert!(!burnout_warning(&[log(Mood::Stressed)]));
        assert!(burnout_warning(&[log(Mood::Stressed), log(Mood::Tired), log(Mood::Great)]));
        assert!(!burnout_warning(&[log(Mood::Stressed), log(Mood::Good)]));
    }

    #[test]
    fn summary_counts_events_and_priorities() {
        let scheduler = Scheduler::new();
        let (now_local, now_utc) = monday_at(10, 30);

        let entries = vec![
            TimetableEntry::new("Early", Weekday::Mon, t(8, 0), t(9, 0), None, None).unwrap(),
            TimetableEntry::new("Now", Weekday::Mon, t(10, 0), t(11, 0), None, None).unwrap(),
            TimetableEntry::new("Later", Weekday::Mon, t(14, 0), t(15, 0), None, None).unwrap(),
            TimetableEntry::new("Evening", Weekday::Mon, t(18, 0), t(19, 0), None, None).unwrap(),
            TimetableEntry::new("Tuesday", Weekday::Tue, t(12, 0), t(13, 0), None, None).unwrap(),
        ];

        let overdue_high = Task::new("overdue high")
            .with_priority(Priority::High)
            .with_due_date(now_utc - Duration::hours(2));
        let overdue_low = Task::new("overdue low").with_due_date(now_utc - Duration::hours(1));
        let high_a = Task::new("high a").with_priority(Priority::High);
        let high_b = Task::new("high b").with_priority(Priority::High);
        let mut done = Task::new("done");
        done.is_completed = true;

        let tasks = vec![overdue_high, overdue_low, high_a, high_b, done];
        let summary = build_dashboard(
            &scheduler,
            &tasks,
            &entries,
            &[log(Mood::Tired), log(Mood::Stressed)],
            now_local,
            now_utc,
        );

        assert_eq!(summary.greeting, "Good Morning");
        assert_eq!(summary.pending_count, 4);
        assert_eq!(summary.completed_count, 1);

        let events: Vec<_> = summary.upcoming_events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(events, vec!["Now", "Later"]);

        let priorities: Vec<_> = summary.priority_tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(priorities, vec!["overdue high", "overdue low", "high a"]);

        assert_eq!(summary.todays_plan.len(), 4);
        assert!(summary.show_burnout_warning);
    }

    #[test]
    fn plan_avoids_todays_classes() {
        let scheduler = Scheduler::new();
        let (now_local, now_utc) = monday_at(7, 0);
        let entries =
            vec![TimetableEntry::new("Lab", Weekday::Mon, t(8, 0), t(12, 0), None, None).unwrap()];
        let tasks = vec![Task::new("Write up").with_duration(90)];

        let summary = build_dashboard(&scheduler, &tasks, &entries, &[], now_local, now_utc);
        assert_eq!(summary.todays_plan.len(), 1);
        assert_eq!(summary.todays_plan[0].slot.start, t(12, 0));
        assert!(!summary.show_burnout_warning);
    }
}
