//! Weekly completion counts and a wellness score from recent check-ins.

use chrono::{Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::feedback::{FeedbackLog, Mood, MAX_ENERGY_LEVEL};
use crate::task::Task;

/// Number of most recent check-ins the wellness score looks at.
pub const WELLNESS_WINDOW: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    /// Monday first
    pub week_start: NaiveDate,
    pub weekly_completions: [u32; 7],
    pub wellness_score: f32,
}

/// Completed tasks per day of the week containing `today`, Monday first.
///
/// A task counts on the local date (in `tz`) of its last update.
pub fn weekly_completions<Tz: TimeZone>(tasks: &[Task], today: NaiveDate, tz: &Tz) -> [u32; 7] {
    let week_start = start_of_week(today);
    let mut counts = [0u32; 7];

    for task in tasks.iter().filter(|t| t.is_completed) {
        let day = task.updated_at.with_timezone(tz).date_naive();
        let offset = (day - week_start).num_days();
        if (0..7).contains(&offset) {
            counts[offset as usize] += 1;
        }
    }

    counts
}

/// Share of the best possible mood + energy over the most recent check-ins.
///
/// `feedback` must be newest first. Returns 0 when there are no check-ins.
pub fn wellness_score(feedback: &[FeedbackLog]) -> f32 {
    let recent = &feedback[..feedback.len().min(WELLNESS_WINDOW)];
    if recent.is_empty() {
        return 0.0;
    }

    let total: u32 = recent.iter().map(|f| f.mood.score() + f.energy_level).sum();
    let max = recent.len() as u32 * (Mood::Great.score() + MAX_ENERGY_LEVEL);
    (total as f32 / max as f32).clamp(0.0, 1.0)
}

pub fn build_insights<Tz: TimeZone>(
    tasks: &[Task],
    feedback: &[FeedbackLog],
    today: NaiveDate,
    tz: &Tz,
) -> Insights {
    Insights {
        week_start: start_of_week(today),
        weekly_completions: weekly_completions(tasks, today, tz),
        wellness_score: wellness_score(feedback),
    }
}

fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};

    fn completed_on(date: NaiveDate) -> Task {
        let mut task = Task::new("done");
        task.is_completed = true;
        task.updated_at = Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
        task
    }

    fn log(mood: Mood, energy: u32) -> FeedbackLog {
        FeedbackLog::new(mood, energy, 0, None).unwrap()
    }

    #[test]
    fn counts_by_weekday() {
        // Wednesday 2024-01-03; week runs 2024-01-01..=2024-01-07.
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let tasks = vec![
            completed_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            completed_on(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            completed_on(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            completed_on(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()),
            Task::new("pending"),
        ];

        let counts = weekly_completions(&tasks, today, &Utc);
        assert_eq!(counts, [1, 0, 2, 0, 0, 0, 0]);
    }

    #[test]
    fn wellness_is_zero_without_feedback() {
        assert_eq!(wellness_score(&[]), 0.0);
    }

    #[test]
    fn wellness_uses_seven_most_recent() {
        let mut logs = vec![log(Mood::Great, 10); 7];
        logs.push(log(Mood::Stressed, 0));
        assert!((wellness_score(&logs) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn wellness_mixed() {
        let logs = vec![log(Mood::Neutral, 5), log(Mood::Tired, 4)];
        // (3 + 5 + 2 + 4) / (2 * 15)
        let expected = 14.0 / 30.0;
        assert!((wellness_score(&logs) - expected).abs() < 1e-6);
    }

    #[test]
    fn insights_week_starts_monday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let insights = build_insights(&[], &[], sunday, &Utc);
        assert_eq!(insights.week_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
