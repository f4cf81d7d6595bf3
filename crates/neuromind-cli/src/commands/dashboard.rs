//! Dashboard command for CLI.

use chrono::{Local, Utc};
use neuromind_core::{build_dashboard, PlannerDb};

use super::scheduler_from_config;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let scheduler = scheduler_from_config()?;
    let now = Local::now();
    let summary = build_dashboard(
        &scheduler,
        &db.list_tasks()?,
        &db.list_timetable_entries()?,
        &db.list_feedback()?,
        now.naive_local(),
        now.with_timezone(&Utc),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", summary.greeting);
    println!(
        "{} pending, {} completed",
        summary.pending_count, summary.completed_count
    );
    if summary.show_burnout_warning {
        println!("You've been running low lately. Consider a lighter day.");
    }

    if !summary.upcoming_events.is_empty() {
        println!("Up next:");
        for e in &summary.upcoming_events {
            println!(
                "  {}-{} {}",
                e.start_time.format("%H:%M"),
                e.end_time.format("%H:%M"),
                e.title
            );
        }
    }
    if !summary.priority_tasks.is_empty() {
        println!("Priority:");
        for t in &summary.priority_tasks {
            println!("  {} ({})", t.title, t.priority);
        }
    }
    if !summary.todays_plan.is_empty() {
        println!("Today's plan:");
        for row in &summary.todays_plan {
            println!("  {} {}", row.slot, row.task.title);
        }
    }
    Ok(())
}
