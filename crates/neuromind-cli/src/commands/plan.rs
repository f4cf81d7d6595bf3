//! Day planning commands for CLI.

use chrono::{Datelike, Local, Weekday};
use clap::Subcommand;
use neuromind_core::scheduler::plan_entries;
use neuromind_core::timetable::parse_weekday;
use neuromind_core::PlannerDb;

use super::scheduler_from_config;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Pack pending tasks into today's free time
    Today {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show free slots for a day
    Free {
        /// Day of week (default: today)
        #[arg(long)]
        day: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let scheduler = scheduler_from_config()?;
    let entries = db.list_timetable_entries()?;

    match action {
        PlanAction::Today { json } => {
            let today = Local::now().weekday();
            let free = scheduler.free_slots(today, &entries);
            let plan = scheduler.schedule_tasks(&db.list_tasks()?, &free);
            let rows = plan_entries(&plan);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("Nothing scheduled for {today}.");
            } else {
                for row in &rows {
                    println!("{} {} ({})", row.slot, row.task.title, row.task.priority);
                }
            }
        }
        PlanAction::Free { day, json } => {
            let day: Weekday = match day {
                Some(d) => parse_weekday(&d)?,
                None => Local::now().weekday(),
            };
            let free = scheduler.free_slots(day, &entries);
            if json {
                println!("{}", serde_json::to_string_pretty(&free)?);
            } else if free.is_empty() {
                println!("No free time on {day}.");
            } else {
                for slot in &free {
                    println!("{slot} ({}m)", slot.duration_minutes());
                }
            }
        }
    }
    Ok(())
}
