//! Weekly timetable commands for CLI.

use clap::Subcommand;
use neuromind_core::timetable::{entries_by_day, parse_hhmm, parse_weekday};
use neuromind_core::{PlannerDb, TimetableEntry};

#[derive(Subcommand)]
pub enum TimetableAction {
    /// Add a recurring weekly entry
    Add {
        /// Entry title
        title: String,
        /// Day of week (e.g. "mon", "Tuesday")
        #[arg(long)]
        day: String,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
        /// Venue
        #[arg(long)]
        venue: Option<String>,
        /// Free-form details
        #[arg(long)]
        details: Option<String>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// List entries grouped by day
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
}

pub fn run(action: TimetableAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TimetableAction::Add {
            title,
            day,
            start,
            end,
            venue,
            details,
            json,
        } => {
            let entry = TimetableEntry::new(
                title,
                parse_weekday(&day)?,
                parse_hhmm(&start)?,
                parse_hhmm(&end)?,
                venue,
                details,
            )?;
            db.insert_timetable_entry(&entry)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("Timetable entry created: {}", entry.id);
            }
        }
        TimetableAction::List { json } => {
            let entries = db.list_timetable_entries()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("No timetable entries.");
            }
            for day_entries in entries_by_day(&entries).values() {
                if let Some(first) = day_entries.first() {
                    println!("{}", first.day_of_week);
                }
                for e in day_entries {
                    let venue = e.venue.as_deref().map(|v| format!(" @ {v}")).unwrap_or_default();
                    println!(
                        "  {}-{} {}{venue} {}",
                        e.start_time.format("%H:%M"),
                        e.end_time.format("%H:%M"),
                        e.title,
                        e.id
                    );
                }
            }
        }
        TimetableAction::Delete { id } => {
            if !db.delete_timetable_entry(&id)? {
                return Err(format!("Timetable entry not found: {id}").into());
            }
            println!("Timetable entry deleted: {id}");
        }
    }
    Ok(())
}
