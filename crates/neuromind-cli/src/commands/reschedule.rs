//! Overdue task rescheduling commands for CLI.

use chrono::{Local, Utc};
use clap::Subcommand;
use neuromind_core::{accept_proposals, propose_reschedules, PlannerDb, Proposals};

use super::scheduler_from_config;

#[derive(Subcommand)]
pub enum RescheduleAction {
    /// Propose a new slot for every overdue task
    Propose {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Move overdue tasks to their proposed slots
    Accept {
        /// Only accept proposals for these task IDs
        ids: Vec<String>,
    },
}

pub fn run(action: RescheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    let scheduler = scheduler_from_config()?;
    let tasks = db.list_tasks()?;
    let entries = db.list_timetable_entries()?;
    let now = Local::now();
    let proposals = propose_reschedules(
        &scheduler,
        &tasks,
        &entries,
        now.naive_local(),
        now.with_timezone(&Utc),
    );

    match action {
        RescheduleAction::Propose { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&proposals)?);
            } else if proposals.is_empty() {
                println!("No overdue tasks to reschedule.");
            } else {
                for (id, proposal) in &proposals {
                    let title = tasks
                        .iter()
                        .find(|t| &t.id == id)
                        .map(|t| t.title.as_str())
                        .unwrap_or_default();
                    println!("{} {} {title} {id}", proposal.date, proposal.time_slot);
                }
            }
        }
        RescheduleAction::Accept { ids } => {
            let selected: Proposals = if ids.is_empty() {
                proposals
            } else {
                proposals
                    .into_iter()
                    .filter(|(id, _)| ids.contains(id))
                    .collect()
            };

            let mut moved = 0;
            for mut task in accept_proposals(&tasks, &selected, &Local) {
                task.updated_at = Utc::now();
                if db.update_task(&task)? {
                    moved += 1;
                }
            }
            println!("Rescheduled {moved} task(s)");
        }
    }
    Ok(())
}
