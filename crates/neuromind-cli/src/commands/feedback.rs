//! Mood and energy check-in commands for CLI.

use clap::Subcommand;
use neuromind_core::{FeedbackLog, Mood, PlannerDb};

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// Record a check-in
    Add {
        /// stressed, tired, neutral, good or great
        #[arg(long)]
        mood: Mood,
        /// Energy level, 0-10
        #[arg(long)]
        energy: u32,
        /// Tasks completed today
        #[arg(long, default_value = "0")]
        tasks_completed: u32,
        /// Optional comment
        #[arg(long)]
        comment: Option<String>,
    },
}

pub fn run(action: FeedbackAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        FeedbackAction::Add {
            mood,
            energy,
            tasks_completed,
            comment,
        } => {
            let log = FeedbackLog::new(mood, energy, tasks_completed, comment)?;
            db.insert_feedback(&log)?;
            println!("Feedback recorded: {}", log.id);
        }
    }
    Ok(())
}
