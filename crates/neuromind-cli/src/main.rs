use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "neuromind-cli", version, about = "Neuromind CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Weekly timetable management
    Timetable {
        #[command(subcommand)]
        action: commands::timetable::TimetableAction,
    },
    /// Day planning
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Reschedule overdue tasks
    Reschedule {
        #[command(subcommand)]
        action: commands::reschedule::RescheduleAction,
    },
    /// Record a mood/energy check-in
    Feedback {
        #[command(subcommand)]
        action: commands::feedback::FeedbackAction,
    },
    /// Weekly completions and wellness score
    Insights {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Today's overview
    Dashboard {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Timetable { action } => commands::timetable::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Reschedule { action } => commands::reschedule::run(action),
        Commands::Feedback { action } => commands::feedback::run(action),
        Commands::Insights { json } => commands::insights::run(json),
        Commands::Dashboard { json } => commands::dashboard::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
