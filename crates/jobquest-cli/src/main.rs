use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "jobquest", version, about = "Job application tracker with points, ranks and streaks")]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Application records
    App {
        #[command(subcommand)]
        action: commands::app::AppAction,
    },
    /// Rank, points and application statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Daily streak check-in
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays parseable. Filter from JOBQUEST_LOG,
/// then RUST_LOG, defaulting to warnings only.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("JOBQUEST_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let result = match cli.command {
        Commands::App { action } => commands::app::run(action, today),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Streak { action } => commands::streak::run(action, today),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
