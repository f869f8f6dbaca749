use clap::Subcommand;
use jobquest_core::{ApplicationStats, Tracker};

use super::{open, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current rank, points, streak and progress to the next rank
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Application counts per status
    Counts,
    /// The configured rank table
    Ranks,
}

pub fn run(action: StatsAction) -> CmdResult {
    let (config, db) = open()?;
    let tracker = Tracker::new(&db, config.engine());

    match action {
        StatsAction::Summary { json } => {
            let summary = tracker.summary()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Rank:     {}", summary.rank);
                println!("Points:   {}", summary.points);
                println!("Streak:   {} day(s)", summary.streak);
                match &summary.next_rank {
                    Some(next) => println!(
                        "Progress: {}% ({} pts to {next})",
                        summary.progress_percent, summary.points_to_next
                    ),
                    None => println!("Progress: {}% (top rank)", summary.progress_percent),
                }
            }
        }
        StatsAction::Counts => {
            let stats = ApplicationStats::from_applications(&tracker.applications()?);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Ranks => {
            println!("{}", serde_json::to_string_pretty(config.ranks.tiers())?);
        }
    }
    Ok(())
}
