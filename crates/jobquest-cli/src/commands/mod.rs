pub mod app;
pub mod config;
pub mod stats;
pub mod streak;

use chrono::Utc;
use tracing::debug;

use jobquest_core::{Config, Database, Milestone, MilestoneQueue, MilestoneTier, Outcome};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Load config and open the configured user's database.
pub fn open() -> Result<(Config, Database), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open(&config.user_id)?;
    debug!(user_id = %config.user_id, "store ready");
    Ok((config, db))
}

fn badge(tier: MilestoneTier) -> &'static str {
    match tier {
        MilestoneTier::Standard => "*",
        MilestoneTier::Achievement => "**",
        MilestoneTier::RankUp => "^^",
    }
}

/// Print milestones in queue order.
///
/// Each one is dismissed as soon as it is printed, so the queue only orders
/// the output here; the configured display time does not apply.
pub fn print_milestones(config: &Config, milestones: &[Milestone]) {
    let now = Utc::now();
    let mut queue = MilestoneQueue::new(config.milestone_display());
    queue.enqueue(milestones.iter().cloned(), now);
    while let Some(m) = queue.active() {
        println!("{} {}  {}", badge(m.tier), m.title, m.message);
        queue.dismiss(now);
    }
}

/// Print an outcome either as JSON or as a short status line plus milestones.
pub fn report(config: &Config, outcome: &Outcome, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    println!(
        "{} | {} pts | streak {}",
        outcome.state.rank, outcome.state.points, outcome.state.streak_days
    );
    print_milestones(config, &outcome.milestones);
    Ok(())
}
