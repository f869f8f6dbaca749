use serde::{Deserialize, Serialize};

use super::rank::RankTable;
use super::state::GamificationState;

/// Rank card data for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSummary {
    pub rank: String,
    pub points: u32,
    pub streak: u32,
    /// Rounded progress toward the next rank, 0–100.
    pub progress_percent: u8,
    pub next_rank: Option<String>,
    pub points_to_next: u32,
}

pub fn format_summary(ranks: &RankTable, state: &GamificationState) -> RankSummary {
    let next = ranks.next_rank(state.points);
    // progress is clamped to [0, 100] so the cast cannot truncate
    let rounded = ranks.progress_percent(state.points).round() as u8;
    // 100 is reserved for the top rank; 99.5% of the way there still shows 99
    let progress_percent = if next.name.is_some() { rounded.min(99) } else { 100 };
    RankSummary {
        rank: state.rank.clone(),
        points: state.points,
        streak: state.streak_days,
        progress_percent,
        next_rank: next.name,
        points_to_next: next.points_needed,
    }
}
