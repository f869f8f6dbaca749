//! Points, ranks, streaks and milestones.
//!
//! Everything under this module is pure: no I/O, no clock reads, no shared
//! state. [`GamificationEngine`] bundles the configurable rank table and
//! point policy; the free functions are exported for callers that only need
//! one piece.

mod engine;
mod milestone;
mod points;
mod queue;
mod rank;
mod state;
mod streak;
mod summary;

pub use engine::{GamificationEngine, Transition};
pub use milestone::{
    detect_milestones, Milestone, MilestoneHistory, MilestoneKind, MilestoneTier,
    PointsHeuristic, FIVE_DAY_STREAK, TEN_APPLICATIONS,
};
pub use points::{Action, PointsContext, PointsPolicy};
pub use queue::{ActiveMilestone, MilestoneQueue, DEFAULT_DISPLAY_SECS};
pub use rank::{NextRank, RankTable, RankTier};
pub use state::GamificationState;
pub use streak::{streak_delta, StreakDelta};
pub use summary::{format_summary, RankSummary};
