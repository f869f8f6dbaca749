//! # jobquest Core Library
//!
//! This library provides the core logic for jobquest, a job-application
//! tracker that rewards steady progress with points, ranks, streaks and
//! milestones. All operations are exposed through the `jobquest` CLI, which
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Gamification Engine**: pure state transitions. The caller passes the
//!   current date in; nothing reads a clock or touches storage
//! - **Storage**: SQLite-based application and state storage, TOML-based
//!   configuration
//! - **Tracker**: runs a change, the engine step and the state write in one
//!   transaction and returns the milestones that fired
//!
//! ## Key Components
//!
//! - [`GamificationEngine`]: points, ranks, streaks, milestones
//! - [`MilestoneQueue`]: one-at-a-time milestone display with auto-dismiss
//! - [`Database`]: application and state persistence
//! - [`Config`]: point policy, rank table and display settings
//! - [`Tracker`]: CRUD plus scoring

pub mod application;
pub mod error;
pub mod gamification;
pub mod storage;
pub mod tracker;

pub use application::{
    ApplicationPatch, ApplicationRecord, ApplicationStats, ApplicationStatus, NewApplication,
    StatusFilter,
};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use gamification::{
    Action, GamificationEngine, GamificationState, Milestone, MilestoneKind, MilestoneQueue,
    MilestoneTier, PointsPolicy, RankSummary, RankTable, RankTier, Transition,
};
pub use storage::{Config, Database};
pub use tracker::{Outcome, Tracker};
