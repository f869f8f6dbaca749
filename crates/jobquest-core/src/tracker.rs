//! Application tracker service.
//!
//! Glues the store to the gamification engine. Each mutating call runs in a
//! single transaction: the application change, the engine step and the new
//! state are committed together or not at all, and milestones are only
//! handed back once the state is saved.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::{ApplicationPatch, ApplicationRecord, NewApplication};
use crate::error::{CoreError, Result, ValidationError};
use crate::gamification::{
    Action, GamificationEngine, GamificationState, Milestone, RankSummary, Transition,
};
use crate::storage::{Database, Store};

/// What a mutating call wrote and what it earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Records created or updated by the call.
    pub applications: Vec<ApplicationRecord>,
    pub state: GamificationState,
    /// In display order.
    pub milestones: Vec<Milestone>,
}

impl Outcome {
    fn scored(applications: Vec<ApplicationRecord>, transition: Transition) -> Self {
        Self {
            applications,
            state: transition.state,
            milestones: transition.milestones,
        }
    }
}

pub struct Tracker<'db> {
    db: &'db Database,
    engine: GamificationEngine,
}

impl<'db> Tracker<'db> {
    pub fn new(db: &'db Database, engine: GamificationEngine) -> Self {
        Self { db, engine }
    }

    pub fn engine(&self) -> &GamificationEngine {
        &self.engine
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// All applications, newest first.
    pub fn applications(&self) -> Result<Vec<ApplicationRecord>> {
        self.db.store().list_applications()
    }

    /// # Errors
    /// Returns [`CoreError::NotFound`] if the id is unknown.
    pub fn application(&self, id: &str) -> Result<ApplicationRecord> {
        self.db
            .store()
            .get_application(id)?
            .ok_or_else(|| not_found(id))
    }

    /// The user's state, creating it (with retroactive points) on first use.
    pub fn load_or_seed_state(&self) -> Result<GamificationState> {
        self.db.with_transaction(|tx| self.state_in(tx))
    }

    pub fn summary(&self) -> Result<RankSummary> {
        let state = self.load_or_seed_state()?;
        Ok(self.engine.summary(&state))
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn create_application(&self, new: NewApplication, today: NaiveDate) -> Result<Outcome> {
        let record = new.into_record(today, Utc::now())?;
        let outcome = self.db.with_transaction(|tx| {
            let old = self.state_in(tx)?;
            tx.insert_application(&record)?;
            let transition = self.step(tx, &old, &Action::CreateApplication, today)?;
            Ok(Outcome::scored(vec![record.clone()], transition))
        })?;
        info!(id = %record.id, company = %record.company, "application created");
        Ok(outcome)
    }

    /// Apply `patch`. Only a status change is scored; other edits leave
    /// the gamification state alone.
    pub fn update_application(
        &self,
        id: &str,
        patch: &ApplicationPatch,
        today: NaiveDate,
    ) -> Result<Outcome> {
        let outcome = self.db.with_transaction(|tx| {
            let before = tx.get_application(id)?.ok_or_else(|| not_found(id))?;
            let after = patch.apply_to(&before)?;
            let old = self.state_in(tx)?;
            tx.update_application(&after)?;

            if before.status == after.status {
                return Ok(Outcome {
                    applications: vec![after],
                    state: old,
                    milestones: Vec::new(),
                });
            }

            let action = Action::UpdateStatus {
                old_status: before.status,
                new_status: after.status,
            };
            let transition = self.step(tx, &old, &action, today)?;
            Ok(Outcome::scored(vec![after], transition))
        })?;
        info!(id, "application updated");
        Ok(outcome)
    }

    /// Deleting is never scored and never takes points away.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if the id is unknown.
    pub fn delete_application(&self, id: &str) -> Result<()> {
        if !self.db.store().delete_application(id)? {
            return Err(not_found(id));
        }
        info!(id, "application deleted");
        Ok(())
    }

    /// Insert many applications at once. Worth no points, but counts as
    /// activity for the streak. Any invalid row rejects the whole batch.
    pub fn import_applications(
        &self,
        rows: Vec<NewApplication>,
        today: NaiveDate,
    ) -> Result<Outcome> {
        if rows.is_empty() {
            return Err(ValidationError::EmptyCollection("import".into()).into());
        }
        let now = Utc::now();
        let records = rows
            .into_iter()
            .map(|row| row.into_record(today, now))
            .collect::<Result<Vec<_>, _>>()?;

        let outcome = self.db.with_transaction(|tx| {
            let old = self.state_in(tx)?;
            for record in &records {
                tx.insert_application(record)?;
            }
            let action = Action::BulkImport {
                count: records.len(),
            };
            let transition = self.step(tx, &old, &action, today)?;
            Ok(Outcome::scored(records.clone(), transition))
        })?;
        info!(count = outcome.applications.len(), "applications imported");
        Ok(outcome)
    }

    /// Daily check-in; pays the streak bonus when the streak grows.
    pub fn streak_tick(&self, today: NaiveDate) -> Result<Outcome> {
        self.db.with_transaction(|tx| {
            let old = self.state_in(tx)?;
            let transition = self.step(tx, &old, &Action::StreakBonus, today)?;
            Ok(Outcome::scored(Vec::new(), transition))
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    fn state_in(&self, tx: &Store<'_>) -> Result<GamificationState> {
        match tx.load_state()? {
            Some(state) if state.is_consistent_with(self.engine.ranks()) => Ok(state),
            Some(mut state) => {
                let rank = self.engine.rank_for(state.points).to_string();
                warn!(stored = %state.rank, derived = %rank, "stored rank out of date, recomputing");
                state.rank = rank;
                tx.save_state(&state)?;
                Ok(state)
            }
            None => {
                let existing = tx.list_applications()?;
                let state = self.engine.seeded_state(&existing);
                tx.save_state(&state)?;
                info!(
                    applications = existing.len(),
                    points = state.points,
                    rank = %state.rank,
                    "gamification state created"
                );
                Ok(state)
            }
        }
    }

    /// Engine step against the post-change application list; persists the
    /// new state before returning.
    fn step(
        &self,
        tx: &Store<'_>,
        old: &GamificationState,
        action: &Action,
        today: NaiveDate,
    ) -> Result<Transition> {
        let applications = tx.list_applications()?;
        let transition = self.engine.apply(old, action, &applications, today);
        tx.save_state(&transition.state)?;
        Ok(transition)
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        kind: "application",
        id: id.to_string(),
    }
}
