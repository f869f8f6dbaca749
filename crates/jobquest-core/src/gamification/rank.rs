//! Rank tiers derived from cumulative points.
//!
//! A [`RankTable`] is an ordered list of `(name, threshold)` pairs. The first
//! threshold is always 0 and thresholds strictly increase; both rules are
//! checked on construction and on deserialization, so every lookup below can
//! rely on them.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One named tier and the point total needed to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub name: String,
    pub threshold: u32,
}

impl RankTier {
    pub fn new(name: impl Into<String>, threshold: u32) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }
}

/// The next tier above a point total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRank {
    /// `None` when already at the top rank.
    pub name: Option<String>,
    /// Points still missing; 0 at the top rank.
    pub points_needed: u32,
}

/// Validated, ascending rank table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankTier>", into = "Vec<RankTier>")]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    /// Build a table from tiers in ascending order.
    ///
    /// # Errors
    /// Returns an error if the list is empty, the first threshold is not 0,
    /// thresholds do not strictly increase, or a name is blank or repeated.
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, ValidationError> {
        let first = tiers
            .first()
            .ok_or_else(|| ValidationError::EmptyCollection("ranks".into()))?;
        if first.threshold != 0 {
            return Err(ValidationError::RankThreshold {
                name: first.name.clone(),
                threshold: first.threshold,
                expected: "0".into(),
            });
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "ranks.name".into(),
                    message: format!("rank #{} has an empty name", i + 1),
                });
            }
            if tiers[..i].iter().any(|t| t.name == tier.name) {
                return Err(ValidationError::Duplicate {
                    field: "rank name".into(),
                    value: tier.name.clone(),
                });
            }
            if i > 0 && tier.threshold <= tiers[i - 1].threshold {
                return Err(ValidationError::RankThreshold {
                    name: tier.name.clone(),
                    threshold: tier.threshold,
                    expected: format!("> {}", tiers[i - 1].threshold),
                });
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    /// The rank every new user starts at.
    pub fn lowest(&self) -> &RankTier {
        &self.tiers[0]
    }

    pub fn highest(&self) -> &RankTier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn is_top_rank(&self, name: &str) -> bool {
        self.highest().name == name
    }

    pub fn threshold_of(&self, name: &str) -> Option<u32> {
        self.tiers
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.threshold)
    }

    fn index_for(&self, points: u32) -> usize {
        // partition_point relies on thresholds being sorted
        self.tiers
            .partition_point(|t| t.threshold <= points)
            .saturating_sub(1)
    }

    /// Name of the highest tier whose threshold does not exceed `points`.
    pub fn rank_for(&self, points: u32) -> &str {
        &self.tiers[self.index_for(points)].name
    }

    /// The next tier and how many points remain until it.
    pub fn next_rank(&self, points: u32) -> NextRank {
        match self.tiers.get(self.index_for(points) + 1) {
            Some(next) => NextRank {
                name: Some(next.name.clone()),
                points_needed: next.threshold.saturating_sub(points),
            },
            None => NextRank {
                name: None,
                points_needed: 0,
            },
        }
    }

    /// Progress through the current tier, in `[0, 100]`. Always 100 at the top.
    pub fn progress_percent(&self, points: u32) -> f64 {
        let idx = self.index_for(points);
        let Some(next) = self.tiers.get(idx + 1) else {
            return 100.0;
        };
        let current = self.tiers[idx].threshold;
        let span = f64::from(next.threshold - current);
        let progress = f64::from(points.saturating_sub(current)) / span * 100.0;
        progress.clamp(0.0, 100.0)
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                RankTier::new("Newcomer", 0),
                RankTier::new("Applicant", 50),
                RankTier::new("Interviewer", 150),
                RankTier::new("Contender", 350),
                RankTier::new("Top Candidate", 600),
                RankTier::new("Job Seeker Pro", 1000),
            ],
        }
    }
}

impl TryFrom<Vec<RankTier>> for RankTable {
    type Error = ValidationError;

    fn try_from(tiers: Vec<RankTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<RankTable> for Vec<RankTier> {
    fn from(table: RankTable) -> Self {
        table.tiers
    }
}
