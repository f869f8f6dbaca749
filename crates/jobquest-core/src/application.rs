//! Job application records.
//!
//! The gamification engine reads these but never changes them. Creation and
//! editing go through [`NewApplication`] and [`ApplicationPatch`], which
//! carry the same "company and position are required" rule the tracker
//! enforces before anything touches storage.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};

/// Where an application currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offered,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offered,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offered => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
        }
    }

    /// True once the application has reached at least the interview stage.
    pub fn counts_as_interview(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Interview | ApplicationStatus::Offered | ApplicationStatus::Accepted
        )
    }

    /// True once the application has produced an offer.
    pub fn counts_as_offer(&self) -> bool {
        matches!(self, ApplicationStatus::Offered | ApplicationStatus::Accepted)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "interview" => Ok(ApplicationStatus::Interview),
            "offered" | "offer" => Ok(ApplicationStatus::Offered),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "accepted" => Ok(ApplicationStatus::Accepted),
            other => Err(ValidationError::InvalidValue {
                field: "status".into(),
                message: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// A stored job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub company: String,
    pub position: String,
    pub date_applied: NaiveDate,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an application.
///
/// Every field except `company` and `position` is optional so that partially
/// filled import rows deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub date_applied: Option<NaiveDate>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewApplication {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date_applied = Some(date);
        self
    }

    /// Validate and turn into a record with a fresh id.
    ///
    /// # Errors
    /// Returns an error if company or position is blank.
    pub fn into_record(
        self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ApplicationRecord, ValidationError> {
        let company = required("company", &self.company)?;
        let position = required("position", &self.position)?;
        Ok(ApplicationRecord {
            id: Uuid::new_v4().to_string(),
            company,
            position,
            date_applied: self.date_applied.unwrap_or(today),
            contact_person: optional(self.contact_person),
            status: self.status.unwrap_or_default(),
            notes: optional(self.notes),
            created_at: now,
        })
    }
}

/// Parse an import batch: a JSON array of application objects.
///
/// # Errors
/// Returns [`CoreError::Json`] if the text is not such an array.
pub fn parse_import(json: &str) -> Result<Vec<NewApplication>, CoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse an import batch from `path`.
///
/// # Errors
/// Returns [`CoreError::Io`] if the file cannot be read, or
/// [`CoreError::Json`] if it does not parse.
pub fn read_import(path: &Path) -> Result<Vec<NewApplication>, CoreError> {
    let content = std::fs::read_to_string(path)?;
    parse_import(&content)
}

/// Partial update of an application. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub date_applied: Option<NaiveDate>,
    pub contact_person: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Produce the patched record. The input is left as it was.
    ///
    /// # Errors
    /// Returns an error if the patch blanks out company or position.
    pub fn apply_to(&self, record: &ApplicationRecord) -> Result<ApplicationRecord, ValidationError> {
        let mut next = record.clone();
        if let Some(company) = &self.company {
            next.company = required("company", company)?;
        }
        if let Some(position) = &self.position {
            next.position = required("position", position)?;
        }
        if let Some(date) = self.date_applied {
            next.date_applied = date;
        }
        if let Some(contact) = &self.contact_person {
            next.contact_person = optional(Some(contact.clone()));
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(notes) = &self.notes {
            next.notes = optional(Some(notes.clone()));
        }
        Ok(next)
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: "must not be empty".into(),
        });
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Status filter used by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status == *status,
        }
    }

    pub fn filter<'a>(&self, records: &'a [ApplicationRecord]) -> Vec<&'a ApplicationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Per-status counts shown above the application list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub applied: usize,
    pub interview: usize,
    pub offered: usize,
    pub rejected: usize,
    pub accepted: usize,
}

impl ApplicationStats {
    pub fn from_applications(records: &[ApplicationRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.status {
                ApplicationStatus::Applied => stats.applied += 1,
                ApplicationStatus::Interview => stats.interview += 1,
                ApplicationStatus::Offered => stats.offered += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                ApplicationStatus::Accepted => stats.accepted += 1,
            }
        }
        stats
    }
}

/// Newest first: by date applied, then by creation time.
pub fn sort_for_listing(records: &mut [ApplicationRecord]) {
    records.sort_by(|a, b| {
        b.date_applied
            .cmp(&a.date_applied)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
