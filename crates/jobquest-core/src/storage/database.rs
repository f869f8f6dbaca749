//! SQLite-based storage for applications and gamification state.
//!
//! Provides persistent storage for:
//! - Job application records, scoped by user id
//! - One gamification state row per user
//!
//! All SQL lives on [`Store`], which runs either directly on the connection
//! or inside a transaction opened by [`Database::with_transaction`].

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use super::data_dir;
use crate::application::{ApplicationRecord, ApplicationStatus};
use crate::error::{CoreError, DatabaseError, Result};
use crate::gamification::GamificationState;

/// User id used when nothing else is configured.
pub const DEFAULT_USER: &str = "local";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database holding one user's view of the tracker.
pub struct Database {
    conn: Connection,
    user_id: String,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Open the database at `<data_dir>/jobquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(user_id: &str) -> Result<Self> {
        let path = data_dir()?.join("jobquest.db");
        Self::open_at(&path, user_id)
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path, user_id: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), user_id, "opened database");
        Self::from_connection(conn, user_id)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory(user_id: &str) -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, user_id)
    }

    fn from_connection(conn: Connection, user_id: &str) -> Result<Self> {
        super::migrations::migrate(&conn)?;
        Ok(Self {
            conn,
            user_id: user_id.to_string(),
        })
    }

    /// Queries against the connection, outside any transaction.
    pub fn store(&self) -> Store<'_> {
        Store {
            conn: &self.conn,
            user_id: &self.user_id,
        }
    }

    /// Run `f` in a transaction. Nothing is written unless `f` succeeds.
    ///
    /// # Errors
    /// Returns the error from `f`, or a database error if the transaction
    /// cannot be opened or committed.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Store<'_>) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(&Store {
            conn: &tx,
            user_id: &self.user_id,
        })?;
        tx.commit()?;
        Ok(out)
    }
}

/// SQL over one connection (or transaction), scoped to one user.
pub struct Store<'c> {
    conn: &'c Connection,
    user_id: &'c str,
}

type RawApplication = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    String,
);

const APPLICATION_COLUMNS: &str =
    "id, company, position, date_applied, contact_person, status, notes, created_at";

fn read_application(row: &rusqlite::Row) -> rusqlite::Result<RawApplication> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn parse_date(column: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        DatabaseError::CorruptValue {
            column,
            value: value.to_string(),
        }
        .into()
    })
}

fn decode_application(raw: RawApplication) -> Result<ApplicationRecord> {
    let (id, company, position, date_applied, contact_person, status, notes, created_at) = raw;
    let status = status
        .parse::<ApplicationStatus>()
        .map_err(|_| DatabaseError::CorruptValue {
            column: "status",
            value: status.clone(),
        })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::CorruptValue {
            column: "created_at",
            value: created_at.clone(),
        })?;
    Ok(ApplicationRecord {
        id,
        company,
        position,
        date_applied: parse_date("date_applied", &date_applied)?,
        contact_person,
        status,
        notes,
        created_at,
    })
}

impl Store<'_> {
    pub fn insert_application(&self, app: &ApplicationRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO applications
                (id, user_id, company, position, date_applied, contact_person, status, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                app.id,
                self.user_id,
                app.company,
                app.position,
                app.date_applied.format(DATE_FORMAT).to_string(),
                app.contact_person,
                app.status.as_str(),
                app.notes,
                app.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_application(&self, id: &str) -> Result<Option<ApplicationRecord>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?1 AND user_id = ?2"
        );
        let raw = self
            .conn
            .query_row(&sql, params![id, self.user_id], read_application)
            .optional()?;
        raw.map(decode_application).transpose()
    }

    /// All applications, newest first.
    pub fn list_applications(&self) -> Result<Vec<ApplicationRecord>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE user_id = ?1
             ORDER BY date_applied DESC, created_at DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![self.user_id], read_application)?;
        let apps = rows
            .map(|row| decode_application(row?))
            .collect::<Result<Vec<_>>>()?;
        Ok(apps)
    }

    /// # Errors
    /// Returns [`CoreError::NotFound`] if no such application exists.
    pub fn update_application(&self, app: &ApplicationRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE applications
             SET company = ?1, position = ?2, date_applied = ?3, contact_person = ?4,
                 status = ?5, notes = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                app.company,
                app.position,
                app.date_applied.format(DATE_FORMAT).to_string(),
                app.contact_person,
                app.status.as_str(),
                app.notes,
                app.id,
                self.user_id,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                kind: "application",
                id: app.id.clone(),
            });
        }
        Ok(())
    }

    /// Returns `false` if there was nothing to delete.
    pub fn delete_application(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM applications WHERE id = ?1 AND user_id = ?2",
            params![id, self.user_id],
        )?;
        Ok(changed > 0)
    }

    pub fn load_state(&self) -> Result<Option<GamificationState>> {
        let raw = self
            .conn
            .query_row(
                "SELECT points, streak_days, last_activity, rank
                 FROM gamification_state WHERE user_id = ?1",
                params![self.user_id],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((points, streak_days, last_activity, rank)) = raw else {
            return Ok(None);
        };
        let last_activity = last_activity
            .map(|d| parse_date("last_activity", &d))
            .transpose()?;
        Ok(Some(GamificationState {
            points,
            streak_days,
            last_activity,
            rank,
        }))
    }

    pub fn save_state(&self, state: &GamificationState) -> Result<()> {
        self.conn.execute(
            "INSERT INTO gamification_state (user_id, points, streak_days, last_activity, rank, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                points = excluded.points,
                streak_days = excluded.streak_days,
                last_activity = excluded.last_activity,
                rank = excluded.rank,
                updated_at = excluded.updated_at",
            params![
                self.user_id,
                state.points,
                state.streak_days,
                state.last_activity.map(|d| d.format(DATE_FORMAT).to_string()),
                state.rank,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NewApplication;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn app(company: &str, date: u32) -> ApplicationRecord {
        NewApplication::new(company, "Engineer")
            .with_date(day(date))
            .into_record(day(date), Utc::now())
            .unwrap()
    }

    #[test]
    fn insert_and_list_newest_first() {
        let db = Database::open_memory(DEFAULT_USER).unwrap();
        let store = db.store();
        store.insert_application(&app("Old", 1)).unwrap();
        store.insert_application(&app("New", 9)).unwrap();
        store.insert_application(&app("Mid", 5)).unwrap();

        let listed = store.list_applications().unwrap();
        let names: Vec<_> = listed.iter().map(|a| a.company.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn get_update_delete() {
        let db = Database::open_memory(DEFAULT_USER).unwrap();
        let store = db.store();
        let mut rec = app("Acme", 3);
        store.insert_application(&rec).unwrap();

        let loaded = store.get_application(&rec.id).unwrap().unwrap();
        assert_eq!(loaded.company, "Acme");
        assert_eq!(loaded.date_applied, day(3));

        rec.status = ApplicationStatus::Interview;
        rec.notes = Some("phone screen".into());
        store.update_application(&rec).unwrap();
        let loaded = store.get_application(&rec.id).unwrap().unwrap();
        assert_eq!(loaded.status, ApplicationStatus::Interview);
        assert_eq!(loaded.notes.as_deref(), Some("phone screen"));

        assert!(store.delete_application(&rec.id).unwrap());
        assert!(!store.delete_application(&rec.id).unwrap());
        assert!(store.get_application(&rec.id).unwrap().is_none());
    }

    #[test]
    fn update_missing_is_not_found() {
        let db = Database::open_memory(DEFAULT_USER).unwrap();
        let err = db.store().update_application(&app("Ghost", 1)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn users_do_not_see_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.db");
        let alice = Database::open_at(&path, "alice").unwrap();
        alice.store().insert_application(&app("Acme", 1)).unwrap();

        let bob = Database::open_at(&path, "bob").unwrap();
        assert!(bob.store().list_applications().unwrap().is_empty());
        assert_eq!(alice.store().list_applications().unwrap().len(), 1);
    }

    #[test]
    fn state_round_trips_and_upserts() {
        let db = Database::open_memory(DEFAULT_USER).unwrap();
        let store = db.store();
        assert!(store.load_state().unwrap().is_none());

        let mut state = GamificationState {
            points: 65,
            streak_days: 2,
            last_activity: Some(day(14)),
            rank: "Applicant".into(),
        };
        store.save_state(&state).unwrap();
        assert_eq!(store.load_state().unwrap().unwrap(), state);

        state.points = 70;
        store.save_state(&state).unwrap();
        assert_eq!(store.load_state().unwrap().unwrap().points, 70);
    }

    #[test]
    fn failed_transaction_writes_nothing() {
        let db = Database::open_memory(DEFAULT_USER).unwrap();
        let rec = app("Acme", 1);
        let result: Result<()> = db.with_transaction(|tx| {
            tx.insert_application(&rec)?;
            Err(CoreError::Custom("boom".into()))
        });
        assert!(result.is_err());
        assert!(db.store().list_applications().unwrap().is_empty());
    }

    #[test]
    fn corrupt_status_is_reported() {
        let db = Database::open_memory(DEFAULT_USER).unwrap();
        let rec = app("Acme", 1);
        db.store().insert_application(&rec).unwrap();
        db.conn()
            .execute("UPDATE applications SET status = 'ghosted'", [])
            .unwrap();
        let err = db.store().list_applications().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Database(DatabaseError::CorruptValue { column: "status", .. })
        ));
    }
}
