//! Database schema migrations for jobquest.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{info, warn};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    if current_version < SCHEMA_VERSION {
        info!(from = current_version, to = SCHEMA_VERSION, "database migrated");
    }
    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (fresh database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: applications and per-user gamification state.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS applications (
            id             TEXT PRIMARY KEY,
            user_id        TEXT NOT NULL,
            company        TEXT NOT NULL,
            position       TEXT NOT NULL,
            date_applied   TEXT NOT NULL,
            contact_person TEXT,
            status         TEXT NOT NULL DEFAULT 'applied',
            notes          TEXT,
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS gamification_state (
            user_id       TEXT PRIMARY KEY,
            points        INTEGER NOT NULL DEFAULT 0,
            streak_days   INTEGER NOT NULL DEFAULT 0,
            last_activity TEXT,
            rank          TEXT NOT NULL
        );",
    )?;
    set_schema_version(conn, 1)
}

/// Migration v2: listing index and state modification time.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_applications_user_date
            ON applications(user_id, date_applied DESC, created_at DESC);",
    )?;

    let has_updated_at = conn
        .prepare("SELECT 1 FROM pragma_table_info('gamification_state') WHERE name = 'updated_at'")?
        .exists([])?;
    if !has_updated_at {
        conn.execute(
            "ALTER TABLE gamification_state ADD COLUMN updated_at TEXT",
            [],
        )?;
    }
    set_schema_version(conn, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn v1_database_gains_updated_at() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        migrate(&conn).unwrap();
        let has_column = conn
            .prepare("SELECT 1 FROM pragma_table_info('gamification_state') WHERE name = 'updated_at'")
            .unwrap()
            .exists([])
            .unwrap();
        assert!(has_column);
    }
}
