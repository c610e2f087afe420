use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name = ?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Dated like every other `log` row (local RFC 3339).
fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![Local::now().to_rfc3339(), version, message],
    )?;
    Ok(())
}

/// Base schema: sessions (without memo, added by the next migration) and
/// the key/value settings table.
fn create_base_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time   TEXT NOT NULL,          -- YYYY-MM-DD HH:MM:SS (local)
            end_time     TEXT,                   -- NULL while clocked in
            hourly_rate  REAL NOT NULL,
            earnings     REAL                    -- captured at clock-out
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_start ON sessions(start_time);

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migrate_add_memo_column(conn: &Connection) -> AppResult<()> {
    let version = "20240105_0002_add_session_memo";

    if is_applied(conn, version)? {
        return Ok(());
    }

    if !has_column(conn, "sessions", "memo")? {
        conn.execute(
            "ALTER TABLE sessions ADD COLUMN memo TEXT NOT NULL DEFAULT ''",
            [],
        )
        .map_err(|e| AppError::Migration(format!("Failed to add 'memo' column: {e}")))?;
    }

    mark_applied(conn, version, "Added memo column to sessions")?;
    log::info!("Migration applied: {version}");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    let fresh = !table_exists(conn, "sessions")?;
    let version = "20240105_0001_create_sessions";

    if !is_applied(conn, version)? {
        create_base_schema(conn)?;
        mark_applied(conn, version, "Created sessions and settings tables")?;
        if !fresh {
            success(format!("Migration applied: {version}"));
        }
    }

    let had_memo = !fresh && has_column(conn, "sessions", "memo")?;
    migrate_add_memo_column(conn)?;
    if !fresh && !had_memo {
        success("Migration applied: added 'memo' column to sessions.");
    }

    Ok(())
}
