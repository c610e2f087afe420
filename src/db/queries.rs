use crate::errors::{AppError, AppResult};
use crate::models::Session;
use crate::utils::time::{TIMESTAMP_FORMAT, format_timestamp};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SESSION_COLUMNS: &str = "id, start_time, end_time, hourly_rate, earnings, memo";

fn parse_ts_column(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTimestamp(raw.to_string())),
        )
    })
}

pub fn map_session(row: &Row) -> Result<Session> {
    let start_raw: String = row.get("start_time")?;
    let end_raw: Option<String> = row.get("end_time")?;

    let end_time = match end_raw.as_deref() {
        Some(s) if !s.trim().is_empty() => Some(parse_ts_column(s)?),
        _ => None,
    };

    Ok(Session {
        id: row.get("id")?,
        start_time: parse_ts_column(&start_raw)?,
        end_time,
        hourly_rate: row.get("hourly_rate")?,
        earnings: row.get("earnings")?,
        memo: row.get::<_, Option<String>>("memo")?.unwrap_or_default(),
    })
}

pub fn insert_session(conn: &Connection, start: &NaiveDateTime, hourly_rate: f64) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sessions (start_time, hourly_rate) VALUES (?1, ?2)",
        params![format_timestamp(start), hourly_rate],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn close_session(
    conn: &Connection,
    id: i64,
    end: &NaiveDateTime,
    earnings: f64,
    memo: &str,
) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE sessions
         SET end_time = ?1, earnings = ?2, memo = ?3
         WHERE id = ?4 AND end_time IS NULL",
        params![format_timestamp(end), earnings, memo, id],
    )?;

    if changed == 0 {
        return Err(AppError::Storage(rusqlite::Error::QueryReturnedNoRows));
    }
    Ok(())
}

pub fn load_open_session(conn: &Connection) -> AppResult<Option<Session>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM sessions
         WHERE end_time IS NULL
         ORDER BY start_time DESC
         LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([], map_session).optional()?)
}

/// Closed sessions whose start falls in `[from, to]`, oldest first.
pub fn load_closed_sessions_between(
    conn: &Connection,
    from: &NaiveDateTime,
    to: &NaiveDateTime,
) -> AppResult<Vec<Session>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM sessions
         WHERE end_time IS NOT NULL
           AND start_time >= ?1 AND start_time <= ?2
         ORDER BY start_time ASC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![format_timestamp(from), format_timestamp(to)],
        map_session,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_closed_session_starts(conn: &Connection) -> AppResult<Vec<NaiveDateTime>> {
    let mut stmt = conn.prepare_cached(
        "SELECT start_time FROM sessions WHERE end_time IS NOT NULL ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        let raw: String = row.get(0)?;
        parse_ts_column(&raw)
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_setting(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT value FROM settings WHERE key = ?1")?;
    Ok(stmt.query_row([key], |row| row.get(0)).optional()?)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Session counts for `db --info`: (total, closed, first start, last start).
pub fn session_stats(conn: &Connection) -> AppResult<(i64, i64, Option<String>, Option<String>)> {
    let stats = conn.query_row(
        "SELECT COUNT(*),
                COUNT(end_time),
                MIN(start_time),
                MAX(start_time)
         FROM sessions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    Ok(stats)
}
