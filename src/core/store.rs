//! Persistence seam used by the tracker, the aggregator and the exporter.

use crate::errors::AppResult;
use crate::models::Session;
use chrono::NaiveDateTime;

pub trait SessionStore {
    /// Insert an open session and return its id.
    fn insert_session(&self, start: NaiveDateTime, hourly_rate: f64) -> AppResult<i64>;

    /// Close a session: set `end_time`, final earnings and memo.
    fn close_session(&self, id: i64, end: NaiveDateTime, earnings: f64, memo: &str)
    -> AppResult<()>;

    /// The open session, if any (most recent first if the file holds several).
    fn open_session(&self) -> AppResult<Option<Session>>;

    /// Closed sessions with `from <= start_time <= to`, ordered by `start_time`.
    fn closed_sessions_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> AppResult<Vec<Session>>;

    /// Start time of every closed session.
    fn closed_session_starts(&self) -> AppResult<Vec<NaiveDateTime>>;

    fn get_setting(&self, key: &str) -> AppResult<Option<String>>;

    fn set_setting(&self, key: &str, value: &str) -> AppResult<()>;

    /// Append a line to the internal operation log.
    fn log_operation(&self, operation: &str, target: &str, message: &str) -> AppResult<()>;
}
