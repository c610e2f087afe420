use crate::core::store::SessionStore;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::Session;
use chrono::NaiveDateTime;

impl SessionStore for DbPool {
    fn insert_session(&self, start: NaiveDateTime, hourly_rate: f64) -> AppResult<i64> {
        queries::insert_session(&self.conn, &start, hourly_rate)
    }

    fn close_session(
        &self,
        id: i64,
        end: NaiveDateTime,
        earnings: f64,
        memo: &str,
    ) -> AppResult<()> {
        queries::close_session(&self.conn, id, &end, earnings, memo)
    }

    fn open_session(&self) -> AppResult<Option<Session>> {
        queries::load_open_session(&self.conn)
    }

    fn closed_sessions_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> AppResult<Vec<Session>> {
        queries::load_closed_sessions_between(&self.conn, &from, &to)
    }

    fn closed_session_starts(&self) -> AppResult<Vec<NaiveDateTime>> {
        queries::load_closed_session_starts(&self.conn)
    }

    fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        queries::get_setting(&self.conn, key)
    }

    fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        queries::set_setting(&self.conn, key, value)
    }

    fn log_operation(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.conn, operation, target, message)
    }
}
