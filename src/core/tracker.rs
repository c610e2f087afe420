//! Clock-in/clock-out state machine.

use crate::core::store::SessionStore;
use crate::errors::{AppResult, StateError};
use crate::models::Session;
use crate::models::session::earnings_for;
use crate::utils::time::{self, format_timestamp};
use chrono::{NaiveDateTime, TimeDelta};

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerState {
    Idle,
    Active(Session),
}

/// Owns the store and the single active session.
pub struct SessionTracker<S: SessionStore> {
    store: S,
    hourly_rate: f64,
    state: TrackerState,
}

impl<S: SessionStore> SessionTracker<S> {
    /// Build a tracker over `store`. A session left open by a previous
    /// process is resumed instead of starting Idle.
    pub fn new(store: S, hourly_rate: f64) -> AppResult<Self> {
        let state = match store.open_session()? {
            Some(session) => {
                log::info!(
                    "Resuming open session #{} started at {}",
                    session.id,
                    format_timestamp(&session.start_time)
                );
                TrackerState::Active(session)
            }
            None => TrackerState::Idle,
        };

        Ok(Self {
            store,
            hourly_rate,
            state,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TrackerState::Active(_))
    }

    pub fn active_session(&self) -> Option<&Session> {
        match &self.state {
            TrackerState::Active(s) => Some(s),
            TrackerState::Idle => None,
        }
    }

    pub fn clock_in(&mut self) -> AppResult<Session> {
        self.clock_in_at(time::now())
    }

    pub fn clock_in_at(&mut self, now: NaiveDateTime) -> AppResult<Session> {
        if let TrackerState::Active(open) = &self.state {
            return Err(StateError::AlreadyClockedIn {
                since: format_timestamp(&open.start_time),
            }
            .into());
        }

        let id = self.store.insert_session(now, self.hourly_rate)?;
        let session = Session {
            id,
            start_time: now,
            end_time: None,
            hourly_rate: self.hourly_rate,
            earnings: None,
            memo: String::new(),
        };

        self.note(
            "clock_in",
            id,
            format!(
                "Clocked in at {} ({:.2}/h)",
                format_timestamp(&now),
                self.hourly_rate
            ),
        );

        self.state = TrackerState::Active(session.clone());
        Ok(session)
    }

    pub fn clock_out(&mut self, memo: Option<&str>) -> AppResult<Session> {
        self.clock_out_at(time::now(), memo)
    }

    /// Close the active session. An end before the start (clock moved
    /// backwards) is clamped to the start.
    pub fn clock_out_at(&mut self, now: NaiveDateTime, memo: Option<&str>) -> AppResult<Session> {
        let TrackerState::Active(open) = &self.state else {
            return Err(StateError::NotClockedIn.into());
        };

        let end = now.max(open.start_time);
        let secs = (end - open.start_time).num_seconds();
        let earnings = earnings_for(secs, open.hourly_rate);
        let memo = memo.map(str::trim).unwrap_or_default();

        self.store.close_session(open.id, end, earnings, memo)?;

        let closed = Session {
            end_time: Some(end),
            earnings: Some(earnings),
            memo: memo.to_string(),
            ..open.clone()
        };

        self.note(
            "clock_out",
            closed.id,
            format!(
                "Clocked out at {} after {}s, earned {:.2}",
                format_timestamp(&end),
                secs,
                earnings
            ),
        );

        self.state = TrackerState::Idle;
        Ok(closed)
    }

    pub fn current_elapsed(&self) -> TimeDelta {
        self.elapsed_at(time::now())
    }

    pub fn elapsed_at(&self, now: NaiveDateTime) -> TimeDelta {
        self.active_session()
            .map(|s| s.duration_at(now))
            .unwrap_or_else(TimeDelta::zero)
    }

    pub fn current_earnings(&self) -> f64 {
        self.earnings_at(time::now())
    }

    pub fn earnings_at(&self, now: NaiveDateTime) -> f64 {
        self.active_session()
            .map(|s| s.earnings_at(now))
            .unwrap_or(0.0)
    }

    pub fn hour_progress(&self) -> f64 {
        self.hour_progress_at(time::now())
    }

    /// Progress through the current hour of worked time, in `[0, 1)`.
    pub fn hour_progress_at(&self, now: NaiveDateTime) -> f64 {
        let secs = self.elapsed_at(now).num_seconds();
        (secs % 3600) as f64 / 3600.0
    }

    fn note(&self, operation: &str, id: i64, message: String) {
        log::info!("{operation} #{id}: {message}");
        if let Err(e) = self
            .store
            .log_operation(operation, &format!("session {id}"), &message)
        {
            log::warn!("Failed to write internal log: {e}");
        }
    }
}

/// Scoped guard that clocks the tracker out when it goes out of scope.
///
/// `release` performs the clock-out explicitly (with a memo) and surfaces
/// errors; if the guard is dropped without `release`, for example while a
/// panic unwinds, `Drop` does it and logs any failure.
pub struct AutoClockOut<'a, S: SessionStore> {
    tracker: &'a mut SessionTracker<S>,
    armed: bool,
}

impl<'a, S: SessionStore> AutoClockOut<'a, S> {
    pub fn new(tracker: &'a mut SessionTracker<S>, enabled: bool) -> Self {
        Self {
            tracker,
            armed: enabled,
        }
    }

    pub fn tracker(&self) -> &SessionTracker<S> {
        &*self.tracker
    }

    /// Whether releasing the guard will close a session.
    pub fn will_clock_out(&self) -> bool {
        self.armed && self.tracker.is_active()
    }

    pub fn release(mut self, memo: Option<&str>) -> AppResult<Option<Session>> {
        self.release_at(time::now(), memo)
    }

    pub fn release_at(
        &mut self,
        now: NaiveDateTime,
        memo: Option<&str>,
    ) -> AppResult<Option<Session>> {
        let clock_out = self.will_clock_out();
        self.armed = false;

        if clock_out {
            Ok(Some(self.tracker.clock_out_at(now, memo)?))
        } else {
            Ok(None)
        }
    }
}

impl<S: SessionStore> Drop for AutoClockOut<'_, S> {
    fn drop(&mut self) {
        if self.will_clock_out() {
            self.armed = false;
            match self.tracker.clock_out(None) {
                Ok(s) => log::info!("Auto clock-out of session #{} on scope exit", s.id),
                Err(e) => {
                    log::error!("Auto clock-out failed: {e}");
                    eprintln!("❌ Auto clock-out failed: {e}");
                }
            }
        }
    }
}
