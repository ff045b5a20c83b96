//! Timer snapshots and the elapsed-time calculation used for live displays.

use chrono::{DateTime, Utc};
use noko_api::{ApiTimer, ApiTimerState};
use serde::Serialize;

use crate::time_format::format_duration;

/// Display used when a project has no timer at all.
pub const IDLE_DISPLAY: &str = "0:00:00";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Running,
    Paused,
}

/// Server-side view of a timer captured at `snapshot_instant` (the client's clock at fetch time).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub id: String,
    pub accumulated_seconds: u64,
    pub snapshot_instant: DateTime<Utc>,
}

impl TimerSnapshot {
    pub fn new(id: impl Into<String>, accumulated_seconds: u64, snapshot_instant: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            accumulated_seconds,
            snapshot_instant,
        }
    }

    /// Seconds on the timer at `now`, assuming it kept running since the snapshot.
    ///
    /// A clock that moved backwards contributes zero rather than subtracting.
    pub fn running_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        let since_snapshot = (now - self.snapshot_instant).num_seconds().max(0) as u64;
        self.accumulated_seconds.saturating_add(since_snapshot)
    }
}

/// A project's timer: absent, paused with a frozen count, or running.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "snapshot", rename_all = "lowercase")]
pub enum Timer {
    #[default]
    None,
    Paused(TimerSnapshot),
    Running(TimerSnapshot),
}

impl Timer {
    /// Builds a timer from loose parts; an empty id means "no timer".
    pub fn from_parts(
        id: &str,
        state: TimerState,
        accumulated_seconds: u64,
        snapshot_instant: DateTime<Utc>,
    ) -> Self {
        if id.trim().is_empty() {
            return Timer::None;
        }
        let snapshot = TimerSnapshot::new(id, accumulated_seconds, snapshot_instant);
        match state {
            TimerState::Running => Timer::Running(snapshot),
            TimerState::Paused => Timer::Paused(snapshot),
        }
    }

    /// Converts an API timer fetched at `fetched_at`. Only `running` ticks; every other state is frozen.
    pub fn from_api(timer: &ApiTimer, fetched_at: DateTime<Utc>) -> Self {
        let state = match timer.state {
            ApiTimerState::Running => TimerState::Running,
            ApiTimerState::Paused
            | ApiTimerState::Pending
            | ApiTimerState::Stopped
            | ApiTimerState::Unknown => TimerState::Paused,
        };
        Self::from_parts(&timer.id, state, timer.seconds.max(0) as u64, fetched_at)
    }

    pub fn id(&self) -> Option<&str> {
        self.snapshot().map(|snapshot| snapshot.id.as_str())
    }

    pub fn state(&self) -> Option<TimerState> {
        match self {
            Timer::None => None,
            Timer::Paused(_) => Some(TimerState::Paused),
            Timer::Running(_) => Some(TimerState::Running),
        }
    }

    pub fn snapshot(&self) -> Option<&TimerSnapshot> {
        match self {
            Timer::None => None,
            Timer::Paused(snapshot) | Timer::Running(snapshot) => Some(snapshot),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Timer::Running(_))
    }

    /// Same timer with its snapshot instant moved to `instant`.
    pub fn anchored_at(&self, instant: DateTime<Utc>) -> Self {
        let mut timer = self.clone();
        if let Timer::Paused(snapshot) | Timer::Running(snapshot) = &mut timer {
            snapshot.snapshot_instant = instant;
        }
        timer
    }

    /// Elapsed seconds at `now`, or `None` when there is no timer.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        match self {
            Timer::None => None,
            Timer::Paused(snapshot) => Some(snapshot.accumulated_seconds),
            Timer::Running(snapshot) => Some(snapshot.running_seconds_at(now)),
        }
    }
}

/// Live display string for `timer` at `now`.
pub fn compute_elapsed(timer: &Timer, now: DateTime<Utc>) -> String {
    match timer.elapsed_seconds(now) {
        Some(seconds) => format_duration(seconds),
        None => IDLE_DISPLAY.to_string(),
    }
}
