//! Stopwatch used to record a new entry

use chrono::{DateTime, Utc};

use crate::api::NewEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Default)]
pub struct Timer {
    state: TimerState,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Timer {
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Start a fresh recording; any previous end is discarded
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.start = Some(now);
        self.end = None;
        self.state = TimerState::Running;
    }

    pub fn stop(&mut self, now: DateTime<Utc>) {
        if self.state != TimerState::Running {
            return;
        }
        self.end = Some(now);
        self.state = TimerState::Stopped;
    }

    /// Manual correction of the start, e.g. "I actually began 10 minutes ago"
    pub fn set_start(&mut self, start: DateTime<Utc>) {
        self.start = Some(start);
    }

    pub fn set_end(&mut self, end: DateTime<Utc>) {
        self.end = Some(end);
    }

    /// Seconds shown on the clock
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        let until = match self.state {
            TimerState::Idle => return 0,
            TimerState::Running => Some(now),
            TimerState::Stopped => self.end,
        };
        match (self.start, until) {
            (Some(start), Some(until)) => (until - start).num_seconds().max(0),
            _ => 0,
        }
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        Some((self.end? - self.start?).num_seconds())
    }

    /// The entry to submit, once a category is chosen and the interval is positive
    pub fn draft(&self, username: &str, category: Option<&str>) -> Option<NewEntry> {
        let category = category.filter(|c| !c.trim().is_empty())?;
        let (start, end) = (self.start?, self.end?);
        if self.duration_seconds()? <= 0 {
            return None;
        }
        Some(NewEntry {
            username: username.to_string(),
            category: category.to_string(),
            start_time: start,
            end_time: end,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// "HH:MM:SS", hours may exceed 24
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn idle_timer_shows_zero() {
        let timer = Timer::default();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.elapsed_seconds(t0()), 0);
        assert!(timer.draft("alice", Some("Work")).is_none());
    }

    #[test]
    fn start_stop_cycle() {
        let mut timer = Timer::default();
        timer.start(t0());
        assert!(timer.is_running());
        assert_eq!(timer.elapsed_seconds(t0() + Duration::seconds(95)), 95);

        timer.stop(t0() + Duration::minutes(25));
        assert_eq!(timer.state(), TimerState::Stopped);
        // frozen once stopped
        assert_eq!(timer.elapsed_seconds(t0() + Duration::hours(3)), 1500);
        assert_eq!(timer.duration_seconds(), Some(1500));

        let draft = timer.draft("alice", Some("Work")).unwrap();
        assert_eq!(draft.start_time, t0());
        assert_eq!(draft.end_time, t0() + Duration::minutes(25));
        assert_eq!(draft.category, "Work");

        timer.reset();
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.start_time().is_none());
    }

    #[test]
    fn stop_without_start_is_ignored() {
        let mut timer = Timer::default();
        timer.stop(t0());
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.end_time().is_none());
    }

    #[test]
    fn draft_needs_category_and_positive_duration() {
        let mut timer = Timer::default();
        timer.start(t0());
        timer.stop(t0() + Duration::minutes(10));
        assert!(timer.draft("alice", None).is_none());
        assert!(timer.draft("alice", Some(" ")).is_none());

        timer.set_end(t0() - Duration::minutes(1));
        assert!(timer.draft("alice", Some("Work")).is_none());
        assert_eq!(timer.elapsed_seconds(t0()), 0);
    }

    #[test]
    fn manual_start_moves_running_clock() {
        let mut timer = Timer::default();
        timer.start(t0());
        timer.set_start(t0() - Duration::minutes(10));
        assert_eq!(timer.elapsed_seconds(t0()), 600);
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(3725), "01:02:05");
        assert_eq!(format_elapsed(90_000), "25:00:00");
        assert_eq!(format_elapsed(-5), "00:00:00");
    }
}
