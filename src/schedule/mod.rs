//! Scheduling: when the loop is allowed to act, and at what pace.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use rand::Rng;
use std::time::Duration;

use crate::config::{ScheduleConfig, TimingConfig};

/// What the polling loop should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Wrong weekday, outside the operating window, or already posted
    /// today: stand by.
    SleepLong,
    /// Window open: probe now, retry at the routine pace.
    Act,
    /// Window open and inside the alert sub-window: probe now, retry at
    /// high frequency.
    ActAlert,
}

impl Decision {
    pub fn is_act(self) -> bool {
        matches!(self, Decision::Act | Decision::ActAlert)
    }
}

/// Once-per-day bookkeeping. The day boundary is detected by comparing
/// zoned calendar dates, so a loop that sleeps across midnight still
/// resets.
#[derive(Debug, Clone, Default)]
pub struct DailyState {
    last_date: Option<NaiveDate>,
    sent_today: bool,
}

impl DailyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the state to `date`. Returns true (and clears the sent flag)
    /// when the calendar date changed.
    pub fn roll(&mut self, date: NaiveDate) -> bool {
        if self.last_date == Some(date) {
            return false;
        }
        self.last_date = Some(date);
        self.sent_today = false;
        true
    }

    pub fn mark_sent(&mut self) {
        self.sent_today = true;
    }

    pub fn sent_today(&self) -> bool {
        self.sent_today
    }
}

/// Scheduling predicate over wall-clock time in the configured zone.
pub struct Gate {
    schedule: ScheduleConfig,
    timing: TimingConfig,
}

impl Gate {
    pub fn new(schedule: ScheduleConfig, timing: TimingConfig) -> Self {
        Self { schedule, timing }
    }

    /// Current time in the configured zone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.schedule.timezone)
    }

    /// Decide whether the loop may act at `now`.
    pub fn evaluate(&self, now: DateTime<Tz>, state: &DailyState) -> Decision {
        if state.sent_today() {
            return Decision::SleepLong;
        }
        if !self.schedule.runs_on(now.weekday()) {
            return Decision::SleepLong;
        }
        let time = now.time();
        if time < self.schedule.start.as_naive() || now.hour() >= self.schedule.end_hour {
            return Decision::SleepLong;
        }
        if self.in_alert_window(time) {
            Decision::ActAlert
        } else {
            Decision::Act
        }
    }

    fn in_alert_window(&self, time: NaiveTime) -> bool {
        let start = self.schedule.alert_start.as_naive();
        let end = self.schedule.alert_end.as_naive();
        start < end && start <= time && time < end
    }

    /// Pause matching a decision. Probe retries are randomized so the
    /// polling cadence is not a fixed signature.
    pub fn pause(&self, decision: Decision) -> Duration {
        let mut rng = rand::thread_rng();
        match decision {
            Decision::SleepLong => Duration::from_secs(self.timing.standby_secs),
            Decision::Act => Duration::from_secs_f64(
                rng.gen_range(self.timing.poll_secs_min as f64..=self.timing.poll_secs_max as f64),
            ),
            Decision::ActAlert => Duration::from_millis(
                rng.gen_range(self.timing.alert_poll_ms_min..=self.timing.alert_poll_ms_max),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClockTime;
    use chrono::Weekday;

    fn schedule() -> ScheduleConfig {
        ScheduleConfig {
            weekdays: vec![Weekday::Sun, Weekday::Tue, Weekday::Thu],
            start: ClockTime::new(19, 30),
            end_hour: 23,
            alert_start: ClockTime::new(20, 0),
            alert_end: ClockTime::new(21, 0),
            ..ScheduleConfig::default()
        }
    }

    fn gate() -> Gate {
        Gate::new(schedule(), TimingConfig::default())
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        use chrono::TimeZone;
        chrono_tz::America::Campo_Grande
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_act_inside_window_on_allowed_day() {
        // 2025-09-23 is a Tuesday.
        let decision = gate().evaluate(at(2025, 9, 23, 19, 45), &DailyState::new());
        assert_eq!(decision, Decision::Act);
    }

    #[test]
    fn test_alert_inside_sub_window() {
        let decision = gate().evaluate(at(2025, 9, 23, 20, 30), &DailyState::new());
        assert_eq!(decision, Decision::ActAlert);
        assert!(decision.is_act());
    }

    #[test]
    fn test_alert_bounds() {
        let g = gate();
        let state = DailyState::new();
        assert_eq!(g.evaluate(at(2025, 9, 23, 19, 59), &state), Decision::Act);
        assert_eq!(g.evaluate(at(2025, 9, 23, 20, 0), &state), Decision::ActAlert);
        assert_eq!(g.evaluate(at(2025, 9, 23, 21, 0), &state), Decision::Act);
    }

    #[test]
    fn test_sleep_on_disallowed_day() {
        // 2025-09-24 is a Wednesday.
        let decision = gate().evaluate(at(2025, 9, 24, 20, 30), &DailyState::new());
        assert_eq!(decision, Decision::SleepLong);
    }

    #[test]
    fn test_sleep_before_window_start() {
        let decision = gate().evaluate(at(2025, 9, 23, 19, 15), &DailyState::new());
        assert_eq!(decision, Decision::SleepLong);
    }

    #[test]
    fn test_sleep_after_window_end() {
        let decision = gate().evaluate(at(2025, 9, 23, 23, 0), &DailyState::new());
        assert_eq!(decision, Decision::SleepLong);
    }

    #[test]
    fn test_sleep_after_sent_regardless_of_window() {
        let mut state = DailyState::new();
        state.roll(at(2025, 9, 23, 20, 30).date_naive());
        state.mark_sent();
        let decision = gate().evaluate(at(2025, 9, 23, 20, 30), &state);
        assert_eq!(decision, Decision::SleepLong);
    }

    #[test]
    fn test_roll_clears_sent_flag_on_new_day() {
        let mut state = DailyState::new();
        assert!(state.roll(at(2025, 9, 23, 20, 0).date_naive()));
        state.mark_sent();
        assert!(!state.roll(at(2025, 9, 23, 22, 0).date_naive()));
        assert!(state.sent_today());
        assert!(state.roll(at(2025, 9, 25, 20, 0).date_naive()));
        assert!(!state.sent_today());
    }

    #[test]
    fn test_empty_weekday_list_allows_every_day() {
        let mut config = schedule();
        config.weekdays.clear();
        let g = Gate::new(config, TimingConfig::default());
        let decision = g.evaluate(at(2025, 9, 24, 20, 30), &DailyState::new());
        assert_eq!(decision, Decision::ActAlert);
    }

    #[test]
    fn test_pause_ranges() {
        let g = gate();
        let act = g.pause(Decision::Act);
        assert!(act >= Duration::from_secs(10) && act <= Duration::from_secs(20));
        let alert = g.pause(Decision::ActAlert);
        assert!(alert >= Duration::from_millis(700) && alert <= Duration::from_millis(1500));
        assert_eq!(g.pause(Decision::SleepLong), Duration::from_secs(300));
    }
}
