use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{Error, Result};

/// Top-level config structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Name of this bot instance.
    pub name: String,

    /// Chat group to watch.
    pub group: String,

    /// What to insert and how the roster text is shaped.
    pub roster: RosterConfig,

    /// When the bot is allowed to act.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Pause durations for the polling loop.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Whether the reply is actually submitted. When false the text is
    /// only placed in the compose box.
    #[serde(default = "default_true")]
    pub send: bool,

    /// Whether a roster must mention today's or tomorrow's date to be
    /// acted on.
    #[serde(default = "default_true")]
    pub check_date: bool,
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("name is required".into()));
        }
        if self.group.is_empty() {
            return Err(Error::Config("group is required".into()));
        }
        self.roster.validate()?;
        self.schedule.validate()?;
        self.timing.validate()?;
        Ok(())
    }
}

/// Roster text handling: what to insert and how the message is shaped.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Name appended to the list.
    pub insert_name: String,

    /// Which sections receive the name.
    #[serde(default)]
    pub mode: InsertMode,

    /// Literal keyword opening the outbound section.
    #[serde(default = "default_going_marker")]
    pub going_marker: String,

    /// Literal keyword opening the return section.
    #[serde(default = "default_returning_marker")]
    pub returning_marker: String,

    /// Which parsing heuristic to use.
    #[serde(default)]
    pub strategy: ParseStrategy,

    /// First list ordinal, 0 or 1.
    #[serde(default = "default_index_base")]
    pub index_base: u32,
}

impl RosterConfig {
    /// Defaults with just the name to insert filled in.
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            insert_name: name.into(),
            mode: InsertMode::default(),
            going_marker: default_going_marker(),
            returning_marker: default_returning_marker(),
            strategy: ParseStrategy::default(),
            index_base: default_index_base(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.insert_name.trim().is_empty() {
            return Err(Error::Config("roster.insert_name is required".into()));
        }
        if self.going_marker.is_empty() || self.returning_marker.is_empty() {
            return Err(Error::Config("section markers must not be empty".into()));
        }
        if self.index_base > 1 {
            return Err(Error::Config("roster.index_base must be 0 or 1".into()));
        }
        Ok(())
    }
}

/// Which sections the configured name is appended to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Return trip only.
    ReturningOnly,
    /// Both trips.
    #[default]
    Both,
}

/// The two parsing heuristics the roster format has needed over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Split the whole text on the first occurrence of each marker.
    #[default]
    MarkerSplit,
    /// Treat keyword-bearing lines as section titles.
    TitleLines,
}

/// When the bot is allowed to act.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone the windows are expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Allowed weekdays ("mon".."sun"); empty means every day.
    #[serde(default, deserialize_with = "weekday_list")]
    pub weekdays: Vec<Weekday>,

    /// Operating window opens ("HH:MM").
    #[serde(default = "default_start")]
    pub start: ClockTime,

    /// Operating window closes at this hour (exclusive).
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,

    /// High-frequency polling sub-window ("HH:MM"); equal bounds disable
    /// it.
    #[serde(default)]
    pub alert_start: ClockTime,

    #[serde(default)]
    pub alert_end: ClockTime,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            weekdays: Vec::new(),
            start: default_start(),
            end_hour: default_end_hour(),
            alert_start: ClockTime::default(),
            alert_end: ClockTime::default(),
        }
    }
}

impl ScheduleConfig {
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.weekdays.is_empty() || self.weekdays.contains(&day)
    }

    fn validate(&self) -> Result<()> {
        if self.end_hour == 0 || self.end_hour > 24 {
            return Err(Error::Config("schedule.end_hour must be in 1..=24".into()));
        }
        if u32::from(self.start.hour) >= self.end_hour {
            return Err(Error::Config(
                "schedule.start must fall before schedule.end_hour".into(),
            ));
        }
        if self.alert_end.as_naive() < self.alert_start.as_naive() {
            return Err(Error::Config(
                "schedule.alert_end must not precede schedule.alert_start".into(),
            ));
        }
        Ok(())
    }
}

/// A wall-clock "HH:MM".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn as_naive(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("invalid time '{}', expected HH:MM", s));
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u8 = h.trim().parse().map_err(|_| invalid())?;
        let minute: u8 = m.trim().parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self { hour, minute })
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ClockTimeVisitor)
    }
}

struct ClockTimeVisitor;

impl<'de> Visitor<'de> for ClockTimeVisitor {
    type Value = ClockTime;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a wall-clock time in HH:MM form")
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(|e: Error| de::Error::custom(e))
    }
}

fn weekday_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Weekday>, D::Error>
where
    D: Deserializer<'de>,
{
    let names: Vec<String> = Vec::deserialize(deserializer)?;
    names
        .iter()
        .map(|name| {
            Weekday::from_str(name)
                .map_err(|_| de::Error::custom(format!("unknown weekday '{}'", name)))
        })
        .collect()
}

/// Pause durations for the polling loop, all in the unit their name says.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause while the gate blocks.
    pub standby_secs: u64,
    /// Randomized pause after a closed probe, routine pace.
    pub poll_secs_min: u64,
    pub poll_secs_max: u64,
    /// Randomized pause after a closed probe, alert pace.
    pub alert_poll_ms_min: u64,
    pub alert_poll_ms_max: u64,
    /// How long the composer probe may wait.
    pub probe_timeout_secs: u64,
    /// Pause after a fetch or send hiccup.
    pub retry_secs: u64,
    /// Pause after a roster that fails the date check.
    pub stale_secs: u64,
    /// Pause after an unexpected error.
    pub cooldown_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            standby_secs: 300,
            poll_secs_min: 10,
            poll_secs_max: 20,
            alert_poll_ms_min: 700,
            alert_poll_ms_max: 1500,
            probe_timeout_secs: 2,
            retry_secs: 15,
            stale_secs: 180,
            cooldown_secs: 60,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<()> {
        if self.poll_secs_min > self.poll_secs_max {
            return Err(Error::Config(
                "timing.poll_secs_min must not exceed timing.poll_secs_max".into(),
            ));
        }
        if self.alert_poll_ms_min > self.alert_poll_ms_max {
            return Err(Error::Config(
                "timing.alert_poll_ms_min must not exceed timing.alert_poll_ms_max".into(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_going_marker() -> String {
    "Ida".to_string()
}

fn default_returning_marker() -> String {
    "Volta".to_string()
}

fn default_index_base() -> u32 {
    1
}

fn default_timezone() -> Tz {
    chrono_tz::America::Campo_Grande
}

fn default_start() -> ClockTime {
    ClockTime::new(19, 30)
}

fn default_end_hour() -> u32 {
    23
}
