pub mod schema;

pub use schema::{
    ClockTime, Config, InsertMode, ParseStrategy, RosterConfig, ScheduleConfig, TimingConfig,
};
