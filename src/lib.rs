//! # rosterbot
//!
//! Watches a chat group for the daily trip roster, waits for the group to
//! open for posting, appends a configured name to the list, and posts the
//! edited roster back — once per day, inside a configured time window.
//!
//! The browser session is deliberately not part of this crate: implement
//! [`ChatSurface`] over your driver of choice and hand it to [`Bot`]. A
//! [`ScriptedSurface`] is included for rehearsals and tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rosterbot::{Bot, Config, ScriptedSurface};
//!
//! # #[tokio::main]
//! # async fn main() -> rosterbot::Result<()> {
//! let config = Config::load("rosterbot.yaml")?;
//! let surface = ScriptedSurface::new("Ida 11:15\n1. Ana\n\nVolta 17:30\n1. Bia");
//! let mut bot = Bot::new(config, surface);
//! bot.run().await;
//! # Ok(())
//! # }
//! ```

mod bot;
mod config;
mod roster;
mod schedule;
mod surface;

pub use bot::{Bot, Tick};
pub use config::{
    ClockTime, Config, InsertMode, ParseStrategy, RosterConfig, ScheduleConfig, TimingConfig,
};
pub use roster::{
    compose_reply, insert_name, is_current, Composed, Roster, RosterCodec, Section, ZWSP,
};
pub use schedule::{DailyState, Decision, Gate};
pub use surface::{ChatSurface, ScriptedSurface};

/// Result type for rosterbot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during config loading or a watch cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Session-level failure: the surface lost its browser or transport.
    /// The loop answers with a full re-open, never a crash.
    #[error("surface error: {0}")]
    Surface(String),
}
