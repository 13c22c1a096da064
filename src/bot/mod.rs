//! The polling loop: gate, probe, fetch, edit, post.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::roster::{self, Composed};
use crate::schedule::{DailyState, Decision, Gate};
use crate::surface::ChatSurface;
use crate::{Error, Result};

/// Outcome of a single loop pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The gate blocked: wrong day, outside the window, or already done.
    Standby,
    /// The group is not writable yet.
    Closed,
    /// Writable, but no qualifying message was found.
    NoRoster,
    /// The latest roster is not for today or tomorrow.
    Stale,
    /// The configured name is already in the raw message; day marked done.
    AlreadyListed,
    /// Markers present upstream but nothing usable parsed out.
    Unusable,
    /// The edited roster was posted; day marked done.
    Posted,
}

/// Watches one chat group and posts the edited roster once per day.
pub struct Bot<S> {
    config: Config,
    gate: Gate,
    state: DailyState,
    surface: S,
}

impl<S: ChatSurface> Bot<S> {
    pub fn new(config: Config, surface: S) -> Self {
        let gate = Gate::new(config.schedule.clone(), config.timing.clone());
        Self {
            config,
            gate,
            state: DailyState::new(),
            surface,
        }
    }

    /// Run until the process is killed. Session failures re-open the
    /// surface; anything else logs and cools down. The loop never gives
    /// up.
    pub async fn run(&mut self) {
        self.reopen().await;
        info!(group = %self.config.group, "watching");
        loop {
            match self.tick().await {
                Ok((outcome, pause)) => {
                    debug!(?outcome, ?pause, "tick");
                    tokio::time::sleep(pause).await;
                }
                Err(Error::Surface(reason)) => {
                    warn!(%reason, "session failure, reopening");
                    self.reopen().await;
                }
                Err(e) => {
                    error!(error = %e, "unexpected error, cooling down");
                    tokio::time::sleep(Duration::from_secs(self.config.timing.cooldown_secs))
                        .await;
                }
            }
        }
    }

    async fn reopen(&mut self) {
        loop {
            match self.surface.open(&self.config.group).await {
                Ok(()) => return,
                Err(e) => {
                    warn!(error = %e, "could not open the group, retrying");
                    tokio::time::sleep(Duration::from_secs(self.config.timing.retry_secs)).await;
                }
            }
        }
    }

    /// One poll pass. Returns the outcome and how long to pause after it.
    pub async fn tick(&mut self) -> Result<(Tick, Duration)> {
        let now = self.gate.now();
        if self.state.roll(now.date_naive()) {
            info!(date = %now.date_naive(), "new day, ready for today's roster");
        }

        let decision = self.gate.evaluate(now, &self.state);
        if !decision.is_act() {
            return Ok((Tick::Standby, self.gate.pause(decision)));
        }

        let timeout = Duration::from_secs(self.config.timing.probe_timeout_secs);
        if !self.surface.composer_present(timeout).await {
            debug!("group still closed");
            return Ok((Tick::Closed, self.gate.pause(decision)));
        }
        info!("group open, fetching the roster");

        let Some(raw) = self.surface.latest_roster_text().await? else {
            info!("no roster among the recent messages, retrying shortly");
            return Ok((Tick::NoRoster, self.retry_pause()));
        };

        if self.config.check_date && !roster::is_current(&raw, now.date_naive()) {
            info!("latest roster is not for today or tomorrow, waiting");
            return Ok((
                Tick::Stale,
                Duration::from_secs(self.config.timing.stale_secs),
            ));
        }

        match roster::compose_reply(&self.config.roster, &raw) {
            Composed::AlreadyListed => {
                info!(name = %self.config.roster.insert_name, "already on the list, done for today");
                self.state.mark_sent();
                Ok((Tick::AlreadyListed, self.gate.pause(Decision::SleepLong)))
            }
            Composed::Unusable => {
                warn!("message had the markers but nothing parsed out, skipping");
                Ok((Tick::Unusable, self.retry_pause()))
            }
            Composed::Reply(reply) => {
                self.surface.insert_text(&reply).await?;
                if self.config.send {
                    self.surface.submit().await?;
                    info!("roster posted");
                } else {
                    info!("send disabled, reply left in the compose box");
                }
                self.state.mark_sent();
                Ok((Tick::Posted, self.gate.pause(Decision::SleepLong)))
            }
        }
    }

    fn retry_pause(&self) -> Duration {
        Duration::from_secs(self.config.timing.retry_secs)
    }

    pub fn state(&self) -> &DailyState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
