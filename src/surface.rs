//! The chat client surface the bot drives.
//!
//! The browser session itself is not part of this crate: wrap your driver
//! in [`ChatSurface`] and hand it to [`crate::Bot`]. Every error returned
//! from a surface method is treated as session-level and answered with a
//! full re-open.

use async_trait::async_trait;
use std::time::Duration;

use crate::{Error, Result};

#[async_trait]
pub trait ChatSurface: Send {
    /// Open (or re-open after a session failure) the group conversation.
    async fn open(&mut self, group: &str) -> Result<()>;

    /// Probe for an interactable compose box. Absence within `timeout`
    /// means "closed". This is a heuristic — a slow UI looks the same as
    /// a closed group — so it must never error and must not type or
    /// click.
    async fn composer_present(&mut self, timeout: Duration) -> bool;

    /// Text of the most recent message carrying both section markers, if
    /// any.
    async fn latest_roster_text(&mut self) -> Result<Option<String>>;

    /// Put `text` into the compose box.
    async fn insert_text(&mut self, text: &str) -> Result<()>;

    /// Press send on whatever is in the compose box.
    async fn submit(&mut self) -> Result<()>;
}

/// Canned surface for rehearsal runs and tests: the group "opens" after a
/// fixed number of probes and the latest message is a fixed text.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    message: Option<String>,
    probes_until_open: u32,
    probes_seen: u32,
    fetch_failures: u32,
    /// Groups passed to `open`, in order.
    pub opened: Vec<String>,
    /// Everything placed in the compose box, in order.
    pub inserted: Vec<String>,
    /// How many times send was pressed.
    pub submitted: u32,
}

impl ScriptedSurface {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A surface whose group never shows a roster.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep the composer absent for the first `probes` probes.
    pub fn closed_for(mut self, probes: u32) -> Self {
        self.probes_until_open = probes;
        self
    }

    /// Fail the next `n` fetches with a session error.
    pub fn failing_fetches(mut self, n: u32) -> Self {
        self.fetch_failures = n;
        self
    }
}

#[async_trait]
impl ChatSurface for ScriptedSurface {
    async fn open(&mut self, group: &str) -> Result<()> {
        self.opened.push(group.to_string());
        Ok(())
    }

    async fn composer_present(&mut self, _timeout: Duration) -> bool {
        self.probes_seen += 1;
        self.probes_seen > self.probes_until_open
    }

    async fn latest_roster_text(&mut self) -> Result<Option<String>> {
        if self.fetch_failures > 0 {
            self.fetch_failures -= 1;
            return Err(Error::Surface("scripted fetch failure".into()));
        }
        Ok(self.message.clone())
    }

    async fn insert_text(&mut self, text: &str) -> Result<()> {
        self.inserted.push(text.to_string());
        Ok(())
    }

    async fn submit(&mut self) -> Result<()> {
        self.submitted += 1;
        Ok(())
    }
}
