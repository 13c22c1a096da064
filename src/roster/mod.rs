//! Roster parsing, name insertion and list reconstruction.
//!
//! The roster is a free-form chat message with a "going" section and a
//! "returning" section, each an ordered list of names. [`RosterCodec`]
//! turns the raw text into a [`Roster`] and back into the chat's display
//! form; [`compose_reply`] is the whole edit pipeline in one call.

mod date;
mod insert;
mod normalize;
mod parse;
mod render;

pub use date::is_current;
pub use insert::insert_name;
pub use normalize::{fold, scrub, title_case, ZWSP};

use regex::Regex;

use crate::config::{ParseStrategy, RosterConfig};

/// One roster section: an optional departure-time token plus the names in
/// posting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub time: Option<String>,
    pub names: Vec<String>,
}

impl Section {
    /// Case- and accent-insensitive membership check.
    pub fn contains(&self, name: &str) -> bool {
        let key = fold(name);
        self.names.iter().any(|n| fold(n) == key)
    }
}

/// A parsed roster message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub header: String,
    pub going: Section,
    pub returning: Section,
}

impl Roster {
    /// True when parsing found nothing usable — the soft-failure form
    /// returned for text missing either section marker.
    pub fn is_empty(&self) -> bool {
        self.going.names.is_empty()
            && self.returning.names.is_empty()
            && self.going.time.is_none()
            && self.returning.time.is_none()
    }
}

/// Parser + serializer for roster messages, with the section markers and
/// patterns compiled once.
pub struct RosterCodec {
    strategy: ParseStrategy,
    going_marker: String,
    returning_marker: String,
    index_base: u32,
    /// Ordinal prefix on a list line, e.g. "3. ".
    ordinal: Regex,
    /// A line that is nothing but a time token, e.g. "11:15".
    time_line: Regex,
    /// A time token anywhere in a section title.
    time_any: Regex,
}

impl RosterCodec {
    pub fn new(config: &RosterConfig) -> Self {
        Self {
            strategy: config.strategy,
            going_marker: config.going_marker.clone(),
            returning_marker: config.returning_marker.clone(),
            index_base: config.index_base,
            ordinal: Regex::new(r"^\s*\d+\.\s*").expect("hard-coded pattern"),
            time_line: Regex::new(r"^\d{1,2}:\d{2}$").expect("hard-coded pattern"),
            time_any: Regex::new(r"\d{1,2}:\d{2}").expect("hard-coded pattern"),
        }
    }
}

/// Outcome of [`compose_reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
    /// The edited roster, ready to post.
    Reply(String),
    /// The configured name already appears somewhere in the raw message.
    AlreadyListed,
    /// The message does not carry both section markers.
    Unusable,
}

/// Full edit pipeline: parse the raw message, append the configured name,
/// serialize the result.
pub fn compose_reply(config: &RosterConfig, raw: &str) -> Composed {
    if fold(raw).contains(&fold(&config.insert_name)) {
        return Composed::AlreadyListed;
    }
    let codec = RosterCodec::new(config);
    let mut roster = codec.parse(raw);
    if roster.is_empty() {
        return Composed::Unusable;
    }
    insert_name(&mut roster, &config.insert_name, config.mode);
    Composed::Reply(codec.render(&roster))
}
