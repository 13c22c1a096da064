//! The two parsing strategies behind [`RosterCodec::parse`].

use super::normalize::{fold, scrub};
use super::{Roster, RosterCodec, Section};
use crate::config::ParseStrategy;

impl RosterCodec {
    /// Parse a raw message into a [`Roster`].
    ///
    /// Fails softly: text missing either section marker (or with the
    /// markers out of order) yields an empty roster instead of an error.
    pub fn parse(&self, raw: &str) -> Roster {
        match self.strategy {
            ParseStrategy::MarkerSplit => self.parse_marker_split(raw),
            ParseStrategy::TitleLines => self.parse_title_lines(raw),
        }
    }

    /// Split on the first occurrence of the returning marker, then on the
    /// first going marker inside what precedes it. Anything before the
    /// going marker is the header.
    fn parse_marker_split(&self, raw: &str) -> Roster {
        let Some(returning_at) = raw.find(&self.returning_marker) else {
            return Roster::default();
        };
        let before = &raw[..returning_at];
        let after = &raw[returning_at + self.returning_marker.len()..];
        let Some(going_at) = before.find(&self.going_marker) else {
            return Roster::default();
        };

        Roster {
            header: before[..going_at].trim().to_string(),
            going: self.clean_region(&before[going_at + self.going_marker.len()..]),
            returning: self.clean_region(after),
        }
    }

    /// Line-oriented heuristic for rosters without reliable numbering: a
    /// line whose folded form contains a section keyword opens that
    /// section, later non-empty lines are its items, anything before the
    /// first title is header.
    fn parse_title_lines(&self, raw: &str) -> Roster {
        let going_key = fold(&self.going_marker);
        let returning_key = fold(&self.returning_marker);

        let mut roster = Roster::default();
        let mut header = Vec::new();
        let mut seen_going = false;
        let mut seen_returning = false;

        for line in raw.lines() {
            let cleaned = scrub(line);
            if cleaned.is_empty() {
                continue;
            }
            let key = fold(&cleaned);
            if !seen_returning && key.contains(&returning_key) {
                seen_returning = true;
                roster.returning.time = self.extract_time(&cleaned);
                continue;
            }
            if !seen_going && !seen_returning && key.contains(&going_key) {
                seen_going = true;
                roster.going.time = self.extract_time(&cleaned);
                continue;
            }
            if seen_returning {
                self.push_line(&mut roster.returning, &cleaned);
            } else if seen_going {
                self.push_line(&mut roster.going, &cleaned);
            } else {
                header.push(line.trim_end());
            }
        }

        if !(seen_going && seen_returning) {
            return Roster::default();
        }
        roster.header = header.join("\n").trim().to_string();
        roster
    }

    fn clean_region(&self, region: &str) -> Section {
        let mut section = Section::default();
        for line in region.lines() {
            let cleaned = scrub(line);
            if !cleaned.is_empty() {
                self.push_line(&mut section, &cleaned);
            }
        }
        section
    }

    /// Add one cleaned line to a section: strip the ordinal prefix,
    /// capture a bare time token as the section time, suppress
    /// case/accent-insensitive duplicates.
    fn push_line(&self, section: &mut Section, line: &str) {
        let name = self.ordinal.replace(line, "").trim().to_string();
        if name.is_empty() {
            return;
        }
        if self.time_line.is_match(&name) {
            if section.time.is_none() {
                section.time = Some(name);
            }
            return;
        }
        if !section.contains(&name) {
            section.names.push(name);
        }
    }

    fn extract_time(&self, line: &str) -> Option<String> {
        self.time_any.find(line).map(|m| m.as_str().to_string())
    }
}
