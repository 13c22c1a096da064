use super::Roster;
use crate::config::InsertMode;

/// Append `name` to the returning section (and to going when
/// `mode` is [`InsertMode::Both`]), skipping any section that already
/// holds a case/accent-insensitive match. Idempotent.
pub fn insert_name(roster: &mut Roster, name: &str, mode: InsertMode) {
    if mode == InsertMode::Both && !roster.going.contains(name) {
        roster.going.names.push(name.to_string());
    }
    if !roster.returning.contains(name) {
        roster.returning.names.push(name.to_string());
    }
}
