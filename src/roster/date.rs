//! Freshness heuristic: is this message the roster for the next trip?
//!
//! Rosters are posted the evening before, so the message usually names
//! tomorrow; same-day posts are accepted too.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::normalize::fold;

const WEEKDAY_NAMES: [&str; 7] = [
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
    "domingo",
];

fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// True when the text mentions tomorrow's or today's `dd/mm` date or
/// weekday name (case- and accent-insensitive).
pub fn is_current(raw: &str, today: NaiveDate) -> bool {
    let text = fold(raw);
    for date in [today + Duration::days(1), today] {
        let token = format!("{:02}/{:02}", date.day(), date.month());
        if text.contains(&token) {
            return true;
        }
        if text.contains(&fold(weekday_name(date.weekday()))) {
            return true;
        }
    }
    false
}
