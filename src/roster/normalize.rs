//! Text normalization shared by the parser and the serializer.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Zero-width space, inserted after list ordinals so the chat client does
/// not re-number the line.
pub const ZWSP: char = '\u{200b}';

/// Invisible characters the chat client sprinkles into list items.
const ZERO_WIDTH: [char; 2] = [ZWSP, '\u{2060}'];

/// Case- and accent-insensitive comparison key.
///
/// NFKD-decomposes, drops combining marks and lower-cases, so "Hélio",
/// "HELIO" and "helio" all fold to the same key.
pub fn fold(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Remove zero-width characters and surrounding whitespace.
pub fn scrub(s: &str) -> String {
    s.chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Capitalize the first letter of every alphabetic run, lower-case the
/// rest. Matches how the lists are displayed in the chat, including names
/// like "isabella(unigran)".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
