//! Serializing a [`Roster`] back into the chat's display form.

use super::normalize::{title_case, ZWSP};
use super::{Roster, RosterCodec, Section};

impl RosterCodec {
    /// Render the roster the way the chat client displays it: section
    /// titles carry their time token verbatim, every item gets an ordinal
    /// and a zero-width space so the client's auto-list feature leaves the
    /// numbering alone, names are title-cased.
    pub fn render(&self, roster: &Roster) -> String {
        let mut out = String::new();
        if !roster.header.trim().is_empty() {
            out.push_str(roster.header.trim());
            out.push_str("\n\n");
        }
        self.render_section(&mut out, &roster.going, &self.going_marker);
        out.push('\n');
        self.render_section(&mut out, &roster.returning, &self.returning_marker);
        collapse_blanks(&out)
    }

    fn render_section(&self, out: &mut String, section: &Section, marker: &str) {
        // A bare time token that survived in the name list belongs to the
        // section title, never to the numbering.
        let mut time = section.time.clone();
        let mut names = Vec::with_capacity(section.names.len());
        for name in &section.names {
            if self.time_line.is_match(name) {
                time.get_or_insert_with(|| name.clone());
            } else {
                names.push(name);
            }
        }

        match time {
            Some(ref t) => out.push_str(&format!("{} {}\n", marker, t)),
            None => {
                out.push_str(marker);
                out.push('\n');
            }
        }
        for (i, name) in names.iter().enumerate() {
            out.push_str(&format!(
                "{}.{}{}\n",
                self.index_base + i as u32,
                ZWSP,
                title_case(name)
            ));
        }
    }
}

/// Collapse runs of three or more blank lines down to one and trim the
/// ends.
fn collapse_blanks(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blanks = 0usize;
    for line in text.lines() {
        if line.trim().is_empty() {
            blanks += 1;
        } else {
            let keep = if blanks >= 3 { 1 } else { blanks };
            out.extend(std::iter::repeat("").take(keep));
            blanks = 0;
            out.push(line.trim_end());
        }
    }
    out.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterConfig;

    fn codec() -> RosterCodec {
        RosterCodec::new(&RosterConfig::for_name("Helio"))
    }

    fn section(time: Option<&str>, names: &[&str]) -> Section {
        Section {
            time: time.map(String::from),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_numbered_with_zwsp() {
        let roster = Roster {
            header: String::new(),
            going: section(Some("11:15"), &["isabella"]),
            returning: section(Some("17:30"), &["jaqueline", "antonio"]),
        };
        let text = codec().render(&roster);
        assert_eq!(
            text,
            format!(
                "Ida 11:15\n1.{z}Isabella\n\nVolta 17:30\n1.{z}Jaqueline\n2.{z}Antonio",
                z = ZWSP
            )
        );
    }

    #[test]
    fn test_render_header_first() {
        let roster = Roster {
            header: "terça-feira 23/09".to_string(),
            going: section(Some("11:15"), &["Ana"]),
            returning: section(Some("17:30"), &["Bia"]),
        };
        let text = codec().render(&roster);
        assert!(text.starts_with("terça-feira 23/09\n\nIda 11:15\n"));
    }

    #[test]
    fn test_render_promotes_time_token_from_name_list() {
        // "11:15" sitting inside the list becomes the section title, and
        // the numbering skips it.
        let roster = Roster {
            header: String::new(),
            going: section(None, &["11:15", "isabella"]),
            returning: section(Some("17:30"), &["Bia"]),
        };
        let text = codec().render(&roster);
        assert!(text.starts_with(&format!("Ida 11:15\n1.{}Isabella\n", ZWSP)));
    }

    #[test]
    fn test_render_zero_index_base() {
        let mut config = RosterConfig::for_name("Helio");
        config.index_base = 0;
        let roster = Roster {
            header: String::new(),
            going: section(Some("11:15"), &["Ana", "Bia"]),
            returning: section(Some("17:30"), &["Clara"]),
        };
        let text = RosterCodec::new(&config).render(&roster);
        assert!(text.contains(&format!("0.{}Ana", ZWSP)));
        assert!(text.contains(&format!("1.{}Bia", ZWSP)));
    }

    #[test]
    fn test_render_section_without_time() {
        let roster = Roster {
            header: String::new(),
            going: section(None, &["Ana"]),
            returning: section(Some("17:30"), &["Bia"]),
        };
        let text = codec().render(&roster);
        assert!(text.starts_with(&format!("Ida\n1.{}Ana\n", ZWSP)));
    }

    #[test]
    fn test_collapse_blanks() {
        assert_eq!(collapse_blanks("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blanks("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blanks("\n\na\n\n\n"), "a");
    }
}
