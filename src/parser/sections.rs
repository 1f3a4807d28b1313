use tracing::{debug, info};

use crate::error::ConfigError;
use crate::settings::DiscoverySettings;

/// Splits a document into candidate agent blocks on a literal delimiter.
#[derive(Debug, Clone)]
pub struct SectionFinder {
    delimiter: String,
}

impl SectionFinder {
    pub fn new(settings: &DiscoverySettings) -> Result<Self, ConfigError> {
        if settings.section_delimiter.is_empty() {
            return Err(ConfigError::EmptyDelimiter);
        }
        debug!(delimiter = %settings.section_delimiter, "section finder ready");
        Ok(SectionFinder {
            delimiter: settings.section_delimiter.clone(),
        })
    }

    pub fn find_sections<'a>(&self, full_text: &'a str) -> Vec<&'a str> {
        let sections = find_sections(full_text, &self.delimiter);
        info!(count = sections.len(), "found non-empty sections");
        sections
    }
}

/// Trimmed, non-empty fragments between delimiters, in source order.
pub fn find_sections<'a>(full_text: &'a str, delimiter: &str) -> Vec<&'a str> {
    full_text
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        let text = "--- id: a1\nname: Agent One\n---\nnot an agent\n--- id: a2\n";
        assert_eq!(
            find_sections(text, "---"),
            vec!["id: a1\nname: Agent One", "not an agent", "id: a2"]
        );
    }

    #[test]
    fn no_delimiter_yields_whole_document() {
        assert_eq!(find_sections("  just one block \n", "==="), vec!["just one block"]);
    }

    #[test]
    fn blank_document_yields_nothing() {
        assert!(find_sections(" \n\t \n", "---").is_empty());
        assert!(find_sections("", "---").is_empty());
    }

    #[test]
    fn delimiter_is_literal_not_regex() {
        assert_eq!(find_sections("a.*b.*c", ".*"), vec!["a", "b", "c"]);
        assert_eq!(find_sections("abc", ".*"), vec!["abc"]);
    }

    #[test]
    fn never_returns_blank_entries_and_keeps_order() {
        let text = "---\n---  \n first \n---\n\n---second---third\n---";
        let sections = find_sections(text, "---");
        assert!(sections.iter().all(|s| !s.trim().is_empty()));
        assert_eq!(sections, vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicates_are_kept() {
        assert_eq!(find_sections("x---x", "---"), vec!["x", "x"]);
    }

    #[test]
    fn empty_delimiter_rejected() {
        let settings = DiscoverySettings {
            section_delimiter: String::new(),
        };
        assert!(matches!(
            SectionFinder::new(&settings),
            Err(ConfigError::EmptyDelimiter)
        ));
    }

    #[test]
    fn finder_uses_configured_delimiter() {
        let finder = SectionFinder::new(&DiscoverySettings {
            section_delimiter: "###".into(),
        })
        .unwrap();
        assert_eq!(finder.find_sections("a ### b"), vec!["a", "b"]);
    }
}
