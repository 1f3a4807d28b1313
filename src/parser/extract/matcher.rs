use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Given a block of text, produce field name -> matched string.
/// `None` means the text is not relevant to this matcher at all.
pub trait FieldMatcher {
    fn match_fields(&self, text: &str) -> Option<BTreeMap<String, String>>;
}

pub const REQUIRED_HEADER_GROUPS: [&str; 2] = ["agent_id", "agent_name"];

fn compile(name: &str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

/// First match of the header pattern; every named group that took part becomes a field.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    re: Regex,
}

impl HeaderMatcher {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let re = compile("header", pattern)?;
        for group in REQUIRED_HEADER_GROUPS {
            if !re.capture_names().flatten().any(|n| n == group) {
                return Err(ConfigError::MissingHeaderGroup(group));
            }
        }
        Ok(HeaderMatcher { re })
    }
}

impl FieldMatcher for HeaderMatcher {
    fn match_fields(&self, text: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.re.captures(text)?;
        let fields = self
            .re
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
            .collect();
        Some(fields)
    }
}

/// One pattern per optional field, each searched over the whole text independently.
#[derive(Debug, Clone, Default)]
pub struct AttributeMatcher {
    patterns: Vec<(String, Regex)>,
}

impl AttributeMatcher {
    pub fn new(attributes: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let patterns = attributes
            .iter()
            .map(|(name, pattern)| Ok((name.clone(), compile(name, pattern)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(AttributeMatcher { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

impl FieldMatcher for AttributeMatcher {
    /// Always `Some`; fields whose pattern finds nothing are simply absent.
    fn match_fields(&self, text: &str) -> Option<BTreeMap<String, String>> {
        let mut fields = BTreeMap::new();
        for (name, re) in &self.patterns {
            let Some(caps) = re.captures(text) else {
                continue;
            };
            // Group 1 when the pattern has one, otherwise the whole match.
            let value = if re.captures_len() > 1 { caps.get(1) } else { caps.get(0) };
            if let Some(m) = value {
                fields.insert(name.clone(), m.as_str().trim().to_string());
            }
        }
        Some(fields)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r"^id:\s*(?P<agent_id>\S+)\s*\nname:\s*(?P<agent_name>.+)$";

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn header_uses_line_anchors() {
        let m = HeaderMatcher::new(HEADER).unwrap();
        let fields = m
            .match_fields("preamble line\nid: a7\nname: Seventh Agent\ntrailer")
            .unwrap();
        assert_eq!(fields["agent_id"], "a7");
        assert_eq!(fields["agent_name"], "Seventh Agent");
    }

    #[test]
    fn header_no_match_is_none() {
        let m = HeaderMatcher::new(HEADER).unwrap();
        assert!(m.match_fields("not an agent").is_none());
    }

    #[test]
    fn header_keeps_extra_groups_and_skips_unmatched_optional_ones() {
        let m = HeaderMatcher::new(
            r"^(?P<agent_id>\w+) (?P<agent_name>\w+)(?: \[(?P<type>\w+)\])?(?: <(?P<priority>\w+)>)?",
        )
        .unwrap();
        let fields = m.match_fields("a1 Scout [recon]").unwrap();
        assert_eq!(fields.get("type").map(String::as_str), Some("recon"));
        assert!(!fields.contains_key("priority"));
    }

    #[test]
    fn header_requires_both_named_groups() {
        assert!(matches!(
            HeaderMatcher::new(r"(?P<agent_id>\w+)"),
            Err(ConfigError::MissingHeaderGroup("agent_name"))
        ));
        assert!(matches!(
            HeaderMatcher::new(r"(?P<agent_name>\w+)"),
            Err(ConfigError::MissingHeaderGroup("agent_id"))
        ));
    }

    #[test]
    fn invalid_regex_is_config_error() {
        let err = HeaderMatcher::new(r"(?P<agent_id>[").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { name, .. } if name == "header"));
        let err = AttributeMatcher::new(&attrs(&[("priority", "(")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { name, .. } if name == "priority"));
    }

    #[test]
    fn attributes_take_first_group_trimmed() {
        let m = AttributeMatcher::new(&attrs(&[
            ("priority", r"^priority:(.+)$"),
            ("type", r"^type:\s*(\w+)"),
        ]))
        .unwrap();
        let fields = m.match_fields("type: worker\npriority:   high   \n").unwrap();
        assert_eq!(fields["priority"], "high");
        assert_eq!(fields["type"], "worker");
    }

    #[test]
    fn attributes_are_independent() {
        let m = AttributeMatcher::new(&attrs(&[
            ("priority", r"priority:\s*(\w+)"),
            ("resource_requirements", r"resources:\s*(.+)"),
        ]))
        .unwrap();
        let fields = m.match_fields("priority: low").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["priority"], "low");
    }

    #[test]
    fn first_attribute_match_wins() {
        let m = AttributeMatcher::new(&attrs(&[("priority", r"priority:\s*(\w+)")])).unwrap();
        let fields = m.match_fields("priority: low\npriority: high").unwrap();
        assert_eq!(fields["priority"], "low");
    }

    #[test]
    fn attribute_without_group_uses_whole_match() {
        let m = AttributeMatcher::new(&attrs(&[("type", r"\bGPU\b")])).unwrap();
        let fields = m.match_fields("needs a GPU to run").unwrap();
        assert_eq!(fields["type"], "GPU");
    }

    #[test]
    fn attribute_with_unmatched_group_is_absent() {
        let m = AttributeMatcher::new(&attrs(&[("priority", r"priority(?::\s*(\w+))?")])).unwrap();
        let fields = m.match_fields("priority").unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn no_attributes_yields_empty_map() {
        let m = AttributeMatcher::default();
        assert_eq!(m.len(), 0);
        assert_eq!(m.match_fields("anything"), Some(BTreeMap::new()));
    }
}
