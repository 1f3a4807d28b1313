pub mod matcher;
pub mod record;

use tracing::{debug, error, info, warn};

use crate::error::ConfigError;
use crate::settings::ExtractionSettings;
use matcher::{AttributeMatcher, FieldMatcher, HeaderMatcher};
pub use record::{AgentRecord, ExtractedFields};

/// Pulls one validated `AgentRecord` out of a section, or nothing.
pub struct RecordExtractor {
    header: Box<dyn FieldMatcher>,
    attributes: Box<dyn FieldMatcher>,
}

impl RecordExtractor {
    pub fn new(header: Box<dyn FieldMatcher>, attributes: Box<dyn FieldMatcher>) -> Self {
        RecordExtractor { header, attributes }
    }

    pub fn from_settings(settings: &ExtractionSettings) -> Result<Self, ConfigError> {
        let patterns = settings
            .extraction_patterns
            .as_ref()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingPatterns)?;
        let header_pattern = patterns
            .header
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHeader)?;

        let header = HeaderMatcher::new(header_pattern)?;
        let attributes = AttributeMatcher::new(&patterns.attributes)?;
        for name in patterns.attributes.keys() {
            if !ExtractedFields::knows(name) {
                warn!(attribute = %name, "attribute is not a record field and will be ignored");
            }
        }
        debug!(attributes = attributes.len(), "record extractor ready");
        Ok(RecordExtractor::new(Box::new(header), Box::new(attributes)))
    }

    pub fn extract(&self, section: &str) -> Option<AgentRecord> {
        // Sections without a header are ordinary prose, not errors.
        let header = self.header.match_fields(section)?;
        let mut fields = ExtractedFields::default();
        apply(&mut fields, header);

        info!(
            agent_id = fields.agent_id.as_deref().unwrap_or("<none>"),
            "found potential agent header"
        );

        if let Some(attributes) = self.attributes.match_fields(section) {
            apply(&mut fields, attributes);
        }

        let attempted_id = fields.agent_id.clone();
        match AgentRecord::new(fields, section) {
            Ok(record) => {
                debug!(
                    agent_id = record.agent_id(),
                    lines = record.raw_section_text().lines().count(),
                    "agent validated"
                );
                Some(record)
            }
            Err(e) => {
                error!(
                    agent_id = attempted_id.as_deref().unwrap_or("<none>"),
                    error = %e,
                    "validation failed for agent"
                );
                None
            }
        }
    }
}

fn apply(fields: &mut ExtractedFields, found: impl IntoIterator<Item = (String, String)>) {
    for (name, value) in found {
        if !fields.set(&name, value) {
            debug!(field = %name, "ignoring unknown field");
        }
    }
}

// ── Tests ──
