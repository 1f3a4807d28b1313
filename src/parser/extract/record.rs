use std::fmt;

use serde::Serialize;

use crate::error::ExtractError;

pub const UNNAMED_CLASS: &str = "UnnamedAgent";

/// Fields collected from one section before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub primary_function: Option<String>,
    pub agent_type: Option<String>,
    pub priority: Option<String>,
    pub resource_requirements: Option<String>,
}

impl ExtractedFields {
    pub const FIELD_NAMES: [&'static str; 6] = [
        "agent_id",
        "agent_name",
        "primary_function",
        "type",
        "priority",
        "resource_requirements",
    ];

    pub fn knows(name: &str) -> bool {
        Self::FIELD_NAMES.contains(&name)
    }

    /// Set a field by its configured name. Returns false for names the record doesn't know.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "agent_id" => &mut self.agent_id,
            "agent_name" => &mut self.agent_name,
            "primary_function" => &mut self.primary_function,
            "type" => &mut self.agent_type,
            "priority" => &mut self.priority,
            "resource_requirements" => &mut self.resource_requirements,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// A validated agent definition. Immutable once built.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AgentRecord {
    agent_id: String,
    agent_name: String,
    class_name: String,
    primary_function: Option<String>,
    #[serde(rename = "type")]
    agent_type: Option<String>,
    priority: Option<String>,
    resource_requirements: Option<String>,
    raw_section_text: String,
}

impl AgentRecord {
    pub fn new(fields: ExtractedFields, raw_section_text: &str) -> Result<Self, ExtractError> {
        let agent_id = required(fields.agent_id, "agent_id")?;
        let agent_name = required(fields.agent_name, "agent_name")?;
        let class_name = class_name_for(Some(&agent_name));
        Ok(AgentRecord {
            agent_id,
            agent_name,
            class_name,
            primary_function: fields.primary_function,
            agent_type: fields.agent_type,
            priority: fields.priority,
            resource_requirements: fields.resource_requirements,
            raw_section_text: raw_section_text.to_string(),
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn primary_function(&self) -> Option<&str> {
        self.primary_function.as_deref()
    }

    pub fn agent_type(&self) -> Option<&str> {
        self.agent_type.as_deref()
    }

    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    pub fn resource_requirements(&self) -> Option<&str> {
        self.resource_requirements.as_deref()
    }

    pub fn raw_section_text(&self) -> &str {
        &self.raw_section_text
    }
}

// Omits raw_section_text.
impl fmt::Debug for AgentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRecord")
            .field("agent_id", &self.agent_id)
            .field("agent_name", &self.agent_name)
            .field("class_name", &self.class_name)
            .field("primary_function", &self.primary_function)
            .field("type", &self.agent_type)
            .field("priority", &self.priority)
            .field("resource_requirements", &self.resource_requirements)
            .finish_non_exhaustive()
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ExtractError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ExtractError::MissingField(field)),
    }
}

/// "Document Analysis Agent" -> "DocumentAnalysisAgent". Blank or absent -> `UnnamedAgent`.
pub fn class_name_for(agent_name: Option<&str>) -> String {
    let joined: String = agent_name
        .unwrap_or_default()
        .split_whitespace()
        .map(capitalize)
        .collect();
    if joined.is_empty() {
        UNNAMED_CLASS.to_string()
    } else {
        joined
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ── Tests ──
