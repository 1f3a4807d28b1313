use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::GenerateError;
use crate::parser::extract::AgentRecord;
use crate::settings::TemplateConfig;

/// Handlebars registry shared by file name and content rendering.
/// Templates see the record as `agent`; absent optional fields are undefined.
pub struct TemplateEngine {
    hb: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new(strict: bool) -> Self {
        let mut hb = Handlebars::new();
        hb.set_strict_mode(strict);
        hb.register_escape_fn(handlebars::no_escape);
        hb.register_helper("slugify", Box::new(slugify_helper));
        hb.register_helper("uppercase", Box::new(uppercase_helper));
        hb.register_helper("lowercase", Box::new(lowercase_helper));
        hb.register_helper("json", Box::new(json_helper));
        TemplateEngine { hb }
    }

    pub fn render(
        &self,
        template: &str,
        record: &AgentRecord,
        what: &'static str,
    ) -> Result<String, GenerateError> {
        let context = json!({ "agent": agent_context(record)? });
        self.hb
            .render_template(template, &context)
            .map_err(|e| GenerateError::Render {
                what,
                source: Box::new(e),
            })
    }
}

// Absent optional fields are dropped rather than sent as null, so lenient
// templates render them as empty text (never "None") and strict ones fail.
fn agent_context(record: &AgentRecord) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    Ok(value)
}

/// Produces file content for one record.
pub trait Renderer {
    fn render(&self, engine: &TemplateEngine, record: &AgentRecord) -> Result<String, GenerateError>;
}

/// Renders a template file from the template directory.
pub struct TemplateRenderer {
    path: PathBuf,
}

impl TemplateRenderer {
    pub fn new(template_dir: &Path, template_file: &str) -> Self {
        TemplateRenderer {
            path: template_dir.join(template_file),
        }
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, engine: &TemplateEngine, record: &AgentRecord) -> Result<String, GenerateError> {
        let template =
            std::fs::read_to_string(&self.path).map_err(|source| GenerateError::TemplateRead {
                path: self.path.clone(),
                source,
            })?;
        engine.render(&template, record, "content template")
    }
}

/// Canonical JSON dump of the record, 4-space indented, fields in declaration order.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, _engine: &TemplateEngine, record: &AgentRecord) -> Result<String, GenerateError> {
        Ok(to_canonical_json(record)?)
    }
}

pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn renderer_for(config: &TemplateConfig, template_dir: &Path) -> Box<dyn Renderer> {
    match config.template_file.as_deref() {
        Some(file) if !file.is_empty() => Box::new(TemplateRenderer::new(template_dir, file)),
        _ => Box::new(JsonRenderer),
    }
}

// Handlebars helpers

fn slugify_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&slugify(param))?;
    Ok(())
}

fn uppercase_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&param.to_uppercase())?;
    Ok(())
}

fn lowercase_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&param.to_lowercase())?;
    Ok(())
}

fn json_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    if let Some(v) = h.param(0) {
        out.write(&serde_json::to_string(v.value()).unwrap_or_default())?;
    }
    Ok(())
}

/// "Document Analysis Agent" -> "document_analysis_agent"
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    for c in s.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

// ── Tests ──
