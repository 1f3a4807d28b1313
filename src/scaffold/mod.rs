pub mod render;

use std::path::{Component, Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use crate::error::GenerateError;
use crate::parser::extract::AgentRecord;
use crate::settings::{ScaffoldSettings, TemplateConfig};
use render::{renderer_for, Renderer, TemplateEngine};

/// One file that could not be produced.
#[derive(Debug)]
pub struct GenerationFailure {
    pub agent_id: String,
    pub template: String,
    pub reason: GenerateError,
}

/// Outcome of one generation pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<GenerationFailure>,
}

struct Plan {
    config: TemplateConfig,
    renderer: Box<dyn Renderer>,
}

/// Renders every (record, template) pair into the output directory.
pub struct ScaffoldGenerator {
    output_dir: PathBuf,
    engine: TemplateEngine,
    plans: Vec<Plan>,
}

impl ScaffoldGenerator {
    pub fn new(settings: &ScaffoldSettings) -> Self {
        let plans = settings
            .templates
            .iter()
            .map(|config| Plan {
                renderer: renderer_for(config, &settings.template_directory),
                config: config.clone(),
            })
            .collect::<Vec<_>>();
        debug!(
            output_dir = %settings.output_directory.display(),
            templates = plans.len(),
            "scaffold generator ready"
        );
        ScaffoldGenerator {
            output_dir: settings.output_directory.clone(),
            engine: TemplateEngine::new(settings.strict_templates),
            plans,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Only a failure to create the output directory is fatal; per-file failures
    /// are logged and collected in the report.
    pub fn build_all(&self, records: &[AgentRecord]) -> Result<BuildReport, GenerateError> {
        info!(agents = records.len(), "starting scaffolding");
        std::fs::create_dir_all(&self.output_dir).map_err(|source| {
            GenerateError::OutputDirectory {
                path: self.output_dir.clone(),
                source,
            }
        })?;

        let pb = ProgressBar::new((records.len() * self.plans.len()) as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} files")
        {
            pb.set_style(style.progress_chars("=> "));
        }

        let mut report = BuildReport::default();
        for record in records {
            info!(agent_id = record.agent_id(), "scaffolding files for agent");
            for plan in &self.plans {
                match self.generate_file(record, plan) {
                    Ok(path) => {
                        info!(path = %path.display(), "created file");
                        report.written.push(path);
                    }
                    Err(e) => {
                        error!(
                            agent_id = record.agent_id(),
                            template = plan.config.label(),
                            error = %e,
                            "failed to generate file"
                        );
                        report.failures.push(GenerationFailure {
                            agent_id: record.agent_id().to_string(),
                            template: plan.config.label().to_string(),
                            reason: e,
                        });
                    }
                }
                pb.inc(1);
            }
        }
        pb.finish_and_clear();

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "scaffolding finished"
        );
        Ok(report)
    }

    fn generate_file(&self, record: &AgentRecord, plan: &Plan) -> Result<PathBuf, GenerateError> {
        let file_name = self
            .engine
            .render(&plan.config.output_filename_template, record, "file name")?;
        let path = self.output_dir.join(checked_file_name(&file_name)?);
        let content = plan.renderer.render(&self.engine, record)?;
        std::fs::write(&path, content).map_err(|source| GenerateError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// A rendered name must be a single plain path component, so every file lands
/// directly in the output directory.
fn checked_file_name(name: &str) -> Result<&Path, GenerateError> {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(GenerateError::InvalidFileName(name.to_string())),
    }
}

// ── Tests ──
