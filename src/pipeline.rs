use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::error::{ConfigError, PipelineError};
use crate::ingest::ReaderRegistry;
use crate::parser::extract::{AgentRecord, RecordExtractor};
use crate::parser::sections::SectionFinder;
use crate::scaffold::{BuildReport, ScaffoldGenerator};
use crate::settings::Settings;

/// How a successful run ended.
#[derive(Debug)]
pub enum Completion {
    NothingExtracted,
    Generated(BuildReport),
}

#[derive(Debug)]
pub enum RunOutcome {
    Done(Completion),
    Failed(PipelineError),
}

impl RunOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed(_))
    }
}

enum Stage {
    Reading,
    Discovering(String),
    Extracting(Vec<String>),
    Generating(Vec<AgentRecord>),
    Finished(RunOutcome),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Reading => "reading",
            Stage::Discovering(_) => "discovering",
            Stage::Extracting(_) => "extracting",
            Stage::Generating(_) => "generating",
            Stage::Finished(RunOutcome::Done(_)) => "done",
            Stage::Finished(RunOutcome::Failed(_)) => "failed",
        }
    }
}

/// read -> discover -> extract -> generate, one document per run.
pub struct Pipeline {
    readers: ReaderRegistry,
    finder: SectionFinder,
    extractor: RecordExtractor,
    generator: ScaffoldGenerator,
}

impl Pipeline {
    /// Validates the whole configuration up front; nothing touches the input yet.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Pipeline {
            readers: ReaderRegistry::default(),
            finder: SectionFinder::new(&settings.discovery_settings)?,
            extractor: RecordExtractor::from_settings(&settings.extraction_settings)?,
            generator: ScaffoldGenerator::new(&settings.scaffolding_settings),
        })
    }

    #[cfg(test)]
    pub fn with_readers(mut self, readers: ReaderRegistry) -> Self {
        self.readers = readers;
        self
    }

    pub fn output_dir(&self) -> &Path {
        self.generator.output_dir()
    }

    pub fn run(&self, input: &Path) -> RunOutcome {
        info!(input = %input.display(), "===== pipeline started =====");
        let mut stage = Stage::Reading;
        loop {
            debug!(stage = stage.name(), "entering stage");
            stage = match stage {
                Stage::Reading => match self.readers.read(input) {
                    Ok(text) => Stage::Discovering(text),
                    Err(e) => Stage::Finished(RunOutcome::Failed(e.into())),
                },
                Stage::Discovering(text) => {
                    let sections: Vec<String> = self
                        .finder
                        .find_sections(&text)
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                    if sections.is_empty() {
                        warn!("no sections found in document");
                        Stage::Finished(RunOutcome::Done(Completion::NothingExtracted))
                    } else {
                        Stage::Extracting(sections)
                    }
                }
                Stage::Extracting(sections) => {
                    let records: Vec<AgentRecord> = sections
                        .iter()
                        .filter_map(|s| self.extractor.extract(s))
                        .collect();
                    if records.is_empty() {
                        warn!("no valid agent definitions were extracted");
                        Stage::Finished(RunOutcome::Done(Completion::NothingExtracted))
                    } else {
                        info!(agents = records.len(), "extracted agent definitions");
                        Stage::Generating(records)
                    }
                }
                Stage::Generating(records) => match self.generator.build_all(&records) {
                    Ok(report) => Stage::Finished(RunOutcome::Done(Completion::Generated(report))),
                    Err(e) => Stage::Finished(RunOutcome::Failed(e.into())),
                },
                Stage::Finished(outcome) => break self.finish(outcome),
            };
        }
    }

    fn finish(&self, outcome: RunOutcome) -> RunOutcome {
        match &outcome {
            RunOutcome::Done(_) => info!("===== pipeline finished ====="),
            RunOutcome::Failed(e) => error!(category = e.category(), error = %e, "pipeline failed"),
        }
        outcome
    }

    /// Records the extractor would produce for `text`, without generating anything.
    pub fn extract_text(&self, text: &str) -> Vec<AgentRecord> {
        self.finder
            .find_sections(text)
            .into_iter()
            .filter_map(|s| self.extractor.extract(s))
            .collect()
    }
}

// ── Tests ──
