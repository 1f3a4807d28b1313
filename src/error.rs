use std::path::PathBuf;

use thiserror::Error;

/// Problems with the configuration. Always fatal, raised before the input is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("{0}")]
    Malformed(String),

    #[error("extraction patterns not found in configuration")]
    MissingPatterns,

    #[error("header pattern is missing in configuration")]
    MissingHeader,

    #[error("header pattern must declare the named group '{0}'")]
    MissingHeaderGroup(&'static str),

    #[error("pattern '{name}' is not a valid regular expression: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("section delimiter must not be empty")]
    EmptyDelimiter,
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Malformed(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no reader available for file type '{extension}'")]
    Unsupported { extension: String },

    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::NotFound(path.to_path_buf())
        } else {
            IngestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("could not create output directory {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not render {what}: {source}")]
    Render {
        what: &'static str,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("could not serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not read template {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rendered file name '{0}' is not a plain file name")]
    InvalidFileName(String),

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reason a run ended in the `Failed` state.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl PipelineError {
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::Ingest(_) => "ingestion",
            PipelineError::Generate(_) => "generation",
        }
    }
}

// ── Tests ──
