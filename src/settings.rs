use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::ConfigError;

const ENV_PREFIX: &str = "AASF";

/// Top-level run configuration, mirroring the layout of `config.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub discovery_settings: DiscoverySettings,
    pub extraction_settings: ExtractionSettings,
    pub scaffolding_settings: ScaffoldSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: "INFO".to_string(),
            discovery_settings: DiscoverySettings::default(),
            extraction_settings: ExtractionSettings::default(),
            scaffolding_settings: ScaffoldSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    pub section_delimiter: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        DiscoverySettings {
            section_delimiter: "---".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub extraction_patterns: Option<PatternSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternSettings {
    /// Regex with `agent_id` and `agent_name` named groups.
    pub header: Option<String>,
    /// Field name -> regex whose first capture group is the value.
    pub attributes: BTreeMap<String, String>,
}

impl PatternSettings {
    pub fn is_empty(&self) -> bool {
        self.header.as_deref().map_or(true, str::is_empty) && self.attributes.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScaffoldSettings {
    pub output_directory: PathBuf,
    pub template_directory: PathBuf,
    pub strict_templates: bool,
    pub templates: Vec<TemplateConfig>,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        ScaffoldSettings {
            output_directory: PathBuf::from("generated_agents"),
            template_directory: PathBuf::from("templates"),
            strict_templates: false,
            templates: Vec::new(),
        }
    }
}

/// One file to produce per agent.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub output_filename_template: String,
    /// Template file under `template_directory`. `None` writes the record as JSON.
    #[serde(default)]
    pub template_file: Option<String>,
}

impl TemplateConfig {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

impl Settings {
    /// Load from a YAML file, then apply `AASF_*` environment overrides
    /// (`__` separates nesting levels).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::build(File::from(path).format(FileFormat::Yaml), ENV_PREFIX)
    }

    #[cfg(test)]
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Self::build(File::from_str(text, FileFormat::Yaml), ENV_PREFIX)
    }

    fn build<S>(source: S, env_prefix: &str) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_fixture_loads() {
        let s = Settings::load(Path::new("tests/fixtures/config.yaml")).unwrap();
        assert_eq!(s.discovery_settings.section_delimiter, "---");
        let patterns = s.extraction_settings.extraction_patterns.unwrap();
        assert!(patterns.header.unwrap().contains("agent_id"));
        assert!(patterns.attributes.contains_key("priority"));
        assert_eq!(s.scaffolding_settings.templates.len(), 2);
        assert!(s.scaffolding_settings.templates[1].template_file.is_none());
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let s = Settings::from_yaml_str("log_level: DEBUG\n").unwrap();
        assert_eq!(s.log_level, "DEBUG");
        assert_eq!(s.discovery_settings.section_delimiter, "---");
        assert!(s.extraction_settings.extraction_patterns.is_none());
        assert_eq!(
            s.scaffolding_settings.output_directory,
            PathBuf::from("generated_agents")
        );
        assert!(!s.scaffolding_settings.strict_templates);
    }

    #[test]
    fn template_file_null_means_json() {
        let yaml = r#"
scaffolding_settings:
  templates:
    - name: dump
      output_filename_template: "{{agent.agent_id}}.json"
      template_file: null
"#;
        let s = Settings::from_yaml_str(yaml).unwrap();
        let t = &s.scaffolding_settings.templates[0];
        assert_eq!(t.label(), "dump");
        assert!(t.template_file.is_none());
    }

    #[test]
    fn environment_overrides_yaml() {
        // Own prefix so parallel tests never see these variables.
        std::env::set_var("AASFENVTEST_LOG_LEVEL", "warning");
        std::env::set_var("AASFENVTEST_SCAFFOLDING_SETTINGS__OUTPUT_DIRECTORY", "elsewhere");
        let yaml = "log_level: DEBUG\nscaffolding_settings:\n  output_directory: from_yaml\n";
        let s = Settings::build(File::from_str(yaml, FileFormat::Yaml), "AASFENVTEST").unwrap();
        std::env::remove_var("AASFENVTEST_LOG_LEVEL");
        std::env::remove_var("AASFENVTEST_SCAFFOLDING_SETTINGS__OUTPUT_DIRECTORY");

        assert_eq!(s.log_level, "warning");
        assert_eq!(s.scaffolding_settings.output_directory, PathBuf::from("elsewhere"));
        assert_eq!(s.discovery_settings.section_delimiter, "---");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Settings::load(Path::new("tests/fixtures/nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn bad_yaml_is_malformed() {
        let err = Settings::from_yaml_str("log_level: [unclosed\n").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = Settings::from_yaml_str("scaffolding_settings:\n  templates: 7\n").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn empty_patterns() {
        assert!(PatternSettings::default().is_empty());
        let p = PatternSettings {
            header: Some("x".into()),
            attributes: BTreeMap::new(),
        };
        assert!(!p.is_empty());
    }
}
