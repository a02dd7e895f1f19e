//! Shared configuration loader for the dossier report viewer.
//!
//! `defaults/dossier.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DossierConfig`].
//!
//! The reference-section marker set lives here as data (`[[detection.markers]]`)
//! so detection strictness and vocabulary can change without touching code.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/dossier.default.toml");

/// Top-level configuration consumed by dossier applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DossierConfig {
    pub detection: DetectionConfig,
    pub rendering: RenderingConfig,
    pub references: ReferencesConfig,
    pub boundary: BoundaryConfig,
    pub labels: LabelsConfig,
}

/// Reference-section detector knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    pub strictness: Strictness,
    pub numbering_prefixes: Vec<String>,
    pub markers: Vec<MarkerRuleConfig>,
}

/// How the detector decides that a marker is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Raw, case-insensitive substring match over the whole text.
    #[default]
    Substring,
    /// Only heading nodes of the parsed document count.
    Heading,
}

/// One vocabulary entry of the marker set: a term in a language, the heading
/// levels it is recognised at, and whether numbered or bare forms count too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkerRuleConfig {
    pub language: String,
    pub term: String,
    pub heading_levels: Vec<u8>,
    #[serde(default)]
    pub numbered: bool,
    #[serde(default)]
    pub bare: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderingConfig {
    pub max_depth: usize,
    pub title: String,
    pub lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferencesConfig {
    pub malformed: MalformedPolicy,
    pub placeholder_title: String,
}

/// What to do with a reference record missing its title or url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedPolicy {
    #[default]
    Skip,
    Placeholder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundaryConfig {
    pub fallback: FallbackPolicy,
}

/// What the render boundary shows after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    #[default]
    Placeholder,
    LastGood,
}

/// Reader-facing strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelsConfig {
    pub prompt_title: String,
    pub prompt_subtitle: String,
    pub loading: String,
    pub back: String,
    pub generating: String,
    pub conclusions_heading: String,
    pub references_heading: String,
    pub credibility: String,
    pub error_title: String,
    pub dismiss: String,
    pub failure_title: String,
    pub failure_body: String,
    pub retry: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DossierConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DossierConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.detection.strictness, Strictness::Substring);
        assert_eq!(config.detection.numbering_prefixes, vec!["9. ".to_string()]);
        assert_eq!(config.detection.markers.len(), 4);
        assert_eq!(config.rendering.max_depth, 264);
        assert_eq!(config.references.malformed, MalformedPolicy::Skip);
        assert_eq!(config.boundary.fallback, FallbackPolicy::Placeholder);
        assert_eq!(config.labels.references_heading, "参考文献");
    }

    #[test]
    fn default_markers_cover_both_languages() {
        let config = load_defaults().expect("defaults to deserialize");
        let english = &config.detection.markers[0];
        assert_eq!(english.language, "en");
        assert_eq!(english.term, "references");
        assert_eq!(english.heading_levels, vec![1, 2, 3]);
        assert!(!english.bare);

        let bare: Vec<_> = config
            .detection
            .markers
            .iter()
            .filter(|rule| rule.bare)
            .map(|rule| rule.term.as_str())
            .collect();
        assert_eq!(bare, vec!["参考资料", "引用资料"]);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("detection.strictness", "heading")
            .expect("override to apply")
            .set_override("boundary.fallback", "last-good")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.detection.strictness, Strictness::Heading);
        assert_eq!(config.boundary.fallback, FallbackPolicy::LastGood);
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[references]\nmalformed = \"placeholder\"\nplaceholder_title = \"Untitled\"\n\n[labels]\nback = \"Back\""
        )
        .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.references.malformed, MalformedPolicy::Placeholder);
        assert_eq!(config.references.placeholder_title, "Untitled");
        assert_eq!(config.labels.back, "Back");
        // Untouched keys keep their defaults.
        assert_eq!(config.labels.retry, "重试");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/dossier.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.rendering.lang, "zh");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/definitely/not/here/dossier.toml")
            .build();
        assert!(result.is_err());
    }
}
