//! Completion engine configuration
//!
//! The block markers, grammar bounds and inference policy live in
//! `defaults/csd.default.toml`, compiled into the crate. A [`Loader`] starts
//! from that file and stacks transcript-specific settings over it, in order:
//! files, inline TOML, then single keys such as `grammar.mode`. Later layers
//! win. [`CompletionConfig::default`] must agree with the TOML file.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/csd.default.toml");

/// Everything that shapes the patterns a [`crate::csd::engine::CompletionEngine`] produces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionConfig {
    pub markers: Markers,
    pub grammar: GrammarConfig,
    pub inference: InferenceConfig,
}

/// Block delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: "[[".into(),
            end: "]]".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrammarMode {
    /// Any syntactically plausible proposition; type checking happens on replay.
    FreeForm,
    /// Only propositions over the objects and predicates declared so far.
    Enumerated,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrammarConfig {
    pub mode: GrammarMode,
    pub max_identifier_length: usize,
    pub max_equation_length: usize,
    /// Nesting depth of function applications inside free-form terms.
    pub term_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExhaustedPolicy {
    /// `is_complete` reports that the transcript is not yet decidable.
    Undetermined,
    /// `is_complete` reports a finished proof with an unknown answer.
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InferenceConfig {
    /// Allow `infer`/`goal` blocks before any `axiom` block.
    pub allow_early: bool,
    /// Sentinel content of an `infer` block when no inference is legal.
    pub no_inference: String,
    pub on_exhausted: ExhaustedPolicy,
}

impl CompletionConfig {
    pub fn with_mode(mut self, mode: GrammarMode) -> Self {
        self.grammar.mode = mode;
        self
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            grammar: GrammarConfig {
                mode: GrammarMode::FreeForm,
                max_identifier_length: 20,
                max_equation_length: 80,
                term_depth: 1,
            },
            inference: InferenceConfig {
                allow_early: false,
                no_inference: "nothing".into(),
                on_exhausted: ExhaustedPolicy::Undetermined,
            },
        }
    }
}

/// Stacks configuration layers over the compiled-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the compiled-in defaults, no other layers yet.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Read a TOML file when building; it must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, e.g. a configuration embedded in a test.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Override one dotted key, e.g. `inference.on_exhausted`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer into a [`CompletionConfig`].
    pub fn build(self) -> Result<CompletionConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The compiled-in defaults, read through the same path as user files.
pub fn load_defaults() -> Result<CompletionConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, CompletionConfig::default());
    }

    #[test]
    fn key_overrides_beat_defaults() {
        let config = Loader::new()
            .set_override("grammar.mode", "enumerated")
            .expect("override to apply")
            .set_override("inference.allow_early", true)
            .expect("override to apply")
            .build()
            .expect("config to build");

        assert_eq!(config.grammar.mode, GrammarMode::Enumerated);
        assert!(config.inference.allow_early);
        assert_eq!(config.markers.start, "[[");
    }

    #[test]
    fn layers_toml_text() {
        let config = Loader::new()
            .with_toml("[markers]\nstart = \"<<\"\nend = \">>\"\n\n[inference]\non_exhausted = \"done\"\n")
            .build()
            .expect("config to build");

        assert_eq!(config.markers.start, "<<");
        assert_eq!(config.markers.end, ">>");
        assert_eq!(config.inference.on_exhausted, ExhaustedPolicy::Done);
        assert_eq!(config.inference.no_inference, "nothing");
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = Loader::new()
            .set_override("grammar.mode", "telepathic")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
