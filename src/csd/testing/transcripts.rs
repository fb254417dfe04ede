//! Curated transcript fixtures
//!
//! Transcripts live under `tests/fixtures/` as `<name>.txt`. Each fixture is
//! a prefix as a model would have produced it, usually ending inside an open
//! block. Tests load them by name instead of inlining long transcripts.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcript not found: {0}")]
    NotFound(String),
    #[error("failed to read transcript {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct Transcripts;

impl Transcripts {
    /// Directory holding the fixture files.
    pub fn dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
    }

    pub fn path(name: &str) -> PathBuf {
        Self::dir().join(format!("{}.txt", name))
    }

    pub fn get(name: &str) -> Result<String, TranscriptError> {
        let path = Self::path(name);
        if !path.exists() {
            return Err(TranscriptError::NotFound(name.to_string()));
        }
        fs::read_to_string(&path).map_err(|source| TranscriptError::Io {
            name: name.to_string(),
            source,
        })
    }

    /// Load a fixture, panicking with its name when missing. For tests.
    pub fn must_get(name: &str) -> String {
        Self::get(name).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Names of every available fixture, sorted.
    pub fn list() -> Result<Vec<String>, TranscriptError> {
        let dir = Self::dir();
        let entries = fs::read_dir(&dir).map_err(|source| TranscriptError::Io {
            name: dir.display().to_string(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fixture() {
        assert!(matches!(
            Transcripts::get("no-such-transcript"),
            Err(TranscriptError::NotFound(_))
        ));
    }

    #[test]
    fn test_fixtures_are_listed() {
        let names = Transcripts::list().unwrap();
        assert!(names.contains(&"sally-start".to_string()));
    }
}
