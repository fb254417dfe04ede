//! Error types for the completion engine
//!
//! Malformed block syntax is always fatal. Arity conflicts are reported by the
//! analyzer but downgraded to a per-axiom skip during replay; a free-form
//! axiom that does not parse surfaces as [`CompletionError::Arity`].

use thiserror::Error;

/// Malformed transcript or block syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("block `{block}` has no `:` separating keyword from content")]
    MissingColon { block: String },
    #[error("unknown block keyword `{0}`")]
    UnknownKeyword(String),
    #[error("open block `{keyword}` already has content `{content}`")]
    ContentInProgress { keyword: String, content: String },
    #[error("unexpected character `{text}` at offset {offset} in `{source_text}`")]
    UnexpectedCharacter {
        source_text: String,
        text: String,
        offset: usize,
    },
    #[error("malformed expression `{source_text}`: {message}")]
    MalformedExpression {
        source_text: String,
        message: String,
    },
    #[error("malformed equation `{source_text}`: {message}")]
    MalformedEquation {
        source_text: String,
        message: String,
    },
}

/// Failure while inferring symbol arities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("symbol `{symbol}` used with arity {found}, but it was fixed at arity {expected}")]
    Conflict {
        symbol: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Error reported by a derivation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DomainError(pub String);

impl DomainError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Fatal error aborting a single `complete` / `is_complete` call.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Arity(#[from] ArityError),
    #[error("could not replay inference `{content}` in verified block {index}")]
    ReplayInconsistency { index: usize, content: String },
    #[error("enumerated grammar needs at least one declared predicate")]
    EmptyTheory,
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("derivation engine rejected a step: {0}")]
    Domain(#[from] DomainError),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
