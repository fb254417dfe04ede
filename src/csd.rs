//! Constrained decoding for proof transcripts
//!
//! A transcript interleaves natural language with `[[keyword:content]]`
//! blocks. Given a prefix, [`engine::CompletionEngine`] produces the pattern
//! the next characters must match, so that a language model can only emit
//! blocks that are well-formed and, for `infer` blocks, actually derivable.
//! It also decides whether a finished transcript proves or refutes its goal.
//!
//! Pipeline: [`blocks`] scans the transcript, [`replay`] rebuilds the
//! derivation from the verified blocks through the [`domain::Domain`] seam,
//! [`choices`] enumerates licensed inferences, and [`grammar`] builds the
//! patterns for declaration blocks.

pub mod arity;
pub mod blocks;
pub mod choices;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod infix;
pub mod pattern;
pub mod replay;
pub mod sexpr;
pub mod testing;
pub mod token;

pub use blocks::{Block, BlockScanner, Keyword};
pub use config::{CompletionConfig, GrammarMode, Loader};
pub use domain::{Answer, Completion, Declaration, Derivation, Domain};
pub use engine::{CompletionEngine, CompletionState};
pub use error::{CompletionError, FormatError};
pub use pattern::Pattern;
