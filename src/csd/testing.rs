//! Test support
//!
//! Two tools, used together by the integration tests and the `csd` binary:
//!
//! 1. [`Transcripts`](transcripts::Transcripts) loads curated transcript
//!    fixtures from `tests/fixtures/`. Prefer these to transcripts inlined in
//!    test bodies: a fixture is checked once and reused everywhere.
//! 2. [`HornDomain`](horn::HornDomain) is a small derivation engine that
//!    implements [`Domain`](crate::csd::domain::Domain) over Horn clauses.
//!    It is enough to replay syllogism transcripts and decide their goals.
//!
//! ```rust,ignore
//! use peano_csd::csd::testing::{engine, Transcripts};
//!
//! let prefix = Transcripts::must_get("sally-start");
//! let pattern = engine().complete(&prefix)?;
//! assert!(pattern.is_match("(tumpus sally)]]"));
//! ```

pub mod horn;
pub mod transcripts;

pub use horn::{HornChoice, HornDomain, HornUniverse};
pub use transcripts::{TranscriptError, Transcripts};

use crate::csd::config::CompletionConfig;
use crate::csd::engine::CompletionEngine;

/// An engine over an empty Horn universe with default configuration.
pub fn engine() -> CompletionEngine<HornDomain> {
    engine_with(CompletionConfig::default())
}

pub fn engine_with(config: CompletionConfig) -> CompletionEngine<HornDomain> {
    let domain = HornDomain::new();
    let start = domain.start_derivation();
    CompletionEngine::new(domain, start, config)
}
