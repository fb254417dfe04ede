//! # peano-csd
//!
//! Constrained decoding for proof transcripts: restricts a language model's
//! next characters to well-formed, derivable reasoning steps.
//!
//! ## Testing
//!
//! For fixtures and the reference engine, see the [testing module](csd::testing).

pub mod csd;
