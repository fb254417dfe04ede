//! Completion engine
//!
//! Answers two questions about a transcript prefix, both pure functions of
//! (starting derivation, transcript, configuration):
//!
//! - [`CompletionEngine::complete`]: the pattern the next characters must match.
//! - [`CompletionEngine::is_complete`]: whether the transcript is a finished
//!   proof, and with what answer.
//!
//! The prefix is classified into one of three states:
//!
//! - free text: no open block. Anything without a start marker, then the
//!   start marker.
//! - keyword select: a block was just opened. One of the legal keywords
//!   followed by `:`.
//! - content: a keyword was chosen. The keyword-specific payload followed by
//!   the end marker.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::csd::blocks::{Block, BlockScanner, Keyword};
use crate::csd::choices::ChoiceEnumerator;
use crate::csd::config::{CompletionConfig, ExhaustedPolicy, GrammarMode};
use crate::csd::domain::{Answer, Completion, Derivation, Domain};
use crate::csd::error::{CompletionError, FormatError};
use crate::csd::grammar::PropositionGrammar;
use crate::csd::pattern::{literal_alternation, through_first, Pattern};
use crate::csd::replay::{Formatter, Replayer, BASELINE_NAMES};
use crate::csd::sexpr::parse_chain;

/// Where in the block structure a prefix ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    FreeText,
    KeywordSelect,
    Content(Keyword),
}

pub struct CompletionEngine<D: Domain> {
    domain: D,
    start: Derivation<D::Universe>,
    config: CompletionConfig,
    formatter: Box<Formatter>,
    scanner: BlockScanner,
    enumerator: ChoiceEnumerator,
}

impl<D: Domain> CompletionEngine<D> {
    pub fn new(domain: D, start: Derivation<D::Universe>, config: CompletionConfig) -> Self {
        let scanner = BlockScanner::new(&config.markers);
        let enumerator = ChoiceEnumerator::new(&domain, &start.universe);
        Self {
            domain,
            start,
            config,
            formatter: Box::new(|value: &str| value.to_string()),
            scanner,
            enumerator,
        }
    }

    /// Replace the identity formatter applied to rendered candidate values.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn scanner(&self) -> &BlockScanner {
        &self.scanner
    }

    fn replayer(&self) -> Replayer<'_, D> {
        Replayer::new(&self.domain, &self.enumerator, &self.config, &*self.formatter)
    }

    /// Replay the verified blocks on a fresh clone of the starting derivation.
    pub fn fast_forward(&self, verified: &[Block]) -> Result<Derivation<D::Universe>, CompletionError> {
        self.replayer().fast_forward(&self.start, verified)
    }

    /// Candidate facts licensed in `universe`.
    pub fn enumerate_choices(&self, universe: &D::Universe) -> Vec<D::Choice> {
        self.enumerator.enumerate(&self.domain, universe)
    }

    /// Classify where `prefix` ends in the block structure.
    pub fn state(&self, prefix: &str) -> Result<CompletionState, FormatError> {
        let Some(open) = self.scanner.locate_open_block(prefix) else {
            return Ok(CompletionState::FreeText);
        };
        if open.is_empty() {
            return Ok(CompletionState::KeywordSelect);
        }

        let block = Block::split(open)?;
        let keyword = block.kind()?;
        if !block.content.is_empty() {
            return Err(FormatError::ContentInProgress {
                keyword: block.keyword,
                content: block.content,
            });
        }
        Ok(CompletionState::Content(keyword))
    }

    /// The pattern the characters following `prefix` must match.
    pub fn complete(&self, prefix: &str) -> Result<Pattern, CompletionError> {
        let state = self.state(prefix)?;
        debug!(?state, "completing transcript");

        let source = match state {
            CompletionState::FreeText => self.free_text(),
            CompletionState::KeywordSelect => {
                let verified = self.scanner.extract_verified_blocks(prefix)?;
                self.keyword_select(&verified)
            }
            CompletionState::Content(keyword) => {
                let verified = self.scanner.extract_verified_blocks(prefix)?;
                self.content(keyword, &verified)?
            }
        };

        trace!(pattern = %source, "built pattern");
        Ok(Pattern::new(source)?)
    }

    /// Whether `prefix` is a finished proof. `None` means not yet decidable.
    pub fn is_complete(&self, prefix: &str) -> Result<Option<Completion>, CompletionError> {
        let verified = self.scanner.extract_verified_blocks(prefix)?;

        let sentinel = &self.config.inference.no_inference;
        let exhausted = verified
            .iter()
            .any(|b| b.is(Keyword::Infer) && &b.content == sentinel);
        if exhausted {
            debug!(policy = ?self.config.inference.on_exhausted, "inferences exhausted");
            return Ok(match self.config.inference.on_exhausted {
                ExhaustedPolicy::Done => Some(Completion {
                    done: true,
                    answer: Answer::Unknown,
                }),
                ExhaustedPolicy::Undetermined => None,
            });
        }

        let derivation = self.fast_forward(&verified)?;
        Ok(Some(self.domain.derivation_done(&derivation)))
    }

    fn end_marker(&self) -> String {
        regex::escape(&self.config.markers.end)
    }

    fn free_text(&self) -> String {
        through_first(&self.config.markers.start)
    }

    fn keyword_select(&self, verified: &[Block]) -> String {
        let seen = |keyword: Keyword| verified.iter().any(|b| b.is(keyword));
        let inference_open = self.config.inference.allow_early || seen(Keyword::Axiom);

        let legal = Keyword::ALL.into_iter().filter(|keyword| match keyword {
            Keyword::Eq => seen(Keyword::Var),
            Keyword::Infer | Keyword::Goal => inference_open,
            _ => true,
        });
        format!("{}:", literal_alternation(legal.map(|k| k.as_str())))
    }

    fn content(&self, keyword: Keyword, verified: &[Block]) -> Result<String, CompletionError> {
        let grammar = PropositionGrammar::new(&self.config.grammar, &self.config.markers.end);
        let end = self.end_marker();

        Ok(match keyword {
            Keyword::Prop | Keyword::Object | Keyword::Relation => {
                let taken = match self.config.grammar.mode {
                    GrammarMode::Enumerated => taken_names(verified, false),
                    GrammarMode::FreeForm => Vec::new(),
                };
                format!("{}{}", grammar.fresh_identifier(&taken), end)
            }
            Keyword::Var => {
                let taken = taken_names(verified, true);
                format!("{}{}", grammar.fresh_variable(&taken), end)
            }
            Keyword::Eq => format!(
                r"[a-z0-9+\-*/^=(). ]{{1,{}}}{}",
                self.config.grammar.max_equation_length, end
            ),
            Keyword::Axiom => grammar.axiom(verified)?,
            Keyword::Goal => grammar.goal(verified)?,
            Keyword::Infer => self.inference(verified)?,
        })
    }

    /// Alternation of every licensed inference not already stated anywhere
    /// in the transcript, or the sentinel when none remain.
    fn inference(&self, verified: &[Block]) -> Result<String, CompletionError> {
        let replayer = self.replayer();
        let derivation = replayer.fast_forward(&self.start, verified)?;

        let stated: HashSet<&str> = verified
            .iter()
            .filter(|b| b.is(Keyword::Infer))
            .map(|b| b.content.as_str())
            .collect();

        let mut fresh: Vec<String> = Vec::new();
        for choice in self.enumerate_choices(&derivation.universe) {
            let rendered = replayer.render(&derivation.universe, &choice);
            if !stated.contains(rendered.as_str()) && !fresh.contains(&rendered) {
                fresh.push(rendered);
            }
        }
        debug!(candidates = fresh.len(), "enumerated inferences");

        if fresh.is_empty() {
            fresh.push(self.config.inference.no_inference.clone());
        }
        Ok(format!("{}{}", literal_alternation(&fresh), self.end_marker()))
    }
}

/// Names a new declaration may not reuse: the baseline constants and every
/// declared name, plus with `axioms` every symbol an axiom mentions.
fn taken_names(verified: &[Block], axioms: bool) -> Vec<String> {
    let mut taken: Vec<String> = BASELINE_NAMES.iter().map(|name| name.to_string()).collect();
    for block in verified {
        match block.kind() {
            Ok(Keyword::Prop | Keyword::Object | Keyword::Relation | Keyword::Var) => {
                taken.push(block.content.trim().to_string());
            }
            Ok(Keyword::Axiom) if axioms => {
                let Ok(chain) = parse_chain(&block.content) else {
                    continue;
                };
                for expr in &chain {
                    taken.extend(expr.symbols().into_iter().map(String::from));
                }
            }
            _ => {}
        }
    }
    taken
}
