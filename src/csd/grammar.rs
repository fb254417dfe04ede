//! Proposition grammars for `axiom` and `goal` blocks
//!
//! Free-form mode accepts any syntactically plausible proposition and leaves
//! semantic checking to replay. Enumerated mode lists the closed set of atomic
//! propositions over the objects and predicates declared so far. Every
//! pattern ends with the block's end marker.

use crate::csd::blocks::{Block, Keyword};
use crate::csd::config::{GrammarConfig, GrammarMode};
use crate::csd::error::CompletionError;
use crate::csd::pattern::{identifier_excluding, literal_alternation};
use crate::csd::sexpr::NOT;

/// Separator between the premises and conclusion of an axiom.
pub const IMPLIES: &str = " -> ";

/// The only bound variable enumerated mode offers.
pub const ENUMERATED_VARIABLE: &str = "'x";

/// Builds `axiom`/`goal` content patterns.
#[derive(Debug, Clone)]
pub struct PropositionGrammar<'c> {
    config: &'c GrammarConfig,
    end_marker: String,
}

impl<'c> PropositionGrammar<'c> {
    pub fn new(config: &'c GrammarConfig, end_marker: &str) -> Self {
        Self {
            config,
            end_marker: regex::escape(end_marker),
        }
    }

    /// Pattern for the content of an `axiom` block, end marker included.
    pub fn axiom(&self, verified: &[Block]) -> Result<String, CompletionError> {
        let body = match self.config.mode {
            GrammarMode::FreeForm => {
                let proposition = self.free_proposition(true);
                format!("{p}(?:{sep}{p})*", p = proposition, sep = regex::escape(IMPLIES))
            }
            GrammarMode::Enumerated => {
                let theory = Theory::from_blocks(verified)?;
                let premise = literal_alternation(theory.propositions(true));
                let bound_conclusion = literal_alternation(theory.propositions(true));
                let bare_conclusion = literal_alternation(theory.propositions(false));
                format!(
                    "(?:{premise}{sep})+{bound_conclusion}|{bare_conclusion}",
                    sep = regex::escape(IMPLIES)
                )
            }
        };
        Ok(format!("(?:{}){}", body, self.end_marker))
    }

    /// Pattern for the content of a `goal` block, end marker included.
    pub fn goal(&self, verified: &[Block]) -> Result<String, CompletionError> {
        let body = match self.config.mode {
            GrammarMode::FreeForm => self.free_proposition(false),
            GrammarMode::Enumerated => {
                literal_alternation(Theory::from_blocks(verified)?.propositions(false))
            }
        };
        Ok(format!("{}{}", body, self.end_marker))
    }

    /// Bounded-length identifier.
    pub fn identifier(&self) -> String {
        format!(
            "[a-z_][a-z0-9_]{{0,{}}}",
            self.config.max_identifier_length.saturating_sub(1)
        )
    }

    /// Bounded identifier spelled differently from every name in `taken`.
    pub fn fresh_identifier(&self, taken: &[String]) -> String {
        let first: Vec<char> = ('a'..='z').chain(['_']).collect();
        let rest: Vec<char> = ('a'..='z').chain('0'..='9').chain(['_']).collect();
        identifier_excluding(&first, &rest, self.config.max_identifier_length, taken)
    }

    /// Lowercase variable name, none of `taken`.
    pub fn fresh_variable(&self, taken: &[String]) -> String {
        let letters: Vec<char> = ('a'..='z').collect();
        identifier_excluding(&letters, &letters, self.config.max_identifier_length, taken)
    }

    fn free_term(&self, parametric: bool) -> String {
        let atom = self.identifier();
        let mut term = if parametric {
            format!("(?:'[a-z]|{})", atom)
        } else {
            format!("(?:{})", atom)
        };
        for _ in 0..self.config.term_depth {
            term = format!(r"(?:{term}|\({atom}(?: {term}){{2,3}}\))");
        }
        term
    }

    fn free_proposition(&self, parametric: bool) -> String {
        let term = self.free_term(parametric);
        let positive = format!(r"\({}(?: {}){{1,2}}\)", self.identifier(), term);
        format!(r"(?:{positive}|\({NOT} {positive}\))")
    }
}

/// Objects and predicates declared by verified blocks.
struct Theory<'b> {
    objects: Vec<&'b str>,
    predicates: Vec<&'b str>,
    relations: Vec<&'b str>,
}

impl<'b> Theory<'b> {
    fn from_blocks(verified: &'b [Block]) -> Result<Self, CompletionError> {
        let named = |keyword: Keyword| -> Vec<&'b str> {
            verified
                .iter()
                .filter(|b| b.is(keyword))
                .map(|b| b.content.as_str())
                .collect()
        };
        let theory = Self {
            objects: named(Keyword::Object),
            predicates: named(Keyword::Prop),
            relations: named(Keyword::Relation),
        };

        if theory.predicates.is_empty() && theory.relations.is_empty() {
            return Err(CompletionError::EmptyTheory);
        }
        Ok(theory)
    }

    /// Every atomic proposition and its negation. With `bound`, the variable
    /// `'x` is offered alongside the declared objects.
    fn propositions(&self, bound: bool) -> Vec<String> {
        let mut terms: Vec<&str> = Vec::new();
        if bound {
            terms.push(ENUMERATED_VARIABLE);
        }
        terms.extend(&self.objects);

        let mut atoms = Vec::new();
        for predicate in &self.predicates {
            for term in &terms {
                atoms.push(format!("({} {})", predicate, term));
            }
        }
        for relation in &self.relations {
            for first in &terms {
                for second in &terms {
                    atoms.push(format!("({} {} {})", relation, first, second));
                }
            }
        }

        let negated: Vec<String> = atoms.iter().map(|a| format!("({} {})", NOT, a)).collect();
        atoms.extend(negated);
        atoms
    }
}
