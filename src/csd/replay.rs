//! Derivation replay ("fast-forward")
//!
//! Rebuilds engine state from the verified blocks of a transcript, in order,
//! on a fresh clone of the starting derivation. Replay is a pure function of
//! the starting derivation, the configuration and the block sequence.

use tracing::{debug, trace, warn};

use crate::csd::arity::{ArityMap, NewSymbol};
use crate::csd::blocks::{Block, Keyword};
use crate::csd::choices::{axiom_name, ChoiceEnumerator};
use crate::csd::config::{CompletionConfig, GrammarMode};
use crate::csd::domain::{Declaration, Derivation, Domain, Signature, Sort};
use crate::csd::error::{ArityError, CompletionError};
use crate::csd::infix::to_call_form;
use crate::csd::sexpr::NOT;

/// Turns a rendered engine value into the text a transcript would contain.
pub type Formatter = dyn Fn(&str) -> String + Send + Sync;

/// Name under which the inference in verified block `index` is registered.
pub fn step_name(index: usize) -> String {
    format!("!step{}", index)
}

/// Name of the synthetic equation for verified block `index`.
pub fn equation_name(index: usize) -> String {
    format!("eq{}", index)
}

/// Names the baseline declares; no transcript block may redeclare them.
pub const BASELINE_NAMES: [&str; 2] = [OBJECT, NOT];

const OBJECT: &str = "object";

/// Declarations every replay starts from.
pub fn baseline() -> [Declaration; 2] {
    [
        Declaration::Const {
            name: OBJECT.into(),
            signature: Signature::nullary(Sort::Type),
        },
        Declaration::Const {
            name: NOT.into(),
            signature: Signature::new(vec![Sort::Prop], Sort::Prop),
        },
    ]
}

/// Declaration for a symbol first seen in a free-form axiom.
pub fn symbol_declaration(symbol: &NewSymbol) -> Declaration {
    if symbol.arity == 0 {
        return Declaration::Let {
            name: symbol.name.clone(),
            sort: Sort::Object,
        };
    }
    let signature = if symbol.toplevel {
        Signature::predicate(symbol.arity)
    } else {
        Signature::function(symbol.arity)
    };
    Declaration::Const {
        name: symbol.name.clone(),
        signature,
    }
}

pub struct Replayer<'e, D: Domain> {
    domain: &'e D,
    enumerator: &'e ChoiceEnumerator,
    config: &'e CompletionConfig,
    formatter: &'e Formatter,
}

impl<'e, D: Domain> Replayer<'e, D> {
    pub fn new(
        domain: &'e D,
        enumerator: &'e ChoiceEnumerator,
        config: &'e CompletionConfig,
        formatter: &'e Formatter,
    ) -> Self {
        Self {
            domain,
            enumerator,
            config,
            formatter,
        }
    }

    /// The transcript text for a candidate fact.
    pub fn render(&self, universe: &D::Universe, choice: &D::Choice) -> String {
        (self.formatter)(&self.domain.value_of(universe, choice))
    }

    /// Replay `verified` on a clone of `start`. `start` is never mutated.
    pub fn fast_forward(
        &self,
        start: &Derivation<D::Universe>,
        verified: &[Block],
    ) -> Result<Derivation<D::Universe>, CompletionError> {
        let mut derivation = start.clone();
        for declaration in baseline() {
            self.domain
                .incorporate(&mut derivation.universe, &declaration)?;
        }

        let mut arities = ArityMap::new();
        arities.record(OBJECT, 0)?;
        arities.record(NOT, 1)?;
        let enumerated = self.config.grammar.mode == GrammarMode::Enumerated;

        for (index, block) in verified.iter().enumerate() {
            let keyword = block.kind()?;
            let content = block.content.trim();
            trace!(index, keyword = %keyword, content, "replaying block");

            match keyword {
                Keyword::Prop | Keyword::Object | Keyword::Relation if enumerated => {
                    let (arity, declaration) = match keyword {
                        Keyword::Object => (
                            0,
                            Declaration::Let {
                                name: content.to_string(),
                                sort: Sort::Object,
                            },
                        ),
                        Keyword::Relation => (
                            2,
                            Declaration::Const {
                                name: content.to_string(),
                                signature: Signature::predicate(2),
                            },
                        ),
                        _ => (
                            1,
                            Declaration::Const {
                                name: content.to_string(),
                                signature: Signature::predicate(1),
                            },
                        ),
                    };
                    if first_declaration(&mut arities, index, content, arity) {
                        self.domain
                            .incorporate(&mut derivation.universe, &declaration)?;
                    }
                }
                Keyword::Prop | Keyword::Object | Keyword::Relation => {}
                Keyword::Axiom => {
                    if enumerated {
                        self.incorporate_axiom(&mut derivation.universe, index, content)?;
                    } else {
                        self.free_form_axiom(&mut derivation.universe, &mut arities, index, content)?;
                    }
                }
                Keyword::Var => {
                    if first_declaration(&mut arities, index, content, 0) {
                        self.domain.incorporate(
                            &mut derivation.universe,
                            &Declaration::Let {
                                name: content.to_string(),
                                sort: Sort::Real,
                            },
                        )?;
                    }
                }
                Keyword::Eq => {
                    let call_form = to_call_form(content)?;
                    self.domain.incorporate(
                        &mut derivation.universe,
                        &Declaration::Axiom {
                            name: equation_name(index),
                            body: call_form.to_string(),
                        },
                    )?;
                }
                Keyword::Goal => {
                    derivation.goal = Some(content.to_string());
                }
                Keyword::Infer => {
                    self.replay_inference(&mut derivation.universe, index, &block.content)?;
                }
            }
        }

        Ok(derivation)
    }

    /// Find the candidate this `infer` block claims and register it as a step.
    fn replay_inference(
        &self,
        universe: &mut D::Universe,
        index: usize,
        content: &str,
    ) -> Result<(), CompletionError> {
        let choices = self.enumerator.enumerate(self.domain, universe);
        let claimed = choices
            .iter()
            .find(|choice| self.render(universe, choice) == content);

        match claimed {
            Some(choice) => {
                self.domain.define(universe, &step_name(index), choice)?;
                Ok(())
            }
            None if content == self.config.inference.no_inference => {
                warn!(index, "no inference was available at this step");
                Ok(())
            }
            None => Err(CompletionError::ReplayInconsistency {
                index,
                content: content.to_string(),
            }),
        }
    }

    /// Auto-declare the symbols of a free-form axiom, then incorporate it.
    /// An axiom whose arities conflict with earlier ones is skipped whole.
    fn free_form_axiom(
        &self,
        universe: &mut D::Universe,
        arities: &mut ArityMap,
        index: usize,
        content: &str,
    ) -> Result<(), CompletionError> {
        let mut trial = arities.clone();
        let mut new_symbols = Vec::new();

        for segment in content.split("->") {
            match trial.analyze(segment.trim()) {
                Ok(analysis) => new_symbols.extend(analysis.new_symbols),
                Err(ArityError::Conflict {
                    symbol,
                    expected,
                    found,
                }) => {
                    debug!(index, symbol = %symbol, expected, found, "skipping axiom with conflicting arity");
                    return Ok(());
                }
                Err(other) => return Err(other.into()),
            }
        }

        *arities = trial;
        for symbol in &new_symbols {
            self.domain
                .incorporate(universe, &symbol_declaration(symbol))?;
        }
        self.incorporate_axiom(universe, index, content)
    }

    fn incorporate_axiom(
        &self,
        universe: &mut D::Universe,
        index: usize,
        content: &str,
    ) -> Result<(), CompletionError> {
        let body = if content.contains("->") {
            format!("[{}]", content)
        } else {
            content.to_string()
        };
        self.domain.incorporate(
            universe,
            &Declaration::Axiom {
                name: axiom_name(index),
                body,
            },
        )?;
        Ok(())
    }
}

/// Fix `name` at `arity` if it is new. A name that is already fixed keeps
/// its first declaration and the block is skipped.
fn first_declaration(arities: &mut ArityMap, index: usize, name: &str, arity: usize) -> bool {
    match arities.record(name, arity) {
        Ok(true) => true,
        Ok(false) => {
            debug!(index, name, "skipping redeclaration");
            false
        }
        Err(conflict) => {
            debug!(index, %conflict, "skipping declaration with conflicting arity");
            false
        }
    }
}
