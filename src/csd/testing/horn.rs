//! A small Horn-clause derivation engine
//!
//! Universes hold declared symbols, named rules and named known facts. A rule
//! is an implication chain whose premises may mention quoted variables; a
//! single-segment axiom is a rule without premises, and also a known fact
//! when ground. Applying a rule yields every ground instantiation of its
//! conclusion whose premises unify with known facts.

use std::collections::HashMap;

use crate::csd::domain::{Completion, Declaration, Derivation, Domain, Signature};
use crate::csd::error::DomainError;
use crate::csd::sexpr::{is_symbol, is_variable, parse, parse_chain, SExpr, NOT};

type Bindings = HashMap<String, SExpr>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub premises: Vec<SExpr>,
    pub conclusion: SExpr,
}

/// A fact obtained by applying a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HornChoice {
    pub rule: String,
    pub fact: SExpr,
}

#[derive(Debug, Clone, Default)]
pub struct HornUniverse {
    symbols: HashMap<String, Signature>,
    rules: Vec<(String, Rule)>,
    facts: Vec<(String, SExpr)>,
}

impl HornUniverse {
    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn signature(&self, name: &str) -> Option<&Signature> {
        self.symbols.get(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|(n, _)| n == name)
    }

    pub fn is_known(&self, fact: &SExpr) -> bool {
        self.facts.iter().any(|(_, known)| known == fact)
    }

    /// The fact registered under `name`, if any.
    pub fn fact(&self, name: &str) -> Option<&SExpr> {
        self.facts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, fact)| fact)
    }

    fn declare(&mut self, name: &str, signature: Signature) -> Result<(), DomainError> {
        match self.symbols.get(name) {
            Some(existing) if *existing != signature => Err(DomainError::new(format!(
                "`{}` redeclared as {} (was {})",
                name, signature, existing
            ))),
            Some(_) => Ok(()),
            None => {
                self.symbols.insert(name.to_string(), signature);
                Ok(())
            }
        }
    }

    /// Every symbol in `expr` must be declared, applied at its declared arity.
    fn check(&self, expr: &SExpr) -> Result<(), DomainError> {
        match expr {
            SExpr::Atom(name) if is_symbol(name) && name != NOT => {
                if self.has_symbol(name) {
                    Ok(())
                } else {
                    Err(DomainError::new(format!("undeclared symbol `{}`", name)))
                }
            }
            SExpr::Atom(_) => Ok(()),
            SExpr::Apply { head, args } => {
                if is_symbol(head) && head != NOT {
                    let signature = self
                        .signature(head)
                        .ok_or_else(|| DomainError::new(format!("undeclared symbol `{}`", head)))?;
                    if signature.arity() != args.len() {
                        return Err(DomainError::new(format!(
                            "`{}` takes {} arguments, applied to {}",
                            head,
                            signature.arity(),
                            args.len()
                        )));
                    }
                }
                args.iter().try_for_each(|arg| self.check(arg))
            }
        }
    }
}

/// Reference engine over [`HornUniverse`].
#[derive(Debug, Clone, Default)]
pub struct HornDomain {
    tactics: Vec<String>,
}

impl HornDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine-wide actions enabled regardless of the starting universe.
    pub fn with_tactics<I, S>(tactics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tactics: tactics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn start_derivation(&self) -> Derivation<HornUniverse> {
        Derivation::new(HornUniverse::default())
    }
}

impl Domain for HornDomain {
    type Universe = HornUniverse;
    type Choice = HornChoice;

    fn incorporate(
        &self,
        universe: &mut HornUniverse,
        declaration: &Declaration,
    ) -> Result<(), DomainError> {
        match declaration {
            Declaration::Const { name, signature } => universe.declare(name, signature.clone()),
            Declaration::Let { name, sort } => universe.declare(name, Signature::nullary(*sort)),
            Declaration::Axiom { name, body } => {
                let mut segments =
                    parse_chain(body).map_err(|e| DomainError::new(e.to_string()))?;
                for segment in &segments {
                    universe.check(segment)?;
                }
                let Some(conclusion) = segments.pop() else {
                    return Err(DomainError::new(format!("empty axiom `{}`", name)));
                };

                if segments.is_empty() && conclusion.is_ground() {
                    universe.facts.push((name.clone(), conclusion.clone()));
                }
                universe.rules.push((
                    name.clone(),
                    Rule {
                        premises: segments,
                        conclusion,
                    },
                ));
                Ok(())
            }
        }
    }

    fn derivation_actions(&self, universe: &HornUniverse) -> Vec<String> {
        let steps = universe
            .facts
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| !universe.has_rule(name));
        universe.rule_names().chain(steps).map(String::from).collect()
    }

    fn tactic_actions(&self) -> Vec<String> {
        self.tactics.clone()
    }

    fn apply(&self, action: &str, universe: &HornUniverse) -> Vec<HornChoice> {
        let Some((_, rule)) = universe.rules.iter().find(|(name, _)| name == action) else {
            return universe
                .fact(action)
                .map(|fact| HornChoice {
                    rule: action.to_string(),
                    fact: fact.clone(),
                })
                .into_iter()
                .collect();
        };

        let known: Vec<&SExpr> = universe.facts.iter().map(|(_, fact)| fact).collect();
        let mut solutions = Vec::new();
        satisfy(&rule.premises, &known, Bindings::new(), &mut solutions);

        let mut choices: Vec<HornChoice> = Vec::new();
        for bindings in solutions {
            let fact = substitute(&rule.conclusion, &bindings);
            if fact.is_ground() && !choices.iter().any(|c| c.fact == fact) {
                choices.push(HornChoice {
                    rule: action.to_string(),
                    fact,
                });
            }
        }
        choices
    }

    fn value_of(&self, _universe: &HornUniverse, choice: &HornChoice) -> String {
        choice.fact.to_string()
    }

    fn define(
        &self,
        universe: &mut HornUniverse,
        name: &str,
        choice: &HornChoice,
    ) -> Result<(), DomainError> {
        universe.facts.push((name.to_string(), choice.fact.clone()));
        Ok(())
    }

    fn derivation_done(&self, derivation: &Derivation<HornUniverse>) -> Completion {
        let Some(goal) = derivation.goal.as_deref().and_then(|g| parse(g).ok()) else {
            return Completion::open();
        };
        if derivation.universe.is_known(&goal) {
            Completion::proved()
        } else if derivation.universe.is_known(&goal.negated()) {
            Completion::refuted()
        } else {
            Completion::open()
        }
    }
}

fn satisfy(premises: &[SExpr], known: &[&SExpr], bindings: Bindings, out: &mut Vec<Bindings>) {
    let Some((first, rest)) = premises.split_first() else {
        out.push(bindings);
        return;
    };
    for fact in known {
        let mut extended = bindings.clone();
        if unify(first, fact, &mut extended) {
            satisfy(rest, known, extended, out);
        }
    }
}

fn unify(pattern: &SExpr, fact: &SExpr, bindings: &mut Bindings) -> bool {
    match (pattern, fact) {
        (SExpr::Atom(name), _) if is_variable(name) => match bindings.get(name) {
            Some(bound) => bound == fact,
            None => {
                bindings.insert(name.clone(), fact.clone());
                true
            }
        },
        (SExpr::Atom(a), SExpr::Atom(b)) => a == b,
        (
            SExpr::Apply { head, args },
            SExpr::Apply {
                head: fact_head,
                args: fact_args,
            },
        ) => {
            head == fact_head
                && args.len() == fact_args.len()
                && args
                    .iter()
                    .zip(fact_args)
                    .all(|(p, f)| unify(p, f, bindings))
        }
        _ => false,
    }
}

fn substitute(expr: &SExpr, bindings: &Bindings) -> SExpr {
    match expr {
        SExpr::Atom(name) => bindings.get(name).cloned().unwrap_or_else(|| expr.clone()),
        SExpr::Apply { head, args } => SExpr::apply(
            head.clone(),
            args.iter().map(|arg| substitute(arg, bindings)).collect(),
        ),
    }
}
