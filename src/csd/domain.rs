//! The seam to the symbolic derivation engine
//!
//! The completion engine never interprets propositions itself. It declares
//! symbols and axioms into a cloned [`Domain::Universe`], asks which actions
//! are licensed, applies them to obtain candidate facts, and finally asks the
//! engine whether the goal is settled.

use std::fmt;

use serde::Serialize;

use crate::csd::error::DomainError;

/// Sorts of the engine's type language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    Type,
    Object,
    Prop,
    Real,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sort::Type => "type",
            Sort::Object => "object",
            Sort::Prop => "prop",
            Sort::Real => "real",
        };
        write!(f, "{}", name)
    }
}

/// Parameter sorts and result sort of a declared constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<Sort>,
    pub result: Sort,
}

impl Signature {
    pub fn new(params: Vec<Sort>, result: Sort) -> Self {
        Self { params, result }
    }

    pub fn nullary(result: Sort) -> Self {
        Self::new(Vec::new(), result)
    }

    /// `object -> ... -> prop` with `arity` object parameters.
    pub fn predicate(arity: usize) -> Self {
        Self::new(vec![Sort::Object; arity], Sort::Prop)
    }

    /// `object -> ... -> object` with `arity` object parameters.
    pub fn function(arity: usize) -> Self {
        Self::new(vec![Sort::Object; arity], Sort::Object)
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return write!(f, "{}", self.result);
        }
        write!(f, "[")?;
        for param in &self.params {
            write!(f, "{} -> ", param)?;
        }
        write!(f, "{}]", self.result)
    }
}

/// A unit of knowledge incorporated into a universe.
///
/// `Display` renders the engine's textual declaration syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    /// `name : signature.`
    Const { name: String, signature: Signature },
    /// `let name : sort.`
    Let { name: String, sort: Sort },
    /// `name : body.` where body is a proposition, a bracketed implication
    /// chain, or an equation in call form.
    Axiom { name: String, body: String },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Const { name, .. }
            | Declaration::Let { name, .. }
            | Declaration::Axiom { name, .. } => name,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Const { name, signature } => write!(f, "{} : {}.", name, signature),
            Declaration::Let { name, sort } => write!(f, "let {} : {}.", name, sort),
            Declaration::Axiom { name, body } => write!(f, "{} : {}.", name, body),
        }
    }
}

/// A universe paired with the goal being proved.
#[derive(Debug, Clone, Default)]
pub struct Derivation<U> {
    pub universe: U,
    pub goal: Option<String>,
}

impl<U> Derivation<U> {
    pub fn new(universe: U) -> Self {
        Self {
            universe,
            goal: None,
        }
    }
}

/// Answer carried by a completion verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Answer {
    True,
    False,
    Value(String),
    Unknown,
}

/// Whether a transcript is a finished proof, and with what answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub done: bool,
    pub answer: Answer,
}

impl Completion {
    pub fn proved() -> Self {
        Self {
            done: true,
            answer: Answer::True,
        }
    }

    pub fn refuted() -> Self {
        Self {
            done: true,
            answer: Answer::False,
        }
    }

    pub fn open() -> Self {
        Self {
            done: false,
            answer: Answer::Unknown,
        }
    }
}

/// A symbolic derivation engine.
pub trait Domain {
    type Universe: Clone;
    /// A candidate fact produced by applying an action.
    type Choice;

    fn incorporate(
        &self,
        universe: &mut Self::Universe,
        declaration: &Declaration,
    ) -> Result<(), DomainError>;

    /// Action names available in `universe`.
    fn derivation_actions(&self, universe: &Self::Universe) -> Vec<String>;

    /// Engine-wide tactic action names.
    fn tactic_actions(&self) -> Vec<String>;

    /// Every candidate fact obtained by applying `action` (possibly none).
    fn apply(&self, action: &str, universe: &Self::Universe) -> Vec<Self::Choice>;

    /// Render a candidate's value as proposition text.
    fn value_of(&self, universe: &Self::Universe, choice: &Self::Choice) -> String;

    /// Register `choice` under `name` as an established step.
    fn define(
        &self,
        universe: &mut Self::Universe,
        name: &str,
        choice: &Self::Choice,
    ) -> Result<(), DomainError>;

    /// Check whether the derivation's goal is proved or refuted.
    fn derivation_done(&self, derivation: &Derivation<Self::Universe>) -> Completion;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_rendering() {
        let cases = [
            (
                Declaration::Const {
                    name: "object".into(),
                    signature: Signature::nullary(Sort::Type),
                },
                "object : type.",
            ),
            (
                Declaration::Const {
                    name: "not".into(),
                    signature: Signature::new(vec![Sort::Prop], Sort::Prop),
                },
                "not : [prop -> prop].",
            ),
            (
                Declaration::Const {
                    name: "likes".into(),
                    signature: Signature::predicate(2),
                },
                "likes : [object -> object -> prop].",
            ),
            (
                Declaration::Let {
                    name: "sally".into(),
                    sort: Sort::Object,
                },
                "let sally : object.",
            ),
            (
                Declaration::Axiom {
                    name: "axiom3".into(),
                    body: "[(vumpus 'x) -> (zumpus 'x)]".into(),
                },
                "axiom3 : [(vumpus 'x) -> (zumpus 'x)].",
            ),
        ];

        for (declaration, expected) in cases {
            assert_eq!(declaration.to_string(), expected);
        }
    }

    #[test]
    fn test_completion_serializes() {
        let json = serde_json::to_string(&Completion::refuted()).unwrap();
        assert_eq!(json, r#"{"done":true,"answer":{"kind":"false"}}"#);
    }
}
