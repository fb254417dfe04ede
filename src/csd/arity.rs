//! Arity inference for free-form propositions
//!
//! Every symbol gets a fixed arity the first time it is seen: 0 for atoms,
//! the argument count for application heads. Later uses must agree, otherwise
//! the expression is rejected with [`ArityError::Conflict`]. Bound variables,
//! numerals and the `not` connective are never recorded.

use std::collections::HashMap;

use crate::csd::error::ArityError;
use crate::csd::sexpr::{self, is_symbol, SExpr, NOT};

/// A symbol first seen while analyzing an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSymbol {
    pub name: String,
    pub arity: usize,
    /// Whether the symbol is the toplevel predicate of its expression.
    pub toplevel: bool,
}

/// Result of analyzing one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub expr: SExpr,
    /// For `(not X)` the head of X, otherwise the expression's own head.
    pub toplevel: String,
    /// Symbols not known before this expression, in first-seen order.
    pub new_symbols: Vec<NewSymbol>,
}

/// Symbol -> arity, fixed on first use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArityMap {
    arities: HashMap<String, usize>,
}

impl ArityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<usize> {
        self.arities.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.arities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arities.is_empty()
    }

    /// Fix `symbol` at `arity`, or check it against the arity already fixed.
    /// Returns true when the symbol was not known before.
    pub fn record(&mut self, symbol: &str, arity: usize) -> Result<bool, ArityError> {
        match self.arities.get(symbol) {
            Some(&expected) if expected != arity => Err(ArityError::Conflict {
                symbol: symbol.to_string(),
                expected,
                found: arity,
            }),
            Some(_) => Ok(false),
            None => {
                self.arities.insert(symbol.to_string(), arity);
                Ok(true)
            }
        }
    }

    /// Parse and analyze `source`, recording every symbol it uses.
    ///
    /// On error the map may hold a partial update; callers that want
    /// all-or-nothing semantics analyze against a clone.
    pub fn analyze(&mut self, source: &str) -> Result<Analysis, ArityError> {
        let expr = sexpr::parse(source)?;
        let toplevel = toplevel_symbol(&expr).to_string();

        let mut new_symbols = Vec::new();
        self.visit(&expr, &toplevel, &mut new_symbols)?;

        Ok(Analysis {
            expr,
            toplevel,
            new_symbols,
        })
    }

    fn visit(
        &mut self,
        expr: &SExpr,
        toplevel: &str,
        new_symbols: &mut Vec<NewSymbol>,
    ) -> Result<(), ArityError> {
        let (symbol, arity) = match expr {
            SExpr::Atom(name) => (name, 0),
            SExpr::Apply { head, args } => {
                for arg in args {
                    self.visit(arg, toplevel, new_symbols)?;
                }
                if head == NOT {
                    return Ok(());
                }
                (head, args.len())
            }
        };

        if !is_symbol(symbol) || symbol == NOT {
            return Ok(());
        }

        if self.record(symbol, arity)? {
            new_symbols.push(NewSymbol {
                name: symbol.clone(),
                arity,
                toplevel: symbol == toplevel,
            });
        }
        Ok(())
    }
}

/// The symbol that decides predicate typing: for `(not X)` it is X's head
/// (or X itself if atomic), otherwise the expression's own head.
pub fn toplevel_symbol(expr: &SExpr) -> &str {
    match expr {
        SExpr::Apply { head, args } if head == NOT && args.len() == 1 => args[0].head(),
        other => other.head(),
    }
}
