//! Infix equations to the engine's call form
//!
//! `2 * x + 1 = 7` becomes `(= (+ (* 2 x) 1) 7)`. Precedence, loosest first:
//! `=`, then `+ -`, then `* /` (all left-associative), then `^`
//! (right-associative). Unary minus on a non-literal becomes `(- 0 e)`.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::csd::error::FormatError;
use crate::csd::sexpr::SExpr;
use crate::csd::token::{tokenize, Token};

/// Convert an infix equation or expression to prefix call form.
pub fn to_call_form(source: &str) -> Result<SExpr, FormatError> {
    let tokens = tokenize(source)?;
    let mut parser = InfixParser {
        source,
        tokens: tokens.into_iter().peekable(),
    };

    let expr = parser.equation()?;
    match parser.tokens.next() {
        None => Ok(expr),
        Some(token) => Err(parser.error(format!("unexpected trailing `{}`", token))),
    }
}

struct InfixParser<'s> {
    source: &'s str,
    tokens: Peekable<IntoIter<Token>>,
}

impl InfixParser<'_> {
    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError::MalformedEquation {
            source_text: self.source.to_string(),
            message: message.into(),
        }
    }

    fn equation(&mut self) -> Result<SExpr, FormatError> {
        let mut lhs = self.sum()?;
        while self.tokens.next_if_eq(&Token::Equals).is_some() {
            let rhs = self.sum()?;
            lhs = SExpr::apply("=", vec![lhs, rhs]);
        }
        Ok(lhs)
    }

    fn sum(&mut self) -> Result<SExpr, FormatError> {
        let mut lhs = self.product()?;
        while let Some(op) = self
            .tokens
            .next_if(|t| matches!(t, Token::Plus | Token::Minus))
        {
            let rhs = self.product()?;
            lhs = binary(&op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn product(&mut self) -> Result<SExpr, FormatError> {
        let mut lhs = self.power()?;
        while let Some(op) = self
            .tokens
            .next_if(|t| matches!(t, Token::Star | Token::Slash))
        {
            let rhs = self.power()?;
            lhs = binary(&op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn power(&mut self) -> Result<SExpr, FormatError> {
        let base = self.unary()?;
        if self.tokens.next_if_eq(&Token::Caret).is_some() {
            let exponent = self.power()?;
            return Ok(SExpr::apply("^", vec![base, exponent]));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<SExpr, FormatError> {
        if self.tokens.next_if_eq(&Token::Minus).is_some() {
            return Ok(match self.unary()? {
                SExpr::Atom(n) if n.chars().all(|c| c.is_ascii_digit() || c == '.') => {
                    SExpr::Atom(format!("-{}", n))
                }
                operand => SExpr::apply("-", vec![SExpr::atom("0"), operand]),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<SExpr, FormatError> {
        match self.tokens.next() {
            Some(Token::Number(n)) => Ok(SExpr::Atom(n)),
            Some(Token::Symbol(s)) => Ok(SExpr::Atom(s)),
            Some(Token::OpenParen) => {
                let inner = self.sum()?;
                match self.tokens.next() {
                    Some(Token::CloseParen) => Ok(inner),
                    _ => Err(self.error("missing `)`")),
                }
            }
            Some(token) => Err(self.error(format!("unexpected `{}`", token))),
            None => Err(self.error("unexpected end of equation")),
        }
    }
}

fn binary(op: &Token, lhs: SExpr, rhs: SExpr) -> SExpr {
    SExpr::apply(op.to_string(), vec![lhs, rhs])
}
