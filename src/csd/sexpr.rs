//! Prefix-notation symbolic expressions
//!
//! An expression is either an atom (`sally`, `'x`, `2`, `+`) or an
//! application of an atom head to zero or more arguments (`(p (q x) y)`).
//! Parsing runs the logos tokenizer and then a small chumsky grammar over the
//! token stream.

use std::fmt;

use chumsky::prelude::*;

use crate::csd::error::FormatError;
use crate::csd::token::{tokenize, Token};

/// The negation connective. Reserved: never arity-checked or declared.
pub const NOT: &str = "not";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SExpr {
    Atom(String),
    Apply { head: String, args: Vec<SExpr> },
}

impl SExpr {
    pub fn atom(name: impl Into<String>) -> Self {
        SExpr::Atom(name.into())
    }

    pub fn apply(head: impl Into<String>, args: Vec<SExpr>) -> Self {
        SExpr::Apply {
            head: head.into(),
            args,
        }
    }

    /// The head symbol of an application, or the atom itself.
    pub fn head(&self) -> &str {
        match self {
            SExpr::Atom(name) => name,
            SExpr::Apply { head, .. } => head,
        }
    }

    /// Negate this proposition, collapsing a double negation.
    pub fn negated(&self) -> SExpr {
        match self {
            SExpr::Apply { head, args } if head == NOT && args.len() == 1 => args[0].clone(),
            other => SExpr::apply(NOT, vec![other.clone()]),
        }
    }

    /// True when no bound variable occurs anywhere in the expression.
    pub fn is_ground(&self) -> bool {
        match self {
            SExpr::Atom(name) => !is_variable(name),
            SExpr::Apply { args, .. } => args.iter().all(SExpr::is_ground),
        }
    }

    /// Symbols mentioned anywhere, heads included, `not` excluded.
    pub fn symbols(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_symbols(&mut found);
        found
    }

    fn collect_symbols<'a>(&'a self, found: &mut Vec<&'a str>) {
        let name = self.head();
        if is_symbol(name) && name != NOT && !found.contains(&name) {
            found.push(name);
        }
        if let SExpr::Apply { args, .. } = self {
            for arg in args {
                arg.collect_symbols(found);
            }
        }
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(name) => write!(f, "{}", name),
            SExpr::Apply { head, args } => {
                write!(f, "({}", head)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Bound variables are quote-prefixed (`'x`).
pub fn is_variable(atom: &str) -> bool {
    atom.starts_with('\'')
}

/// Numeric literals carry no declaration.
pub fn is_numeral(atom: &str) -> bool {
    atom.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Atoms that name something the engine must know about.
pub fn is_symbol(atom: &str) -> bool {
    atom.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

type ParserError = Simple<Token>;

fn atom() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, token: Token| match token.atom_text() {
        Some(text) => Ok(text),
        None => Err(Simple::custom(span, format!("expected an atom, found `{}`", token))),
    })
}

fn expression() -> impl Parser<Token, SExpr, Error = ParserError> + Clone {
    recursive(|expr| {
        let application = atom()
            .then(expr.repeated())
            .delimited_by(just(Token::OpenParen), just(Token::CloseParen))
            .map(|(head, args)| SExpr::Apply { head, args });

        atom().map(SExpr::Atom).or(application)
    })
}

/// Parse a single expression; trailing tokens are an error.
pub fn parse(source: &str) -> Result<SExpr, FormatError> {
    let tokens = tokenize(source)?;
    expression()
        .then_ignore(end())
        .parse(tokens)
        .map_err(|errors| FormatError::MalformedExpression {
            source_text: source.to_string(),
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
}

/// Parse an implication chain `a -> b -> c` into its segments.
///
/// Square brackets wrapping the whole chain (the engine's arrow-type
/// syntax) are accepted and stripped.
pub fn parse_chain(source: &str) -> Result<Vec<SExpr>, FormatError> {
    let trimmed = source.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner.split("->").map(|segment| parse(segment.trim())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_atom() {
        assert_eq!(parse("sally").unwrap(), SExpr::atom("sally"));
        assert_eq!(parse("'x").unwrap(), SExpr::atom("'x"));
    }

    #[test]
    fn test_parse_nested_application() {
        let expr = parse("(p (q x) y)").unwrap();
        assert_eq!(
            expr,
            SExpr::apply(
                "p",
                vec![
                    SExpr::apply("q", vec![SExpr::atom("x")]),
                    SExpr::atom("y")
                ]
            )
        );
        assert_eq!(expr.to_string(), "(p (q x) y)");
    }

    #[test]
    fn test_parse_operator_heads() {
        let expr = parse("(= (+ x 1) 2)").unwrap();
        assert_eq!(expr.head(), "=");
        assert_eq!(expr.to_string(), "(= (+ x 1) 2)");
    }

    #[test]
    fn test_display_normalizes_whitespace() {
        assert_eq!(
            parse("(  vumpus   sally )").unwrap().to_string(),
            "(vumpus sally)"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("(p x"),
            Err(FormatError::MalformedExpression { .. })
        ));
        assert!(matches!(
            parse("(p x) y"),
            Err(FormatError::MalformedExpression { .. })
        ));
        assert!(matches!(
            parse("((p) x)"),
            Err(FormatError::MalformedExpression { .. })
        ));
    }

    #[test]
    fn test_negation() {
        let p = parse("(floral sally)").unwrap();
        let not_p = p.negated();
        assert_eq!(not_p.to_string(), "(not (floral sally))");
        assert_eq!(not_p.negated(), p);
    }

    #[test]
    fn test_symbols() {
        let expr = parse("(not (likes (mother_of ann 'x) ann 2))").unwrap();
        assert_eq!(expr.symbols(), vec!["likes", "mother_of", "ann"]);
    }

    #[test]
    fn test_parse_chain() {
        let chain = parse_chain("[(vumpus 'x) -> (zumpus 'x)]").unwrap();
        assert_eq!(chain.len(), 2);
        assert!(!chain[0].is_ground());
        assert_eq!(parse_chain("(tumpus sally)").unwrap().len(), 1);
    }

    #[test]
    fn test_atom_classes() {
        assert!(is_variable("'x"));
        assert!(is_numeral("42"));
        assert!(is_symbol("sally"));
        assert!(!is_symbol("+"));
        assert!(!is_symbol("'x"));
    }
}
