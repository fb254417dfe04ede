//! Token definitions for block payloads
//!
//! Propositions (`(vumpus 'x) -> (zumpus 'x)`) and infix equations
//! (`2 * x + 1 = 7`) share one logos lexer. Operators double as atoms when
//! they appear in head position of an s-expression, e.g. `(= (+ x 1) 2)`.

use std::fmt;

use logos::Logos;

use crate::csd::error::FormatError;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("->")]
    Arrow,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("=")]
    Equals,

    /// Bound variable: quote-prefixed name, e.g. `'x`
    #[regex(r"'[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Variable(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Symbol(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),
}

impl Token {
    /// Text of this token when used as an s-expression atom.
    pub fn atom_text(&self) -> Option<String> {
        match self {
            Token::Variable(s) | Token::Symbol(s) | Token::Number(s) => Some(s.clone()),
            Token::Plus => Some("+".into()),
            Token::Minus => Some("-".into()),
            Token::Star => Some("*".into()),
            Token::Slash => Some("/".into()),
            Token::Caret => Some("^".into()),
            Token::Equals => Some("=".into()),
            Token::OpenParen | Token::CloseParen | Token::Arrow => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Arrow => write!(f, "->"),
            other => write!(f, "{}", other.atom_text().unwrap_or_default()),
        }
    }
}

/// Tokenize a block payload, failing on the first character no token accepts.
pub fn tokenize(source: &str) -> Result<Vec<Token>, FormatError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(FormatError::UnexpectedCharacter {
                    source_text: source.to_string(),
                    text: lexer.slice().to_string(),
                    offset: lexer.span().start,
                })
            }
        }
    }

    Ok(tokens)
}
