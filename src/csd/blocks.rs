//! Block scanning over raw transcripts
//!
//! A transcript interleaves free text with blocks delimited by a start and an
//! end marker (`[[` / `]]` by default). Each block reads `keyword:content`.
//! The scanner only reads: it finds the block still being generated, and the
//! ordered list of closed blocks with exact duplicates collapsed.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::csd::config::Markers;
use crate::csd::error::FormatError;

/// The kinds of structured block a transcript may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Prop,
    Object,
    Relation,
    Var,
    Eq,
    Axiom,
    Goal,
    Infer,
}

impl Keyword {
    pub const ALL: [Keyword; 8] = [
        Keyword::Prop,
        Keyword::Object,
        Keyword::Relation,
        Keyword::Var,
        Keyword::Eq,
        Keyword::Axiom,
        Keyword::Goal,
        Keyword::Infer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Prop => "prop",
            Keyword::Object => "object",
            Keyword::Relation => "relation",
            Keyword::Var => "var",
            Keyword::Eq => "eq",
            Keyword::Axiom => "axiom",
            Keyword::Goal => "goal",
            Keyword::Infer => "infer",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keyword::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FormatError::UnknownKeyword(s.to_string()))
    }
}

/// A closed block: the raw keyword and everything after the first colon.
///
/// The keyword is kept as written; [`Block::kind`] validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    pub keyword: String,
    pub content: String,
}

impl Block {
    pub fn new(keyword: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            content: content.into(),
        }
    }

    /// Split `keyword:content` on its first colon.
    pub fn split(text: &str) -> Result<Self, FormatError> {
        text.split_once(':')
            .map(|(keyword, content)| Block::new(keyword, content))
            .ok_or_else(|| FormatError::MissingColon {
                block: text.to_string(),
            })
    }

    pub fn kind(&self) -> Result<Keyword, FormatError> {
        self.keyword.parse()
    }

    pub fn is(&self, keyword: Keyword) -> bool {
        self.keyword == keyword.as_str()
    }
}

/// Finds open and closed blocks in a transcript.
#[derive(Debug, Clone)]
pub struct BlockScanner {
    start: String,
    end: String,
}

impl BlockScanner {
    pub fn new(markers: &Markers) -> Self {
        Self {
            start: markers.start.clone(),
            end: markers.end.clone(),
        }
    }

    /// Text of the block still being generated, if any.
    ///
    /// There is no open block when the transcript has no start marker, or
    /// when an end marker follows the last start marker. A block closed
    /// exactly at end of input is closed.
    pub fn locate_open_block<'t>(&self, text: &'t str) -> Option<&'t str> {
        let last_start = text.rfind(&self.start)?;
        match text.rfind(&self.end) {
            Some(last_end) if last_end > last_start => None,
            _ => Some(&text[last_start + self.start.len()..]),
        }
    }

    /// All closed blocks, left to right, with exact duplicates collapsed to
    /// their first occurrence. An unmatched start marker ends the scan.
    pub fn extract_verified_blocks(&self, text: &str) -> Result<Vec<Block>, FormatError> {
        let mut blocks = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = 0;

        while let Some(found) = text[cursor..].find(&self.start) {
            let content_start = cursor + found + self.start.len();
            let Some(length) = text[content_start..].find(&self.end) else {
                break;
            };
            let block = Block::split(&text[content_start..content_start + length])?;
            cursor = content_start + length + self.end.len();

            if seen.insert(block.clone()) {
                blocks.push(block);
            }
        }

        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> BlockScanner {
        BlockScanner::new(&Markers::default())
    }

    #[test]
    fn test_no_open_block_without_markers() {
        assert_eq!(scanner().locate_open_block("plain text"), None);
    }

    #[test]
    fn test_open_block_just_started() {
        assert_eq!(scanner().locate_open_block("Reasoning: [["), Some(""));
        assert_eq!(
            scanner().locate_open_block("Reasoning: [[infer:"),
            Some("infer:")
        );
    }

    #[test]
    fn test_block_closed_at_end_of_input() {
        assert_eq!(scanner().locate_open_block("x [[prop:p]]"), None);
    }

    #[test]
    fn test_extract_dedups_in_first_seen_order() {
        let text = "[[prop:a]] [[object:b]] [[prop:a]] [[axiom:(a b)]] [[object:b]]";
        let blocks = scanner().extract_verified_blocks(text).unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::new("prop", "a"),
                Block::new("object", "b"),
                Block::new("axiom", "(a b)"),
            ]
        );
    }

    #[test]
    fn test_extract_stops_at_open_block() {
        let text = "[[prop:a]] then [[infer:(a b)";
        let blocks = scanner().extract_verified_blocks(text).unwrap();
        assert_eq!(blocks, vec![Block::new("prop", "a")]);
    }

    #[test]
    fn test_extract_splits_on_first_colon() {
        let blocks = scanner()
            .extract_verified_blocks("[[eq:x = 1:2]]")
            .unwrap();
        assert_eq!(blocks, vec![Block::new("eq", "x = 1:2")]);
    }

    #[test]
    fn test_missing_colon_is_fatal() {
        assert_eq!(
            scanner().extract_verified_blocks("[[prop]]"),
            Err(FormatError::MissingColon {
                block: "prop".into()
            })
        );
    }

    #[test]
    fn test_custom_markers() {
        let scanner = BlockScanner::new(&Markers {
            start: "<<".into(),
            end: ">>".into(),
        });
        let blocks = scanner.extract_verified_blocks("<<goal:(p a)>> <<inf").unwrap();
        assert_eq!(blocks, vec![Block::new("goal", "(p a)")]);
        assert_eq!(scanner.locate_open_block("<<goal:(p a)>> <<inf"), Some("inf"));
    }

    #[test]
    fn test_keyword_parsing() {
        assert_eq!("infer".parse::<Keyword>(), Ok(Keyword::Infer));
        assert_eq!(
            "lemma".parse::<Keyword>(),
            Err(FormatError::UnknownKeyword("lemma".into()))
        );
        assert!(Block::new("var", "x").is(Keyword::Var));
    }
}
