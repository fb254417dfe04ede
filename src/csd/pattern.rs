//! Finite-state patterns handed to the token-level consumer
//!
//! A [`Pattern`] is a regular expression over the characters that may follow
//! the current transcript. The builders here produce pattern *sources*
//! (plain strings), which the grammar and engine compose before compiling.

use std::fmt;

use regex::Regex;

/// A sub-pattern that never matches (`\b` and `\B` at the same position).
pub const NEVER: &str = r"\b\B";

/// A compiled pattern for the next characters of a transcript.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    full: Regex,
    prefix: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let full = Regex::new(&format!("^(?:{})$", source))?;
        let prefix = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self {
            source,
            full,
            prefix,
        })
    }

    /// The uncompiled pattern source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` is exactly one string of the pattern's language.
    pub fn is_match(&self, text: &str) -> bool {
        self.full.is_match(text)
    }

    /// Length of the leftmost match anchored at the start of `text`.
    pub fn match_prefix(&self, text: &str) -> Option<usize> {
        self.prefix.find(text).map(|m| m.end())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Any run of characters in which `marker` occurs exactly once, at the end.
///
/// Built from the marker's prefix automaton: state `q` means the text read so
/// far ends with the first `q` characters of the marker. Inner states are
/// eliminated until only the start state and the accepting state remain, so
/// markers that overlap themselves (`<!--`, `abab`) are handled exactly.
pub fn through_first(marker: &str) -> String {
    let marker: Vec<char> = marker.chars().collect();
    let accept = marker.len();
    if accept == 0 {
        return String::new();
    }

    let mut alphabet = marker.clone();
    alphabet.sort_unstable();
    alphabet.dedup();

    // edges[i][j]: what leads from state i to state j
    let mut edges: Vec<Vec<Option<Re>>> = vec![vec![None; accept + 1]; accept + 1];
    for state in 0..accept {
        let mut advancing = Vec::new();
        let mut targets: Vec<(usize, Vec<char>)> = Vec::new();
        for &c in &alphabet {
            let target = advance(&marker, state, c);
            if target == 0 {
                continue;
            }
            advancing.push(c);
            match targets.iter_mut().find(|(t, _)| *t == target) {
                Some((_, chars)) => chars.push(c),
                None => targets.push((target, vec![c])),
            }
        }
        edges[state][0] = Some(Re::Unit(class(&advancing, true)));
        for (target, chars) in targets {
            edges[state][target] = Some(Re::Unit(class(&chars, false)));
        }
    }

    for inner in (1..accept).rev() {
        let looped = edges[inner][inner].take().map(Re::star);
        let outgoing: Vec<(usize, Re)> = (0..inner)
            .chain([accept])
            .filter_map(|j| edges[inner][j].take().map(|re| (j, re)))
            .collect();

        for from in 0..inner {
            let Some(incoming) = edges[from][inner].take() else {
                continue;
            };
            for (to, out) in &outgoing {
                let mut path = vec![incoming.clone()];
                path.extend(looped.clone());
                path.push(out.clone());
                let path = Re::seq(path);
                edges[from][*to] = Some(match edges[from][*to].take() {
                    Some(existing) => Re::alt(vec![existing, path]),
                    None => path,
                });
            }
        }
    }

    let mut whole: Vec<Re> = edges[0][0].take().map(Re::star).into_iter().collect();
    whole.extend(edges[0][accept].take());
    Re::seq(whole).to_string()
}

/// Length of the longest marker prefix that ends the text after reading `c`
/// in `state`.
fn advance(marker: &[char], state: usize, c: char) -> usize {
    let mut seen = marker[..state].to_vec();
    seen.push(c);
    (1..=seen.len())
        .rev()
        .find(|&k| seen.ends_with(&marker[..k]))
        .unwrap_or(0)
}

/// Names of one to `max_len` characters, drawn from `first` for the leading
/// character and `rest` after it, other than any of `excluded`.
///
/// The excluded names form a trie. Off the trie every continuation is free;
/// on it, a name may only stop at a node that is not itself excluded.
pub fn identifier_excluding<I, S>(first: &[char], rest: &[char], max_len: usize, excluded: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if max_len == 0 || first.is_empty() {
        return alternation(Vec::<String>::new());
    }
    let names: Vec<Vec<char>> = excluded
        .into_iter()
        .map(|name| name.as_ref().chars().collect::<Vec<_>>())
        .filter(|name| {
            (1..=max_len).contains(&name.len())
                && first.contains(&name[0])
                && name[1..].iter().all(|c| rest.contains(c))
        })
        .collect();

    let alphabet = Alphabet {
        first,
        rest,
        max_len,
    };
    alphabet.excluding(&names, &[]).to_string()
}

struct Alphabet<'a> {
    first: &'a [char],
    rest: &'a [char],
    max_len: usize,
}

impl Alphabet<'_> {
    fn excluding(&self, names: &[Vec<char>], prefix: &[char]) -> Re {
        let depth = prefix.len();
        let can_stop = depth > 0 && !names.iter().any(|name| name == prefix);
        if depth == self.max_len {
            return if can_stop { Re::seq(Vec::new()) } else { Re::alt(Vec::new()) };
        }

        let allowed = if depth == 0 { self.first } else { self.rest };
        let mut branching: Vec<char> = names
            .iter()
            .filter(|name| name.len() > depth && name.starts_with(prefix))
            .map(|name| name[depth])
            .collect();
        branching.sort_unstable();
        branching.dedup();

        let mut options = Vec::new();
        for &c in &branching {
            let mut next = prefix.to_vec();
            next.push(c);
            options.push(Re::seq(vec![
                Re::Unit(class(&[c], false)),
                self.excluding(names, &next),
            ]));
        }

        let free: Vec<char> = allowed
            .iter()
            .copied()
            .filter(|c| !branching.contains(c))
            .collect();
        if !free.is_empty() {
            let mut tail = vec![Re::Unit(class(&free, false))];
            let remaining = self.max_len - depth - 1;
            if remaining > 0 && !self.rest.is_empty() {
                tail.push(Re::Repeat(Box::new(Re::Unit(class(self.rest, false))), remaining));
            }
            options.push(Re::seq(tail));
        }

        let continued = Re::alt(options);
        if can_stop {
            Re::Optional(Box::new(continued))
        } else {
            continued
        }
    }
}

/// Character class over `chars`. Runs of three or more consecutive
/// characters are written as ranges; a single positive character is written
/// as an escaped literal.
fn class(chars: &[char], negated: bool) -> String {
    let mut chars = chars.to_vec();
    chars.sort_unstable();
    chars.dedup();
    let escape = |c: char| regex::escape(c.encode_utf8(&mut [0; 4]));

    if !negated && chars.len() == 1 {
        return escape(chars[0]);
    }

    let mut body = String::new();
    let mut i = 0;
    while i < chars.len() {
        let mut j = i;
        while j + 1 < chars.len() && chars[j + 1] as u32 == chars[j] as u32 + 1 {
            j += 1;
        }
        if j - i >= 2 {
            body.push_str(&format!("{}-{}", escape(chars[i]), escape(chars[j])));
        } else {
            for &c in &chars[i..=j] {
                body.push_str(&escape(c));
            }
        }
        i = j + 1;
    }
    format!("[{}{}]", if negated { "^" } else { "" }, body)
}

/// Small regex tree for the generated patterns above.
#[derive(Debug, Clone)]
enum Re {
    /// One character position: an escaped literal or a class.
    Unit(String),
    Seq(Vec<Re>),
    Alt(Vec<Re>),
    Star(Box<Re>),
    Optional(Box<Re>),
    /// Zero up to `n` repetitions.
    Repeat(Box<Re>, usize),
}

impl Re {
    fn seq(items: Vec<Re>) -> Re {
        let mut flat = Vec::new();
        for item in items {
            match item {
                Re::Seq(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        Re::Seq(flat)
    }

    fn alt(items: Vec<Re>) -> Re {
        let mut flat = Vec::new();
        for item in items {
            match item {
                Re::Alt(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        Re::Alt(flat)
    }

    fn star(inner: Re) -> Re {
        Re::Star(Box::new(inner))
    }

    /// Whether a postfix operator binds to the whole of this node.
    fn is_atomic(&self) -> bool {
        matches!(self, Re::Unit(_) | Re::Alt(_))
    }
}

impl fmt::Display for Re {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Re::Unit(unit) => f.write_str(unit),
            Re::Seq(items) => items.iter().try_for_each(|item| write!(f, "{}", item)),
            Re::Alt(items) if items.is_empty() => write!(f, "(?:{})", NEVER),
            Re::Alt(items) => {
                let options: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "(?:{})", options.join("|"))
            }
            Re::Star(inner) => write_postfix(f, inner, "*"),
            Re::Optional(inner) => write_postfix(f, inner, "?"),
            Re::Repeat(inner, n) => write_postfix(f, inner, &format!("{{0,{}}}", n)),
        }
    }
}

fn write_postfix(f: &mut fmt::Formatter<'_>, inner: &Re, op: &str) -> fmt::Result {
    if inner.is_atomic() {
        write!(f, "{}{}", inner, op)
    } else {
        write!(f, "(?:{}){}", inner, op)
    }
}

/// Alternation of literal strings, or [`NEVER`] when there are none.
pub fn literal_alternation<I, S>(literals: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let escaped: Vec<String> = literals
        .into_iter()
        .map(|s| regex::escape(s.as_ref()))
        .collect();
    alternation(escaped)
}

/// Alternation of pattern sources, or [`NEVER`] when there are none.
pub fn alternation<I, S>(sources: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sources: Vec<String> = sources.into_iter().map(|s| s.as_ref().to_string()).collect();
    if sources.is_empty() {
        return format!("(?:{})", NEVER);
    }
    format!("(?:{})", sources.join("|"))
}
