//! Tokenizer — converts notation text into a lazy token stream
//!
//! Each token kind is recognized by an anchored regular expression. At every
//! position the matchers are tried in a fixed priority order and the first
//! match wins, so the order of `MATCHERS` is part of the grammar: percentages
//! before numbers, narratives before quotes, delimiters last.
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Lazy: tokens are produced one per `next()`, nothing is scanned ahead
//! - Terminated: exactly one `Eof` token, or a single `Error` token that
//!   ends the stream

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::elements::REAL;

/// Token kinds of the notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Error,
    Eof,
    Eol,
    Comment,
    Note,
    Narrative,
    Binary,
    Pattern,
    Quote,
    Moment,
    Resource,
    Duration,
    Angle,
    Percentage,
    Probability,
    Number,
    Boolean,
    Version,
    Tag,
    Symbol,
    Name,
    Keyword,
    Identifier,
    Delimiter,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Error => "ERROR",
            TokenKind::Eof => "EOF",
            TokenKind::Eol => "EOL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Note => "NOTE",
            TokenKind::Narrative => "NARRATIVE",
            TokenKind::Binary => "BINARY",
            TokenKind::Pattern => "PATTERN",
            TokenKind::Quote => "QUOTE",
            TokenKind::Moment => "MOMENT",
            TokenKind::Resource => "RESOURCE",
            TokenKind::Duration => "DURATION",
            TokenKind::Angle => "ANGLE",
            TokenKind::Percentage => "PERCENTAGE",
            TokenKind::Probability => "PROBABILITY",
            TokenKind::Number => "NUMBER",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Version => "VERSION",
            TokenKind::Tag => "TAG",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Name => "NAME",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Delimiter => "DELIMITER",
        };
        write!(f, "{}", name)
    }
}

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with its source text and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Byte offset just past the token
    pub fn end(&self) -> usize {
        self.span.offset + self.text.len()
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_delimiter(&self, text: &str) -> bool {
        self.is(TokenKind::Delimiter, text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Eol => write!(f, "EOL"),
            _ => write!(f, "{} {:?}", self.kind, self.text),
        }
    }
}

/// Procedural keywords; they can never be identifiers
pub const KEYWORDS: &[&str] = &[
    "accept", "break", "checkout", "continue", "discard", "do", "each", "else", "from", "if",
    "in", "level", "matches", "notarize", "on", "post", "publish", "reject", "retrieve",
    "return", "save", "select", "throw", "to", "while", "with", "and", "or", "not", "sans",
    "xor", "is", "at",
];

/// Delimiters, longest first
pub const DELIMITERS: &[&str] = &[
    "<..<", "<..", "..<", "..", ":=", "?=", "+=", "-=", "*=", "/=", "==", "<=", ">=", "<-", "->",
    "[", "]", "(", ")", "{", "}", ":", ",", ";", "<", ">", "=", "~", "&", "|", "^", "*", "/",
    "+", "-", "?", "@", "#", ".", "!",
];

struct Matcher {
    kind: TokenKind,
    regex: Regex,
}

fn alternation(words: &[&str]) -> String {
    let mut words: Vec<&str> = words.to_vec();
    // Longer alternatives first so a prefix never shadows a whole word.
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

static MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    let real = REAL;
    let timespan = r"[0-9]+(?:\.[0-9]+)?";
    let t = timespan;
    let quote = r#""(?:\\.|[^"\r\n\\])*""#;
    let table: Vec<(TokenKind, String)> = vec![
        (TokenKind::Eol, r"\r?\n".to_string()),
        (TokenKind::Comment, r"!>(?s:.*?)<!".to_string()),
        (TokenKind::Note, r"! [^\r\n]*".to_string()),
        (TokenKind::Narrative, r#"">\r?\n(?s:.*?)<""#.to_string()),
        (TokenKind::Binary, r"'[A-Za-z0-9+/=\s]*'".to_string()),
        (TokenKind::Pattern, format!(r"(?:none|any|{quote}\?)")),
        (TokenKind::Quote, quote.to_string()),
        (
            TokenKind::Moment,
            r"<-?[0-9]+(?:-[0-9]{2}(?:-[0-9]{2}(?:T[0-9]{2}(?::[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?)?)?)?)?>"
                .to_string(),
        ),
        (TokenKind::Resource, r"<[a-zA-Z][a-zA-Z0-9+.\-]*:[^\s>]*>".to_string()),
        (
            TokenKind::Duration,
            format!(r"~-?P(?:{t}W|(?:{t}Y)?(?:{t}M)?(?:{t}D)?(?:T(?:{t}H)?(?:{t}M)?(?:{t}S)?)?)"),
        ),
        (TokenKind::Angle, format!("~{real}")),
        (TokenKind::Percentage, format!("{real}%")),
        (TokenKind::Probability, r"(?:\.[0-9]+|1\.)".to_string()),
        (
            TokenKind::Number,
            format!(
                r"(?:undefined|[+-]?(?:infinity|∞)|\({real}, (?:{real}|-)?i\)|\({real}e\^~{real}i\)|(?:{real}|-)?i|{real})"
            ),
        ),
        (TokenKind::Boolean, "(?:false|true)".to_string()),
        (TokenKind::Version, r"v[1-9][0-9]*(?:\.[1-9][0-9]*)*".to_string()),
        (TokenKind::Tag, "#[0-9A-DF-HJ-NP-TV-Z]+".to_string()),
        (TokenKind::Symbol, r"\$[a-zA-Z][a-zA-Z0-9]*(?:-[1-9][0-9]*)?".to_string()),
        (TokenKind::Name, r"(?:/[a-zA-Z][a-zA-Z0-9]*(?:\.[0-9]+)*)+".to_string()),
        (TokenKind::Keyword, format!("(?:{})", alternation(KEYWORDS))),
        (TokenKind::Identifier, "[a-zA-Z][a-zA-Z0-9]*".to_string()),
        (TokenKind::Delimiter, format!("(?:{})", alternation(DELIMITERS))),
    ];
    table
        .into_iter()
        .map(|(kind, pattern)| Matcher {
            kind,
            regex: Regex::new(&format!("^{}", pattern)).expect("token pattern"),
        })
        .collect()
});

fn is_word_character(c: char) -> bool {
    c.is_alphanumeric()
}

/// A match is rejected when it would split a word in two (`trueish`,
/// `anyone`, `3if`), or when `1.` is really the start of a range or a real.
fn accept(kind: TokenKind, text: &str, rest: &str) -> bool {
    let following = rest[text.len()..].chars().next();
    let last = text.chars().last();
    if let (Some(last), Some(next)) = (last, following) {
        if is_word_character(last) && is_word_character(next) {
            return false;
        }
    }
    if kind == TokenKind::Probability && text == "1." {
        if let Some(next) = following {
            if next == '.' || next.is_ascii_digit() {
                return false;
            }
        }
    }
    true
}

/// Pull-based tokenizer over notation source text
pub struct Tokenizer<'a> {
    source: &'a str,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input text
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            source,
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Drain the whole stream
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn advance_over(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += text.len();
    }

    fn skip_spaces(&mut self) {
        let rest = &self.source[self.position..];
        let spaces = rest.len() - rest.trim_start_matches(' ').len();
        self.position += spaces;
        self.column += spaces;
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        self.skip_spaces();
        let span = self.current_span();
        let rest = &self.source[self.position..];
        let Some(character) = rest.chars().next() else {
            self.finished = true;
            return Some(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span,
            });
        };
        for matcher in MATCHERS.iter() {
            if let Some(found) = matcher.regex.find(rest) {
                let text = found.as_str();
                if text.is_empty() || !accept(matcher.kind, text, rest) {
                    continue;
                }
                let token = Token {
                    kind: matcher.kind,
                    text: text.to_string(),
                    span,
                };
                self.advance_over(text);
                return Some(token);
            }
        }
        self.finished = true;
        Some(Token {
            kind: TokenKind::Error,
            text: character.to_string(),
            span,
        })
    }
}
