//! Error types for the notation engine
//!
//! All fallible operations return `Result<T, Error>`.
//! Lexical and syntax errors carry a rendered excerpt of the offending
//! source lines so they can be shown to a person as-is.

use thiserror::Error;

/// Notation engine error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Source text matched no token pattern
    #[error("Lexical error: unexpected character {character:?} at {line}:{column}\n{excerpt}")]
    LexicalError {
        character: char,
        line: usize,
        column: usize,
        excerpt: String,
    },

    /// A committed grammar production could not be completed
    #[error("Syntax error: expected {expected}, found {found} at {line}:{column}\n{excerpt}")]
    SyntaxError {
        expected: String,
        found: String,
        line: usize,
        column: usize,
        rules: Vec<String>,
        excerpt: String,
    },

    /// A well-formed literal failed semantic validation
    #[error("Invalid {kind} literal {text:?}: {reason}")]
    ValueError {
        kind: &'static str,
        text: String,
        reason: String,
    },

    /// A host value has no counterpart in the notation
    #[error("Format error: {0}")]
    FormatError(String),

    /// Malformed base-16/32/64 text
    #[error("Codec error: {0}")]
    CodecError(String),
}

impl Error {
    pub(crate) fn value(kind: &'static str, text: &str, reason: impl Into<String>) -> Self {
        Error::ValueError {
            kind,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for notation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render the source lines around `line` with a caret under `column`.
///
/// Up to two lines of context are shown on either side. Line and column are
/// 1-based; columns count characters, not bytes.
pub(crate) fn source_excerpt(source: &str, line: usize, column: usize) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let first = line.saturating_sub(3);
    let last = (line + 2).min(lines.len());
    let mut out = String::new();
    for (index, text) in lines.iter().enumerate().take(last).skip(first) {
        let number = index + 1;
        out.push_str(&format!("{:04}: {}\n", number, text.trim_end_matches('\r')));
        if number == line {
            out.push_str("      ");
            out.push_str(&" ".repeat(column.saturating_sub(1)));
            out.push_str("^\n");
        }
    }
    if line > lines.len() {
        out.push_str("      ^\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_places_caret_under_column() {
        let source = "[\n    $alpha: 1\n    $beta 2\n]";
        let excerpt = source_excerpt(source, 3, 11);
        let lines: Vec<&str> = excerpt.lines().collect();
        assert_eq!(lines[0], "0001: [");
        assert_eq!(lines[2], "0003:     $beta 2");
        assert_eq!(lines[3], format!("      {}^", " ".repeat(10)));
        assert_eq!(lines[4], "0004: ]");
    }

    #[test]
    fn test_excerpt_limits_context() {
        let source = "a\nb\nc\nd\ne\nf\ng";
        let excerpt = source_excerpt(source, 4, 1);
        assert!(!excerpt.contains("0001"));
        assert!(excerpt.contains("0002: b"));
        assert!(excerpt.contains("0006: f"));
        assert!(!excerpt.contains("0007"));
    }

    #[test]
    fn test_value_error_display() {
        let err = Error::value("tag", "#EEE", "contains characters outside the base-32 alphabet");
        assert_eq!(
            err.to_string(),
            "Invalid tag literal \"#EEE\": contains characters outside the base-32 alphabet"
        );
    }
}
