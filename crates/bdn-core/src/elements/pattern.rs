//! Pattern — a regular expression, or one of the sentinels `none` and `any`

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

/// Text that can sit between double quotes: escapes, or anything but a quote,
/// backslash or line break
static QUOTABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:\\.|[^"\r\n\\])*$"#).expect("quotable pattern"));

/// A pattern that a whole string either matches or does not.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches nothing
    None,
    /// Matches everything
    Any,
    /// A regular expression, kept as written and compiled anchored
    Expression { source: String, regex: Regex },
}

impl Pattern {
    /// Compile a regular expression body (the text between the quotes)
    ///
    /// A literal `"` must be written `\"`, and line breaks are not allowed.
    pub fn from_expression(source: &str) -> Result<Pattern> {
        if !QUOTABLE.is_match(source) {
            return Err(Error::value("pattern", source, "cannot be written between double quotes"));
        }
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            Error::value("pattern", source, format!("invalid regular expression: {}", e))
        })?;
        Ok(Pattern::Expression {
            source: source.to_string(),
            regex,
        })
    }

    /// Whether `text` matches the pattern in its entirety
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::None => false,
            Pattern::Any => true,
            Pattern::Expression { regex, .. } => regex.is_match(text),
        }
    }

    /// The expression source, if this is not a sentinel
    pub fn as_expression(&self) -> Option<&str> {
        match self {
            Pattern::Expression { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::None, Pattern::None) | (Pattern::Any, Pattern::Any) => true,
            (Pattern::Expression { source: a, .. }, Pattern::Expression { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pattern::None => write!(f, "none"),
            Pattern::Any => write!(f, "any"),
            Pattern::Expression { source, .. } => write!(f, "\"{}\"?", source),
        }
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text {
            "none" => Ok(Pattern::None),
            "any" => Ok(Pattern::Any),
            _ => {
                let source = text
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix("\"?"))
                    .ok_or_else(|| {
                        Error::value("pattern", text, "must be 'none', 'any' or a quoted expression followed by '?'")
                    })?;
                Pattern::from_expression(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert!(!Pattern::None.matches(""));
        assert!(Pattern::Any.matches("anything at all"));
        assert_eq!("none".parse::<Pattern>().unwrap(), Pattern::None);
        assert_eq!(Pattern::Any.to_string(), "any");
    }

    #[test]
    fn test_expression_matches_whole_text() {
        let pattern: Pattern = "\"[a-z]+\"?".parse().unwrap();
        assert!(pattern.matches("abc"));
        assert!(!pattern.matches("abc1"));
        assert!(!pattern.matches("1abc"));
        assert_eq!(pattern.to_string(), "\"[a-z]+\"?");
        assert_eq!(pattern.as_expression(), Some("[a-z]+"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_group() {
        let pattern = Pattern::from_expression("cat|dog").unwrap();
        assert!(pattern.matches("cat"));
        assert!(pattern.matches("dog"));
        assert!(!pattern.matches("cats"));
    }

    #[test]
    fn test_invalid_expressions_are_rejected() {
        assert!("\"[a-z\"?".parse::<Pattern>().is_err());
        assert!("\"abc\"".parse::<Pattern>().is_err());
        assert!("never".parse::<Pattern>().is_err());
    }

    #[test]
    fn test_unquotable_expressions_are_rejected() {
        for source in ["a\"b", "a\nb", "a\rb", "ab\\"] {
            assert!(
                matches!(Pattern::from_expression(source), Err(Error::ValueError { .. })),
                "{:?} should be rejected",
                source
            );
        }
    }

    #[test]
    fn test_escaped_quote_round_trips() {
        let pattern = Pattern::from_expression(r#"say \"hi\""#).unwrap();
        assert!(pattern.matches("say \"hi\""));
        let text = pattern.to_string();
        assert_eq!(text, r#""say \"hi\""?"#);
        assert_eq!(text.parse::<Pattern>().unwrap(), pattern);
        let component = crate::parser::parse_source(&text).unwrap();
        assert_eq!(crate::formatter::format_component(&component), text);
    }
}
