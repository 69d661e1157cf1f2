//! Quote — a single-line string with JSON-style escapes

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A quoted string. The decoded text is stored; rendering re-escapes it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quote(String);

impl Quote {
    pub fn new(text: impl Into<String>) -> Quote {
        Quote(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Quote {
    fn from(text: &str) -> Self {
        Quote(text.to_string())
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"")?;
        for character in self.0.chars() {
            match character {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                '\u{08}' => write!(f, "\\b")?,
                '\u{0c}' => write!(f, "\\f")?,
                c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "\"")
    }
}

impl FromStr for Quote {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| Error::value("quote", text, "must be enclosed in double quotes"))?;
        let mut out = String::with_capacity(body.len());
        let mut characters = body.chars();
        while let Some(character) = characters.next() {
            match character {
                '\\' => {
                    let escaped = characters
                        .next()
                        .ok_or_else(|| Error::value("quote", text, "ends inside an escape"))?;
                    match escaped {
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        '/' => out.push('/'),
                        'b' => out.push('\u{08}'),
                        'f' => out.push('\u{0c}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        'u' => out.push(unicode_escape(&mut characters, text)?),
                        other => {
                            return Err(Error::value(
                                "quote",
                                text,
                                format!("unknown escape '\\{}'", other),
                            ))
                        }
                    }
                }
                '"' => return Err(Error::value("quote", text, "contains an unescaped '\"'")),
                '\n' | '\r' => return Err(Error::value("quote", text, "spans more than one line")),
                c => out.push(c),
            }
        }
        Ok(Quote(out))
    }
}

fn hex4(characters: &mut std::str::Chars<'_>, text: &str) -> Result<u32> {
    let digits: String = characters.take(4).collect();
    if digits.len() != 4 {
        return Err(Error::value("quote", text, "truncated '\\u' escape"));
    }
    u32::from_str_radix(&digits, 16)
        .map_err(|_| Error::value("quote", text, "malformed '\\u' escape"))
}

/// Decode the hex digits of a `\u` escape, combining a surrogate pair
fn unicode_escape(characters: &mut std::str::Chars<'_>, text: &str) -> Result<char> {
    let first = hex4(characters, text)?;
    let code = if (0xD800..0xDC00).contains(&first) {
        if characters.next() != Some('\\') || characters.next() != Some('u') {
            return Err(Error::value("quote", text, "unpaired surrogate"));
        }
        let second = hex4(characters, text)?;
        if !(0xDC00..0xE000).contains(&second) {
            return Err(Error::value("quote", text, "unpaired surrogate"));
        }
        0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
    } else {
        first
    };
    char::from_u32(code).ok_or_else(|| Error::value("quote", text, "invalid code point"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_decode() {
        let quote: Quote = r#""a\"b\\c\/d\n\té😀""#.parse().unwrap();
        assert_eq!(quote.as_str(), "a\"b\\c/d\n\té😀");
        let pair: Quote = r#""\ud83d\ude00""#.parse().unwrap();
        assert_eq!(pair.as_str(), "😀");
    }

    #[test]
    fn test_canonical_reescaping() {
        let quote: Quote = r#""\/A\u0001""#.parse().unwrap();
        assert_eq!(quote.to_string(), r#""/A\u0001""#);
        assert_eq!(Quote::new("tab\there").to_string(), r#""tab\there""#);
        assert_eq!(Quote::new("").to_string(), "\"\"");
    }

    #[test]
    fn test_rejects_malformed() {
        for text in ["\"", "abc", r#""\x""#, r#""\u12""#, r#""\ud800""#, "\"a\nb\"", r#""a"b""#] {
            assert!(text.parse::<Quote>().is_err(), "{:?} should be rejected", text);
        }
    }
}
