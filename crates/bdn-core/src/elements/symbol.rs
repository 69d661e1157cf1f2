//! Symbol — `$identifier` with an optional ordinal suffix

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

static SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$([a-zA-Z][a-zA-Z0-9]*)(?:-([1-9][0-9]*))?$").expect("symbol pattern")
});

/// A symbolic name such as `$alpha` or `$step-2`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    identifier: String,
    ordinal: Option<u64>,
}

impl Symbol {
    pub fn new(identifier: &str) -> Result<Symbol> {
        format!("${}", identifier).parse()
    }

    pub fn with_ordinal(identifier: &str, ordinal: u64) -> Result<Symbol> {
        format!("${}-{}", identifier, ordinal).parse()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn ordinal(&self) -> Option<u64> {
        self.ordinal
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}", self.identifier)?;
        if let Some(ordinal) = self.ordinal {
            write!(f, "-{}", ordinal)?;
        }
        Ok(())
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let captures = SYMBOL
            .captures(text)
            .ok_or_else(|| Error::value("symbol", text, "must be '$' followed by an identifier"))?;
        let identifier = captures[1].to_string();
        let ordinal = match captures.get(2) {
            Some(group) => Some(
                group
                    .as_str()
                    .parse()
                    .map_err(|_| Error::value("symbol", text, "ordinal is too large"))?,
            ),
            None => None,
        };
        Ok(Symbol {
            identifier,
            ordinal,
        })
    }
}
