//! Boolean — `false` or `true`

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Boolean(bool);

impl Boolean {
    pub const FALSE: Boolean = Boolean(false);
    pub const TRUE: Boolean = Boolean(true);

    pub fn new(value: bool) -> Boolean {
        Boolean(value)
    }

    pub fn random() -> Boolean {
        Boolean(crate::codex::random_boolean())
    }

    pub fn as_bool(&self) -> bool {
        self.0
    }

    // ── Logic ──────────────────────────────────────────

    pub fn not(self) -> Boolean {
        Boolean(!self.0)
    }

    pub fn and(first: Boolean, second: Boolean) -> Boolean {
        Boolean(first.0 && second.0)
    }

    /// `first and not second`
    pub fn sans(first: Boolean, second: Boolean) -> Boolean {
        Boolean(first.0 && !second.0)
    }

    pub fn or(first: Boolean, second: Boolean) -> Boolean {
        Boolean(first.0 || second.0)
    }

    pub fn xor(first: Boolean, second: Boolean) -> Boolean {
        Boolean(first.0 != second.0)
    }
}

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        Boolean(value)
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if self.0 { "true" } else { "false" })
    }
}

impl FromStr for Boolean {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text {
            "false" => Ok(Boolean::FALSE),
            "true" => Ok(Boolean::TRUE),
            _ => Err(Error::value("boolean", text, "must be 'false' or 'true'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text() {
        assert_eq!(Boolean::TRUE.to_string(), "true");
        assert_eq!("false".parse::<Boolean>().unwrap(), Boolean::FALSE);
        assert!("True".parse::<Boolean>().is_err());
        assert!("1".parse::<Boolean>().is_err());
    }

    #[test]
    fn test_logic_tables() {
        let (f, t) = (Boolean::FALSE, Boolean::TRUE);
        assert_eq!(t.not(), f);
        assert_eq!(Boolean::and(t, f), f);
        assert_eq!(Boolean::sans(t, f), t);
        assert_eq!(Boolean::sans(t, t), f);
        assert_eq!(Boolean::or(f, t), t);
        assert_eq!(Boolean::xor(t, t), f);
        assert_eq!(Boolean::xor(t, f), t);
    }
}
