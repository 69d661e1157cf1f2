//! Binary — bytes written as base-64 between single quotes

use std::fmt;
use std::str::FromStr;

use crate::codex::{base16_encode, base64_decode, base64_encode, random_bytes};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Binary(Vec<u8>);

impl Binary {
    pub fn new(bytes: Vec<u8>) -> Binary {
        Binary(bytes)
    }

    pub fn random(size: usize) -> Binary {
        Binary(random_bytes(size))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical base-64 body, without quotes or line breaks
    pub fn to_base64(&self) -> String {
        base64_encode(&self.0)
    }

    pub fn to_base16(&self) -> String {
        base16_encode(&self.0)
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary(bytes)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}'", self.to_base64())
    }
}

impl FromStr for Binary {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .ok_or_else(|| Error::value("binary", text, "must be enclosed in single quotes"))?;
        let bytes = base64_decode(body)
            .map_err(|e| Error::value("binary", text, e.to_string()))?;
        Ok(Binary(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_line_body_is_canonicalized() {
        let binary: Binary = "'\n    AQID\n    BA==\n'".parse().unwrap();
        assert_eq!(binary.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(binary.to_string(), "'AQIDBA=='");
        assert_eq!(binary.to_base16(), "01020304");
    }

    #[test]
    fn test_empty_and_random() {
        let empty: Binary = "''".parse().unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "''");
        assert_eq!(Binary::random(32).len(), 32);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("AQID".parse::<Binary>().is_err());
        assert!("'AQ*D'".parse::<Binary>().is_err());
        assert!("'AQI'".parse::<Binary>().is_err());
    }
}
