//! Tag — a random identifier written in base 32

use std::fmt;
use std::str::FromStr;

use crate::codex::{base32_decode, base32_encode, random_bytes, BASE32_ALPHABET};
use crate::{Error, Result};

/// Bytes in a tag made by [`Tag::default_random`]
pub const DEFAULT_TAG_SIZE: usize = 20;

/// A content tag such as `#B3JX0Q`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// A new tag from `size` random bytes
    pub fn random(size: usize) -> Tag {
        Tag(base32_encode(&random_bytes(size.max(1))))
    }

    pub fn default_random() -> Tag {
        Tag::random(DEFAULT_TAG_SIZE)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Tag> {
        if bytes.is_empty() {
            return Err(Error::value("tag", "#", "must contain at least one byte"));
        }
        Ok(Tag(base32_encode(bytes)))
    }

    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        base32_decode(&self.0)
    }

    /// The base-32 text without the leading `#`
    pub fn as_text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix('#')
            .ok_or_else(|| Error::value("tag", text, "must begin with '#'"))?;
        if body.is_empty() {
            return Err(Error::value("tag", text, "is empty"));
        }
        if !body.chars().all(|c| BASE32_ALPHABET.contains(c)) {
            return Err(Error::value(
                "tag",
                text,
                "contains characters outside the base-32 alphabet",
            ));
        }
        Ok(Tag(body.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_tags_are_valid_and_distinct() {
        let first = Tag::default_random();
        let second = Tag::default_random();
        assert_ne!(first, second);
        assert_eq!(first.as_text().len(), 32);
        assert_eq!(first.as_bytes().unwrap().len(), DEFAULT_TAG_SIZE);
        assert_eq!(first.to_string().parse::<Tag>().unwrap(), first);
    }

    #[test]
    fn test_bytes_view() {
        let tag = Tag::from_bytes(&[0xff]).unwrap();
        assert_eq!(tag.to_string(), "#ZW");
        assert_eq!(tag.as_bytes().unwrap(), vec![0xff]);
    }

    #[test]
    fn test_rejects_vowels_and_empty() {
        assert!("#EEE".parse::<Tag>().is_err());
        assert!("#abc".parse::<Tag>().is_err());
        assert!("#".parse::<Tag>().is_err());
        assert!("ABC".parse::<Tag>().is_err());
    }
}
