//! String literals — binary, name, citation, narrative, quote and version
//!
//! Like the elements, each string kind has exactly one canonical text.
//! [`Text`] is the closed union of them used by the syntax tree.

pub mod binary;
pub mod name;
pub mod narrative;
pub mod quote;
pub mod version;

pub use binary::Binary;
pub use name::{Citation, Name};
pub use narrative::Narrative;
pub use quote::Quote;
pub use version::Version;

use std::fmt;
use std::str::FromStr;

use crate::elements::impl_text_serde;
use crate::{Error, Result};

/// Any string literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Text {
    Binary(Binary),
    Citation(Citation),
    Name(Name),
    Narrative(Narrative),
    Quote(Quote),
    Version(Version),
}

impl Text {
    /// A name token is a citation when its last segment is a version
    pub fn from_name_token(text: &str) -> Result<Text> {
        match text.parse::<Citation>() {
            Ok(citation) => Ok(Text::Citation(citation)),
            Err(_) => Ok(Text::Name(text.parse()?)),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Text::Binary(v) => v.fmt(f),
            Text::Citation(v) => v.fmt(f),
            Text::Name(v) => v.fmt(f),
            Text::Narrative(v) => v.fmt(f),
            Text::Quote(v) => v.fmt(f),
            Text::Version(v) => v.fmt(f),
        }
    }
}

impl FromStr for Text {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if text.starts_with("\">") {
            Ok(Text::Narrative(text.parse()?))
        } else if text.starts_with('"') {
            Ok(Text::Quote(text.parse()?))
        } else if text.starts_with('\'') {
            Ok(Text::Binary(text.parse()?))
        } else if text.starts_with('/') {
            Text::from_name_token(text)
        } else if text.starts_with('v') {
            Ok(Text::Version(text.parse()?))
        } else {
            Err(Error::value("string", text, "is not a string literal"))
        }
    }
}

impl_text_serde!(Binary, Citation, Name, Narrative, Quote, Version, Text);
