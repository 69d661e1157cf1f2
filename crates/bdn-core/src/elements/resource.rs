//! Resource — a URI in angle brackets

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{Error, Result};

static RESOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9+.\-]*:[^\s>]*)>$").expect("resource pattern")
});

/// The decomposition expression from RFC 3986 appendix B
static COMPONENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([^:/?#]+):)?(//([^/?#]*))?([^?#]*)(\?([^#]*))?(#(.*))?").expect("uri pattern")
});

/// A URI. Only the full text is stored; the accessors decompose on demand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resource(String);

impl Resource {
    /// Validate a bare URI (without the angle brackets)
    pub fn from_uri(uri: &str) -> Result<Resource> {
        format!("<{}>", uri).parse()
    }

    pub fn as_uri(&self) -> &str {
        &self.0
    }

    fn components(&self) -> Option<Captures<'_>> {
        COMPONENTS.captures(&self.0)
    }

    fn component(&self, index: usize) -> Option<&str> {
        self.components()
            .and_then(|captures| captures.get(index))
            .map(|group| group.as_str())
    }

    pub fn scheme(&self) -> Option<&str> {
        self.component(2)
    }

    pub fn authority(&self) -> Option<&str> {
        self.component(4)
    }

    /// The path, possibly empty
    pub fn path(&self) -> &str {
        self.component(5).unwrap_or("")
    }

    pub fn query(&self) -> Option<&str> {
        self.component(7)
    }

    pub fn fragment(&self) -> Option<&str> {
        self.component(9)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        RESOURCE
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|uri| Resource(uri.as_str().to_string()))
            .ok_or_else(|| Error::value("resource", text, "must be '<scheme:...>' without spaces"))
    }
}
