//! Name and citation — slash-separated identifiers, optionally versioned

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::version::Version;
use crate::{Error, Result};

static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/[a-zA-Z][a-zA-Z0-9]*)+$").expect("name pattern"));

/// A hierarchical name such as `/bali/types/Angle`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Vec<String>);

impl Name {
    pub fn new(segments: &[&str]) -> Result<Name> {
        format!("/{}", segments.join("/")).parse()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// A new name with `segment` appended
    pub fn child(&self, segment: &str) -> Result<Name> {
        format!("{}/{}", self, segment).parse()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if !NAME.is_match(text) {
            return Err(Error::value(
                "name",
                text,
                "must be one or more '/identifier' segments",
            ));
        }
        Ok(Name(text[1..].split('/').map(str::to_string).collect()))
    }
}

/// A name pinned to a version, such as `/bali/types/Angle/v2.1`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Citation {
    name: Name,
    version: Version,
}

impl Citation {
    pub fn new(name: Name, version: Version) -> Citation {
        Citation { name, version }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Citation {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let (name, version) = text
            .rsplit_once('/')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| Error::value("citation", text, "must be a name followed by '/version'"))?;
        let version: Version = version
            .parse()
            .map_err(|_| Error::value("citation", text, "last segment is not a version"))?;
        let name: Name = name
            .parse()
            .map_err(|_| Error::value("citation", text, "malformed name"))?;
        Ok(Citation { name, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_segments() {
        let name: Name = "/bali/types/Angle".parse().unwrap();
        assert_eq!(name.segments(), &["bali", "types", "Angle"]);
        assert_eq!(name.to_string(), "/bali/types/Angle");
        assert_eq!(Name::new(&["bali", "types"]).unwrap().child("Angle").unwrap(), name);
    }

    #[test]
    fn test_name_rejects_malformed() {
        for text in ["bali", "/", "/bali/", "//bali", "/1st", "/a/v1.2"] {
            assert!(text.parse::<Name>().is_err(), "{} should be rejected", text);
        }
    }

    #[test]
    fn test_citation() {
        let citation: Citation = "/bali/types/Angle/v2.1".parse().unwrap();
        assert_eq!(citation.name().to_string(), "/bali/types/Angle");
        assert_eq!(citation.version().levels(), &[2, 1]);
        assert_eq!(citation.to_string(), "/bali/types/Angle/v2.1");
        assert!("/v1".parse::<Citation>().is_err());
        assert!("/bali/types".parse::<Citation>().is_err());
    }

    #[test]
    fn test_version_like_segment_inside_a_name() {
        let name: Name = "/a/v1/b".parse().unwrap();
        assert_eq!(name.segments().len(), 3);
    }
}
