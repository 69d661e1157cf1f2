//! Version — `v` followed by dot-separated ordinals

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v[1-9][0-9]*(?:\.[1-9][0-9]*)*$").expect("version pattern"));

/// A version number such as `v2.13.1`. Ordering is level by level.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(Vec<u64>);

impl Version {
    pub fn new(levels: Vec<u64>) -> Result<Version> {
        if levels.is_empty() || levels.contains(&0) {
            return Err(Error::value(
                "version",
                &format!("{:?}", levels),
                "needs at least one level and every ordinal must be positive",
            ));
        }
        Ok(Version(levels))
    }

    pub fn levels(&self) -> &[u64] {
        &self.0
    }

    /// The next version at `level` (1-based).
    ///
    /// Levels below it are dropped; a level one past the end starts a new
    /// sub-level at `1`. Out of range levels are clamped.
    pub fn next(&self, level: usize) -> Version {
        let level = level.clamp(1, self.0.len() + 1);
        let mut levels: Vec<u64> = self.0.iter().copied().take(level).collect();
        if level > self.0.len() {
            levels.push(1);
        } else {
            levels[level - 1] = levels[level - 1].saturating_add(1);
        }
        Version(levels)
    }

    /// Whether `next` is a direct successor of `current` at some level
    pub fn is_valid_next(current: &Version, next: &Version) -> bool {
        (1..=current.0.len() + 1).any(|level| current.next(level) == *next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let levels: Vec<String> = self.0.iter().map(|l| l.to_string()).collect();
        write!(f, "v{}", levels.join("."))
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if !VERSION.is_match(text) {
            return Err(Error::value("version", text, "must be 'v' followed by positive ordinals"));
        }
        text[1..]
            .split('.')
            .map(|level| {
                level
                    .parse()
                    .map_err(|_| Error::value("version", text, "ordinal is too large"))
            })
            .collect::<Result<Vec<u64>>>()
            .map(Version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let version: Version = "v2.13.1".parse().unwrap();
        assert_eq!(version.levels(), &[2, 13, 1]);
        assert_eq!(version.to_string(), "v2.13.1");
        for text in ["v0", "v1.0", "1.2", "v", "v1.", "v01"] {
            assert!(text.parse::<Version>().is_err(), "{} should be rejected", text);
        }
    }

    #[test]
    fn test_next_levels() {
        let version: Version = "v1.2.3".parse().unwrap();
        assert_eq!(version.next(1).to_string(), "v2");
        assert_eq!(version.next(2).to_string(), "v1.3");
        assert_eq!(version.next(3).to_string(), "v1.2.4");
        assert_eq!(version.next(4).to_string(), "v1.2.3.1");
        assert_eq!(version.next(9).to_string(), "v1.2.3.1");
        assert_eq!(version.next(0).to_string(), "v2");
    }

    #[test]
    fn test_valid_successors() {
        let version: Version = "v1.2".parse().unwrap();
        for next in ["v2", "v1.3", "v1.2.1"] {
            assert!(Version::is_valid_next(&version, &next.parse().unwrap()), "{}", next);
        }
        for next in ["v3", "v1.4", "v1.2", "v1.2.2"] {
            assert!(!Version::is_valid_next(&version, &next.parse().unwrap()), "{}", next);
        }
    }

    #[test]
    fn test_ordering() {
        let mut versions: Vec<Version> = ["v2", "v1.10", "v1.2", "v1"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        versions.sort();
        let sorted: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(sorted, vec!["v1", "v1.2", "v1.10", "v2"]);
    }
}
