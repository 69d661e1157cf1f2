//! Percentage — an unbounded real followed by `%`

use std::fmt;
use std::str::FromStr;

use super::{format_real, parse_real};
use crate::{Error, Result};

/// A percentage; may be negative or exceed one hundred
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percentage(f64);

impl Percentage {
    pub fn from_float(percent: f64) -> Percentage {
        Percentage(if percent == 0.0 { 0.0 } else { percent })
    }

    /// The value in percent (`50%` is `50.0`)
    pub fn as_float(&self) -> f64 {
        self.0
    }

    /// The value as a ratio (`50%` is `0.5`)
    pub fn as_real(&self) -> f64 {
        self.0 / 100.0
    }

    pub fn inverse(self) -> Percentage {
        Percentage::from_float(-self.0)
    }

    pub fn sum(first: Percentage, second: Percentage) -> Percentage {
        Percentage::from_float(first.0 + second.0)
    }

    pub fn difference(first: Percentage, second: Percentage) -> Percentage {
        Percentage::from_float(first.0 - second.0)
    }

    pub fn scaled(percentage: Percentage, factor: f64) -> Percentage {
        Percentage::from_float(percentage.0 * factor)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", format_real(self.0))
    }
}

impl FromStr for Percentage {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let body = text
            .strip_suffix('%')
            .ok_or_else(|| Error::value("percentage", text, "must end with '%'"))?;
        match parse_real(body) {
            Some(value) if value.is_finite() => Ok(Percentage::from_float(value)),
            _ => Err(Error::value("percentage", text, "malformed real value")),
        }
    }
}
