//! Probability — a real in `[0, 1]` written without its integer part

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A probability clamped to `[0, 1]`.
///
/// The canonical text elides the integer part: `.0`, `.25`, `1.`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Probability(f64);

impl Probability {
    pub const IMPOSSIBLE: Probability = Probability(0.0);
    pub const EVEN: Probability = Probability(0.5);
    pub const CERTAIN: Probability = Probability(1.0);

    /// Clamp `value` into `[0, 1]`; NaN becomes `0`
    pub fn from_float(value: f64) -> Probability {
        if value.is_nan() || value <= 0.0 {
            Probability(0.0)
        } else if value >= 1.0 {
            Probability(1.0)
        } else {
            Probability(value)
        }
    }

    pub fn random() -> Probability {
        Probability::from_float(crate::codex::random_probability())
    }

    pub fn as_float(&self) -> f64 {
        self.0
    }

    // ── Logic (independent events) ─────────────────────

    pub fn not(self) -> Probability {
        Probability::from_float(1.0 - self.0)
    }

    pub fn and(first: Probability, second: Probability) -> Probability {
        Probability::from_float(first.0 * second.0)
    }

    /// `first and not second`
    pub fn sans(first: Probability, second: Probability) -> Probability {
        Probability::from_float(first.0 * (1.0 - second.0))
    }

    pub fn or(first: Probability, second: Probability) -> Probability {
        Probability::from_float(first.0 + second.0 - first.0 * second.0)
    }

    pub fn xor(first: Probability, second: Probability) -> Probability {
        Probability::from_float(first.0 + second.0 - 2.0 * first.0 * second.0)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0.0 {
            return write!(f, ".0");
        }
        if self.0 == 1.0 {
            return write!(f, "1.");
        }
        let text = format!("{}", self.0);
        write!(f, "{}", text.trim_start_matches('0'))
    }
}

impl FromStr for Probability {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if text == "1." {
            return Ok(Probability::CERTAIN);
        }
        let digits = text
            .strip_prefix('.')
            .filter(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| Error::value("probability", text, "must be '1.' or '.' followed by digits"))?;
        let value: f64 = format!("0.{}", digits)
            .parse()
            .map_err(|_| Error::value("probability", text, "malformed fraction"))?;
        Ok(Probability::from_float(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text() {
        assert_eq!(Probability::IMPOSSIBLE.to_string(), ".0");
        assert_eq!(Probability::EVEN.to_string(), ".5");
        assert_eq!(Probability::CERTAIN.to_string(), "1.");
        assert_eq!(Probability::from_float(1e-7).to_string(), ".0000001");
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(".5".parse::<Probability>().unwrap(), Probability::EVEN);
        assert_eq!("1.".parse::<Probability>().unwrap(), Probability::CERTAIN);
        assert_eq!(".000".parse::<Probability>().unwrap(), Probability::IMPOSSIBLE);
        assert_eq!(".250".parse::<Probability>().unwrap().to_string(), ".25");
        for text in ["0.5", ".", "1.0", "2.", ".5x"] {
            assert!(text.parse::<Probability>().is_err(), "{} should be rejected", text);
        }
    }

    #[test]
    fn test_clamping() {
        assert_eq!(Probability::from_float(-0.5), Probability::IMPOSSIBLE);
        assert_eq!(Probability::from_float(1.5), Probability::CERTAIN);
        assert_eq!(Probability::from_float(f64::NAN), Probability::IMPOSSIBLE);
    }

    #[test]
    fn test_logic() {
        let p = Probability::from_float(0.25);
        let q = Probability::EVEN;
        assert_eq!(p.not().as_float(), 0.75);
        assert_eq!(Probability::and(p, q).as_float(), 0.125);
        assert_eq!(Probability::sans(p, q).as_float(), 0.125);
        assert_eq!(Probability::or(p, q).as_float(), 0.625);
        assert_eq!(Probability::xor(p, q).as_float(), 0.5);
        let r = Probability::random();
        assert!((0.0..=1.0).contains(&r.as_float()));
    }
}
