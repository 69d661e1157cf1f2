//! Angle — a radian measure normalized to `[0, 2π)`

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;

use super::{format_real, lock, lock_unit, parse_real};
use crate::{Error, Result};

const THREE_HALVES_PI: f64 = 1.5 * PI;

/// An angle in radians, always normalized to `[0, 2π)`.
///
/// Values that agree with `0`, `π/2`, `π` or `3π/2` to single precision are
/// snapped to the exact constant so that equality survives trigonometric
/// round trips.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const RIGHT: Angle = Angle(FRAC_PI_2);
    pub const PI: Angle = Angle(PI);

    /// Construct an angle from any finite radian value.
    ///
    /// Non-finite input collapses to zero.
    pub fn from_float(radians: f64) -> Angle {
        if !radians.is_finite() {
            return Angle::ZERO;
        }
        let mut value = radians % TAU;
        if value < 0.0 {
            value += TAU;
        }
        let value = lock(value, &[0.0, FRAC_PI_2, PI, THREE_HALVES_PI, TAU]);
        if value == TAU {
            Angle::ZERO
        } else {
            Angle(value)
        }
    }

    /// The radian value in `[0, 2π)`
    pub fn as_float(&self) -> f64 {
        self.0
    }

    // ── Algebra ────────────────────────────────────────

    /// The opposite direction (`a + π`)
    pub fn inverse(self) -> Angle {
        Angle::from_float(self.0 + PI)
    }

    /// Reflection across the horizontal axis (`-a`)
    pub fn conjugate(self) -> Angle {
        Angle::from_float(-self.0)
    }

    /// `π/2 - a`
    pub fn complement(self) -> Angle {
        Angle::from_float(FRAC_PI_2 - self.0)
    }

    /// `π - a`
    pub fn supplement(self) -> Angle {
        Angle::from_float(PI - self.0)
    }

    pub fn sum(first: Angle, second: Angle) -> Angle {
        Angle::from_float(first.0 + second.0)
    }

    pub fn difference(first: Angle, second: Angle) -> Angle {
        Angle::from_float(first.0 - second.0)
    }

    pub fn scaled(angle: Angle, factor: f64) -> Angle {
        Angle::from_float(angle.0 * factor)
    }

    // ── Trigonometry ───────────────────────────────────

    pub fn sine(self) -> f64 {
        lock_unit(self.0.sin())
    }

    pub fn cosine(self) -> f64 {
        lock_unit(self.0.cos())
    }

    /// Tangent; infinite at `π/2` and `3π/2`
    pub fn tangent(self) -> f64 {
        if self == Angle::RIGHT || self.0 == THREE_HALVES_PI {
            return f64::INFINITY;
        }
        lock_unit(self.0.tan())
    }

    pub fn arcsine(ratio: f64) -> Angle {
        Angle::from_float(ratio.asin())
    }

    pub fn arccosine(ratio: f64) -> Angle {
        Angle::from_float(ratio.acos())
    }

    /// The angle of the point `(x, y)` measured from the positive x axis
    pub fn arctangent(x: f64, y: f64) -> Angle {
        Angle::from_float(y.atan2(x))
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::ZERO
    }
}

impl From<f64> for Angle {
    fn from(radians: f64) -> Self {
        Angle::from_float(radians)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "~{}", format_real(self.0))
    }
}

impl FromStr for Angle {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let body = text
            .strip_prefix('~')
            .ok_or_else(|| Error::value("angle", text, "must begin with '~'"))?;
        let radians =
            parse_real(body).ok_or_else(|| Error::value("angle", text, "malformed real value"))?;
        if !radians.is_finite() {
            return Err(Error::value("angle", text, "must be finite"));
        }
        Ok(Angle::from_float(radians))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalizes_negative_angles() {
        assert_eq!(Angle::from_float(-FRAC_PI_2).as_float(), 1.5 * PI);
        assert_eq!(Angle::from_float(-PI), Angle::PI);
    }

    #[test]
    fn test_tau_wraps_to_zero() {
        assert_eq!(Angle::from_float(TAU), Angle::ZERO);
        assert_eq!(Angle::from_float(2.0 * TAU), Angle::ZERO);
        assert_eq!(Angle::from_float(TAU - 1e-12), Angle::ZERO);
    }

    #[test]
    fn test_parse_and_render_pi() {
        let angle: Angle = "~π".parse().unwrap();
        assert_eq!(angle, Angle::PI);
        assert_eq!(angle.to_string(), "~π");
    }

    #[test]
    fn test_render_canonical_forms() {
        assert_eq!(Angle::ZERO.to_string(), "~0");
        assert_eq!(Angle::from_float(1.5).to_string(), "~1.5");
        assert_eq!("~τ".parse::<Angle>().unwrap().to_string(), "~0");
        assert_eq!("~-π".parse::<Angle>().unwrap().to_string(), "~π");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("π".parse::<Angle>().is_err());
        assert!("~".parse::<Angle>().is_err());
        assert!("~abc".parse::<Angle>().is_err());
        assert!("~∞".parse::<Angle>().is_err());
    }

    #[test]
    fn test_trigonometry_is_exact_at_quadrants() {
        assert_eq!(Angle::PI.sine(), 0.0);
        assert_eq!(Angle::PI.cosine(), -1.0);
        assert_eq!(Angle::RIGHT.sine(), 1.0);
        assert_eq!(Angle::RIGHT.cosine(), 0.0);
        assert_eq!(Angle::RIGHT.tangent(), f64::INFINITY);
        assert_eq!(Angle::arcsine(1.0), Angle::RIGHT);
        assert_eq!(Angle::arccosine(-1.0), Angle::PI);
        assert_eq!(Angle::arctangent(-1.0, 0.0), Angle::PI);
    }

    #[test]
    fn test_algebra() {
        assert_eq!(Angle::ZERO.inverse(), Angle::PI);
        assert_eq!(Angle::RIGHT.conjugate().as_float(), 1.5 * PI);
        assert_eq!(Angle::RIGHT.complement(), Angle::ZERO);
        assert_eq!(Angle::RIGHT.supplement(), Angle::RIGHT);
        assert_eq!(Angle::sum(Angle::PI, Angle::PI), Angle::ZERO);
        assert_eq!(Angle::difference(Angle::ZERO, Angle::RIGHT).as_float(), 1.5 * PI);
        assert_eq!(Angle::scaled(Angle::RIGHT, 2.0), Angle::PI);
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(x in -1.0e6f64..1.0e6) {
            let once = Angle::from_float(x);
            let twice = Angle::from_float(once.as_float());
            prop_assert_eq!(once, twice);
            prop_assert!(once.as_float() >= 0.0 && once.as_float() < TAU);
        }

        #[test]
        fn prop_text_round_trip(x in -100.0f64..100.0) {
            let angle = Angle::from_float(x);
            let parsed: Angle = angle.to_string().parse().unwrap();
            prop_assert_eq!(angle, parsed);
        }
    }
}
