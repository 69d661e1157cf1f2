//! Number — complex values projected onto the Riemann sphere
//!
//! The sphere has exactly one `zero`, one `infinity` and one `undefined`
//! point, which makes every operation below total: no input combination
//! panics or produces a NaN-carrying value.
//!
//! Every binary operation checks its cases in a fixed order:
//! `undefined` operands first, then the `zero`/`infinity` singular cases,
//! then the general complex formula.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{format_real, lock, parse_real, Angle, REAL};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Point {
    Zero,
    Infinity,
    Undefined,
    Finite { re: f64, im: f64 },
}

/// A complex number on the Riemann sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(Point);

static RECTANGULAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\(({real}), ((?:{real})?|-)i\)$", real = REAL))
        .expect("rectangular number pattern")
});

static POLAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\(({real})e\^(~{real})i\)$", real = REAL)).expect("polar number pattern")
});

impl Number {
    pub const ZERO: Number = Number(Point::Zero);
    pub const ONE: Number = Number(Point::Finite { re: 1.0, im: 0.0 });
    pub const I: Number = Number(Point::Finite { re: 0.0, im: 1.0 });
    pub const INFINITY: Number = Number(Point::Infinity);
    pub const UNDEFINED: Number = Number(Point::Undefined);

    // ── Construction ───────────────────────────────────

    /// Project a rectangular complex pair onto the sphere.
    ///
    /// Any NaN component yields `undefined`, any infinite component yields
    /// `infinity`, and a zero magnitude yields `zero`. Components that are
    /// negligible next to the magnitude become exactly zero, and components
    /// that agree with `±1` to single precision become exactly `±1`.
    pub fn from_complex(re: f64, im: f64) -> Number {
        if re.is_nan() || im.is_nan() {
            return Number::UNDEFINED;
        }
        if re.is_infinite() || im.is_infinite() {
            return Number::INFINITY;
        }
        let magnitude = re.hypot(im);
        if magnitude == 0.0 {
            return Number::ZERO;
        }
        if magnitude.is_infinite() {
            return Number::INFINITY;
        }
        let re = lock_component(re, magnitude);
        let im = lock_component(im, magnitude);
        if re == 0.0 && im == 0.0 {
            return Number::ZERO;
        }
        Number(Point::Finite { re, im })
    }

    pub fn from_real(re: f64) -> Number {
        Number::from_complex(re, 0.0)
    }

    pub fn from_imaginary(im: f64) -> Number {
        Number::from_complex(0.0, im)
    }

    /// `magnitude · e^(i·phase)`
    pub fn from_polar(magnitude: f64, phase: Angle) -> Number {
        if magnitude.is_nan() {
            return Number::UNDEFINED;
        }
        if magnitude.is_infinite() {
            return Number::INFINITY;
        }
        Number::from_complex(
            magnitude * phase.cosine(),
            magnitude * phase.sine(),
        )
    }

    // ── Inspection ─────────────────────────────────────

    pub fn is_zero(&self) -> bool {
        self.0 == Point::Zero
    }

    pub fn is_infinite(&self) -> bool {
        self.0 == Point::Infinity
    }

    pub fn is_undefined(&self) -> bool {
        self.0 == Point::Undefined
    }

    /// Real part; `∞` for infinity and NaN for undefined
    pub fn real(&self) -> f64 {
        match self.0 {
            Point::Zero => 0.0,
            Point::Infinity => f64::INFINITY,
            Point::Undefined => f64::NAN,
            Point::Finite { re, .. } => re,
        }
    }

    /// Imaginary part; `∞` for infinity and NaN for undefined
    pub fn imaginary(&self) -> f64 {
        match self.0 {
            Point::Zero => 0.0,
            Point::Infinity => f64::INFINITY,
            Point::Undefined => f64::NAN,
            Point::Finite { im, .. } => im,
        }
    }

    /// Distance from the origin.
    ///
    /// A finite point always has a positive, finite magnitude: zero and
    /// overflowing magnitudes are projected to the singular points on
    /// construction. So `1` is the only value left to snap.
    pub fn magnitude(&self) -> f64 {
        match self.0 {
            Point::Zero => 0.0,
            Point::Infinity => f64::INFINITY,
            Point::Undefined => f64::NAN,
            Point::Finite { re, im } => lock(re.hypot(im), &[1.0]),
        }
    }

    /// The argument of the number; `None` at the singular points
    pub fn phase(&self) -> Option<Angle> {
        match self.0 {
            Point::Finite { re, im } => Some(Angle::arctangent(re, im)),
            _ => None,
        }
    }

    // ── Unary operations ───────────────────────────────

    /// Additive inverse; infinity is its own inverse on the sphere
    pub fn inverse(self) -> Number {
        match self.0 {
            Point::Finite { re, im } => Number::from_complex(-re, -im),
            _ => self,
        }
    }

    /// Multiplicative inverse: `1/0 = ∞` and `1/∞ = 0`
    pub fn reciprocal(self) -> Number {
        match self.0 {
            Point::Zero => Number::INFINITY,
            Point::Infinity => Number::ZERO,
            Point::Undefined => Number::UNDEFINED,
            Point::Finite { re, im } => {
                let denominator = re * re + im * im;
                Number::from_complex(re / denominator, -im / denominator)
            }
        }
    }

    pub fn conjugate(self) -> Number {
        match self.0 {
            Point::Finite { re, im } => Number::from_complex(re, -im),
            _ => self,
        }
    }

    // ── Binary operations ──────────────────────────────

    /// `z + 0 = z`, `z + ∞ = ∞`
    pub fn sum(first: Number, second: Number) -> Number {
        match (first.0, second.0) {
            (Point::Undefined, _) | (_, Point::Undefined) => Number::UNDEFINED,
            (Point::Infinity, _) | (_, Point::Infinity) => Number::INFINITY,
            (Point::Zero, _) => second,
            (_, Point::Zero) => first,
            (Point::Finite { re: a, im: b }, Point::Finite { re: c, im: d }) => {
                Number::from_complex(a + c, b + d)
            }
        }
    }

    /// `∞ - ∞` is undefined; otherwise an infinite operand gives `∞`
    pub fn difference(first: Number, second: Number) -> Number {
        match (first.0, second.0) {
            (Point::Undefined, _) | (_, Point::Undefined) => Number::UNDEFINED,
            (Point::Infinity, Point::Infinity) => Number::UNDEFINED,
            (Point::Infinity, _) | (_, Point::Infinity) => Number::INFINITY,
            (_, Point::Zero) => first,
            (Point::Zero, _) => second.inverse(),
            (Point::Finite { re: a, im: b }, Point::Finite { re: c, im: d }) => {
                Number::from_complex(a - c, b - d)
            }
        }
    }

    /// Multiply by a real factor
    pub fn scaled(number: Number, factor: f64) -> Number {
        Number::product(number, Number::from_real(factor))
    }

    /// `0·∞` is undefined; otherwise `z·0 = 0` and `z·∞ = ∞`
    pub fn product(first: Number, second: Number) -> Number {
        match (first.0, second.0) {
            (Point::Undefined, _) | (_, Point::Undefined) => Number::UNDEFINED,
            (Point::Zero, Point::Infinity) | (Point::Infinity, Point::Zero) => Number::UNDEFINED,
            (Point::Zero, _) | (_, Point::Zero) => Number::ZERO,
            (Point::Infinity, _) | (_, Point::Infinity) => Number::INFINITY,
            (Point::Finite { re: a, im: b }, Point::Finite { re: c, im: d }) => {
                Number::from_complex(a * c - b * d, a * d + b * c)
            }
        }
    }

    /// `0/0` and `∞/∞` are undefined; `z/0 = ∞` and `z/∞ = 0`
    pub fn quotient(first: Number, second: Number) -> Number {
        match (first.0, second.0) {
            (Point::Undefined, _) | (_, Point::Undefined) => Number::UNDEFINED,
            (Point::Zero, Point::Zero) | (Point::Infinity, Point::Infinity) => Number::UNDEFINED,
            (Point::Zero, _) | (_, Point::Infinity) => Number::ZERO,
            (_, Point::Zero) | (Point::Infinity, _) => Number::INFINITY,
            (Point::Finite { re: a, im: b }, Point::Finite { re: c, im: d }) => {
                if b == 0.0 && d == 0.0 {
                    return Number::from_real(a / c);
                }
                let denominator = c * c + d * d;
                Number::from_complex(
                    (a * c + b * d) / denominator,
                    (b * c - a * d) / denominator,
                )
            }
        }
    }

    /// Raise `base` to `exponent`.
    ///
    /// Undefined operands are checked before the `z^0 = 1` rule, so
    /// `undefined^0` stays undefined.
    pub fn power(base: Number, exponent: Number) -> Number {
        if base.is_undefined() || exponent.is_undefined() {
            return Number::UNDEFINED;
        }
        if exponent.is_zero() {
            return Number::ONE;
        }
        if base.is_zero() {
            return Number::ZERO;
        }
        if exponent.is_infinite() {
            let magnitude = base.magnitude();
            return if magnitude < 1.0 {
                Number::ZERO
            } else if magnitude == 1.0 {
                Number::ONE
            } else {
                Number::INFINITY
            };
        }
        if base.is_infinite() {
            return Number::INFINITY;
        }
        let (a, b) = (base.real(), base.imaginary());
        let (c, d) = (exponent.real(), exponent.imaginary());
        if b == 0.0 && d == 0.0 && (a > 0.0 || c.fract() == 0.0) {
            return Number::from_real(a.powf(c));
        }
        // e^(w·ln z) with ln z = ln|z| + i·arg z
        let ln_magnitude = a.hypot(b).ln();
        let argument = b.atan2(a);
        let re = c * ln_magnitude - d * argument;
        let im = c * argument + d * ln_magnitude;
        let scale = re.exp();
        let phase = Angle::from_float(im);
        Number::from_complex(scale * phase.cosine(), scale * phase.sine())
    }

    /// The natural logarithm; `ln 0` and `ln ∞` are both `∞` on the sphere
    pub fn natural_logarithm(number: Number) -> Number {
        match number.0 {
            Point::Undefined => Number::UNDEFINED,
            Point::Zero | Point::Infinity => Number::INFINITY,
            Point::Finite { re, im } => {
                Number::from_complex(re.hypot(im).ln(), im.atan2(re))
            }
        }
    }

    /// `log_base(value) = ln(value) / ln(base)`, with the quotient rules
    /// deciding every singular combination
    pub fn logarithm(base: Number, value: Number) -> Number {
        if base.is_undefined() || value.is_undefined() {
            return Number::UNDEFINED;
        }
        Number::quotient(
            Number::natural_logarithm(value),
            Number::natural_logarithm(base),
        )
    }
}

/// Snap a component that is negligible next to the magnitude, or that
/// agrees with `±1` to single precision
fn lock_component(value: f64, magnitude: f64) -> f64 {
    if value.abs() <= magnitude * (2.0 * f64::EPSILON) {
        return 0.0;
    }
    lock(value, &[-1.0, 1.0])
}

impl Default for Number {
    fn default() -> Self {
        Number::ZERO
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::from_real(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::from_real(value as f64)
    }
}

impl Add for Number {
    type Output = Number;
    fn add(self, other: Number) -> Number {
        Number::sum(self, other)
    }
}

impl Sub for Number {
    type Output = Number;
    fn sub(self, other: Number) -> Number {
        Number::difference(self, other)
    }
}

impl Mul for Number {
    type Output = Number;
    fn mul(self, other: Number) -> Number {
        Number::product(self, other)
    }
}

impl Div for Number {
    type Output = Number;
    fn div(self, other: Number) -> Number {
        Number::quotient(self, other)
    }
}

impl Neg for Number {
    type Output = Number;
    fn neg(self) -> Number {
        self.inverse()
    }
}

// ── Text ──────────────────────────────────────────────────

fn format_imaginary(im: f64) -> String {
    if im == 1.0 {
        "i".to_string()
    } else if im == -1.0 {
        "-i".to_string()
    } else {
        format!("{}i", format_real(im))
    }
}

fn parse_imaginary(text: &str) -> Option<f64> {
    let body = text.strip_suffix('i')?;
    match body {
        "" => Some(1.0),
        "-" => Some(-1.0),
        _ => parse_real(body).filter(|v| v.is_finite()),
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Point::Zero => write!(f, "0"),
            Point::Infinity => write!(f, "∞"),
            Point::Undefined => write!(f, "undefined"),
            Point::Finite { re, im } if im == 0.0 => write!(f, "{}", format_real(re)),
            Point::Finite { re, im } if re == 0.0 => write!(f, "{}", format_imaginary(im)),
            Point::Finite { re, im } => {
                write!(f, "({}, {})", format_real(re), format_imaginary(im))
            }
        }
    }
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let malformed = || Error::value("number", text, "malformed number");
        match text {
            "undefined" => return Ok(Number::UNDEFINED),
            "infinity" | "+infinity" | "-infinity" | "∞" | "+∞" | "-∞" => {
                return Ok(Number::INFINITY)
            }
            _ => {}
        }
        if let Some(captures) = RECTANGULAR.captures(text) {
            let re = parse_real(&captures[1]).ok_or_else(malformed)?;
            let im = parse_imaginary(&format!("{}i", &captures[2])).ok_or_else(malformed)?;
            if !re.is_finite() {
                return Err(malformed());
            }
            return Ok(Number::from_complex(re, im));
        }
        if let Some(captures) = POLAR.captures(text) {
            let magnitude = parse_real(&captures[1]).ok_or_else(malformed)?;
            if !magnitude.is_finite() || magnitude < 0.0 {
                return Err(Error::value(
                    "number",
                    text,
                    "polar magnitude must be finite and non-negative",
                ));
            }
            let phase: Angle = captures[2].parse()?;
            return Ok(Number::from_polar(magnitude, phase));
        }
        if text.ends_with('i') {
            let im = parse_imaginary(text).ok_or_else(malformed)?;
            return Ok(Number::from_imaginary(im));
        }
        let re = parse_real(text).ok_or_else(malformed)?;
        Ok(Number::from_real(re))
    }
}
