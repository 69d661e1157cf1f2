//! Primitive elements — the closed set of typed leaf values
//!
//! Every element is an immutable value object that parses from, and renders
//! to, exactly one canonical literal (`FromStr` / `Display`). "Mutating"
//! operations always return a new value.

pub mod angle;
pub mod boolean;
pub mod duration;
pub mod moment;
pub mod number;
pub mod pattern;
pub mod percentage;
pub mod probability;
pub mod resource;
pub mod symbol;
pub mod tag;

pub use angle::Angle;
pub use boolean::Boolean;
pub use duration::Duration;
pub use moment::Moment;
pub use number::Number;
pub use pattern::Pattern;
pub use percentage::Percentage;
pub use probability::Probability;
pub use resource::Resource;
pub use symbol::Symbol;
pub use tag::Tag;

use std::f64::consts::{E, PI, TAU};

use once_cell::sync::Lazy;
use regex::Regex;

/// The golden ratio
pub const PHI: f64 = 1.618_033_988_749_895;

/// Real-number literal shared by numbers, angles and percentages
pub(crate) const REAL: &str =
    r"-?(?:[eπφτ]|(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:E-?[0-9]+)?)";

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:E-?[0-9]+)?$").expect("decimal pattern")
});

/// Implements `Serialize`/`Deserialize` for a type through its canonical text.
macro_rules! impl_text_serde {
    ($($name:ty),+ $(,)?) => {
        $(
            impl serde::Serialize for $name {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                    let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                    text.parse().map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}
pub(crate) use impl_text_serde;

impl_text_serde!(
    Angle,
    Boolean,
    Duration,
    Moment,
    Number,
    Pattern,
    Percentage,
    Probability,
    Resource,
    Symbol,
    Tag,
);

// ── Real numbers ──────────────────────────────────────────

/// Render a finite real in canonical form.
///
/// The constants `e`, `π`, `φ` and `τ` render as glyphs; everything else uses
/// the shortest decimal that reads back to the same value, switching to an
/// `E` exponent outside `[1e-6, 1e21)`.
pub(crate) fn format_real(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let glyph = if magnitude == E {
        Some("e")
    } else if magnitude == PI {
        Some("π")
    } else if magnitude == PHI {
        Some("φ")
    } else if magnitude == TAU {
        Some("τ")
    } else if magnitude.is_infinite() {
        Some("∞")
    } else {
        None
    };
    if let Some(glyph) = glyph {
        return format!("{}{}", sign, glyph);
    }
    if (1e-6..1e21).contains(&magnitude) {
        format!("{}", value)
    } else {
        format!("{:E}", value)
    }
}

/// Parse a real literal, including the constant glyphs
pub(crate) fn parse_real(text: &str) -> Option<f64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match body {
        "e" => E,
        "π" => PI,
        "φ" => PHI,
        "τ" => TAU,
        "∞" => f64::INFINITY,
        _ if DECIMAL.is_match(body) => body.parse::<f64>().ok()?,
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

// ── Locking ───────────────────────────────────────────────

/// True when `value` and `target` agree to single precision
pub(crate) fn same_in_single_precision(value: f64, target: f64) -> bool {
    (value as f32) == (target as f32)
}

/// Snap `value` to the first target it matches in single precision
pub(crate) fn lock(value: f64, targets: &[f64]) -> f64 {
    targets
        .iter()
        .copied()
        .find(|&target| same_in_single_precision(value, target))
        .unwrap_or(value)
}

/// Snap a value on the unit scale (a sine, cosine or ratio) to `-1`, `0` or `1`
pub(crate) fn lock_unit(value: f64) -> f64 {
    if ((value + 1.0) as f32) == 1.0 {
        return 0.0;
    }
    lock(value, &[-1.0, 1.0])
}
