//! Duration — a signed span of milliseconds with a calendar breakdown

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

pub const MILLISECONDS_PER_SECOND: i64 = 1_000;
pub const MILLISECONDS_PER_MINUTE: i64 = 60 * MILLISECONDS_PER_SECOND;
pub const MILLISECONDS_PER_HOUR: i64 = 60 * MILLISECONDS_PER_MINUTE;
pub const MILLISECONDS_PER_DAY: i64 = 24 * MILLISECONDS_PER_HOUR;
pub const MILLISECONDS_PER_WEEK: i64 = 7 * MILLISECONDS_PER_DAY;
/// 365.2425 days, the mean Gregorian year
pub const MILLISECONDS_PER_YEAR: i64 = 31_556_952_000;
/// One twelfth of the mean Gregorian year
pub const MILLISECONDS_PER_MONTH: i64 = MILLISECONDS_PER_YEAR / 12;

const TIMESPAN: &str = r"[0-9]+(?:\.[0-9]+)?";

static DURATION: Lazy<Regex> = Lazy::new(|| {
    let t = TIMESPAN;
    Regex::new(&format!(
        r"^~(-)?P(?:({t})W|(?:({t})Y)?(?:({t})M)?(?:({t})D)?(?:T(?:({t})H)?(?:({t})M)?(?:({t})S)?)?)$"
    ))
    .expect("duration pattern")
});

/// A signed number of milliseconds.
///
/// Years and months use fixed average lengths, so the calendar accessors are
/// a reporting breakdown of the single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub fn from_milliseconds(milliseconds: i64) -> Duration {
        Duration(milliseconds)
    }

    pub fn from_weeks(weeks: i64) -> Duration {
        Duration(weeks.saturating_mul(MILLISECONDS_PER_WEEK))
    }

    pub fn as_milliseconds(&self) -> i64 {
        self.0
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_SECOND as f64
    }

    pub fn as_minutes(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_MINUTE as f64
    }

    pub fn as_hours(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_HOUR as f64
    }

    pub fn as_days(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_DAY as f64
    }

    pub fn as_weeks(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_WEEK as f64
    }

    pub fn as_months(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_MONTH as f64
    }

    pub fn as_years(&self) -> f64 {
        self.0 as f64 / MILLISECONDS_PER_YEAR as f64
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    // ── Calendar breakdown ─────────────────────────────
    //
    // Each accessor reports the magnitude of one unit after the larger
    // units have been removed.

    fn magnitude(&self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Magnitude remaining after whole units of each divisor are removed
    fn remainder(&self, divisors: &[i64]) -> u64 {
        divisors
            .iter()
            .fold(self.magnitude(), |rest, &divisor| rest % divisor as u64)
    }

    /// What remains after whole years, months and days are removed
    fn time_of_day(&self) -> u64 {
        self.remainder(&[MILLISECONDS_PER_YEAR, MILLISECONDS_PER_MONTH, MILLISECONDS_PER_DAY])
    }

    // Every quotient below is at most `2^63 / 1000`, so the casts are lossless.

    pub fn get_years(&self) -> i64 {
        (self.magnitude() / MILLISECONDS_PER_YEAR as u64) as i64
    }

    pub fn get_months(&self) -> i64 {
        (self.remainder(&[MILLISECONDS_PER_YEAR]) / MILLISECONDS_PER_MONTH as u64) as i64
    }

    pub fn get_weeks(&self) -> i64 {
        (self.magnitude() / MILLISECONDS_PER_WEEK as u64) as i64
    }

    pub fn get_days(&self) -> i64 {
        let rest = self.remainder(&[MILLISECONDS_PER_YEAR, MILLISECONDS_PER_MONTH]);
        (rest / MILLISECONDS_PER_DAY as u64) as i64
    }

    pub fn get_hours(&self) -> i64 {
        (self.time_of_day() / MILLISECONDS_PER_HOUR as u64) as i64
    }

    pub fn get_minutes(&self) -> i64 {
        (self.time_of_day() % MILLISECONDS_PER_HOUR as u64 / MILLISECONDS_PER_MINUTE as u64) as i64
    }

    pub fn get_seconds(&self) -> i64 {
        (self.time_of_day() % MILLISECONDS_PER_MINUTE as u64 / MILLISECONDS_PER_SECOND as u64) as i64
    }

    pub fn get_milliseconds(&self) -> i64 {
        (self.time_of_day() % MILLISECONDS_PER_SECOND as u64) as i64
    }

    // ── Algebra ────────────────────────────────────────

    pub fn inverse(self) -> Duration {
        Duration(self.0.saturating_neg())
    }

    pub fn sum(first: Duration, second: Duration) -> Duration {
        Duration(first.0.saturating_add(second.0))
    }

    pub fn difference(first: Duration, second: Duration) -> Duration {
        Duration(first.0.saturating_sub(second.0))
    }

    pub fn scaled(duration: Duration, factor: f64) -> Duration {
        // `as` saturates at the i64 bounds and maps NaN to zero
        Duration((duration.0 as f64 * factor).round() as i64)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        if self.0 % MILLISECONDS_PER_WEEK == 0 {
            return write!(f, "~{}P{}W", sign, self.get_weeks());
        }
        write!(f, "~{}P", sign)?;
        for (value, unit) in [
            (self.get_years(), 'Y'),
            (self.get_months(), 'M'),
            (self.get_days(), 'D'),
        ] {
            if value > 0 {
                write!(f, "{}{}", value, unit)?;
            }
        }
        let (hours, minutes, seconds, millis) = (
            self.get_hours(),
            self.get_minutes(),
            self.get_seconds(),
            self.get_milliseconds(),
        );
        if hours + minutes + seconds + millis == 0 {
            return Ok(());
        }
        write!(f, "T")?;
        if hours > 0 {
            write!(f, "{}H", hours)?;
        }
        if minutes > 0 {
            write!(f, "{}M", minutes)?;
        }
        if seconds + millis > 0 {
            write!(f, "{}", seconds)?;
            if millis > 0 {
                let fraction = format!("{:03}", millis);
                write!(f, ".{}", fraction.trim_end_matches('0'))?;
            }
            write!(f, "S")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let captures = DURATION
            .captures(text)
            .ok_or_else(|| Error::value("duration", text, "malformed ISO 8601 duration"))?;
        if captures.iter().skip(2).all(|group| group.is_none()) {
            return Err(Error::value("duration", text, "has no time units"));
        }
        let units = [
            MILLISECONDS_PER_WEEK,
            MILLISECONDS_PER_YEAR,
            MILLISECONDS_PER_MONTH,
            MILLISECONDS_PER_DAY,
            MILLISECONDS_PER_HOUR,
            MILLISECONDS_PER_MINUTE,
            MILLISECONDS_PER_SECOND,
        ];
        let mut total: i128 = 0;
        for (index, unit) in units.iter().enumerate() {
            if let Some(group) = captures.get(index + 2) {
                let amount = timespan_milliseconds(group.as_str(), *unit)
                    .ok_or_else(|| Error::value("duration", text, "timespan is too large"))?;
                total += amount;
            }
        }
        let signed = if captures.get(1).is_some() { -total } else { total };
        let milliseconds = i64::try_from(signed)
            .map_err(|_| Error::value("duration", text, "exceeds the representable range"))?;
        Ok(Duration(milliseconds))
    }
}

/// Exact milliseconds for `amount` units, rounding any fraction to the nearest millisecond
fn timespan_milliseconds(amount: &str, unit: i64) -> Option<i128> {
    let unit = unit as i128;
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let whole: i128 = whole.parse().ok()?;
    let mut total = whole.checked_mul(unit)?;
    let digits = &fraction[..fraction.len().min(18)];
    if !digits.is_empty() {
        let numerator: i128 = digits.parse::<i128>().ok()? * unit;
        let denominator = 10i128.pow(digits.len() as u32);
        total = total.checked_add((numerator + denominator / 2) / denominator)?;
    }
    // One past `i64::MAX` so that `i64::MIN` stays reachable once negated
    if total > i64::MAX as i128 + 1 {
        return None;
    }
    Some(total)
}
