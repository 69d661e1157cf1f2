//! Moment — a UTC instant in milliseconds since the UNIX epoch

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use time::OffsetDateTime;

use super::duration::{
    Duration, MILLISECONDS_PER_DAY, MILLISECONDS_PER_HOUR, MILLISECONDS_PER_MINUTE,
    MILLISECONDS_PER_SECOND,
};
use crate::{Error, Result};

/// Largest year magnitude whose moments fit in `i64` milliseconds
const MAXIMUM_YEAR: i64 = 292_278_995;

static MOMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<(-?[0-9]+)(?:-([0-9]{2})(?:-([0-9]{2})(?:T([0-9]{2})(?::([0-9]{2})(?::([0-9]{2})(?:\.([0-9]{1,3}))?)?)?)?)?)?>$",
    )
    .expect("moment pattern")
});

/// A point in time on the proleptic Gregorian calendar, UTC only.
///
/// Any `i64` millisecond value is a valid moment, including instants long
/// before the common era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Moment(i64);

/// Calendar fields of a moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Civil {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    millisecond: i64,
}

impl Moment {
    pub const EPOCH: Moment = Moment(0);

    pub fn from_milliseconds(milliseconds: i64) -> Moment {
        Moment(milliseconds)
    }

    pub fn now() -> Moment {
        Moment::from(OffsetDateTime::now_utc())
    }

    pub fn as_milliseconds(&self) -> i64 {
        self.0
    }

    /// Convert to a `time` date, when the year fits its supported range
    pub fn to_offset_date_time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(self.0 as i128 * 1_000_000).ok()
    }

    fn civil(&self) -> Civil {
        let days = self.0.div_euclid(MILLISECONDS_PER_DAY);
        let time = self.0.rem_euclid(MILLISECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Civil {
            year,
            month,
            day,
            hour: time / MILLISECONDS_PER_HOUR,
            minute: time % MILLISECONDS_PER_HOUR / MILLISECONDS_PER_MINUTE,
            second: time % MILLISECONDS_PER_MINUTE / MILLISECONDS_PER_SECOND,
            millisecond: time % MILLISECONDS_PER_SECOND,
        }
    }

    // ── Calendar breakdown ─────────────────────────────

    pub fn get_year(&self) -> i64 {
        self.civil().year
    }

    pub fn get_month(&self) -> i64 {
        self.civil().month
    }

    pub fn get_day(&self) -> i64 {
        self.civil().day
    }

    pub fn get_hour(&self) -> i64 {
        self.civil().hour
    }

    pub fn get_minute(&self) -> i64 {
        self.civil().minute
    }

    pub fn get_second(&self) -> i64 {
        self.civil().second
    }

    pub fn get_millisecond(&self) -> i64 {
        self.civil().millisecond
    }

    // ── Algebra ────────────────────────────────────────

    /// The signed duration from `first` to `second`
    pub fn duration_between(first: Moment, second: Moment) -> Duration {
        Duration::from_milliseconds(second.0.saturating_sub(first.0))
    }

    pub fn earlier(moment: Moment, duration: Duration) -> Moment {
        Moment(moment.0.saturating_sub(duration.as_milliseconds()))
    }

    pub fn later(moment: Moment, duration: Duration) -> Moment {
        Moment(moment.0.saturating_add(duration.as_milliseconds()))
    }
}

impl From<OffsetDateTime> for Moment {
    fn from(value: OffsetDateTime) -> Self {
        let millis = value.unix_timestamp_nanos().div_euclid(1_000_000);
        Moment(millis.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = self.civil();
        // Trailing fields still at their minimum are elided.
        let precision = if c.millisecond != 0 {
            6
        } else if c.second != 0 {
            5
        } else if c.minute != 0 {
            4
        } else if c.hour != 0 {
            3
        } else if c.day != 1 {
            2
        } else if c.month != 1 {
            1
        } else {
            0
        };
        write!(f, "<{}", c.year)?;
        if precision >= 1 {
            write!(f, "-{:02}", c.month)?;
        }
        if precision >= 2 {
            write!(f, "-{:02}", c.day)?;
        }
        if precision >= 3 {
            write!(f, "T{:02}", c.hour)?;
        }
        if precision >= 4 {
            write!(f, ":{:02}", c.minute)?;
        }
        if precision >= 5 {
            write!(f, ":{:02}", c.second)?;
        }
        if precision >= 6 {
            let fraction = format!("{:03}", c.millisecond);
            write!(f, ".{}", fraction.trim_end_matches('0'))?;
        }
        write!(f, ">")
    }
}

impl FromStr for Moment {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let captures = MOMENT
            .captures(text)
            .ok_or_else(|| Error::value("moment", text, "malformed ISO 8601 moment"))?;
        let field = |index: usize, default: i64| -> Result<i64> {
            match captures.get(index) {
                Some(group) => group
                    .as_str()
                    .parse()
                    .map_err(|_| Error::value("moment", text, "field is out of range")),
                None => Ok(default),
            }
        };
        let year = field(1, 0)?;
        if year.abs() > MAXIMUM_YEAR {
            return Err(Error::value("moment", text, "year is out of range"));
        }
        let month = field(2, 1)?;
        let day = field(3, 1)?;
        let hour = field(4, 0)?;
        let minute = field(5, 0)?;
        let second = field(6, 0)?;
        let millisecond = match captures.get(7) {
            Some(group) => format!("{:0<3}", group.as_str())
                .parse()
                .map_err(|_| Error::value("moment", text, "malformed fraction"))?,
            None => 0,
        };
        if !(1..=12).contains(&month) {
            return Err(Error::value("moment", text, "month must be 01 through 12"));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(Error::value("moment", text, "day is not in the month"));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::value("moment", text, "time of day is out of range"));
        }
        let time = hour * MILLISECONDS_PER_HOUR
            + minute * MILLISECONDS_PER_MINUTE
            + second * MILLISECONDS_PER_SECOND
            + millisecond;
        days_from_civil(year, month, day)
            .checked_mul(MILLISECONDS_PER_DAY)
            .and_then(|millis| millis.checked_add(time))
            .map(Moment)
            .ok_or_else(|| Error::value("moment", text, "exceeds the representable range"))
    }
}

// ── Proleptic Gregorian arithmetic ────────────────────────

fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a civil date
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year.rem_euclid(400);
    let month_index = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * month_index + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Civil date for a count of days since 1970-01-01
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let days = days + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days.rem_euclid(146_097);
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_index + 2) / 5 + 1;
    let month = if month_index < 10 {
        month_index + 3
    } else {
        month_index - 9
    };
    let year = year_of_era + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Canonical text ──

    #[test]
    fn test_trailing_minimum_fields_are_elided() {
        let moment: Moment = "<2009-04>".parse().unwrap();
        assert_eq!(moment.as_milliseconds(), 1_238_544_000_000);
        assert_eq!(moment.to_string(), "<2009-04>");
        assert_eq!(Moment::EPOCH.to_string(), "<1970>");
        assert_eq!("<2009-04-01T00:00:00>".parse::<Moment>().unwrap().to_string(), "<2009-04>");
    }

    #[test]
    fn test_full_precision() {
        let moment: Moment = "<2021-12-31T23:59:59.5>".parse().unwrap();
        assert_eq!(moment.to_string(), "<2021-12-31T23:59:59.5>");
        assert_eq!(moment.get_millisecond(), 500);
        let moment: Moment = "<2000-01-01T00:00:00.007>".parse().unwrap();
        assert_eq!(moment.to_string(), "<2000-01-01T00:00:00.007>");
    }

    #[test]
    fn test_before_the_epoch() {
        let moment = Moment::from_milliseconds(-1);
        assert_eq!(moment.to_string(), "<1969-12-31T23:59:59.999>");
        let moment: Moment = "<-44-03-15>".parse().unwrap();
        assert_eq!(moment.get_year(), -44);
        assert_eq!(moment.get_month(), 3);
        assert_eq!(moment.get_day(), 15);
        assert_eq!(moment.to_string(), "<-44-03-15>");
    }

    #[test]
    fn test_parse_rejects_invalid_dates() {
        for text in [
            "<2009-13>",
            "<2009-00>",
            "<2009-02-29>",
            "<2009-04-31>",
            "<2009-04-01T24>",
            "<2009-04-01T12:60>",
            "2009",
            "<2009-4>",
            "<999999999999>",
        ] {
            assert!(text.parse::<Moment>().is_err(), "{} should be rejected", text);
        }
        assert!("<2008-02-29>".parse::<Moment>().is_ok());
        assert!("<2000-02-29>".parse::<Moment>().is_ok());
        assert!("<1900-02-29>".parse::<Moment>().is_err());
    }

    // ── Algebra ──

    #[test]
    fn test_duration_arithmetic() {
        let start: Moment = "<2020-01-01>".parse().unwrap();
        let end: Moment = "<2020-01-15>".parse().unwrap();
        let span = Moment::duration_between(start, end);
        assert_eq!(span.to_string(), "~P2W");
        assert_eq!(Moment::later(start, span), end);
        assert_eq!(Moment::earlier(end, span), start);
        assert_eq!(Moment::duration_between(end, start), span.inverse());
    }

    #[test]
    fn test_offset_date_time_conversion() {
        let moment: Moment = "<2009-04-01T12:30>".parse().unwrap();
        let date = moment.to_offset_date_time().unwrap();
        assert_eq!(date.year(), 2009);
        assert_eq!(date.hour(), 12);
        assert_eq!(date.minute(), 30);
        assert_eq!(Moment::from(date), moment);
        assert!(Moment::from_milliseconds(i64::MIN).to_offset_date_time().is_none());
        assert!(Moment::now() > moment);
    }

    #[test]
    fn test_calendar_agrees_with_time_crate() {
        for millis in [0i64, 951_782_400_000, -2_208_988_800_000, 4_102_444_800_123] {
            let moment = Moment::from_milliseconds(millis);
            let date = moment.to_offset_date_time().unwrap();
            assert_eq!(moment.get_year(), date.year() as i64);
            assert_eq!(moment.get_month(), u8::from(date.month()) as i64);
            assert_eq!(moment.get_day(), date.day() as i64);
        }
    }

    proptest! {
        #[test]
        fn prop_text_round_trip(millis in proptest::num::i64::ANY) {
            let moment = Moment::from_milliseconds(millis);
            let parsed: Moment = moment.to_string().parse().unwrap();
            prop_assert_eq!(moment, parsed);
        }
    }
}
