//! Calendar units and their period arithmetic.
//!
//! Every unit knows three things: where the period containing an instant
//! starts, where it ends, and how to step back N whole periods. Units split
//! into two groups:
//!
//! - **Fixed length** (`second` to `week`): a period is always the same number
//!   of seconds, so stepping back is plain timeline subtraction.
//! - **Variable length** (`month` to `millennium`): a period is a whole number
//!   of months. Stepping back uses month arithmetic that clamps the day of
//!   month, so March 31 minus one month is February 28 (or 29), never an
//!   invalid date and never March 3.
//!
//! Weeks start on Monday. Decades start on years divisible by ten, centuries
//! and millennia on the year after (2001, not 2000).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Decade,
    Century,
    Millennium,
}

/// How long one period of a unit is.
#[derive(Debug, Clone, Copy)]
enum Span {
    Seconds(i64),
    Months(u32),
}

/// The operation set behind a [`CalendarUnit`].
struct UnitOps {
    span: Span,
    start_of: fn(NaiveDateTime) -> Option<NaiveDateTime>,
}

const SECOND_OPS: UnitOps = UnitOps {
    span: Span::Seconds(1),
    start_of: start_of_second,
};
const MINUTE_OPS: UnitOps = UnitOps {
    span: Span::Seconds(MINUTE),
    start_of: start_of_minute,
};
const HOUR_OPS: UnitOps = UnitOps {
    span: Span::Seconds(HOUR),
    start_of: start_of_hour,
};
const DAY_OPS: UnitOps = UnitOps {
    span: Span::Seconds(DAY),
    start_of: start_of_day,
};
const WEEK_OPS: UnitOps = UnitOps {
    span: Span::Seconds(WEEK),
    start_of: start_of_week,
};
const MONTH_OPS: UnitOps = UnitOps {
    span: Span::Months(1),
    start_of: start_of_month,
};
const QUARTER_OPS: UnitOps = UnitOps {
    span: Span::Months(3),
    start_of: start_of_quarter,
};
const YEAR_OPS: UnitOps = UnitOps {
    span: Span::Months(12),
    start_of: start_of_year,
};
const DECADE_OPS: UnitOps = UnitOps {
    span: Span::Months(12 * 10),
    start_of: start_of_decade,
};
const CENTURY_OPS: UnitOps = UnitOps {
    span: Span::Months(12 * 100),
    start_of: start_of_century,
};
const MILLENNIUM_OPS: UnitOps = UnitOps {
    span: Span::Months(12 * 1000),
    start_of: start_of_millennium,
};

impl CalendarUnit {
    pub const ALL: [CalendarUnit; 11] = [
        CalendarUnit::Second,
        CalendarUnit::Minute,
        CalendarUnit::Hour,
        CalendarUnit::Day,
        CalendarUnit::Week,
        CalendarUnit::Month,
        CalendarUnit::Quarter,
        CalendarUnit::Year,
        CalendarUnit::Decade,
        CalendarUnit::Century,
        CalendarUnit::Millennium,
    ];

    fn ops(self) -> &'static UnitOps {
        match self {
            CalendarUnit::Second => &SECOND_OPS,
            CalendarUnit::Minute => &MINUTE_OPS,
            CalendarUnit::Hour => &HOUR_OPS,
            CalendarUnit::Day => &DAY_OPS,
            CalendarUnit::Week => &WEEK_OPS,
            CalendarUnit::Month => &MONTH_OPS,
            CalendarUnit::Quarter => &QUARTER_OPS,
            CalendarUnit::Year => &YEAR_OPS,
            CalendarUnit::Decade => &DECADE_OPS,
            CalendarUnit::Century => &CENTURY_OPS,
            CalendarUnit::Millennium => &MILLENNIUM_OPS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CalendarUnit::Second => "second",
            CalendarUnit::Minute => "minute",
            CalendarUnit::Hour => "hour",
            CalendarUnit::Day => "day",
            CalendarUnit::Week => "week",
            CalendarUnit::Month => "month",
            CalendarUnit::Quarter => "quarter",
            CalendarUnit::Year => "year",
            CalendarUnit::Decade => "decade",
            CalendarUnit::Century => "century",
            CalendarUnit::Millennium => "millennium",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            CalendarUnit::Second => "seconds",
            CalendarUnit::Minute => "minutes",
            CalendarUnit::Hour => "hours",
            CalendarUnit::Day => "days",
            CalendarUnit::Week => "weeks",
            CalendarUnit::Month => "months",
            CalendarUnit::Quarter => "quarters",
            CalendarUnit::Year => "years",
            CalendarUnit::Decade => "decades",
            CalendarUnit::Century => "centuries",
            CalendarUnit::Millennium => "millenniums",
        }
    }

    /// Whether every period of this unit has the same duration.
    pub fn is_fixed_length(self) -> bool {
        matches!(self.ops().span, Span::Seconds(_))
    }

    /// First instant of the period containing `at`.
    pub fn start_of(self, at: NaiveDateTime) -> Result<NaiveDateTime> {
        (self.ops().start_of)(at).ok_or(Error::OutOfRange)
    }

    /// Last instant (to the nanosecond) of the period containing `at`.
    ///
    /// Never earlier than `at`, which matters for leap seconds: chrono keeps
    /// them as `:59` with more than a second of nanoseconds.
    pub fn end_of(self, at: NaiveDateTime) -> Result<NaiveDateTime> {
        let start = self.start_of(at)?;
        let next = match self.ops().span {
            Span::Seconds(seconds) => {
                Duration::try_seconds(seconds).and_then(|d| start.checked_add_signed(d))
            }
            Span::Months(months) => start.checked_add_months(Months::new(months)),
        };
        next.and_then(|next| next.checked_sub_signed(Duration::nanoseconds(1)))
            .map(|end| end.max(at))
            .ok_or(Error::OutOfRange)
    }

    /// `at` minus `periods` whole periods, clamping the day of month for
    /// variable-length units.
    pub fn sub(self, at: NaiveDateTime, periods: u64) -> Result<NaiveDateTime> {
        let shifted = match self.ops().span {
            Span::Seconds(seconds) => i64::try_from(periods)
                .ok()
                .and_then(|n| n.checked_mul(seconds))
                .and_then(Duration::try_seconds)
                .and_then(|d| at.checked_sub_signed(d)),
            Span::Months(months) => u32::try_from(periods)
                .ok()
                .and_then(|n| n.checked_mul(months))
                .and_then(|n| at.checked_sub_months(Months::new(n))),
        };
        shifted.ok_or(Error::OutOfRange)
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalendarUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        CalendarUnit::ALL
            .into_iter()
            .find(|unit| token == unit.name() || token == unit.plural())
            .or_else(|| (token == "millennia").then_some(CalendarUnit::Millennium))
            .ok_or_else(|| Error::UnsupportedUnit(s.to_string()))
    }
}

fn midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn start_of_second(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.with_nanosecond(0)
}

fn start_of_minute(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.date().and_hms_opt(at.hour(), at.minute(), 0)
}

fn start_of_hour(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.date().and_hms_opt(at.hour(), 0, 0)
}

fn start_of_day(at: NaiveDateTime) -> Option<NaiveDateTime> {
    at.date().and_hms_opt(0, 0, 0)
}

fn start_of_week(at: NaiveDateTime) -> Option<NaiveDateTime> {
    let back = i64::from(at.weekday().num_days_from_monday());
    at.date()
        .checked_sub_signed(Duration::days(back))?
        .and_hms_opt(0, 0, 0)
}

fn start_of_month(at: NaiveDateTime) -> Option<NaiveDateTime> {
    midnight(at.year(), at.month(), 1)
}

fn start_of_quarter(at: NaiveDateTime) -> Option<NaiveDateTime> {
    let first_month = (at.month() - 1) / 3 * 3 + 1;
    midnight(at.year(), first_month, 1)
}

fn start_of_year(at: NaiveDateTime) -> Option<NaiveDateTime> {
    midnight(at.year(), 1, 1)
}

fn start_of_decade(at: NaiveDateTime) -> Option<NaiveDateTime> {
    let year = at.year();
    midnight(year - year.rem_euclid(10), 1, 1)
}

fn start_of_century(at: NaiveDateTime) -> Option<NaiveDateTime> {
    let year = at.year();
    midnight(year - (year - 1).rem_euclid(100), 1, 1)
}

fn start_of_millennium(at: NaiveDateTime) -> Option<NaiveDateTime> {
    let year = at.year();
    midnight(year - (year - 1).rem_euclid(1000), 1, 1)
}
