//! Relative date range computation.
//!
//! In statistics "the last 7 days" may or may not include today. An
//! [`RangeMode::Inclusive`] range covers the current, possibly unfinished,
//! period plus enough earlier periods to make up the count. An
//! [`RangeMode::Exclusive`] range covers only complete periods that ended
//! before the current one started. The same rule applies to every
//! [`CalendarUnit`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::serde::{deserialize_timestamp, serialize_timestamp};
use crate::unit::CalendarUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// Include the current period up to its end.
    Inclusive,
    /// Only fully completed periods before the current one.
    #[default]
    Exclusive,
}

impl fmt::Display for RangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeMode::Inclusive => f.write_str("inclusive"),
            RangeMode::Exclusive => f.write_str("exclusive"),
        }
    }
}

impl FromStr for RangeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inclusive" => Ok(RangeMode::Inclusive),
            "exclusive" => Ok(RangeMode::Exclusive),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// A closed interval of wall-clock instants. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    #[serde(serialize_with = "serialize_timestamp")]
    from: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    to: NaiveDateTime,
}

/// Unchecked bounds, validated by [`DateRange::new`].
#[derive(Deserialize)]
struct RawDateRange {
    #[serde(deserialize_with = "deserialize_timestamp")]
    from: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_timestamp")]
    to: NaiveDateTime,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = String;

    fn try_from(raw: RawDateRange) -> std::result::Result<Self, Self::Error> {
        DateRange::new(raw.from, raw.to)
            .ok_or_else(|| format!("range starts at {} after it ends at {}", raw.from, raw.to))
    }
}

impl DateRange {
    /// Returns `None` when `from` is after `to`.
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Option<Self> {
        (from <= to).then_some(DateRange { from, to })
    }

    pub fn from(&self) -> NaiveDateTime {
        self.from
    }

    pub fn to(&self) -> NaiveDateTime {
        self.to
    }

    /// Check if an instant falls within this range, bounds included.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.from && at <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.from.format(crate::timestamp::DISPLAY_FORMAT),
            self.to.format(crate::timestamp::DISPLAY_FORMAT)
        )
    }
}

/// Compute the range covering `count` periods of `unit` relative to `anchor`.
///
/// - Exclusive: from the start of the period `count` periods back, to the end
///   of the period just before the anchor's.
/// - Inclusive: from the start of the period `count - 1` periods back, to the
///   end of the anchor's own period.
pub fn compute_range(
    unit: CalendarUnit,
    count: i64,
    anchor: NaiveDateTime,
    mode: RangeMode,
) -> Result<DateRange> {
    if count < 1 {
        return Err(Error::InvalidCount(count));
    }
    let count = count as u64;

    let (from_period, to_period) = match mode {
        RangeMode::Exclusive => (unit.sub(anchor, count)?, unit.sub(anchor, 1)?),
        RangeMode::Inclusive => (unit.sub(anchor, count - 1)?, anchor),
    };

    let from = unit.start_of(from_period)?;
    let to = unit.end_of(to_period)?;
    log::debug!(
        "last {} {} ({}) from {}: {} .. {}",
        count,
        unit.plural(),
        mode,
        anchor,
        from,
        to
    );

    // Both ends are monotone in the period offset, so this only fails if the
    // unit table itself is broken.
    DateRange::new(from, to).ok_or(Error::OutOfRange)
}

/// [`compute_range`] with a default mode for calls that don't name one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeCalculator {
    default_mode: RangeMode,
}

impl RangeCalculator {
    pub fn new(default_mode: RangeMode) -> Self {
        RangeCalculator { default_mode }
    }

    pub fn default_mode(&self) -> RangeMode {
        self.default_mode
    }

    pub fn compute(
        &self,
        unit: CalendarUnit,
        count: i64,
        anchor: NaiveDateTime,
        mode: Option<RangeMode>,
    ) -> Result<DateRange> {
        compute_range(unit, count, anchor, mode.unwrap_or(self.default_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn dt(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn dt_end(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        dt(year, month, day, h, m, s) + Duration::nanoseconds(999_999_999)
    }

    fn test_anchor() -> NaiveDateTime {
        dt(2023, 3, 31, 13, 15, 15)
    }

    // A spread of anchors hitting month ends, leap days and year turns
    fn anchors() -> Vec<NaiveDateTime> {
        vec![
            dt(2023, 3, 31, 13, 15, 15),
            dt(2024, 2, 29, 0, 0, 0),
            dt(2024, 3, 31, 23, 59, 59),
            dt(2000, 1, 1, 0, 0, 0),
            dt(2001, 1, 1, 0, 0, 0),
            dt(1999, 12, 31, 23, 59, 59),
            dt(2023, 1, 1, 12, 30, 0),
            dt(2023, 10, 31, 6, 0, 0),
        ]
    }

    #[test]
    fn test_exclusive_last_7_days() {
        let range = compute_range(CalendarUnit::Day, 7, test_anchor(), RangeMode::Exclusive)
            .unwrap();
        assert_eq!(range.from(), dt(2023, 3, 24, 0, 0, 0));
        assert_eq!(range.to(), dt_end(2023, 3, 30, 23, 59, 59));
    }

    #[test]
    fn test_inclusive_last_7_days() {
        let range = compute_range(CalendarUnit::Day, 7, test_anchor(), RangeMode::Inclusive)
            .unwrap();
        assert_eq!(range.from(), dt(2023, 3, 25, 0, 0, 0));
        assert_eq!(range.to(), dt_end(2023, 3, 31, 23, 59, 59));
    }

    #[test]
    fn test_exclusive_last_month_from_march_31() {
        // March 31 minus one month lands on February 28, so February is the
        // previous month rather than March again
        let range = compute_range(CalendarUnit::Month, 1, test_anchor(), RangeMode::Exclusive)
            .unwrap();
        assert_eq!(range.from(), dt(2023, 2, 1, 0, 0, 0));
        assert_eq!(range.to(), dt_end(2023, 2, 28, 23, 59, 59));
    }

    #[test]
    fn test_last_3_quarters() {
        let range = compute_range(
            CalendarUnit::Quarter,
            3,
            test_anchor(),
            RangeMode::Exclusive,
        )
        .unwrap();
        assert_eq!(range.from(), dt(2022, 4, 1, 0, 0, 0));
        assert_eq!(range.to(), dt_end(2022, 12, 31, 23, 59, 59));

        let range = compute_range(
            CalendarUnit::Quarter,
            3,
            test_anchor(),
            RangeMode::Inclusive,
        )
        .unwrap();
        assert_eq!(range.from(), dt(2022, 7, 1, 0, 0, 0));
        assert_eq!(range.to(), dt_end(2023, 3, 31, 23, 59, 59));
    }

    #[test]
    fn test_invalid_count_for_every_unit() {
        for unit in CalendarUnit::ALL {
            for count in [0, -1, i64::MIN] {
                for mode in [RangeMode::Inclusive, RangeMode::Exclusive] {
                    assert!(matches!(
                        compute_range(unit, count, test_anchor(), mode),
                        Err(Error::InvalidCount(c)) if c == count
                    ));
                }
            }
        }
    }

    #[test]
    fn test_inclusive_ends_at_end_of_anchor_period() {
        for anchor in anchors() {
            for unit in CalendarUnit::ALL {
                for count in [1, 2, 5] {
                    let range = compute_range(unit, count, anchor, RangeMode::Inclusive).unwrap();
                    assert_eq!(range.to(), unit.end_of(anchor).unwrap());
                    assert!(range.contains(anchor));
                    assert!(range.from() <= range.to());
                }
            }
        }
    }

    #[test]
    fn test_exclusive_ends_before_anchor_period() {
        for anchor in anchors() {
            for unit in CalendarUnit::ALL {
                for count in [1, 2, 5] {
                    let range = compute_range(unit, count, anchor, RangeMode::Exclusive).unwrap();
                    let current = unit.start_of(anchor).unwrap();
                    assert!(range.to() < current, "{} x{} at {}", unit, count, anchor);
                    assert_eq!(range.to() + Duration::nanoseconds(1), current);
                    assert!(!range.contains(anchor));
                    assert!(range.from() <= range.to());
                }
            }
        }
    }

    #[test]
    fn test_window_spans_count_periods() {
        // Walk period by period from `from`; the count-th step lands just past `to`
        for anchor in anchors() {
            for unit in CalendarUnit::ALL {
                for mode in [RangeMode::Inclusive, RangeMode::Exclusive] {
                    let count = 4;
                    let range = compute_range(unit, count, anchor, mode).unwrap();
                    let mut cursor = range.from();
                    for _ in 0..count {
                        assert!(range.contains(cursor));
                        cursor = unit.end_of(cursor).unwrap() + Duration::nanoseconds(1);
                    }
                    assert_eq!(cursor - Duration::nanoseconds(1), range.to());
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        for unit in CalendarUnit::ALL {
            let first = compute_range(unit, 3, test_anchor(), RangeMode::Exclusive).unwrap();
            let second = compute_range(unit, 3, test_anchor(), RangeMode::Exclusive).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_calculator_default_mode() {
        let exclusive = RangeCalculator::default();
        let inclusive = RangeCalculator::new(RangeMode::Inclusive);
        let anchor = test_anchor();

        assert_eq!(
            exclusive.compute(CalendarUnit::Day, 1, anchor, None).unwrap(),
            compute_range(CalendarUnit::Day, 1, anchor, RangeMode::Exclusive).unwrap()
        );
        assert_eq!(
            inclusive.compute(CalendarUnit::Day, 1, anchor, None).unwrap(),
            compute_range(CalendarUnit::Day, 1, anchor, RangeMode::Inclusive).unwrap()
        );
        // An explicit mode wins over the default either way
        assert_eq!(
            inclusive
                .compute(CalendarUnit::Day, 1, anchor, Some(RangeMode::Exclusive))
                .unwrap(),
            exclusive.compute(CalendarUnit::Day, 1, anchor, None).unwrap()
        );
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("inclusive".parse::<RangeMode>().unwrap(), RangeMode::Inclusive);
        assert_eq!("EXCLUSIVE".parse::<RangeMode>().unwrap(), RangeMode::Exclusive);
        assert!(matches!(
            "sometimes".parse::<RangeMode>(),
            Err(Error::InvalidMode(_))
        ));
    }

    #[test]
    fn test_inclusive_contains_leap_second_anchor() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
            .unwrap();
        for unit in [CalendarUnit::Second, CalendarUnit::Day, CalendarUnit::Year] {
            let range = compute_range(unit, 1, leap, RangeMode::Inclusive).unwrap();
            assert!(range.contains(leap), "{}", unit);
        }
    }

    #[test]
    fn test_range_json() {
        let range = compute_range(CalendarUnit::Day, 1, test_anchor(), RangeMode::Exclusive)
            .unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(
            json,
            r#"{"from":"2023-03-30 00:00:00","to":"2023-03-30 23:59:59.999999999"}"#
        );
        let back: DateRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }

    #[test]
    fn test_range_json_rejects_reversed() {
        let reversed = r#"{"from":"2024-01-01 00:00:00","to":"2023-01-01 00:00:00"}"#;
        assert!(serde_json::from_str::<DateRange>(reversed).is_err());

        let single_instant = r#"{"from":"2023-01-01 00:00:00","to":"2023-01-01 00:00:00"}"#;
        let range: DateRange = serde_json::from_str(single_instant).unwrap();
        assert_eq!(range.from(), range.to());
    }

    #[test]
    fn test_date_range_new_rejects_reversed() {
        assert!(DateRange::new(dt(2023, 1, 2, 0, 0, 0), dt(2023, 1, 1, 0, 0, 0)).is_none());
        assert!(DateRange::new(dt(2023, 1, 1, 0, 0, 0), dt(2023, 1, 1, 0, 0, 0)).is_some());
    }
}
