//! Named presets such as `ofLast7Days` or `monthToDate`.
//!
//! A preset is nothing more than a unit, a count and a rule for picking the
//! range mode. All the named ones live in [`NAMED_PRESETS`]; the open ended
//! `ofLast<Units>(N)` forms live in [`COUNTED_FAMILIES`].

use std::fmt;

use chrono::NaiveDateTime;

use crate::errors::{Error, Result};
use crate::range::{compute_range, DateRange, RangeCalculator, RangeMode};
use crate::unit::CalendarUnit;

/// How a preset picks its range mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeBinding {
    /// Explicit mode, else the configured default.
    Configured,
    /// Explicit mode, else this one. The configured default is ignored.
    Fixed(RangeMode),
    /// Always this mode. An explicit mode is an error.
    Forced(RangeMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Preset {
    unit: CalendarUnit,
    count: i64,
    binding: ModeBinding,
}

use CalendarUnit::*;

pub const NAMED_PRESETS: &[(&str, Preset)] = &[
    ("ofJustNow", Preset::just_now()),
    ("ofLastSecond", Preset::last_one(Second)),
    ("ofLast15Seconds", Preset::last(Second, 15)),
    ("ofLast30Seconds", Preset::last(Second, 30)),
    ("ofLast45Seconds", Preset::last(Second, 45)),
    ("ofLast60Seconds", Preset::last(Second, 60)),
    ("ofLastMinute", Preset::last_one(Minute)),
    ("ofLast15Minutes", Preset::last(Minute, 15)),
    ("ofLast30Minutes", Preset::last(Minute, 30)),
    ("ofLast45Minutes", Preset::last(Minute, 45)),
    ("ofLast60Minutes", Preset::last(Minute, 60)),
    ("ofLastHour", Preset::last_one(Hour)),
    ("ofLast6Hours", Preset::last(Hour, 6)),
    ("ofLast12Hours", Preset::last(Hour, 12)),
    ("ofLast18Hours", Preset::last(Hour, 18)),
    ("ofLast24Hours", Preset::last(Hour, 24)),
    ("ofToday", Preset::today()),
    ("ofYesterday", Preset::yesterday()),
    ("ofLast7Days", Preset::last(Day, 7)),
    ("ofLast14Days", Preset::last(Day, 14)),
    ("ofLast21Days", Preset::last(Day, 21)),
    ("ofLast30Days", Preset::last(Day, 30)),
    ("ofLastWeek", Preset::last_one(Week)),
    ("ofLast2Weeks", Preset::last(Week, 2)),
    ("ofLast3Weeks", Preset::last(Week, 3)),
    ("ofLast4Weeks", Preset::last(Week, 4)),
    ("ofLastMonth", Preset::last_one(Month)),
    ("ofLast3Months", Preset::last(Month, 3)),
    ("ofLast6Months", Preset::last(Month, 6)),
    ("ofLast9Months", Preset::last(Month, 9)),
    ("ofLast12Months", Preset::last(Month, 12)),
    ("ofLastQuarter", Preset::last_one(Quarter)),
    ("ofLast2Quarters", Preset::last(Quarter, 2)),
    ("ofLast3Quarters", Preset::last(Quarter, 3)),
    ("ofLast4Quarters", Preset::last(Quarter, 4)),
    ("ofLastYear", Preset::last_one(Year)),
    ("ofLastDecade", Preset::last_one(Decade)),
    ("ofLastCentury", Preset::last_one(Century)),
    ("ofLastMillennium", Preset::last_one(Millennium)),
    ("secondToNow", Preset::to_date(Second)),
    ("minuteToNow", Preset::to_date(Minute)),
    ("hourToNow", Preset::to_date(Hour)),
    ("dayToNow", Preset::to_date(Day)),
    ("weekToDate", Preset::to_date(Week)),
    ("monthToDate", Preset::to_date(Month)),
    ("quarterToDate", Preset::to_date(Quarter)),
    ("yearToDate", Preset::to_date(Year)),
    ("decadeToDate", Preset::to_date(Decade)),
    ("centuryToDate", Preset::to_date(Century)),
    ("millenniumToDate", Preset::to_date(Millennium)),
];

/// Presets that take their count from the caller.
pub const COUNTED_FAMILIES: &[(&str, CalendarUnit)] = &[
    ("ofLastSeconds", Second),
    ("ofLastMinutes", Minute),
    ("ofLastHours", Hour),
    ("ofLastDays", Day),
    ("ofLastWeeks", Week),
    ("ofLastMonths", Month),
    ("ofLastQuarters", Quarter),
    ("ofLastYears", Year),
    ("ofLastDecades", Decade),
    ("ofLastCenturies", Century),
    ("ofLastMillenniums", Millennium),
];

impl Preset {
    /// The last `count` periods, mode from the caller or the configuration.
    pub const fn last(unit: CalendarUnit, count: i64) -> Self {
        Preset {
            unit,
            count,
            binding: ModeBinding::Configured,
        }
    }

    /// The previous complete period unless the caller asks otherwise.
    pub const fn last_one(unit: CalendarUnit) -> Self {
        Preset {
            unit,
            count: 1,
            binding: ModeBinding::Fixed(RangeMode::Exclusive),
        }
    }

    pub const fn just_now() -> Self {
        Preset {
            unit: Second,
            count: 1,
            binding: ModeBinding::Fixed(RangeMode::Inclusive),
        }
    }

    pub const fn today() -> Self {
        Preset {
            unit: Day,
            count: 1,
            binding: ModeBinding::Fixed(RangeMode::Inclusive),
        }
    }

    pub const fn yesterday() -> Self {
        Preset::last_one(Day)
    }

    /// The whole current period, e.g. `monthToDate`.
    pub const fn to_date(unit: CalendarUnit) -> Self {
        Preset {
            unit,
            count: 1,
            binding: ModeBinding::Forced(RangeMode::Inclusive),
        }
    }

    pub fn unit(&self) -> CalendarUnit {
        self.unit
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn binding(&self) -> ModeBinding {
        self.binding
    }

    /// Look a preset up by name. Matching ignores case, `_`, `-` and spaces.
    ///
    /// Counted family names (`ofLastDays`) need `count`; every other name
    /// rejects one.
    pub fn named(name: &str, count: Option<i64>) -> Result<Preset> {
        let key = normalize(name);

        if let Some((_, preset)) = NAMED_PRESETS.iter().find(|(n, _)| normalize(n) == key) {
            return match count {
                None => Ok(*preset),
                Some(_) => Err(Error::UnexpectedCount(name.to_string())),
            };
        }

        if let Some((_, unit)) = COUNTED_FAMILIES.iter().find(|(n, _)| normalize(n) == key) {
            return match count {
                Some(count) => Ok(Preset::last(*unit, count)),
                None => Err(Error::MissingCount(name.to_string())),
            };
        }

        Err(Error::UnknownPreset(name.to_string()))
    }

    /// Pick the mode for a call, given an optional explicit mode and the
    /// configured default.
    pub fn resolve_mode(
        &self,
        explicit: Option<RangeMode>,
        default: RangeMode,
    ) -> Result<RangeMode> {
        match (self.binding, explicit) {
            (ModeBinding::Configured, explicit) => Ok(explicit.unwrap_or(default)),
            (ModeBinding::Fixed(mode), explicit) => Ok(explicit.unwrap_or(mode)),
            (ModeBinding::Forced(mode), None) => Ok(mode),
            (ModeBinding::Forced(_), Some(_)) => Err(Error::ForcedMode(self.to_string())),
        }
    }

    pub fn range(
        &self,
        calculator: &RangeCalculator,
        anchor: NaiveDateTime,
        mode: Option<RangeMode>,
    ) -> Result<DateRange> {
        let mode = self.resolve_mode(mode, calculator.default_mode())?;
        compute_range(self.unit, self.count, anchor, mode)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = NAMED_PRESETS.iter().find(|(_, p)| p == self) {
            return f.write_str(name);
        }
        match COUNTED_FAMILIES.iter().find(|(_, unit)| *unit == self.unit) {
            Some((family, _)) => write!(f, "{}({})", family, self.count),
            None => write!(f, "ofLastUnit({}, {})", self.unit, self.count),
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
