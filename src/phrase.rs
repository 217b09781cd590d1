//! Human phrases for presets.
//!
//! # Supported Phrases
//!
//! - **Moments**: `"just now"`, `"today"`, `"yesterday"`
//! - **Previous period**: `"last week"`, `"last quarter"`
//! - **Counted**: `"last 7 days"`, `"past 3 quarters"`
//! - **Current period**: `"month to date"`, `"hour to now"`, `"this year"`
//! - **Preset names**: anything [`Preset::named`] accepts, e.g. `"ofLast30Days"`

use regex::Regex;

use crate::errors::{Error, Result};
use crate::preset::Preset;
use crate::unit::CalendarUnit;

const UNITS: &str =
    "second|minute|hour|day|week|month|quarter|year|decade|century|centuries|millennium|millennia|millenniums";

/// Parse a phrase or preset name into a [`Preset`].
pub fn parse(input: &str) -> Result<Preset> {
    let normalized = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = normalized.to_lowercase();

    if let Some(preset) = try_parse_moment(&lower) {
        return Ok(preset);
    }

    if let Some(preset) = try_parse_counted(&lower) {
        return preset;
    }

    if let Some(preset) = try_parse_previous(&lower) {
        return Ok(preset);
    }

    if let Some(preset) = try_parse_current(&lower) {
        return Ok(preset);
    }

    match Preset::named(&normalized, None) {
        Err(Error::UnknownPreset(_)) => Err(Error::UnknownPreset(input.trim().to_string())),
        other => other,
    }
}

fn try_parse_moment(input: &str) -> Option<Preset> {
    match input {
        "just now" | "now" => Some(Preset::just_now()),
        "today" => Some(Preset::today()),
        "yesterday" => Some(Preset::yesterday()),
        _ => None,
    }
}

fn try_parse_counted(input: &str) -> Option<Result<Preset>> {
    // "last 7 days", "past 1 week"
    let re = Regex::new(&format!(r"^(?:last|past) (\d+) ({})s?$", UNITS)).ok()?;
    let caps = re.captures(input)?;
    let unit: CalendarUnit = caps.get(2)?.as_str().parse().ok()?;
    let digits = caps.get(1)?.as_str();
    Some(
        digits
            .parse::<i64>()
            .map(|count| Preset::last(unit, count))
            .map_err(|_| Error::UnparsableCount(digits.to_string())),
    )
}

fn try_parse_previous(input: &str) -> Option<Preset> {
    // "last month"
    let re = Regex::new(&format!(r"^last ({})$", UNITS)).ok()?;
    let caps = re.captures(input)?;
    let unit: CalendarUnit = caps.get(1)?.as_str().parse().ok()?;
    Some(Preset::last_one(unit))
}

fn try_parse_current(input: &str) -> Option<Preset> {
    // "month to date", "minute to now"
    let re = Regex::new(&format!(r"^({}) to (?:date|now)$", UNITS)).ok()?;
    if let Some(caps) = re.captures(input) {
        let unit: CalendarUnit = caps.get(1)?.as_str().parse().ok()?;
        return Some(Preset::to_date(unit));
    }

    // "this week"
    let re_this = Regex::new(&format!(r"^this ({})$", UNITS)).ok()?;
    let caps = re_this.captures(input)?;
    let unit: CalendarUnit = caps.get(1)?.as_str().parse().ok()?;
    Some(Preset::to_date(unit))
}
