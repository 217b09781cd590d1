//! Settings shared by every scope.
//!
//! Loaded once at startup, from an optional JSON file and then from the
//! environment, and read-only afterwards.

use std::fs::File;
use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::range::{RangeCalculator, RangeMode};

pub const DEFAULT_RANGE_VAR: &str = "DATE_SCOPES_DEFAULT_RANGE";
pub const CREATED_COLUMN_VAR: &str = "DATE_SCOPES_CREATED_COLUMN";
pub const TIMEZONE_VAR: &str = "DATE_SCOPES_TIMEZONE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode for presets that don't fix their own and get no explicit one.
    pub default_range: RangeMode,
    /// Timestamp column used when neither the call nor the entity names one.
    pub created_column: String,
    /// Only used to read the clock for the default anchor.
    pub timezone: Tz,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_range: RangeMode::Exclusive,
            created_column: "created_at".to_string(),
            timezone: Tz::UTC,
        }
    }
}

impl Settings {
    /// File first if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Settings::from_path(path)?,
            None => Settings::default(),
        };
        settings.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).context("Unable to open settings file")?;
        let settings: Settings =
            serde_json::from_reader(file).context("Settings file was not well-formatted")?;
        settings.validate()?;
        log::debug!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Apply `DATE_SCOPES_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DEFAULT_RANGE_VAR) {
            self.default_range = value.parse::<RangeMode>().map_err(|e| Error::Config {
                field: "default_range".to_string(),
                message: e.to_string(),
            })?;
        }

        if let Some(value) = lookup(CREATED_COLUMN_VAR) {
            self.created_column = value;
        }

        if let Some(value) = lookup(TIMEZONE_VAR) {
            self.timezone = value.trim().parse::<Tz>().map_err(|e| Error::Config {
                field: "timezone".to_string(),
                message: format!("{}", e),
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.created_column.trim().is_empty() {
            return Err(Error::Config {
                field: "created_column".to_string(),
                message: "Column name cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn calculator(&self) -> RangeCalculator {
        RangeCalculator::new(self.default_range)
    }

    /// Current wall-clock time in the configured timezone.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}
