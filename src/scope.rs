//! Applying presets to record collections.
//!
//! [`DateScopes`] is the host side: it owns the [`Settings`], supplies "now"
//! when a [`Scope`] has no anchor, and picks the timestamp column. The
//! collection only has to implement [`BetweenFilter`].

use chrono::NaiveDateTime;
use chrono_tz::Tz;

use crate::config::Settings;
use crate::errors::Result;
use crate::preset::Preset;
use crate::range::{DateRange, RangeMode};

/// Something with a named timestamp column.
pub trait TimestampColumn {
    /// Entity-specific column, when it differs from the configured one.
    fn timestamp_column(&self) -> Option<&str> {
        None
    }
}

/// Selects the records whose `column` lies within a closed range.
///
/// `timezone` is the zone the range's wall-clock bounds are in. Absolute
/// instants stored in the column are read in it before comparing.
pub trait BetweenFilter: TimestampColumn {
    type Output;

    fn filter_between(
        &self,
        column: &str,
        range: &DateRange,
        timezone: Tz,
    ) -> Result<Self::Output>;
}

/// A preset plus the per-call overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    preset: Preset,
    anchor: Option<NaiveDateTime>,
    mode: Option<RangeMode>,
    column: Option<String>,
}

impl Scope {
    pub fn new(preset: Preset) -> Self {
        Scope {
            preset,
            anchor: None,
            mode: None,
            column: None,
        }
    }

    pub fn anchor(mut self, anchor: NaiveDateTime) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn mode(mut self, mode: RangeMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn column<S: Into<String>>(mut self, column: S) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }
}

impl From<Preset> for Scope {
    fn from(preset: Preset) -> Self {
        Scope::new(preset)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DateScopes {
    settings: Settings,
}

impl DateScopes {
    pub fn new(settings: Settings) -> Self {
        DateScopes { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The only place the clock is read.
    pub fn now(&self) -> NaiveDateTime {
        self.settings.now()
    }

    pub fn range(&self, scope: &Scope) -> Result<DateRange> {
        let anchor = scope.anchor.unwrap_or_else(|| self.now());
        scope
            .preset
            .range(&self.settings.calculator(), anchor, scope.mode)
    }

    /// Call override, then the entity's column, then the configured one.
    pub fn column<'a, T>(&'a self, scope: &'a Scope, target: &'a T) -> &'a str
    where
        T: TimestampColumn + ?Sized,
    {
        scope
            .column
            .as_deref()
            .or_else(|| target.timestamp_column())
            .unwrap_or(&self.settings.created_column)
    }

    pub fn apply<T: BetweenFilter>(&self, scope: &Scope, target: &T) -> Result<T::Output> {
        let range = self.range(scope)?;
        let column = self.column(scope, target);
        log::debug!("{} on `{}`: {}", scope.preset, column, range);
        target.filter_between(column, &range, self.settings.timezone)
    }
}
