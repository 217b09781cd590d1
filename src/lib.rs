pub mod config;
pub mod errors;
pub mod phrase;
pub mod preset;
pub mod range;
pub mod scope;
pub mod serde;
pub mod table;
pub mod timestamp;
pub mod unit;

pub use config::Settings;
pub use preset::Preset;
pub use range::{compute_range, DateRange, RangeCalculator, RangeMode};
pub use scope::{BetweenFilter, DateScopes, Scope, TimestampColumn};
pub use table::Table;
pub use unit::CalendarUnit;
