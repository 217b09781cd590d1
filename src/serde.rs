use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

use crate::timestamp;

pub fn serialize_timestamp<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&value.format(timestamp::DISPLAY_FORMAT))
}

/// Accepts any string [`timestamp::parse`] understands, or Unix seconds as
/// an integer. Unix seconds are read as UTC.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrSeconds;

    impl<'de> Visitor<'de> for StringOrSeconds {
        type Value = NaiveDateTime;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("timestamp string or unix seconds")
        }

        fn visit_str<E>(self, value: &str) -> Result<NaiveDateTime, E>
        where
            E: de::Error,
        {
            timestamp::parse(value)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp `{}`", value)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            timestamp::from_unix_seconds(v, chrono_tz::Tz::UTC)
                .ok_or_else(|| de::Error::custom(format!("unix seconds out of range: {}", v)))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let secs = i64::try_from(v)
                .map_err(|_| de::Error::custom(format!("unix seconds out of range: {}", v)))?;
            self.visit_i64(secs)
        }
    }

    deserializer.deserialize_any(StringOrSeconds)
}
