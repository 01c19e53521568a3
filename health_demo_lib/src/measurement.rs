use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped GPS and heartrate sample.
///
/// The timestamp is kept as the ISO-8601 string it was recorded with and is not validated.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Measurement {
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub heartrate: i32,
}

impl Measurement {
    pub fn new(timestamp: impl Into<String>, latitude: f64, longitude: f64, heartrate: i32) -> Self {
        Self {
            timestamp: timestamp.into(),
            latitude,
            longitude,
            heartrate,
        }
    }

    /// None if the timestamp is not valid RFC 3339.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }

    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
