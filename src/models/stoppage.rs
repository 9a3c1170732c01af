use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::GeoCoord;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// A run of stopped samples whose duration cleared the active threshold.
///
/// Only the two timestamps are stored. The duration is always derived from
/// them, so a record can never disagree with itself.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stoppage {
    pub latitude: f64,
    pub longitude: f64,
    /// Timestamp (ms) of the first stopped sample.
    pub start_time: i64,
    /// Timestamp (ms) of the sample that ended the run, or of the last sample
    /// when the data ends while stopped.
    pub end_time: i64,
}

impl Stoppage {
    pub fn new(position: GeoCoord, start_time: i64, end_time: i64) -> Self {
        Self {
            latitude: position.latitude,
            longitude: position.longitude,
            start_time,
            end_time,
        }
    }

    pub fn position(&self) -> GeoCoord {
        GeoCoord::new(self.latitude, self.longitude)
    }

    pub fn duration_minutes(&self) -> f64 {
        minutes_between(self.start_time, self.end_time)
    }

    pub fn duration(&self) -> Duration {
        // `Duration` cannot hold i64::MIN milliseconds.
        let millis = self.end_time.saturating_sub(self.start_time).max(-i64::MAX);
        Duration::milliseconds(millis)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.start_time).single()
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.end_time).single()
    }
}

/// Minutes elapsed between two millisecond timestamps.
pub fn minutes_between(start_ms: i64, end_ms: i64) -> f64 {
    (end_ms as f64 - start_ms as f64) / MILLIS_PER_MINUTE
}

// The wire form carries the derived duration so renderers don't recompute it.
impl Serialize for Stoppage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Stoppage", 5)?;
        state.serialize_field("latitude", &self.latitude)?;
        state.serialize_field("longitude", &self.longitude)?;
        state.serialize_field("startTime", &self.start_time)?;
        state.serialize_field("endTime", &self.end_time)?;
        state.serialize_field("durationMinutes", &self.duration_minutes())?;
        state.end()
    }
}
