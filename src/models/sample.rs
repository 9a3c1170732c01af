//! Telemetry sample data model.
//!
//! One record per line of the vehicle telemetry feed. Field names on the wire
//! follow the feed's camelCase convention (`eventGeneratedTime`).

use chrono::{DateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoCoord {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoord {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single telemetry record.
///
/// Samples are expected in non-decreasing `event_generated_time` order. That is
/// an input contract, not something the segmentation engine checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    /// Zero means stopped. Any other value, including NaN, counts as moving.
    pub speed: f64,
    /// Milliseconds since the Unix epoch. Feeds may write it as an integer
    /// or as a whole-valued float.
    #[serde(deserialize_with = "deserialize_millis")]
    pub event_generated_time: i64,
}

impl Sample {
    pub fn new(latitude: f64, longitude: f64, speed: f64, event_generated_time: i64) -> Self {
        Self {
            latitude,
            longitude,
            speed,
            event_generated_time,
        }
    }

    pub fn position(&self) -> GeoCoord {
        GeoCoord::new(self.latitude, self.longitude)
    }

    pub fn is_stopped(&self) -> bool {
        self.speed == 0.0
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.event_generated_time).single()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMillis {
    Int(i64),
    Float(f64),
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match RawMillis::deserialize(deserializer)? {
        RawMillis::Int(millis) => Ok(millis),
        RawMillis::Float(millis)
            if millis.is_finite()
                && millis.fract() == 0.0
                && millis >= i64::MIN as f64
                && millis < i64::MAX as f64 =>
        {
            Ok(millis as i64)
        }
        RawMillis::Float(millis) => Err(D::Error::custom(format!(
            "timestamp {millis} is not a whole number of milliseconds"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_feed_field_names() {
        let json = r#"{"latitude":12.5,"longitude":77.25,"speed":0,"eventGeneratedTime":1700000000000}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();

        assert_eq!(sample, Sample::new(12.5, 77.25, 0.0, 1_700_000_000_000));
        assert!(sample.is_stopped());
        assert_eq!(sample.position(), GeoCoord::new(12.5, 77.25));
    }

    #[test]
    fn only_exact_zero_counts_as_stopped() {
        assert!(Sample::new(0.0, 0.0, -0.0, 0).is_stopped());
        assert!(!Sample::new(0.0, 0.0, 0.01, 0).is_stopped());
        assert!(!Sample::new(0.0, 0.0, f64::NAN, 0).is_stopped());
    }

    #[test]
    fn generated_at_converts_millis() {
        let sample = Sample::new(0.0, 0.0, 0.0, 60_000);
        let at = sample.generated_at().unwrap();
        assert_eq!(at.timestamp(), 60);
    }
}
