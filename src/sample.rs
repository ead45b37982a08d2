// hydrosim - Samples
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Generated samples and their outbound record shape.

use crate::generator::MS_PER_DAY;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One simulated water level reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute time of the reading.
    pub timestamp: DateTime<Utc>,
    /// Simulated level, in percent.
    pub value: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Timestamp as milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Day offset of this sample from `epoch` (the generator's `x`).
    pub fn x(&self, epoch: DateTime<Utc>) -> f64 {
        (self.timestamp - epoch).num_milliseconds() as f64 / MS_PER_DAY
    }

    /// Convert to the record shape handed to queue and table writers.
    pub fn to_record(&self) -> WaterLevelRecord {
        WaterLevelRecord::from(*self)
    }
}

/// Serialized shape of a sample: `{"waterLevel": .., "date": ..}`.
///
/// `date` is RFC 3339 with millisecond precision and a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterLevelRecord {
    pub water_level: f64,
    #[serde(with = "rfc3339_millis")]
    pub date: DateTime<Utc>,
}

impl From<Sample> for WaterLevelRecord {
    fn from(sample: Sample) -> Self {
        Self {
            water_level: sample.value,
            date: sample.timestamp,
        }
    }
}

impl From<WaterLevelRecord> for Sample {
    fn from(record: WaterLevelRecord) -> Self {
        Self {
            timestamp: record.date,
            value: record.water_level,
        }
    }
}

impl WaterLevelRecord {
    /// Encode as a JSON object string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from a JSON object string.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Format a timestamp the way records carry it.
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_date(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Sample {
        let ts = Utc.with_ymd_and_hms(2019, 1, 1, 5, 0, 0).single().unwrap();
        Sample::new(ts, 19.25)
    }

    #[test]
    fn test_record_field_names() {
        let json = sample().to_record().to_json().unwrap();
        assert_eq!(json, r#"{"waterLevel":19.25,"date":"2019-01-01T05:00:00.000Z"}"#);
    }

    #[test]
    fn test_record_parses_offset_dates() {
        let record =
            WaterLevelRecord::from_json(r#"{"waterLevel":1.5,"date":"2019-01-01T06:00:00+01:00"}"#)
                .unwrap();
        assert_eq!(Sample::from(record), Sample::new(sample().timestamp, 1.5));
    }

    #[test]
    fn test_record_rejects_bad_date() {
        let result = WaterLevelRecord::from_json(r#"{"waterLevel":1.0,"date":"yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_day_offset_from_epoch() {
        let epoch = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).single().unwrap();
        assert_eq!(sample().x(epoch), 5.0 / 24.0);
        assert_eq!(Sample::new(epoch, 0.0).x(epoch), 0.0);
    }

    #[test]
    fn test_timestamp_ms() {
        assert_eq!(sample().timestamp_ms(), 1_546_318_800_000);
    }
}
