// hydrosim - Series structures
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Series structures and I/O operations.
//!
//! Provides the `Series` type for storing and exporting generated samples.

use crate::error::{HydroError, Result};
use crate::generator::{GenerationRequest, SignalGenerator};
use crate::sample::{format_date, Sample, WaterLevelRecord};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const CSV_HEADER: [&str; 3] = ["timestamp_ms", "date", "water_level"];

/// Series metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    /// Series name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Requested duration in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,
}

/// An ordered series of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Samples in ascending timestamp order.
    pub samples: Vec<Sample>,
    /// Metadata.
    #[serde(default)]
    pub metadata: SeriesMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    timestamp_ms: i64,
    date: String,
    water_level: f64,
}

impl Series {
    /// Wrap already generated samples.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            metadata: SeriesMetadata::default(),
        }
    }

    /// Generate a series with `generator`.
    pub fn generate(generator: &SignalGenerator, request: GenerationRequest) -> Result<Self> {
        let mut series = Self::new(generator.run(request)?);
        series.metadata.duration_days = Some(request.duration_days);
        Ok(series)
    }

    /// Set name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.metadata.name = Some(name.to_string());
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.metadata.description = Some(description.to_string());
        self
    }

    /// Get all samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Get number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time between first and last sample in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp_ms() - first.timestamp_ms(),
            _ => 0,
        }
    }

    /// Timestamps as a vector.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Values as a vector.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Samples in their outbound record shape.
    pub fn records(&self) -> Vec<WaterLevelRecord> {
        self.samples.iter().map(Sample::to_record).collect()
    }

    /// Export to CSV file.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }

    /// Write CSV to any writer.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for sample in &self.samples {
            writer.serialize(CsvRow {
                timestamp_ms: sample.timestamp_ms(),
                date: format_date(&sample.timestamp),
                water_level: sample.value,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Import from CSV file.
    ///
    /// The `timestamp_ms` column is authoritative; `date` is informational.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.iter().collect::<Vec<_>>() != CSV_HEADER {
            return Err(HydroError::Parse {
                line: 1,
                message: format!("expected header {}", CSV_HEADER.join(",")),
            });
        }

        let mut samples = Vec::new();
        for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
            let row = result?;
            let timestamp = Utc
                .timestamp_millis_opt(row.timestamp_ms)
                .single()
                .ok_or(HydroError::Parse {
                    line: i + 2,
                    message: "timestamp out of range".to_string(),
                })?;
            samples.push(Sample::new(timestamp, row.water_level));
        }

        if samples.is_empty() {
            return Err(HydroError::Empty);
        }
        Ok(Self::new(samples))
    }

    /// Export to JSON file, metadata included.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Import from JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let series = serde_json::from_reader(reader)?;
        Ok(series)
    }

    /// Export the record array (`[{"waterLevel": .., "date": ..}, ..]`).
    pub fn to_records_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.records())?;
        Ok(())
    }

    /// Calculate basic statistics over the values.
    pub fn stats(&self) -> Option<SeriesStats> {
        if self.samples.is_empty() {
            return None;
        }

        let count = self.samples.len();
        let sum: f64 = self.samples.iter().map(|s| s.value).sum();
        let mean = sum / count as f64;

        let variance: f64 = self
            .samples
            .iter()
            .map(|s| (s.value - mean).powi(2))
            .sum::<f64>()
            / count as f64;
        let std_dev = variance.sqrt();

        let min = self.samples.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
        let max = self
            .samples
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(SeriesStats {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// Basic statistics for a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::default_epoch;
    use approx::assert_relative_eq;
    use chrono::Duration;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn week() -> Series {
        Series::generate(&SignalGenerator::new(), GenerationRequest::weeks(1))
            .unwrap()
            .with_name("week")
    }

    #[test]
    fn test_generate_sets_metadata() {
        let series = week();
        assert_eq!(series.len(), 168);
        assert_eq!(series.metadata.duration_days, Some(7.0));
        assert_eq!(series.metadata.name.as_deref(), Some("week"));
    }

    #[test]
    fn test_duration() {
        assert_eq!(week().duration_ms(), 167 * 3_600_000);
        assert_eq!(Series::default().duration_ms(), 0);
    }

    #[test]
    fn test_csv_roundtrip() {
        let series = week();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        series.to_csv(path).unwrap();
        let loaded = Series::from_csv(path).unwrap();

        assert_eq!(loaded.len(), series.len());
        assert_eq!(loaded.timestamps(), series.timestamps());
        assert_eq!(loaded.values(), series.values());
    }

    #[test]
    fn test_csv_header_and_first_row() {
        let series = Series::new(vec![Sample::new(default_epoch(), 19.35)]);
        let mut buf = Vec::new();
        series.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("timestamp_ms,date,water_level"));
        assert_eq!(
            lines.next(),
            Some("1546300800000,2019-01-01T00:00:00.000Z,19.35")
        );
    }

    #[test]
    fn test_csv_rejects_wrong_header() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "time,level").unwrap();
        writeln!(temp_file, "0,1.0").unwrap();

        let result = Series::from_csv(temp_file.path());
        assert!(matches!(result, Err(HydroError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_csv_empty_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "timestamp_ms,date,water_level").unwrap();

        let result = Series::from_csv(temp_file.path());
        assert!(matches!(result, Err(HydroError::Empty)));
    }

    #[test]
    fn test_json_roundtrip() {
        let series = week().with_description("stock model");
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        series.to_json(path).unwrap();
        let loaded = Series::from_json(path).unwrap();

        assert_eq!(loaded.metadata, series.metadata);
        assert_eq!(loaded.timestamps(), series.timestamps());
        for (a, b) in loaded.values().iter().zip(series.values()) {
            assert_relative_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_records_json_shape() {
        let series = Series::new(vec![
            Sample::new(default_epoch(), 1.0),
            Sample::new(default_epoch() + Duration::hours(1), 2.0),
        ]);
        let temp_file = NamedTempFile::new().unwrap();
        series.to_records_json(temp_file.path()).unwrap();

        let text = std::fs::read_to_string(temp_file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["waterLevel"], 2.0);
        assert_eq!(value[1]["date"], "2019-01-01T01:00:00.000Z");
    }

    #[test]
    fn test_stats() {
        let series = Series::new(vec![
            Sample::new(default_epoch(), 10.0),
            Sample::new(default_epoch() + Duration::hours(1), 20.0),
            Sample::new(default_epoch() + Duration::hours(2), 30.0),
        ]);

        let stats = series.stats().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert!(Series::default().stats().is_none());
    }
}
