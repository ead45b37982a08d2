// hydrosim - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Core time series generation.
//!
//! Samples are spaced one hour apart starting at the reference epoch. The
//! day offset of sample `i` is `i / 24`, computed from the index rather than
//! by accumulating `1/24` steps, so the sample count never drifts.

use crate::error::{HydroError, Result};
use crate::model::WaterLevelModel;
use crate::sample::Sample;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::time::UNIX_EPOCH;

/// Samples per day.
pub const SAMPLES_PER_DAY: u32 = 24;

/// Milliseconds per day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Milliseconds between consecutive samples.
pub const SAMPLE_INTERVAL_MS: i64 = 3_600_000;

/// Default reference epoch: 2019-01-01 00:00:00 UTC.
pub const DEFAULT_EPOCH_MS: i64 = 1_546_300_800_000;

/// A request for `duration_days` worth of hourly samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Length of the series in (possibly fractional) days.
    pub duration_days: f64,
}

impl GenerationRequest {
    /// Create a request for the given number of days.
    pub fn new(duration_days: f64) -> Self {
        Self { duration_days }
    }

    /// Request a number of whole weeks.
    pub fn weeks(weeks: u32) -> Self {
        Self::new(f64::from(weeks) * 7.0)
    }

    /// Validate the request and return the number of samples it yields.
    ///
    /// The count is `ceil(duration_days * 24)`, i.e. every sample whose
    /// offset lies in the half-open interval `[0, duration_days)`.
    ///
    /// Where `duration_days * 24` rounds onto an integer the product wins
    /// over the interval rule: `364.83333333333337 * 24 == 8756.0`, so 8756
    /// samples are produced even though `8756 / 24.0` is still below the
    /// limit.
    pub fn sample_count(&self) -> Result<usize> {
        let days = self.duration_days;
        if !days.is_finite() {
            return Err(HydroError::InvalidArgument(format!(
                "duration_days must be finite, got {}",
                days
            )));
        }
        if days < 0.0 {
            return Err(HydroError::InvalidArgument(format!(
                "duration_days must be >= 0, got {}",
                days
            )));
        }
        Ok((days * f64::from(SAMPLES_PER_DAY)).ceil() as usize)
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Absolute time of `x = 0`.
    pub reference_epoch: DateTime<Utc>,
    /// Model evaluated at each sample.
    pub model: WaterLevelModel,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reference_epoch: default_epoch(),
            model: WaterLevelModel::stock(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference epoch.
    pub fn with_reference_epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.reference_epoch = epoch;
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: WaterLevelModel) -> Self {
        self.model = model;
        self
    }
}

/// The default reference epoch as a `DateTime`.
pub fn default_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from(UNIX_EPOCH) + Duration::milliseconds(DEFAULT_EPOCH_MS)
}

/// Day offset of sample `index`.
#[inline]
pub fn day_offset(index: usize) -> f64 {
    index as f64 / f64::from(SAMPLES_PER_DAY)
}

/// Deterministic water level generator.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: GeneratorConfig,
}

impl SignalGenerator {
    /// Create a generator with the stock model and default epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator from a config.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `duration_days` of hourly samples.
    ///
    /// Fails with [`HydroError::InvalidArgument`] for negative or
    /// non-finite durations, before any sample is produced.
    pub fn generate(&self, duration_days: f64) -> Result<Vec<Sample>> {
        self.run(GenerationRequest::new(duration_days))
    }

    /// Generate the samples for a request.
    pub fn run(&self, request: GenerationRequest) -> Result<Vec<Sample>> {
        Ok(self.samples(request)?.collect())
    }

    /// Lazily iterate the samples for a request.
    ///
    /// Validation, including the check that the last timestamp is
    /// representable, happens here rather than during iteration.
    pub fn samples(&self, request: GenerationRequest) -> Result<Samples<'_>> {
        let count = request.sample_count()?;
        if let Some(last) = count.checked_sub(1) {
            if self.timestamp_at(last).is_none() {
                return Err(HydroError::InvalidArgument(format!(
                    "duration_days {} runs past the representable time range",
                    request.duration_days
                )));
            }
        }
        Ok(Samples {
            generator: self,
            index: 0,
            count,
        })
    }

    /// Sample at `index`, or `None` if its timestamp is out of range.
    pub fn sample_at(&self, index: usize) -> Option<Sample> {
        let x = day_offset(index);
        let timestamp = self.timestamp_at(index)?;
        Some(Sample::new(timestamp, self.config.model.evaluate(x)))
    }

    fn timestamp_at(&self, index: usize) -> Option<DateTime<Utc>> {
        let offset_ms = (day_offset(index) * MS_PER_DAY).round();
        if offset_ms > i64::MAX as f64 {
            return None;
        }
        self.config
            .reference_epoch
            .checked_add_signed(Duration::milliseconds(offset_ms as i64))
    }
}

/// Iterator over generated samples. See [`SignalGenerator::samples`].
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    generator: &'a SignalGenerator,
    index: usize,
    count: usize,
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.index >= self.count {
            return None;
        }
        let sample = self.generator.sample_at(self.index)?;
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples<'_> {}

/// Generate `duration_days` of samples with the default configuration.
pub fn generate(duration_days: f64) -> Result<Vec<Sample>> {
    SignalGenerator::new().generate(duration_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::Cycle;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_default_epoch() {
        let expected = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).single().unwrap();
        assert_eq!(default_epoch(), expected);
        assert_eq!(GeneratorConfig::default().reference_epoch, expected);
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(GenerationRequest::new(0.0).sample_count().unwrap(), 0);
        assert_eq!(GenerationRequest::new(1.0).sample_count().unwrap(), 24);
        assert_eq!(GenerationRequest::weeks(1).sample_count().unwrap(), 168);
        // 1.5 hours
        assert_eq!(GenerationRequest::new(0.0625).sample_count().unwrap(), 2);
        // 2.4 hours
        assert_eq!(GenerationRequest::new(0.1).sample_count().unwrap(), 3);
    }

    #[test]
    fn test_sample_count_follows_product_at_rounding_boundary() {
        let days = 364.833_333_333_333_37;
        assert!(8756.0 / 24.0 < days);
        assert_eq!(GenerationRequest::new(days).sample_count().unwrap(), 8756);
    }

    #[test]
    fn test_sample_reports_day_offset() {
        let samples = generate(1.0).unwrap();
        assert_eq!(samples[12].x(default_epoch()), 0.5);
        assert_eq!(samples[12].x(default_epoch()), day_offset(12));
    }

    #[test]
    fn test_sample_count_rejects_bad_input() {
        for days in [-1.0, -1e-9, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = GenerationRequest::new(days).sample_count().unwrap_err();
            assert!(err.is_invalid_argument(), "{} accepted", days);
        }
    }

    #[test]
    fn test_generate_empty() {
        assert!(generate(0.0).unwrap().is_empty());
    }

    #[test]
    fn test_generate_week() {
        let samples = generate(7.0).unwrap();
        assert_eq!(samples.len(), 168);
        assert_relative_eq!(samples[0].value, 19.35, epsilon = 1e-12);
        assert_eq!(samples[0].timestamp, default_epoch());
    }

    #[test]
    fn test_negative_duration_fails() {
        let result = generate(-1.0);
        assert!(matches!(result, Err(HydroError::InvalidArgument(_))));
    }

    #[test]
    fn test_last_sample_offset() {
        let samples = generate(2.0).unwrap();
        let last = samples.last().unwrap();
        let expected = default_epoch() + Duration::hours(47);
        assert_eq!(last.timestamp, expected);
    }

    #[test]
    fn test_custom_epoch_and_model() {
        let epoch = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).single().unwrap();
        let model = WaterLevelModel::empty().with_component("drift", Cycle::default().with_trend(2.0));
        let generator = SignalGenerator::with_config(
            GeneratorConfig::new()
                .with_reference_epoch(epoch)
                .with_model(model),
        );

        let samples = generator.generate(1.0).unwrap();
        assert_eq!(samples[0].timestamp, epoch);
        // amplitude 1, period 1 day: cos(2*PI*x) + 2x
        let x = day_offset(12);
        assert_relative_eq!(samples[12].value, (2.0 * std::f64::consts::PI * x).cos() + 2.0 * x);
    }

    #[test]
    fn test_iterator_matches_vec() {
        let generator = SignalGenerator::new();
        let request = GenerationRequest::new(3.3);
        let iter = generator.samples(request).unwrap();
        assert_eq!(iter.len(), 80);
        let collected: Vec<_> = iter.collect();
        assert_eq!(collected, generator.run(request).unwrap());
    }

    #[test]
    fn test_out_of_range_duration_fails() {
        let result = generate(1e15);
        assert!(matches!(result, Err(HydroError::InvalidArgument(_))));
    }
}
