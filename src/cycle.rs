// hydrosim - Signal cycles
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Cosine cycles with linear drift.
//!
//! A [`Cycle`] models one periodic influence on a signal. Cycles are
//! summed by [`WaterLevelModel`](crate::WaterLevelModel) to build the
//! final value.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Evaluate a single cycle at `x`.
///
/// `value = amplitude * cos(x * 2*PI / period) + trend * x + shift`
///
/// `x` and `period` share the same unit (days in this crate). `period`
/// must be non-zero; this is not checked.
pub fn cycle(x: f64, amplitude: f64, period: f64, trend: f64, shift: f64) -> f64 {
    amplitude * (x * (2.0 * PI / period)).cos() + trend * x + shift
}

/// Parameters of one cosine cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    /// Peak deviation from the shifted baseline.
    pub amplitude: f64,
    /// Length of one full oscillation.
    pub period: f64,
    /// Linear drift added per unit of `x`.
    pub trend: f64,
    /// Vertical offset.
    pub shift: f64,
}

impl Default for Cycle {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            period: 1.0,
            trend: 0.0,
            shift: 0.0,
        }
    }
}

impl Cycle {
    /// Create a cycle with every parameter given.
    pub const fn new(amplitude: f64, period: f64, trend: f64, shift: f64) -> Self {
        Self {
            amplitude,
            period,
            trend,
            shift,
        }
    }

    /// Set amplitude.
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set period.
    pub fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    /// Set linear trend.
    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = trend;
        self
    }

    /// Set vertical shift.
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Evaluate the cycle at `x`.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        cycle(x, self.amplitude, self.period, self.trend, self.shift)
    }
}
