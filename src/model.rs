// hydrosim - Water level model
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Water level model: a sum of named cycles.
//!
//! The stock model superposes three influences, all with `x` in days:
//!
//! | component  | amplitude | period | trend | shift |
//! |------------|-----------|--------|-------|-------|
//! | `seasonal` | -30       | 365    | 0     | 50    |
//! | `rainfall` | -0.5      | 10     | 0     | 0.5   |
//! | `usage`    | -0.15     | 1      | 0     | -0.5  |

use crate::cycle::Cycle;
use serde::{Deserialize, Serialize};

/// Yearly seasonal cycle.
pub const SEASONAL: Cycle = Cycle::new(-30.0, 365.0, 0.0, 50.0);

/// Multi-day rainfall cycle.
pub const RAINFALL: Cycle = Cycle::new(-0.5, 10.0, 0.0, 0.5);

/// Daily usage cycle.
pub const USAGE: Cycle = Cycle::new(-0.15, 1.0, 0.0, -0.5);

/// A named cycle contributing to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component name (for reports and debugging).
    pub name: String,
    /// Cycle parameters.
    pub cycle: Cycle,
}

impl Component {
    /// Create a new component.
    pub fn new(name: &str, cycle: Cycle) -> Self {
        Self {
            name: name.to_string(),
            cycle,
        }
    }
}

/// Superposition of cycles. Components are summed in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterLevelModel {
    /// Ordered components.
    pub components: Vec<Component>,
}

impl Default for WaterLevelModel {
    fn default() -> Self {
        Self::stock()
    }
}

impl WaterLevelModel {
    /// Empty model (always evaluates to zero).
    pub fn empty() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Seasonal + rainfall + usage.
    pub fn stock() -> Self {
        Self::empty()
            .with_component("seasonal", SEASONAL)
            .with_component("rainfall", RAINFALL)
            .with_component("usage", USAGE)
    }

    /// Append a component.
    pub fn with_component(mut self, name: &str, cycle: Cycle) -> Self {
        self.components.push(Component::new(name, cycle));
        self
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Evaluate the model at `x` days.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.components
            .iter()
            .fold(0.0, |acc, c| acc + c.cycle.evaluate(x))
    }

    /// Per-component contributions at `x` days, in model order.
    pub fn breakdown(&self, x: f64) -> Vec<(&str, f64)> {
        self.components
            .iter()
            .map(|c| (c.name.as_str(), c.cycle.evaluate(x)))
            .collect()
    }
}
