// hydrosim - Synthetic water level time series
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # hydrosim
//!
//! Deterministic synthetic water level readings for local test harnesses.
//!
//! The generator produces one sample per hour from a fixed reference
//! epoch. Each value is the sum of three cosine cycles (yearly seasonal,
//! ten-day rainfall and daily usage), so the same request always yields
//! bit-identical output.
//!
//! ## Quick Start
//!
//! ```rust
//! use hydrosim::{generate, WaterLevelRecord};
//!
//! // One week of hourly samples
//! let samples = generate(7.0).unwrap();
//! assert_eq!(samples.len(), 168);
//! assert!((samples[0].value - 19.35).abs() < 1e-9);
//!
//! // Shape handed to queue and table writers
//! let json = WaterLevelRecord::from(samples[0]).to_json().unwrap();
//! assert!(json.starts_with(r#"{"waterLevel":"#));
//! ```
//!
//! ## Modules
//!
//! - [`cycle`]: Cosine cycle with linear drift
//! - [`model`]: Superposition of cycles, stock water level components
//! - [`generator`]: Hourly sample generation
//! - [`sample`]: Samples and their serialized record shape
//! - [`series`]: Sample collections with CSV/JSON export
//! - [`error`]: Error types

pub mod cycle;
pub mod error;
pub mod generator;
pub mod model;
pub mod sample;
pub mod series;

// Re-exports for convenience
pub use cycle::{cycle, Cycle};
pub use error::{HydroError, Result};
pub use generator::{
    default_epoch, generate, GenerationRequest, GeneratorConfig, Samples, SignalGenerator,
};
pub use model::{Component, WaterLevelModel};
pub use sample::{Sample, WaterLevelRecord};
pub use series::{Series, SeriesMetadata, SeriesStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
