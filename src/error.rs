// hydrosim - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for hydrosim
//!
//! Generation only ever fails with [`HydroError::InvalidArgument`]; the
//! remaining variants come from [`Series`](crate::Series) export and import.

use thiserror::Error;

/// Result type alias for hydrosim operations
pub type Result<T> = std::result::Result<T, HydroError>;

/// Main error type for hydrosim operations
#[derive(Error, Debug)]
pub enum HydroError {
    /// Caller passed a value outside the accepted domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error while exporting or importing a series
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed row in an imported series
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Imported file held no samples
    #[error("Empty series")]
    Empty,
}

impl HydroError {
    /// Returns true for [`HydroError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, HydroError::InvalidArgument(_))
    }
}
