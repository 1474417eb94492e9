// ABOUTME: Unified error type for threshold detection, VDOT, and pace selection
// ABOUTME: Defines ErrorCode, AppError with constructor helpers, and the AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Hard errors are reserved for configurations the engine cannot compute at
//! all (empty series, unsupported race distance, VDOT outside its domain).
//! Everything else is reported as a degraded-confidence result with warnings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input failed basic validation (non-positive time, unordered stages)
    InvalidInput,
    /// Not enough data points for the requested computation
    InsufficientData,
    /// Race distance has no entry in the lookup tables
    UnsupportedDistance,
    /// Computed or supplied value is outside its physiological domain
    ValueOutOfRange,
    /// Configuration failed validation
    ConfigInvalid,
    /// Unexpected numerical failure
    InternalError,
}

impl ErrorCode {
    /// Short human-readable description of the error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid input",
            Self::InsufficientData => "Insufficient data",
            Self::UnsupportedDistance => "Unsupported race distance",
            Self::ValueOutOfRange => "Value out of range",
            Self::ConfigInvalid => "Invalid configuration",
            Self::InternalError => "Internal calculation error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unified error type for the engine
#[derive(Debug, Error, Serialize, Deserialize)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured details for the caller (offending values, limits)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Not enough data points
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::new(
            ErrorCode::InsufficientData,
            format!("need at least {required} data points, got {actual}"),
        )
    }

    /// Race distance not covered by the lookup tables
    pub fn unsupported_distance(distance_meters: f64) -> Self {
        Self::new(
            ErrorCode::UnsupportedDistance,
            format!("{distance_meters:.1} m is not one of 5K, 10K, half marathon, marathon"),
        )
    }

    /// Value outside its valid domain
    pub fn value_out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Invalid configuration
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal numerical failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_description() {
        let error = AppError::insufficient_data(5, 3);
        assert_eq!(
            error.to_string(),
            "Insufficient data: need at least 5 data points, got 3"
        );
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::UnsupportedDistance).unwrap();
        assert_eq!(json, "\"UNSUPPORTED_DISTANCE\"");
    }

    #[test]
    fn test_details_skipped_when_null() {
        let json = serde_json::to_value(AppError::internal("boom")).unwrap();
        assert!(json.get("details").is_none());
    }
}
