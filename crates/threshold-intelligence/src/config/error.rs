// ABOUTME: Configuration error types for threshold engine validation
// ABOUTME: Defines error variants for invalid ranges, parse failures, and inconsistent settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for threshold engine validation.

use threshold_core::errors::AppError;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., a fraction above 1.0)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Failed to parse an environment override
    #[error("Parse error: {0}")]
    Parse(String),

    /// Ordered bounds are out of order (e.g., MEDIUM ratio above HIGH ratio)
    #[error("Inconsistent bounds: {0}")]
    InconsistentBounds(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string())
    }
}
