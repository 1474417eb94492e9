// ABOUTME: Main library entry point for the lactate threshold and training pace engine
// ABOUTME: Re-exports the core models and intelligence components and provides logging setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Threshold Engine
//!
//! Estimates an athlete's lactate thresholds and training paces from
//! whatever evidence is available: a lab lactate test, a recent race, a
//! coach's input, old training zones, or only a target time.
//!
//! ## Architecture
//!
//! - **`threshold_core`**: errors, constants, and data models
//! - **`threshold_intelligence`**: detection ensemble, VDOT model, pace
//!   selection, athlete classification, and target-time estimation
//! - **logging**: `tracing-subscriber` setup for the binaries
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use threshold_engine::intelligence::{PaceSelectionInput, PaceSelector};
//! use threshold_engine::models::RacePerformance;
//!
//! let input = PaceSelectionInput {
//!     race: Some(RacePerformance::from_minutes(21_097.5, 88.0)),
//!     ..PaceSelectionInput::default()
//! };
//! let result = PaceSelector::new().select(&input);
//! println!("marathon pace {}", result.marathon_pace.display);
//! ```

/// Structured logging setup
pub mod logging;

pub use threshold_core::{constants, errors, models};

/// Detection, pace selection, and estimation components
pub mod intelligence {
    pub use threshold_intelligence::*;
}
