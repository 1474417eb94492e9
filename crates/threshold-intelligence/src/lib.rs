// ABOUTME: Lactate threshold detection, VDOT modelling, pace selection, and target-time estimation
// ABOUTME: Pure synchronous engine over threshold-core models, configured through ThresholdConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Threshold Intelligence
//!
//! Every component is a small value type built from [`config::ThresholdConfig`]
//! with `new()` (global configuration) and `with_config()` (explicit
//! configuration). Nothing here performs I/O.
//!
//! ## Modules
//!
//! - **preprocessing**: startle filter for the first lactate reading
//! - **`profile_classifier`**: elite-flat, standard, and recreational curves
//! - **algorithms**: log-log and baseline-plus detectors, VDOT model
//! - **ensemble**: profile-aware LT1 reconciliation and LT2 slot
//! - **`pace_selection`**: priority chain from lab test to hard default
//! - **`athlete_classification`**: performance tier and metabolic type
//! - **`target_time`**: estimates without lab data, goal realism checks

/// Engine configuration with environment overrides
pub mod config;

/// Curve preprocessing
pub mod preprocessing;

/// Curve profile classification
pub mod profile_classifier;

/// Threshold detectors and the VDOT model
pub mod algorithms;

/// Threshold detection ensemble
pub mod ensemble;

/// Priority-based pace selection
pub mod pace_selection;

/// Performance tier and metabolic type
pub mod athlete_classification;

/// Target-time and improvement-goal estimation
pub mod target_time;

pub use algorithms::{ThresholdMethod, ThresholdResult, VdotCalculator, VdotResult};
pub use config::{ConfigError, ThresholdConfig};
pub use ensemble::{EnsembleResult, ThresholdEnsemble};
pub use pace_selection::{PaceSelectionInput, PaceSelectionResult, PaceSelector, PaceSourceKind};
pub use profile_classifier::{AthleteProfile, ProfileType};
pub use target_time::{ImprovementOutcome, TargetTimeEstimator, ThresholdEstimate};
