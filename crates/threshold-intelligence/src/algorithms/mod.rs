// ABOUTME: Threshold detectors, regression helpers, and the VDOT race-performance model
// ABOUTME: Shared ThresholdResult and ThresholdMethod types used by every detector and the ensemble
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Algorithm Module
//!
//! Each detector is a small value type built from `ThresholdConfig` and
//! exposing a single `detect` method. Detectors never fail on a valid series:
//! when they cannot find a threshold they return `None` and the ensemble
//! decides what to do.
//!
//! # Example
//!
//! ```rust,no_run
//! use threshold_core::models::LactateDataPoint;
//! use threshold_intelligence::algorithms::LogLogDetector;
//! use threshold_intelligence::profile_classifier::ProfileType;
//!
//! let points = vec![
//!     LactateDataPoint::new(10.0, 1.2, 140),
//!     LactateDataPoint::new(11.0, 1.4, 148),
//!     LactateDataPoint::new(12.0, 1.7, 156),
//!     LactateDataPoint::new(13.0, 2.6, 165),
//!     LactateDataPoint::new(14.0, 4.1, 174),
//!     LactateDataPoint::new(15.0, 6.5, 182),
//! ];
//! let detector = LogLogDetector::new();
//! let lt1 = detector.detect(&points, ProfileType::Standard);
//! ```

pub mod baseline_plus;
pub mod log_log;
pub mod regression;
pub mod vdot;

pub use baseline_plus::BaselinePlusDetector;
pub use log_log::LogLogDetector;
pub use regression::LinearFit;
pub use vdot::{VdotCalculator, VdotResult};

use crate::profile_classifier::ProfileType;
use serde::{Deserialize, Serialize};
use std::fmt;
use threshold_core::models::{ConfidenceLevel, LactateDataPoint};

/// Method that produced a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdMethod {
    /// Segmented regression on the log-log transformed curve
    LogLog,
    /// First sustained rise above baseline plus a profile-specific delta
    BaselinePlus,
    /// Baseline-plus target never crossed; closest point used instead
    BaselinePlusEstimated,
    /// Maximum distance from the chord of the curve (external collaborator)
    Dmax,
    /// Fixed 4.0 mmol/L onset of blood lactate accumulation
    Obla,
}

impl ThresholdMethod {
    /// Upper-case tag as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LogLog => "LOG_LOG",
            Self::BaselinePlus => "BASELINE_PLUS",
            Self::BaselinePlusEstimated => "BASELINE_PLUS_ESTIMATED",
            Self::Dmax => "DMAX",
            Self::Obla => "OBLA",
        }
    }
}

impl fmt::Display for ThresholdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A threshold located on a lactate curve
///
/// Confidence is fixed when the result is created. Later stages may lower it
/// through [`ThresholdResult::downgrade`] but never raise it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    /// Intensity at threshold (km/h or W)
    pub intensity: f64,
    /// Lactate at threshold (mmol/L)
    pub lactate: f64,
    /// Heart rate at threshold (bpm)
    pub heart_rate: u16,
    /// Detector that produced the value
    pub method: ThresholdMethod,
    /// Confidence in the value
    pub confidence: ConfidenceLevel,
    /// Profile the detector was parameterized for
    pub profile_type: ProfileType,
}

impl ThresholdResult {
    /// Threshold located at an observed stage
    #[must_use]
    pub const fn at_point(
        point: &LactateDataPoint,
        method: ThresholdMethod,
        confidence: ConfidenceLevel,
        profile_type: ProfileType,
    ) -> Self {
        Self {
            intensity: point.intensity,
            lactate: point.lactate,
            heart_rate: point.heart_rate,
            method,
            confidence,
            profile_type,
        }
    }

    /// Same threshold with confidence capped at `ceiling`
    #[must_use]
    pub fn downgrade(self, ceiling: ConfidenceLevel) -> Self {
        Self {
            confidence: self.confidence.cap(ceiling),
            ..self
        }
    }
}
