// ABOUTME: Lactate curve shape classification (elite-flat, standard, recreational)
// ABOUTME: Computes baseline level and slope from the early stages to parameterize the detectors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Lactate Profile Classification
//!
//! Highly trained endurance athletes clear lactate so efficiently that their
//! curve stays almost flat until close to threshold. Detectors tuned on a
//! textbook curve either miss the break entirely or place it far too early.
//! The classifier looks at the first part of the test (the baseline window)
//! and picks one of three profiles that the detectors use to choose their
//! parameters.
//!
//! ## Rules (applied in order)
//!
//! | Profile | Baseline (mmol/L) | abs(slope) (mmol/L per unit) |
//! |---------|-------------------|------------------------------|
//! | `ELITE_FLAT` | < 1.5 | < 0.05 |
//! | `STANDARD` | < 2.5 | < 0.15 |
//! | `RECREATIONAL` | otherwise | otherwise |

use crate::config::ThresholdConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use threshold_core::constants::profiling::{
    CLASSIFIER_MIN_POINTS, ELITE_FLAT_MAX_BASELINE, ELITE_FLAT_MAX_SLOPE, STANDARD_MAX_BASELINE,
    STANDARD_MAX_SLOPE,
};
use threshold_core::models::LactateDataPoint;
use tracing::debug;

/// Shape of an athlete's lactate curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    /// Low, nearly flat baseline (well-trained endurance athletes)
    EliteFlat,
    /// Textbook curve
    Standard,
    /// High or steep baseline
    Recreational,
}

impl ProfileType {
    /// Apply the classification rules to a baseline level and slope
    #[must_use]
    pub fn classify(baseline_avg: f64, baseline_slope: f64) -> Self {
        let slope = baseline_slope.abs();
        if baseline_avg < ELITE_FLAT_MAX_BASELINE && slope < ELITE_FLAT_MAX_SLOPE {
            Self::EliteFlat
        } else if baseline_avg < STANDARD_MAX_BASELINE && slope < STANDARD_MAX_SLOPE {
            Self::Standard
        } else {
            Self::Recreational
        }
    }

    /// Upper-case tag as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EliteFlat => "ELITE_FLAT",
            Self::Standard => "STANDARD",
            Self::Recreational => "RECREATIONAL",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a lactate curve, derived once per test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Curve shape
    pub profile_type: ProfileType,
    /// Trimmed mean lactate of the baseline window (mmol/L)
    pub baseline_avg: f64,
    /// Lactate change per intensity unit across the baseline window
    pub baseline_slope: f64,
    /// Highest lactate in the series
    pub max_lactate: f64,
    /// Highest minus lowest lactate in the series
    pub lactate_range: f64,
}

/// Baseline level and slope of the early stages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Trimmed mean lactate (mmol/L)
    pub average: f64,
    /// Lactate change per intensity unit
    pub slope: f64,
}

/// Classifies lactate curves by their baseline behaviour
#[derive(Debug, Clone, Copy)]
pub struct ProfileClassifier {
    baseline_window_fraction: f64,
}

impl Default for ProfileClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileClassifier {
    /// Classifier using the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Classifier using an explicit configuration
    #[must_use]
    pub const fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            baseline_window_fraction: config.preprocessing.baseline_window_fraction,
        }
    }

    /// Number of leading points that make up the baseline window
    ///
    /// The configured fraction of the series rounded up, never fewer than two
    /// points and never more than the series.
    #[must_use]
    pub fn baseline_window_len(&self, len: usize) -> usize {
        let window = (len as f64 * self.baseline_window_fraction).ceil() as usize;
        window.max(2).min(len)
    }

    /// Baseline level and slope
    ///
    /// The level is the window mean with its single highest value removed, so
    /// one noisy sample cannot lift the baseline. Series shorter than the
    /// classifier minimum report the first lactate value (0.0 when empty) and
    /// a zero slope.
    #[must_use]
    pub fn baseline(&self, points: &[LactateDataPoint]) -> Baseline {
        if points.len() < CLASSIFIER_MIN_POINTS {
            return Baseline {
                average: points.first().map_or(0.0, |p| p.lactate),
                slope: 0.0,
            };
        }

        let window = &points[..self.baseline_window_len(points.len())];
        let mut lactates: Vec<f64> = window.iter().map(|p| p.lactate).collect();
        lactates.sort_by(f64::total_cmp);
        lactates.pop();
        let average = lactates.iter().sum::<f64>() / lactates.len() as f64;

        let (first, last) = (window[0], window[window.len() - 1]);
        let delta_intensity = last.intensity - first.intensity;
        let slope = if delta_intensity == 0.0 {
            0.0
        } else {
            (last.lactate - first.lactate) / delta_intensity
        };

        Baseline { average, slope }
    }

    /// Classify a (preprocessed) lactate series
    ///
    /// Series shorter than the classifier minimum are reported as `STANDARD`.
    #[must_use]
    pub fn classify(&self, points: &[LactateDataPoint]) -> AthleteProfile {
        let baseline = self.baseline(points);
        let profile_type = if points.len() < CLASSIFIER_MIN_POINTS {
            ProfileType::Standard
        } else {
            ProfileType::classify(baseline.average, baseline.slope)
        };

        let max_lactate = points.iter().map(|p| p.lactate).reduce(f64::max).unwrap_or(0.0);
        let min_lactate = points.iter().map(|p| p.lactate).reduce(f64::min).unwrap_or(0.0);

        debug!(
            profile = %profile_type,
            baseline_avg = baseline.average,
            baseline_slope = baseline.slope,
            "classified lactate profile"
        );

        AthleteProfile {
            profile_type,
            baseline_avg: baseline.average,
            baseline_slope: baseline.slope,
            max_lactate,
            lactate_range: max_lactate - min_lactate,
        }
    }
}
