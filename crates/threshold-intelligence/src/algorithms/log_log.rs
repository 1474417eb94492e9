// ABOUTME: Segmented log-log regression detector for the first lactate threshold (LT1)
// ABOUTME: Finds the two-segment fit with least total error and reports the pre-break stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Log-Log Threshold Detection
//!
//! Plotted as `ln(lactate)` against `ln(intensity)`, a lactate curve is close
//! to two straight lines: a shallow segment while production and clearance are
//! balanced, and a steep one once lactate starts to accumulate. The detector
//! tries every breakpoint that leaves at least two stages on each side, fits
//! each side by least squares, and keeps the split with the smallest total
//! squared error.
//!
//! The break is only accepted when the second segment is steeper than the
//! first by more than `min_slope_gain`. The default (0.0) accepts any
//! increase; the value is a tunable heuristic, not a clinical threshold.
//!
//! Reference: Beaver, W.L., Wasserman, K., & Whipp, B.J. (1985). "Improved
//! detection of lactate threshold during exercise using a log-log
//! transformation." *J Appl Physiol*, 59(6), 1936-1940.

use super::regression::LinearFit;
use super::{ThresholdMethod, ThresholdResult};
use crate::config::ThresholdConfig;
use crate::profile_classifier::ProfileType;
use serde::{Deserialize, Serialize};
use threshold_core::constants::detection::LOG_LOG_MIN_SEGMENT;
use threshold_core::models::{ConfidenceLevel, LactateDataPoint};
use tracing::debug;

/// Best two-segment split of a log-log curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogLogBreakpoint {
    /// Index (into the valid points) of the first stage of segment two
    pub split_index: usize,
    /// Slope of the first segment
    pub slope_before: f64,
    /// Slope of the second segment
    pub slope_after: f64,
    /// Combined squared error of both fits
    pub total_sse: f64,
}

impl LogLogBreakpoint {
    /// Ratio of the two slopes; unbounded when the first slope is not positive
    #[must_use]
    pub fn slope_ratio(&self) -> f64 {
        if self.slope_before <= 0.0 {
            f64::INFINITY
        } else {
            self.slope_after / self.slope_before
        }
    }
}

/// Segmented log-log LT1 detector
#[derive(Debug, Clone, Copy)]
pub struct LogLogDetector {
    min_points: usize,
    min_slope_gain: f64,
    high_ratio: f64,
    medium_ratio: f64,
}

impl Default for LogLogDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LogLogDetector {
    /// Detector using the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Detector using an explicit configuration
    #[must_use]
    pub const fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            min_points: config.detection.log_log_min_points,
            min_slope_gain: config.detection.log_log_min_slope_gain,
            high_ratio: config.detection.log_log_high_ratio,
            medium_ratio: config.detection.log_log_medium_ratio,
        }
    }

    /// Find the best split of the valid points, if there are enough of them
    #[must_use]
    pub fn best_breakpoint(&self, valid: &[LactateDataPoint]) -> Option<LogLogBreakpoint> {
        if valid.len() < self.min_points.max(2 * LOG_LOG_MIN_SEGMENT) {
            return None;
        }

        let transformed: Vec<(f64, f64)> = valid
            .iter()
            .map(|p| (p.intensity.ln(), p.lactate.ln()))
            .collect();

        (LOG_LOG_MIN_SEGMENT..=transformed.len() - LOG_LOG_MIN_SEGMENT)
            .filter_map(|split| {
                let before = LinearFit::fit(&transformed[..split])?;
                let after = LinearFit::fit(&transformed[split..])?;
                Some(LogLogBreakpoint {
                    split_index: split,
                    slope_before: before.slope,
                    slope_after: after.slope,
                    total_sse: before.sse + after.sse,
                })
            })
            .min_by(|a, b| a.total_sse.total_cmp(&b.total_sse))
    }

    /// Locate LT1
    ///
    /// Stages with non-positive intensity or lactate are ignored. Returns
    /// `None` when fewer than the minimum number of valid stages remain or
    /// when the best split does not steepen.
    #[must_use]
    pub fn detect(
        &self,
        points: &[LactateDataPoint],
        profile_type: ProfileType,
    ) -> Option<ThresholdResult> {
        let valid: Vec<LactateDataPoint> = points
            .iter()
            .filter(|p| p.intensity > 0.0 && p.lactate > 0.0)
            .copied()
            .collect();

        let breakpoint = self.best_breakpoint(&valid)?;
        let gain = breakpoint.slope_after - breakpoint.slope_before;
        if gain <= self.min_slope_gain {
            debug!(
                slope_before = breakpoint.slope_before,
                slope_after = breakpoint.slope_after,
                "log-log break rejected: curve does not steepen"
            );
            return None;
        }

        let ratio = breakpoint.slope_ratio();
        let confidence = if ratio > self.high_ratio {
            ConfidenceLevel::High
        } else if ratio > self.medium_ratio {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };

        let threshold = valid[breakpoint.split_index - 1];
        debug!(
            intensity = threshold.intensity,
            slope_ratio = ratio,
            confidence = %confidence,
            "log-log break located"
        );

        Some(ThresholdResult::at_point(
            &threshold,
            ThresholdMethod::LogLog,
            confidence,
            profile_type,
        ))
    }
}
