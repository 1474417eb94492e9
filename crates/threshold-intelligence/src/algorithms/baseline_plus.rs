// ABOUTME: Adaptive baseline-plus-delta detector for the first lactate threshold (LT1)
// ABOUTME: Reports the last stage before lactate stays above baseline plus a profile-specific delta
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Baseline-Plus Threshold Detection
//!
//! LT1 is taken as the last stage before lactate rises, and stays, above
//! `baseline + delta`. The delta depends on the curve profile: a fixed +1.0
//! mmol/L misses the subtle rise of an elite-flat curve, while +0.3 fires on
//! noise for a recreational athlete.
//!
//! | Profile | Delta (mmol/L) |
//! |---------|----------------|
//! | `ELITE_FLAT` | 0.3 |
//! | `STANDARD` | 0.5 |
//! | `RECREATIONAL` | 1.0 |
//!
//! Two consecutive stages must exceed the target so that a single noisy
//! sample cannot trigger the threshold.

use super::{ThresholdMethod, ThresholdResult};
use crate::config::ThresholdConfig;
use crate::profile_classifier::{AthleteProfile, ProfileType};
use threshold_core::models::{ConfidenceLevel, LactateDataPoint};
use tracing::debug;

/// Baseline-plus-delta LT1 detector
#[derive(Debug, Clone, Copy)]
pub struct BaselinePlusDetector {
    delta_elite_flat: f64,
    delta_standard: f64,
    delta_recreational: f64,
}

impl Default for BaselinePlusDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselinePlusDetector {
    /// Detector using the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Detector using an explicit configuration
    #[must_use]
    pub const fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            delta_elite_flat: config.detection.delta_elite_flat,
            delta_standard: config.detection.delta_standard,
            delta_recreational: config.detection.delta_recreational,
        }
    }

    /// Delta above baseline for a profile (mmol/L)
    #[must_use]
    pub const fn delta_for(&self, profile_type: ProfileType) -> f64 {
        match profile_type {
            ProfileType::EliteFlat => self.delta_elite_flat,
            ProfileType::Standard => self.delta_standard,
            ProfileType::Recreational => self.delta_recreational,
        }
    }

    /// Locate LT1 on a preprocessed series
    ///
    /// Returns `None` only for an empty series. When the target is never
    /// crossed the stage closest to it is returned with LOW confidence and
    /// method `BASELINE_PLUS_ESTIMATED`.
    #[must_use]
    pub fn detect(
        &self,
        points: &[LactateDataPoint],
        profile: &AthleteProfile,
    ) -> Option<ThresholdResult> {
        let target = profile.baseline_avg + self.delta_for(profile.profile_type);

        let crossing = points
            .windows(2)
            .position(|pair| pair[0].lactate > target && pair[1].lactate > target);

        if let Some(index) = crossing {
            let (reported, confidence) = if index == 0 {
                (0, ConfidenceLevel::Medium)
            } else {
                (index - 1, ConfidenceLevel::High)
            };
            debug!(
                target,
                crossing_stage = index,
                confidence = %confidence,
                "baseline-plus crossing located"
            );
            return Some(ThresholdResult::at_point(
                &points[reported],
                ThresholdMethod::BaselinePlus,
                confidence,
                profile.profile_type,
            ));
        }

        let closest = points
            .iter()
            .min_by(|a, b| (a.lactate - target).abs().total_cmp(&(b.lactate - target).abs()))?;
        debug!(target, "baseline-plus target never crossed, using closest stage");
        Some(ThresholdResult::at_point(
            closest,
            ThresholdMethod::BaselinePlusEstimated,
            ConfidenceLevel::Low,
            profile.profile_type,
        ))
    }
}
