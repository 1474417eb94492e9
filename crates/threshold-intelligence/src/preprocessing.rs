// ABOUTME: Lactate curve preprocessing applied before profile classification and detection
// ABOUTME: Startle filter replaces an anxiety-elevated first reading with the second stage value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::ThresholdConfig;
use threshold_core::constants::profiling::STARTLE_MIN_POINTS;
use threshold_core::models::LactateDataPoint;
use tracing::debug;

/// Cleaned lactate series plus a record of what was changed
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedCurve {
    /// Series of the same length as the input
    pub points: Vec<LactateDataPoint>,
    /// Whether the first reading was replaced
    pub startle_corrected: bool,
}

/// Lactate curve cleaner
#[derive(Debug, Clone, Copy)]
pub struct CurvePreprocessor {
    startle_tolerance_mmol: f64,
}

impl Default for CurvePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CurvePreprocessor {
    /// Preprocessor using the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Preprocessor using an explicit configuration
    #[must_use]
    pub const fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            startle_tolerance_mmol: config.preprocessing.startle_tolerance_mmol,
        }
    }

    /// Apply the startle filter
    ///
    /// Athletes often arrive at the first stage with lactate elevated by
    /// pre-test nerves; it then drops at stage 2 before the real rise. When
    /// point 0 exceeds point 1 by more than the tolerance, point 0 takes point
    /// 1's lactate and keeps its own intensity and heart rate. Series shorter
    /// than three points are returned unchanged. Applying the filter twice is
    /// the same as applying it once.
    #[must_use]
    pub fn apply(&self, points: &[LactateDataPoint]) -> PreprocessedCurve {
        let mut cleaned = points.to_vec();
        let mut startle_corrected = false;

        if cleaned.len() >= STARTLE_MIN_POINTS {
            let (first, second) = (cleaned[0].lactate, cleaned[1].lactate);
            if first - second > self.startle_tolerance_mmol {
                debug!(
                    first_lactate = first,
                    second_lactate = second,
                    "startle filter replaced first reading"
                );
                cleaned[0].lactate = second;
                startle_corrected = true;
            }
        }

        PreprocessedCurve {
            points: cleaned,
            startle_corrected,
        }
    }
}
