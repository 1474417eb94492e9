// ABOUTME: Classifies where a recorded LT2 came from (D-max, calculated, manual, default OBLA)
// ABOUTME: Resolves the LT2 speed and lactate of a lab test, with heart-rate matched stage fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use threshold_core::constants::lactate::{
    OBLA_ARTIFACT_TOLERANCE, OBLA_MMOL, PLAUSIBLE_LT2_MAX, PLAUSIBLE_LT2_MIN,
};
use threshold_core::models::{LactateStage, LactateTestRecord};

/// Origin of a recorded LT2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lt2Source {
    /// Maximum-distance method on the measured curve
    Dmax,
    /// Another curve-derived calculation
    Calculated,
    /// Entered by a coach or lab technician
    Manual,
    /// Fixed 4.0 mmol/L convention rather than the athlete's curve
    Default,
}

impl Lt2Source {
    /// Parse a method tag written by the producer of the threshold
    ///
    /// Unknown tags return `None` so the caller can fall back to the lactate
    /// heuristic.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "DMAX" | "D_MAX" | "MOD_DMAX" | "MODIFIED_DMAX" => Some(Self::Dmax),
            "CALCULATED" | "LOG_LOG" | "BASELINE_PLUS" => Some(Self::Calculated),
            "MANUAL" | "COACH" => Some(Self::Manual),
            "DEFAULT" | "OBLA" | "DEFAULT_OBLA" => Some(Self::Default),
            _ => None,
        }
    }

    /// Whether the threshold was derived from the athlete's own curve
    #[must_use]
    pub const fn is_curve_derived(self) -> bool {
        matches!(self, Self::Dmax | Self::Calculated)
    }

    /// Upper-case tag as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dmax => "DMAX",
            Self::Calculated => "CALCULATED",
            Self::Manual => "MANUAL",
            Self::Default => "DEFAULT",
        }
    }
}

impl fmt::Display for Lt2Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lactate at the recorded LT2
///
/// Taken from the threshold calculation when present, otherwise from the
/// stage whose heart rate matches the recorded threshold heart rate.
#[must_use]
pub fn lt2_lactate(record: &LactateTestRecord, hr_tolerance: u16) -> Option<f64> {
    record
        .threshold_calculation
        .as_ref()
        .and_then(|calc| calc.lt2_lactate)
        .or_else(|| {
            let heart_rate = record.anaerobic_threshold?.heart_rate?;
            record
                .stage_at_heart_rate(heart_rate, hr_tolerance)
                .map(|stage| stage.lactate)
        })
}

/// Classify the origin of a lab test's LT2
///
/// An explicit method tag wins. Without one, a lactate within 0.2 of
/// 4.0 mmol/L marks a default-OBLA artifact, a lactate outside 1.5-8.0 mmol/L
/// cannot come from a curve method and is treated as manual, and anything
/// else (including no lactate information) is assumed D-max.
#[must_use]
pub fn classify_lt2_source(record: &LactateTestRecord, hr_tolerance: u16) -> Lt2Source {
    if let Some(source) = record
        .threshold_calculation
        .as_ref()
        .and_then(|calc| calc.method.as_deref())
        .and_then(Lt2Source::from_tag)
    {
        return source;
    }

    match lt2_lactate(record, hr_tolerance) {
        Some(lactate) if (lactate - OBLA_MMOL).abs() <= OBLA_ARTIFACT_TOLERANCE => Lt2Source::Default,
        Some(lactate) if !(PLAUSIBLE_LT2_MIN..=PLAUSIBLE_LT2_MAX).contains(&lactate) => {
            Lt2Source::Manual
        }
        Some(_) | None => Lt2Source::Dmax,
    }
}

/// LT2 speed of a lab test in km/h
///
/// Uses the recorded anaerobic threshold. When its value has no speed
/// equivalent (watts, zero, negative) the stage matching the threshold heart
/// rate is used instead.
#[must_use]
pub fn lab_lt2_speed(record: &LactateTestRecord, hr_tolerance: u16) -> Option<f64> {
    let threshold = record.anaerobic_threshold?;
    let speed = threshold.speed_kmh();
    if speed > 0.0 && speed.is_finite() {
        return Some(speed);
    }

    let heart_rate = threshold.heart_rate?;
    record
        .stage_at_heart_rate(heart_rate, hr_tolerance)
        .and_then(LactateStage::speed_kmh)
        .filter(|kmh| *kmh > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use threshold_core::models::{AnaerobicThreshold, ThresholdCalculation, ThresholdUnit};

    fn record_with(calc: Option<ThresholdCalculation>, threshold_hr: Option<u16>) -> LactateTestRecord {
        LactateTestRecord {
            stages: vec![
                LactateStage::speed(12.0, 150, 2.1),
                LactateStage::speed(13.0, 160, 2.9),
                LactateStage::speed(14.0, 170, 4.0),
                LactateStage::speed(15.0, 180, 6.5),
            ],
            threshold_calculation: calc,
            anaerobic_threshold: Some(AnaerobicThreshold {
                value: 14.0,
                unit: ThresholdUnit::KmH,
                heart_rate: threshold_hr,
            }),
        }
    }

    #[test]
    fn test_explicit_tag_wins() {
        let record = record_with(
            Some(ThresholdCalculation {
                method: Some("d-max".to_owned()),
                lt2_lactate: Some(4.0),
            }),
            None,
        );
        assert_eq!(classify_lt2_source(&record, 2), Lt2Source::Dmax);
    }

    #[test]
    fn test_default_obla_detected_from_matching_stage() {
        let record = record_with(None, Some(171));
        assert_eq!(classify_lt2_source(&record, 2), Lt2Source::Default);
    }

    #[test]
    fn test_implausible_lactate_is_manual() {
        let record = record_with(
            Some(ThresholdCalculation {
                method: None,
                lt2_lactate: Some(9.5),
            }),
            None,
        );
        assert_eq!(classify_lt2_source(&record, 2), Lt2Source::Manual);
    }

    #[test]
    fn test_no_information_assumes_dmax() {
        let record = record_with(None, None);
        assert_eq!(classify_lt2_source(&record, 2), Lt2Source::Dmax);
    }

    #[test]
    fn test_watt_threshold_uses_heart_rate_stage() {
        let mut record = record_with(None, Some(160));
        record.anaerobic_threshold = Some(AnaerobicThreshold {
            value: 300.0,
            unit: ThresholdUnit::Watt,
            heart_rate: Some(161),
        });
        assert_eq!(lab_lt2_speed(&record, 2), Some(13.0));
    }
}
