// ABOUTME: Runtime configuration for detectors, pace selection, and target-time estimation
// ABOUTME: Defaults from threshold-core constants, THRESHOLD_* environment overrides, global instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Threshold engine configuration
//!
//! Every heuristic constant the engine uses is exposed here so that it can be
//! recalibrated without a rebuild. The log-log acceptance gain in particular
//! is an uncalibrated heuristic and is expected to be tuned.

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use threshold_core::constants::{detection, pace_selection, profiling, target_time};

/// Curve preprocessing and profile classification settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Stage-1 lactate excess over stage 2 that triggers the startle filter (mmol/L)
    pub startle_tolerance_mmol: f64,
    /// Fraction of the test used as the baseline window
    pub baseline_window_fraction: f64,
}

/// Detector and reconciliation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum valid points for the log-log fit
    pub log_log_min_points: usize,
    /// Required slope increase across the log-log breakpoint
    pub log_log_min_slope_gain: f64,
    /// Slope ratio for HIGH confidence
    pub log_log_high_ratio: f64,
    /// Slope ratio for MEDIUM confidence
    pub log_log_medium_ratio: f64,
    /// Baseline-plus delta for elite-flat curves (mmol/L)
    pub delta_elite_flat: f64,
    /// Baseline-plus delta for standard curves (mmol/L)
    pub delta_standard: f64,
    /// Baseline-plus delta for recreational curves (mmol/L)
    pub delta_recreational: f64,
    /// Intensity gap under which the two detectors agree
    pub agreement_tolerance: f64,
}

/// Pace selector settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceSelectionConfig {
    /// Marathon pace as a fraction of LT2 speed
    pub marathon_from_lt2: f64,
    /// Heart-rate tolerance for stage matching (bpm)
    pub hr_match_tolerance_bpm: u16,
    /// Slowest accepted race-derived marathon pace (km/h)
    pub min_marathon_kmh: f64,
    /// Fastest accepted race-derived marathon pace (km/h)
    pub max_marathon_kmh: f64,
    /// Fallback marathon pace (km/h)
    pub hard_default_marathon_kmh: f64,
    /// Mismatch between VDOT and lactate marathon paces that raises a warning (%)
    pub consistency_warning_percent: f64,
}

/// Target-time estimator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetTimeConfig {
    /// LT1 pace as a multiple of LT2 pace
    pub lt1_pace_multiplier: f64,
    /// Race-condition correction applied to a PB
    pub race_condition_adjustment: f64,
    /// Requested improvement above this multiple of the benchmark is rejected
    pub max_benchmark_multiple: f64,
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Preprocessing and classification
    pub preprocessing: PreprocessingConfig,
    /// Threshold detectors
    pub detection: DetectionConfig,
    /// Pace selection chain
    pub pace_selection: PaceSelectionConfig,
    /// Target-time estimation
    pub target_time: TargetTimeConfig,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            preprocessing: PreprocessingConfig {
                startle_tolerance_mmol: profiling::STARTLE_TOLERANCE_MMOL,
                baseline_window_fraction: profiling::BASELINE_WINDOW_FRACTION,
            },
            detection: DetectionConfig {
                log_log_min_points: detection::LOG_LOG_MIN_POINTS,
                log_log_min_slope_gain: detection::LOG_LOG_MIN_SLOPE_GAIN,
                log_log_high_ratio: detection::LOG_LOG_HIGH_RATIO,
                log_log_medium_ratio: detection::LOG_LOG_MEDIUM_RATIO,
                delta_elite_flat: detection::DELTA_ELITE_FLAT,
                delta_standard: detection::DELTA_STANDARD,
                delta_recreational: detection::DELTA_RECREATIONAL,
                agreement_tolerance: detection::AGREEMENT_TOLERANCE,
            },
            pace_selection: PaceSelectionConfig {
                marathon_from_lt2: pace_selection::MARATHON_FROM_LT2,
                hr_match_tolerance_bpm: pace_selection::HR_MATCH_TOLERANCE_BPM,
                min_marathon_kmh: pace_selection::MIN_MARATHON_KMH,
                max_marathon_kmh: pace_selection::MAX_MARATHON_KMH,
                hard_default_marathon_kmh: pace_selection::HARD_DEFAULT_MARATHON_KMH,
                consistency_warning_percent: pace_selection::CONSISTENCY_WARNING_PERCENT,
            },
            target_time: TargetTimeConfig {
                lt1_pace_multiplier: target_time::LT1_PACE_MULTIPLIER,
                race_condition_adjustment: target_time::RACE_CONDITION_ADJUSTMENT,
                max_benchmark_multiple: target_time::MAX_BENCHMARK_MULTIPLE,
            },
        }
    }
}

static THRESHOLD_CONFIG: OnceLock<ThresholdConfig> = OnceLock::new();

impl ThresholdConfig {
    /// Get the global configuration instance
    ///
    /// Loaded once from the environment; falls back to defaults (with a
    /// warning) when an override is malformed.
    pub fn global() -> &'static Self {
        THRESHOLD_CONFIG.get_or_init(|| {
            Self::from_env().unwrap_or_else(|e| {
                tracing::warn!("Failed to load threshold config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from `THRESHOLD_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the resulting
    /// configuration fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let pre = &mut config.preprocessing;
        override_from_env(&mut pre.startle_tolerance_mmol, "THRESHOLD_STARTLE_TOLERANCE")?;
        override_from_env(&mut pre.baseline_window_fraction, "THRESHOLD_BASELINE_WINDOW")?;

        let det = &mut config.detection;
        override_from_env(&mut det.log_log_min_points, "THRESHOLD_LOG_LOG_MIN_POINTS")?;
        override_from_env(&mut det.log_log_min_slope_gain, "THRESHOLD_LOG_LOG_MIN_SLOPE_GAIN")?;
        override_from_env(&mut det.log_log_high_ratio, "THRESHOLD_LOG_LOG_HIGH_RATIO")?;
        override_from_env(&mut det.log_log_medium_ratio, "THRESHOLD_LOG_LOG_MEDIUM_RATIO")?;
        override_from_env(&mut det.delta_elite_flat, "THRESHOLD_DELTA_ELITE_FLAT")?;
        override_from_env(&mut det.delta_standard, "THRESHOLD_DELTA_STANDARD")?;
        override_from_env(&mut det.delta_recreational, "THRESHOLD_DELTA_RECREATIONAL")?;
        override_from_env(&mut det.agreement_tolerance, "THRESHOLD_AGREEMENT_TOLERANCE")?;

        let pace = &mut config.pace_selection;
        override_from_env(&mut pace.marathon_from_lt2, "THRESHOLD_MARATHON_FROM_LT2")?;
        override_from_env(&mut pace.hr_match_tolerance_bpm, "THRESHOLD_HR_MATCH_TOLERANCE")?;
        override_from_env(&mut pace.min_marathon_kmh, "THRESHOLD_MIN_MARATHON_KMH")?;
        override_from_env(&mut pace.max_marathon_kmh, "THRESHOLD_MAX_MARATHON_KMH")?;
        override_from_env(
            &mut pace.hard_default_marathon_kmh,
            "THRESHOLD_HARD_DEFAULT_MARATHON_KMH",
        )?;
        override_from_env(
            &mut pace.consistency_warning_percent,
            "THRESHOLD_CONSISTENCY_WARNING_PERCENT",
        )?;

        let target = &mut config.target_time;
        override_from_env(&mut target.lt1_pace_multiplier, "THRESHOLD_LT1_PACE_MULTIPLIER")?;
        override_from_env(
            &mut target.race_condition_adjustment,
            "THRESHOLD_RACE_CONDITION_ADJUSTMENT",
        )?;
        override_from_env(
            &mut target.max_benchmark_multiple,
            "THRESHOLD_MAX_BENCHMARK_MULTIPLE",
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pre = &self.preprocessing;
        if pre.startle_tolerance_mmol < 0.0 {
            return Err(ConfigError::InvalidRange(
                "startle_tolerance_mmol must be >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&pre.baseline_window_fraction) || pre.baseline_window_fraction == 0.0
        {
            return Err(ConfigError::InvalidRange(
                "baseline_window_fraction must be in (0, 1]",
            ));
        }

        let det = &self.detection;
        if det.log_log_min_points < 4 {
            return Err(ConfigError::InvalidRange(
                "log_log_min_points must be >= 4 (two points per segment)",
            ));
        }
        if det.log_log_medium_ratio > det.log_log_high_ratio {
            return Err(ConfigError::InconsistentBounds(
                "log_log_medium_ratio must be <= log_log_high_ratio",
            ));
        }
        if !(det.delta_elite_flat <= det.delta_standard
            && det.delta_standard <= det.delta_recreational)
        {
            return Err(ConfigError::InconsistentBounds(
                "baseline-plus deltas must ascend from elite-flat to recreational",
            ));
        }
        if det.agreement_tolerance < 0.0 {
            return Err(ConfigError::InvalidRange("agreement_tolerance must be >= 0"));
        }

        let pace = &self.pace_selection;
        if !(0.5..=1.0).contains(&pace.marathon_from_lt2) {
            return Err(ConfigError::InvalidRange(
                "marathon_from_lt2 must be within 0.5-1.0",
            ));
        }
        if pace.min_marathon_kmh >= pace.max_marathon_kmh {
            return Err(ConfigError::InconsistentBounds(
                "min_marathon_kmh must be < max_marathon_kmh",
            ));
        }
        if pace.hard_default_marathon_kmh <= 0.0 {
            return Err(ConfigError::InvalidRange(
                "hard_default_marathon_kmh must be positive",
            ));
        }

        let target = &self.target_time;
        if target.lt1_pace_multiplier < 1.0 {
            return Err(ConfigError::InvalidRange(
                "lt1_pace_multiplier must be >= 1.0 (LT1 is slower than LT2)",
            ));
        }
        if target.max_benchmark_multiple < 1.0 {
            return Err(ConfigError::InvalidRange(
                "max_benchmark_multiple must be >= 1.0",
            ));
        }

        Ok(())
    }
}

fn override_from_env<T: FromStr>(field: &mut T, key: &'static str) -> Result<(), ConfigError> {
    if let Ok(val) = env::var(key) {
        *field = val
            .parse()
            .map_err(|_| ConfigError::Parse(format!("Invalid {key}: {val}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ThresholdConfig::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_override_applies() {
        env::set_var("THRESHOLD_AGREEMENT_TOLERANCE", "2.5");
        let config = ThresholdConfig::from_env();
        env::remove_var("THRESHOLD_AGREEMENT_TOLERANCE");

        let config = config.unwrap();
        assert!((config.detection.agreement_tolerance - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    #[serial]
    fn test_env_override_parse_error() {
        env::set_var("THRESHOLD_HR_MATCH_TOLERANCE", "two");
        let result = ThresholdConfig::from_env();
        env::remove_var("THRESHOLD_HR_MATCH_TOLERANCE");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_inverted_ratios_rejected() {
        let mut config = ThresholdConfig::default();
        config.detection.log_log_medium_ratio = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InconsistentBounds(_))
        ));
    }
}
