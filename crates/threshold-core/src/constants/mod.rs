// ABOUTME: Physiological and algorithmic constants grouped by domain
// ABOUTME: Race distances, lactate conventions, detector deltas, VDOT coefficients, zone percentages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults for every tunable in the engine live here. Runtime overrides go
//! through `ThresholdConfig` in the intelligence crate, which is seeded from
//! these values.

/// Standard race distances in meters
pub mod race_distances {
    /// 5 kilometers
    pub const DISTANCE_5K: f64 = 5_000.0;
    /// 10 kilometers
    pub const DISTANCE_10K: f64 = 10_000.0;
    /// Half marathon
    pub const DISTANCE_HALF_MARATHON: f64 = 21_097.5;
    /// Marathon
    pub const DISTANCE_MARATHON: f64 = 42_195.0;
    /// Tolerance when matching a measured distance to a standard race (fraction)
    pub const DISTANCE_MATCH_TOLERANCE: f64 = 0.02;
}

/// Blood lactate conventions (mmol/L)
///
/// References:
/// - Heck, H. et al. (1985). "Justification of the 4-mmol/l lactate threshold." *Int J Sports Med*, 6(3), 117-130.
/// - Faude, O., Kindermann, W., & Meyer, T. (2009). "Lactate threshold concepts." *Sports Medicine*, 39(6), 469-490.
pub mod lactate {
    /// Onset of Blood Lactate Accumulation
    pub const OBLA_MMOL: f64 = 4.0;
    /// Values within this distance of OBLA are treated as a default-OBLA artifact
    pub const OBLA_ARTIFACT_TOLERANCE: f64 = 0.2;
    /// Lowest LT2 lactate a genuine curve-derived threshold produces
    pub const PLAUSIBLE_LT2_MIN: f64 = 1.5;
    /// Highest LT2 lactate a genuine curve-derived threshold produces
    pub const PLAUSIBLE_LT2_MAX: f64 = 8.0;
    /// Upper bound of the Norwegian green zone
    pub const NORWEGIAN_GREEN_MAX: f64 = 2.0;
    /// Upper bound of the Norwegian threshold zone
    pub const NORWEGIAN_THRESHOLD_MAX: f64 = 4.0;
}

/// Curve preprocessing and profile classification
pub mod profiling {
    /// Drop in lactate between stage 1 and 2 that marks an anxiety-elevated first reading
    pub const STARTLE_TOLERANCE_MMOL: f64 = 0.2;
    /// Minimum points before the startle filter applies
    pub const STARTLE_MIN_POINTS: usize = 3;
    /// Minimum points for profile classification
    pub const CLASSIFIER_MIN_POINTS: usize = 4;
    /// Fraction of the test (by index) used as the baseline window
    pub const BASELINE_WINDOW_FRACTION: f64 = 0.4;
    /// Baseline lactate ceiling for an elite-flat curve
    pub const ELITE_FLAT_MAX_BASELINE: f64 = 1.5;
    /// Baseline slope ceiling for an elite-flat curve
    pub const ELITE_FLAT_MAX_SLOPE: f64 = 0.05;
    /// Baseline lactate ceiling for a standard curve
    pub const STANDARD_MAX_BASELINE: f64 = 2.5;
    /// Baseline slope ceiling for a standard curve
    pub const STANDARD_MAX_SLOPE: f64 = 0.15;
}

/// Threshold detector parameters
pub mod detection {
    /// Minimum valid points for the segmented log-log fit
    pub const LOG_LOG_MIN_POINTS: usize = 5;
    /// Minimum points on each side of a log-log breakpoint
    pub const LOG_LOG_MIN_SEGMENT: usize = 2;
    /// Required increase of segment-2 slope over segment-1 slope
    pub const LOG_LOG_MIN_SLOPE_GAIN: f64 = 0.0;
    /// Slope ratio above which a log-log break is HIGH confidence
    pub const LOG_LOG_HIGH_RATIO: f64 = 2.0;
    /// Slope ratio above which a log-log break is MEDIUM confidence
    pub const LOG_LOG_MEDIUM_RATIO: f64 = 1.3;
    /// Baseline-plus delta for elite-flat curves (mmol/L)
    pub const DELTA_ELITE_FLAT: f64 = 0.3;
    /// Baseline-plus delta for standard curves (mmol/L)
    pub const DELTA_STANDARD: f64 = 0.5;
    /// Baseline-plus delta for recreational curves (mmol/L)
    pub const DELTA_RECREATIONAL: f64 = 1.0;
    /// Maximum intensity gap for log-log and baseline-plus to count as agreeing
    pub const AGREEMENT_TOLERANCE: f64 = 1.5;
}

/// Jack Daniels' oxygen cost model
///
/// Reference: Daniels, J. (2013). "Daniels' Running Formula" (3rd ed.). Human Kinetics.
pub mod vdot {
    /// Coefficient of the velocity-squared term
    pub const DANIELS_A: f64 = 0.000_104;
    /// Coefficient of the velocity term
    pub const DANIELS_B: f64 = 0.182_258;
    /// Constant term
    pub const DANIELS_C: f64 = -4.60;
    /// Lowest VDOT the model accepts
    pub const MIN_VDOT: f64 = 25.0;
    /// Highest VDOT the model accepts
    pub const MAX_VDOT: f64 = 90.0;

    /// Easy pace lower bound (fraction of VDOT velocity)
    pub const EASY_LOW: f64 = 0.59;
    /// Easy pace upper bound
    pub const EASY_HIGH: f64 = 0.74;
    /// Marathon pace
    pub const MARATHON: f64 = 0.84;
    /// Threshold pace
    pub const THRESHOLD: f64 = 0.88;
    /// Interval pace
    pub const INTERVAL: f64 = 1.00;
    /// Repetition pace
    pub const REPETITION: f64 = 1.10;

    /// Age above which the performance-decline correction applies
    pub const AGE_DECLINE_START: u32 = 35;
    /// VDOT decline per year above `AGE_DECLINE_START`
    pub const AGE_DECLINE_PER_YEAR: f64 = 0.005;
    /// Female economy bonus at 5K and below
    pub const FEMALE_BONUS_SHORT: f64 = 0.015;
    /// Female economy bonus at marathon and above
    pub const FEMALE_BONUS_LONG: f64 = 0.03;

    /// Race results at most this old are VERY_HIGH confidence
    pub const VERY_HIGH_MAX_AGE_DAYS: i64 = 30;
    /// Race results at most this old are HIGH confidence
    pub const HIGH_MAX_AGE_DAYS: i64 = 90;
    /// Race results at most this old are MEDIUM confidence
    pub const MEDIUM_MAX_AGE_DAYS: i64 = 180;
}

/// Pace selector parameters
pub mod pace_selection {
    /// Marathon pace as a fraction of LT2 speed
    pub const MARATHON_FROM_LT2: f64 = 0.90;
    /// Heart-rate tolerance when matching a threshold to a test stage (bpm)
    pub const HR_MATCH_TOLERANCE_BPM: u16 = 2;
    /// Slowest plausible marathon pace (km/h)
    pub const MIN_MARATHON_KMH: f64 = 8.0;
    /// Fastest plausible marathon pace (km/h)
    pub const MAX_MARATHON_KMH: f64 = 25.0;
    /// Marathon pace used when no source yields a value (km/h)
    pub const HARD_DEFAULT_MARATHON_KMH: f64 = 12.0;
    /// VDOT-vs-lactate marathon pace mismatch that triggers a warning (percent)
    pub const CONSISTENCY_WARNING_PERCENT: f64 = 10.0;
    /// Fraction of max heart rate used to locate LT2 when no lab threshold exists
    pub const LT2_FRACTION_OF_MAX_HR: f64 = 0.90;
}

/// Target-time estimator parameters
pub mod target_time {
    /// LT1 pace as a multiple of LT2 pace (sec/km)
    pub const LT1_PACE_MULTIPLIER: f64 = 1.11;
    /// PB adjustment for stated race conditions
    pub const RACE_CONDITION_ADJUSTMENT: f64 = 0.02;
    /// Goals above this multiple of the realistic benchmark are rejected
    pub const MAX_BENCHMARK_MULTIPLE: f64 = 1.2;
    /// Starting volume reduction for estimates without measured data
    pub const STARTING_VOLUME_REDUCTION: f64 = 0.15;
    /// Conservative weekly progression
    pub const CONSERVATIVE_WEEKLY_PROGRESSION: f64 = 0.05;
    /// Usual weekly progression band replaced by the conservative rate
    pub const STANDARD_WEEKLY_PROGRESSION_MIN: f64 = 0.08;
    /// Upper end of the usual weekly progression band
    pub const STANDARD_WEEKLY_PROGRESSION_MAX: f64 = 0.10;
    /// Zone band width multiplier for unvalidated thresholds
    pub const ZONE_BAND_NARROWING: f64 = 0.5;
    /// Weeks within which the first field test must happen
    pub const FIELD_TEST_DEADLINE_WEEKS: u32 = 2;
}

/// Unit conversions
pub mod units {
    /// Minutes per hour
    pub const MINUTES_PER_HOUR: f64 = 60.0;
    /// Seconds per hour
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Meters per kilometer
    pub const METERS_PER_KM: f64 = 1_000.0;
}
