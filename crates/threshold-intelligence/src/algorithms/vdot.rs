// ABOUTME: VDOT race-performance model using Jack Daniels' oxygen cost and percent-max tables
// ABOUTME: Race result to VDOT, training paces, equivalent race times, age/gender correction, recency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use threshold_core::constants::units::{METERS_PER_KM, MINUTES_PER_HOUR, SECONDS_PER_HOUR};
use threshold_core::constants::vdot::{
    AGE_DECLINE_PER_YEAR, AGE_DECLINE_START, DANIELS_A, DANIELS_B, DANIELS_C, EASY_HIGH, EASY_LOW,
    FEMALE_BONUS_LONG, FEMALE_BONUS_SHORT, HIGH_MAX_AGE_DAYS, INTERVAL, MARATHON, MAX_VDOT,
    MEDIUM_MAX_AGE_DAYS, MIN_VDOT, REPETITION, THRESHOLD, VERY_HIGH_MAX_AGE_DAYS,
};
use threshold_core::errors::{AppError, AppResult};
use threshold_core::models::{
    format_pace_kmh, format_time, ConfidenceLevel, Gender, RaceDistance, RacePerformance,
};
use tracing::debug;

/// Fraction of `VO2max` sustainable for a race of a given duration
///
/// Upper bound of the race duration in minutes, paired with the fraction.
/// Durations above the last bound use `PERCENT_MAX_FLOOR`.
const PERCENT_MAX_TABLE: [(f64, f64); 7] = [
    (2.5, 1.00),
    (6.0, 0.998),
    (12.0, 0.99),
    (30.0, 0.96),
    (60.0, 0.93),
    (120.0, 0.89),
    (180.0, 0.86),
];

const PERCENT_MAX_FLOOR: f64 = 0.85;

/// A training pace at a fixed fraction of VDOT velocity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPace {
    /// Speed in km/h
    pub kmh: f64,
    /// Pace as `m:ss` per km
    pub display: String,
}

impl TrainingPace {
    /// Training pace at `kmh`
    #[must_use]
    pub fn at(kmh: f64) -> Self {
        Self {
            kmh,
            display: format_pace_kmh(kmh),
        }
    }
}

/// Easy running band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EasyPaceRange {
    /// Slow end (59% of VDOT velocity)
    pub slow: TrainingPace,
    /// Fast end (74% of VDOT velocity)
    pub fast: TrainingPace,
}

/// Daniels' five training intensities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPaces {
    /// Easy and long runs
    pub easy: EasyPaceRange,
    /// Marathon pace
    pub marathon: TrainingPace,
    /// Threshold (tempo) pace
    pub threshold: TrainingPace,
    /// Interval pace
    pub interval: TrainingPace,
    /// Repetition pace
    pub repetition: TrainingPace,
}

/// Predicted finishing time at a standard distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalentTime {
    /// Race distance
    pub distance: RaceDistance,
    /// Predicted time in seconds
    pub time_seconds: f64,
    /// Predicted time as `h:mm:ss` or `m:ss`
    pub display: String,
}

impl EquivalentTime {
    /// Average race speed in km/h
    #[must_use]
    pub fn speed_kmh(&self) -> f64 {
        if self.time_seconds <= 0.0 {
            return 0.0;
        }
        self.distance.meters() / METERS_PER_KM / (self.time_seconds / SECONDS_PER_HOUR)
    }
}

/// Corrections applied to the raw VDOT
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VdotAdjustments {
    /// Female economy bonus applied
    pub gender_adjusted: bool,
    /// Age decline correction applied
    pub age_adjusted: bool,
    /// VDOT before corrections, present when any correction applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_vdot: Option<f64>,
}

/// Output of the race-performance model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdotResult {
    /// VDOT, one decimal, within 25-90
    pub vdot: f64,
    /// Training paces at this VDOT
    pub training_paces: TrainingPaces,
    /// Predicted times for 5K, 10K, half marathon, and marathon
    pub equivalent_times: Vec<EquivalentTime>,
    /// Confidence from the age of the race result
    pub confidence: ConfidenceLevel,
    /// Days between the race and the evaluation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_in_days: Option<i64>,
    /// Corrections applied
    pub adjustments: VdotAdjustments,
}

impl VdotResult {
    /// Predicted time for a standard distance
    #[must_use]
    pub fn equivalent(&self, distance: RaceDistance) -> Option<&EquivalentTime> {
        self.equivalent_times.iter().find(|t| t.distance == distance)
    }
}

/// Jack Daniels' VDOT model
///
/// # Scientific References
///
/// - Daniels, J. (2013). "Daniels' Running Formula" (3rd ed.). Human Kinetics.
/// - Daniels, J. & Gilbert, J. (1979). "Oxygen Power: Performance Tables for Distance Runners."
#[derive(Debug, Clone, Copy, Default)]
pub struct VdotCalculator;

impl VdotCalculator {
    /// Create a calculator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Oxygen cost of running at `velocity` m/min (ml/kg/min)
    #[must_use]
    pub fn calculate_vo2(velocity: f64) -> f64 {
        // VO2 = -4.60 + 0.182258*v + 0.000104*v^2
        (DANIELS_A * velocity).mul_add(velocity, DANIELS_B.mul_add(velocity, DANIELS_C))
    }

    /// Velocity (m/min) whose oxygen cost is `vo2`
    ///
    /// Positive root of `a*v^2 + b*v + c = 0` with `c = -4.60 - vo2`.
    #[must_use]
    pub fn velocity_at_vo2(vo2: f64) -> f64 {
        let c = DANIELS_C - vo2;
        let discriminant = DANIELS_B.mul_add(DANIELS_B, -(4.0 * DANIELS_A * c));
        (-DANIELS_B + discriminant.max(0.0).sqrt()) / (2.0 * DANIELS_A)
    }

    /// Fraction of `VO2max` sustainable for a race lasting `time_minutes`
    #[must_use]
    pub fn percent_max(time_minutes: f64) -> f64 {
        PERCENT_MAX_TABLE
            .iter()
            .find(|(limit, _)| time_minutes <= *limit)
            .map_or(PERCENT_MAX_FLOOR, |(_, percent)| *percent)
    }

    /// Unadjusted VDOT for a distance and time, rounded to one decimal
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for non-positive or non-finite distance
    /// or time, and `AppError::InternalError` when the inputs overflow the
    /// oxygen-cost model.
    pub fn raw_vdot(distance_meters: f64, time_minutes: f64) -> AppResult<f64> {
        if distance_meters <= 0.0 || !distance_meters.is_finite() {
            return Err(AppError::invalid_input("distance must be positive"));
        }
        if time_minutes <= 0.0 || !time_minutes.is_finite() {
            return Err(AppError::invalid_input("time must be positive"));
        }

        let velocity = distance_meters / time_minutes;
        let vdot = Self::calculate_vo2(velocity) / Self::percent_max(time_minutes);
        if !vdot.is_finite() {
            return Err(AppError::internal(format!(
                "VDOT overflowed for {distance_meters} m in {time_minutes} min"
            )));
        }
        Ok(round_one_decimal(vdot))
    }

    /// Predicted time in minutes for `distance_meters` at `vdot`
    ///
    /// Starts from a guess at 100% of `VO2max`, looks up the sustainable
    /// fraction for that duration, and refines once with the fraction for the
    /// resulting time.
    #[must_use]
    pub fn equivalent_time_minutes(vdot: f64, distance_meters: f64) -> f64 {
        let guess = distance_meters / Self::velocity_at_vo2(vdot);
        let first = distance_meters / Self::velocity_at_vo2(vdot * Self::percent_max(guess));
        distance_meters / Self::velocity_at_vo2(vdot * Self::percent_max(first))
    }

    /// Speed at 100% of VDOT in km/h
    #[must_use]
    pub fn vdot_velocity_kmh(vdot: f64) -> f64 {
        Self::velocity_at_vo2(vdot) * MINUTES_PER_HOUR / METERS_PER_KM
    }

    /// Daniels training paces for a VDOT
    #[must_use]
    pub fn training_paces(vdot: f64) -> TrainingPaces {
        let v_kmh = Self::vdot_velocity_kmh(vdot);
        TrainingPaces {
            easy: EasyPaceRange {
                slow: TrainingPace::at(v_kmh * EASY_LOW),
                fast: TrainingPace::at(v_kmh * EASY_HIGH),
            },
            marathon: TrainingPace::at(v_kmh * MARATHON),
            threshold: TrainingPace::at(v_kmh * THRESHOLD),
            interval: TrainingPace::at(v_kmh * INTERVAL),
            repetition: TrainingPace::at(v_kmh * REPETITION),
        }
    }

    /// Equivalent times for every standard distance
    #[must_use]
    pub fn equivalent_times(vdot: f64) -> Vec<EquivalentTime> {
        RaceDistance::ALL
            .into_iter()
            .map(|distance| {
                let time_seconds = Self::equivalent_time_minutes(vdot, distance.meters()) * 60.0;
                EquivalentTime {
                    distance,
                    time_seconds,
                    display: format_time(time_seconds),
                }
            })
            .collect()
    }

    /// Confidence from the number of days since the race
    #[must_use]
    pub const fn confidence_for_age(age_in_days: Option<i64>) -> ConfidenceLevel {
        match age_in_days {
            None => ConfidenceLevel::Medium,
            Some(days) if days <= VERY_HIGH_MAX_AGE_DAYS => ConfidenceLevel::VeryHigh,
            Some(days) if days <= HIGH_MAX_AGE_DAYS => ConfidenceLevel::High,
            Some(days) if days <= MEDIUM_MAX_AGE_DAYS => ConfidenceLevel::Medium,
            Some(_) => ConfidenceLevel::Low,
        }
    }

    /// Female economy bonus for a race distance
    ///
    /// Scales linearly from 1.5% at 5K and below to 3% at the marathon and above.
    #[must_use]
    pub fn female_bonus(distance_meters: f64) -> f64 {
        let short = RaceDistance::FiveK.meters();
        let long = RaceDistance::Marathon.meters();
        let position = ((distance_meters - short) / (long - short)).clamp(0.0, 1.0);
        (FEMALE_BONUS_LONG - FEMALE_BONUS_SHORT).mul_add(position, FEMALE_BONUS_SHORT)
    }

    /// Full race analysis
    ///
    /// Age and gender are read from the race record. The race age in days is
    /// measured against `as_of`; without it (or without a race date) the
    /// confidence is MEDIUM.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a missing or non-positive time or
    /// distance, and `AppError::ValueOutOfRange` when the resulting VDOT falls
    /// outside 25-90.
    pub fn calculate(
        &self,
        race: &RacePerformance,
        as_of: Option<NaiveDate>,
    ) -> AppResult<VdotResult> {
        let time_minutes = race.duration_minutes()?;
        let raw = Self::raw_vdot(race.distance_meters, time_minutes)?;

        let mut vdot = raw;
        let mut adjustments = VdotAdjustments::default();

        if let Some(age) = race.age.filter(|age| *age > AGE_DECLINE_START) {
            vdot *= f64::from(age - AGE_DECLINE_START).mul_add(-AGE_DECLINE_PER_YEAR, 1.0);
            adjustments.age_adjusted = true;
        }
        if race.gender == Some(Gender::Female) {
            vdot *= 1.0 + Self::female_bonus(race.distance_meters);
            adjustments.gender_adjusted = true;
        }
        if adjustments.age_adjusted || adjustments.gender_adjusted {
            adjustments.original_vdot = Some(raw);
            vdot = round_one_decimal(vdot);
        }

        if !(MIN_VDOT..=MAX_VDOT).contains(&vdot) {
            return Err(AppError::value_out_of_range(format!(
                "VDOT {vdot:.1} is outside the supported range ({MIN_VDOT}-{MAX_VDOT})"
            ))
            .with_details(serde_json::json!({
                "vdot": vdot,
                "min": MIN_VDOT,
                "max": MAX_VDOT,
            })));
        }

        let age_in_days = race.age_in_days(as_of);
        let confidence = Self::confidence_for_age(age_in_days);
        debug!(vdot, raw_vdot = raw, confidence = %confidence, "VDOT calculated");

        Ok(VdotResult {
            vdot,
            training_paces: Self::training_paces(vdot),
            equivalent_times: Self::equivalent_times(vdot),
            confidence,
            age_in_days,
            adjustments,
        })
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
