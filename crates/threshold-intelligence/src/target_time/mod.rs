// ABOUTME: Threshold estimates for athletes without lab data, from a target time or a PB plus goal
// ABOUTME: Race-to-threshold factor tables, goal realism checks, and field-test validation protocols
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Target-Time Estimation
//!
//! Two entry points:
//!
//! - [`TargetTimeEstimator::estimate_from_target_time`]: no history at all.
//!   LT2 is back-solved from the target race speed with a factor per
//!   distance and runner level. The result is always LOW confidence, carries
//!   a CRITICAL field-test warning, and ships conservatism adjustments for
//!   the training plan.
//! - [`TargetTimeEstimator::estimate_from_personal_best`]: current
//!   thresholds from a PB, with the requested improvement checked against a
//!   realistic benchmark. Unrealistic goals return
//!   [`ImprovementOutcome::Rejected`] instead of an estimate.
//!
//! Goal thresholds are reported for progress tracking only; training starts
//! from the current ones.

pub mod benchmarks;
pub mod improvement;

pub use benchmarks::{Benchmark, BenchmarkVerdict, FieldTestOutcome};
pub use improvement::realistic_improvement_percent;

use crate::algorithms::vdot::TrainingPace;
use crate::config::ThresholdConfig;
use serde::{Deserialize, Serialize};
use threshold_core::constants::target_time::{
    CONSERVATIVE_WEEKLY_PROGRESSION, FIELD_TEST_DEADLINE_WEEKS, STANDARD_WEEKLY_PROGRESSION_MAX,
    STANDARD_WEEKLY_PROGRESSION_MIN, STARTING_VOLUME_REDUCTION, ZONE_BAND_NARROWING,
};
use threshold_core::constants::units::{METERS_PER_KM, SECONDS_PER_HOUR};
use threshold_core::errors::{AppError, AppResult};
use threshold_core::models::{
    format_time, AthleteCategory, ConfidenceLevel, Pace, RaceDistance, RunnerLevel,
    TrainingHistory,
};
use tracing::{debug, info, warn};

/// Checkpoints of the target-time protocol
const TARGET_TIME_CHECKPOINT_WEEKS: [u32; 3] = [2, 6, 10];
/// Progress checkpoints of the improvement protocol, before the final test
const IMPROVEMENT_CHECKPOINT_WEEKS: [u32; 3] = [4, 8, 12];
/// Share of the race distance covered by the race-pace rehearsal
const REHEARSAL_DISTANCE_FRACTION: f64 = 0.4;
/// Slack on the first time trial against the estimated LT2 pace
const FIRST_TRIAL_PACE_SLACK: f64 = 1.03;

/// LT2 speed as a multiple of race speed
///
/// Short races are run above LT2 and long races below it; less trained
/// runners sit further below LT2 for a given distance.
#[must_use]
pub const fn race_to_threshold_factor(distance: RaceDistance, level: RunnerLevel) -> f64 {
    match (distance, level) {
        (RaceDistance::FiveK, RunnerLevel::Elite) => 0.90,
        (RaceDistance::FiveK, RunnerLevel::Advanced) => 0.92,
        (RaceDistance::FiveK, RunnerLevel::Recreational) => 0.95,
        (RaceDistance::FiveK, RunnerLevel::Beginner) => 0.98,
        (RaceDistance::TenK, RunnerLevel::Elite) => 0.95,
        (RaceDistance::TenK, RunnerLevel::Advanced) => 0.97,
        (RaceDistance::TenK, RunnerLevel::Recreational) => 1.00,
        (RaceDistance::TenK, RunnerLevel::Beginner) => 1.03,
        (RaceDistance::HalfMarathon, RunnerLevel::Elite) => 1.00,
        (RaceDistance::HalfMarathon, RunnerLevel::Advanced) => 1.03,
        (RaceDistance::HalfMarathon, RunnerLevel::Recreational) => 1.06,
        (RaceDistance::HalfMarathon, RunnerLevel::Beginner) => 1.10,
        (RaceDistance::Marathon, RunnerLevel::Elite) => 1.05,
        (RaceDistance::Marathon, RunnerLevel::Advanced) => 1.09,
        (RaceDistance::Marathon, RunnerLevel::Recreational) => 1.13,
        (RaceDistance::Marathon, RunnerLevel::Beginner) => 1.18,
    }
}

/// Course and weather conditions of the PB race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceConditions {
    /// Typical course and weather
    #[default]
    Neutral,
    /// Fast course or ideal weather; the PB overstates fitness
    Favorable,
    /// Hilly course, heat, or wind; the PB understates fitness
    Difficult,
}

/// Estimate from a target time alone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetTimeInput {
    /// Race distance (m)
    pub distance_meters: f64,
    /// Target finishing time (s)
    pub target_time_seconds: f64,
    /// Self-reported runner level
    pub runner_level: RunnerLevel,
}

/// Estimate from a PB and an improvement goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImprovementGoalInput {
    /// Race distance (m)
    pub distance_meters: f64,
    /// Personal best (s)
    pub personal_best_seconds: f64,
    /// Goal time (s)
    pub goal_time_seconds: f64,
    /// Length of the training block
    pub weeks: u32,
    /// Training history used to categorize the athlete
    pub history: TrainingHistory,
    /// Conditions of the PB race
    #[serde(default)]
    pub race_conditions: RaceConditions,
}

/// How an estimate was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstimateMethod {
    /// Back-solved from a target time
    TargetTime,
    /// Derived from a personal best
    PersonalBest,
}

/// Warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningSeverity {
    /// Must be acted on before training proceeds
    Critical,
    /// Worth surfacing to the athlete
    Caution,
}

/// Warning attached to an estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateWarning {
    /// Severity
    pub severity: WarningSeverity,
    /// Message
    pub message: String,
}

impl EstimateWarning {
    fn new(severity: WarningSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// When a checkpoint falls in the training block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointWeek {
    /// A numbered week
    Week(u32),
    /// End of the block
    Final,
}

/// A scheduled field test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// When the test happens
    pub week: CheckpointWeek,
    /// Test to perform
    pub test: String,
    /// What the test verifies
    pub purpose: String,
    /// Whether a failure must change the plan
    pub critical: bool,
    /// Action when the benchmark is missed
    pub action_if_failed: String,
    /// Pass criterion
    pub benchmark: Benchmark,
}

/// Plan changes for thresholds that have not been measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConservatismAdjustments {
    /// Zone band width as a fraction of the usual width
    pub zone_band_narrowing: f64,
    /// Reduction of starting weekly volume
    pub starting_volume_reduction: f64,
    /// Weekly volume progression
    pub weekly_progression: f64,
    /// Lower end of the usual progression band this replaces
    pub standard_weekly_progression_min: f64,
    /// Upper end of the usual progression band this replaces
    pub standard_weekly_progression_max: f64,
}

impl Default for ConservatismAdjustments {
    fn default() -> Self {
        Self {
            zone_band_narrowing: ZONE_BAND_NARROWING,
            starting_volume_reduction: STARTING_VOLUME_REDUCTION,
            weekly_progression: CONSERVATIVE_WEEKLY_PROGRESSION,
            standard_weekly_progression_min: STANDARD_WEEKLY_PROGRESSION_MIN,
            standard_weekly_progression_max: STANDARD_WEEKLY_PROGRESSION_MAX,
        }
    }
}

/// LT1 and LT2 paces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPaces {
    /// First lactate threshold
    pub lt1: TrainingPace,
    /// Second lactate threshold
    pub lt2: TrainingPace,
}

/// Requested vs realistic improvement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImprovementAssessment {
    /// Athlete category from training history
    pub category: AthleteCategory,
    /// Requested improvement (% of PB)
    pub requested_percent: f64,
    /// Realistic improvement (% of PB)
    pub realistic_percent: f64,
}

/// Estimated thresholds with their validation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEstimate {
    /// How the estimate was produced
    pub method: EstimateMethod,
    /// Confidence in the estimate
    pub confidence: ConfidenceLevel,
    /// Estimated LT1 pace
    pub lt1: TrainingPace,
    /// Estimated LT2 pace
    pub lt2: TrainingPace,
    /// Runner level used for the factor table
    pub runner_level: RunnerLevel,
    /// Thresholds at the goal time, for progress tracking only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_thresholds: Option<ThresholdPaces>,
    /// Goal realism check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement: Option<ImprovementAssessment>,
    /// Warnings
    pub warnings: Vec<EstimateWarning>,
    /// Scheduled field tests
    pub validation_protocol: Vec<Checkpoint>,
    /// Plan changes while thresholds are unvalidated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conservatism_adjustments: Option<ConservatismAdjustments>,
}

/// Reason a goal was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalRejection {
    /// Requested improvement exceeds the accepted multiple of the benchmark
    UnrealisticGoal,
}

/// Refusal returned instead of an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnrealisticGoal {
    /// Always `UNREALISTIC_GOAL`
    pub error: GoalRejection,
    /// Explanation for the athlete
    pub message: String,
    /// Athlete category from training history
    pub category: AthleteCategory,
    /// Requested improvement (% of PB)
    pub requested_improvement_percent: f64,
    /// Realistic improvement (% of PB)
    pub realistic_improvement_percent: f64,
    /// Largest improvement that would have been accepted (% of PB)
    pub max_accepted_improvement_percent: f64,
    /// Goal time at the realistic improvement (s)
    pub realistic_goal_time_seconds: f64,
    /// Goal time at the realistic improvement, formatted
    pub realistic_goal_time: String,
}

/// Outcome of a PB-plus-goal estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImprovementOutcome {
    /// Goal refused; the caller should ask for a new goal
    Rejected(UnrealisticGoal),
    /// Goal accepted
    Accepted(Box<ThresholdEstimate>),
}

impl ImprovementOutcome {
    /// The estimate, when the goal was accepted
    #[must_use]
    pub fn estimate(&self) -> Option<&ThresholdEstimate> {
        match self {
            Self::Accepted(estimate) => Some(estimate),
            Self::Rejected(_) => None,
        }
    }

    /// The refusal, when the goal was rejected
    #[must_use]
    pub const fn rejection(&self) -> Option<&UnrealisticGoal> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Accepted(_) => None,
        }
    }
}

/// Threshold estimator for athletes without lab data
#[derive(Debug, Clone, Copy)]
pub struct TargetTimeEstimator {
    lt1_pace_multiplier: f64,
    race_condition_adjustment: f64,
    max_benchmark_multiple: f64,
}

impl Default for TargetTimeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetTimeEstimator {
    /// Estimator using the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Estimator using an explicit configuration
    #[must_use]
    pub const fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            lt1_pace_multiplier: config.target_time.lt1_pace_multiplier,
            race_condition_adjustment: config.target_time.race_condition_adjustment,
            max_benchmark_multiple: config.target_time.max_benchmark_multiple,
        }
    }

    /// LT2 and LT1 from a target time alone
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnsupportedDistance` for a distance outside the
    /// factor table and `AppError::InvalidInput` for a non-positive time.
    pub fn estimate_from_target_time(&self, input: &TargetTimeInput) -> AppResult<ThresholdEstimate> {
        let distance = RaceDistance::try_from_meters(input.distance_meters)?;
        let race_kmh = race_speed_kmh(input.distance_meters, input.target_time_seconds)?;
        let lt2_kmh = race_kmh * race_to_threshold_factor(distance, input.runner_level);
        let paces = self.threshold_paces(lt2_kmh);

        info!(
            distance = %distance,
            runner_level = ?input.runner_level,
            lt2_kmh,
            "thresholds estimated from target time"
        );

        let validation_protocol = target_time_protocol(
            Pace::from_kmh(lt2_kmh).sec_per_km,
            input.target_time_seconds,
        );

        Ok(ThresholdEstimate {
            method: EstimateMethod::TargetTime,
            confidence: ConfidenceLevel::Low,
            lt1: paces.lt1,
            lt2: paces.lt2,
            runner_level: input.runner_level,
            goal_thresholds: None,
            improvement: None,
            warnings: vec![EstimateWarning::new(
                WarningSeverity::Critical,
                format!(
                    "Thresholds are estimated from a target time only. Complete a field test within {FIELD_TEST_DEADLINE_WEEKS} weeks before relying on these zones."
                ),
            )],
            validation_protocol,
            conservatism_adjustments: Some(ConservatismAdjustments::default()),
        })
    }

    /// Current thresholds from a PB, with the improvement goal checked
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnsupportedDistance` for a distance outside the
    /// factor table and `AppError::InvalidInput` for non-positive times or
    /// an empty training block.
    pub fn estimate_from_personal_best(
        &self,
        input: &ImprovementGoalInput,
    ) -> AppResult<ImprovementOutcome> {
        let distance = RaceDistance::try_from_meters(input.distance_meters)?;
        if input.weeks == 0 {
            return Err(AppError::invalid_input("training block must be at least one week"));
        }
        let pb_kmh = race_speed_kmh(input.distance_meters, input.personal_best_seconds)?;
        let goal_kmh = race_speed_kmh(input.distance_meters, input.goal_time_seconds)?;

        let category = input.history.category();
        let level = RunnerLevel::from(category);
        let requested = (input.personal_best_seconds - input.goal_time_seconds)
            / input.personal_best_seconds
            * 100.0;
        let realistic = realistic_improvement_percent(distance, input.weeks, category);
        let max_accepted = realistic * self.max_benchmark_multiple;

        debug!(
            requested_percent = requested,
            realistic_percent = realistic,
            category = ?category,
            "improvement goal assessed"
        );

        if requested > max_accepted {
            let realistic_goal_time_seconds = input.personal_best_seconds * (1.0 - realistic / 100.0);
            warn!(
                requested_percent = requested,
                max_accepted_percent = max_accepted,
                "improvement goal rejected"
            );
            return Ok(ImprovementOutcome::Rejected(UnrealisticGoal {
                error: GoalRejection::UnrealisticGoal,
                message: format!(
                    "A {requested:.1}% improvement in {} weeks is not realistic; about {realistic:.1}% can be expected",
                    input.weeks
                ),
                category,
                requested_improvement_percent: requested,
                realistic_improvement_percent: realistic,
                max_accepted_improvement_percent: max_accepted,
                realistic_goal_time_seconds,
                realistic_goal_time: format_time(realistic_goal_time_seconds),
            }));
        }

        let factor = race_to_threshold_factor(distance, level)
            * self.condition_factor(input.race_conditions);
        let current = self.threshold_paces(pb_kmh * factor);
        let goal = self.threshold_paces(goal_kmh * factor);

        let mut warnings = Vec::new();
        let confidence = if requested > realistic {
            warnings.push(EstimateWarning::new(
                WarningSeverity::Caution,
                format!(
                    "Goal is ambitious: {requested:.1}% requested against about {realistic:.1}% typical for {} weeks",
                    input.weeks
                ),
            ));
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Medium
        };

        let validation_protocol = improvement_protocol(
            Pace::from_kmh(current.lt2.kmh).sec_per_km,
            Pace::from_kmh(goal.lt2.kmh).sec_per_km,
            input.weeks,
            input.goal_time_seconds,
        );

        Ok(ImprovementOutcome::Accepted(Box::new(ThresholdEstimate {
            method: EstimateMethod::PersonalBest,
            confidence,
            lt1: current.lt1,
            lt2: current.lt2,
            runner_level: level,
            goal_thresholds: Some(goal),
            improvement: Some(ImprovementAssessment {
                category,
                requested_percent: requested,
                realistic_percent: realistic,
            }),
            warnings,
            validation_protocol,
            conservatism_adjustments: None,
        })))
    }

    fn threshold_paces(&self, lt2_kmh: f64) -> ThresholdPaces {
        let lt2 = Pace::from_kmh(lt2_kmh);
        let lt1 = Pace::from_sec_per_km(lt2.sec_per_km * self.lt1_pace_multiplier);
        ThresholdPaces {
            lt1: TrainingPace::at(lt1.kmh),
            lt2: TrainingPace::at(lt2.kmh),
        }
    }

    fn condition_factor(&self, conditions: RaceConditions) -> f64 {
        match conditions {
            RaceConditions::Neutral => 1.0,
            RaceConditions::Favorable => 1.0 - self.race_condition_adjustment,
            RaceConditions::Difficult => 1.0 + self.race_condition_adjustment,
        }
    }
}

fn race_speed_kmh(distance_meters: f64, time_seconds: f64) -> AppResult<f64> {
    if time_seconds <= 0.0 || !time_seconds.is_finite() {
        return Err(AppError::invalid_input("race time must be positive"));
    }
    Ok(distance_meters / METERS_PER_KM / (time_seconds / SECONDS_PER_HOUR))
}

fn target_time_protocol(lt2_sec_per_km: f64, target_time_seconds: f64) -> Vec<Checkpoint> {
    let [first, second, third] = TARGET_TIME_CHECKPOINT_WEEKS;
    vec![
        Checkpoint {
            week: CheckpointWeek::Week(first),
            test: "30-minute time trial".to_owned(),
            purpose: "Validate the estimated LT2 pace".to_owned(),
            critical: true,
            action_if_failed: "Re-derive LT2 from the time-trial average pace and rebuild all zones"
                .to_owned(),
            benchmark: Benchmark::Pace {
                max_sec_per_km: lt2_sec_per_km * FIRST_TRIAL_PACE_SLACK,
            },
        },
        Checkpoint {
            week: CheckpointWeek::Week(second),
            test: "20-minute continuous run at LT2 pace".to_owned(),
            purpose: "Confirm the threshold pace can be held".to_owned(),
            critical: false,
            action_if_failed: "Slow threshold sessions by 5 s/km".to_owned(),
            benchmark: Benchmark::Pace {
                max_sec_per_km: lt2_sec_per_km,
            },
        },
        Checkpoint {
            week: CheckpointWeek::Week(third),
            test: "Race-pace rehearsal over 40% of the race distance".to_owned(),
            purpose: "Confirm the target pace is sustainable".to_owned(),
            critical: true,
            action_if_failed: "Revise the target time before the taper".to_owned(),
            benchmark: Benchmark::Time {
                max_seconds: target_time_seconds * REHEARSAL_DISTANCE_FRACTION,
            },
        },
    ]
}

/// Progress checkpoints within the block, then the goal race
///
/// Pace benchmarks move linearly from the current to the goal LT2 pace.
fn improvement_protocol(
    current_sec_per_km: f64,
    goal_sec_per_km: f64,
    weeks: u32,
    goal_time_seconds: f64,
) -> Vec<Checkpoint> {
    let mut protocol: Vec<Checkpoint> = IMPROVEMENT_CHECKPOINT_WEEKS
        .into_iter()
        .filter(|week| *week <= weeks)
        .map(|week| {
            let progress = f64::from(week) / f64::from(weeks);
            Checkpoint {
                week: CheckpointWeek::Week(week),
                test: "30-minute time trial".to_owned(),
                purpose: "Track threshold progress toward the goal".to_owned(),
                critical: week >= IMPROVEMENT_CHECKPOINT_WEEKS[1],
                action_if_failed: "Hold training load and retest in two weeks".to_owned(),
                benchmark: Benchmark::Pace {
                    max_sec_per_km: (goal_sec_per_km - current_sec_per_km)
                        .mul_add(progress, current_sec_per_km),
                },
            }
        })
        .collect();

    protocol.push(Checkpoint {
        week: CheckpointWeek::Final,
        test: "Goal race or time trial at race distance".to_owned(),
        purpose: "Confirm the improvement goal".to_owned(),
        critical: true,
        action_if_failed: "Reset the goal from the achieved time".to_owned(),
        benchmark: Benchmark::Time {
            max_seconds: goal_time_seconds,
        },
    });
    protocol
}

#[cfg(test)]
mod tests {
    use super::*;
    use threshold_core::errors::ErrorCode;

    fn estimator() -> TargetTimeEstimator {
        TargetTimeEstimator::with_config(&ThresholdConfig::default())
    }

    fn recreational() -> TrainingHistory {
        TrainingHistory {
            years_running: 3.0,
            weekly_km: 35.0,
            consistency: 0.7,
        }
    }

    fn half_goal(goal_time_seconds: f64) -> ImprovementGoalInput {
        ImprovementGoalInput {
            distance_meters: 21_097.5,
            personal_best_seconds: 5_280.0,
            goal_time_seconds,
            weeks: 12,
            history: recreational(),
            race_conditions: RaceConditions::Neutral,
        }
    }

    #[test]
    fn test_target_time_estimate() {
        let estimate = estimator()
            .estimate_from_target_time(&TargetTimeInput {
                distance_meters: 21_097.5,
                target_time_seconds: 5_280.0,
                runner_level: RunnerLevel::Recreational,
            })
            .unwrap();

        let race_kmh = 21.0975 / (5_280.0 / 3_600.0);
        assert!((estimate.lt2.kmh - race_kmh * 1.06).abs() < 1e-9);
        assert!((estimate.lt1.kmh - estimate.lt2.kmh / 1.11).abs() < 1e-9);
        assert_eq!(estimate.confidence, ConfidenceLevel::Low);
        assert_eq!(estimate.warnings[0].severity, WarningSeverity::Critical);
        let weeks: Vec<_> = estimate.validation_protocol.iter().map(|c| c.week).collect();
        assert_eq!(
            weeks,
            vec![
                CheckpointWeek::Week(2),
                CheckpointWeek::Week(6),
                CheckpointWeek::Week(10)
            ]
        );
        assert!(estimate.conservatism_adjustments.is_some());
    }

    #[test]
    fn test_unsupported_distance() {
        let err = estimator()
            .estimate_from_target_time(&TargetTimeInput {
                distance_meters: 15_000.0,
                target_time_seconds: 3_600.0,
                runner_level: RunnerLevel::Advanced,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedDistance);
    }

    #[test]
    fn test_unrealistic_goal_rejected() {
        let outcome = estimator()
            .estimate_from_personal_best(&half_goal(5_280.0 * 0.7))
            .unwrap();
        assert!(outcome.estimate().is_none());
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.error, GoalRejection::UnrealisticGoal);
        assert!((rejection.realistic_improvement_percent - 3.0).abs() < 1e-9);
        assert!((rejection.realistic_goal_time_seconds - 5_121.6).abs() < 1e-6);

        let json = serde_json::to_value(rejection).unwrap();
        assert_eq!(json["error"], "UNREALISTIC_GOAL");
    }

    #[test]
    fn test_modest_goal_accepted_with_current_thresholds() {
        let outcome = estimator()
            .estimate_from_personal_best(&half_goal(5_280.0 * 0.98))
            .unwrap();
        let estimate = outcome.estimate().unwrap();
        assert_eq!(estimate.confidence, ConfidenceLevel::Medium);
        assert!(estimate.warnings.is_empty());

        let goal = estimate.goal_thresholds.as_ref().unwrap();
        assert!(goal.lt2.kmh > estimate.lt2.kmh);

        let weeks: Vec<_> = estimate.validation_protocol.iter().map(|c| c.week).collect();
        assert_eq!(
            weeks,
            vec![
                CheckpointWeek::Week(4),
                CheckpointWeek::Week(8),
                CheckpointWeek::Week(12),
                CheckpointWeek::Final
            ]
        );
    }

    #[test]
    fn test_ambitious_goal_downgraded() {
        let outcome = estimator()
            .estimate_from_personal_best(&half_goal(5_280.0 * 0.967))
            .unwrap();
        let estimate = outcome.estimate().unwrap();
        assert_eq!(estimate.confidence, ConfidenceLevel::Low);
        assert_eq!(estimate.warnings.len(), 1);
    }

    #[test]
    fn test_favorable_course_lowers_thresholds() {
        let neutral = estimator()
            .estimate_from_personal_best(&half_goal(5_200.0))
            .unwrap();
        let favorable = estimator()
            .estimate_from_personal_best(&ImprovementGoalInput {
                race_conditions: RaceConditions::Favorable,
                ..half_goal(5_200.0)
            })
            .unwrap();
        let (neutral, favorable) = (neutral.estimate().unwrap(), favorable.estimate().unwrap());
        assert!((favorable.lt2.kmh / neutral.lt2.kmh - 0.98).abs() < 1e-9);
    }
}
