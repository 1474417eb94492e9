// ABOUTME: Field-test pass criteria attached to validation checkpoints
// ABOUTME: Power, time, pace, and calorie benchmarks evaluated against a measured outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Pass criterion for a field test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Benchmark {
    /// Average power must reach `min_watts`
    Power {
        /// Minimum average power (W)
        min_watts: f64,
    },
    /// Test must be completed within `max_seconds`
    Time {
        /// Maximum duration (s)
        max_seconds: f64,
    },
    /// Average pace must be no slower than `max_sec_per_km`
    Pace {
        /// Slowest acceptable pace (s/km)
        max_sec_per_km: f64,
    },
    /// Energy expenditure must reach `min_kcal`
    Calories {
        /// Minimum energy expenditure (kcal)
        min_kcal: f64,
    },
}

/// Measurements from a completed field test
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldTestOutcome {
    /// Average power (W)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_power_watts: Option<f64>,
    /// Duration (s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<f64>,
    /// Average pace (s/km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_sec_per_km: Option<f64>,
    /// Energy expenditure (kcal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_kcal: Option<f64>,
}

/// Result of checking an outcome against a benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenchmarkVerdict {
    /// Criterion met
    Passed,
    /// Criterion missed
    Failed,
    /// The outcome lacks the measurement the criterion needs
    NotMeasured,
}

impl BenchmarkVerdict {
    fn from_check(measured: Option<f64>, passes: impl Fn(f64) -> bool) -> Self {
        match measured {
            Some(value) if passes(value) => Self::Passed,
            Some(_) => Self::Failed,
            None => Self::NotMeasured,
        }
    }
}

impl Benchmark {
    /// Check a field-test outcome
    #[must_use]
    pub fn evaluate(&self, outcome: &FieldTestOutcome) -> BenchmarkVerdict {
        match *self {
            Self::Power { min_watts } => {
                BenchmarkVerdict::from_check(outcome.avg_power_watts, |watts| watts >= min_watts)
            }
            Self::Time { max_seconds } => {
                BenchmarkVerdict::from_check(outcome.time_seconds, |seconds| seconds <= max_seconds)
            }
            Self::Pace { max_sec_per_km } => BenchmarkVerdict::from_check(
                outcome.pace_sec_per_km,
                |pace| pace > 0.0 && pace <= max_sec_per_km,
            ),
            Self::Calories { min_kcal } => {
                BenchmarkVerdict::from_check(outcome.calories_kcal, |kcal| kcal >= min_kcal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_variant_reads_its_own_measurement() {
        let outcome = FieldTestOutcome {
            avg_power_watts: Some(250.0),
            time_seconds: Some(1_800.0),
            ..FieldTestOutcome::default()
        };

        assert_eq!(
            Benchmark::Power { min_watts: 240.0 }.evaluate(&outcome),
            BenchmarkVerdict::Passed
        );
        assert_eq!(
            Benchmark::Time { max_seconds: 1_750.0 }.evaluate(&outcome),
            BenchmarkVerdict::Failed
        );
        assert_eq!(
            Benchmark::Pace { max_sec_per_km: 270.0 }.evaluate(&outcome),
            BenchmarkVerdict::NotMeasured
        );
        assert_eq!(
            Benchmark::Calories { min_kcal: 300.0 }.evaluate(&outcome),
            BenchmarkVerdict::NotMeasured
        );
    }

    #[test]
    fn test_pace_is_lower_is_better() {
        let benchmark = Benchmark::Pace { max_sec_per_km: 270.0 };
        let fast = FieldTestOutcome {
            pace_sec_per_km: Some(265.0),
            ..FieldTestOutcome::default()
        };
        let slow = FieldTestOutcome {
            pace_sec_per_km: Some(275.0),
            ..FieldTestOutcome::default()
        };
        assert_eq!(benchmark.evaluate(&fast), BenchmarkVerdict::Passed);
        assert_eq!(benchmark.evaluate(&slow), BenchmarkVerdict::Failed);
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(Benchmark::Time { max_seconds: 600.0 }).unwrap();
        assert_eq!(json["type"], "time");
        assert_eq!(json["max_seconds"], 600.0);
    }
}
