// ABOUTME: Core data models for lactate tests, race results, and athletes
// ABOUTME: Shared by the intelligence crate and by external collaborators via serde
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Athlete profile, runner levels, and training history
pub mod athlete;
/// Ordered confidence levels
pub mod confidence;
/// Lactate test records and data points
pub mod lactate;
/// Speed/pace conversions and formatting
pub mod pace;
/// Race performances and standard distances
pub mod race;

pub use athlete::{AthleteCategory, AthleteProfileInput, RunnerLevel, TrainingHistory};
pub use confidence::ConfidenceLevel;
pub use lactate::{
    ensure_strictly_increasing, AnaerobicThreshold, IntensityUnit, LactateDataPoint,
    LactateStage, LactateTestRecord, ThresholdCalculation, ThresholdUnit,
};
pub use pace::{format_pace_kmh, format_time, Pace};
pub use race::{Gender, RaceDistance, RacePerformance};
