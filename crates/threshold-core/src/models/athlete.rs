// ABOUTME: Athlete profile inputs and training-history categories
// ABOUTME: Runner levels for factor tables and beginner/recreational/advanced categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::race::Gender;
use serde::{Deserialize, Serialize};

/// Athlete attributes supplied by the caller
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AthleteProfileInput {
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Current weekly running volume (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_km: Option<f64>,
    /// Years of structured training
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_age: Option<f64>,
    /// Resting heart rate (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_hr: Option<u16>,
    /// Maximum heart rate (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hr: Option<u16>,
}

/// Runner level used by the race-to-threshold factor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerLevel {
    /// Sub-elite and elite competitors
    Elite,
    /// Competitive club runners
    Advanced,
    /// Regular recreational runners
    Recreational,
    /// Less than a year of running
    Beginner,
}

/// Athlete category used by the improvement benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AthleteCategory {
    /// Large untapped adaptation potential
    Beginner,
    /// Moderate adaptation potential
    Recreational,
    /// Close to individual ceiling
    Advanced,
}

impl From<AthleteCategory> for RunnerLevel {
    fn from(category: AthleteCategory) -> Self {
        match category {
            AthleteCategory::Beginner => Self::Beginner,
            AthleteCategory::Recreational => Self::Recreational,
            AthleteCategory::Advanced => Self::Advanced,
        }
    }
}

/// Training history used to categorize an athlete
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Years of running
    pub years_running: f64,
    /// Average weekly volume (km)
    pub weekly_km: f64,
    /// Fraction of planned sessions completed over the last months (0-1)
    pub consistency: f64,
}

impl TrainingHistory {
    /// Categorize the athlete from their history
    ///
    /// Beginners have under a year of running or under 20 km/week. Advanced
    /// athletes combine at least 4 years, 50 km/week, and 80% consistency.
    #[must_use]
    pub fn category(&self) -> AthleteCategory {
        if self.years_running < 1.0 || self.weekly_km < 20.0 {
            AthleteCategory::Beginner
        } else if self.years_running >= 4.0 && self.weekly_km >= 50.0 && self.consistency >= 0.8
        {
            AthleteCategory::Advanced
        } else {
            AthleteCategory::Recreational
        }
    }
}
