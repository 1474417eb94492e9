// ABOUTME: Race performance records and the standard race distances used by lookup tables
// ABOUTME: Resolves time in seconds or minutes and matches measured distances to 5K..marathon
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::race_distances::{
    DISTANCE_10K, DISTANCE_5K, DISTANCE_HALF_MARATHON, DISTANCE_MARATHON,
    DISTANCE_MATCH_TOLERANCE,
};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Athlete gender as used by the economy correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
}

/// Standard race distances covered by the equivalence and factor tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceDistance {
    /// 5 km
    FiveK,
    /// 10 km
    TenK,
    /// 21.0975 km
    HalfMarathon,
    /// 42.195 km
    Marathon,
}

impl RaceDistance {
    /// All distances, shortest first
    pub const ALL: [Self; 4] = [Self::FiveK, Self::TenK, Self::HalfMarathon, Self::Marathon];

    /// Distance in meters
    #[must_use]
    pub const fn meters(self) -> f64 {
        match self {
            Self::FiveK => DISTANCE_5K,
            Self::TenK => DISTANCE_10K,
            Self::HalfMarathon => DISTANCE_HALF_MARATHON,
            Self::Marathon => DISTANCE_MARATHON,
        }
    }

    /// Match a measured distance to a standard race within 2%
    #[must_use]
    pub fn from_meters(distance_meters: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|race| {
            (distance_meters - race.meters()).abs() <= race.meters() * DISTANCE_MATCH_TOLERANCE
        })
    }

    /// Like `from_meters` but a hard error for non-standard distances
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnsupportedDistance` when no standard race matches.
    pub fn try_from_meters(distance_meters: f64) -> AppResult<Self> {
        Self::from_meters(distance_meters)
            .ok_or_else(|| AppError::unsupported_distance(distance_meters))
    }

    /// Short label for reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FiveK => "5K",
            Self::TenK => "10K",
            Self::HalfMarathon => "Half Marathon",
            Self::Marathon => "Marathon",
        }
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A race result handed over by the caller
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RacePerformance {
    /// Race distance in meters
    pub distance_meters: f64,
    /// Finishing time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<f64>,
    /// Finishing time in minutes (used when `time_seconds` is absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<f64>,
    /// Race date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Athlete age on race day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Athlete gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl RacePerformance {
    /// Race result from distance and minutes
    #[must_use]
    pub fn from_minutes(distance_meters: f64, time_minutes: f64) -> Self {
        Self {
            distance_meters,
            time_minutes: Some(time_minutes),
            ..Self::default()
        }
    }

    /// Finishing time in minutes
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if neither time field is set or the
    /// time is not positive.
    pub fn duration_minutes(&self) -> AppResult<f64> {
        let minutes = self
            .time_seconds
            .map(|seconds| seconds / 60.0)
            .or(self.time_minutes)
            .ok_or_else(|| AppError::invalid_input("race result has no finishing time"))?;

        if minutes <= 0.0 || !minutes.is_finite() {
            return Err(AppError::invalid_input("race time must be positive"));
        }
        Ok(minutes)
    }

    /// Days between the race and `as_of`; `None` when either date is unknown
    #[must_use]
    pub fn age_in_days(&self, as_of: Option<NaiveDate>) -> Option<i64> {
        let (date, as_of) = (self.date?, as_of?);
        Some((as_of - date).num_days().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_meters_tolerates_gps_drift() {
        assert_eq!(RaceDistance::from_meters(21_200.0), Some(RaceDistance::HalfMarathon));
        assert_eq!(RaceDistance::from_meters(15_000.0), None);
    }

    #[test]
    fn test_seconds_take_precedence() {
        let race = RacePerformance {
            distance_meters: 5_000.0,
            time_seconds: Some(1_200.0),
            time_minutes: Some(99.0),
            ..RacePerformance::default()
        };
        assert!((race.duration_minutes().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_in_days() {
        let race = RacePerformance {
            date: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..RacePerformance::from_minutes(10_000.0, 40.0)
        };
        assert_eq!(race.age_in_days(NaiveDate::from_ymd_opt(2025, 3, 2)), Some(60));
        assert_eq!(race.age_in_days(None), None);
    }
}
