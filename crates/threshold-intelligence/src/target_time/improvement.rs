// ABOUTME: Realistic race-time improvement by distance, training block length, and athlete category
// ABOUTME: Used to reject improvement goals that exceed what training can plausibly deliver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use threshold_core::models::{AthleteCategory, RaceDistance};

/// Realistic improvement (percent of race time) over a 12-week block
const fn twelve_week_improvement(distance: RaceDistance, category: AthleteCategory) -> f64 {
    match (distance, category) {
        (RaceDistance::FiveK, AthleteCategory::Beginner) => 6.0,
        (RaceDistance::FiveK, AthleteCategory::Recreational) => 3.5,
        (RaceDistance::FiveK, AthleteCategory::Advanced) => 2.0,
        (RaceDistance::TenK, AthleteCategory::Beginner) => 5.5,
        (RaceDistance::TenK, AthleteCategory::Recreational) => 3.2,
        (RaceDistance::TenK, AthleteCategory::Advanced) => 1.8,
        (RaceDistance::HalfMarathon, AthleteCategory::Beginner) => 5.0,
        (RaceDistance::HalfMarathon, AthleteCategory::Recreational) => 3.0,
        (RaceDistance::HalfMarathon, AthleteCategory::Advanced) => 1.5,
        (RaceDistance::Marathon, AthleteCategory::Beginner) => 4.5,
        (RaceDistance::Marathon, AthleteCategory::Recreational) => 2.5,
        (RaceDistance::Marathon, AthleteCategory::Advanced) => 1.2,
    }
}

/// Scaling of the 12-week figure for other block lengths
const fn block_length_scale(weeks: u32) -> f64 {
    match weeks {
        0..=8 => 0.7,
        9..=12 => 1.0,
        13..=16 => 1.25,
        17..=24 => 1.6,
        _ => 2.0,
    }
}

/// Realistic improvement in percent of race time
#[must_use]
pub fn realistic_improvement_percent(
    distance: RaceDistance,
    weeks: u32,
    category: AthleteCategory,
) -> f64 {
    twelve_week_improvement(distance, category) * block_length_scale(weeks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_marathon_recreational_twelve_weeks() {
        let percent = realistic_improvement_percent(
            RaceDistance::HalfMarathon,
            12,
            AthleteCategory::Recreational,
        );
        assert!((percent - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_longer_blocks_allow_more() {
        let short = realistic_improvement_percent(RaceDistance::TenK, 8, AthleteCategory::Beginner);
        let long = realistic_improvement_percent(RaceDistance::TenK, 30, AthleteCategory::Beginner);
        assert!(long > short);
    }

    #[test]
    fn test_beginners_improve_most() {
        for distance in RaceDistance::ALL {
            let beginner = realistic_improvement_percent(distance, 12, AthleteCategory::Beginner);
            let advanced = realistic_improvement_percent(distance, 12, AthleteCategory::Advanced);
            assert!(beginner > advanced);
        }
    }
}
