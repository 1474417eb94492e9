// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging setup, default configuration, and the reference athlete data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `threshold_engine`
//!
//! Fixtures describe one reference athlete used across the suites: a seven
//! stage treadmill test, an 88 minute half marathon, and a 194 bpm max HR.

use std::env;
use std::sync::Once;
use threshold_engine::intelligence::ThresholdConfig;
use threshold_engine::models::{
    AthleteProfileInput, Gender, LactateDataPoint, LactateStage, LactateTestRecord,
    RacePerformance, TrainingHistory,
};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Built-in defaults, independent of any `THRESHOLD_*` variables
pub fn test_config() -> ThresholdConfig {
    ThresholdConfig::default()
}

/// Reference treadmill test: (km/h, bpm, mmol/L)
pub const SCENARIO_STAGES: [(f64, u16, f64); 7] = [
    (9.0, 135, 1.5),
    (10.0, 145, 2.0),
    (11.0, 155, 3.5),
    (12.0, 165, 6.8),
    (13.0, 175, 10.2),
    (14.0, 185, 15.5),
    (15.0, 192, 20.3),
];

/// Reference athlete max heart rate
pub const SCENARIO_MAX_HR: u16 = 194;

/// Half marathon distance (m)
pub const HALF_MARATHON_METERS: f64 = 21_097.5;

/// Lab test record without any recorded threshold
pub fn scenario_test() -> LactateTestRecord {
    LactateTestRecord {
        stages: SCENARIO_STAGES
            .iter()
            .map(|&(speed, heart_rate, lactate)| LactateStage::speed(speed, heart_rate, lactate))
            .collect(),
        threshold_calculation: None,
        anaerobic_threshold: None,
    }
}

/// Reference stages as a detection series
pub fn scenario_points() -> Vec<LactateDataPoint> {
    SCENARIO_STAGES
        .iter()
        .map(|&(speed, heart_rate, lactate)| LactateDataPoint::new(speed, lactate, heart_rate))
        .collect()
}

/// 88 minute half marathon, age 30, male
pub fn scenario_race() -> RacePerformance {
    RacePerformance {
        age: Some(30),
        gender: Some(Gender::Male),
        ..RacePerformance::from_minutes(HALF_MARATHON_METERS, 88.0)
    }
}

/// Reference athlete profile
pub fn scenario_athlete() -> AthleteProfileInput {
    AthleteProfileInput {
        age: Some(30),
        gender: Some(Gender::Male),
        max_hr: Some(SCENARIO_MAX_HR),
        ..AthleteProfileInput::default()
    }
}

/// Three years at 35 km/week, 70% consistency
pub const fn recreational_history() -> TrainingHistory {
    TrainingHistory {
        years_running: 3.0,
        weekly_km: 35.0,
        consistency: 0.7,
    }
}

/// Series with the given intensities and lactates; heart rate climbs 8 bpm per stage
pub fn curve(intensities: &[f64], lactates: &[f64]) -> Vec<LactateDataPoint> {
    intensities
        .iter()
        .zip(lactates)
        .zip((130_u16..).step_by(8))
        .map(|((&intensity, &lactate), heart_rate)| {
            LactateDataPoint::new(intensity, lactate, heart_rate)
        })
        .collect()
}
