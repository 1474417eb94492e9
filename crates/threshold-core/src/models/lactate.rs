// ABOUTME: Lactate step-test models: data points, stage records, and threshold summaries
// ABOUTME: Normalizes speed/power/pace stages into ascending-intensity series for detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::{MINUTES_PER_HOUR, SECONDS_PER_HOUR};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A single stage of a lactate step test
///
/// `intensity` is always "higher = harder": km/h for running, watts for
/// cycling. Pace-based tests are converted to km/h before they reach the
/// detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LactateDataPoint {
    /// Stage intensity (km/h or W)
    pub intensity: f64,
    /// Blood lactate at the end of the stage (mmol/L)
    pub lactate: f64,
    /// Heart rate at the end of the stage (bpm)
    pub heart_rate: u16,
}

impl LactateDataPoint {
    /// Create a data point
    #[must_use]
    pub const fn new(intensity: f64, lactate: f64, heart_rate: u16) -> Self {
        Self {
            intensity,
            lactate,
            heart_rate,
        }
    }
}

/// Unit of the intensity axis after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityUnit {
    /// Running speed in km/h (pace tests are converted to this)
    SpeedKmh,
    /// Power in watts
    PowerWatts,
}

/// Raw stage as recorded by the lab: exactly one of speed, power, or pace
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LactateStage {
    /// Treadmill speed (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Ergometer power (W)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Pace in seconds per kilometer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    /// Blood lactate (mmol/L)
    pub lactate: f64,
    /// Heart rate (bpm)
    pub heart_rate: u16,
}

impl LactateStage {
    /// Running-speed stage
    #[must_use]
    pub const fn speed(speed_kmh: f64, heart_rate: u16, lactate: f64) -> Self {
        Self {
            speed: Some(speed_kmh),
            power: None,
            pace: None,
            lactate,
            heart_rate,
        }
    }

    fn normalized(&self) -> Option<(IntensityUnit, f64)> {
        if let Some(speed) = self.speed {
            return Some((IntensityUnit::SpeedKmh, speed));
        }
        if let Some(power) = self.power {
            return Some((IntensityUnit::PowerWatts, power));
        }
        self.pace
            .filter(|pace| *pace > 0.0)
            .map(|pace| (IntensityUnit::SpeedKmh, SECONDS_PER_HOUR / pace))
    }

    /// Stage speed in km/h, if this is a running stage
    #[must_use]
    pub fn speed_kmh(&self) -> Option<f64> {
        match self.normalized() {
            Some((IntensityUnit::SpeedKmh, kmh)) => Some(kmh),
            _ => None,
        }
    }
}

/// Unit of a recorded anaerobic threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdUnit {
    /// Speed in km/h
    #[serde(rename = "km/h")]
    KmH,
    /// Pace in decimal minutes per km
    #[serde(rename = "min/km")]
    MinPerKm,
    /// Power in watts
    #[serde(rename = "watt")]
    Watt,
}

/// Anaerobic threshold summary stored with a lab test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnaerobicThreshold {
    /// Threshold value in `unit`
    pub value: f64,
    /// Unit of `value`
    pub unit: ThresholdUnit,
    /// Heart rate at threshold (bpm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u16>,
}

impl AnaerobicThreshold {
    /// Threshold as running speed in km/h
    ///
    /// Watt thresholds have no pace equivalent and return 0.0; callers must
    /// treat 0.0 as unusable.
    #[must_use]
    pub fn speed_kmh(&self) -> f64 {
        match self.unit {
            ThresholdUnit::KmH => self.value,
            ThresholdUnit::MinPerKm if self.value > 0.0 => MINUTES_PER_HOUR / self.value,
            ThresholdUnit::MinPerKm | ThresholdUnit::Watt => 0.0,
        }
    }
}

/// Prior threshold calculation attached to a test
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdCalculation {
    /// Method tag written by whatever produced the threshold (e.g. `DMAX`, `MANUAL`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Lactate at LT2 (mmol/L)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt2_lactate: Option<f64>,
}

/// A complete lab test as handed over by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LactateTestRecord {
    /// Stages in the order they were run
    pub stages: Vec<LactateStage>,
    /// Previously computed threshold, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_calculation: Option<ThresholdCalculation>,
    /// Recorded anaerobic threshold, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anaerobic_threshold: Option<AnaerobicThreshold>,
}

impl LactateTestRecord {
    /// Normalize the stages into an ascending-intensity series
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if a stage has no intensity, if the
    /// test mixes power and speed stages, or if intensity is not strictly
    /// increasing.
    pub fn data_points(&self) -> AppResult<(IntensityUnit, Vec<LactateDataPoint>)> {
        let mut unit = None;
        let mut points = Vec::with_capacity(self.stages.len());

        for (index, stage) in self.stages.iter().enumerate() {
            let (stage_unit, intensity) = stage.normalized().ok_or_else(|| {
                AppError::invalid_input(format!("stage {index} has no speed, power, or pace"))
            })?;

            match unit {
                None => unit = Some(stage_unit),
                Some(existing) if existing != stage_unit => {
                    return Err(AppError::invalid_input(
                        "test mixes power and speed stages",
                    ));
                }
                Some(_) => {}
            }

            points.push(LactateDataPoint::new(intensity, stage.lactate, stage.heart_rate));
        }

        ensure_strictly_increasing(&points)?;
        Ok((unit.unwrap_or(IntensityUnit::SpeedKmh), points))
    }

    /// Stage whose heart rate is within `tolerance` bpm of `heart_rate`
    ///
    /// The closest match wins when several stages qualify.
    #[must_use]
    pub fn stage_at_heart_rate(&self, heart_rate: u16, tolerance: u16) -> Option<&LactateStage> {
        self.stages
            .iter()
            .filter(|stage| stage.heart_rate.abs_diff(heart_rate) <= tolerance)
            .min_by_key(|stage| stage.heart_rate.abs_diff(heart_rate))
    }

    /// Highest lactate recorded in the test
    #[must_use]
    pub fn max_lactate(&self) -> Option<f64> {
        self.stages
            .iter()
            .map(|stage| stage.lactate)
            .reduce(f64::max)
    }
}

/// Verify a series is ordered by strictly increasing intensity
///
/// # Errors
///
/// Returns `AppError::InvalidInput` naming the first offending stage.
pub fn ensure_strictly_increasing(points: &[LactateDataPoint]) -> AppResult<()> {
    for (index, pair) in points.windows(2).enumerate() {
        if pair[1].intensity <= pair[0].intensity {
            return Err(AppError::invalid_input(format!(
                "intensity must be strictly increasing: stage {} ({:.2}) <= stage {index} ({:.2})",
                index + 1,
                pair[1].intensity,
                pair[0].intensity
            )));
        }
    }
    Ok(())
}
