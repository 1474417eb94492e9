// ABOUTME: Priority-based marathon pace selection across lab, race, coach, and fallback evidence
// ABOUTME: Builds the full pace selection result with training paces, zones, and consistency checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pace Selection
//!
//! A marathon pace is chosen from the best evidence available, in priority
//! order. The first [`PaceSource`] that succeeds wins; later sources are only
//! consulted to name a `secondary_source`. The chain always ends in the hard
//! default, so selection never fails.
//!
//! All other paces derive from the winning marathon and LT2 speeds, with the
//! VDOT velocity taken as LT2 / 0.88.

pub mod lt2_source;
pub mod sources;
pub mod zones;

pub use sources::{default_sources, Candidate, PaceSource, PaceSourceKind, SelectionContext};
pub use zones::{LactateZone, PaceZone, ZoneSets};

use crate::algorithms::vdot::{EasyPaceRange, TrainingPace};
use crate::algorithms::{ThresholdMethod, ThresholdResult, VdotCalculator, VdotResult};
use crate::athlete_classification::{classify_athlete, AthleteClassification};
use crate::config::{PaceSelectionConfig, ThresholdConfig};
use crate::ensemble::{EnsembleResult, ThresholdEnsemble};
use chrono::NaiveDate;
use lt2_source::{classify_lt2_source, lab_lt2_speed, lt2_lactate, Lt2Source};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sources::HardDefaultSource;
use threshold_core::constants::units::{METERS_PER_KM, MINUTES_PER_HOUR};
use threshold_core::constants::vdot::{EASY_HIGH, EASY_LOW, INTERVAL, REPETITION, THRESHOLD};
use threshold_core::models::{
    AthleteProfileInput, ConfidenceLevel, IntensityUnit, LactateTestRecord, RaceDistance,
    RacePerformance,
};
use tracing::{debug, info, warn};

/// A zone from an earlier training plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyZone {
    /// Zone number (1 = easiest)
    pub zone: u8,
    /// Lower speed (km/h)
    pub min_kmh: f64,
    /// Upper speed (km/h)
    pub max_kmh: f64,
}

/// Everything known about one athlete
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaceSelectionInput {
    /// Most recent lab lactate test
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lactate_test: Option<LactateTestRecord>,
    /// Most recent race result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<RacePerformance>,
    /// Athlete profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete: Option<AthleteProfileInput>,
    /// LT2 speed entered by a coach (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_lt2_kmh: Option<f64>,
    /// Zones from an earlier plan
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_zones: Vec<LegacyZone>,
    /// Date the race result age is measured against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Comparison of race-implied and lab-implied marathon pace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// Marathon pace from the race result (km/h)
    pub vdot_marathon_kmh: f64,
    /// Marathon pace from the lab LT2 (km/h)
    pub lactate_marathon_kmh: f64,
    /// Relative difference against the lab pace, in percent
    pub mismatch_percent: f64,
    /// Whether the mismatch is within the warning threshold
    pub consistent: bool,
}

/// Cross-checks run on the selection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResults {
    /// Race vs lab consistency, when both are available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdot_lactate_consistency: Option<ConsistencyCheck>,
}

/// Selected paces and everything used to derive them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceSelectionResult {
    /// Source the marathon pace came from
    pub primary_source: PaceSourceKind,
    /// Next source that would have succeeded, excluding the hard default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_source: Option<PaceSourceKind>,
    /// Confidence of the primary source
    pub confidence: ConfidenceLevel,
    /// Tier, percentile, and metabolic type
    pub athlete_classification: AthleteClassification,
    /// VDOT of the race result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdot_result: Option<VdotResult>,
    /// Ensemble analysis of the lab test stages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lactate_profile: Option<EnsembleResult>,
    /// Easy running band
    pub easy_pace: EasyPaceRange,
    /// Marathon pace
    pub marathon_pace: TrainingPace,
    /// Threshold (LT2) pace
    pub threshold_pace: TrainingPace,
    /// Interval pace
    pub interval_pace: TrainingPace,
    /// Repetition pace
    pub repetition_pace: TrainingPace,
    /// Daniels, Canova, and Norwegian zones
    pub zones: ZoneSets,
    /// Non-fatal issues
    pub warnings: Vec<String>,
    /// Problems that forced a fallback
    pub errors: Vec<String>,
    /// Cross-checks
    pub validation_results: ValidationResults,
}

/// Priority-chain pace selector
#[derive(Debug)]
pub struct PaceSelector {
    sources: Vec<Box<dyn PaceSource>>,
    config: PaceSelectionConfig,
    ensemble: ThresholdEnsemble,
    vdot: VdotCalculator,
}

impl Default for PaceSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl PaceSelector {
    /// Selector with the standard chain and the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Selector with the standard chain and an explicit configuration
    #[must_use]
    pub fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            sources: default_sources(),
            config: config.pace_selection,
            ensemble: ThresholdEnsemble::with_config(config),
            vdot: VdotCalculator::new(),
        }
    }

    /// Replace the priority chain
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Box<dyn PaceSource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Select paces for one athlete
    #[must_use]
    pub fn select(&self, input: &PaceSelectionInput) -> PaceSelectionResult {
        let mut warnings = Vec::new();

        let vdot_result = input.race.as_ref().and_then(|race| {
            let race = merge_athlete(race, input.athlete.as_ref());
            match self.vdot.calculate(&race, input.as_of) {
                Ok(result) => Some(result),
                Err(err) => {
                    warn!(error = %err, "race result unusable for VDOT");
                    warnings.push(format!("Race result ignored: {}", err.message));
                    None
                }
            }
        });

        let ctx = SelectionContext {
            input,
            vdot: vdot_result.as_ref(),
            config: &self.config,
        };
        let mut chain = self.sources.iter().filter_map(|source| source.try_apply(&ctx));
        let primary = chain
            .next()
            .unwrap_or_else(|| HardDefaultSource::candidate(&self.config));
        let secondary_source = chain
            .map(|candidate| candidate.source)
            .find(|kind| *kind != PaceSourceKind::HardDefault);

        info!(
            primary = %primary.source,
            secondary = ?secondary_source,
            marathon_kmh = primary.marathon_kmh,
            confidence = %primary.confidence,
            "marathon pace selected"
        );

        let lactate_profile = input
            .lactate_test
            .as_ref()
            .and_then(|record| self.lactate_profile(record, &mut warnings));

        let marathon_kmh = primary.marathon_kmh;
        let threshold_kmh = primary
            .lt2_kmh
            .unwrap_or(marathon_kmh / self.config.marathon_from_lt2);
        let vdot_velocity = threshold_kmh / THRESHOLD;

        let consistency = self.consistency_check(input, vdot_result.as_ref());
        if let Some(check) = consistency.filter(|check| !check.consistent) {
            warnings.push(format!(
                "Race-implied marathon pace ({:.2} km/h) and lab-implied pace ({:.2} km/h) differ by {:.1}%",
                check.vdot_marathon_kmh, check.lactate_marathon_kmh, check.mismatch_percent
            ));
        }

        let classification_vdot = vdot_result
            .as_ref()
            .map(|result| result.vdot)
            .or_else(|| {
                (primary.source != PaceSourceKind::HardDefault)
                    .then(|| estimate_vdot(vdot_velocity))
            });
        let athlete_classification = classify_athlete(
            classification_vdot,
            input.lactate_test.as_ref(),
            input.athlete.as_ref().and_then(|athlete| athlete.max_hr),
            self.config.hr_match_tolerance_bpm,
        );

        let lt1_kmh = lactate_profile
            .as_ref()
            .and_then(|profile| profile.lt1.as_ref())
            .filter(|_| lab_is_speed(input.lactate_test.as_ref()))
            .map(|lt1| lt1.intensity);
        let zones = ZoneSets {
            daniels: zones::daniels_zones(vdot_velocity),
            canova: zones::canova_zones(marathon_kmh),
            norwegian: zones::norwegian_zones(lt1_kmh, Some(threshold_kmh)),
        };

        let mut all_warnings = primary.warnings;
        all_warnings.append(&mut warnings);

        PaceSelectionResult {
            primary_source: primary.source,
            secondary_source,
            confidence: primary.confidence,
            athlete_classification,
            vdot_result,
            lactate_profile,
            easy_pace: EasyPaceRange {
                slow: TrainingPace::at(vdot_velocity * EASY_LOW),
                fast: TrainingPace::at(vdot_velocity * EASY_HIGH),
            },
            marathon_pace: TrainingPace::at(marathon_kmh),
            threshold_pace: TrainingPace::at(threshold_kmh),
            interval_pace: TrainingPace::at(vdot_velocity * INTERVAL),
            repetition_pace: TrainingPace::at(vdot_velocity * REPETITION),
            zones,
            warnings: all_warnings,
            errors: primary.errors,
            validation_results: ValidationResults {
                vdot_lactate_consistency: consistency,
            },
        }
    }

    /// Select paces for many athletes in parallel
    #[must_use]
    pub fn select_batch(&self, inputs: &[PaceSelectionInput]) -> Vec<PaceSelectionResult> {
        inputs.par_iter().map(|input| self.select(input)).collect()
    }

    /// Ensemble analysis of the lab stages, with a curve-derived lab LT2 merged in
    fn lactate_profile(
        &self,
        record: &LactateTestRecord,
        warnings: &mut Vec<String>,
    ) -> Option<EnsembleResult> {
        let analysis = record
            .data_points()
            .and_then(|(_, points)| self.ensemble.analyze(&points));
        let profile = match analysis {
            Ok(profile) => profile,
            Err(err) => {
                debug!(error = %err, "lactate test stages could not be analyzed");
                warnings.push(format!("Lactate curve not analyzed: {}", err.message));
                return None;
            }
        };

        let tolerance = self.config.hr_match_tolerance_bpm;
        if classify_lt2_source(record, tolerance) != Lt2Source::Dmax || !lab_is_speed(Some(record))
        {
            return Some(profile);
        }
        let dmax = record.anaerobic_threshold.and_then(|threshold| {
            Some(ThresholdResult {
                intensity: lab_lt2_speed(record, tolerance)?,
                lactate: lt2_lactate(record, tolerance)?,
                heart_rate: threshold.heart_rate?,
                method: ThresholdMethod::Dmax,
                confidence: ConfidenceLevel::High,
                profile_type: profile.profile.profile_type,
            })
        });
        Some(match dmax {
            Some(dmax) => profile.merge_dmax(dmax),
            None => profile,
        })
    }

    fn consistency_check(
        &self,
        input: &PaceSelectionInput,
        vdot: Option<&VdotResult>,
    ) -> Option<ConsistencyCheck> {
        let vdot_marathon_kmh = vdot?.equivalent(RaceDistance::Marathon)?.speed_kmh();
        let lab_kmh = lab_lt2_speed(
            input.lactate_test.as_ref()?,
            self.config.hr_match_tolerance_bpm,
        )?;
        let lactate_marathon_kmh = lab_kmh * self.config.marathon_from_lt2;
        let mismatch_percent =
            (vdot_marathon_kmh - lactate_marathon_kmh).abs() / lactate_marathon_kmh * 100.0;

        Some(ConsistencyCheck {
            vdot_marathon_kmh,
            lactate_marathon_kmh,
            mismatch_percent,
            consistent: mismatch_percent <= self.config.consistency_warning_percent,
        })
    }
}

/// Fill missing race age and gender from the athlete profile
fn merge_athlete(race: &RacePerformance, athlete: Option<&AthleteProfileInput>) -> RacePerformance {
    let mut race = race.clone();
    if let Some(athlete) = athlete {
        race.age = race.age.or(athlete.age);
        race.gender = race.gender.or(athlete.gender);
    }
    race
}

fn lab_is_speed(record: Option<&LactateTestRecord>) -> bool {
    record
        .and_then(|record| record.data_points().ok())
        .is_some_and(|(unit, _)| unit == IntensityUnit::SpeedKmh)
}

/// VDOT whose 100% velocity is `vdot_velocity_kmh`
fn estimate_vdot(vdot_velocity_kmh: f64) -> f64 {
    let meters_per_minute = vdot_velocity_kmh * METERS_PER_KM / MINUTES_PER_HOUR;
    (VdotCalculator::calculate_vo2(meters_per_minute) * 10.0).round() / 10.0
}
