// ABOUTME: Priority-ordered marathon pace sources: lab D-max, race VDOT, coach, OBLA, legacy zones, default
// ABOUTME: Each source is a PaceSource strategy that either yields a candidate pace or declines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lt2_source::{classify_lt2_source, lab_lt2_speed, Lt2Source};
use super::PaceSelectionInput;
use crate::algorithms::VdotResult;
use crate::config::PaceSelectionConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use threshold_core::models::{ConfidenceLevel, RaceDistance};
use tracing::debug;

/// Evidence a marathon pace was derived from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaceSourceKind {
    /// Curve-derived LT2 from a lab lactate test
    LactateTestDmax,
    /// Equivalent marathon time from a race result
    RaceResultVdot,
    /// LT2 entered by a coach
    ManualCoachInput,
    /// LT2 at the fixed 4.0 mmol/L convention
    DefaultObla,
    /// Midpoint of a recorded zone 2 band
    LegacyZones,
    /// Fixed fallback pace
    HardDefault,
}

impl PaceSourceKind {
    /// Upper-case tag as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LactateTestDmax => "LACTATE_TEST_DMAX",
            Self::RaceResultVdot => "RACE_RESULT_VDOT",
            Self::ManualCoachInput => "MANUAL_COACH_INPUT",
            Self::DefaultObla => "DEFAULT_OBLA",
            Self::LegacyZones => "LEGACY_ZONES",
            Self::HardDefault => "HARD_DEFAULT",
        }
    }
}

impl fmt::Display for PaceSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pace proposed by a source
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Source that produced the pace
    pub source: PaceSourceKind,
    /// Marathon pace (km/h)
    pub marathon_kmh: f64,
    /// LT2 speed (km/h), when the source knows it
    pub lt2_kmh: Option<f64>,
    /// Confidence in the pace
    pub confidence: ConfidenceLevel,
    /// Warnings to surface if this candidate wins
    pub warnings: Vec<String>,
    /// Errors to surface if this candidate wins
    pub errors: Vec<String>,
}

impl Candidate {
    fn new(source: PaceSourceKind, marathon_kmh: f64, confidence: ConfidenceLevel) -> Self {
        Self {
            source,
            marathon_kmh,
            lt2_kmh: None,
            confidence,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn from_lt2(
        source: PaceSourceKind,
        lt2_kmh: f64,
        config: &PaceSelectionConfig,
        confidence: ConfidenceLevel,
    ) -> Self {
        Self {
            lt2_kmh: Some(lt2_kmh),
            ..Self::new(source, lt2_kmh * config.marathon_from_lt2, confidence)
        }
    }
}

/// Inputs shared by every source during one selection
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Caller inputs
    pub input: &'a PaceSelectionInput,
    /// VDOT of the race result, if it could be computed
    pub vdot: Option<&'a VdotResult>,
    /// Pace selection settings
    pub config: &'a PaceSelectionConfig,
}

impl SelectionContext<'_> {
    /// Lab LT2 speed when the lab test's LT2 has the given origin
    fn lab_lt2_with(&self, accept: impl Fn(Lt2Source) -> bool) -> Option<f64> {
        let record = self.input.lactate_test.as_ref()?;
        record.anaerobic_threshold?;
        let tolerance = self.config.hr_match_tolerance_bpm;
        let source = classify_lt2_source(record, tolerance);
        if !accept(source) {
            return None;
        }
        lab_lt2_speed(record, tolerance)
    }
}

/// A step of the pace priority chain
pub trait PaceSource: Send + Sync + fmt::Debug {
    /// Which evidence this source uses
    fn kind(&self) -> PaceSourceKind;

    /// Propose a pace, or decline when the evidence is missing or unusable
    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate>;
}

/// Curve-derived (D-max or calculated) LT2 from a lab test
#[derive(Debug, Clone, Copy, Default)]
pub struct LactateTestDmaxSource;

impl PaceSource for LactateTestDmaxSource {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::LactateTestDmax
    }

    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate> {
        let lt2_kmh = ctx.lab_lt2_with(Lt2Source::is_curve_derived)?;
        Some(Candidate::from_lt2(
            self.kind(),
            lt2_kmh,
            ctx.config,
            ConfidenceLevel::VeryHigh,
        ))
    }
}

/// Marathon pace from the equivalent marathon time of a race result
#[derive(Debug, Clone, Copy, Default)]
pub struct RaceResultVdotSource;

impl PaceSource for RaceResultVdotSource {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::RaceResultVdot
    }

    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate> {
        let vdot = ctx.vdot?;
        let marathon_kmh = vdot.equivalent(RaceDistance::Marathon)?.speed_kmh();
        if !(ctx.config.min_marathon_kmh..=ctx.config.max_marathon_kmh).contains(&marathon_kmh) {
            debug!(marathon_kmh, "race-derived marathon pace outside plausible bounds");
            return None;
        }

        let mut candidate = Candidate::new(self.kind(), marathon_kmh, ConfidenceLevel::High);
        candidate.lt2_kmh = Some(vdot.training_paces.threshold.kmh);
        if ctx.input.lactate_test.is_some() {
            candidate.warnings.push(
                "Lactate test supplied but no curve-derived LT2 could be used; pace derived from race result"
                    .to_owned(),
            );
        }
        Some(candidate)
    }
}

/// LT2 entered by a coach, or a lab LT2 recorded as manual
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualCoachInputSource;

impl PaceSource for ManualCoachInputSource {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::ManualCoachInput
    }

    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate> {
        let lt2_kmh = ctx
            .input
            .manual_lt2_kmh
            .filter(|kmh| *kmh > 0.0)
            .or_else(|| ctx.lab_lt2_with(|source| source == Lt2Source::Manual))?;
        Some(Candidate::from_lt2(
            self.kind(),
            lt2_kmh,
            ctx.config,
            ConfidenceLevel::Medium,
        ))
    }
}

/// Lab LT2 that is the 4.0 mmol/L convention rather than a curve analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOblaSource;

impl PaceSource for DefaultOblaSource {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::DefaultObla
    }

    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate> {
        let lt2_kmh = ctx.lab_lt2_with(|source| source == Lt2Source::Default)?;
        let mut candidate =
            Candidate::from_lt2(self.kind(), lt2_kmh, ctx.config, ConfidenceLevel::Low);
        candidate.warnings.extend([
            "LT2 is the fixed 4.0 mmol/L OBLA convention, not derived from the athlete's curve"
                .to_owned(),
            "OBLA overestimates threshold for low lactate producers and underestimates it for glycolytic athletes"
                .to_owned(),
            "Re-analyze the test with D-max or provide a recent race result".to_owned(),
        ]);
        Some(candidate)
    }
}

/// Midpoint of a previously recorded zone 2
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyZonesSource;

impl PaceSource for LegacyZonesSource {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::LegacyZones
    }

    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate> {
        let zone = ctx.input.legacy_zones.iter().find(|zone| zone.zone == 2)?;
        let midpoint = (zone.min_kmh + zone.max_kmh) / 2.0;
        if midpoint <= 0.0 {
            return None;
        }

        let mut candidate = Candidate::new(self.kind(), midpoint, ConfidenceLevel::Low);
        candidate.warnings.push(
            "Pace derived from legacy training zones; less precise than a lactate test or race result"
                .to_owned(),
        );
        Some(candidate)
    }
}

/// Fixed marathon pace used when nothing else applies
#[derive(Debug, Clone, Copy, Default)]
pub struct HardDefaultSource;

impl HardDefaultSource {
    /// The default candidate; never fails
    #[must_use]
    pub fn candidate(config: &PaceSelectionConfig) -> Candidate {
        let mut candidate = Candidate::new(
            PaceSourceKind::HardDefault,
            config.hard_default_marathon_kmh,
            ConfidenceLevel::VeryLow,
        );
        candidate.errors.push(format!(
            "No usable threshold source; using default marathon pace of {:.1} km/h",
            config.hard_default_marathon_kmh
        ));
        candidate
    }
}

impl PaceSource for HardDefaultSource {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::HardDefault
    }

    fn try_apply(&self, ctx: &SelectionContext<'_>) -> Option<Candidate> {
        Some(Self::candidate(ctx.config))
    }
}

/// The standard six-step chain, highest priority first
#[must_use]
pub fn default_sources() -> Vec<Box<dyn PaceSource>> {
    vec![
        Box::new(LactateTestDmaxSource),
        Box::new(RaceResultVdotSource),
        Box::new(ManualCoachInputSource),
        Box::new(DefaultOblaSource),
        Box::new(LegacyZonesSource),
        Box::new(HardDefaultSource),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdConfig;
    use crate::pace_selection::LegacyZone;
    use threshold_core::models::{
        AnaerobicThreshold, LactateStage, LactateTestRecord, ThresholdCalculation, ThresholdUnit,
    };

    fn config() -> PaceSelectionConfig {
        ThresholdConfig::default().pace_selection
    }

    fn lab_input(method: &str) -> PaceSelectionInput {
        PaceSelectionInput {
            lactate_test: Some(LactateTestRecord {
                stages: vec![
                    LactateStage::speed(12.0, 150, 1.5),
                    LactateStage::speed(14.0, 165, 3.0),
                    LactateStage::speed(16.0, 178, 6.0),
                ],
                threshold_calculation: Some(ThresholdCalculation {
                    method: Some(method.to_owned()),
                    lt2_lactate: None,
                }),
                anaerobic_threshold: Some(AnaerobicThreshold {
                    value: 15.0,
                    unit: ThresholdUnit::KmH,
                    heart_rate: Some(172),
                }),
            }),
            ..PaceSelectionInput::default()
        }
    }

    #[test]
    fn test_dmax_source_applies_marathon_fraction() {
        let input = lab_input("DMAX");
        let config = config();
        let ctx = SelectionContext {
            input: &input,
            vdot: None,
            config: &config,
        };
        let candidate = LactateTestDmaxSource.try_apply(&ctx).unwrap();
        assert!((candidate.marathon_kmh - 13.5).abs() < 1e-9);
        assert_eq!(candidate.confidence, ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn test_dmax_source_declines_default_lt2() {
        let input = lab_input("DEFAULT");
        let config = config();
        let ctx = SelectionContext {
            input: &input,
            vdot: None,
            config: &config,
        };
        assert!(LactateTestDmaxSource.try_apply(&ctx).is_none());
        let candidate = DefaultOblaSource.try_apply(&ctx).unwrap();
        assert_eq!(candidate.warnings.len(), 3);
        assert_eq!(candidate.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_manual_input_takes_precedence_over_lab_manual() {
        let mut input = lab_input("MANUAL");
        input.manual_lt2_kmh = Some(14.0);
        let config = config();
        let ctx = SelectionContext {
            input: &input,
            vdot: None,
            config: &config,
        };
        let candidate = ManualCoachInputSource.try_apply(&ctx).unwrap();
        assert_eq!(candidate.lt2_kmh, Some(14.0));
        assert_eq!(candidate.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_legacy_zone_midpoint() {
        let input = PaceSelectionInput {
            legacy_zones: vec![
                LegacyZone {
                    zone: 1,
                    min_kmh: 8.0,
                    max_kmh: 10.0,
                },
                LegacyZone {
                    zone: 2,
                    min_kmh: 10.0,
                    max_kmh: 12.0,
                },
            ],
            ..PaceSelectionInput::default()
        };
        let config = config();
        let ctx = SelectionContext {
            input: &input,
            vdot: None,
            config: &config,
        };
        let candidate = LegacyZonesSource.try_apply(&ctx).unwrap();
        assert!((candidate.marathon_kmh - 11.0).abs() < f64::EPSILON);
        assert_eq!(candidate.warnings.len(), 1);
    }

    #[test]
    fn test_hard_default_records_error() {
        let candidate = HardDefaultSource::candidate(&config());
        assert!((candidate.marathon_kmh - 12.0).abs() < f64::EPSILON);
        assert_eq!(candidate.confidence, ConfidenceLevel::VeryLow);
        assert_eq!(candidate.errors.len(), 1);
    }
}
