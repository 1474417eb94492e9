// ABOUTME: Integration tests for priority-based pace selection and athlete classification
// ABOUTME: Covers the source chain ordering, default-OBLA detection, and the reference athlete end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use threshold_engine::intelligence::athlete_classification::{
    calculate_percentile_within_tier, MetabolicType, PerformanceTier,
};
use threshold_engine::intelligence::pace_selection::lt2_source::{classify_lt2_source, Lt2Source};
use threshold_engine::intelligence::pace_selection::sources::HardDefaultSource;
use threshold_engine::intelligence::pace_selection::{
    default_sources, Candidate, LegacyZone, PaceSource, SelectionContext,
};
use threshold_engine::intelligence::{
    PaceSelectionInput, PaceSelectionResult, PaceSelector, PaceSourceKind,
};
use threshold_engine::models::{
    AnaerobicThreshold, ConfidenceLevel, LactateStage, LactateTestRecord, RacePerformance,
    ThresholdCalculation, ThresholdUnit,
};

fn selector() -> PaceSelector {
    PaceSelector::with_config(&common::test_config())
}

/// Lab test whose recorded LT2 sits at `lt2_lactate` mmol/L, 15.0 km/h and 178 bpm
fn lab_test(lt2_lactate: f64) -> LactateTestRecord {
    LactateTestRecord {
        stages: vec![
            LactateStage::speed(12.0, 150, 1.4),
            LactateStage::speed(13.0, 160, 2.0),
            LactateStage::speed(14.0, 170, 3.0),
            LactateStage::speed(15.0, 178, lt2_lactate),
            LactateStage::speed(16.0, 186, lt2_lactate + 3.0),
        ],
        threshold_calculation: None,
        anaerobic_threshold: Some(AnaerobicThreshold {
            value: 15.0,
            unit: ThresholdUnit::KmH,
            heart_rate: Some(178),
        }),
    }
}

fn scenario_input() -> PaceSelectionInput {
    PaceSelectionInput {
        lactate_test: Some(common::scenario_test()),
        race: Some(common::scenario_race()),
        athlete: Some(common::scenario_athlete()),
        ..PaceSelectionInput::default()
    }
}

// === Reference athlete ===

#[test]
fn test_reference_athlete_end_to_end() {
    common::init_test_logging();
    let result = selector().select(&scenario_input());

    assert_eq!(result.primary_source, PaceSourceKind::RaceResultVdot);
    assert_eq!(result.confidence, ConfidenceLevel::High);
    assert!(
        (13.3..=14.1).contains(&result.marathon_pace.kmh),
        "marathon pace {}",
        result.marathon_pace.kmh
    );

    let classification = result.athlete_classification;
    assert_eq!(classification.metabolic_type, MetabolicType::FastTwitch);
    assert!((classification.max_lactate.unwrap() - 20.3).abs() < f64::EPSILON);
    assert!((classification.lt2_lactate.unwrap() - 10.2).abs() < f64::EPSILON);
    assert!((classification.lt2_to_max_ratio.unwrap() - 0.502).abs() < 0.01);
    assert_eq!(classification.tier, Some(PerformanceTier::Intermediate));

    let profile = result.lactate_profile.as_ref().unwrap();
    assert!(profile.lt2.is_some());
    assert!(result.validation_results.vdot_lactate_consistency.is_none());
    assert!(!result.warnings.is_empty());
    assert!(result.errors.is_empty());
}

#[test]
fn test_paces_and_zones_are_ordered() {
    let result = selector().select(&scenario_input());

    assert!(result.easy_pace.slow.kmh < result.easy_pace.fast.kmh);
    assert!(result.easy_pace.fast.kmh < result.marathon_pace.kmh);
    assert!(result.marathon_pace.kmh < result.threshold_pace.kmh);
    assert!(result.threshold_pace.kmh < result.interval_pace.kmh);
    assert!(result.interval_pace.kmh < result.repetition_pace.kmh);

    assert!(!result.zones.daniels.is_empty());
    assert!(!result.zones.canova.is_empty());
    assert!(!result.zones.norwegian.is_empty());
    for zone in result.zones.daniels.iter().chain(&result.zones.canova) {
        assert!(zone.min_kmh <= zone.max_kmh, "zone {} inverted", zone.name);
    }
}

// === Priority chain ===

fn evidence_combinations() -> Vec<PaceSelectionInput> {
    let labs = [None, Some(lab_test(5.2)), Some(lab_test(4.0))];
    let mut inputs = Vec::new();
    for lab in labs {
        for with_race in [false, true] {
            for with_manual in [false, true] {
                for with_zones in [false, true] {
                    inputs.push(PaceSelectionInput {
                        lactate_test: lab.clone(),
                        race: with_race.then(|| RacePerformance::from_minutes(10_000.0, 42.0)),
                        manual_lt2_kmh: with_manual.then_some(14.6),
                        legacy_zones: if with_zones {
                            vec![LegacyZone {
                                zone: 2,
                                min_kmh: 10.0,
                                max_kmh: 11.5,
                            }]
                        } else {
                            Vec::new()
                        },
                        ..PaceSelectionInput::default()
                    });
                }
            }
        }
    }
    inputs
}

/// Kinds of the default sources that produce a pace on their own, in chain order
fn succeeding_kinds(input: &PaceSelectionInput) -> Vec<PaceSourceKind> {
    default_sources()
        .into_iter()
        .filter_map(|source| {
            let kind = source.kind();
            let alone = selector().with_sources(vec![source]);
            (alone.select(input).primary_source == kind).then_some(kind)
        })
        .filter(|kind| *kind != PaceSourceKind::HardDefault)
        .collect()
}

#[test]
fn test_first_succeeding_source_wins() {
    let selector = selector();
    for input in evidence_combinations() {
        let succeeding = succeeding_kinds(&input);
        let result = selector.select(&input);

        let expected_primary = succeeding
            .first()
            .copied()
            .unwrap_or(PaceSourceKind::HardDefault);
        assert_eq!(result.primary_source, expected_primary, "input {input:?}");

        assert_eq!(
            result.secondary_source,
            succeeding.get(1).copied(),
            "input {input:?}"
        );
    }
}

#[test]
fn test_confidence_follows_priority() {
    let confidence_of = |input: PaceSelectionInput| selector().select(&input).confidence;

    let lab = confidence_of(PaceSelectionInput {
        lactate_test: Some(lab_test(5.2)),
        ..PaceSelectionInput::default()
    });
    let race = confidence_of(PaceSelectionInput {
        race: Some(RacePerformance::from_minutes(10_000.0, 42.0)),
        ..PaceSelectionInput::default()
    });
    let manual = confidence_of(PaceSelectionInput {
        manual_lt2_kmh: Some(14.6),
        ..PaceSelectionInput::default()
    });
    let obla = confidence_of(PaceSelectionInput {
        lactate_test: Some(lab_test(4.0)),
        ..PaceSelectionInput::default()
    });
    let fallback = confidence_of(PaceSelectionInput::default());

    assert_eq!(lab, ConfidenceLevel::VeryHigh);
    assert_eq!(race, ConfidenceLevel::High);
    assert_eq!(manual, ConfidenceLevel::Medium);
    assert_eq!(obla, ConfidenceLevel::Low);
    assert_eq!(fallback, ConfidenceLevel::VeryLow);
}

#[derive(Debug)]
struct FixedPace(f64);

impl PaceSource for FixedPace {
    fn kind(&self) -> PaceSourceKind {
        PaceSourceKind::ManualCoachInput
    }

    fn try_apply(&self, _ctx: &SelectionContext<'_>) -> Option<Candidate> {
        Some(Candidate {
            source: self.kind(),
            marathon_kmh: self.0,
            lt2_kmh: None,
            confidence: ConfidenceLevel::Medium,
            warnings: vec!["fixed pace".to_owned()],
            errors: Vec::new(),
        })
    }
}

#[test]
fn test_custom_chain() {
    let selector =
        selector().with_sources(vec![Box::new(FixedPace(13.5)), Box::new(HardDefaultSource)]);
    let result = selector.select(&PaceSelectionInput::default());

    assert_eq!(result.primary_source, PaceSourceKind::ManualCoachInput);
    assert_eq!(result.secondary_source, None);
    assert!((result.marathon_pace.kmh - 13.5).abs() < f64::EPSILON);
    assert!((result.threshold_pace.kmh - 15.0).abs() < 1e-9);
    assert_eq!(result.warnings, vec!["fixed pace".to_owned()]);
}

// === LT2 origin ===

#[test]
fn test_default_obla_detected_from_stage_lactate() {
    let record = lab_test(4.0);
    assert_eq!(classify_lt2_source(&record, 2), Lt2Source::Default);
    assert_ne!(classify_lt2_source(&record, 2), Lt2Source::Calculated);

    let result = selector().select(&PaceSelectionInput {
        lactate_test: Some(record),
        ..PaceSelectionInput::default()
    });
    assert_eq!(result.primary_source, PaceSourceKind::DefaultObla);
    assert!(result.warnings.len() >= 3);
}

#[test]
fn test_lt2_origin_heuristics() {
    assert_eq!(classify_lt2_source(&lab_test(5.2), 2), Lt2Source::Dmax);
    assert_eq!(classify_lt2_source(&lab_test(9.5), 2), Lt2Source::Manual);

    let tagged = LactateTestRecord {
        threshold_calculation: Some(ThresholdCalculation {
            method: Some("dmax".to_owned()),
            lt2_lactate: None,
        }),
        ..lab_test(4.0)
    };
    assert_eq!(classify_lt2_source(&tagged, 2), Lt2Source::Dmax);
}

#[test]
fn test_manual_lab_threshold_uses_coach_source() {
    let result = selector().select(&PaceSelectionInput {
        lactate_test: Some(lab_test(9.5)),
        ..PaceSelectionInput::default()
    });
    assert_eq!(result.primary_source, PaceSourceKind::ManualCoachInput);
    assert!((result.marathon_pace.kmh - 13.5).abs() < 1e-9);
}

#[test]
fn test_inconsistent_race_and_lab_warn() {
    let result = selector().select(&PaceSelectionInput {
        lactate_test: Some(lab_test(5.2)),
        race: Some(RacePerformance::from_minutes(10_000.0, 55.0)),
        ..PaceSelectionInput::default()
    });

    let check = result.validation_results.vdot_lactate_consistency.unwrap();
    assert!(!check.consistent);
    assert!(check.mismatch_percent > 10.0);
    assert!(result
        .warnings
        .iter()
        .any(|warning| warning.contains("differ")));
}

// === Classification ===

#[test]
fn test_percentile_stays_within_tier() {
    for tier in PerformanceTier::ALL {
        let band = tier.percentile_range();
        let mut vdot = 20.0;
        while vdot <= 95.0 {
            let percentile = calculate_percentile_within_tier(vdot, tier);
            assert!(
                (band.min..=band.max).contains(&percentile),
                "{tier:?} at vdot {vdot}: {percentile}"
            );
            vdot += 0.25;
        }

        let percentile = calculate_percentile_within_tier(f64::NAN, tier);
        assert!((percentile - band.min).abs() < f64::EPSILON, "{tier:?} at NaN");
    }
}

// === Batch and wire format ===

#[test]
fn test_batch_matches_individual_selection() {
    let selector = selector();
    let inputs = vec![scenario_input(), PaceSelectionInput::default()];
    let batch: Vec<PaceSelectionResult> = selector.select_batch(&inputs);

    assert_eq!(batch.len(), inputs.len());
    for (input, result) in inputs.iter().zip(&batch) {
        assert_eq!(*result, selector.select(input));
    }
}

#[test]
fn test_json_input_and_output() {
    let input: PaceSelectionInput = serde_json::from_str(
        r#"{
            "race": { "distance_meters": 21097.5, "time_minutes": 88.0, "age": 30, "gender": "male" },
            "athlete": { "max_hr": 194 }
        }"#,
    )
    .unwrap();
    let result = selector().select(&input);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["primary_source"], "RACE_RESULT_VDOT");
    assert_eq!(json["confidence"], "HIGH");
    assert!(json["marathon_pace"]["display"].is_string());
}
