// ABOUTME: Criterion benchmarks for the threshold ensemble, VDOT model, and pace selection
// ABOUTME: Measures single-test analysis cost and batch selection throughput
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the threshold engine.
//!
//! Measures the ensemble on lactate tests of increasing length, the VDOT
//! race model, and sequential vs parallel batch pace selection.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use threshold_engine::intelligence::{
    PaceSelectionInput, PaceSelector, ThresholdConfig, ThresholdEnsemble, VdotCalculator,
};
use threshold_engine::models::{
    AthleteProfileInput, LactateDataPoint, LactateStage, LactateTestRecord, RacePerformance,
};

/// Athletes per batch in the selection benchmark
const BATCH_SIZES: [usize; 3] = [10, 100, 1_000];

/// Exponential-looking lactate curve with `stages` steps of 0.5 km/h
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn generate_curve(stages: usize) -> Vec<LactateDataPoint> {
    (0..stages)
        .map(|index| {
            let step = index as f64;
            let intensity = step.mul_add(0.5, 9.0);
            let lactate = (step * 0.35).exp().mul_add(0.6, 0.5);
            let heart_rate = 130 + (index * 4) as u16;
            LactateDataPoint::new(intensity, lactate, heart_rate)
        })
        .collect()
}

/// Mixed evidence so every source in the chain gets exercised
#[allow(clippy::cast_precision_loss)]
fn generate_inputs(count: usize) -> Vec<PaceSelectionInput> {
    (0..count)
        .map(|index| {
            let spread = (index % 20) as f64;
            let stages = generate_curve(10)
                .into_iter()
                .map(|point| LactateStage::speed(point.intensity, point.heart_rate, point.lactate))
                .collect();
            PaceSelectionInput {
                lactate_test: (index % 3 == 0).then(|| LactateTestRecord {
                    stages,
                    ..LactateTestRecord::default()
                }),
                race: (index % 2 == 0)
                    .then(|| RacePerformance::from_minutes(10_000.0, spread.mul_add(1.5, 36.0))),
                athlete: Some(AthleteProfileInput {
                    max_hr: Some(190),
                    ..AthleteProfileInput::default()
                }),
                manual_lt2_kmh: (index % 5 == 0).then_some(spread.mul_add(0.1, 14.0)),
                ..PaceSelectionInput::default()
            }
        })
        .collect()
}

fn bench_ensemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("ensemble");
    let ensemble = ThresholdEnsemble::with_config(&ThresholdConfig::default());

    for stages in [6, 12, 24] {
        let curve = generate_curve(stages);
        group.throughput(Throughput::Elements(stages as u64));
        group.bench_with_input(BenchmarkId::new("analyze", stages), &curve, |b, curve| {
            b.iter(|| ensemble.analyze(black_box(curve)));
        });
    }

    group.finish();
}

fn bench_vdot(c: &mut Criterion) {
    let mut group = c.benchmark_group("vdot");
    let calculator = VdotCalculator::new();
    let race = RacePerformance::from_minutes(21_097.5, 88.0);

    group.bench_function("calculate", |b| {
        b.iter(|| calculator.calculate(black_box(&race), None));
    });
    group.bench_function("equivalent_times", |b| {
        b.iter(|| VdotCalculator::equivalent_times(black_box(50.6)));
    });

    group.finish();
}

fn bench_pace_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("pace_selection");
    let selector = PaceSelector::with_config(&ThresholdConfig::default());

    for size in BATCH_SIZES {
        let inputs = generate_inputs(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sequential", size), &inputs, |b, inputs| {
            b.iter(|| {
                inputs
                    .iter()
                    .map(|input| selector.select(black_box(input)))
                    .collect::<Vec<_>>()
            });
        });
        group.bench_with_input(BenchmarkId::new("batch", size), &inputs, |b, inputs| {
            b.iter(|| selector.select_batch(black_box(inputs)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ensemble, bench_vdot, bench_pace_selection);
criterion_main!(benches);
