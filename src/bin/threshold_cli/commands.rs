// ABOUTME: Subcommand implementations for threshold-cli
// ABOUTME: Each command loads its JSON input, runs one engine operation, and returns JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::read_json;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::path::Path;
use threshold_engine::intelligence::pace_selection::PaceSelectionInput;
use threshold_engine::intelligence::target_time::{ImprovementGoalInput, TargetTimeInput};
use threshold_engine::intelligence::{
    PaceSelector, TargetTimeEstimator, ThresholdEnsemble, ThresholdResult, VdotCalculator,
};
use threshold_engine::models::{LactateTestRecord, RacePerformance};
use tracing::info;

/// VDOT, paces, and equivalent times for a race
pub fn vdot(race_path: &Path, as_of: Option<NaiveDate>) -> Result<Value> {
    let race: RacePerformance = read_json(race_path)?;
    let result = VdotCalculator::new().calculate(&race, as_of)?;
    Ok(serde_json::to_value(result)?)
}

/// Ensemble analysis of a lab test, optionally with a D-max LT2
pub fn detect(test_path: &Path, dmax_path: Option<&Path>) -> Result<Value> {
    let record: LactateTestRecord = read_json(test_path)?;
    let (unit, points) = record.data_points()?;
    info!(stages = points.len(), unit = ?unit, "analyzing lactate test");

    let mut result = ThresholdEnsemble::new().analyze(&points)?;
    if let Some(path) = dmax_path {
        let dmax: ThresholdResult = read_json(path)?;
        result = result.merge_dmax(dmax);
    }
    Ok(serde_json::to_value(result)?)
}

/// Pace selection for one athlete or a batch
pub fn select(input_path: &Path) -> Result<Value> {
    let raw: Value = read_json(input_path)?;
    let selector = PaceSelector::new();

    if raw.is_array() {
        let inputs: Vec<PaceSelectionInput> =
            serde_json::from_value(raw).context("invalid pace selection batch")?;
        info!(athletes = inputs.len(), "running batch pace selection");
        return Ok(serde_json::to_value(selector.select_batch(&inputs))?);
    }

    let input: PaceSelectionInput =
        serde_json::from_value(raw).context("invalid pace selection input")?;
    Ok(serde_json::to_value(selector.select(&input))?)
}

/// Thresholds from a target time
pub fn target(input_path: &Path) -> Result<Value> {
    let input: TargetTimeInput = read_json(input_path)?;
    let estimate = TargetTimeEstimator::new().estimate_from_target_time(&input)?;
    Ok(serde_json::to_value(estimate)?)
}

/// Thresholds from a PB and goal, or the goal rejection
pub fn improve(input_path: &Path) -> Result<Value> {
    let input: ImprovementGoalInput = read_json(input_path)?;
    let outcome = TargetTimeEstimator::new().estimate_from_personal_best(&input)?;
    Ok(serde_json::to_value(outcome)?)
}
