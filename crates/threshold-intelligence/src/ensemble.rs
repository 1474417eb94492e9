// ABOUTME: Threshold detection ensemble reconciling log-log and baseline-plus LT1 estimates
// ABOUTME: Profile-aware reconciliation, D-max merge slot for LT2, OBLA fallback, structured diagnostics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Threshold Detection Ensemble
//!
//! Runs the full pipeline for one lactate test:
//!
//! 1. Startle filter ([`CurvePreprocessor`])
//! 2. Profile classification ([`ProfileClassifier`])
//! 3. LT1 by segmented log-log regression and by baseline-plus-delta
//! 4. Profile-aware reconciliation of the two LT1 estimates
//! 5. LT2 by OBLA interpolation, replaced when a D-max result is merged
//!
//! ## LT1 reconciliation
//!
//! For `ELITE_FLAT` curves baseline-plus is unreliable on its own, so the two
//! methods are cross-checked. When they agree within the tolerance the
//! log-log value is used unchanged. When they disagree the lower-intensity
//! estimate wins, with its confidence capped at MEDIUM. For other profiles
//! baseline-plus is preferred and log-log is the fallback.
//!
//! Every decision is recorded in [`EnsembleResult::diagnostics`].

use crate::algorithms::{BaselinePlusDetector, LogLogDetector, ThresholdMethod, ThresholdResult};
use crate::config::ThresholdConfig;
use crate::preprocessing::CurvePreprocessor;
use crate::profile_classifier::{AthleteProfile, ProfileClassifier, ProfileType};
use serde::{Deserialize, Serialize};
use threshold_core::constants::lactate::OBLA_MMOL;
use threshold_core::errors::{AppError, AppResult};
use threshold_core::models::{ensure_strictly_increasing, ConfidenceLevel, LactateDataPoint};
use tracing::{debug, info};

/// Kind of decision recorded while analyzing a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    /// First reading replaced by the startle filter
    StartleCorrected,
    /// Curve profile assigned
    ProfileClassified,
    /// Log-log regression found no acceptable break
    LogLogUnavailable,
    /// Both LT1 methods agree
    MethodsAgree,
    /// LT1 methods disagree; lower estimate used
    MethodsDisagree,
    /// Only one LT1 method produced a value
    SingleMethod,
    /// No LT1 could be located
    NoLt1,
    /// LT2 interpolated at 4.0 mmol/L
    OblaInterpolated,
    /// Curve never reaches 4.0 mmol/L
    OblaNotReached,
    /// External D-max result merged as LT2
    DmaxMerged,
    /// LT1 at or above D-max intensity
    Lt1AboveDmax,
}

/// A recorded ensemble decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Decision kind
    pub kind: DiagnosticKind,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Raw output of every method
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodResults {
    /// Segmented log-log regression
    pub log_log: Option<ThresholdResult>,
    /// Baseline-plus-delta
    pub baseline_plus: Option<ThresholdResult>,
    /// D-max, supplied by an external collaborator
    pub dmax: Option<ThresholdResult>,
}

/// Reconciled thresholds for one lactate test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    /// First lactate threshold
    pub lt1: Option<ThresholdResult>,
    /// Second lactate threshold
    pub lt2: Option<ThresholdResult>,
    /// Curve profile
    pub profile: AthleteProfile,
    /// Raw per-method results
    pub methods: MethodResults,
    /// Decisions taken while reconciling
    pub diagnostics: Vec<Diagnostic>,
}

impl EnsembleResult {
    /// Merge a D-max threshold computed elsewhere
    ///
    /// D-max becomes LT2 and is kept under `methods.dmax`. When LT1 sits at or
    /// above the D-max intensity the two cannot both be right, so LT1 is
    /// capped to LOW confidence and the conflict is recorded.
    #[must_use]
    pub fn merge_dmax(mut self, dmax: ThresholdResult) -> Self {
        let dmax = ThresholdResult {
            method: ThresholdMethod::Dmax,
            ..dmax
        };

        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::DmaxMerged,
            format!("D-max LT2 at {:.2}", dmax.intensity),
        ));

        if let Some(lt1) = self.lt1.filter(|lt1| lt1.intensity >= dmax.intensity) {
            self.lt1 = Some(lt1.downgrade(ConfidenceLevel::Low));
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::Lt1AboveDmax,
                format!(
                    "LT1 at {:.2} is not below D-max at {:.2}; LT1 confidence capped to LOW",
                    lt1.intensity, dmax.intensity
                ),
            ));
        }

        self.methods.dmax = Some(dmax);
        self.lt2 = Some(dmax);
        self
    }

    /// Whether a diagnostic of `kind` was recorded
    #[must_use]
    pub fn has_diagnostic(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }
}

/// Threshold detection ensemble
#[derive(Debug, Clone, Copy)]
pub struct ThresholdEnsemble {
    preprocessor: CurvePreprocessor,
    classifier: ProfileClassifier,
    log_log: LogLogDetector,
    baseline_plus: BaselinePlusDetector,
    agreement_tolerance: f64,
}

impl Default for ThresholdEnsemble {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdEnsemble {
    /// Ensemble using the global configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ThresholdConfig::global())
    }

    /// Ensemble using an explicit configuration
    #[must_use]
    pub const fn with_config(config: &ThresholdConfig) -> Self {
        Self {
            preprocessor: CurvePreprocessor::with_config(config),
            classifier: ProfileClassifier::with_config(config),
            log_log: LogLogDetector::with_config(config),
            baseline_plus: BaselinePlusDetector::with_config(config),
            agreement_tolerance: config.detection.agreement_tolerance,
        }
    }

    /// Analyze one lactate test
    ///
    /// # Errors
    ///
    /// Returns `AppError::InsufficientData` for an empty series and
    /// `AppError::InvalidInput` when intensity is not strictly increasing.
    pub fn analyze(&self, points: &[LactateDataPoint]) -> AppResult<EnsembleResult> {
        if points.is_empty() {
            return Err(AppError::insufficient_data(1, 0));
        }
        ensure_strictly_increasing(points)?;

        let mut diagnostics = Vec::new();

        let curve = self.preprocessor.apply(points);
        if curve.startle_corrected {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::StartleCorrected,
                format!(
                    "first reading {:.2} mmol/L replaced by {:.2} mmol/L",
                    points[0].lactate, curve.points[0].lactate
                ),
            ));
        }

        let profile = self.classifier.classify(&curve.points);
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::ProfileClassified,
            format!(
                "{} (baseline {:.2} mmol/L, slope {:.3})",
                profile.profile_type, profile.baseline_avg, profile.baseline_slope
            ),
        ));

        let log_log = self.log_log.detect(&curve.points, profile.profile_type);
        if log_log.is_none() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::LogLogUnavailable,
                "log-log regression found no break (too few points or no steepening)",
            ));
        }
        let baseline_plus = self.baseline_plus.detect(&curve.points, &profile);

        let lt1 = self.reconcile(
            profile.profile_type,
            log_log,
            baseline_plus,
            &mut diagnostics,
        );
        let lt2 = interpolate_obla(&curve.points, profile.profile_type, &mut diagnostics);

        info!(
            profile = %profile.profile_type,
            lt1 = lt1.map(|t| t.intensity),
            lt2 = lt2.map(|t| t.intensity),
            "lactate test analyzed"
        );

        Ok(EnsembleResult {
            lt1,
            lt2,
            profile,
            methods: MethodResults {
                log_log,
                baseline_plus,
                dmax: None,
            },
            diagnostics,
        })
    }

    fn reconcile(
        &self,
        profile_type: ProfileType,
        log_log: Option<ThresholdResult>,
        baseline_plus: Option<ThresholdResult>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ThresholdResult> {
        let lt1 = match (profile_type, log_log, baseline_plus) {
            (ProfileType::EliteFlat, Some(ll), Some(bp)) => {
                let gap = (ll.intensity - bp.intensity).abs();
                if gap <= self.agreement_tolerance {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MethodsAgree,
                        format!("log-log and baseline-plus within {gap:.2}; using log-log"),
                    ));
                    ll
                } else {
                    let lower = if ll.intensity <= bp.intensity { ll } else { bp };
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MethodsDisagree,
                        format!(
                            "log-log {:.2} vs baseline-plus {:.2}; lower ({}) capped at MEDIUM",
                            ll.intensity, bp.intensity, lower.method
                        ),
                    ));
                    lower.downgrade(ConfidenceLevel::Medium)
                }
            }
            (ProfileType::EliteFlat, Some(only), None)
            | (ProfileType::EliteFlat, None, Some(only)) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::SingleMethod,
                    format!("only {} available", only.method),
                ));
                only
            }
            (_, _, Some(bp)) => bp,
            (_, Some(ll), None) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::SingleMethod,
                    "baseline-plus unavailable; using log-log",
                ));
                ll
            }
            (_, None, None) => {
                diagnostics.push(Diagnostic::new(DiagnosticKind::NoLt1, "no LT1 located"));
                return None;
            }
        };

        debug!(
            intensity = lt1.intensity,
            method = %lt1.method,
            confidence = %lt1.confidence,
            "LT1 reconciled"
        );
        Some(lt1)
    }
}

/// LT2 at 4.0 mmol/L by linear interpolation between the bracketing stages
fn interpolate_obla(
    points: &[LactateDataPoint],
    profile_type: ProfileType,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ThresholdResult> {
    let bracket = points
        .windows(2)
        .find(|pair| pair[0].lactate < OBLA_MMOL && pair[1].lactate >= OBLA_MMOL);

    let Some(pair) = bracket else {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::OblaNotReached,
            "curve does not cross 4.0 mmol/L from below; no LT2 estimate",
        ));
        return None;
    };

    let (low, high) = (pair[0], pair[1]);
    let fraction = (OBLA_MMOL - low.lactate) / (high.lactate - low.lactate);
    let intensity = (high.intensity - low.intensity).mul_add(fraction, low.intensity);
    let heart_rate = (f64::from(high.heart_rate) - f64::from(low.heart_rate))
        .mul_add(fraction, f64::from(low.heart_rate))
        .round() as u16;

    diagnostics.push(Diagnostic::new(
        DiagnosticKind::OblaInterpolated,
        format!("LT2 interpolated at 4.0 mmol/L: {intensity:.2}"),
    ));

    Some(ThresholdResult {
        intensity,
        lactate: OBLA_MMOL,
        heart_rate,
        method: ThresholdMethod::Obla,
        confidence: ConfidenceLevel::Low,
        profile_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensemble() -> ThresholdEnsemble {
        ThresholdEnsemble::with_config(&ThresholdConfig::default())
    }

    fn curve(intensities: &[f64], lactates: &[f64]) -> Vec<LactateDataPoint> {
        intensities
            .iter()
            .zip(lactates)
            .enumerate()
            .map(|(i, (&intensity, &lactate))| {
                LactateDataPoint::new(intensity, lactate, 130 + i as u16 * 10)
            })
            .collect()
    }

    #[test]
    fn test_empty_series_is_error() {
        assert!(ensemble().analyze(&[]).is_err());
    }

    #[test]
    fn test_unordered_series_is_error() {
        let points = curve(&[10.0, 12.0, 11.0, 13.0], &[1.0, 1.5, 2.0, 3.0]);
        assert!(ensemble().analyze(&points).is_err());
    }

    #[test]
    fn test_standard_prefers_baseline_plus() {
        let points = curve(
            &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
            &[1.0, 1.1, 1.2, 1.4, 2.5, 4.5, 8.0],
        );
        let result = ensemble().analyze(&points).unwrap();
        let lt1 = result.lt1.unwrap();
        assert_eq!(result.profile.profile_type, ProfileType::Standard);
        assert_eq!(lt1.method, ThresholdMethod::BaselinePlus);
        assert!((lt1.intensity - 13.0).abs() < f64::EPSILON);
        assert!(result.methods.log_log.is_some());
    }

    #[test]
    fn test_elite_flat_agreement_uses_log_log() {
        let points = curve(
            &[14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0],
            &[0.9, 0.95, 0.98, 1.0, 1.3, 2.2, 4.5],
        );
        let result = ensemble().analyze(&points).unwrap();
        let lt1 = result.lt1.unwrap();
        assert_eq!(result.profile.profile_type, ProfileType::EliteFlat);
        assert_eq!(lt1.method, ThresholdMethod::LogLog);
        assert!(result.has_diagnostic(DiagnosticKind::MethodsAgree));
    }

    #[test]
    fn test_elite_flat_disagreement_uses_lower_estimate() {
        // Early plateau step triggers baseline-plus at 13; the steep rise breaks log-log near 17
        let points = curve(
            &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0],
            &[1.0, 1.0, 1.0, 1.0, 1.4, 1.4, 1.45, 1.5, 3.0, 6.0],
        );
        let result = ensemble().analyze(&points).unwrap();
        assert_eq!(result.profile.profile_type, ProfileType::EliteFlat);

        let log_log = result.methods.log_log.unwrap();
        let baseline_plus = result.methods.baseline_plus.unwrap();
        assert!(log_log.intensity > 15.0);
        assert_eq!(baseline_plus.confidence, ConfidenceLevel::High);

        let lt1 = result.lt1.unwrap();
        assert_eq!(lt1.method, ThresholdMethod::BaselinePlus);
        assert!((lt1.intensity - 13.0).abs() < f64::EPSILON);
        assert_eq!(lt1.confidence, ConfidenceLevel::Medium);
        assert!(result.has_diagnostic(DiagnosticKind::MethodsDisagree));
        assert!(!result.has_diagnostic(DiagnosticKind::MethodsAgree));
    }

    #[test]
    fn test_disagreement_never_upgrades_confidence() {
        let at = |intensity, method, confidence| ThresholdResult {
            intensity,
            lactate: 1.2,
            heart_rate: 150,
            method,
            confidence,
            profile_type: ProfileType::EliteFlat,
        };
        let log_log = at(12.0, ThresholdMethod::LogLog, ConfidenceLevel::Low);
        let baseline_plus = at(15.0, ThresholdMethod::BaselinePlus, ConfidenceLevel::High);

        let mut diagnostics = Vec::new();
        let lt1 = ensemble()
            .reconcile(
                ProfileType::EliteFlat,
                Some(log_log),
                Some(baseline_plus),
                &mut diagnostics,
            )
            .unwrap();

        assert_eq!(lt1.method, ThresholdMethod::LogLog);
        assert_eq!(lt1.confidence, ConfidenceLevel::Low);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MethodsDisagree);
    }

    #[test]
    fn test_obla_interpolation() {
        let points = curve(&[10.0, 11.0, 12.0, 13.0], &[1.0, 2.0, 3.0, 5.0]);
        let result = ensemble().analyze(&points).unwrap();
        let lt2 = result.lt2.unwrap();
        assert_eq!(lt2.method, ThresholdMethod::Obla);
        assert_eq!(lt2.confidence, ConfidenceLevel::Low);
        assert!((lt2.intensity - 12.5).abs() < 1e-9);
        assert_eq!(lt2.heart_rate, 155);
    }

    #[test]
    fn test_merge_dmax_caps_inconsistent_lt1() {
        let points = curve(
            &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
            &[1.0, 1.1, 1.2, 1.4, 2.5, 4.5, 8.0],
        );
        let result = ensemble().analyze(&points).unwrap();
        let dmax = ThresholdResult {
            intensity: 12.5,
            lactate: 1.3,
            heart_rate: 152,
            method: ThresholdMethod::Dmax,
            confidence: ConfidenceLevel::High,
            profile_type: ProfileType::Standard,
        };

        let merged = result.merge_dmax(dmax);
        assert_eq!(merged.lt2, Some(dmax));
        assert_eq!(merged.methods.dmax, Some(dmax));
        assert_eq!(merged.lt1.unwrap().confidence, ConfidenceLevel::Low);
        assert!(merged.has_diagnostic(DiagnosticKind::Lt1AboveDmax));
    }
}
