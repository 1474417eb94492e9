// ABOUTME: Athlete performance tier, percentile within tier, and lactate-derived metabolic type
// ABOUTME: Tiers come from VDOT; metabolic type from the LT2-to-peak lactate ratio of a lab test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Athlete Classification
//!
//! ## Performance tiers
//!
//! | Tier | VDOT | Population percentile |
//! |------|------|-----------------------|
//! | Beginner | 25-40 | 0-30 |
//! | Recreational | 40-50 | 30-60 |
//! | Intermediate | 50-60 | 60-85 |
//! | Advanced | 60-70 | 85-97 |
//! | Elite | 70-90 | 97-99.9 |
//!
//! ## Metabolic type
//!
//! Athletes with a large glycolytic capacity reach high peak lactate and sit
//! at a high fraction of it at LT2. Oxidative athletes peak lower and cross
//! LT2 at a small fraction of their peak.

use crate::pace_selection::lt2_source;
use serde::{Deserialize, Serialize};
use threshold_core::constants::pace_selection::LT2_FRACTION_OF_MAX_HR;
use threshold_core::models::LactateTestRecord;

/// Peak lactate at or above which an athlete is glycolytic regardless of ratio
const FAST_TWITCH_MIN_PEAK: f64 = 12.0;
/// LT2/peak ratio at or above which an athlete is glycolytic
const FAST_TWITCH_MIN_RATIO: f64 = 0.45;
/// Peak lactate below which an athlete can be oxidative
const SLOW_TWITCH_MAX_PEAK: f64 = 8.0;
/// LT2/peak ratio at or below which an athlete can be oxidative
const SLOW_TWITCH_MAX_RATIO: f64 = 0.30;

/// Closed numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl TierRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Performance tier by VDOT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceTier {
    /// VDOT 25-40
    Beginner,
    /// VDOT 40-50
    Recreational,
    /// VDOT 50-60
    Intermediate,
    /// VDOT 60-70
    Advanced,
    /// VDOT 70-90
    Elite,
}

impl PerformanceTier {
    /// All tiers, slowest first
    pub const ALL: [Self; 5] = [
        Self::Beginner,
        Self::Recreational,
        Self::Intermediate,
        Self::Advanced,
        Self::Elite,
    ];

    /// VDOT range of the tier
    #[must_use]
    pub const fn vdot_range(self) -> TierRange {
        match self {
            Self::Beginner => TierRange::new(25.0, 40.0),
            Self::Recreational => TierRange::new(40.0, 50.0),
            Self::Intermediate => TierRange::new(50.0, 60.0),
            Self::Advanced => TierRange::new(60.0, 70.0),
            Self::Elite => TierRange::new(70.0, 90.0),
        }
    }

    /// Population percentile band of the tier
    #[must_use]
    pub const fn percentile_range(self) -> TierRange {
        match self {
            Self::Beginner => TierRange::new(0.0, 30.0),
            Self::Recreational => TierRange::new(30.0, 60.0),
            Self::Intermediate => TierRange::new(60.0, 85.0),
            Self::Advanced => TierRange::new(85.0, 97.0),
            Self::Elite => TierRange::new(97.0, 99.9),
        }
    }

    /// Tier for a VDOT; `None` outside 25-90
    ///
    /// Boundary values belong to the higher tier.
    #[must_use]
    pub fn from_vdot(vdot: f64) -> Option<Self> {
        Self::ALL.into_iter().rev().find(|tier| {
            let range = tier.vdot_range();
            vdot >= range.min && vdot <= range.max
        })
    }
}

/// Percentile of `vdot` within its tier's population band
///
/// Linear in VDOT across the tier and always clamped into the tier's
/// percentile band. A non-finite VDOT reports the bottom of the band.
#[must_use]
pub fn calculate_percentile_within_tier(vdot: f64, tier: PerformanceTier) -> f64 {
    let vdot_range = tier.vdot_range();
    let band = tier.percentile_range();
    if !vdot.is_finite() {
        return band.min;
    }
    let position = (vdot - vdot_range.min) / (vdot_range.max - vdot_range.min);
    let percentile = (band.max - band.min).mul_add(position, band.min);
    percentile.clamp(band.min, band.max)
}

/// Dominant fibre profile inferred from the lactate curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetabolicType {
    /// Glycolytic: high peak lactate, LT2 at a high fraction of peak
    FastTwitch,
    /// Oxidative: low peak lactate, LT2 at a small fraction of peak
    SlowTwitch,
    /// Neither pattern dominates
    Mixed,
    /// No lab data
    Unknown,
}

impl MetabolicType {
    /// Classify from peak lactate and the LT2/peak ratio
    #[must_use]
    pub fn classify(max_lactate: f64, lt2_ratio: f64) -> Self {
        if max_lactate >= FAST_TWITCH_MIN_PEAK || lt2_ratio >= FAST_TWITCH_MIN_RATIO {
            Self::FastTwitch
        } else if max_lactate < SLOW_TWITCH_MAX_PEAK && lt2_ratio <= SLOW_TWITCH_MAX_RATIO {
            Self::SlowTwitch
        } else {
            Self::Mixed
        }
    }
}

/// Classification attached to a pace selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AthleteClassification {
    /// Performance tier, when a VDOT is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<PerformanceTier>,
    /// Percentile within the tier's band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    /// Metabolic type
    pub metabolic_type: MetabolicType,
    /// Peak lactate of the test (mmol/L)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lactate: Option<f64>,
    /// Lactate at LT2 (mmol/L)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt2_lactate: Option<f64>,
    /// LT2 lactate as a fraction of peak
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt2_to_max_ratio: Option<f64>,
}

/// Lactate at LT2 for classification purposes
///
/// The lab's LT2 when it can be resolved, otherwise the stage whose heart
/// rate is closest to 90% of maximum heart rate.
#[must_use]
pub fn classification_lt2_lactate(
    record: &LactateTestRecord,
    max_hr: Option<u16>,
    hr_tolerance: u16,
) -> Option<f64> {
    lt2_source::lt2_lactate(record, hr_tolerance).or_else(|| {
        let target = f64::from(max_hr?) * LT2_FRACTION_OF_MAX_HR;
        record
            .stages
            .iter()
            .min_by(|a, b| {
                (f64::from(a.heart_rate) - target)
                    .abs()
                    .total_cmp(&(f64::from(b.heart_rate) - target).abs())
            })
            .map(|stage| stage.lactate)
    })
}

/// Classify an athlete from a VDOT and an optional lab test
#[must_use]
pub fn classify_athlete(
    vdot: Option<f64>,
    record: Option<&LactateTestRecord>,
    max_hr: Option<u16>,
    hr_tolerance: u16,
) -> AthleteClassification {
    let tier = vdot.and_then(PerformanceTier::from_vdot);
    let percentile = vdot
        .zip(tier)
        .map(|(vdot, tier)| calculate_percentile_within_tier(vdot, tier));

    let max_lactate = record.and_then(LactateTestRecord::max_lactate);
    let lt2_lactate =
        record.and_then(|record| classification_lt2_lactate(record, max_hr, hr_tolerance));
    let lt2_to_max_ratio = max_lactate
        .zip(lt2_lactate)
        .filter(|(max, _)| *max > 0.0)
        .map(|(max, lt2)| lt2 / max);

    let metabolic_type = match (max_lactate, lt2_to_max_ratio) {
        (Some(max), Some(ratio)) => MetabolicType::classify(max, ratio),
        _ => MetabolicType::Unknown,
    };

    AthleteClassification {
        tier,
        percentile,
        metabolic_type,
        max_lactate,
        lt2_lactate,
        lt2_to_max_ratio,
    }
}
