// ABOUTME: Daniels, Canova, and Norwegian training zone sets derived from the selected paces
// ABOUTME: Percent-of-VDOT-velocity, percent-of-marathon-pace, and lactate-labelled three-zone models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Training Zone Systems
//!
//! The three systems are parallel views of the same athlete and are not
//! interchangeable: Daniels anchors on VDOT velocity, Canova on marathon
//! pace, and the Norwegian model on blood lactate.
//!
//! ## References
//!
//! - Daniels, J. (2013). "Daniels' Running Formula" (3rd ed.). Human Kinetics.
//! - Canova, R. (2012). "Marathon Training: A Scientific Approach."
//! - Tjelta, L.I. (2019). "Three Norwegian brothers all European 1500 m champions: what is the secret?" *Int J Sports Sci Coach*, 14(5), 694-700.

use serde::{Deserialize, Serialize};
use threshold_core::constants::lactate::{NORWEGIAN_GREEN_MAX, NORWEGIAN_THRESHOLD_MAX};
use threshold_core::models::format_pace_kmh;

/// A pace band expressed as fractions of a reference speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceZone {
    /// Zone name
    pub name: String,
    /// Lower bound as a fraction of the reference speed
    pub min_percent: f64,
    /// Upper bound as a fraction of the reference speed
    pub max_percent: f64,
    /// Slowest speed in the zone (km/h)
    pub min_kmh: f64,
    /// Fastest speed in the zone (km/h)
    pub max_kmh: f64,
    /// Pace range as `m:ss-m:ss` per km, slowest first
    pub pace_range: String,
}

impl PaceZone {
    fn from_reference(name: &str, min_percent: f64, max_percent: f64, reference_kmh: f64) -> Self {
        let min_kmh = reference_kmh * min_percent;
        let max_kmh = reference_kmh * max_percent;
        Self {
            name: name.to_owned(),
            min_percent,
            max_percent,
            min_kmh,
            max_kmh,
            pace_range: format!("{}-{}", format_pace_kmh(min_kmh), format_pace_kmh(max_kmh)),
        }
    }
}

/// A lactate-labelled zone of the Norwegian model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LactateZone {
    /// Zone name
    pub name: String,
    /// Lowest lactate in the zone (mmol/L)
    pub min_lactate: f64,
    /// Highest lactate in the zone (mmol/L); `None` for the open-ended zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lactate: Option<f64>,
    /// Indicative lower speed (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_kmh: Option<f64>,
    /// Indicative upper speed (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_kmh: Option<f64>,
}

/// All three zone systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSets {
    /// Daniels five zones, percent of VDOT velocity
    pub daniels: Vec<PaceZone>,
    /// Canova bands, percent of marathon pace
    pub canova: Vec<PaceZone>,
    /// Norwegian three zones, labelled by lactate
    pub norwegian: Vec<LactateZone>,
}

/// Daniels zones (name, min, max) as fractions of VDOT velocity
const DANIELS_ZONES: [(&str, f64, f64); 5] = [
    ("Easy", 0.59, 0.74),
    ("Marathon", 0.75, 0.84),
    ("Threshold", 0.83, 0.88),
    ("Interval", 0.95, 1.00),
    ("Repetition", 1.05, 1.10),
];

/// Canova bands (name, min, max) as fractions of marathon pace
const CANOVA_ZONES: [(&str, f64, f64); 6] = [
    ("Fundamental", 0.80, 0.90),
    ("Progressive", 0.90, 0.97),
    ("Marathon", 0.98, 1.02),
    ("Specific", 1.02, 1.05),
    ("Threshold", 1.05, 1.10),
    ("5K", 1.10, 1.15),
];

/// Daniels zones from VDOT velocity (km/h)
#[must_use]
pub fn daniels_zones(vdot_velocity_kmh: f64) -> Vec<PaceZone> {
    DANIELS_ZONES
        .iter()
        .map(|(name, min, max)| PaceZone::from_reference(name, *min, *max, vdot_velocity_kmh))
        .collect()
}

/// Canova bands from marathon pace (km/h)
#[must_use]
pub fn canova_zones(marathon_kmh: f64) -> Vec<PaceZone> {
    CANOVA_ZONES
        .iter()
        .map(|(name, min, max)| PaceZone::from_reference(name, *min, *max, marathon_kmh))
        .collect()
}

/// Norwegian three-zone model
///
/// Speeds are indicative and only filled in when LT1 and LT2 speeds are known.
#[must_use]
pub fn norwegian_zones(lt1_kmh: Option<f64>, lt2_kmh: Option<f64>) -> Vec<LactateZone> {
    vec![
        LactateZone {
            name: "Green".to_owned(),
            min_lactate: 0.0,
            max_lactate: Some(NORWEGIAN_GREEN_MAX),
            min_kmh: None,
            max_kmh: lt1_kmh,
        },
        LactateZone {
            name: "Threshold".to_owned(),
            min_lactate: NORWEGIAN_GREEN_MAX,
            max_lactate: Some(NORWEGIAN_THRESHOLD_MAX),
            min_kmh: lt1_kmh,
            max_kmh: lt2_kmh,
        },
        LactateZone {
            name: "Red".to_owned(),
            min_lactate: NORWEGIAN_THRESHOLD_MAX,
            max_lactate: None,
            min_kmh: lt2_kmh,
            max_kmh: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canova_marathon_band_brackets_marathon_pace() {
        let zones = canova_zones(14.0);
        let marathon = zones.iter().find(|z| z.name == "Marathon").unwrap();
        assert!(marathon.min_kmh < 14.0 && marathon.max_kmh > 14.0);
        assert_eq!(zones.len(), 6);
    }

    #[test]
    fn test_daniels_zones_ascend() {
        let zones = daniels_zones(16.0);
        for pair in zones.windows(2) {
            assert!(pair[0].min_kmh < pair[1].min_kmh);
        }
        assert_eq!(zones[0].pace_range, "6:21-5:04");
    }

    #[test]
    fn test_norwegian_without_speeds() {
        let zones = norwegian_zones(None, None);
        assert_eq!(zones.len(), 3);
        assert!(zones.iter().all(|z| z.min_kmh.is_none()));
        assert_eq!(zones[2].max_lactate, None);
    }
}
