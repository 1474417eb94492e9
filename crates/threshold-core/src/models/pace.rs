// ABOUTME: Speed and pace conversions with human-readable formatting
// ABOUTME: Converts km/h to seconds per km and renders m:ss and h:mm:ss strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::{MINUTES_PER_HOUR, SECONDS_PER_HOUR};
use serde::{Deserialize, Serialize};

/// A running speed expressed both as km/h and as pace per kilometer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pace {
    /// Speed in km/h
    pub kmh: f64,
    /// Pace in seconds per kilometer
    pub sec_per_km: f64,
}

impl Pace {
    /// Build a pace from a speed in km/h
    #[must_use]
    pub fn from_kmh(kmh: f64) -> Self {
        let sec_per_km = if kmh > 0.0 {
            SECONDS_PER_HOUR / kmh
        } else {
            0.0
        };
        Self { kmh, sec_per_km }
    }

    /// Build a pace from seconds per kilometer
    #[must_use]
    pub fn from_sec_per_km(sec_per_km: f64) -> Self {
        let kmh = if sec_per_km > 0.0 {
            SECONDS_PER_HOUR / sec_per_km
        } else {
            0.0
        };
        Self { kmh, sec_per_km }
    }
}

/// Format a speed in km/h as `m:ss` minutes per kilometer (`60 / kmh`)
#[must_use]
pub fn format_pace_kmh(kmh: f64) -> String {
    if kmh <= 0.0 || !kmh.is_finite() {
        return "N/A".to_owned();
    }

    let total_seconds = (MINUTES_PER_HOUR / kmh * 60.0).round() as u32;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    format!("{minutes}:{seconds:02}")
}

/// Format a duration in seconds as `h:mm:ss` (or `m:ss` under an hour)
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0).round() as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
