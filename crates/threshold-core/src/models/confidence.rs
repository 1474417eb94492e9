// ABOUTME: Ordered confidence levels shared by every estimator in the engine
// ABOUTME: Supports capping (downgrade-only) so reconciliation can never inflate confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence attached to a threshold, VDOT, or pace decision
///
/// Variants are declared from least to most confident so the derived `Ord`
/// matches their meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    /// Hard default, no usable evidence
    VeryLow,
    /// Heuristic or conventional value
    Low,
    /// Plausible but unconfirmed
    Medium,
    /// Measured or recent evidence
    High,
    /// Direct laboratory measurement or very recent race
    VeryHigh,
}

impl ConfidenceLevel {
    /// Lower this confidence to at most `ceiling`; never raises it
    #[must_use]
    pub fn cap(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }

    /// Upper-case tag as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "VERY_LOW",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY_HIGH",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_only_downgrades() {
        assert_eq!(
            ConfidenceLevel::High.cap(ConfidenceLevel::Medium),
            ConfidenceLevel::Medium
        );
        assert_eq!(
            ConfidenceLevel::Low.cap(ConfidenceLevel::Medium),
            ConfidenceLevel::Low
        );
    }

    #[test]
    fn test_ordering() {
        assert!(ConfidenceLevel::VeryHigh > ConfidenceLevel::High);
        assert!(ConfidenceLevel::VeryLow < ConfidenceLevel::Low);
    }
}
