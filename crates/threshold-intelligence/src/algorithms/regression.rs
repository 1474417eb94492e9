// ABOUTME: Ordinary least squares line fitting used by the segmented log-log detector
// ABOUTME: Returns slope, intercept, and the sum of squared errors for a set of (x, y) pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Least-squares line through a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Slope of the fitted line
    pub slope: f64,
    /// Y-intercept of the fitted line
    pub intercept: f64,
    /// Sum of squared residuals
    pub sse: f64,
}

impl LinearFit {
    /// Fit `y = slope * x + intercept`
    ///
    /// Returns `None` for fewer than two points or when every `x` is the same.
    #[must_use]
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let sum_x = points.iter().map(|(x, _)| x).sum::<f64>();
        let sum_y = points.iter().map(|(_, y)| y).sum::<f64>();
        let sum_xx = points.iter().map(|(x, _)| x * x).sum::<f64>();
        let sum_xy = points.iter().map(|(x, y)| x * y).sum::<f64>();

        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let denominator = (n * mean_x).mul_add(-mean_x, sum_xx);
        if denominator.abs() < f64::EPSILON {
            return None;
        }

        let slope = (n * mean_x).mul_add(-mean_y, sum_xy) / denominator;
        let intercept = slope.mul_add(-mean_x, mean_y);

        let sse = points
            .iter()
            .map(|(x, y)| {
                let residual = y - slope.mul_add(*x, intercept);
                residual * residual
            })
            .sum();

        Some(Self {
            slope,
            intercept,
            sse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let fit = LinearFit::fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!(fit.sse < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(LinearFit::fit(&[(1.0, 1.0)]).is_none());
        assert!(LinearFit::fit(&[(1.0, 1.0), (1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_residuals_accumulate() {
        let fit = LinearFit::fit(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();
        assert!(fit.slope.abs() < 1e-9);
        assert!(fit.sse > 0.0);
    }
}
