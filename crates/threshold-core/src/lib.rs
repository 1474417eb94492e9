// ABOUTME: Core types and constants for the threshold engine
// ABOUTME: Foundation crate with error handling, physiological constants, and data models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Threshold Core
//!
//! Foundation crate shared by the detection, VDOT, and pace-selection
//! algorithms. It changes rarely, so downstream crates keep their
//! incremental compilation benefits.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the `AppResult` alias
//! - **constants**: defaults for every tunable, grouped by domain
//! - **models**: lactate tests, race results, athletes, confidence, paces

/// Unified error handling
pub mod errors;

/// Physiological and algorithmic constants
pub mod constants;

/// Core data models
pub mod models;
