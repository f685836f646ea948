//! # Constants and type aliases for Apsis
//!
//! This module centralizes the **numerical thresholds**, **unit prefixes**, and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Thresholds used by the circulation classifier and the period estimator
//! - Default tolerances of the extremum refinement
//! - Decimal prefixes of the scaled units of [`crate::units`]
//! - Type aliases for per-sample arrays

use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Numerical thresholds
// -------------------------------------------------------------------------------------------------

/// Angular momentum magnitude below which a sample breaks circulation
pub const CIRCULATION_EPS: f64 = 1e-13;

/// Minimal peak-to-trough amplitude for a period estimate to be meaningful
pub const PERIOD_AMPLITUDE_THRESHOLD: f64 = 1e-2;

/// Default relative tolerance on the refined extremum time
pub const REFINE_XTOL: f64 = 1.48e-8;

/// Default iteration cap of the 1-D minimizers
pub const REFINE_MAX_ITER: usize = 500;

/// Golden ratio conjugate, (3 - √5) / 2
pub const CGOLD: f64 = 0.381_966_011_250_105_1;

/// Minimal number of samples for local-extremum detection
pub const MIN_SAMPLES_FINDER: usize = 3;

/// Minimal number of samples for a not-a-knot cubic spline
pub const MIN_SAMPLES_CUBIC: usize = 4;

// -------------------------------------------------------------------------------------------------
// Unit prefixes
// -------------------------------------------------------------------------------------------------

/// kpc per pc
pub const KILO: f64 = 1e3;

/// Myr per yr
pub const MEGA: f64 = 1e6;

/// Gyr per yr
pub const GIGA: f64 = 1e9;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Cartesian 3-vector (position, velocity or angular momentum)
pub type Vec3 = Vector3<f64>;

/// Sample time in the time unit of the orbit
pub type Time = f64;

/// Per-axis circulation flags `[x, y, z]` of a single orbit
pub type AxisFlags = [u8; 3];
