//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **conversion factors**, **display constants** and **common type
//! aliases** used throughout the `orrery` crate.
//!
//! ## Overview
//!
//! - Angular conversions (degrees ↔ radians)
//! - Display scale (astronomical units → scene units)
//! - Kepler solver tolerances
//! - Default level-of-detail distances and asteroid sizing
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Julian date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// Scene units per astronomical unit.
///
/// Every propagated radius is multiplied by this factor, so one AU spans
/// 250 units in the scene tree.
pub const PIXELS_PER_AU: f64 = 250.0;

// -------------------------------------------------------------------------------------------------
// Kepler solver
// -------------------------------------------------------------------------------------------------

/// Convergence threshold on successive eccentric anomaly iterates (radians)
pub const KEPLER_TOLERANCE: f64 = 1e-7;

/// Upper bound on fixed-point iterations before the solve is reported as failed
pub const KEPLER_MAX_ITERATIONS: usize = 500;

// -------------------------------------------------------------------------------------------------
// Orbit path sampling
// -------------------------------------------------------------------------------------------------

/// Samples used for the orbit trace of low-eccentricity orbits
pub const PATH_SAMPLES_DEFAULT: usize = 100;

/// Samples used for the orbit trace when `e > PATH_HIGH_ECCENTRICITY`
pub const PATH_SAMPLES_HIGH_ECCENTRICITY: usize = 300;

/// Eccentricity above which the orbit trace is densified
pub const PATH_HIGH_ECCENTRICITY: f64 = 0.20;

// -------------------------------------------------------------------------------------------------
// Scene defaults
// -------------------------------------------------------------------------------------------------

/// Camera distances (scene units) at which asteroid LOD tiers activate
pub const LOD_DISTANCES: [f64; 3] = [300.0, 600.0, 1000.0];

/// Base radius of an asteroid mesh before diameter scaling and jitter
pub const ASTEROID_SIZE: f64 = 2.0;

/// Radius of the dedicated "big particle" mesh used without batched points
pub const BIG_PARTICLE_SIZE: f64 = 50.0;

/// Radius of the sun mesh
pub const SUN_SIZE: f64 = 20.0;

/// Diffuse color shared by every asteroid (0xRRGGBB)
pub const ASTEROID_DIFFUSE: u32 = 0x31_31_31;

/// Object id reserved for the sun
pub const SUN_OBJECT_ID: ObjectId = 1;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Distance in scene units (see [`PIXELS_PER_AU`])
pub type SceneUnit = f64;
/// Julian date (days, UTC scale)
pub type JulianDate = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Identity of a body as delivered by the game state
pub type ObjectId = u64;
