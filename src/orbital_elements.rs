//! # Heliocentric orbital elements
//!
//! This module defines [`OrbitalElements`](crate::orbital_elements::OrbitalElements), the element
//! record supplied by the ephemeris and asteroid feeds, together with its validation and the
//! derived quantities needed by the propagator.
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **degrees** (as delivered by the feeds)
//! - Time: **days**, epoch as a **Julian date**
//! - Mean motion: **degrees/day**
//!
//! ## Perihelion
//!
//! Feeds deliver either the argument of perihelion `w` or the longitude of perihelion
//! `w_bar = w + om`. The propagator only needs the longitude; when both are present
//! `w_bar` is used.
//!
//! ## Mean motion
//!
//! Either the orbital period `P` (days) or the mean motion `n` (degrees/day) must be present.
//! An explicit `n` takes precedence over `P`.
//!
//! ## See also
//!
//! - [`OrbitPropagator`](crate::propagator::OrbitPropagator) – consumes validated elements.
//! - [`principal_angle`](crate::kepler::principal_angle) – angle normalization helper.

use std::fmt;

use serde::Deserialize;

use crate::{
    constants::{AstronomicalUnit, Degree, JulianDate, Radian, DPI, RADEG},
    orrery_errors::OrreryError,
};

/// Osculating heliocentric elements of a single body.
///
/// Units
/// -----
/// * `semi_major_axis`: AU.
/// * `eccentricity`: unitless, `0 ≤ e < 1`.
/// * `inclination`, `ascending_node_longitude`, `periapsis_argument`,
///   `periapsis_longitude`, `mean_anomaly`: degrees.
/// * `epoch`: Julian date.
/// * `period`: days.
/// * `mean_motion`: degrees/day.
///
/// The serde names follow the feed (`a`, `e`, `i`, `om`, `w`, `w_bar`, `ma`, `epoch`, `P`, `n`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrbitalElements {
    #[serde(rename = "a")]
    pub semi_major_axis: AstronomicalUnit,
    #[serde(rename = "e")]
    pub eccentricity: f64,
    #[serde(rename = "i")]
    pub inclination: Degree,
    #[serde(rename = "om")]
    pub ascending_node_longitude: Degree,
    #[serde(rename = "w", default)]
    pub periapsis_argument: Option<Degree>,
    #[serde(rename = "w_bar", default)]
    pub periapsis_longitude: Option<Degree>,
    #[serde(rename = "ma")]
    pub mean_anomaly: Degree,
    pub epoch: JulianDate,
    #[serde(rename = "P", default)]
    pub period: Option<f64>,
    #[serde(rename = "n", default)]
    pub mean_motion: Option<f64>,
}

impl OrbitalElements {
    /// Check the invariants required by the propagator.
    ///
    /// Arguments
    /// ---------
    /// * `name` – Name of the orbit, only used in the error message.
    ///
    /// Return
    /// ------
    /// * `Ok(())` when the elements can be propagated, otherwise the first
    ///   configuration error found.
    pub fn validate(&self, name: &str) -> Result<(), OrreryError> {
        if !(self.semi_major_axis.is_finite() && self.semi_major_axis > 0.0) {
            return Err(OrreryError::InvalidSemiMajorAxis {
                name: name.to_string(),
                value: self.semi_major_axis,
            });
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrreryError::InvalidEccentricity {
                name: name.to_string(),
                value: self.eccentricity,
            });
        }
        self.perihelion_longitude()
            .ok_or_else(|| OrreryError::MissingPerihelion(name.to_string()))?;
        self.mean_motion_rad_per_day()
            .ok_or_else(|| OrreryError::MissingMeanMotion(name.to_string()))?;
        Ok(())
    }

    /// Longitude of perihelion `ϖ` in degrees: `w_bar`, or `w + om` when only `w` is known.
    pub fn perihelion_longitude(&self) -> Option<Degree> {
        self.periapsis_longitude.or_else(|| {
            self.periapsis_argument
                .map(|w| w + self.ascending_node_longitude)
        })
    }

    /// Mean motion in radians/day.
    ///
    /// An explicit, non-zero `n` wins; otherwise `2π / P` for a positive period.
    pub fn mean_motion_rad_per_day(&self) -> Option<Radian> {
        match (self.mean_motion, self.period) {
            (Some(n), _) if n.is_finite() && n != 0.0 => Some(n * RADEG),
            (_, Some(p)) if p.is_finite() && p > 0.0 => Some(DPI / p),
            _ => None,
        }
    }

    /// Orbital period in days, derived from the mean motion when `P` is absent.
    pub fn period_days(&self) -> Option<f64> {
        self.mean_motion_rad_per_day().map(|n| DPI / n.abs())
    }

    /// Copy of these elements with the semi-major axis multiplied by `factor`.
    ///
    /// Every other element, the epoch and the period or mean motion are kept as is, so
    /// the copy stays in phase with `self`.
    pub fn with_scaled_axis(&self, factor: f64) -> Self {
        Self {
            semi_major_axis: self.semi_major_axis * factor,
            ..self.clone()
        }
    }

    /// Circular, equatorial elements with the given axis and period starting at `epoch`.
    pub fn circular(semi_major_axis: AstronomicalUnit, period: f64, epoch: JulianDate) -> Self {
        Self {
            semi_major_axis,
            eccentricity: 0.0,
            inclination: 0.0,
            ascending_node_longitude: 0.0,
            periapsis_argument: Some(0.0),
            periapsis_longitude: None,
            mean_anomaly: 0.0,
            epoch,
            period: Some(period),
            mean_motion: None,
        }
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orbital Elements @ epoch (JD): {:.6}", self.epoch)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} AU",
            self.semi_major_axis
        )?;
        writeln!(f, "  e   (eccentricity)          = {:.6}", self.eccentricity)?;
        writeln!(f, "  i   (inclination)           = {:.6}°", self.inclination)?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6}°",
            self.ascending_node_longitude
        )?;
        match self.perihelion_longitude() {
            Some(p) => writeln!(f, "  ϖ   (longitude of perihelion) = {p:.6}°")?,
            None => writeln!(f, "  ϖ   (longitude of perihelion) = undefined")?,
        }
        writeln!(f, "  M   (mean anomaly)          = {:.6}°", self.mean_anomaly)?;
        match self.period_days() {
            Some(p) => write!(f, "  P   (period)                = {p:.6} d"),
            None => write!(f, "  P   (period)                = undefined"),
        }
    }
}
