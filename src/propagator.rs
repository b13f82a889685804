//! # Two-body propagation of heliocentric elements
//!
//! [`OrbitPropagator`](crate::propagator::OrbitPropagator) turns a validated
//! [`OrbitalElements`](crate::orbital_elements::OrbitalElements) record into scene-space positions.
//!
//! ## Algorithm
//!
//! 1. Angles are converted once to radians at construction (`i`, `Ω`, `ϖ`, `M0`), together with
//!    the mean motion `n`.
//! 2. `M(t) = M0 + n·(t − epoch)`, reduced to `[0, 2π)`.
//! 3. Kepler's equation is solved by fixed-point iteration
//!    ([`solve_kepler_fixed_point`](crate::kepler::solve_kepler_fixed_point)).
//! 4. True anomaly `v`, radius `r = a(1−e²)/(1+e·cos v)` scaled by
//!    [`PIXELS_PER_AU`](crate::constants::PIXELS_PER_AU).
//! 5. Rotation to the ecliptic frame through `Ω`, `u = v + ϖ − Ω` and `i`.
//!
//! ## Axis convention
//!
//! The scene is **Y-up**: the ecliptic `(X, Y, Z)` is returned as `(X, Z, Y)`. Renderers that
//! share the scene tree rely on this swap, it is part of the output contract.
//!
//! ## Orbit trace
//!
//! [`OrbitPropagator::sample_orbit_path`](crate::propagator::OrbitPropagator::sample_orbit_path)
//! walks one full period from the epoch and returns a closed polyline. High-eccentricity orbits
//! (`e > 0.20`) get 300 samples instead of 100 so the perihelion passage stays smooth.

use nalgebra::Vector3;

use crate::{
    constants::{
        JulianDate, Radian, PATH_HIGH_ECCENTRICITY, PATH_SAMPLES_DEFAULT,
        PATH_SAMPLES_HIGH_ECCENTRICITY, PIXELS_PER_AU, RADEG,
    },
    kepler::{principal_angle, solve_kepler_fixed_point, true_anomaly},
    orbital_elements::OrbitalElements,
    orrery_errors::OrreryError,
};

/// Closed polyline approximating one revolution, in scene units.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    pub points: Vec<Vector3<f64>>,
}

impl OrbitPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the first and last samples coincide within `tolerance` scene units.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first - last).norm() <= tolerance,
            _ => false,
        }
    }
}

/// Analytic single-body propagator.
///
/// Holds the immutable elements and the radian quantities derived from them. Every query is a
/// pure function of `(elements, time)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPropagator {
    elements: OrbitalElements,
    inclination: Radian,
    node: Radian,
    perihelion: Radian,
    mean_anomaly_epoch: Radian,
    mean_motion: Radian,
    period: f64,
}

impl OrbitPropagator {
    /// Build a propagator from feed elements.
    ///
    /// Arguments
    /// ---------
    /// * `name` – Orbit name, used for diagnostics only.
    /// * `elements` – Heliocentric elements in degrees / AU / days.
    ///
    /// Return
    /// ------
    /// * The propagator, or a configuration error from
    ///   [`OrbitalElements::validate`](crate::orbital_elements::OrbitalElements::validate).
    pub fn new(name: &str, elements: OrbitalElements) -> Result<Self, OrreryError> {
        elements.validate(name)?;

        let mean_motion = elements
            .mean_motion_rad_per_day()
            .ok_or_else(|| OrreryError::MissingMeanMotion(name.to_string()))?;
        let perihelion = elements
            .perihelion_longitude()
            .ok_or_else(|| OrreryError::MissingPerihelion(name.to_string()))?;

        Ok(Self {
            inclination: elements.inclination * RADEG,
            node: elements.ascending_node_longitude * RADEG,
            perihelion: perihelion * RADEG,
            mean_anomaly_epoch: elements.mean_anomaly * RADEG,
            period: std::f64::consts::TAU / mean_motion.abs(),
            mean_motion,
            elements,
        })
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Orbital period in days.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Mean anomaly at `time`, in `[0, 2π)`.
    pub fn mean_anomaly_at(&self, time: JulianDate) -> Radian {
        principal_angle(self.mean_anomaly_epoch + self.mean_motion * (time - self.elements.epoch))
    }

    /// Heliocentric position at `time` in scene units, Y-up.
    ///
    /// Arguments
    /// ---------
    /// * `time` – Julian date of the query.
    ///
    /// Return
    /// ------
    /// * `(X, Z, Y)` of the ecliptic position scaled by
    ///   [`PIXELS_PER_AU`](crate::constants::PIXELS_PER_AU), or
    ///   [`OrreryError::KeplerNonConvergence`] when the solver gives up.
    pub fn position_at(&self, time: JulianDate) -> Result<Vector3<f64>, OrreryError> {
        let e = self.elements.eccentricity;
        let m = self.mean_anomaly_at(time);

        let ecc_anomaly = solve_kepler_fixed_point(m, e)?;
        let v = true_anomaly(ecc_anomaly, e);

        let r = self.elements.semi_major_axis * (1.0 - e * e) / (1.0 + e * v.cos()) * PIXELS_PER_AU;

        let (sin_o, cos_o) = self.node.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();
        let (sin_u, cos_u) = (v + self.perihelion - self.node).sin_cos();

        let x = r * (cos_o * cos_u - sin_o * sin_u * cos_i);
        let y = r * (sin_o * cos_u + cos_o * sin_u * cos_i);
        let z = r * (sin_u * sin_i);

        Ok(Vector3::new(x, z, y))
    }

    /// Number of samples used by [`sample_orbit_path`](Self::sample_orbit_path).
    pub fn orbit_path_sample_count(&self) -> usize {
        if self.elements.eccentricity > PATH_HIGH_ECCENTRICITY {
            PATH_SAMPLES_HIGH_ECCENTRICITY
        } else {
            PATH_SAMPLES_DEFAULT
        }
    }

    /// Sample one revolution starting at the epoch.
    ///
    /// A sample whose Kepler solve does not converge repeats the previous good sample (the next
    /// good one for leading samples), so near-parabolic orbits still get a full trace.
    ///
    /// Return
    /// ------
    /// * [`OrbitPath`] with exactly [`orbit_path_sample_count`](Self::orbit_path_sample_count)
    ///   points, the last one taken one period after the first.
    /// * The first solver error only when no sample converges at all.
    pub fn sample_orbit_path(&self) -> Result<OrbitPath, OrreryError> {
        let samples = self.orbit_path_sample_count();
        let step = self.period / (samples - 1) as f64;

        let mut points = Vec::with_capacity(samples);
        let mut leading = 0;
        let mut failed = 0;
        let mut first_error = None;
        for k in 0..samples {
            match self.position_at(self.elements.epoch + step * k as f64) {
                Ok(position) => points.push(position),
                Err(err) => {
                    failed += 1;
                    match points.last() {
                        Some(&previous) => points.push(previous),
                        None => leading += 1,
                    }
                    first_error.get_or_insert(err);
                }
            }
        }

        let Some(&first_good) = points.first() else {
            return Err(first_error.unwrap_or(OrreryError::KeplerNonConvergence {
                iterations: 0,
                mean_anomaly: self.mean_anomaly_epoch,
                eccentricity: self.elements.eccentricity,
            }));
        };
        points.splice(0..0, std::iter::repeat(first_good).take(leading));

        if failed > 0 {
            tracing::warn!(
                failed,
                samples,
                eccentricity = self.elements.eccentricity,
                "orbit trace samples reused after Kepler non-convergence"
            );
        }
        Ok(OrbitPath { points })
    }
}
