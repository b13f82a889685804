//! # Per-body orbit
//!
//! An [`Orbit`](crate::orbit::Orbit) couples a named
//! [`OrbitPropagator`](crate::propagator::OrbitPropagator) with:
//!
//! - a lazily built, immutable orbit-path cache (built at most once per orbit),
//! - an optional particle handle, either a dedicated mesh node ("big particle") or an index into
//!   the shared [`PointCloudBuffer`](crate::point_cloud::PointCloudBuffer),
//! - the last position successfully computed, used as a fallback when a Kepler solve fails.

use std::sync::Arc;

use nalgebra::Vector3;
use once_cell::unsync::OnceCell;

use crate::{
    constants::JulianDate,
    orbital_elements::OrbitalElements,
    orrery_errors::OrreryError,
    point_cloud::{PointCloudBuffer, PointIndex},
    propagator::{OrbitPath, OrbitPropagator},
    scene::{NodeId, SceneTree},
};

/// Where the orbit draws its moving marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleHandle {
    /// Dedicated sphere mesh, used when the renderer has no batched point rendering.
    BigParticle(NodeId),
    /// Vertex in the shared point cloud.
    PointCloud(PointIndex),
}

#[derive(Debug, Clone)]
pub struct Orbit {
    name: String,
    short_name: Option<String>,
    propagator: OrbitPropagator,
    path: OnceCell<Arc<OrbitPath>>,
    particle: Option<ParticleHandle>,
    last_position: Option<Vector3<f64>>,
}

impl Orbit {
    /// Build an orbit from feed elements.
    ///
    /// Arguments
    /// ---------
    /// * `name` – Full identifying name, used for uniqueness and parent lookup.
    /// * `elements` – Heliocentric elements.
    ///
    /// Return
    /// ------
    /// * The orbit, or a configuration error when the elements cannot be propagated.
    pub fn new(name: impl Into<String>, elements: OrbitalElements) -> Result<Self, OrreryError> {
        let name = name.into();
        let propagator = OrbitPropagator::new(&name, elements)?;
        Ok(Self {
            name,
            short_name: None,
            propagator,
            path: OnceCell::new(),
            particle: None,
            last_position: None,
        })
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    /// Whether `name` is this orbit's full or short name.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.short_name.as_deref() == Some(name)
    }

    pub fn elements(&self) -> &OrbitalElements {
        self.propagator.elements()
    }

    pub fn propagator(&self) -> &OrbitPropagator {
        &self.propagator
    }

    pub fn particle(&self) -> Option<ParticleHandle> {
        self.particle
    }

    pub fn set_particle(&mut self, particle: ParticleHandle) {
        self.particle = Some(particle);
    }

    pub fn last_position(&self) -> Option<Vector3<f64>> {
        self.last_position
    }

    /// Orbit trace, sampled on first call and shared afterwards.
    pub fn path(&self) -> Result<Arc<OrbitPath>, OrreryError> {
        self.path
            .get_or_try_init(|| self.propagator.sample_orbit_path().map(Arc::new))
            .cloned()
    }

    /// Whether the trace has already been sampled.
    pub fn has_cached_path(&self) -> bool {
        self.path.get().is_some()
    }

    /// Position at `time`, remembered as the fallback for later failures.
    pub fn position_at(&mut self, time: JulianDate) -> Result<Vector3<f64>, OrreryError> {
        let position = self.propagator.position_at(time)?;
        self.last_position = Some(position);
        Ok(position)
    }

    /// Position at `time`, or the last known one when the solve fails.
    ///
    /// Return
    /// ------
    /// * `Err` only if the solve fails and no position was ever computed.
    pub fn position_or_last_known(
        &mut self,
        time: JulianDate,
    ) -> Result<Vector3<f64>, OrreryError> {
        match self.position_at(time) {
            Ok(position) => Ok(position),
            Err(err) => match self.last_position {
                Some(position) => {
                    tracing::warn!(orbit = %self.name, %err, "keeping last known position");
                    Ok(position)
                }
                None => Err(err),
            },
        }
    }

    /// Move the particle marker to `position`.
    pub fn move_particle(
        &self,
        position: &Vector3<f64>,
        scene: &mut SceneTree,
        points: &mut PointCloudBuffer,
    ) -> Result<(), OrreryError> {
        match self.particle {
            Some(ParticleHandle::BigParticle(node)) => scene.set_position(node, *position),
            Some(ParticleHandle::PointCloud(index)) => {
                if !points.set(index, position) {
                    tracing::warn!(orbit = %self.name, index = index.get(), "point index out of range");
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod orbit_test {
    use super::*;
    use crate::orbital_elements::test_orbital_elements::earth_like;

    #[test]
    fn test_path_is_built_once() {
        let orbit = Orbit::new("Earth", earth_like()).unwrap();
        assert!(!orbit.has_cached_path());

        let first = orbit.path().unwrap();
        let second = orbit.path().unwrap();
        assert!(orbit.has_cached_path());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 100);
    }

    #[test]
    fn test_names() {
        let orbit = Orbit::new("3 Earth", earth_like())
            .unwrap()
            .with_short_name("Earth");
        assert!(orbit.answers_to("3 Earth"));
        assert!(orbit.answers_to("Earth"));
        assert!(!orbit.answers_to("Mars"));
    }

    #[test]
    fn test_last_known_position_fallback() {
        let mut orbit = Orbit::new("Earth", earth_like()).unwrap();
        assert!(orbit.position_or_last_known(f64::NAN).is_err());

        let good = orbit.position_at(2451545.0).unwrap();
        assert_eq!(orbit.position_or_last_known(f64::NAN).unwrap(), good);
    }

    #[test]
    fn test_move_particle_in_point_cloud() {
        let mut scene = SceneTree::new();
        let mut points = PointCloudBuffer::new();
        let mut orbit = Orbit::new("Earth", earth_like()).unwrap();
        let index = points.push_placeholder();
        orbit.set_particle(ParticleHandle::PointCloud(index));

        let pos = orbit.position_at(2451545.0).unwrap();
        orbit.move_particle(&pos, &mut scene, &mut points).unwrap();
        assert_eq!(points.get(index), Some(&pos.cast::<f32>()));
    }
}
