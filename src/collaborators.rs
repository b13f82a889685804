//! # External collaborators
//!
//! Interfaces through which the renderer, the game clock and the UI plug into the
//! [`CelestialGraph`](crate::celestial_graph::CelestialGraph). Only small reference
//! implementations live here; real ones belong to the embedding application.

use nalgebra::Point3;

use crate::{body::CelestialBody, constants::JulianDate};

/// Game clock.
pub trait Clock {
    /// Current epoch as a Julian date (TDB days).
    fn current_epoch(&self) -> JulianDate;

    /// Far clipping distance of the camera, in scene units.
    fn max_cull_distance(&self) -> f64;
}

/// Camera-to-object distances used to drive LOD selection.
pub trait CameraDistances {
    fn distance_to(&self, world_position: &Point3<f64>) -> f64;
}

/// Camera reduced to its world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPosition(pub Point3<f64>);

impl CameraDistances for CameraPosition {
    fn distance_to(&self, world_position: &Point3<f64>) -> f64 {
        nalgebra::distance(&self.0, world_position)
    }
}

/// UI notified when a player-controlled body enters the scene.
pub trait PlayerObjectListener {
    fn player_object_added(&mut self, body: &CelestialBody);
}

/// Listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlayerUi;

impl PlayerObjectListener for NoPlayerUi {
    fn player_object_added(&mut self, _body: &CelestialBody) {}
}
