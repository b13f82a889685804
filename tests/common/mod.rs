#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use orrery::{
    body::BodyType,
    body_visuals::BodyVisualConfig,
    celestial_graph::{CelestialGraph, SceneConfig},
    collaborators::NoPlayerUi,
    constants::J2000_JD,
    feed::{EphemerisEntry, NamedElements},
    orbital_elements::OrbitalElements,
    time::SimulationClock,
};

pub fn assert_position_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

pub fn assert_point_close(actual: &Point3<f64>, expected: &Point3<f64>, epsilon: f64) {
    assert_position_close(&actual.coords, &expected.coords, epsilon);
}

/// Earth-like elements at J2000.
pub fn earth_elements() -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: 1.0,
        eccentricity: 0.0167,
        inclination: 0.0,
        ascending_node_longitude: 0.0,
        periapsis_argument: Some(102.9),
        periapsis_longitude: None,
        mean_anomaly: 100.47,
        epoch: J2000_JD,
        period: Some(365.25636),
        mean_motion: None,
    }
}

pub fn elements(a: f64, e: f64, ma: f64) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: a,
        eccentricity: e,
        inclination: 7.0,
        ascending_node_longitude: 48.3,
        periapsis_argument: Some(29.1),
        periapsis_longitude: None,
        mean_anomaly: ma,
        epoch: J2000_JD,
        period: Some(365.25636 * a.powf(1.5)),
        mean_motion: None,
    }
}

pub fn ephemeris(name: &str, body_type: BodyType, object_id: u64, el: OrbitalElements) -> EphemerisEntry {
    EphemerisEntry {
        orbit: NamedElements {
            full_name: name.into(),
            short_name: None,
            elements: el,
        },
        body_type,
        object_id,
        owner: None,
    }
}

pub fn solar_system_graph() -> CelestialGraph {
    CelestialGraph::new(
        SceneConfig::default(),
        BodyVisualConfig::solar_system(),
        &SimulationClock::at_j2000(20_000.0),
        Box::new(NoPlayerUi),
    )
    .unwrap()
}
