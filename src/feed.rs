//! # Ephemeris and asteroid feeds
//!
//! Records handed over by the game state, which owns their delivery:
//!
//! - [`EphemerisEntry`](crate::feed::EphemerisEntry): one planet or moon of the ephemeris table,
//!   consumed once by [`CelestialGraph::populate_from_ephemeris`](crate::celestial_graph::CelestialGraph::populate_from_ephemeris).
//! - [`AsteroidRecord`](crate::feed::AsteroidRecord): one asteroid, each triggering an
//!   [`add_new_asteroid`](crate::celestial_graph::CelestialGraph::add_new_asteroid).
//!
//! Asteroid dumps come as flat CSV files (one row per asteroid, elements inlined). The diameter
//! column uses `_` for unknown values.

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;

use crate::{
    body::BodyType,
    constants::{Degree, JulianDate, ObjectId},
    orbital_elements::OrbitalElements,
    orrery_errors::OrreryError,
};

/// Elements together with the names identifying the orbit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedElements {
    pub full_name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(flatten)]
    pub elements: OrbitalElements,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EphemerisEntry {
    pub orbit: NamedElements,
    #[serde(rename = "type")]
    pub body_type: BodyType,
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    #[serde(default)]
    pub owner: Option<String>,
}

impl EphemerisEntry {
    /// Display name of the body: the orbit's full name.
    pub fn model(&self) -> &str {
        &self.orbit.full_name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidRecord {
    /// Full orbit name, unique in the scene.
    pub orbit_id: String,
    pub owner_id: Option<String>,
    pub object_id: ObjectId,
    pub elements: OrbitalElements,
    pub display_name: String,
    /// Diameter in km, when known.
    pub diameter: Option<f64>,
}

/// One CSV row of an asteroid dump.
#[derive(Debug, Deserialize)]
struct AsteroidRow {
    orbit_id: String,
    #[serde(default)]
    owner_id: Option<String>,
    object_id: ObjectId,
    display_name: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    diameter: Option<f64>,
    a: f64,
    e: f64,
    i: Degree,
    om: Degree,
    #[serde(default)]
    w: Option<Degree>,
    #[serde(default)]
    w_bar: Option<Degree>,
    ma: Degree,
    epoch: JulianDate,
    #[serde(rename = "P", default)]
    period: Option<f64>,
    #[serde(default)]
    n: Option<f64>,
}

impl From<AsteroidRow> for AsteroidRecord {
    fn from(row: AsteroidRow) -> Self {
        AsteroidRecord {
            orbit_id: row.orbit_id,
            owner_id: row.owner_id.filter(|o| !o.is_empty()),
            object_id: row.object_id,
            elements: OrbitalElements {
                semi_major_axis: row.a,
                eccentricity: row.e,
                inclination: row.i,
                ascending_node_longitude: row.om,
                periapsis_argument: row.w,
                periapsis_longitude: row.w_bar,
                mean_anomaly: row.ma,
                epoch: row.epoch,
                period: row.period,
                mean_motion: row.n,
            },
            display_name: row.display_name,
            diameter: row.diameter,
        }
    }
}

/// Parse an asteroid dump.
///
/// Arguments
/// ---------
/// * `reader` – CSV source with a header row. Expected columns: `orbit_id`, `owner_id`,
///   `object_id`, `display_name`, `diameter`, `a`, `e`, `i`, `om`, `w`, `w_bar`, `ma`, `epoch`,
///   `P`, `n`. Optional columns may be left empty.
///
/// Return
/// ------
/// * The records in file order, or the first parse error.
pub fn read_asteroid_records<R: Read>(reader: R) -> Result<Vec<AsteroidRecord>, OrreryError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<AsteroidRow>()
        .map(|row| Ok(AsteroidRecord::from(row?)))
        .collect()
}

/// Parse the asteroid dump stored at `path`.
pub fn read_asteroid_file(path: impl AsRef<Path>) -> Result<Vec<AsteroidRecord>, OrreryError> {
    let file = File::open(path)?;
    read_asteroid_records(file)
}
