use thiserror::Error;

use crate::constants::JulianDate;

#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("Orbit {0:?} has neither a period nor a mean motion")]
    MissingMeanMotion(String),

    #[error("Orbit {name:?} has a non-positive or non-finite semi-major axis: {value}")]
    InvalidSemiMajorAxis { name: String, value: f64 },

    #[error("Orbit {name:?} has an eccentricity outside [0, 1): {value}")]
    InvalidEccentricity { name: String, value: f64 },

    #[error("Orbit {0:?} has neither an argument nor a longitude of perihelion")]
    MissingPerihelion(String),

    #[error("Kepler equation did not converge after {iterations} iterations (M = {mean_anomaly}, e = {eccentricity})")]
    KeplerNonConvergence {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
    },

    #[error("Body already present in the scene: {0}")]
    DuplicateBody(String),

    #[error("Body not found: {0}")]
    BodyNotFound(String),

    #[error("Scene node not found: {0}")]
    NodeNotFound(usize),

    #[error("Scene node {0} would become its own ancestor")]
    CyclicAttachment(usize),

    #[error("World transform of node {0} is not invertible")]
    SingularTransform(usize),

    #[error("Invalid LOD level at distance {distance}: {reason}")]
    InvalidLodLevel { distance: f64, reason: String },

    #[error("Invalid date {0:?}")]
    InvalidDate(String),

    #[error("Epoch out of range: {0}")]
    InvalidEpoch(JulianDate),

    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Unable to read the feed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            (MissingMeanMotion(a), MissingMeanMotion(b)) => a == b,
            (
                InvalidSemiMajorAxis { name: a, value: x },
                InvalidSemiMajorAxis { name: b, value: y },
            ) => a == b && x.to_bits() == y.to_bits(),
            (
                InvalidEccentricity { name: a, value: x },
                InvalidEccentricity { name: b, value: y },
            ) => a == b && x.to_bits() == y.to_bits(),
            (MissingPerihelion(a), MissingPerihelion(b)) => a == b,
            (
                KeplerNonConvergence {
                    iterations: a,
                    ..
                },
                KeplerNonConvergence {
                    iterations: b,
                    ..
                },
            ) => a == b,
            (DuplicateBody(a), DuplicateBody(b)) => a == b,
            (BodyNotFound(a), BodyNotFound(b)) => a == b,
            (NodeNotFound(a), NodeNotFound(b)) => a == b,
            (CyclicAttachment(a), CyclicAttachment(b)) => a == b,
            (SingularTransform(a), SingularTransform(b)) => a == b,
            (InvalidLodLevel { distance: a, .. }, InvalidLodLevel { distance: b, .. }) => {
                a.to_bits() == b.to_bits()
            }
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidEpoch(a), InvalidEpoch(b)) => a.to_bits() == b.to_bits(),

            // not comparable: equal when the variant matches
            (InvalidPattern(_), InvalidPattern(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
