use std::fmt;

use serde::Deserialize;

use crate::{
    constants::ObjectId,
    orbit::Orbit,
    scene::{bounds::Aabb, NodeId},
};

/// Category of a body in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyType {
    Star,
    Planet,
    Moon,
    Asteroid,
    PlayerObject,
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyType::Star => "star",
            BodyType::Planet => "planet",
            BodyType::Moon => "moon",
            BodyType::Asteroid => "asteroid",
            BodyType::PlayerObject => "playerObject",
        };
        write!(f, "{name}")
    }
}

/// Index of a body in its [`CelestialGraph`](crate::celestial_graph::CelestialGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    pub fn get(&self) -> usize {
        self.0
    }
}

/// A registered body: identity, orbit and where its representation hangs in the scene.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub object_id: ObjectId,
    pub owner: Option<String>,
    /// Display name.
    pub model: String,
    pub body_type: BodyType,
    /// `None` only for the sun.
    pub orbit: Option<Orbit>,
    pub representation: NodeId,
    pub parent: NodeId,
    /// Line node drawing the orbit trace.
    pub path_node: Option<NodeId>,
    /// World-space bounds captured at insertion (asteroids only).
    pub bounding_box: Option<Aabb>,
    pub launched: bool,
}

impl CelestialBody {
    /// Whether `name` identifies this body: orbit full name, orbit short name, or display name.
    pub fn answers_to(&self, name: &str) -> bool {
        match &self.orbit {
            Some(orbit) => orbit.answers_to(name) || self.model == name,
            None => self.model == name,
        }
    }

    /// Name used for uniqueness: the orbit name, or the display name for orbitless bodies.
    pub fn registry_name(&self) -> &str {
        self.orbit.as_ref().map_or(self.model.as_str(), |o| o.name())
    }
}
