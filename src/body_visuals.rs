//! # Visual configuration of planets and moons
//!
//! [`BodyVisualConfig`](crate::body_visuals::BodyVisualConfig) maps a body's display name to its
//! mesh radius, textures, parent body (for moons), axial tilt and optional ring. The table is
//! handed to [`CelestialGraph::new`](crate::celestial_graph::CelestialGraph::new) instead of
//! living in module-level constants, so alternative solar systems only need another table.
//!
//! Sizes are display sizes in scene units, not physical radii.

use std::collections::HashMap;

use crate::{
    orrery_errors::OrreryError,
    scene::{
        geometry::{Geometry, Material, Mesh, ShaderKind},
        transform::Transform,
        NodeId, NodeKind, SceneTree,
    },
};

/// Texture and normal map of the generic rocky surface used by small moons.
const ROCKY: (&str, &str) = (
    "img/textures/asteroid_small.jpg",
    "img/textures/asteroid_small_normal.jpg",
);

/// Surface of a body.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Diffuse texture, optional normal map.
    Textured {
        texture: String,
        normal_map: Option<String>,
    },
    /// Untextured Lambert color (0xRRGGBB).
    Flat(u32),
    /// Tinted Phong surface with texture and normal map.
    Tinted {
        color: u32,
        texture: String,
        normal_map: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingVisual {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub segments: u32,
    pub texture: String,
    pub normal_map: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyVisual {
    pub radius: f64,
    pub surface: Surface,
    /// Display name of the body this one orbits; `None` for heliocentric bodies.
    pub parent: Option<String>,
    /// Rotation about the local X axis, radians.
    pub tilt: f64,
    pub ring: Option<RingVisual>,
}

impl BodyVisual {
    pub fn textured(radius: f64, texture: &str, normal_map: &str) -> Self {
        Self {
            radius,
            surface: Surface::Textured {
                texture: texture.to_string(),
                normal_map: Some(normal_map.to_string()),
            },
            parent: None,
            tilt: 0.0,
            ring: None,
        }
    }

    pub fn flat(radius: f64, color: u32) -> Self {
        Self {
            radius,
            surface: Surface::Flat(color),
            parent: None,
            tilt: 0.0,
            ring: None,
        }
    }

    pub fn tinted(radius: f64, color: u32) -> Self {
        Self {
            radius,
            surface: Surface::Tinted {
                color,
                texture: ROCKY.0.to_string(),
                normal_map: ROCKY.1.to_string(),
            },
            parent: None,
            tilt: 0.0,
            ring: None,
        }
    }

    pub fn rocky(radius: f64) -> Self {
        Self::textured(radius, ROCKY.0, ROCKY.1)
    }

    pub fn orbiting(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    fn material(&self) -> Material {
        match &self.surface {
            Surface::Textured {
                texture,
                normal_map,
            } => Material::textured(texture, normal_map.as_deref()),
            Surface::Flat(color) => Material::flat(ShaderKind::Lambert, *color),
            Surface::Tinted {
                color,
                texture,
                normal_map,
            } => Material {
                color: *color,
                ..Material::textured(texture, Some(normal_map))
            },
        }
    }

    /// Create the (detached) representation of a body named `name` in `scene`.
    ///
    /// The sphere carries the tilt; a ring, if any, is added as a child lying in the equatorial
    /// plane.
    pub fn build(&self, name: &str, scene: &mut SceneTree) -> Result<NodeId, OrreryError> {
        let node = scene.create(
            name,
            NodeKind::Mesh(Mesh::new(Geometry::sphere(self.radius, 32), self.material())),
            Transform::identity().with_rotation(Transform::euler_xyz(self.tilt, 0.0, 0.0)),
        );

        if let Some(ring) = &self.ring {
            let ring_node = scene.create(
                format!("{name} rings"),
                NodeKind::Mesh(Mesh::new(
                    Geometry::Ring {
                        inner_radius: ring.inner_radius,
                        outer_radius: ring.outer_radius,
                        theta_segments: ring.segments,
                    },
                    Material {
                        color: 0xdd_dd_dd,
                        transparent: true,
                        ..Material::textured(&ring.texture, Some(&ring.normal_map))
                    },
                )),
                Transform::identity().with_rotation(Transform::euler_xyz(
                    std::f64::consts::FRAC_PI_2,
                    0.0,
                    0.0,
                )),
            );
            scene.attach(ring_node, node)?;
        }
        Ok(node)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyVisualConfig {
    entries: HashMap<String, BodyVisual>,
}

impl BodyVisualConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, visual: BodyVisual) -> &mut Self {
        self.entries.insert(name.into(), visual);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BodyVisual> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The eight planets and their major moons.
    pub fn solar_system() -> Self {
        let tex = |name: &str| {
            (
                format!("img/textures/{name}.jpg"),
                format!("img/textures/{name}_normal.jpg"),
            )
        };
        let textured = |radius: f64, name: &str| {
            let (texture, normal) = tex(name);
            BodyVisual::textured(radius, &texture, &normal)
        };

        let mut config = Self::new();
        config
            .insert("Mercury", textured(4.0, "mercury_small"))
            .insert("Venus", textured(6.0, "venus_small"))
            .insert("Earth", textured(6.5, "earth_small"))
            .insert("Mars", textured(5.0, "mars_small"))
            .insert("Jupiter", textured(14.0, "jupiter_small"))
            .insert(
                "Saturn",
                BodyVisual {
                    tilt: std::f64::consts::FRAC_PI_6,
                    ring: Some(RingVisual {
                        inner_radius: 0.1,
                        outer_radius: 36.0,
                        segments: 180,
                        texture: "img/textures/saturn_rings_small.png".into(),
                        normal_map: "img/textures/saturn_rings_small_normal.png".into(),
                    }),
                    ..textured(12.0, "saturn_medium")
                },
            )
            .insert("Uranus", BodyVisual::flat(9.0, 0xb7_dd_e0))
            .insert("Neptune", textured(9.0, "neptune_small"))
            // Earth
            .insert("Moon", textured(2.0, "moon_small").orbiting("Earth"))
            // Jupiter
            .insert("Io", textured(2.0, "moon_small").orbiting("Jupiter"))
            .insert("Europa", textured(1.8, "moon_small").orbiting("Jupiter"))
            .insert("Ganymede", textured(2.6, "moon_small").orbiting("Jupiter"))
            .insert("Callisto", textured(2.4, "moon_small").orbiting("Jupiter"))
            // Mars
            .insert("Phobos", textured(0.6, "phobos_tiny").orbiting("Mars"))
            .insert("Deimos", textured(0.5, "deimos_tiny").orbiting("Mars"))
            // Saturn
            .insert("Titan", BodyVisual::flat(2.6, 0xea_ca_51).orbiting("Saturn"))
            .insert("Rhea", BodyVisual::rocky(1.2).orbiting("Saturn"))
            .insert(
                "Iapetus",
                BodyVisual::textured(
                    1.2,
                    "img/textures/iapetus_small.jpg",
                    "img/textures/iapetus_small.jpg",
                )
                .orbiting("Saturn"),
            )
            .insert("Dione", BodyVisual::rocky(1.0).orbiting("Saturn"))
            .insert("Tethys", BodyVisual::tinted(1.0, 0xcb_af_97).orbiting("Saturn"))
            // Uranus
            .insert("Miranda", BodyVisual::rocky(0.6).orbiting("Uranus"))
            .insert("Ariel", BodyVisual::rocky(1.0).orbiting("Uranus"))
            .insert("Umbriel", BodyVisual::rocky(1.0).orbiting("Uranus"))
            .insert("Titania", BodyVisual::tinted(1.4, 0xc0_b7_a8).orbiting("Uranus"))
            .insert("Oberon", BodyVisual::tinted(1.4, 0xc0_b7_a8).orbiting("Uranus"))
            // Neptune
            .insert("Proteus", BodyVisual::rocky(0.6).orbiting("Neptune"))
            .insert("Triton", BodyVisual::tinted(1.6, 0xc0_b7_a8).orbiting("Neptune"))
            .insert("Nereid", BodyVisual::rocky(0.5).orbiting("Neptune"));
        config
    }
}

#[cfg(test)]
mod body_visuals_test {
    use super::*;

    #[test]
    fn test_moons_name_their_planet() {
        let config = BodyVisualConfig::solar_system();
        assert_eq!(config.get("Moon").unwrap().parent.as_deref(), Some("Earth"));
        assert_eq!(config.get("Triton").unwrap().parent.as_deref(), Some("Neptune"));
        assert_eq!(config.get("Earth").unwrap().parent, None);
        assert!(config.get("Pluto").is_none());

        // every moon's parent is itself a configured planet
        for visual in config.entries.values() {
            if let Some(parent) = &visual.parent {
                assert!(config.get(parent).unwrap().parent.is_none());
            }
        }
    }

    #[test]
    fn test_saturn_builds_ring_child() {
        let mut scene = SceneTree::new();
        let config = BodyVisualConfig::solar_system();
        let saturn = config
            .get("Saturn")
            .unwrap()
            .build("Saturn", &mut scene)
            .unwrap();

        let node = scene.node(saturn).unwrap();
        assert_eq!(node.children().len(), 1);
        let ring = scene.node(node.children()[0]).unwrap();
        assert!(matches!(
            ring.kind,
            NodeKind::Mesh(Mesh {
                geometry: Geometry::Ring { .. },
                ..
            })
        ));
    }
}
