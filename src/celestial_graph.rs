//! # Celestial scene graph
//!
//! [`CelestialGraph`](crate::celestial_graph::CelestialGraph) owns the [`SceneTree`], the body
//! registry and the shared [`PointCloudBuffer`]. It is the only place where bodies enter the
//! scene, so it enforces:
//!
//! - **uniqueness**: one body per orbit name (orbitless bodies are keyed by display name); a
//!   second insertion is logged and rejected without touching the scene,
//! - **hierarchy**: every representation and orbit trace hangs under its parent body, so a moon
//!   placed in its planet's frame follows the planet,
//! - **LOD**: asteroid LOD nodes are re-evaluated from camera distances each frame.
//!
//! ## Frame loop
//!
//! ```text
//! clock ─► update_positions(jd) ─► update_lod(camera) ─► renderer walks scene()
//! ```
//!
//! ## See also
//!
//! - [`OrbitPropagator`](crate::propagator::OrbitPropagator) – position of each body.
//! - [`build_asteroid_lod`](crate::asteroid::build_asteroid_lod) – asteroid representations.
//! - [`BodyVisualConfig`](crate::body_visuals::BodyVisualConfig) – planet and moon meshes.

use std::{collections::HashMap, f64::consts::PI};

use itertools::Itertools;
use nalgebra::{Point3, Vector3};

use crate::{
    asteroid::{build_asteroid_lod, variant::VariantTable},
    body::{BodyId, BodyType, CelestialBody},
    body_visuals::BodyVisualConfig,
    collaborators::{CameraDistances, Clock, PlayerObjectListener},
    constants::{
        JulianDate, ObjectId, ASTEROID_SIZE, BIG_PARTICLE_SIZE, LOD_DISTANCES, SUN_OBJECT_ID,
        SUN_SIZE,
    },
    feed::{AsteroidRecord, EphemerisEntry},
    orbit::{Orbit, ParticleHandle},
    orbital_elements::OrbitalElements,
    orrery_errors::OrreryError,
    point_cloud::PointCloudBuffer,
    scene::{
        geometry::{Geometry, Material, Mesh, ShaderKind},
        transform::Transform,
        NodeId, NodeKind, OrbitLine, SceneTree,
    },
};

/// Parameters of the transit orbits synthesized by
/// [`CelestialGraph::generate_derived_orbit`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitConfig {
    /// Period of the circular parking orbit, days.
    pub parking_period_days: f64,
    /// AU per unit of the apoapsis parameter.
    pub apoapsis_scale: f64,
    /// Semi-major axis factor applied to the destination's elements when tracking it.
    pub tracking_factor: f64,
    /// Destinations smaller than this radius are tracked instead of orbited.
    pub small_radius_threshold: f64,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            parking_period_days: 10.0,
            apoapsis_scale: 0.003,
            tracking_factor: 0.98,
            small_radius_threshold: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Activation distances of the three asteroid LOD tiers.
    pub lod_distances: [f64; 3],
    /// Asteroid base size before diameter scaling.
    pub asteroid_size: f64,
    /// Renderer supports batched points; otherwise each asteroid gets a big particle mesh.
    pub batched_points: bool,
    pub big_particle_size: f64,
    /// Mixed into every per-asteroid seed.
    pub seed_salt: u64,
    /// Orbit trace colors (0xRRGGBB).
    pub body_path_color: u32,
    pub asteroid_path_color: u32,
    pub path_width: f64,
    pub sun_texture: String,
    pub backdrop_texture: String,
    pub transit: TransitConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            lod_distances: LOD_DISTANCES,
            asteroid_size: ASTEROID_SIZE,
            batched_points: true,
            big_particle_size: BIG_PARTICLE_SIZE,
            seed_salt: 0,
            body_path_color: 0xff_00_00,
            asteroid_path_color: 0xcc_cc_cc,
            path_width: 2.0,
            sun_texture: "img/textures/sun_small.jpg".into(),
            backdrop_texture: "img/eso_dark.jpg".into(),
            transit: TransitConfig::default(),
        }
    }
}

/// Everything [`CelestialGraph::add_body`] needs to register one body.
#[derive(Debug, Clone)]
pub struct NewBody {
    /// Node the representation and the orbit trace are attached under.
    pub parent: NodeId,
    pub body_type: BodyType,
    pub orbit: Option<Orbit>,
    /// Detached (or loosely attached) node drawing the body.
    pub representation: NodeId,
    /// Initial visibility of the orbit trace.
    pub always_show_path: bool,
    pub object_id: ObjectId,
    pub model: String,
    pub owner: Option<String>,
}

pub struct CelestialGraph {
    scene: SceneTree,
    bodies: Vec<CelestialBody>,
    name_index: HashMap<String, BodyId>,
    points: PointCloudBuffer,
    variants: VariantTable,
    visuals: BodyVisualConfig,
    config: SceneConfig,
    listener: Box<dyn PlayerObjectListener>,
    backdrop: NodeId,
    epoch: JulianDate,
}

impl CelestialGraph {
    /// Create a scene holding the backdrop and the sun.
    ///
    /// Arguments
    /// ---------
    /// * `config` – Scene tunables.
    /// * `visuals` – Meshes of the planets and moons, keyed by display name.
    /// * `clock` – Initial epoch and far clipping distance (sizes the backdrop).
    /// * `listener` – UI notified of new player objects.
    pub fn new(
        config: SceneConfig,
        visuals: BodyVisualConfig,
        clock: &dyn Clock,
        listener: Box<dyn PlayerObjectListener>,
    ) -> Result<Self, OrreryError> {
        let mut scene = SceneTree::new();
        let root = scene.root();

        let backdrop = scene.create_child(
            root,
            "backdrop",
            NodeKind::Mesh(Mesh::new(
                Geometry::Sphere {
                    radius: clock.max_cull_distance() / 2.0,
                    width_segments: 60,
                    height_segments: 40,
                },
                Material {
                    shader: ShaderKind::Backdrop,
                    ..Material::textured(&config.backdrop_texture, None)
                },
            )),
            // seen from inside
            Transform::identity()
                .with_rotation(Transform::euler_xyz(PI, 0.0, PI / 3.0))
                .with_scale(Vector3::new(-1.0, 1.0, 1.0)),
        )?;

        let sun = scene.create(
            "Sun",
            NodeKind::Mesh(Mesh::new(
                Geometry::sphere(SUN_SIZE, 32),
                Material {
                    shader: ShaderKind::Star,
                    ..Material::textured(&config.sun_texture, None)
                },
            )),
            Transform::identity(),
        );

        let mut graph = Self {
            variants: VariantTable::standard(config.lod_distances),
            scene,
            bodies: Vec::new(),
            name_index: HashMap::new(),
            points: PointCloudBuffer::new(),
            visuals,
            config,
            listener,
            backdrop,
            epoch: clock.current_epoch(),
        };
        graph.add_body(NewBody {
            parent: root,
            body_type: BodyType::Star,
            orbit: None,
            representation: sun,
            always_show_path: false,
            object_id: SUN_OBJECT_ID,
            model: "Sun".into(),
            owner: Some("Mankind".into()),
        })?;
        Ok(graph)
    }

    /// Register a body and attach its representation and orbit trace under `new.parent`.
    ///
    /// Return
    /// ------
    /// * [`OrreryError::DuplicateBody`] when the orbit name (display name for orbitless bodies)
    ///   is already registered; nothing is modified in that case.
    /// * [`OrreryError::NodeNotFound`] for an unknown parent or representation.
    pub fn add_body(&mut self, new: NewBody) -> Result<BodyId, OrreryError> {
        let key = new
            .orbit
            .as_ref()
            .map_or(new.model.as_str(), |o| o.name())
            .to_string();
        if self.name_index.contains_key(&key) {
            tracing::warn!(
                name = %key,
                "multiple copies of the same body sent to the scene, keeping the first one"
            );
            return Err(OrreryError::DuplicateBody(key));
        }
        self.scene.can_attach(new.representation, new.parent)?;
        let path = new.orbit.as_ref().map(Orbit::path).transpose()?;

        let NewBody {
            parent,
            body_type,
            mut orbit,
            representation,
            always_show_path,
            object_id,
            model,
            owner,
        } = new;

        let path_node = match path {
            Some(path) => {
                let color = match body_type {
                    BodyType::Asteroid => self.config.asteroid_path_color,
                    _ => self.config.body_path_color,
                };
                let node = self.scene.create_child(
                    parent,
                    format!("{key} orbit"),
                    NodeKind::OrbitLine(OrbitLine {
                        path,
                        color,
                        width: self.config.path_width,
                    }),
                    Transform::identity(),
                )?;
                self.scene.set_visible(node, always_show_path)?;
                Some(node)
            }
            None => None,
        };
        self.scene.attach(representation, parent)?;

        if let Some(orbit) = orbit.as_mut() {
            match orbit.position_at(self.epoch) {
                Ok(position) => {
                    self.scene.set_position(representation, position)?;
                    orbit.move_particle(&position, &mut self.scene, &mut self.points)?;
                }
                Err(err) => tracing::warn!(name = %key, %err, "body left at its parent's origin"),
            }
        }

        let bounding_box = match body_type {
            BodyType::Asteroid => self.scene.bounding_box(representation)?,
            _ => None,
        };

        let id = BodyId(self.bodies.len());
        self.bodies.push(CelestialBody {
            object_id,
            owner,
            model,
            body_type,
            orbit,
            representation,
            parent,
            path_node,
            bounding_box,
            launched: false,
        });
        self.name_index.insert(key.clone(), id);
        tracing::debug!(name = %key, %body_type, object_id, "body added");

        if body_type == BodyType::PlayerObject {
            self.listener.player_object_added(&self.bodies[id.0]);
        }
        Ok(id)
    }

    /// Register a moon under the representation of `planet`, orbit trace hidden.
    pub fn add_moon(
        &mut self,
        planet: BodyId,
        orbit: Orbit,
        representation: NodeId,
        object_id: ObjectId,
        model: &str,
        owner: Option<&str>,
    ) -> Result<BodyId, OrreryError> {
        let parent = self.get(planet)?.representation;
        self.add_body(NewBody {
            parent,
            body_type: BodyType::Moon,
            orbit: Some(orbit),
            representation,
            always_show_path: false,
            object_id,
            model: model.to_string(),
            owner: owner.map(str::to_string),
        })
    }

    /// Build the LOD representation and particle of one asteroid and register it under the root.
    pub fn add_new_asteroid(&mut self, record: &AsteroidRecord) -> Result<BodyId, OrreryError> {
        if self.name_index.contains_key(&record.orbit_id) {
            tracing::warn!(name = %record.orbit_id, "asteroid already in the scene");
            return Err(OrreryError::DuplicateBody(record.orbit_id.clone()));
        }
        let mut orbit = Orbit::new(record.orbit_id.as_str(), record.elements.clone())?;
        // trace first: nothing is added to the scene when it cannot be drawn
        orbit.path()?;

        let (representation, shape) = build_asteroid_lod(
            &mut self.scene,
            record,
            self.variants.select(&record.display_name),
            self.config.asteroid_size,
            self.config.seed_salt,
        )?;
        tracing::debug!(name = %record.display_name, variant = %shape.variant, "asteroid shape");

        let particle = if self.config.batched_points {
            ParticleHandle::PointCloud(self.points.push_placeholder())
        } else {
            let root = self.scene.root();
            ParticleHandle::BigParticle(self.scene.create_child(
                root,
                format!("{} particle", record.display_name),
                NodeKind::Mesh(Mesh::new(
                    Geometry::sphere(self.config.big_particle_size, 8),
                    Material::flat(ShaderKind::Basic, self.config.asteroid_path_color),
                )),
                Transform::identity(),
            )?)
        };
        orbit.set_particle(particle);

        let root = self.scene.root();
        self.add_body(NewBody {
            parent: root,
            body_type: BodyType::Asteroid,
            orbit: Some(orbit),
            representation,
            always_show_path: false,
            object_id: record.object_id,
            model: record.display_name.clone(),
            owner: record.owner_id.clone(),
        })
    }

    /// Create the planets and moons of the ephemeris table.
    ///
    /// Planets are inserted before moons so that every moon finds its planet. Entries without a
    /// visual, with invalid elements, or whose planet is missing are logged and skipped.
    ///
    /// Return
    /// ------
    /// * The number of bodies added.
    pub fn populate_from_ephemeris<'a, I>(&mut self, entries: I) -> Result<usize, OrreryError>
    where
        I: IntoIterator<Item = &'a EphemerisEntry>,
    {
        let mut added = 0;
        for entry in entries.into_iter().sorted_by_key(|entry| entry.body_type) {
            match self.add_ephemeris_entry(entry) {
                Ok(_) => added += 1,
                Err(OrreryError::NodeNotFound(node)) => {
                    return Err(OrreryError::NodeNotFound(node));
                }
                Err(err) => tracing::warn!(name = %entry.model(), %err, "ephemeris entry skipped"),
            }
        }
        tracing::info!(added, bodies = self.bodies.len(), "ephemeris loaded");
        Ok(added)
    }

    fn add_ephemeris_entry(&mut self, entry: &EphemerisEntry) -> Result<BodyId, OrreryError> {
        let model = entry.model();
        if self.name_index.contains_key(&entry.orbit.full_name) {
            return Err(OrreryError::DuplicateBody(entry.orbit.full_name.clone()));
        }
        let visual = self
            .visuals
            .get(model)
            .ok_or_else(|| OrreryError::BodyNotFound(model.to_string()))?
            .clone();
        let parent = match &visual.parent {
            Some(planet) => {
                self.find_by_name(planet)
                    .ok_or_else(|| OrreryError::BodyNotFound(planet.clone()))?
                    .representation
            }
            None => self.scene.root(),
        };

        let mut orbit = Orbit::new(
            entry.orbit.full_name.as_str(),
            entry.orbit.elements.clone(),
        )?;
        if let Some(short) = &entry.orbit.short_name {
            orbit = orbit.with_short_name(short.as_str());
        }
        let representation = visual.build(model, &mut self.scene)?;

        self.add_body(NewBody {
            parent,
            body_type: entry.body_type,
            orbit: Some(orbit),
            representation,
            always_show_path: true,
            object_id: entry.object_id,
            model: model.to_string(),
            owner: entry.owner.clone(),
        })
    }

    /// First body answering to `name` (orbit full name, orbit short name or display name).
    pub fn find_by_name(&self, name: &str) -> Option<&CelestialBody> {
        let found = self.bodies.iter().find(|body| body.answers_to(name));
        if found.is_none() {
            tracing::debug!(name, "no body with this name");
        }
        found
    }

    pub fn find_by_id(&self, object_id: ObjectId) -> Option<&CelestialBody> {
        let found = self.bodies.iter().find(|body| body.object_id == object_id);
        if found.is_none() {
            tracing::debug!(object_id, "no body with this id");
        }
        found
    }

    /// Registry index of the first body answering to `name`.
    pub fn id_of(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.answers_to(name))
            .map(BodyId)
    }

    /// The star at the center of the system.
    pub fn solar_centric_object(&self) -> Option<&CelestialBody> {
        self.bodies
            .iter()
            .find(|body| body.body_type == BodyType::Star)
    }

    /// Hide the orbit trace of every asteroid.
    pub fn hide_all_conditional_paths(&mut self) -> Result<(), OrreryError> {
        for body in &self.bodies {
            if body.body_type == BodyType::Asteroid {
                if let Some(node) = body.path_node {
                    self.scene.set_visible(node, false)?;
                }
            }
        }
        Ok(())
    }

    /// Move `body` under `new_parent` without a jump in its world position.
    ///
    /// The orbit trace follows the representation but keeps its local transform, since it is
    /// expressed in the parent's frame.
    pub fn attach_to_parent_body(
        &mut self,
        body: BodyId,
        new_parent: NodeId,
    ) -> Result<(), OrreryError> {
        let (representation, path_node) = {
            let body = self.get(body)?;
            (body.representation, body.path_node)
        };
        if let Some(path) = path_node {
            self.scene.can_attach(path, new_parent)?;
        }
        self.scene
            .reparent_preserving_world_position(representation, new_parent)?;
        if let Some(path) = path_node {
            self.scene.attach(path, new_parent)?;
        }
        self.get_mut(body)?.parent = new_parent;
        Ok(())
    }

    /// Give `body` a transit orbit towards `destination`.
    ///
    /// A circular parking orbit is built from `apoapsis` at the current epoch. When the
    /// destination is a player object or smaller than
    /// [`TransitConfig::small_radius_threshold`], the body instead flies alongside it on the
    /// destination's elements with the semi-major axis scaled by
    /// [`TransitConfig::tracking_factor`], under the destination's parent. Otherwise the body
    /// keeps the parking orbit around the destination's representation.
    ///
    /// This is a visual heuristic, not a physical transfer orbit.
    pub fn generate_derived_orbit(
        &mut self,
        body: BodyId,
        apoapsis: f64,
        destination: BodyId,
        destination_radius: f64,
    ) -> Result<(), OrreryError> {
        let transit = &self.config.transit;
        let parking = OrbitalElements::circular(
            apoapsis * transit.apoapsis_scale,
            transit.parking_period_days,
            self.epoch,
        );

        let dest = self.get(destination)?;
        let tracking = dest.body_type == BodyType::PlayerObject
            || destination_radius < transit.small_radius_threshold;
        let (elements, new_parent) = match (&dest.orbit, tracking) {
            (Some(dest_orbit), true) => (
                dest_orbit.elements().with_scaled_axis(transit.tracking_factor),
                dest.parent,
            ),
            _ => (parking, dest.representation),
        };

        let source = self.get(body)?;
        let mut orbit = Orbit::new(source.registry_name(), elements)?;
        if let Some(short) = source.orbit.as_ref().and_then(Orbit::short_name) {
            orbit = orbit.with_short_name(short);
        }
        let path = orbit.path()?;
        let old_path = source.path_node;
        let name = orbit.name().to_string();
        self.scene.can_reparent(source.representation, new_parent)?;

        if let Some(old) = old_path {
            self.scene.detach(old)?;
        }
        let path_node = self.scene.create_child(
            new_parent,
            format!("{name} orbit"),
            NodeKind::OrbitLine(OrbitLine {
                path,
                color: self.config.body_path_color,
                width: self.config.path_width,
            }),
            Transform::identity(),
        )?;
        {
            let body = self.get_mut(body)?;
            body.orbit = Some(orbit);
            body.path_node = None;
        }
        self.attach_to_parent_body(body, new_parent)?;
        self.get_mut(body)?.path_node = Some(path_node);
        tracing::debug!(name = %name, tracking, "derived orbit generated");
        Ok(())
    }

    /// Flag a player object as launched.
    pub fn set_launched(&mut self, body: BodyId, launched: bool) -> Result<(), OrreryError> {
        self.get_mut(body)?.launched = launched;
        Ok(())
    }

    /// Move every orbiting body (and its particle) to its position at `time`.
    ///
    /// A body whose Kepler solve fails keeps its last known position; a body that never had one
    /// is left in place.
    pub fn update_positions(&mut self, time: JulianDate) -> Result<(), OrreryError> {
        for body in self.bodies.iter_mut() {
            let Some(orbit) = body.orbit.as_mut() else {
                continue;
            };
            match orbit.position_or_last_known(time) {
                Ok(position) => {
                    self.scene.set_position(body.representation, position)?;
                    orbit.move_particle(&position, &mut self.scene, &mut self.points)?;
                }
                Err(err) => {
                    tracing::warn!(name = %orbit.name(), %err, "no position for this body yet")
                }
            }
        }
        if time.is_finite() {
            self.epoch = time;
        }
        Ok(())
    }

    /// Select the LOD tier of every asteroid from its distance to the camera.
    pub fn update_lod(&mut self, camera: &dyn CameraDistances) -> Result<(), OrreryError> {
        for body in &self.bodies {
            if body.body_type != BodyType::Asteroid {
                continue;
            }
            let position = self.scene.world_position(body.representation)?;
            self.scene
                .select_lod(body.representation, camera.distance_to(&position))?;
        }
        Ok(())
    }

    pub fn world_position(&self, node: NodeId) -> Result<Point3<f64>, OrreryError> {
        self.scene.world_position(node)
    }

    fn get(&self, id: BodyId) -> Result<&CelestialBody, OrreryError> {
        self.bodies
            .get(id.0)
            .ok_or_else(|| OrreryError::BodyNotFound(format!("#{}", id.0)))
    }

    fn get_mut(&mut self, id: BodyId) -> Result<&mut CelestialBody, OrreryError> {
        self.bodies
            .get_mut(id.0)
            .ok_or_else(|| OrreryError::BodyNotFound(format!("#{}", id.0)))
    }

    pub fn body(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn scene(&self) -> &SceneTree {
        &self.scene
    }

    /// Mutable tree, for representations built outside the graph.
    pub fn scene_mut(&mut self) -> &mut SceneTree {
        &mut self.scene
    }

    pub fn points(&self) -> &PointCloudBuffer {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointCloudBuffer {
        &mut self.points
    }

    pub fn variants_mut(&mut self) -> &mut VariantTable {
        &mut self.variants
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn backdrop(&self) -> NodeId {
        self.backdrop
    }

    /// Epoch of the last position update.
    pub fn current_epoch(&self) -> JulianDate {
        self.epoch
    }
}
