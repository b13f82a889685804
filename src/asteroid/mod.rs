//! # Asteroid representations
//!
//! Builds the LOD node of one asteroid from its feed record:
//!
//! 1. the [`VariantTable`](crate::asteroid::variant::VariantTable) picks the shape variant from
//!    the display name,
//! 2. a [`StdRng`] seeded from the record draws the per-axis scale and the initial rotation,
//! 3. one unit sphere mesh per variant tier is created under a `Lod` node, finest first.
//!
//! Every asteroid owns its generator, so the shape of one asteroid never depends on how many
//! others were built before it.

use nalgebra::Vector3;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    constants::{ObjectId, ASTEROID_DIFFUSE},
    feed::AsteroidRecord,
    orrery_errors::OrreryError,
    scene::{
        geometry::{Geometry, Material, Mesh},
        lod::LodLevels,
        transform::Transform,
        NodeId, NodeKind, SceneTree,
    },
};

pub mod variant;

use variant::AsteroidVariant;

pub const ASTEROID_TEXTURE: &str = "img/textures/asteroid_small.jpg";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(seed, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

/// Seed of the generator of one asteroid, stable across runs.
pub fn asteroid_seed(object_id: ObjectId, orbit_id: &str, salt: u64) -> u64 {
    let hash = fnv1a(FNV_OFFSET, &salt.to_le_bytes());
    let hash = fnv1a(hash, &object_id.to_le_bytes());
    fnv1a(hash, orbit_id.as_bytes())
}

/// Emissive tint (0xRRGGBB) of the asteroids owned by `owner`.
///
/// The owner name is hashed to a hue; saturation and lightness are fixed so that every owner
/// color stays readable against the dark diffuse base.
///
/// Return
/// ------
/// * `None` for unowned asteroids, which keep a neutral tint.
pub fn owner_tint(owner: Option<&str>) -> Option<u32> {
    let owner = owner.filter(|o| !o.is_empty())?;
    let hue = (fnv1a(FNV_OFFSET, owner.as_bytes()) % 360) as f64;
    Some(hsl_to_rgb(hue, 0.8, 0.35))
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> u32 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Base size of an asteroid, scaled by its diameter when the feed has one.
pub fn base_size(asteroid_size: f64, diameter: Option<f64>) -> f64 {
    match diameter {
        Some(d) if d.is_finite() && d > 0.0 => asteroid_size * d / 100.0,
        _ => asteroid_size,
    }
}

/// Shape drawn for one asteroid, kept for inspection after the meshes are built.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidShape {
    pub variant: String,
    pub scale: Vector3<f64>,
    pub rotation: Vector3<f64>,
}

/// Create the detached LOD node of `record`.
///
/// Arguments
/// ---------
/// * `scene` – Tree receiving the LOD node and its tier meshes.
/// * `record` – Asteroid feed record.
/// * `variant` – Shape variant, usually selected from the record display name.
/// * `asteroid_size` – Base size before diameter scaling.
/// * `seed_salt` – Mixed into every per-asteroid seed.
///
/// Return
/// ------
/// * The LOD node and the drawn shape.
pub fn build_asteroid_lod(
    scene: &mut SceneTree,
    record: &AsteroidRecord,
    variant: &AsteroidVariant,
    asteroid_size: f64,
    seed_salt: u64,
) -> Result<(NodeId, AsteroidShape), OrreryError> {
    let mut rng = StdRng::seed_from_u64(asteroid_seed(
        record.object_id,
        &record.orbit_id,
        seed_salt,
    ));
    let base = base_size(asteroid_size, record.diameter);
    let scale = variant.sample_scale(base, &mut rng);
    let rotation = variant.rotation.sample(&mut rng);

    let material = Material {
        shader: variant.shader,
        color: ASTEROID_DIFFUSE,
        emissive: owner_tint(record.owner_id.as_deref()),
        ..Material::textured(ASTEROID_TEXTURE, None)
    };
    let tier_transform = Transform::identity()
        .with_rotation(Transform::euler_xyz(rotation.x, rotation.y, rotation.z))
        .with_scale(scale);

    let lod = scene.create(
        record.display_name.as_str(),
        NodeKind::Lod(LodLevels::new()),
        Transform::identity(),
    );
    let mut levels = LodLevels::new();
    for (k, tier) in variant.tiers.iter().enumerate() {
        let geometry = Geometry::sphere(1.0, tier.segments);
        let cost = geometry.triangle_count();
        let node = scene.create_child(
            lod,
            format!("{} lod {k}", record.display_name),
            NodeKind::Mesh(Mesh::new(geometry, material.clone())),
            tier_transform.clone(),
        )?;
        levels.add_level(tier.distance, node, cost)?;
    }
    if let Some(node) = scene.node_mut(lod) {
        node.kind = NodeKind::Lod(levels);
    }
    scene.select_lod(lod, 0.0)?;

    Ok((
        lod,
        AsteroidShape {
            variant: variant.name.clone(),
            scale,
            rotation,
        },
    ))
}

#[cfg(test)]
mod asteroid_test {
    use super::*;
    use crate::{
        asteroid::variant::VariantTable,
        constants::{ASTEROID_SIZE, LOD_DISTANCES},
        orbital_elements::test_orbital_elements::earth_like,
        scene::geometry::ShaderKind,
    };

    fn record(name: &str, diameter: Option<f64>) -> AsteroidRecord {
        AsteroidRecord {
            orbit_id: format!("orbit-{name}"),
            owner_id: Some("alice".into()),
            object_id: 4,
            elements: earth_like(),
            display_name: name.into(),
            diameter,
        }
    }

    #[test]
    fn test_vesta_lod() {
        let mut scene = SceneTree::new();
        let table = VariantTable::standard(LOD_DISTANCES);
        let rec = record("4 Vesta", None);
        let (lod, shape) =
            build_asteroid_lod(&mut scene, &rec, table.select(&rec.display_name), ASTEROID_SIZE, 0)
                .unwrap();

        assert_eq!(shape.variant, "Vesta");
        assert_ne!(shape.scale.x, ASTEROID_SIZE);
        assert_ne!(shape.scale.y, ASTEROID_SIZE);
        assert_eq!(shape.scale.z, ASTEROID_SIZE);
        assert_eq!(shape.rotation, Vector3::zeros());

        let NodeKind::Lod(levels) = &scene.node(lod).unwrap().kind else {
            panic!("not a LOD node");
        };
        let segments: Vec<u32> = levels
            .levels()
            .iter()
            .map(|l| match &scene.node(l.node).unwrap().kind {
                NodeKind::Mesh(Mesh {
                    geometry: Geometry::Sphere { width_segments, .. },
                    material,
                }) => {
                    assert_eq!(material.shader, ShaderKind::Lambert);
                    assert_eq!(material.color, ASTEROID_DIFFUSE);
                    *width_segments
                }
                other => panic!("unexpected tier {other:?}"),
            })
            .collect();
        assert_eq!(segments, vec![10, 8, 6]);
        // finest tier shown first
        assert_eq!(levels.active(), 0);
    }

    #[test]
    fn test_default_variant_is_irregular() {
        let mut scene = SceneTree::new();
        let table = VariantTable::standard(LOD_DISTANCES);
        let rec = record("433 Eros", Some(200.0));
        let (_, shape) =
            build_asteroid_lod(&mut scene, &rec, table.select(&rec.display_name), ASTEROID_SIZE, 0)
                .unwrap();
        assert_eq!(shape.variant, "irregular");
        // diameter 200 doubles the base size before jitter
        for k in 0..3 {
            assert!((2.0..6.0).contains(&shape.scale[k]));
        }
    }

    #[test]
    fn test_same_record_same_shape() {
        let table = VariantTable::standard(LOD_DISTANCES);
        let rec = record("433 Eros", None);
        let variant = table.select(&rec.display_name);

        let (_, a) = build_asteroid_lod(&mut SceneTree::new(), &rec, variant, ASTEROID_SIZE, 9).unwrap();
        let (_, b) = build_asteroid_lod(&mut SceneTree::new(), &rec, variant, ASTEROID_SIZE, 9).unwrap();
        assert_eq!(a, b);

        let other = AsteroidRecord {
            object_id: 5,
            ..rec.clone()
        };
        let (_, c) = build_asteroid_lod(&mut SceneTree::new(), &other, variant, ASTEROID_SIZE, 9).unwrap();
        assert_ne!(a.scale, c.scale);
    }

    #[test]
    fn test_owner_tint() {
        assert_eq!(owner_tint(None), None);
        assert_eq!(owner_tint(Some("")), None);
        assert_eq!(owner_tint(Some("alice")), owner_tint(Some("alice")));
        assert!(owner_tint(Some("alice")).unwrap() <= 0xff_ff_ff);
    }

    #[test]
    fn test_base_size() {
        assert_eq!(base_size(2.0, None), 2.0);
        assert_eq!(base_size(2.0, Some(50.0)), 1.0);
        assert_eq!(base_size(2.0, Some(-1.0)), 2.0);
    }
}
