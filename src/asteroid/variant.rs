//! # Asteroid shape variants
//!
//! An [`AsteroidVariant`](crate::asteroid::variant::AsteroidVariant) describes how one category of
//! asteroid looks: its LOD tiers, how its scale is jittered per axis and whether it gets a random
//! initial rotation. Variants are picked from an ordered
//! [`VariantTable`](crate::asteroid::variant::VariantTable) by matching the display name; the
//! first matching entry wins and unmatched names get the default irregular variant.
//!
//! | Variant      | Tiers (segments) | Scale jitter                                   | Rotation |
//! |--------------|------------------|------------------------------------------------|----------|
//! | Ceres        | 10 / 8 / 6       | none                                           | none     |
//! | Pallas       | 10 / 8 / 6       | x + U[0.2, 1.2)                                | none     |
//! | Vesta        | 10 / 8 / 6       | x + U[0.5, 1.5), y · U[0.7, 1.7)               | none     |
//! | Euphrosyne   | 10 / 8 / 6       | none                                           | none     |
//! | default      | 6 / 5 / 4        | every axis · U[0.5, 1.5)                        | U[0, 2π) |

use std::ops::Range;

use nalgebra::Vector3;
use rand::Rng;
use regex::Regex;

use crate::{constants::DPI, orrery_errors::OrreryError, scene::geometry::ShaderKind};

/// How one scale axis departs from the base size.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleJitter {
    /// Exactly the base size.
    Fixed,
    /// `base + U(range)`.
    Additive(Range<f64>),
    /// `base · U(range)`.
    Multiplicative(Range<f64>),
}

impl ScaleJitter {
    pub fn apply<R: Rng>(&self, base: f64, rng: &mut R) -> f64 {
        match self {
            ScaleJitter::Fixed => base,
            ScaleJitter::Additive(range) => base + rng.random_range(range.clone()),
            ScaleJitter::Multiplicative(range) => base * rng.random_range(range.clone()),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ScaleJitter::Fixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationJitter {
    None,
    /// Independent uniform angle in `[0, 2π)` on each axis.
    Full,
}

impl RotationJitter {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vector3<f64> {
        match self {
            RotationJitter::None => Vector3::zeros(),
            RotationJitter::Full => Vector3::new(
                rng.random_range(0.0..DPI),
                rng.random_range(0.0..DPI),
                rng.random_range(0.0..DPI),
            ),
        }
    }
}

/// One LOD tier: a unit sphere tessellation shown from `distance` on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodTier {
    pub segments: u32,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidVariant {
    pub name: String,
    /// Ordered by ascending distance, finest first.
    pub tiers: Vec<LodTier>,
    pub scale: [ScaleJitter; 3],
    pub rotation: RotationJitter,
    pub shader: ShaderKind,
}

impl AsteroidVariant {
    /// Named near-spherical body rendered with plain Lambert shading.
    fn named(name: &str, distances: [f64; 3], scale: [ScaleJitter; 3]) -> Self {
        Self {
            name: name.to_string(),
            tiers: tiers([10, 8, 6], distances),
            scale,
            rotation: RotationJitter::None,
            shader: ShaderKind::Lambert,
        }
    }

    pub fn ceres(distances: [f64; 3]) -> Self {
        Self::named(
            "Ceres",
            distances,
            [ScaleJitter::Fixed, ScaleJitter::Fixed, ScaleJitter::Fixed],
        )
    }

    pub fn pallas(distances: [f64; 3]) -> Self {
        Self::named(
            "Pallas",
            distances,
            [
                ScaleJitter::Additive(0.2..1.2),
                ScaleJitter::Fixed,
                ScaleJitter::Fixed,
            ],
        )
    }

    pub fn vesta(distances: [f64; 3]) -> Self {
        Self::named(
            "Vesta",
            distances,
            [
                ScaleJitter::Additive(0.5..1.5),
                ScaleJitter::Multiplicative(0.7..1.7),
                ScaleJitter::Fixed,
            ],
        )
    }

    pub fn euphrosyne(distances: [f64; 3]) -> Self {
        Self::named(
            "Euphrosyne",
            distances,
            [ScaleJitter::Fixed, ScaleJitter::Fixed, ScaleJitter::Fixed],
        )
    }

    /// Irregular rock: coarse tiers, every axis stretched, random orientation.
    pub fn irregular(distances: [f64; 3]) -> Self {
        Self {
            name: "irregular".to_string(),
            tiers: tiers([6, 5, 4], distances),
            scale: [
                ScaleJitter::Multiplicative(0.5..1.5),
                ScaleJitter::Multiplicative(0.5..1.5),
                ScaleJitter::Multiplicative(0.5..1.5),
            ],
            rotation: RotationJitter::Full,
            shader: ShaderKind::DisplacedAsteroid,
        }
    }

    /// Per-axis scale for an asteroid of base size `base`.
    pub fn sample_scale<R: Rng>(&self, base: f64, rng: &mut R) -> Vector3<f64> {
        Vector3::new(
            self.scale[0].apply(base, rng),
            self.scale[1].apply(base, rng),
            self.scale[2].apply(base, rng),
        )
    }
}

fn tiers(segments: [u32; 3], distances: [f64; 3]) -> Vec<LodTier> {
    segments
        .into_iter()
        .zip(distances)
        .map(|(segments, distance)| LodTier { segments, distance })
        .collect()
}

/// How a table entry recognizes a display name.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Substring(String),
    Regex(Regex),
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Substring(s) => name.contains(s.as_str()),
            NamePattern::Regex(re) => re.is_match(name),
        }
    }
}

/// Ordered name → variant dispatch with a default fallback.
#[derive(Debug, Clone)]
pub struct VariantTable {
    entries: Vec<(NamePattern, AsteroidVariant)>,
    default: AsteroidVariant,
}

impl VariantTable {
    pub fn new(default: AsteroidVariant) -> Self {
        Self {
            entries: Vec::new(),
            default,
        }
    }

    /// Ceres, Pallas, Vesta and Euphrosyne before the irregular default.
    pub fn standard(distances: [f64; 3]) -> Self {
        let mut table = Self::new(AsteroidVariant::irregular(distances));
        for variant in [
            AsteroidVariant::ceres(distances),
            AsteroidVariant::pallas(distances),
            AsteroidVariant::vesta(distances),
            AsteroidVariant::euphrosyne(distances),
        ] {
            let pattern = NamePattern::Substring(variant.name.clone());
            table.push(pattern, variant);
        }
        table
    }

    /// Append an entry; it is tried after every existing one.
    pub fn push(&mut self, pattern: NamePattern, variant: AsteroidVariant) -> &mut Self {
        self.entries.push((pattern, variant));
        self
    }

    /// Append an entry matched by a regular expression.
    pub fn push_regex(
        &mut self,
        pattern: &str,
        variant: AsteroidVariant,
    ) -> Result<&mut Self, OrreryError> {
        let re = Regex::new(pattern)?;
        Ok(self.push(NamePattern::Regex(re), variant))
    }

    pub fn select(&self, display_name: &str) -> &AsteroidVariant {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.matches(display_name))
            .map_or(&self.default, |(_, variant)| variant)
    }

    pub fn default_variant(&self) -> &AsteroidVariant {
        &self.default
    }
}

#[cfg(test)]
mod variant_test {
    use super::*;
    use crate::constants::LOD_DISTANCES;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_select_by_substring() {
        let table = VariantTable::standard(LOD_DISTANCES);
        assert_eq!(table.select("1 Ceres").name, "Ceres");
        assert_eq!(table.select("2 Pallas").name, "Pallas");
        assert_eq!(table.select("4 Vesta").name, "Vesta");
        assert_eq!(table.select("31 Euphrosyne").name, "Euphrosyne");
        assert_eq!(table.select("433 Eros").name, "irregular");
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = VariantTable::standard(LOD_DISTANCES);
        table
            .push_regex("^4 ", AsteroidVariant::ceres(LOD_DISTANCES))
            .unwrap();
        // "Vesta" entry precedes the regex
        assert_eq!(table.select("4 Vesta").name, "Vesta");
        assert_eq!(table.select("4 Unknown").name, "Ceres");
    }

    #[test]
    fn test_invalid_regex() {
        let mut table = VariantTable::standard(LOD_DISTANCES);
        assert!(matches!(
            table.push_regex("(", AsteroidVariant::ceres(LOD_DISTANCES)),
            Err(OrreryError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_vesta_jitters_x_and_y_only() {
        let vesta = AsteroidVariant::vesta(LOD_DISTANCES);
        let segments: Vec<u32> = vesta.tiers.iter().map(|t| t.segments).collect();
        assert_eq!(segments, vec![10, 8, 6]);
        assert!(!vesta.scale[0].is_fixed());
        assert!(!vesta.scale[1].is_fixed());
        assert!(vesta.scale[2].is_fixed());

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let s = vesta.sample_scale(2.0, &mut rng);
            assert!((2.5..3.5).contains(&s.x));
            assert!((1.4..3.4).contains(&s.y));
            assert_eq!(s.z, 2.0);
        }
    }

    #[test]
    fn test_irregular_jitters_everything() {
        let rock = AsteroidVariant::irregular(LOD_DISTANCES);
        let mut rng = StdRng::seed_from_u64(7);
        let s = rock.sample_scale(2.0, &mut rng);
        for k in 0..3 {
            assert!((1.0..3.0).contains(&s[k]));
        }
        let r = rock.rotation.sample(&mut rng);
        assert!(r.iter().all(|a| (0.0..DPI).contains(a)));
        assert_eq!(RotationJitter::None.sample(&mut rng), Vector3::zeros());
    }
}
