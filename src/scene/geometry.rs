//! Geometry and material descriptors attached to mesh nodes.
//!
//! Only what the scene graph needs is modeled: enough vertex data to compute bounding volumes
//! and a triangle count to order LOD tiers. Textures are asset paths resolved by the renderer.

use nalgebra::Point3;

use crate::constants::DPI;

/// Parametric geometry, following the usual UV-sphere and flat-ring tessellations.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    /// Annulus in the local XY plane.
    Ring {
        inner_radius: f64,
        outer_radius: f64,
        theta_segments: u32,
    },
}

impl Geometry {
    pub fn sphere(radius: f64, segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: segments,
            height_segments: segments,
        }
    }

    /// Vertex positions in the local frame of the mesh.
    pub fn vertices(&self) -> Vec<Point3<f64>> {
        match *self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                let (w, h) = (width_segments.max(3), height_segments.max(2));
                let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
                for iy in 0..=h {
                    let v = iy as f64 / h as f64;
                    let (sin_v, cos_v) = (v * std::f64::consts::PI).sin_cos();
                    for ix in 0..=w {
                        let u = ix as f64 / w as f64;
                        let (sin_u, cos_u) = (u * DPI).sin_cos();
                        vertices.push(Point3::new(
                            -radius * cos_u * sin_v,
                            radius * cos_v,
                            radius * sin_u * sin_v,
                        ));
                    }
                }
                vertices
            }
            Geometry::Ring {
                inner_radius,
                outer_radius,
                theta_segments,
            } => {
                let segments = theta_segments.max(3);
                [inner_radius, outer_radius]
                    .iter()
                    .flat_map(|&r| {
                        (0..=segments).map(move |k| {
                            let (s, c) = (k as f64 / segments as f64 * DPI).sin_cos();
                            Point3::new(r * c, r * s, 0.0)
                        })
                    })
                    .collect()
            }
        }
    }

    /// Number of triangles the renderer will rasterize for this geometry.
    pub fn triangle_count(&self) -> usize {
        match *self {
            Geometry::Sphere {
                width_segments,
                height_segments,
                ..
            } => {
                let (w, h) = (width_segments.max(3) as usize, height_segments.max(2) as usize);
                // one triangle per quad on the two polar rows
                2 * w * (h - 1)
            }
            Geometry::Ring { theta_segments, .. } => 2 * theta_segments.max(3) as usize,
        }
    }
}

/// Shading model requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    /// Unlit, used for orbit lines and big particles.
    Basic,
    Lambert,
    /// Lambert with normal and ring maps.
    Phong,
    /// Lambert with the vertex displacement that makes spheres look like rocks.
    DisplacedAsteroid,
    /// Animated surface and glow of the star.
    Star,
    /// Inside-out textured sphere behind everything else.
    Backdrop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shader: ShaderKind,
    /// 0xRRGGBB
    pub color: u32,
    pub emissive: Option<u32>,
    pub texture: Option<String>,
    pub normal_map: Option<String>,
    pub transparent: bool,
}

impl Material {
    pub fn flat(shader: ShaderKind, color: u32) -> Self {
        Self {
            shader,
            color,
            emissive: None,
            texture: None,
            normal_map: None,
            transparent: false,
        }
    }

    pub fn textured(texture: &str, normal_map: Option<&str>) -> Self {
        Self {
            shader: if normal_map.is_some() {
                ShaderKind::Phong
            } else {
                ShaderKind::Lambert
            },
            color: 0xff_ff_ff,
            emissive: None,
            texture: Some(texture.to_string()),
            normal_map: normal_map.map(str::to_string),
            transparent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }
}
