//! Shared vertex buffer for batched point rendering of large asteroid populations.
//!
//! The renderer owns the GPU side; orbits only keep a [`PointIndex`] into this buffer and move
//! their vertex through it, never a reference to the storage itself.

use nalgebra::Vector3;

/// Stable index of one vertex in a [`PointCloudBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointIndex(pub(crate) usize);

impl PointIndex {
    pub fn get(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloudBuffer {
    vertices: Vec<Vector3<f32>>,
    dirty: bool,
}

impl PointCloudBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a vertex at the origin and return its index.
    pub fn push_placeholder(&mut self) -> PointIndex {
        self.vertices.push(Vector3::zeros());
        self.dirty = true;
        PointIndex(self.vertices.len() - 1)
    }

    /// Move the vertex at `index`. Returns `false` for an index this buffer never handed out.
    pub fn set(&mut self, index: PointIndex, position: &Vector3<f64>) -> bool {
        match self.vertices.get_mut(index.0) {
            Some(vertex) => {
                *vertex = position.cast::<f32>();
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: PointIndex) -> Option<&Vector3<f32>> {
        self.vertices.get(index.0)
    }

    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether vertices changed since the renderer last uploaded them; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
