//! # Scene tree
//!
//! An arena of [`SceneNode`](crate::scene::SceneNode)s addressed by
//! [`NodeId`](crate::scene::NodeId), consumed by the external renderer.
//!
//! ## Structure
//!
//! ```text
//! root
//! ├── backdrop
//! ├── Sun (mesh)
//! ├── Earth orbit (line)
//! ├── Earth (mesh)
//! │   ├── Moon orbit (line)
//! │   └── Moon (mesh)
//! └── 4 Vesta (lod)
//!     ├── tier 0 (mesh)
//!     ├── tier 1 (mesh)
//!     └── tier 2 (mesh)
//! ```
//!
//! Each node carries a local [`Transform`](crate::scene::transform::Transform). World transforms
//! are composed on demand by walking up to the root, so a moon placed in its planet's frame
//! follows the planet without any bookkeeping.
//!
//! Nodes can be created detached (no parent) and attached later; a detached subtree is not
//! reachable from the root and is therefore never drawn.

use std::sync::Arc;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::{orrery_errors::OrreryError, propagator::OrbitPath};

pub mod bounds;
pub mod geometry;
pub mod lod;
pub mod transform;

use bounds::Aabb;
use geometry::Mesh;
use lod::LodLevels;
use transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Polyline drawn for an orbit trace. The path is shared with the owning orbit's cache.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitLine {
    pub path: Arc<OrbitPath>,
    /// 0xRRGGBB
    pub color: u32,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Group,
    Mesh(Mesh),
    OrbitLine(OrbitLine),
    Lod(LodLevels),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    pub fn new() -> Self {
        SceneTree {
            nodes: vec![SceneNode {
                name: "root".into(),
                kind: NodeKind::Root,
                transform: Transform::identity(),
                visible: true,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached node; attach it with [`attach`](Self::attach).
    pub fn create(&mut self, name: impl Into<String>, kind: NodeKind, transform: Transform) -> NodeId {
        self.nodes.push(SceneNode {
            name: name.into(),
            kind,
            transform,
            visible: true,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Create a node directly under `parent`.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        transform: Transform,
    ) -> Result<NodeId, OrreryError> {
        self.check(parent)?;
        let id = self.create(name, kind, transform);
        self.attach(id, parent)?;
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check(&self, id: NodeId) -> Result<&SceneNode, OrreryError> {
        self.node(id).ok_or(OrreryError::NodeNotFound(id.0))
    }

    fn check_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, OrreryError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(OrreryError::NodeNotFound(id.0))
    }

    /// Move `child` (with its subtree) under `parent`, detaching it from its current parent.
    ///
    /// The local transform is kept as is; see
    /// [`reparent_preserving_world_position`](Self::reparent_preserving_world_position) to keep
    /// the node in place.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), OrreryError> {
        self.can_attach(child, parent)?;

        self.detach(child)?;
        self.check_mut(parent)?.children.push(child);
        self.check_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Check that [`attach`](Self::attach) would accept `child` under `parent`, without moving it.
    pub fn can_attach(&self, child: NodeId, parent: NodeId) -> Result<(), OrreryError> {
        self.check(child)?;
        self.check(parent)?;
        if child == self.root() || self.is_ancestor_or_self(child, parent) {
            return Err(OrreryError::CyclicAttachment(child.0));
        }
        Ok(())
    }

    /// Remove `id` from its parent's children. The subtree stays alive but unreachable.
    pub fn detach(&mut self, id: NodeId) -> Result<(), OrreryError> {
        if let Some(parent) = self.check(id)?.parent {
            self.check_mut(parent)?.children.retain(|c| *c != id);
            self.check_mut(id)?.parent = None;
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some() && self.is_ancestor_or_self(self.root(), id)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), OrreryError> {
        self.check_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector3<f64>) -> Result<(), OrreryError> {
        self.check_mut(id)?.transform.translation = position;
        Ok(())
    }

    /// Composition of every local transform from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Result<Matrix4<f64>, OrreryError> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.check(node_id)?;
            matrix = node.transform.to_homogeneous() * matrix;
            current = node.parent;
        }
        Ok(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Result<Point3<f64>, OrreryError> {
        Ok(self.world_matrix(id)?.transform_point(&Point3::origin()))
    }

    /// Reparent `child` under `parent` so that its world position is unchanged at this instant.
    ///
    /// Only the translation is recomputed (`local = parent_world⁻¹ · world`); rotation and scale
    /// stay local.
    pub fn reparent_preserving_world_position(
        &mut self,
        child: NodeId,
        parent: NodeId,
    ) -> Result<(), OrreryError> {
        let world = self.world_position(child)?;
        let inverse = self.reparent_inverse(child, parent)?;

        self.attach(child, parent)?;
        self.check_mut(child)?.transform.translation = inverse.transform_point(&world).coords;
        Ok(())
    }

    /// Check that [`reparent_preserving_world_position`](Self::reparent_preserving_world_position)
    /// would succeed, without moving anything.
    pub fn can_reparent(&self, child: NodeId, parent: NodeId) -> Result<(), OrreryError> {
        self.reparent_inverse(child, parent).map(|_| ())
    }

    fn reparent_inverse(&self, child: NodeId, parent: NodeId) -> Result<Matrix4<f64>, OrreryError> {
        self.can_attach(child, parent)?;
        self.world_matrix(parent)?
            .try_inverse()
            .ok_or(OrreryError::SingularTransform(parent.0))
    }

    /// `id` and all its descendants, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut stack = vec![id];
        let mut out = Vec::new();
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.node(node_id) {
                out.push(node_id);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// World-space box around every mesh vertex in the subtree of `id`, hidden tiers included.
    pub fn bounding_box(&self, id: NodeId) -> Result<Option<Aabb>, OrreryError> {
        let mut bounds: Option<Aabb> = None;
        for node_id in self.descendants(id) {
            if let NodeKind::Mesh(mesh) = &self.check(node_id)?.kind {
                let world = self.world_matrix(node_id)?;
                let points = mesh
                    .geometry
                    .vertices()
                    .into_iter()
                    .map(|p| world.transform_point(&p));
                if let Some(b) = Aabb::from_points(points) {
                    bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
                }
            }
        }
        Ok(bounds)
    }

    /// Show the tier of the LOD node `id` matching `distance` and hide the others.
    ///
    /// Return
    /// ------
    /// * The active tier index, or `None` when `id` is not a LOD node.
    pub fn select_lod(&mut self, id: NodeId, distance: f64) -> Result<Option<usize>, OrreryError> {
        let (index, nodes) = match &mut self.check_mut(id)?.kind {
            NodeKind::Lod(levels) if !levels.is_empty() => {
                let index = levels.level_for_distance(distance);
                levels.set_active(index);
                let nodes: Vec<NodeId> = levels.levels().iter().map(|l| l.node).collect();
                (index, nodes)
            }
            _ => return Ok(None),
        };

        for (k, node) in nodes.into_iter().enumerate() {
            self.set_visible(node, k == index)?;
        }
        Ok(Some(index))
    }
}
