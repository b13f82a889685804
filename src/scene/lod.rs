//! Distance-keyed level-of-detail selector.
//!
//! A LOD node owns one child node per tier. Tiers are kept sorted by activation distance and
//! must get cheaper as the distance grows, so rendering cost degrades monotonically.

use crate::orrery_errors::OrreryError;

use super::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct LodLevel {
    /// Camera distance (scene units) from which this tier is shown.
    pub distance: f64,
    pub node: NodeId,
    /// Triangle count of the tier geometry.
    pub cost: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LodLevels {
    levels: Vec<LodLevel>,
    active: usize,
}

impl LodLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tier.
    ///
    /// Arguments
    /// ---------
    /// * `distance` – Activation distance, strictly greater than every registered tier.
    /// * `node` – Child node holding the tier mesh.
    /// * `cost` – Triangle count, no larger than the previous tier's.
    ///
    /// Return
    /// ------
    /// * [`OrreryError::InvalidLodLevel`] when the ordering would be broken.
    pub fn add_level(&mut self, distance: f64, node: NodeId, cost: usize) -> Result<(), OrreryError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(OrreryError::InvalidLodLevel {
                distance,
                reason: "distance must be finite and non-negative".into(),
            });
        }
        if let Some(last) = self.levels.last() {
            if distance <= last.distance {
                return Err(OrreryError::InvalidLodLevel {
                    distance,
                    reason: format!("not farther than the previous tier ({})", last.distance),
                });
            }
            if cost > last.cost {
                return Err(OrreryError::InvalidLodLevel {
                    distance,
                    reason: format!("costs {cost} triangles, more than the nearer tier ({})", last.cost),
                });
            }
        }
        self.levels.push(LodLevel {
            distance,
            node,
            cost,
        });
        Ok(())
    }

    /// Index of the tier to show at `distance`.
    ///
    /// The first tier is shown until the camera passes the second tier's distance, then each
    /// farther tier takes over in turn.
    pub fn level_for_distance(&self, distance: f64) -> usize {
        self.levels
            .iter()
            .enumerate()
            .skip(1)
            .take_while(|(_, level)| distance >= level.distance)
            .last()
            .map_or(0, |(k, _)| k)
    }

    pub fn levels(&self) -> &[LodLevel] {
        &self.levels
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub(crate) fn set_active(&mut self, index: usize) {
        self.active = index;
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
