use glam::Mat4;
use harbor_common::{EntityId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::environment::Environment;
use crate::node::SceneNode;

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(EntityId),
    #[error("parent {0:?} not found")]
    ParentNotFound(EntityId),
}

/// The authoritative scene state.
///
/// Owns every node plus the environment. Uses BTreeMap for deterministic
/// iteration order across all platforms. Transforms are local to the
/// parent node; [`Scene::world_matrix`] composes the chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<EntityId, SceneNode>,
    environment: Environment,
    /// Number of animation steps applied so far.
    frame: u64,
}

impl Scene {
    /// Create an empty scene at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Animation steps applied so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Record that one animation step has been applied.
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    /// Number of nodes in the scene.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only access to all nodes (BTreeMap for deterministic iteration).
    pub fn nodes(&self) -> &BTreeMap<EntityId, SceneNode> {
        &self.nodes
    }

    /// Add a root node. Returns its id.
    pub fn add(&mut self, node: SceneNode) -> EntityId {
        let id = EntityId::new();
        let mut node = node;
        node.parent = None;
        self.nodes.insert(id, node);
        id
    }

    /// Add a node under an existing parent.
    pub fn add_child(&mut self, parent: EntityId, node: SceneNode) -> Result<EntityId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::ParentNotFound(parent));
        }
        let id = EntityId::new();
        let mut node = node;
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Get a reference to a node.
    pub fn get(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Mutable access to a node's local transform.
    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.transform)
    }

    /// Replace a node's local transform.
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(SceneError::NodeNotFound(id))?;
        node.transform = transform;
        Ok(())
    }

    /// Children of a node in deterministic order.
    pub fn children(&self, parent: EntityId) -> Vec<EntityId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    /// First node with the given name, in id order.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// World-space matrix of a node: the product of its ancestors' local matrices.
    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut matrix = node.transform.matrix();
        // Bounded by node count so a malformed parent cycle cannot spin forever.
        for _ in 0..self.nodes.len() {
            let Some(parent_id) = node.parent else {
                return Some(matrix);
            };
            node = self.nodes.get(&parent_id)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// Compute a deterministic hash of all node transforms and the frame counter.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        for (id, node) in &self.nodes {
            let t = &node.transform;
            mix(&mut h, id.0.as_bytes());
            for v in t.position.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.scale.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }

    /// Hash of transforms only, ignoring the frame counter.
    pub fn transform_hash(&self) -> u64 {
        let mut copy = self.clone();
        copy.frame = 0;
        copy.state_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Material, Shape};
    use glam::Vec3;

    fn cube(name: &str) -> SceneNode {
        SceneNode::new(
            name,
            Shape::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::None,
        )
    }

    #[test]
    fn scene_starts_empty() {
        let s = Scene::new();
        assert_eq!(s.frame(), 0);
        assert_eq!(s.node_count(), 0);
    }

    #[test]
    fn add_child_requires_parent() {
        let mut s = Scene::new();
        let missing = EntityId::new();
        assert_eq!(
            s.add_child(missing, cube("orphan")),
            Err(SceneError::ParentNotFound(missing))
        );
        let root = s.add(SceneNode::group("root"));
        let child = s.add_child(root, cube("child")).unwrap();
        assert_eq!(s.get(child).unwrap().parent, Some(root));
        assert_eq!(s.children(root), vec![child]);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut s = Scene::new();
        let group = s.add(
            SceneNode::group("lift").with_transform(Transform::from_position(Vec3::new(
                0.0, 1.47, 0.0,
            ))),
        );
        let child = s
            .add_child(
                group,
                cube("boat").with_transform(Transform::from_position(Vec3::new(19.0, 0.2, 18.0))),
            )
            .unwrap();
        let world = s.world_matrix(child).unwrap();
        let origin = world.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(19.0, 1.67, 18.0), 1e-5));
    }

    #[test]
    fn set_transform_unknown_node() {
        let mut s = Scene::new();
        let id = EntityId::new();
        assert_eq!(
            s.set_transform(id, Transform::default()),
            Err(SceneError::NodeNotFound(id))
        );
    }

    #[test]
    fn state_hash_tracks_transforms() {
        let mut s = Scene::new();
        let id = s.add(cube("a"));
        let before = s.state_hash();
        assert_eq!(before, s.state_hash());
        s.transform_mut(id).unwrap().position.x = 3.0;
        assert_ne!(before, s.state_hash());
    }

    #[test]
    fn transform_hash_ignores_frame() {
        let mut s = Scene::new();
        s.add(cube("a"));
        let before = s.transform_hash();
        let full_before = s.state_hash();
        s.advance_frame();
        assert_eq!(before, s.transform_hash());
        assert_ne!(full_before, s.state_hash());
    }

    #[test]
    fn find_by_name() {
        let mut s = Scene::new();
        let id = s.add(cube("pier"));
        assert_eq!(s.find_by_name("pier"), Some(id));
        assert_eq!(s.find_by_name("dock"), None);
    }

    #[test]
    fn btreemap_gives_deterministic_iteration() {
        let mut s = Scene::new();
        for i in 0..50 {
            s.add(cube(&format!("n{i}")));
        }
        let keys: Vec<EntityId> = s.nodes().keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
