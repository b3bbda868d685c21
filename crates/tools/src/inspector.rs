use harbor_common::EntityId;
use harbor_kernel::Scene;

/// Read-only queries against the scene for panels and CLI output.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let nodes = scene.nodes();
        SceneSummary {
            frame: scene.frame(),
            node_count: nodes.len(),
            drawable_count: nodes.values().filter(|n| n.shape.is_drawable()).count(),
            light_count: scene.environment().lights.len(),
            state_hash: scene.state_hash(),
        }
    }

    /// Local and world placement of one node.
    pub fn inspect_node(scene: &Scene, id: EntityId) -> Option<NodeInfo> {
        let node = scene.get(id)?;
        let world = scene.world_matrix(id)?;
        let t = node.transform;
        let (_, yaw, _) = t.rotation.to_euler(glam::EulerRot::YXZ);
        Some(NodeInfo {
            id,
            name: node.name.clone(),
            parent: node.parent,
            position: t.position.to_array(),
            world_position: world.w_axis.truncate().to_array(),
            yaw_degrees: yaw.to_degrees(),
            scale: t.scale.to_array(),
        })
    }

    /// Node IDs sorted by name, for stable listings.
    pub fn list_nodes(scene: &Scene) -> Vec<EntityId> {
        let mut ids: Vec<(&str, EntityId)> = scene
            .nodes()
            .iter()
            .map(|(id, node)| (node.name.as_str(), *id))
            .collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub frame: u64,
    pub node_count: usize,
    pub drawable_count: usize,
    pub light_count: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: frame={} nodes={} drawable={} lights={} hash={:016x}",
            self.frame, self.node_count, self.drawable_count, self.light_count, self.state_hash
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: EntityId,
    pub name: String,
    pub parent: Option<EntityId>,
    pub position: [f32; 3],
    pub world_position: [f32; 3],
    pub yaw_degrees: f32,
    pub scale: [f32; 3],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} world=({:.2}, {:.2}, {:.2}) yaw={:.1}° scale={:.2}",
            self.id.short(),
            self.name,
            self.world_position[0],
            self.world_position[1],
            self.world_position[2],
            self.yaw_degrees,
            self.scale[0],
        )
    }
}
