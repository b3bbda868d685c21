use glam::Vec3;
use harbor_animate::{OrbitRig, SceneRig};
use harbor_assets::ModelInfo;
use harbor_common::{EntityId, Transform};
use harbor_kernel::{Color, Material, Scene, SceneError, SceneNode, Shape};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// The models the harbor loads at startup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Boat,
    SecondBoat,
    Mountain,
    DeadShip,
    Yacht,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Boat,
        ModelKind::SecondBoat,
        ModelKind::Mountain,
        ModelKind::DeadShip,
        ModelKind::Yacht,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Boat => "boat",
            ModelKind::SecondBoat => "second_boat",
            ModelKind::Mountain => "mountain",
            ModelKind::DeadShip => "dead_ship",
            ModelKind::Yacht => "yacht",
        }
    }

    pub fn placement(self) -> ModelPlacement {
        match self {
            ModelKind::Boat => ModelPlacement {
                path: "models/boat/boat.gltf",
                scale: 0.9,
                position: Vec3::new(19.0, 1.7, 18.0),
                yaw: PI / 1.3,
                group: Some(Vec3::new(0.0, 1.47, 0.0)),
            },
            ModelKind::SecondBoat => ModelPlacement {
                path: "models/boat/boat.gltf",
                scale: 0.9,
                position: Vec3::ZERO,
                yaw: PI / 1.6,
                group: Some(Vec3::new(28.0, 1.47, 17.0)),
            },
            ModelKind::Mountain => ModelPlacement {
                path: "models/mountain/scene.gltf",
                scale: 5.0,
                position: Vec3::new(-50.0, 0.0, -20.0),
                yaw: PI / 3.0,
                group: None,
            },
            ModelKind::DeadShip => ModelPlacement {
                path: "models/deadship/scene.gltf",
                scale: 4.0,
                position: Vec3::new(-40.0, 1.0, -3.0),
                yaw: PI / 1.8,
                group: None,
            },
            ModelKind::Yacht => ModelPlacement {
                path: "models/ship/scene.gltf",
                scale: 5.6,
                position: Vec3::ZERO,
                yaw: PI / 2.0,
                group: Some(Vec3::new(0.0, 1.5, 0.0)),
            },
        }
    }

    /// Whether a model of this kind is already in the scene.
    pub fn is_installed(self, scene: &Scene, rig: &SceneRig) -> bool {
        match self {
            ModelKind::Boat => rig.boat.is_filled(),
            ModelKind::SecondBoat => rig.second_boat.is_filled(),
            ModelKind::Mountain => rig.mountain.is_filled(),
            ModelKind::Yacht => rig.yacht.is_filled(),
            ModelKind::DeadShip => scene.find_by_name(self.name()).is_some(),
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a loaded model goes. Models with a group sit inside a transform-only
/// node; the animation moves the group or the model depending on the kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPlacement {
    /// Path relative to the assets root.
    pub path: &'static str,
    pub scale: f32,
    pub position: Vec3,
    pub yaw: f32,
    pub group: Option<Vec3>,
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("{0} is already installed")]
    AlreadyInstalled(ModelKind),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Place a loaded model and hand its nodes to the rig.
///
/// Returns the model node. A kind can be installed once; later attempts are
/// refused and leave the scene untouched.
pub fn install_model(
    kind: ModelKind,
    info: &ModelInfo,
    scene: &mut Scene,
    rig: &mut SceneRig,
) -> Result<EntityId, InstallError> {
    if kind.is_installed(scene, rig) {
        tracing::warn!(%kind, "model already installed, ignoring");
        return Err(InstallError::AlreadyInstalled(kind));
    }

    let placement = kind.placement();
    let [r, g, b, _] = info.primary_color();
    let node = SceneNode::new(
        kind.name(),
        Shape::Model {
            source: info.source.clone(),
            mesh_count: info.mesh_count(),
            node_count: info.node_count,
        },
        Material::standard(Color::rgb(r, g, b)),
    )
    .with_transform(
        Transform::from_position(placement.position)
            .with_yaw(placement.yaw)
            .with_uniform_scale(placement.scale),
    )
    .with_shadows(true, true);

    let (group, model) = match placement.group {
        Some(at) => {
            let group = scene.add(
                SceneNode::group(format!("{kind} group"))
                    .with_transform(Transform::from_position(at)),
            );
            (Some(group), scene.add_child(group, node)?)
        }
        None => (None, scene.add(node)),
    };

    // Checked above, so these fills cannot be refused.
    let filled = match (kind, group) {
        (ModelKind::Boat, _) => rig.boat.fill(model),
        (ModelKind::SecondBoat, _) => rig.second_boat.fill(model),
        (ModelKind::Mountain, _) => rig.mountain.fill(model),
        (ModelKind::Yacht, Some(group)) => rig.yacht.fill(OrbitRig { group, body: model }),
        (ModelKind::Yacht, None) | (ModelKind::DeadShip, _) => Ok(()),
    };
    if let Err(e) = filled {
        tracing::warn!(%kind, "rig slot refused: {e}");
    }

    tracing::info!(
        %kind,
        id = %model.short(),
        meshes = info.mesh_count(),
        loaded = rig.loaded_count(),
        "model installed"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbor_animate::{AnimationParams, Animator};

    fn install_all(scene: &mut Scene, rig: &mut SceneRig) {
        for kind in ModelKind::ALL {
            let info = ModelInfo::placeholder(kind.placement().path);
            install_model(kind, &info, scene, rig).unwrap();
        }
    }

    #[test]
    fn installs_fill_every_slot() {
        let mut scene = Scene::new();
        let mut rig = SceneRig::new();
        install_all(&mut scene, &mut rig);
        assert_eq!(rig.loaded_count(), 4);
        // boat, second boat and yacht each bring a group.
        assert_eq!(scene.node_count(), 8);
        assert!(scene.find_by_name("dead_ship").is_some());
    }

    #[test]
    fn second_install_is_refused() {
        let mut scene = Scene::new();
        let mut rig = SceneRig::new();
        let info = ModelInfo::placeholder("boat.gltf");
        let first = install_model(ModelKind::Boat, &info, &mut scene, &mut rig).unwrap();
        let count = scene.node_count();
        assert!(matches!(
            install_model(ModelKind::Boat, &info, &mut scene, &mut rig),
            Err(InstallError::AlreadyInstalled(ModelKind::Boat))
        ));
        assert_eq!(scene.node_count(), count);
        assert_eq!(rig.boat.copied(), Some(first));

        install_model(ModelKind::DeadShip, &info, &mut scene, &mut rig).unwrap();
        assert!(install_model(ModelKind::DeadShip, &info, &mut scene, &mut rig).is_err());
    }

    #[test]
    fn boat_sits_in_lifted_group() {
        let mut scene = Scene::new();
        let mut rig = SceneRig::new();
        let boat =
            install_model(ModelKind::Boat, &ModelInfo::placeholder("b"), &mut scene, &mut rig)
                .unwrap();
        let node = scene.get(boat).unwrap();
        let group = scene.get(node.parent.unwrap()).unwrap();
        assert_eq!(group.transform.position, Vec3::new(0.0, 1.47, 0.0));
        assert_eq!(node.transform.scale, Vec3::splat(0.9));
        assert!(node.cast_shadow && node.receive_shadow);

        let world = scene.world_matrix(boat).unwrap().w_axis;
        assert!((world.y - (1.47 + 1.7)).abs() < 1e-5);
    }

    #[test]
    fn yacht_orbit_uses_group_and_body() {
        let mut scene = Scene::new();
        let mut rig = SceneRig::new();
        let body =
            install_model(ModelKind::Yacht, &ModelInfo::placeholder("y"), &mut scene, &mut rig)
                .unwrap();
        let orbit = rig.yacht.copied().unwrap();
        assert_eq!(orbit.body, body);
        assert_eq!(scene.get(body).unwrap().parent, Some(orbit.group));
    }

    #[test]
    fn late_install_joins_animation() {
        let mut scene = Scene::new();
        let mut animator = Animator::default();
        let params = AnimationParams::default();
        animator.update(1.0, &params, &mut scene);
        install_model(
            ModelKind::Yacht,
            &ModelInfo::placeholder("y"),
            &mut scene,
            animator.rig_mut(),
        )
        .unwrap();
        animator.update(1.0, &params, &mut scene);
        assert!((animator.state().orbit_phase - 0.2).abs() < 1e-6);
        let group = animator.rig().yacht.copied().unwrap().group;
        let p = scene.get(group).unwrap().transform.position;
        assert!((p.y - 1.5).abs() < 1e-6);
        assert!((p.x - 6.68).abs() < 1e-2);
    }

    #[test]
    fn model_colour_comes_from_first_material() {
        let mut scene = Scene::new();
        let mut rig = SceneRig::new();
        let mut info = ModelInfo::placeholder("m");
        info.materials.push(("rock".into(), [0.4, 0.3, 0.2, 1.0]));
        let id = install_model(ModelKind::Mountain, &info, &mut scene, &mut rig).unwrap();
        assert_eq!(
            scene.get(id).unwrap().material.preview_color(),
            [0.4, 0.3, 0.2, 1.0]
        );
    }
}
