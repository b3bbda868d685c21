use glam::Vec3;
use harbor_animate::{CloudSprite, Direction, SceneRig};
use harbor_common::Transform;
use harbor_kernel::{
    AmbientLight, Color, DirectionalLight, Environment, Fog, Light, Material, SKYBOX_FACES, Scene,
    SceneNode, ShadowSettings, Shape, SpotLight, TextureRef,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::config::{CloudConfig, HarborConfig};

const SKY: u32 = 0xcce0ff;
const SAND: u32 = 0xdeb887;
const WATER: u32 = 0xafdce0;

/// A freshly composed harbor: the scene and the animator's handles into it.
#[derive(Debug, Clone)]
pub struct Composition {
    pub scene: Scene,
    pub rig: SceneRig,
}

/// Build the static harbor. Models are not part of this; they are placed
/// with [`install_model`](crate::install_model) as they finish loading.
pub fn compose_harbor(config: &HarborConfig) -> Composition {
    let _span = tracing::info_span!("compose_harbor").entered();

    let mut scene = Scene::with_environment(environment(config.lighting.spot_light));
    add_sea_floor(&mut scene);
    add_shore(&mut scene);
    add_pier(&mut scene);
    add_water(&mut scene);

    let mut rig = SceneRig::new();
    rig.clouds = add_clouds(&mut scene, &config.clouds);

    tracing::info!(
        nodes = scene.node_count(),
        clouds = rig.clouds.len(),
        lights = scene.environment().lights.len(),
        "harbor composed"
    );
    Composition { scene, rig }
}

fn environment(spot_light: bool) -> Environment {
    let mut lights = vec![
        Light::Directional(DirectionalLight {
            color: Color::WHITE,
            intensity: 2.5,
            position: Vec3::new(-40.0, 60.0, 40.0),
            target: Vec3::ZERO,
            shadow: Some(ShadowSettings {
                map_size: 1024,
                near: 1.0,
                far: 150.0,
                extent: 80.0,
                radius: 4.0,
            }),
        }),
        Light::Ambient(AmbientLight {
            color: Color::WHITE,
            intensity: 0.2,
        }),
    ];
    if spot_light {
        lights.push(Light::Spot(SpotLight {
            color: Color::WHITE,
            intensity: 5.0,
            position: Vec3::new(-15.0, 25.0, 10.0),
            distance: 50.0,
            angle: FRAC_PI_4,
            penumbra: 0.4,
            decay: 0.2,
            shadow: Some(ShadowSettings {
                map_size: 1024,
                near: 0.5,
                far: 50.0,
                extent: 0.0,
                radius: 1.0,
            }),
        }));
    }
    Environment {
        skybox: SKYBOX_FACES
            .iter()
            .map(|face| format!("textures/skybox/{face}"))
            .collect(),
        fog: Some(Fog {
            color: Color::from_hex(SKY),
            near: 50.0,
            far: 300.0,
        }),
        lights,
    }
}

/// Lay a flat shape on the ground plane.
fn lying_flat(y: f32) -> Transform {
    Transform::from_position(Vec3::new(0.0, y, 0.0)).with_euler(-FRAC_PI_2, 0.0, 0.0)
}

fn add_sea_floor(scene: &mut Scene) {
    let material = Material::Standard {
        color: Color::WHITE,
        map: Some(TextureRef::new("textures/sea_depth.jpg").anisotropy(16)),
        bump_map: None,
        bump_scale: 1.0,
        roughness: 1.0,
        metalness: 0.0,
        double_sided: true,
    };
    scene.add(
        SceneNode::new(
            "sea floor",
            Shape::Plane {
                width: 100.0,
                height: 80.0,
            },
            material,
        )
        .with_transform(lying_flat(0.0))
        .with_shadows(false, true),
    );
}

fn add_shore(scene: &mut Scene) {
    let material = Material::Standard {
        color: Color::from_hex(SAND),
        map: Some(TextureRef::new("textures/sand.jpg").repeat(1.0, 4.0)),
        bump_map: Some(
            TextureRef::new("textures/sand_bump.jpg")
                .repeat(1.0, 4.0)
                .linear(),
        ),
        bump_scale: 5.0,
        roughness: 1.0,
        metalness: 0.0,
        double_sided: false,
    };
    scene.add(
        SceneNode::new(
            "shore",
            Shape::Cylinder {
                radius_top: 11.0,
                radius_bottom: 6.0,
                height: 80.0,
                theta_length: FRAC_PI_2,
            },
            material,
        )
        .with_transform(
            Transform::from_position(Vec3::new(50.0, 0.0, 0.0)).with_euler(
                -FRAC_PI_2,
                -FRAC_PI_2,
                0.0,
            ),
        )
        .with_shadows(true, true),
    );
}

fn wood(bump_scale: f32, anisotropy: u8) -> Material {
    Material::Standard {
        color: Color::WHITE,
        map: Some(TextureRef::new("textures/pier_wood.jpg").anisotropy(anisotropy)),
        bump_map: Some(TextureRef::new("textures/pier_wood_bump.jpg").linear()),
        bump_scale,
        roughness: 1.0,
        metalness: 0.0,
        double_sided: false,
    }
}

fn add_pier(scene: &mut Scene) {
    let planks = |width, depth| Shape::Box {
        width,
        height: 0.75,
        depth,
    };
    let mut solid = |name: &str, shape: Shape, material: Material, at: Vec3| {
        scene.add(
            SceneNode::new(name, shape, material)
                .with_transform(Transform::from_position(at))
                .with_shadows(true, true),
        );
    };

    solid(
        "pier",
        planks(10.0, 75.0),
        wood(10.0, 16),
        Vec3::new(40.0, 2.7, 0.0),
    );
    for (i, z) in [-20.0, 10.0].into_iter().enumerate() {
        solid(
            &format!("pier arm {}", i + 1),
            planks(22.0, 5.0),
            wood(10.0, 1),
            Vec3::new(24.0, 2.7, z),
        );
        solid(
            &format!("pillar {}", i + 1),
            Shape::Box {
                width: 1.0,
                height: 5.0,
                depth: 1.0,
            },
            wood(2.0, 1),
            Vec3::new(15.0, 2.5, z),
        );
    }
}

fn add_water(scene: &mut Scene) {
    scene.add(
        SceneNode::new(
            "water",
            Shape::Water {
                width: 100.0,
                height: 80.0,
            },
            Material::Water {
                color: Color::from_hex(WATER),
                scale: 4.0,
                flow_direction: [0.6, 0.6],
                texture_size: 1024,
            },
        )
        .with_transform(lying_flat(2.0)),
    );
    scene.add(
        SceneNode::new(
            "shadow catcher",
            Shape::Plane {
                width: 200.0,
                height: 200.0,
            },
            Material::Shadow { opacity: 0.3 },
        )
        .with_transform(lying_flat(1.9))
        .with_shadows(false, true),
    );
}

/// Scatter the cloud pool. The first half drifts toward +X and starts on the
/// left, the rest drifts toward -X and starts on the right.
fn add_clouds(scene: &mut Scene, config: &CloudConfig) -> Vec<CloudSprite> {
    let mut rng = Pcg32::seed_from_u64(config.seed);
    (0..config.count)
        .map(|i| {
            let direction = Direction::for_pool_index(i, config.count);
            let scale = Vec3::new(
                rng.random_range(10.0..25.0),
                rng.random_range(5.0..15.0),
                1.0,
            );
            let x = match direction {
                Direction::Positive => rng.random_range(-50.0..0.0),
                Direction::Negative => rng.random_range(0.0..50.0),
            };
            let position = Vec3::new(x, rng.random_range(15.0..25.0), rng.random_range(-40.0..40.0));
            let id = scene.add(
                SceneNode::new(
                    format!("cloud {i}"),
                    Shape::Sprite,
                    Material::Sprite {
                        color: Color::WHITE,
                        map: Some(TextureRef::new("textures/cloud.png")),
                    },
                )
                .with_transform(Transform::from_position(position).with_scale(scale))
                .with_render_order(1),
            );
            CloudSprite { id, direction }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbor_animate::{AnimationParams, Animator};

    #[test]
    fn default_layout() {
        let Composition { scene, rig } = compose_harbor(&HarborConfig::default());
        // floor, shore, pier, two arms, two pillars, water, shadow catcher, six clouds
        assert_eq!(scene.node_count(), 15);
        assert_eq!(rig.clouds.len(), 6);
        assert_eq!(rig.loaded_count(), 0);
        assert_eq!(scene.environment().lights.len(), 2);
        assert_eq!(scene.environment().skybox.len(), 6);
        assert_eq!(scene.environment().skybox[0], "textures/skybox/px.png");
        let pier = scene.find_by_name("pier").unwrap();
        assert_eq!(
            scene.get(pier).unwrap().transform.position,
            Vec3::new(40.0, 2.7, 0.0)
        );
    }

    #[test]
    fn spot_light_is_optional() {
        let mut config = HarborConfig::default();
        config.lighting.spot_light = true;
        let composition = compose_harbor(&config);
        assert!(
            composition
                .scene
                .environment()
                .lights
                .iter()
                .any(|l| matches!(l, Light::Spot(_)))
        );
    }

    #[test]
    fn clouds_start_in_their_half() {
        let mut config = HarborConfig::default();
        config.clouds.count = 9;
        let Composition { scene, rig } = compose_harbor(&config);
        let positive = rig
            .clouds
            .iter()
            .filter(|c| c.direction == Direction::Positive)
            .count();
        assert_eq!(positive, 5);
        for cloud in &rig.clouds {
            let node = scene.get(cloud.id).unwrap();
            let t = node.transform;
            match cloud.direction {
                Direction::Positive => assert!((-50.0..0.0).contains(&t.position.x)),
                Direction::Negative => assert!((0.0..50.0).contains(&t.position.x)),
            }
            assert!((15.0..25.0).contains(&t.position.y));
            assert!((-40.0..40.0).contains(&t.position.z));
            assert!((10.0..25.0).contains(&t.scale.x));
            assert!((5.0..15.0).contains(&t.scale.y));
            assert_eq!(node.render_order, 1);
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let a = compose_harbor(&HarborConfig::default());
        let b = compose_harbor(&HarborConfig::default());
        let xs = |c: &Composition| -> Vec<Vec3> {
            c.rig
                .clouds
                .iter()
                .map(|s| c.scene.get(s.id).unwrap().transform.position)
                .collect()
        };
        assert_eq!(xs(&a), xs(&b));

        let mut config = HarborConfig::default();
        config.clouds.seed = 7;
        assert_ne!(xs(&a), xs(&compose_harbor(&config)));
    }

    #[test]
    fn clouds_animate_before_any_model_loads() {
        let Composition { mut scene, rig } = compose_harbor(&HarborConfig::default());
        let first = rig.clouds[0].id;
        let x0 = scene.get(first).unwrap().transform.position.x;
        let mut animator = Animator::new(rig);
        animator.update(2.0, &AnimationParams::default(), &mut scene);
        let x1 = scene.get(first).unwrap().transform.position.x;
        assert!((x1 - x0 - 1.0).abs() < 1e-5);
        assert_eq!(animator.state().boat_phase, 0.0);
    }

    #[test]
    fn empty_cloud_pool() {
        let mut config = HarborConfig::default();
        config.clouds.count = 0;
        let composition = compose_harbor(&config);
        assert!(composition.rig.clouds.is_empty());
    }
}
