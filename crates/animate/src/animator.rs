use glam::Vec3;
use harbor_kernel::Scene;

use crate::clock::sanitize_delta;
use crate::kinematics::{self, Bounce, CLOUD_WRAP_BOUND, Ellipse};
use crate::params::{AnimationParams, ParamChange};
use crate::rig::SceneRig;

/// Phase accumulators. Live for the whole run, reset only on restart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    pub boat_phase: f64,
    pub second_boat_phase: f64,
    pub orbit_phase: f64,
}

/// Applies the per-frame animation to the scene.
///
/// Owns the accumulators and the rig of animated handles. The tunables are
/// passed in each frame so the caller decides where they live.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    state: AnimationState,
    rig: SceneRig,
}

impl Animator {
    pub fn new(rig: SceneRig) -> Self {
        Self {
            state: AnimationState::default(),
            rig,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn rig(&self) -> &SceneRig {
        &self.rig
    }

    /// Loaders fill slots through this as models arrive.
    pub fn rig_mut(&mut self) -> &mut SceneRig {
        &mut self.rig
    }

    /// Advance every present animated object by `delta` seconds.
    ///
    /// Never fails. Absent objects are skipped and their accumulators stay put.
    /// Before any model loads, the scene's frame counter is the only thing
    /// written.
    pub fn update(&mut self, delta: f32, params: &AnimationParams, scene: &mut Scene) {
        let delta = sanitize_delta(delta);
        let params = *params;

        if let Some(boat) = self.rig.boat.copied() {
            self.state.boat_phase =
                kinematics::advance_phase(self.state.boat_phase, delta, params.boat_bounce_speed);
            if let Some(t) = scene.transform_mut(boat) {
                t.position.y = Bounce::BOAT.height(self.state.boat_phase);
            }
        }

        if let Some(boat) = self.rig.second_boat.copied() {
            self.state.second_boat_phase = kinematics::advance_phase(
                self.state.second_boat_phase,
                delta,
                params.boat_bounce_speed,
            );
            if let Some(t) = scene.transform_mut(boat) {
                t.position.y = Bounce::BOAT.height(self.state.second_boat_phase);
            }
        }

        if let Some(mountain) = self.rig.mountain.copied() {
            if let Some(t) = scene.transform_mut(mountain) {
                t.scale = Vec3::splat(params.mountain_scale);
            }
        }

        for cloud in &self.rig.clouds {
            if let Some(t) = scene.transform_mut(cloud.id) {
                t.position.x = kinematics::drift(
                    t.position.x,
                    cloud.direction,
                    params.cloud_speed,
                    delta,
                    CLOUD_WRAP_BOUND,
                );
            }
        }

        if self.rig.yacht.is_filled() {
            self.state.orbit_phase =
                kinematics::advance_phase(self.state.orbit_phase, delta, params.yacht_orbit_speed);
            self.place_on_orbit(&params, scene);
        }

        scene.advance_frame();
        tracing::trace!(
            frame = scene.frame(),
            delta,
            orbit_phase = self.state.orbit_phase,
            "animation step"
        );
    }

    /// React to a tunable edit made between frames.
    ///
    /// Center edits move the orbiting body at once using the current phase,
    /// so a paused orbit still follows the panel. Other keys take effect on
    /// the next [`update`](Self::update).
    pub fn apply_change(&self, change: ParamChange, params: &AnimationParams, scene: &mut Scene) {
        if !change.key.needs_notification() || change.is_noop() {
            return;
        }
        if self.rig.yacht.is_filled() {
            tracing::debug!(key = %change.key, value = change.new, "relocating orbit");
            self.place_on_orbit(params, scene);
        }
    }

    fn place_on_orbit(&self, params: &AnimationParams, scene: &mut Scene) {
        let Some(orbit) = self.rig.yacht.copied() else {
            return;
        };
        let ellipse = Ellipse::from_params(params);
        let phase = self.state.orbit_phase;
        let (x, z) = ellipse.point(phase);
        if let Some(t) = scene.transform_mut(orbit.group) {
            t.position.x = x;
            t.position.z = z;
        }
        if let Some(t) = scene.transform_mut(orbit.body) {
            t.rotation = glam::Quat::from_rotation_y(ellipse.heading(phase));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Direction;
    use crate::params::ParamKey;
    use crate::rig::{CloudSprite, OrbitRig};
    use harbor_common::{EntityId, Transform};
    use harbor_kernel::{Material, SceneNode, Shape};
    use std::f32::consts::FRAC_PI_2;

    fn model(name: &str) -> SceneNode {
        SceneNode::new(
            name,
            Shape::Model {
                source: format!("{name}.gltf"),
                mesh_count: 1,
                node_count: 1,
            },
            Material::None,
        )
    }

    fn cloud(scene: &mut Scene, x: f32) -> EntityId {
        scene.add(
            SceneNode::new("cloud", Shape::Sprite, Material::None)
                .with_transform(Transform::from_position(Vec3::new(x, 20.0, 0.0))),
        )
    }

    struct Fixture {
        scene: Scene,
        animator: Animator,
        boat: EntityId,
        second_boat: EntityId,
        yacht_group: EntityId,
        yacht: EntityId,
        mountain: EntityId,
    }

    fn loaded_fixture() -> Fixture {
        let mut scene = Scene::new();
        let boat_group = scene.add(SceneNode::group("boat group"));
        let boat = scene
            .add_child(
                boat_group,
                model("boat").with_transform(Transform::from_position(Vec3::new(19.0, 1.7, 18.0))),
            )
            .unwrap();
        let second_group = scene.add(SceneNode::group("second boat group"));
        let second_boat = scene.add_child(second_group, model("boat")).unwrap();
        let yacht_group = scene.add(SceneNode::group("yacht group"));
        let yacht = scene.add_child(yacht_group, model("yacht")).unwrap();
        let mountain = scene.add(model("mountain"));

        let mut rig = SceneRig::new();
        rig.boat.fill(boat).unwrap();
        rig.second_boat.fill(second_boat).unwrap();
        rig.yacht
            .fill(OrbitRig {
                group: yacht_group,
                body: yacht,
            })
            .unwrap();
        rig.mountain.fill(mountain).unwrap();
        rig.clouds.push(CloudSprite {
            id: cloud(&mut scene, -10.0),
            direction: Direction::Positive,
        });
        rig.clouds.push(CloudSprite {
            id: cloud(&mut scene, 10.0),
            direction: Direction::Negative,
        });

        Fixture {
            scene,
            animator: Animator::new(rig),
            boat,
            second_boat,
            yacht_group,
            yacht,
            mountain,
        }
    }

    fn y(scene: &Scene, id: EntityId) -> f32 {
        scene.get(id).unwrap().transform.position.y
    }

    #[test]
    fn empty_rig_writes_nothing() {
        let mut scene = Scene::new();
        let stray = scene.add(model("not in rig"));
        let before = scene.transform_hash();
        let mut animator = Animator::default();
        for _ in 0..10 {
            animator.update(0.5, &AnimationParams::default(), &mut scene);
        }
        assert_eq!(scene.transform_hash(), before);
        assert_eq!(animator.state(), &AnimationState::default());
        assert!(scene.get(stray).is_some());
        assert_eq!(scene.frame(), 10);
    }

    #[test]
    fn absent_models_do_not_advance_phase() {
        let mut scene = Scene::new();
        let mut animator = Animator::default();
        animator.update(1.0, &AnimationParams::default(), &mut scene);
        assert_eq!(animator.state().boat_phase, 0.0);
        assert_eq!(animator.state().orbit_phase, 0.0);

        let boat = scene.add(model("boat"));
        animator.rig_mut().boat.fill(boat).unwrap();
        animator.update(1.0, &AnimationParams::default(), &mut scene);
        assert_eq!(animator.state().boat_phase, 1.0);
        assert_eq!(animator.state().second_boat_phase, 0.0);
    }

    #[test]
    fn bounce_sequence_over_quarter_turns() {
        let mut f = loaded_fixture();
        let params = AnimationParams::default();
        f.animator.update(0.0, &params, &mut f.scene);
        let mut heights = vec![y(&f.scene, f.boat)];
        for _ in 0..4 {
            f.animator.update(FRAC_PI_2, &params, &mut f.scene);
            heights.push(y(&f.scene, f.boat));
        }
        let expected = [0.2, 0.4, 0.2, 0.4, 0.2];
        for (h, e) in heights.iter().zip(expected) {
            assert!((h - e).abs() < 1e-5, "{heights:?}");
        }
        // Both boats share the speed, so they stay in step.
        assert!((y(&f.scene, f.second_boat) - y(&f.scene, f.boat)).abs() < 1e-6);
    }

    #[test]
    fn zero_bounce_speed_holds_base_height() {
        let mut f = loaded_fixture();
        let params = AnimationParams {
            boat_bounce_speed: 0.0,
            ..AnimationParams::default()
        };
        for _ in 0..5 {
            f.animator.update(0.3, &params, &mut f.scene);
            assert!((y(&f.scene, f.boat) - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn orbit_scenario() {
        let mut f = loaded_fixture();
        f.animator
            .update(1.0, &AnimationParams::default(), &mut f.scene);
        assert!((f.animator.state().orbit_phase - 0.2).abs() < 1e-6);
        let p = f.scene.get(f.yacht_group).unwrap().transform.position;
        assert!((p.x - 6.68).abs() < 1e-2, "x = {}", p.x);
        assert!((p.z - 5.96).abs() < 1e-2, "z = {}", p.z);

        let heading = Ellipse::from_params(&AnimationParams::default()).heading(0.2);
        let rot = f.scene.get(f.yacht).unwrap().transform.rotation;
        assert!(rot.abs_diff_eq(glam::Quat::from_rotation_y(heading), 1e-6));
    }

    #[test]
    fn orbit_stays_on_ellipse_while_params_change() {
        let mut f = loaded_fixture();
        let mut params = AnimationParams::default();
        for step in 0..200 {
            if step % 25 == 0 {
                let r = 5.0 + (step % 45) as f32;
                params.set(ParamKey::YachtOrbitRadiusX, r).unwrap();
                params.set(ParamKey::YachtOrbitCenterZ, -(step as f32) / 10.0).unwrap();
            }
            f.animator.update(0.37, &params, &mut f.scene);
            let p = f.scene.get(f.yacht_group).unwrap().transform.position;
            let e = Ellipse::from_params(&params);
            assert!((e.normalized_radius(p.x, p.z) - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn radius_change_keeps_phase() {
        let mut f = loaded_fixture();
        let mut params = AnimationParams::default();
        f.animator.update(2.0, &params, &mut f.scene);
        let phase = f.animator.state().orbit_phase;
        params.set(ParamKey::YachtOrbitRadiusZ, 45.0).unwrap();
        f.animator.update(0.0, &params, &mut f.scene);
        assert_eq!(f.animator.state().orbit_phase, phase);
    }

    #[test]
    fn center_change_relocates_paused_orbit() {
        let mut f = loaded_fixture();
        let mut params = AnimationParams {
            yacht_orbit_speed: 0.0,
            ..AnimationParams::default()
        };
        f.animator.update(0.1, &params, &mut f.scene);
        let before = f.scene.get(f.yacht_group).unwrap().transform.position;

        let change = params.set(ParamKey::YachtOrbitCenterX, 20.0).unwrap();
        f.animator.apply_change(change, &params, &mut f.scene);
        let after = f.scene.get(f.yacht_group).unwrap().transform.position;
        assert!((after.x - before.x - 29.0).abs() < 1e-4);
        assert_eq!(after.z, before.z);
    }

    #[test]
    fn non_center_change_waits_for_tick() {
        let mut f = loaded_fixture();
        let mut params = AnimationParams::default();
        f.animator.update(0.1, &params, &mut f.scene);
        let before = f.scene.transform_hash();
        let change = params.set(ParamKey::YachtOrbitRadiusX, 40.0).unwrap();
        f.animator.apply_change(change, &params, &mut f.scene);
        assert_eq!(before, f.scene.transform_hash());
    }

    #[test]
    fn mountain_scale_is_forced() {
        let mut f = loaded_fixture();
        let mut params = AnimationParams::default();
        params.set(ParamKey::MountainScale, 8.0).unwrap();
        f.scene.transform_mut(f.mountain).unwrap().scale = Vec3::ONE;
        f.animator.update(0.0, &params, &mut f.scene);
        assert_eq!(f.scene.get(f.mountain).unwrap().transform.scale, Vec3::splat(8.0));
    }

    #[test]
    fn clouds_drift_and_wrap() {
        let mut f = loaded_fixture();
        let params = AnimationParams {
            cloud_speed: 10.0,
            ..AnimationParams::default()
        };
        let ids: Vec<EntityId> = f.animator.rig().clouds.iter().map(|c| c.id).collect();
        f.animator.update(1.0, &params, &mut f.scene);
        assert_eq!(f.scene.get(ids[0]).unwrap().transform.position.x, 0.0);
        assert_eq!(f.scene.get(ids[1]).unwrap().transform.position.x, 0.0);
        for _ in 0..200 {
            f.animator.update(0.7, &params, &mut f.scene);
            for id in &ids {
                let x = f.scene.get(*id).unwrap().transform.position.x;
                assert!((-50.0..=50.0).contains(&x));
            }
        }
    }

    #[test]
    fn zero_delta_is_idempotent() {
        let mut f = loaded_fixture();
        let params = AnimationParams::default();
        f.animator.update(0.8, &params, &mut f.scene);
        let hash = f.scene.transform_hash();
        let state = *f.animator.state();
        for _ in 0..50 {
            f.animator.update(0.0, &params, &mut f.scene);
        }
        assert_eq!(hash, f.scene.transform_hash());
        assert_eq!(state, *f.animator.state());
    }

    #[test]
    fn bad_deltas_are_treated_as_zero() {
        let mut f = loaded_fixture();
        let params = AnimationParams::default();
        f.animator.update(0.5, &params, &mut f.scene);
        let state = *f.animator.state();
        f.animator.update(-3.0, &params, &mut f.scene);
        f.animator.update(f32::NAN, &params, &mut f.scene);
        assert_eq!(state, *f.animator.state());
    }

    #[test]
    fn frame_counter_advances() {
        let mut f = loaded_fixture();
        for _ in 0..3 {
            f.animator
                .update(0.016, &AnimationParams::default(), &mut f.scene);
        }
        assert_eq!(f.scene.frame(), 3);
    }
}
