//! Scene animation: the per-frame update applied before each render.
//!
//! The frame loop calls [`Animator::update`] once per frame with the elapsed
//! time. Each animated object sits behind a presence [`Slot`](harbor_common::Slot)
//! in the [`SceneRig`]; objects that have not loaded yet are skipped.
//!
//! # Invariants
//! - The update never fails and never allocates scene nodes.
//! - Phase accumulators only advance while their object is present.
//! - Tunables are read once, as a snapshot, at the start of each update.
//! - `delta == 0` leaves every accumulator and transform where it was.

pub mod animator;
pub mod clock;
pub mod kinematics;
pub mod params;
pub mod rig;

pub use animator::{AnimationState, Animator};
pub use clock::FrameClock;
pub use kinematics::{Bounce, CLOUD_WRAP_BOUND, Direction, Ellipse};
pub use params::{AnimationParams, ParamChange, ParamError, ParamKey, ParamSpec};
pub use rig::{CloudSprite, OrbitRig, SceneRig};
