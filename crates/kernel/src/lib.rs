//! Scene Kernel: the authoritative scene graph every other crate reads from.
//!
//! # Invariants
//! - Node iteration order is deterministic (BTreeMap keyed by id).
//! - A node's parent, when set, always refers to a node in the same scene.
//! - Renderers read the scene; only the composer and the animator write it.

pub mod environment;
pub mod node;
pub mod scene;

pub use environment::{
    AmbientLight, DirectionalLight, Environment, Fog, Light, ShadowSettings, SKYBOX_FACES,
    SpotLight,
};
pub use node::{Color, Material, SceneNode, Shape, TextureRef};
pub use scene::{Scene, SceneError};
