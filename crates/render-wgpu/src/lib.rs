//! wgpu render backend for the harbor.
//!
//! Draws the flattened scene from [`harbor_render::draw_list`] as instanced
//! boxes, lit by the key directional light plus ambient, with linear fog.
//! The camera orbits a target point with distance and polar limits.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Camera motion is not part of the animated scene.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
