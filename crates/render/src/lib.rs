//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene, never mutate it.
//! - Everything drawn derives from the scene and a view.
//!
//! [`draw_list`] flattens the scene graph into world-space boxes in draw
//! order, which the GPU backend uploads as instances. [`DebugTextRenderer`]
//! prints the same scene for headless runs.

mod draw;
mod renderer;

pub use draw::{DrawItem, draw_list};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
