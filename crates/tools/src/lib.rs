//! Developer tooling: scene inspector and frame-rate counter.
//!
//! # Invariants
//! - Tools only read the scene.

mod fps;
mod inspector;

pub use fps::FpsCounter;
pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
