//! Harbor composition: turns a [`HarborConfig`] into a populated scene.
//!
//! The static layout (terrain, pier, water, lights, clouds) is built in one
//! go by [`compose_harbor`]. Models arrive later from the loader and are
//! placed with [`install_model`], which also fills the animator's slots.

pub mod config;
pub mod harbor;
pub mod models;

pub use config::{
    AssetsConfig, CameraConfig, CloudConfig, ConfigError, FrameConfig, HarborConfig,
    LightingConfig, WindowConfig,
};
pub use harbor::{Composition, compose_harbor};
pub use models::{InstallError, ModelKind, ModelPlacement, install_model};
