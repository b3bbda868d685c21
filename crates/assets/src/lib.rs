//! Assets: content-addressed registry, glTF metadata import, background loading.
//!
//! Assets are identified by content-addressed hashes. Models are read for
//! their metadata only (meshes, materials, nodes); geometry stays with the
//! graphics stack.
//!
//! # Layout
//! - [`AssetStore`]: registry that can be persisted to disk as JSON.
//! - [`inspect_gltf`]: validates a `.gltf` or `.glb` document and reads its metadata.
//! - [`ModelLoader`]: one worker thread per request, results over a channel.

mod loader;
mod model;
mod store;

pub use model::{ModelInfo, inspect_gltf, parse_gltf_bytes};
pub use loader::{LoadOutcome, ModelLoader};
pub use store::{Asset, AssetId, AssetStore, Material, Mesh};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asset not found: {0:?}")]
    NotFound(AssetId),
    #[error("glTF parse error: {0}")]
    GltfParse(#[from] gltf::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
