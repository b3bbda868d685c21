use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::AssetError;

const DEFAULT_BASE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// What a model file declares, without its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub source: String,
    pub mesh_names: Vec<String>,
    pub materials: Vec<(String, [f32; 4])>,
    pub node_count: usize,
}

impl ModelInfo {
    /// A stand-in for when no file is read (headless runs, tests).
    pub fn placeholder(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mesh_names: vec!["placeholder".into()],
            materials: Vec::new(),
            node_count: 1,
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.mesh_names.len()
    }

    /// Base colour of the first material, or a neutral grey.
    pub fn primary_color(&self) -> [f32; 4] {
        self.materials
            .first()
            .map(|(_, c)| *c)
            .unwrap_or(DEFAULT_BASE_COLOR)
    }
}

/// Read model metadata from a `.gltf` (JSON) or `.glb` (binary) file.
pub fn inspect_gltf(path: impl AsRef<Path>) -> Result<ModelInfo, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    parse_gltf_bytes(&path.display().to_string(), &bytes)
}

/// Parse and validate a glTF document from file contents.
///
/// Buffers and images are not loaded. `source` is recorded as-is.
pub fn parse_gltf_bytes(source: &str, bytes: &[u8]) -> Result<ModelInfo, AssetError> {
    let document = gltf::Gltf::from_slice(bytes)?;

    let mesh_names = document
        .meshes()
        .map(|mesh| format!("{}_{}", mesh.name().unwrap_or("unnamed"), mesh.index()))
        .collect();

    let materials = document
        .materials()
        .enumerate()
        .map(|(i, material)| {
            let name = material.name().unwrap_or("unnamed");
            let color = material.pbr_metallic_roughness().base_color_factor();
            (format!("{name}_{i}"), color)
        })
        .collect();

    Ok(ModelInfo {
        source: source.to_string(),
        mesh_names,
        materials,
        node_count: document.nodes().count(),
    })
}
