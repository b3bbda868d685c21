use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use crate::AssetError;
use crate::model::{ModelInfo, inspect_gltf};

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// A mesh as declared by a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub source: String,
}

/// A material as declared by a model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
}

/// An asset entry in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Asset {
    Mesh(Mesh),
    Material(Material),
}

/// Content-addressed asset registry.
///
/// Identical declarations from different loads of the same file (both boats
/// share one model) collapse to a single entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetStore {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh and return its asset ID.
    pub fn register_mesh(&mut self, mesh: Mesh) -> AssetId {
        let id = hash_parts(&[mesh.source.as_bytes(), mesh.name.as_bytes()]);
        self.assets.insert(id, Asset::Mesh(mesh));
        id
    }

    /// Register a material and return its asset ID.
    pub fn register_material(&mut self, material: Material) -> AssetId {
        let color: Vec<u8> = material
            .base_color
            .iter()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        let id = hash_parts(&[material.name.as_bytes(), &color]);
        self.assets.insert(id, Asset::Material(material));
        id
    }

    /// Register every mesh and material a model declares.
    pub fn register_model(&mut self, info: &ModelInfo) -> Vec<AssetId> {
        let mut ids: Vec<AssetId> = info
            .mesh_names
            .iter()
            .map(|name| {
                self.register_mesh(Mesh {
                    name: name.clone(),
                    source: info.source.clone(),
                })
            })
            .collect();
        for (name, base_color) in &info.materials {
            ids.push(self.register_material(Material {
                name: name.clone(),
                base_color: *base_color,
            }));
        }
        tracing::debug!(source = %info.source, assets = ids.len(), "registered model assets");
        ids
    }

    /// Read a model file and register its declarations.
    pub fn import_gltf(&mut self, path: impl AsRef<Path>) -> Result<Vec<AssetId>, AssetError> {
        let info = inspect_gltf(path)?;
        Ok(self.register_model(&info))
    }

    /// Get an asset by ID.
    pub fn get(&self, id: AssetId) -> Result<&Asset, AssetError> {
        self.assets.get(&id).ok_or(AssetError::NotFound(id))
    }

    /// Get a mesh by ID.
    pub fn get_mesh(&self, id: AssetId) -> Option<&Mesh> {
        match self.assets.get(&id) {
            Some(Asset::Mesh(m)) => Some(m),
            _ => None,
        }
    }

    /// Get a material by ID.
    pub fn get_material(&self, id: AssetId) -> Option<&Material> {
        match self.assets.get(&id) {
            Some(Asset::Material(m)) => Some(m),
            _ => None,
        }
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Save the asset registry to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load an asset registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let store: Self = serde_json::from_reader(file)?;
        Ok(store)
    }
}

fn hash_parts(parts: &[&[u8]]) -> AssetId {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}
