use harbor_animate::{AnimationParams, FrameClock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::ModelKind;

/// Errors from loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Harbor".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Orbit camera setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest angle from straight down onto the target; 90 keeps the eye above the horizon.
    pub max_polar_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 500.0,
            eye: [10.0, 20.0, 50.0],
            target: [0.0, 2.0, 0.0],
            min_distance: 20.0,
            max_distance: 80.0,
            max_polar_degrees: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub count: usize,
    /// Seed for cloud sizes and starting positions.
    pub seed: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self { count: 6, seed: 42 }
    }
}

/// Where model and texture files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub root: PathBuf,
    /// Per-model overrides of the path relative to `root`.
    pub models: BTreeMap<ModelKind, PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            models: BTreeMap::new(),
        }
    }
}

impl AssetsConfig {
    pub fn model_path(&self, kind: ModelKind) -> PathBuf {
        let relative = self
            .models
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(kind.placement().path));
        self.root.join(relative)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Longest step the frame clock will report, in seconds. Uncapped when unset.
    pub max_delta: Option<f32>,
}

impl FrameConfig {
    /// A frame clock honouring `max_delta`.
    pub fn clock(&self) -> FrameClock {
        match self.max_delta {
            Some(cap) => FrameClock::with_max_delta(cap),
            None => FrameClock::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Add the spot lamp over the pier. Off in the shipped scene.
    pub spot_light: bool,
}

/// Top-level configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarborConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub animation: AnimationParams,
    pub clouds: CloudConfig,
    pub assets: AssetsConfig,
    pub frame: FrameConfig,
    pub lighting: LightingConfig,
}

impl HarborConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.animation = config.animation.sanitized();
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Load `path` when given, else use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
