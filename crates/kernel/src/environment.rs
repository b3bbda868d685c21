use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::node::Color;

/// Cube map faces in +X, -X, +Y, -Y, +Z, -Z order.
pub const SKYBOX_FACES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog blend factor at `distance`: 0 before `near`, 1 past `far`.
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Shadow-map parameters for a shadow-casting light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// Half width/height of the orthographic shadow camera. Zero for perspective lights.
    pub extent: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub shadow: Option<ShadowSettings>,
}

impl DirectionalLight {
    /// Unit vector pointing from the target toward the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub distance: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub shadow: Option<ShadowSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Directional(DirectionalLight),
    Ambient(AmbientLight),
    Spot(SpotLight),
}

/// Everything about the scene that is not a node: background, fog, lights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Skybox face image paths, [`SKYBOX_FACES`] order.
    pub skybox: Vec<String>,
    pub fog: Option<Fog>,
    pub lights: Vec<Light>,
}

impl Environment {
    /// The first directional light, which drives the main shading direction.
    pub fn key_light(&self) -> Option<&DirectionalLight> {
        self.lights.iter().find_map(|l| match l {
            Light::Directional(d) => Some(d),
            _ => None,
        })
    }

    /// Summed ambient contribution.
    pub fn ambient(&self) -> Color {
        self.lights.iter().fold(Color::rgb(0.0, 0.0, 0.0), |acc, l| match l {
            Light::Ambient(a) => {
                let c = a.color.scaled(a.intensity);
                Color::rgb(acc.r + c.r, acc.g + c.g, acc.b + c.b)
            }
            _ => acc,
        })
    }

    /// Colour shown where nothing is drawn: the fog colour, else a pale sky.
    pub fn clear_color(&self) -> Color {
        self.fog
            .map(|f| f.color)
            .unwrap_or(Color::from_hex(0xcce0ff))
    }
}
