use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from the tunable-parameter surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown parameter `{0}`")]
    Unknown(String),
    #[error("parameter `{key}` must be finite, got {value}")]
    NotFinite { key: ParamKey, value: f32 },
}

/// Names of the live-editable tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    BoatBounceSpeed,
    CloudSpeed,
    YachtOrbitSpeed,
    YachtOrbitRadiusX,
    YachtOrbitRadiusZ,
    MountainScale,
    YachtOrbitCenterX,
    YachtOrbitCenterZ,
}

impl ParamKey {
    /// Panel order.
    pub const ALL: [ParamKey; 8] = [
        ParamKey::BoatBounceSpeed,
        ParamKey::CloudSpeed,
        ParamKey::YachtOrbitSpeed,
        ParamKey::YachtOrbitRadiusX,
        ParamKey::YachtOrbitRadiusZ,
        ParamKey::MountainScale,
        ParamKey::YachtOrbitCenterX,
        ParamKey::YachtOrbitCenterZ,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamKey::BoatBounceSpeed => "boatBounceSpeed",
            ParamKey::CloudSpeed => "cloudSpeed",
            ParamKey::YachtOrbitSpeed => "yachtOrbitSpeed",
            ParamKey::YachtOrbitRadiusX => "yachtOrbitRadiusX",
            ParamKey::YachtOrbitRadiusZ => "yachtOrbitRadiusZ",
            ParamKey::MountainScale => "mountainScale",
            ParamKey::YachtOrbitCenterX => "yachtOrbitCenterX",
            ParamKey::YachtOrbitCenterZ => "yachtOrbitCenterZ",
        }
    }

    /// Keys whose change must move the orbiting body right away, not on the next tick.
    pub fn needs_notification(self) -> bool {
        matches!(
            self,
            ParamKey::YachtOrbitCenterX | ParamKey::YachtOrbitCenterZ
        )
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ParamError::Unknown(s.to_string()))
    }
}

/// Slider range and label for one tunable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub key: ParamKey,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamSpec {
    pub fn of(key: ParamKey) -> Self {
        let (label, min, max, step) = match key {
            ParamKey::BoatBounceSpeed => ("Boat bounce speed", 0.0, 5.0, 0.5),
            ParamKey::CloudSpeed => ("Cloud speed", 0.0, 10.0, 1.0),
            ParamKey::YachtOrbitSpeed => ("Yacht speed", 0.0, 5.0, 0.2),
            ParamKey::YachtOrbitRadiusX => ("Yacht orbit X", 5.0, 50.0, 1.0),
            ParamKey::YachtOrbitRadiusZ => ("Yacht orbit Z", 5.0, 50.0, 1.0),
            ParamKey::MountainScale => ("Mountain scale", 0.5, 10.0, 1.0),
            ParamKey::YachtOrbitCenterX => ("Yacht center X", -50.0, 50.0, 1.0),
            ParamKey::YachtOrbitCenterZ => ("Yacht center Z", -50.0, 50.0, 1.0),
        };
        Self {
            key,
            label,
            min,
            max,
            step,
        }
    }

    pub fn all() -> [ParamSpec; 8] {
        ParamKey::ALL.map(ParamSpec::of)
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// A tunable edit, as reported back to the caller of [`AnimationParams::set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    pub key: ParamKey,
    pub old: f32,
    pub new: f32,
}

impl ParamChange {
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}

/// Live-editable animation tunables.
///
/// Written by the control panel between frames, read by the animator as a
/// snapshot at the start of each frame. The struct is `Copy`, so a panel on
/// another thread can hand over a whole snapshot instead of sharing fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationParams {
    pub boat_bounce_speed: f32,
    pub cloud_speed: f32,
    pub yacht_orbit_speed: f32,
    pub mountain_scale: f32,
    pub yacht_orbit_radius_x: f32,
    pub yacht_orbit_radius_z: f32,
    pub yacht_orbit_center_x: f32,
    pub yacht_orbit_center_z: f32,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            boat_bounce_speed: 1.0,
            cloud_speed: 0.5,
            yacht_orbit_speed: 0.2,
            mountain_scale: 5.0,
            yacht_orbit_radius_x: 16.0,
            yacht_orbit_radius_z: 30.0,
            yacht_orbit_center_x: -9.0,
            yacht_orbit_center_z: 0.0,
        }
    }
}

impl AnimationParams {
    pub fn get(&self, key: ParamKey) -> f32 {
        match key {
            ParamKey::BoatBounceSpeed => self.boat_bounce_speed,
            ParamKey::CloudSpeed => self.cloud_speed,
            ParamKey::YachtOrbitSpeed => self.yacht_orbit_speed,
            ParamKey::YachtOrbitRadiusX => self.yacht_orbit_radius_x,
            ParamKey::YachtOrbitRadiusZ => self.yacht_orbit_radius_z,
            ParamKey::MountainScale => self.mountain_scale,
            ParamKey::YachtOrbitCenterX => self.yacht_orbit_center_x,
            ParamKey::YachtOrbitCenterZ => self.yacht_orbit_center_z,
        }
    }

    fn field_mut(&mut self, key: ParamKey) -> &mut f32 {
        match key {
            ParamKey::BoatBounceSpeed => &mut self.boat_bounce_speed,
            ParamKey::CloudSpeed => &mut self.cloud_speed,
            ParamKey::YachtOrbitSpeed => &mut self.yacht_orbit_speed,
            ParamKey::YachtOrbitRadiusX => &mut self.yacht_orbit_radius_x,
            ParamKey::YachtOrbitRadiusZ => &mut self.yacht_orbit_radius_z,
            ParamKey::MountainScale => &mut self.mountain_scale,
            ParamKey::YachtOrbitCenterX => &mut self.yacht_orbit_center_x,
            ParamKey::YachtOrbitCenterZ => &mut self.yacht_orbit_center_z,
        }
    }

    /// Set a tunable, clamped into its slider range.
    pub fn set(&mut self, key: ParamKey, value: f32) -> Result<ParamChange, ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite { key, value });
        }
        let new = ParamSpec::of(key).clamp(value);
        let slot = self.field_mut(key);
        let old = *slot;
        *slot = new;
        tracing::debug!(%key, old, new, "parameter changed");
        Ok(ParamChange { key, old, new })
    }

    /// Set a tunable by its panel name.
    pub fn set_by_name(&mut self, name: &str, value: f32) -> Result<ParamChange, ParamError> {
        self.set(name.parse()?, value)
    }

    /// Copy with every field clamped into range; non-finite fields fall back to defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = *self;
        for key in ParamKey::ALL {
            let v = self.get(key);
            let v = if v.is_finite() { v } else { defaults.get(key) };
            *out.field_mut(key) = ParamSpec::of(key).clamp(v);
        }
        out
    }
}
