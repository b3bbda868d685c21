use harbor_common::Transform;
use serde::{Deserialize, Serialize};

/// Linear-ish RGB colour, each channel in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::rgb(self.r * k, self.g * k, self.b * k)
    }
}

/// A texture reference with its sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    pub path: String,
    pub repeat: [f32; 2],
    pub anisotropy: u8,
    pub srgb: bool,
}

impl TextureRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            repeat: [1.0, 1.0],
            anisotropy: 1,
            srgb: true,
        }
    }

    pub fn repeat(mut self, u: f32, v: f32) -> Self {
        self.repeat = [u, v];
        self
    }

    pub fn anisotropy(mut self, level: u8) -> Self {
        self.anisotropy = level;
        self
    }

    /// Data textures (bump maps) are not colour-managed.
    pub fn linear(mut self) -> Self {
        self.srgb = false;
        self
    }
}

/// Geometry attached to a node. Dimensions are in world units before scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Transform-only node used to pivot or lift children.
    Group,
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Flat rectangle in the node's local XY plane.
    Plane { width: f32, height: f32 },
    /// Cylinder sector around the local Y axis.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        theta_length: f32,
    },
    /// Camera-facing quad, sized by the node's scale.
    Sprite,
    /// Animated water surface (flat rectangle in local XY).
    Water { width: f32, height: f32 },
    /// A loaded model, drawn as a placeholder volume.
    Model {
        source: String,
        mesh_count: usize,
        node_count: usize,
    },
}

impl Shape {
    /// Half extents of an axis-aligned box that encloses the shape in local space.
    pub fn local_extents(&self) -> [f32; 3] {
        match self {
            Shape::Group => [0.0, 0.0, 0.0],
            Shape::Box {
                width,
                height,
                depth,
            } => [width * 0.5, height * 0.5, depth * 0.5],
            Shape::Plane { width, height } | Shape::Water { width, height } => {
                [width * 0.5, height * 0.5, 0.01]
            }
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(*radius_bottom);
                [r, height * 0.5, r]
            }
            Shape::Sprite => [0.5, 0.5, 0.01],
            Shape::Model { .. } => [0.5, 0.5, 0.5],
        }
    }

    pub fn is_drawable(&self) -> bool {
        !matches!(self, Shape::Group)
    }
}

/// Surface description for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// No surface of its own (groups, loaded models before material import).
    None,
    Standard {
        color: Color,
        map: Option<TextureRef>,
        bump_map: Option<TextureRef>,
        bump_scale: f32,
        roughness: f32,
        metalness: f32,
        double_sided: bool,
    },
    /// Invisible except for received shadows.
    Shadow { opacity: f32 },
    Sprite { color: Color, map: Option<TextureRef> },
    Water {
        color: Color,
        scale: f32,
        flow_direction: [f32; 2],
        texture_size: u32,
    },
}

impl Material {
    /// A plain standard material with the given colour.
    pub fn standard(color: Color) -> Self {
        Material::Standard {
            color,
            map: None,
            bump_map: None,
            bump_scale: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            double_sided: false,
        }
    }

    /// Colour and opacity a flat-shaded preview would use.
    pub fn preview_color(&self) -> [f32; 4] {
        match self {
            Material::None => [0.7, 0.7, 0.7, 1.0],
            Material::Standard { color, .. } => color.to_array(1.0),
            Material::Shadow { opacity } => [0.0, 0.0, 0.0, *opacity],
            Material::Sprite { color, .. } => color.to_array(0.85),
            Material::Water { color, .. } => color.to_array(0.6),
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.preview_color()[3] < 1.0
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub parent: Option<harbor_common::EntityId>,
    pub shape: Shape,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub render_order: i32,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, shape: Shape, material: Material) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            parent: None,
            shape,
            material,
            cast_shadow: false,
            receive_shadow: false,
            render_order: 0,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Group, Material::None)
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colour_channels() {
        let c = Color::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn group_is_not_drawable() {
        assert!(!Shape::Group.is_drawable());
        assert!(Shape::Sprite.is_drawable());
    }

    #[test]
    fn box_extents_are_halved() {
        let shape = Shape::Box {
            width: 10.0,
            height: 0.75,
            depth: 75.0,
        };
        assert_eq!(shape.local_extents(), [5.0, 0.375, 37.5]);
    }

    #[test]
    fn shadow_and_water_are_transparent() {
        assert!(Material::Shadow { opacity: 0.3 }.is_transparent());
        assert!(!Material::standard(Color::WHITE).is_transparent());
        let water = Material::Water {
            color: Color::from_hex(0xafdce0),
            scale: 4.0,
            flow_direction: [0.6, 0.6],
            texture_size: 1024,
        };
        assert!(water.is_transparent());
    }

    #[test]
    fn texture_builder() {
        let t = TextureRef::new("textures/sand_bump.jpg")
            .repeat(1.0, 4.0)
            .linear();
        assert_eq!(t.repeat, [1.0, 4.0]);
        assert!(!t.srgb);
    }
}
