use glam::Vec3;
use harbor_kernel::{Light, Scene};
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(10.0, 20.0, 50.0),
            target: Vec3::new(0.0, 2.0, 0.0),
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads scene state and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Plain-text dump of the scene, one line per node in world space.
///
/// Used by the CLI and in tests where there is no GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let env = scene.environment();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Harbor (frame={}) ===\nNodes: {}",
            scene.frame(),
            scene.node_count()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        if let Some(fog) = env.fog {
            let _ = writeln!(out, "Fog: {:.0}..{:.0}", fog.near, fog.far);
        }
        for light in &env.lights {
            let _ = match light {
                Light::Directional(d) => writeln!(
                    out,
                    "Light: directional x{:.1} from ({:.0}, {:.0}, {:.0})",
                    d.intensity, d.position.x, d.position.y, d.position.z
                ),
                Light::Ambient(a) => writeln!(out, "Light: ambient x{:.1}", a.intensity),
                Light::Spot(s) => writeln!(
                    out,
                    "Light: spot x{:.1} at ({:.0}, {:.0}, {:.0})",
                    s.intensity, s.position.x, s.position.y, s.position.z
                ),
            };
        }

        let mut nodes: Vec<_> = scene.nodes().iter().collect();
        nodes.sort_by(|a, b| a.1.name.cmp(&b.1.name).then(a.0.cmp(b.0)));
        for (id, node) in nodes {
            let p = scene
                .world_matrix(*id)
                .map(|m| m.w_axis.truncate())
                .unwrap_or(node.transform.position);
            let _ = writeln!(
                out,
                "  [{}] {:<18} pos=({:.2}, {:.2}, {:.2})",
                id.short(),
                node.name,
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}
