use glam::{Mat4, Vec3};
use harbor_common::EntityId;
use harbor_kernel::{Material, Scene};

/// One node, ready to be drawn as a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub id: EntityId,
    /// Maps the unit cube (±0.5) onto the node's bounds in world space.
    pub model: Mat4,
    pub color: [f32; 4],
    pub render_order: i32,
}

impl DrawItem {
    pub fn is_transparent(&self) -> bool {
        self.color[3] < 1.0
    }

    pub fn world_center(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }
}

/// Flatten the scene into draw order.
///
/// Opaque items come first, ordered by render order. Transparent items
/// follow, by render order and then back to front from `eye`. Groups and
/// shadow-only surfaces produce nothing.
pub fn draw_list(scene: &Scene, eye: Vec3) -> Vec<DrawItem> {
    let mut items: Vec<DrawItem> = scene
        .nodes()
        .iter()
        .filter(|(_, node)| node.shape.is_drawable())
        .filter(|(_, node)| !matches!(node.material, Material::Shadow { .. }))
        .filter_map(|(id, node)| {
            let world = scene.world_matrix(*id)?;
            let size = Vec3::from(node.shape.local_extents()) * 2.0;
            Some(DrawItem {
                id: *id,
                model: world * Mat4::from_scale(size),
                color: node.material.preview_color(),
                render_order: node.render_order,
            })
        })
        .collect();

    items.sort_by(|a, b| {
        a.is_transparent()
            .cmp(&b.is_transparent())
            .then(a.render_order.cmp(&b.render_order))
            .then_with(|| {
                if a.is_transparent() {
                    let da = a.world_center().distance_squared(eye);
                    let db = b.world_center().distance_squared(eye);
                    db.total_cmp(&da)
                } else {
                    std::cmp::Ordering::Equal
                }
            })
    });
    tracing::trace!(items = items.len(), "draw list built");
    items
}
