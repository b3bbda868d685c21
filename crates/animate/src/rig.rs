use harbor_common::{EntityId, Slot};

use crate::kinematics::Direction;

/// A drifting cloud and the direction it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudSprite {
    pub id: EntityId,
    pub direction: Direction,
}

/// The orbiting body: the group that travels the ellipse and the model
/// inside it that turns to face along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrbitRig {
    pub group: EntityId,
    pub body: EntityId,
}

/// Handles to every animated node.
///
/// Loaded models arrive asynchronously and fill their slot once; clouds are
/// created with the scene and are always present.
#[derive(Debug, Clone, Default)]
pub struct SceneRig {
    pub boat: Slot<EntityId>,
    pub second_boat: Slot<EntityId>,
    pub yacht: Slot<OrbitRig>,
    pub mountain: Slot<EntityId>,
    pub clouds: Vec<CloudSprite>,
}

impl SceneRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of model slots filled so far.
    pub fn loaded_count(&self) -> usize {
        [
            self.boat.is_filled(),
            self.second_boat.is_filled(),
            self.yacht.is_filled(),
            self.mountain.is_filled(),
        ]
        .into_iter()
        .filter(|f| *f)
        .count()
    }
}
