use serde::{Deserialize, Serialize};

use crate::components::Position;
use crate::ecs::{EcsError, Entity};

use super::{ComponentSystem, SystemRefs};

/// Axis-aligned rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    pub const fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn contains(&self, position: &Position) -> bool {
        (self.min_x..=self.max_x).contains(&position.x) && (self.min_y..=self.max_y).contains(&position.y)
    }

    pub fn clamp(&self, position: &mut Position) {
        position.x = position.x.clamp(self.min_x, self.max_x);
        position.y = position.y.clamp(self.min_y, self.max_y);
    }
}

/// Keeps every position inside a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSystem {
    bounds: Bounds,
}

impl BoundingSystem {
    /// Fails for an inverted or NaN rectangle, which `clamp` cannot handle.
    pub fn new(bounds: Bounds) -> Result<Self, EcsError> {
        if !bounds.is_valid() {
            return Err(EcsError::InvalidSystem {
                system: <Self as ComponentSystem>::NAME,
                reason: format!("bounding rectangle is inverted: {bounds:?}"),
            });
        }
        Ok(Self { bounds })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl ComponentSystem for BoundingSystem {
    type Required = (Position,);

    const NAME: &'static str = "bounding";

    fn update_entity(&self, _entity: Entity, (position,): SystemRefs<'_, Self>, _dt: f32) {
        self.bounds.clamp(position);
    }
}
