use crate::components::{Position, Velocity};
use crate::ecs::Entity;

use super::{ComponentSystem, SystemRefs};

/// Reflects entities that fall through a horizontal floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceSystem {
    floor: f32,
    restitution: f32,
}

impl BounceSystem {
    /// `restitution` scales the reflected speed: 1.0 is a perfect bounce, 0.0 sticks.
    pub fn new(floor: f32, restitution: f32) -> Self {
        Self { floor, restitution }
    }
}

impl ComponentSystem for BounceSystem {
    type Required = (Position, Velocity);

    const NAME: &'static str = "bounce";

    fn update_entity(&self, _entity: Entity, (position, velocity): SystemRefs<'_, Self>, _dt: f32) {
        if position.y >= self.floor {
            return;
        }
        position.y = self.floor;
        if velocity.y < 0.0 {
            velocity.y = -velocity.y * self.restitution;
        }
    }
}
