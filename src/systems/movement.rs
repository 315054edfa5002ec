use crate::components::{Position, Velocity};
use crate::ecs::Entity;

use super::{ComponentSystem, SystemRefs};

/// Integrates velocity into position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl ComponentSystem for MovementSystem {
    type Required = (Position, Velocity);

    const NAME: &'static str = "movement";

    fn update_entity(&self, _entity: Entity, (position, velocity): SystemRefs<'_, Self>, dt: f32) {
        position.x += velocity.x * dt;
        position.y += velocity.y * dt;
    }
}
