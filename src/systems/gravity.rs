use crate::components::Velocity;
use crate::ecs::Entity;

use super::{ComponentSystem, SystemRefs};

/// Standard gravity along +y, in units per second squared.
pub const DEFAULT_GRAVITY: f32 = -9.8;

/// Accelerates every velocity along the y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySystem {
    gravity: f32,
}

impl GravitySystem {
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }
}

impl Default for GravitySystem {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl ComponentSystem for GravitySystem {
    type Required = (Velocity,);

    const NAME: &'static str = "gravity";

    fn update_entity(&self, _entity: Entity, (velocity,): SystemRefs<'_, Self>, dt: f32) {
        velocity.y += self.gravity * dt;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::ecs::ComponentsManager;
    use crate::systems::System;

    #[test]
    fn test_gravity_accelerates_downwards() {
        let mut manager = ComponentsManager::new();
        manager.register::<Velocity>(2).unwrap();

        let entity = Entity::from_raw(3);
        manager.add(entity, Velocity::new(1.0, 0.0)).unwrap();

        GravitySystem::default().update(&mut manager, 1.0).unwrap();
        let velocity = *manager.get::<Velocity>(entity).unwrap();
        assert_relative_eq!(velocity.y, -9.8);
        assert_relative_eq!(velocity.x, 1.0);

        GravitySystem::new(-2.0).update(&mut manager, 0.25).unwrap();
        assert_relative_eq!(manager.get::<Velocity>(entity).unwrap().y, -10.3);
    }
}
