//! Systems: per-tick behaviour over entities with a fixed component set

mod bounce;
mod bounding;
mod comflabulation;
mod gravity;
mod movement;

pub use bounce::BounceSystem;
pub use bounding::{BoundingSystem, Bounds};
pub use comflabulation::ComflabulationSystem;
pub use gravity::{GravitySystem, DEFAULT_GRAVITY};
pub use movement::MovementSystem;

use crate::config::SystemConfig;
use crate::ecs::{ComponentSet, ComponentsManager, EcsError, Entity};

/// Capability every scheduled system exposes.
pub trait System {
    fn name(&self) -> &str;
    fn update(&mut self, manager: &mut ComponentsManager, dt: f32) -> Result<(), EcsError>;
}

/// Component references handed to [`ComponentSystem::update_entity`].
pub type SystemRefs<'a, S> = <<S as ComponentSystem>::Required as ComponentSet>::Refs<'a>;

/// Generic base for systems that visit every entity holding `Required`.
///
/// Implementors only write the per-entity hook; the blanket [`System`]
/// implementation resolves qualifying entities each tick, locks the
/// required pools and calls the hook once per entity in slot order.
/// The hook gets no access to the manager, so it cannot add or remove
/// components while the traversal is in progress.
pub trait ComponentSystem {
    type Required: ComponentSet;

    const NAME: &'static str;

    fn update_entity(
        &self,
        entity: Entity,
        components: <Self::Required as ComponentSet>::Refs<'_>,
        dt: f32,
    );
}

impl<S: ComponentSystem> System for S {
    fn name(&self) -> &str {
        S::NAME
    }

    fn update(&mut self, manager: &mut ComponentsManager, dt: f32) -> Result<(), EcsError> {
        let visited = run_component_system(self, manager, dt)?;
        log::trace!("{} visited {visited} entities", S::NAME);
        Ok(())
    }
}

/// Runs one pass of `system` and returns the number of entities visited.
pub fn run_component_system<S: ComponentSystem>(
    system: &S,
    manager: &ComponentsManager,
    dt: f32,
) -> Result<usize, EcsError> {
    let entities: Vec<Entity> = manager.entities_with::<S::Required>().collect();
    let mut guards = <S::Required as ComponentSet>::lock(manager)?;

    for &entity in &entities {
        let components =
            <S::Required as ComponentSet>::fetch(&mut guards, entity).map_err(|err| {
                log::error!("{}: {entity} qualified but could not be fetched: {err}", S::NAME);
                err
            })?;
        system.update_entity(entity, components, dt);
    }

    Ok(entities.len())
}

/// The built-in systems, selectable from configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinSystem {
    Movement(MovementSystem),
    Gravity(GravitySystem),
    Bounding(BoundingSystem),
    Bounce(BounceSystem),
    Comflabulation(ComflabulationSystem),
}

impl BuiltinSystem {
    pub fn from_config(config: &SystemConfig) -> Result<Self, EcsError> {
        let system = match config {
            SystemConfig::Movement => Self::Movement(MovementSystem::new()),
            SystemConfig::Gravity { gravity } => Self::Gravity(GravitySystem::new(*gravity)),
            SystemConfig::Bounding(bounds) => Self::Bounding(BoundingSystem::new(*bounds)?),
            SystemConfig::Bounce { floor, restitution } => {
                Self::Bounce(BounceSystem::new(*floor, *restitution))
            }
            SystemConfig::Comflabulation => Self::Comflabulation(ComflabulationSystem::new()),
        };
        Ok(system)
    }
}

impl System for BuiltinSystem {
    fn name(&self) -> &str {
        match self {
            Self::Movement(system) => system.name(),
            Self::Gravity(system) => system.name(),
            Self::Bounding(system) => system.name(),
            Self::Bounce(system) => system.name(),
            Self::Comflabulation(system) => system.name(),
        }
    }

    fn update(&mut self, manager: &mut ComponentsManager, dt: f32) -> Result<(), EcsError> {
        match self {
            Self::Movement(system) => system.update(manager, dt),
            Self::Gravity(system) => system.update(manager, dt),
            Self::Bounding(system) => system.update(manager, dt),
            Self::Bounce(system) => system.update(manager, dt),
            Self::Comflabulation(system) => system.update(manager, dt),
        }
    }
}
