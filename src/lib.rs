//! A small entity-component-system built on fixed-capacity ring pools.

pub mod components;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod logging;
pub mod scenario;
pub mod scheduler;
pub mod systems;

pub use components::{Comflabulation, Position, Velocity};
pub use config::{ConfigError, SimulationConfig};
pub use ecs::{ComponentsManager, EcsError, Entity, EntityAllocator, FixedRing, RingError};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use scenario::{ScenarioLoader, Simulation};
pub use scheduler::{Scheduler, TickStats};
pub use systems::{ComponentSystem, System};
