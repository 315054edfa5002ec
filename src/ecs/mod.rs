//! Entity Component System (ECS) core
//!
//! Fixed-capacity ring pools, one per component type, owned by a
//! [`ComponentsManager`] and joined by [`Entity`] identity.

pub mod component;
pub mod entity;
pub mod error;
pub mod manager;
pub mod query;
pub mod ring;

pub use component::{Component, ComponentPool};
pub use entity::{Entity, EntityAllocator, EntityId};
pub use error::{EcsError, RingError};
pub use manager::{ComponentsManager, EntitiesWith, PoolStats};
pub use query::ComponentSet;
pub use ring::{FixedRing, Inserted, SlotId};
