//! Error types for ring pools and the components manager

use thiserror::Error;

use super::Entity;

/// Failures raised by direct slot access on a [`FixedRing`](super::FixedRing).
///
/// Apart from `ZeroCapacity`, these all mean a caller held on to a slot
/// handle across a structural change of the ring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("ring capacity must be greater than zero")]
    ZeroCapacity,
    #[error("slot {index} is out of range for capacity {capacity}")]
    OutOfRange { index: usize, capacity: usize },
    #[error("slot {index} is not occupied")]
    Vacant { index: usize },
    #[error("slot {index} was reused (handle generation {held}, slot generation {current})")]
    Stale { index: usize, held: u32, current: u32 },
}

/// Errors surfaced by [`ComponentsManager`](super::ComponentsManager) and by systems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("component type {component} is already registered")]
    AlreadyRegistered { component: &'static str },
    #[error("pool for {component} needs a capacity greater than zero")]
    InvalidCapacity { component: &'static str },
    #[error("component type {component} has not been registered")]
    Unregistered { component: &'static str },
    #[error("{entity} already has a {component}")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },
    #[error("{entity} has no {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
    #[error("system {system} rejected its parameters: {reason}")]
    InvalidSystem {
        system: &'static str,
        reason: String,
    },
    #[error("pool for {component} is already borrowed")]
    BorrowConflict { component: &'static str },
    #[error(transparent)]
    Ring(#[from] RingError),
}

impl EcsError {
    /// True for errors that only happen during setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EcsError::AlreadyRegistered { .. }
                | EcsError::InvalidCapacity { .. }
                | EcsError::Unregistered { .. }
                | EcsError::InvalidSystem { .. }
        )
    }
}
