//! Component pools: one fixed ring per component type

use std::any::Any;
use std::collections::HashMap;

use super::{EcsError, Entity, FixedRing, RingError, SlotId};

/// Trait for components
pub trait Component: 'static {}

/// Type name without its module path, for errors and logs.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Type-erased view of a pool, used for whole-entity operations and
/// for walking a pool's slots without knowing its component type.
pub(crate) trait ComponentStorage {
    fn type_name(&self) -> &'static str;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn has(&self, entity: Entity) -> bool;
    /// Owner of the component stored at a raw slot index, if occupied.
    fn owner_at(&self, index: usize) -> Option<Entity>;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn capacity(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Owned<T> {
    owner: Entity,
    value: T,
}

/// Storage for a single component type.
///
/// Values live in a [`FixedRing`]; `slots` maps each owning entity to the
/// slot its value occupies. Overflowing the ring evicts the oldest value
/// and unmaps its owner.
pub struct ComponentPool<T: Component> {
    ring: FixedRing<Owned<T>>,
    slots: HashMap<Entity, SlotId>,
}

impl<T: Component> ComponentPool<T> {
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        Ok(Self {
            ring: FixedRing::new(capacity)?,
            slots: HashMap::with_capacity(capacity),
        })
    }

    /// Attaches `value` to `entity`. Returns the entity that lost its
    /// component to make room, if the ring was full.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<Option<Entity>, EcsError> {
        if self.slots.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: short_type_name::<T>(),
            });
        }

        let inserted = self.ring.insert(Owned {
            owner: entity,
            value,
        });
        let evicted = inserted.evicted.map(|previous| previous.owner);
        if let Some(previous) = evicted {
            self.slots.remove(&previous);
        }
        self.slots.insert(entity, inserted.slot);
        Ok(evicted)
    }

    pub fn remove(&mut self, entity: Entity) -> Result<T, EcsError> {
        let slot = self
            .slots
            .remove(&entity)
            .ok_or_else(|| Self::missing(entity))?;
        let owned = self.ring.remove(slot)?;
        Ok(owned.value)
    }

    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        let slot = self.slots.get(&entity).ok_or_else(|| Self::missing(entity))?;
        Ok(&self.ring.at(*slot)?.value)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        let slot = self.slots.get(&entity).ok_or_else(|| Self::missing(entity))?;
        Ok(&mut self.ring.at_mut(*slot)?.value)
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.slots
            .get(&entity)
            .is_some_and(|slot| self.ring.at(*slot).is_ok_and(|owned| owned.owner == entity))
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Entity whose component the next overflowing insert would evict.
    pub fn next_eviction(&self) -> Option<Entity> {
        let slot = self.ring.oldest()?;
        self.ring.at(slot).ok().map(|owned| owned.owner)
    }

    /// Components in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.ring.iter().map(|(_, owned)| (owned.owner, &owned.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.ring
            .iter_mut()
            .map(|(_, owned)| (owned.owner, &mut owned.value))
    }

    fn missing(entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: short_type_name::<T>(),
        }
    }
}

impl<T: Component> ComponentStorage for ComponentPool<T> {
    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_ok()
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentPool::has(self, entity)
    }

    fn owner_at(&self, index: usize) -> Option<Entity> {
        let slot = self.ring.slot(index).ok()?;
        self.ring.at(slot).ok().map(|owned| owned.owner)
    }

    fn clear(&mut self) {
        self.ring.clear();
        self.slots.clear();
    }

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
