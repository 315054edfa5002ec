//! ComponentsManager - owner of every component pool

use std::any::TypeId;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::marker::PhantomData;

use super::component::{short_type_name, ComponentStorage};
use super::{Component, ComponentPool, ComponentSet, EcsError, Entity};

/// Occupancy of one registered pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub component: &'static str,
    pub len: usize,
    pub capacity: usize,
}

/// Holds one fixed-capacity pool per registered component type and maps
/// entities to their components.
///
/// Pools sit behind `RefCell`s so a system can hold exclusive access to
/// several pools at once. Structural changes (`add`, `remove`, ...) take
/// `&mut self` and can therefore never overlap a running traversal.
pub struct ComponentsManager {
    pools: HashMap<TypeId, RefCell<Box<dyn ComponentStorage>>>,
    pending_removals: Vec<Entity>,
}

impl ComponentsManager {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            pending_removals: Vec::new(),
        }
    }

    /// Creates the pool for `T`. Must be called once per type before use.
    pub fn register<T: Component>(&mut self, capacity: usize) -> Result<(), EcsError> {
        let component = short_type_name::<T>();
        if capacity == 0 {
            return Err(EcsError::InvalidCapacity { component });
        }
        let type_id = TypeId::of::<T>();
        if self.pools.contains_key(&type_id) {
            return Err(EcsError::AlreadyRegistered { component });
        }

        let pool = ComponentPool::<T>::with_capacity(capacity)?;
        self.pools.insert(type_id, RefCell::new(Box::new(pool)));
        log::debug!("registered pool for {component} with capacity {capacity}");
        Ok(())
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.pools.contains_key(&TypeId::of::<T>())
    }

    /// Attaches a component to an entity.
    ///
    /// When the pool is full the oldest component of this type is evicted
    /// and the entity that owned it is returned. That entity silently loses
    /// its `T`; size pools above the live entity count to avoid this.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<Option<Entity>, EcsError> {
        let evicted = self.typed_mut::<T>()?.insert(entity, value)?;
        if let Some(previous) = evicted {
            log::warn!(
                "{} pool full: evicted component of {previous} to make room for {entity}",
                short_type_name::<T>()
            );
        }
        Ok(evicted)
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<T, EcsError> {
        self.typed_mut::<T>()?.remove(entity)
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Result<Ref<'_, T>, EcsError> {
        let pool = self.pool::<T>()?;
        pool.get(entity)?;
        Ref::filter_map(pool, |pool| pool.get(entity).ok()).map_err(|_| EcsError::MissingComponent {
            entity,
            component: short_type_name::<T>(),
        })
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.typed_mut::<T>()?.get_mut(entity)
    }

    /// False for unregistered types, and while the pool is exclusively
    /// held by a running system.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.pool::<T>().is_ok_and(|pool| pool.has(entity))
    }

    /// Entities holding every component in `S`, produced lazily.
    ///
    /// The first type of `S` drives the traversal: its ring is walked in
    /// slot order and each occupant is checked against the remaining types.
    /// Order is therefore stable for a fixed manager state. Nothing is
    /// cached between calls.
    pub fn entities_with<S: ComponentSet>(&self) -> EntitiesWith<'_, S> {
        let driver: Option<Ref<'_, dyn ComponentStorage>> = self
            .pools
            .get(&S::driver())
            .and_then(|cell| cell.try_borrow().ok())
            .map(|storage| Ref::map(storage, |boxed| &**boxed));

        EntitiesWith {
            manager: self,
            driver,
            cursor: 0,
            _set: PhantomData,
        }
    }

    /// Strips every component from `entity`. Returns how many were removed.
    pub fn remove_entity(&mut self, entity: Entity) -> usize {
        self.pools
            .values_mut()
            .map(|cell| cell.get_mut().remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Defers [`remove_entity`](Self::remove_entity) until the next
    /// [`flush_removals`](Self::flush_removals).
    pub fn queue_removal(&mut self, entity: Entity) {
        self.pending_removals.push(entity);
    }

    pub fn pending_removals(&self) -> &[Entity] {
        &self.pending_removals
    }

    /// Applies queued removals. Returns the number of distinct entities flushed.
    pub fn flush_removals(&mut self) -> usize {
        if self.pending_removals.is_empty() {
            return 0;
        }

        let mut pending = std::mem::take(&mut self.pending_removals);
        pending.sort_unstable();
        pending.dedup();
        for &entity in &pending {
            self.remove_entity(entity);
        }
        pending.len()
    }

    pub fn len<T: Component>(&self) -> Result<usize, EcsError> {
        Ok(self.pool::<T>()?.len())
    }

    pub fn capacity<T: Component>(&self) -> Result<usize, EcsError> {
        Ok(self.pool::<T>()?.capacity())
    }

    /// Occupancy of every pool, sorted by component name.
    pub fn pool_stats(&self) -> Vec<PoolStats> {
        let mut stats: Vec<PoolStats> = self
            .pools
            .values()
            .filter_map(|cell| cell.try_borrow().ok())
            .map(|storage| PoolStats {
                component: storage.type_name(),
                len: storage.len(),
                capacity: storage.capacity(),
            })
            .collect();
        stats.sort_by(|a, b| a.component.cmp(b.component));
        stats
    }

    /// Empties every pool. Registrations are kept.
    pub fn clear(&mut self) {
        for cell in self.pools.values_mut() {
            cell.get_mut().clear();
        }
        self.pending_removals.clear();
    }

    /// Shared access to a typed pool.
    pub(crate) fn pool<T: Component>(&self) -> Result<Ref<'_, ComponentPool<T>>, EcsError> {
        let component = short_type_name::<T>();
        let cell = self
            .pools
            .get(&TypeId::of::<T>())
            .ok_or(EcsError::Unregistered { component })?;
        let storage = cell
            .try_borrow()
            .map_err(|_| EcsError::BorrowConflict { component })?;
        Ref::filter_map(storage, |storage| storage.as_any().downcast_ref::<ComponentPool<T>>())
            .map_err(|_| EcsError::Unregistered { component })
    }

    /// Exclusive access to a typed pool through a shared manager reference.
    /// Holding two of these for the same `T` is reported as a borrow conflict.
    /// Only system passes take these, after resolving their entities, so
    /// `has` and `entities_with` never observe a held pool.
    pub(crate) fn pool_mut<T: Component>(&self) -> Result<RefMut<'_, ComponentPool<T>>, EcsError> {
        let component = short_type_name::<T>();
        let cell = self
            .pools
            .get(&TypeId::of::<T>())
            .ok_or(EcsError::Unregistered { component })?;
        let storage = cell
            .try_borrow_mut()
            .map_err(|_| EcsError::BorrowConflict { component })?;
        RefMut::filter_map(storage, |storage| {
            storage.as_any_mut().downcast_mut::<ComponentPool<T>>()
        })
        .map_err(|_| EcsError::Unregistered { component })
    }

    fn typed_mut<T: Component>(&mut self) -> Result<&mut ComponentPool<T>, EcsError> {
        let component = short_type_name::<T>();
        self.pools
            .get_mut(&TypeId::of::<T>())
            .and_then(|cell| cell.get_mut().as_any_mut().downcast_mut::<ComponentPool<T>>())
            .ok_or(EcsError::Unregistered { component })
    }
}

impl Default for ComponentsManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy traversal returned by [`ComponentsManager::entities_with`].
///
/// Holds a shared borrow of the driving pool until dropped.
pub struct EntitiesWith<'a, S> {
    manager: &'a ComponentsManager,
    driver: Option<Ref<'a, dyn ComponentStorage>>,
    cursor: usize,
    _set: PhantomData<fn() -> S>,
}

impl<'a, S: ComponentSet> Iterator for EntitiesWith<'a, S> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let driver = self.driver.as_ref()?;
        while self.cursor < driver.capacity() {
            let index = self.cursor;
            self.cursor += 1;
            if let Some(entity) = driver.owner_at(index) {
                if S::contains_all(self.manager, entity) {
                    return Some(entity);
                }
            }
        }
        None
    }
}
