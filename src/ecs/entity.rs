//! Entity identities and a reference allocator
//!
//! The components manager only uses [`Entity`] as a join key. Handing out
//! and recycling identities is the job of an allocator owned by the driver;
//! [`EntityAllocator`] is the one the scenario builder uses.

use std::collections::HashSet;
use std::fmt;

/// Entity ID type - simple numeric ID
pub type EntityId = u64;

/// Opaque entity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(EntityId);

impl Entity {
    pub const fn from_raw(id: EntityId) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> EntityId {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Entity allocator
pub struct EntityAllocator {
    next_id: EntityId,
    free_list: Vec<EntityId>,
    alive: HashSet<EntityId>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            free_list: Vec::new(),
            alive: HashSet::new(),
        }
    }

    pub fn allocate(&mut self) -> Entity {
        let id = if let Some(id) = self.free_list.pop() {
            id
        } else {
            let id = self.next_id;
            self.next_id += 1;
            id
        };
        self.alive.insert(id);
        Entity(id)
    }

    /// Returns the id to the free list. Callers strip the entity's
    /// components first; the allocator does not know about storage.
    pub fn deallocate(&mut self, entity: Entity) {
        if self.alive.remove(&entity.0) {
            self.free_list.push(entity.0);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity.0)
    }

    pub fn count(&self) -> usize {
        self.alive.len()
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
