//! Fixed-capacity ring storage
//!
//! `FixedRing<T>` is the storage substrate behind every component pool. It
//! never grows: once all slots are occupied, the next insertion overwrites
//! the slot that has been occupied the longest (oldest-first eviction).
//!
//! Slot handles carry a generation counter. Every free and every eviction
//! bumps the generation of the affected slot, so a handle kept across a
//! structural change is reported as [`RingError::Stale`] instead of silently
//! aliasing the new occupant. Handles are only valid until the next
//! structural mutation of the slot they point at.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use super::RingError;

/// Handle to one slot of a [`FixedRing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u32,
}

impl SlotId {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Outcome of [`FixedRing::insert`].
#[derive(Debug)]
pub struct Inserted<T> {
    /// Slot now holding the inserted value.
    pub slot: SlotId,
    /// Previous occupant, when the ring was full and the oldest entry was overwritten.
    pub evicted: Option<T>,
}

struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

pub struct FixedRing<T> {
    slots: Box<[Slot<T>]>,
    /// Free slot indices; the last entry is handed out next.
    free: Vec<usize>,
    /// Insertion order, oldest at the front. Entries whose slot was freed or
    /// overwritten stay behind until they reach the front or get compacted.
    age: VecDeque<SlotId>,
    len: usize,
}

impl<T> FixedRing<T> {
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or(RingError::ZeroCapacity)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        let slots: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                value: None,
                generation: 0,
            })
            .collect();

        Self {
            slots: slots.into_boxed_slice(),
            free: (0..capacity).rev().collect(),
            age: VecDeque::with_capacity(capacity),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Stores `value`, evicting the oldest occupied slot when the ring is full.
    pub fn insert(&mut self, value: T) -> Inserted<T> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            let id = SlotId {
                index,
                generation: slot.generation,
            };
            self.len += 1;
            self.record_insertion(id);
            return Inserted {
                slot: id,
                evicted: None,
            };
        }

        let oldest = match self.take_oldest() {
            Some(id) => id,
            None => unreachable!("full ring has no live slot in its age queue"),
        };
        let slot = &mut self.slots[oldest.index];
        let evicted = slot.value.replace(value);
        slot.generation = slot.generation.wrapping_add(1);
        let id = SlotId {
            index: oldest.index,
            generation: slot.generation,
        };
        self.record_insertion(id);
        Inserted { slot: id, evicted }
    }

    pub fn at(&self, id: SlotId) -> Result<&T, RingError> {
        self.validate(id)?;
        self.slots[id.index]
            .value
            .as_ref()
            .ok_or(RingError::Vacant { index: id.index })
    }

    pub fn at_mut(&mut self, id: SlotId) -> Result<&mut T, RingError> {
        self.validate(id)?;
        self.slots[id.index]
            .value
            .as_mut()
            .ok_or(RingError::Vacant { index: id.index })
    }

    /// Frees the slot without moving any other entry.
    pub fn remove(&mut self, id: SlotId) -> Result<T, RingError> {
        self.validate(id)?;
        let slot = &mut self.slots[id.index];
        let value = slot
            .value
            .take()
            .ok_or(RingError::Vacant { index: id.index })?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Ok(value)
    }

    /// Current handle for a raw slot index.
    pub fn slot(&self, index: usize) -> Result<SlotId, RingError> {
        let slot = self.slots.get(index).ok_or(RingError::OutOfRange {
            index,
            capacity: self.capacity(),
        })?;
        if slot.value.is_none() {
            return Err(RingError::Vacant { index });
        }
        Ok(SlotId {
            index,
            generation: slot.generation,
        })
    }

    /// The slot the next overflowing insert would overwrite.
    pub fn oldest(&self) -> Option<SlotId> {
        self.age
            .iter()
            .copied()
            .find(|id| Self::is_live(&self.slots, *id))
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free.clear();
        self.free.extend((0..self.capacity()).rev());
        self.age.clear();
        self.len = 0;
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotId {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (SlotId { index, generation }, value))
        })
    }

    /// Occupied slots from oldest to newest insertion.
    pub fn iter_by_age(&self) -> impl Iterator<Item = (SlotId, &T)> {
        let slots = &self.slots;
        self.age.iter().filter_map(move |id| {
            let slot = &slots[id.index];
            if slot.generation != id.generation {
                return None;
            }
            slot.value.as_ref().map(|value| (*id, value))
        })
    }

    fn validate(&self, id: SlotId) -> Result<(), RingError> {
        let slot = self.slots.get(id.index).ok_or(RingError::OutOfRange {
            index: id.index,
            capacity: self.capacity(),
        })?;
        if slot.value.is_none() {
            return Err(RingError::Vacant { index: id.index });
        }
        if slot.generation != id.generation {
            return Err(RingError::Stale {
                index: id.index,
                held: id.generation,
                current: slot.generation,
            });
        }
        Ok(())
    }

    fn is_live(slots: &[Slot<T>], id: SlotId) -> bool {
        let slot = &slots[id.index];
        slot.value.is_some() && slot.generation == id.generation
    }

    fn take_oldest(&mut self) -> Option<SlotId> {
        while let Some(id) = self.age.pop_front() {
            if Self::is_live(&self.slots, id) {
                return Some(id);
            }
        }
        None
    }

    fn record_insertion(&mut self, id: SlotId) {
        // Dead entries pile up under remove/insert churn without overflow.
        if self.age.len() >= self.capacity() * 2 {
            let slots = &self.slots;
            self.age.retain(|entry| Self::is_live(slots, *entry));
        }
        self.age.push_back(id);
    }
}
