//! Slot arena with stable integer handles.
//!
//! Ranking nodes (recency list nodes, frequency bucket members, the buckets
//! themselves) live in a `SlotArena` and refer to one another by [`SlotId`]
//! instead of by pointer. Vacant slots form an embedded free list, so a removed
//! slot is reused by the next insert.
//!
//! ```text
//!   slots: [ Occupied(a) | Vacant(next=None) | Occupied(c) | Vacant(next=1) ]
//!   free_head = 3  ──►  3  ──►  1  ──►  (end)
//! ```
//!
//! A [`SlotId`] stays valid until its slot is removed. After that it may alias
//! a newer value, so owners must drop handles when they remove the slot.

use std::ops::{Index, IndexMut};

/// Stable handle into a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value` and returns its handle, reusing a vacant slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free_head {
            Some(idx) => {
                let next_free = match self.slots[idx] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.free_head = next_free;
                self.slots[idx] = Slot::Occupied(value);
                SlotId(idx)
            },
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Removes the value at `id`, returning it if the slot was occupied.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let old = std::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(id.0);
        self.len -= 1;
        match old {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and forgets all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Iterates occupied slots in slot order (not insertion order).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot {
                Slot::Occupied(value) => Some((SlotId(idx), value)),
                Slot::Vacant { .. } => None,
            })
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics if `id` is vacant. Used on handles the owner knows are live.
impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("slot {} is vacant", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("slot {} is vacant", id.0),
        }
    }
}
