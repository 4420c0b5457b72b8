//! Recency-ordered doubly linked list backed by [`SlotArena`].
//!
//! Nodes link by [`SlotId`], so the key index can hold a handle to a node and
//! move it to the head in O(1).
//!
//! ```text
//!   head (newest)                                   tail (oldest)
//!     │                                                 │
//!     ▼                                                 ▼
//!   [id_3] ◄──► [id_0] ◄──► [id_2] ◄──► [id_1]
//! ```
//!
//! `debug_validate_invariants()` walks both directions and checks the arena
//! holds exactly the linked nodes.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list ordered newest (head) to oldest (tail).
#[derive(Debug)]
pub struct RecencyList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> RecencyList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Newest value.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    /// Oldest value.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Links a new node at the head and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.attach_front(id);
        id
    }

    /// Makes `id` the newest node; returns `false` if `id` is not live.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.detach(id);
            self.attach_front(id);
        }
        true
    }

    /// Unlinks `id` and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.arena.contains(id) {
            return None;
        }
        self.detach(id);
        self.arena.remove(id).map(|node| node.value)
    }

    /// Unlinks and returns the oldest value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates from the oldest node to the newest.
    pub fn iter_oldest_first(&self) -> OldestFirst<'_, T> {
        OldestFirst {
            list: self,
            current: self.tail,
        }
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = {
            let node = &self.arena[id];
            (node.prev, node.next)
        };
        match prev {
            Some(prev_id) => self.arena[prev_id].next = next,
            None => self.head = next,
        }
        match next {
            Some(next_id) => self.arena[next_id].prev = prev,
            None => self.tail = prev,
        }
        let node = &mut self.arena[id];
        node.prev = None;
        node.next = None;
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        {
            let node = &mut self.arena[id];
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_id) => self.arena[head_id].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Checks link symmetry and that every arena slot is linked exactly once.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.head.is_none() != self.tail.is_none() {
            return Err(InvariantError::new("head and tail disagree on emptiness"));
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new("linked node missing from arena"))?;
            if node.prev != prev {
                return Err(InvariantError::new("prev link is not symmetric"));
            }
            count += 1;
            if count > self.arena.len() {
                return Err(InvariantError::new("recency list contains a cycle"));
            }
            prev = Some(id);
            current = node.next;
        }

        if self.tail != prev {
            return Err(InvariantError::new("tail is not the last linked node"));
        }
        if count != self.arena.len() {
            return Err(InvariantError::new(format!(
                "{} linked nodes but {} arena slots",
                count,
                self.arena.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("recency list invariant violated: {err}");
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator from oldest to newest.
pub struct OldestFirst<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for OldestFirst<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.prev;
        Some(&node.value)
    }
}
