//! Ascending chain of frequency buckets for O(1) LFU ranking.
//!
//! Every tracked value belongs to exactly one bucket. Buckets are linked in
//! strictly ascending frequency order and only frequencies that are in use
//! exist; a bucket is unlinked the moment its last member leaves.
//!
//! ```text
//!   lowest                                              highest
//!     │                                                    │
//!     ▼                                                    ▼
//!   ┌────────┐        ┌────────┐        ┌────────┐
//!   │ freq 1 │ ◄────► │ freq 2 │ ◄────► │ freq 5 │
//!   └───┬────┘        └───┬────┘        └───┬────┘
//!       │                 │                 │
//!   [m_3]◄►[m_0]        [m_1]           [m_4]◄►[m_2]
//!   (join order: earliest first)
//! ```
//!
//! Promotion moves a member from bucket `f` into the bucket right after it if
//! that bucket counts `f + 1`, otherwise into a new `f + 1` bucket spliced in
//! between. Both members and buckets live in [`SlotArena`]s and refer to each
//! other by [`SlotId`].
//!
//! | Operation        | Time | Notes                                   |
//! |------------------|------|-----------------------------------------|
//! | `insert`         | O(1) | Joins (or creates) the frequency-1 bucket |
//! | `promote`        | O(1) | `f` → `f + 1`, saturates at `u64::MAX`   |
//! | `remove`         | O(1) | Prunes the bucket if it empties         |
//! | `lowest_members` | O(1) | Iterator over the lowest bucket         |

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Member<T> {
    value: T,
    bucket: SlotId,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
struct Bucket {
    frequency: u64,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl Bucket {
    fn new(frequency: u64, prev: Option<SlotId>, next: Option<SlotId>) -> Self {
        Self {
            frequency,
            head: None,
            tail: None,
            len: 0,
            prev,
            next,
        }
    }
}

#[derive(Debug)]
pub struct FrequencyChain<T> {
    members: SlotArena<Member<T>>,
    buckets: SlotArena<Bucket>,
    lowest: Option<SlotId>,
    highest: Option<SlotId>,
}

impl<T> FrequencyChain<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: SlotArena::with_capacity(capacity),
            buckets: SlotArena::new(),
            lowest: None,
            highest: None,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.members.get(id).map(|member| &member.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.members.get_mut(id).map(|member| &mut member.value)
    }

    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        let member = self.members.get(id)?;
        Some(self.buckets[member.bucket].frequency)
    }

    pub fn lowest_frequency(&self) -> Option<u64> {
        self.lowest.map(|id| self.buckets[id].frequency)
    }

    /// Adds `value` with frequency 1.
    pub fn insert(&mut self, value: T) -> SlotId {
        let bucket = match self.lowest {
            Some(id) if self.buckets[id].frequency == 1 => id,
            _ => self.link_bucket_after(None, 1),
        };
        let id = self.members.insert(Member {
            value,
            bucket,
            prev: None,
            next: None,
        });
        self.push_member_back(bucket, id);
        id
    }

    /// Moves `id` one frequency up and returns its new frequency.
    ///
    /// At `u64::MAX` the member stays where it is.
    pub fn promote(&mut self, id: SlotId) -> Option<u64> {
        let current = self.members.get(id)?.bucket;
        let frequency = self.buckets[current].frequency;
        let Some(promoted) = frequency.checked_add(1) else {
            return Some(frequency);
        };

        let next = self.buckets[current].next;
        let target = match next {
            Some(next) if self.buckets[next].frequency == promoted => next,
            _ => self.link_bucket_after(Some(current), promoted),
        };

        self.detach_member(id);
        self.push_member_back(target, id);
        self.prune_if_empty(current);
        Some(promoted)
    }

    /// Moves `id` to the back of its bucket without changing its frequency.
    pub fn requeue(&mut self, id: SlotId) -> bool {
        let Some(member) = self.members.get(id) else {
            return false;
        };
        let bucket = member.bucket;
        if self.buckets[bucket].tail != Some(id) {
            self.detach_member(id);
            self.push_member_back(bucket, id);
        }
        true
    }

    /// Removes `id` and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let bucket = self.members.get(id)?.bucket;
        self.detach_member(id);
        self.prune_if_empty(bucket);
        self.members.remove(id).map(|member| member.value)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.buckets.clear();
        self.lowest = None;
        self.highest = None;
    }

    /// Members of the lowest-frequency bucket, earliest joiner first.
    pub fn lowest_members(&self) -> Members<'_, T> {
        Members {
            chain: self,
            current: self.lowest.and_then(|bucket| self.buckets[bucket].head),
        }
    }

    /// Every member, ascending by frequency, join order within a bucket.
    pub fn iter(&self) -> ChainIter<'_, T> {
        ChainIter {
            chain: self,
            bucket: self.lowest,
            current: self.lowest.and_then(|bucket| self.buckets[bucket].head),
        }
    }

    /// Frequencies of the live buckets, lowest first.
    pub fn frequencies(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.buckets.len());
        let mut current = self.lowest;
        while let Some(id) = current {
            let bucket = &self.buckets[id];
            out.push(bucket.frequency);
            current = bucket.next;
        }
        out
    }

    /// Creates a bucket right after `prev` (or at the head when `None`).
    fn link_bucket_after(&mut self, prev: Option<SlotId>, frequency: u64) -> SlotId {
        let next = match prev {
            Some(prev_id) => self.buckets[prev_id].next,
            None => self.lowest,
        };
        let id = self.buckets.insert(Bucket::new(frequency, prev, next));
        match prev {
            Some(prev_id) => self.buckets[prev_id].next = Some(id),
            None => self.lowest = Some(id),
        }
        match next {
            Some(next_id) => self.buckets[next_id].prev = Some(id),
            None => self.highest = Some(id),
        }
        id
    }

    fn prune_if_empty(&mut self, id: SlotId) {
        if self.buckets[id].len > 0 {
            return;
        }
        let Some(bucket) = self.buckets.remove(id) else {
            return;
        };
        match bucket.prev {
            Some(prev_id) => self.buckets[prev_id].next = bucket.next,
            None => self.lowest = bucket.next,
        }
        match bucket.next {
            Some(next_id) => self.buckets[next_id].prev = bucket.prev,
            None => self.highest = bucket.prev,
        }
    }

    fn push_member_back(&mut self, bucket: SlotId, id: SlotId) {
        let old_tail = self.buckets[bucket].tail;
        {
            let member = &mut self.members[id];
            member.bucket = bucket;
            member.prev = old_tail;
            member.next = None;
        }
        match old_tail {
            Some(tail_id) => self.members[tail_id].next = Some(id),
            None => self.buckets[bucket].head = Some(id),
        }
        let bucket = &mut self.buckets[bucket];
        bucket.tail = Some(id);
        bucket.len += 1;
    }

    fn detach_member(&mut self, id: SlotId) {
        let (bucket, prev, next) = {
            let member = &self.members[id];
            (member.bucket, member.prev, member.next)
        };
        match prev {
            Some(prev_id) => self.members[prev_id].next = next,
            None => self.buckets[bucket].head = next,
        }
        match next {
            Some(next_id) => self.members[next_id].prev = prev,
            None => self.buckets[bucket].tail = prev,
        }
        let member = &mut self.members[id];
        member.prev = None;
        member.next = None;
        let bucket = &mut self.buckets[bucket];
        bucket.len = bucket.len.saturating_sub(1);
    }

    /// Checks ordering, pruning and member/bucket back-references.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen_members = 0usize;
        let mut seen_buckets = 0usize;
        let mut last_frequency: Option<u64> = None;
        let mut prev_bucket = None;
        let mut current = self.lowest;

        while let Some(bucket_id) = current {
            let bucket = self
                .buckets
                .get(bucket_id)
                .ok_or_else(|| InvariantError::new("linked bucket missing from arena"))?;
            if bucket.prev != prev_bucket {
                return Err(InvariantError::new("bucket prev link is not symmetric"));
            }
            if bucket.frequency == 0 {
                return Err(InvariantError::new("bucket with frequency 0"));
            }
            if let Some(last) = last_frequency
                && bucket.frequency <= last
            {
                return Err(InvariantError::new(format!(
                    "bucket {} follows bucket {}",
                    bucket.frequency, last
                )));
            }
            if bucket.len == 0 {
                return Err(InvariantError::new(format!(
                    "empty bucket {} was not pruned",
                    bucket.frequency
                )));
            }

            let mut count = 0usize;
            let mut prev_member = None;
            let mut member_cursor = bucket.head;
            while let Some(member_id) = member_cursor {
                let member = self
                    .members
                    .get(member_id)
                    .ok_or_else(|| InvariantError::new("linked member missing from arena"))?;
                if member.bucket != bucket_id {
                    return Err(InvariantError::new("member points at the wrong bucket"));
                }
                if member.prev != prev_member {
                    return Err(InvariantError::new("member prev link is not symmetric"));
                }
                count += 1;
                if count > self.members.len() {
                    return Err(InvariantError::new("member list contains a cycle"));
                }
                prev_member = Some(member_id);
                member_cursor = member.next;
            }
            if bucket.tail != prev_member || bucket.len != count {
                return Err(InvariantError::new(format!(
                    "bucket {} length/tail mismatch",
                    bucket.frequency
                )));
            }

            seen_members += count;
            seen_buckets += 1;
            if seen_buckets > self.buckets.len() {
                return Err(InvariantError::new("bucket chain contains a cycle"));
            }
            last_frequency = Some(bucket.frequency);
            prev_bucket = Some(bucket_id);
            current = bucket.next;
        }

        if self.highest != prev_bucket {
            return Err(InvariantError::new("highest is not the last bucket"));
        }
        if seen_buckets != self.buckets.len() {
            return Err(InvariantError::new("unlinked bucket left in arena"));
        }
        if seen_members != self.members.len() {
            return Err(InvariantError::new(format!(
                "{} linked members but {} arena slots",
                seen_members,
                self.members.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("frequency chain invariant violated: {err}");
        }
    }
}

impl<T> Default for FrequencyChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over one bucket's members.
pub struct Members<'a, T> {
    chain: &'a FrequencyChain<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Members<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let member = self.chain.members.get(id)?;
        self.current = member.next;
        Some((id, &member.value))
    }
}

/// Iterator over the whole chain.
pub struct ChainIter<'a, T> {
    chain: &'a FrequencyChain<T>,
    bucket: Option<SlotId>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.current {
                let member = self.chain.members.get(id)?;
                self.current = member.next;
                return Some((id, &member.value));
            }
            let bucket = self.chain.buckets.get(self.bucket?)?;
            self.bucket = bucket.next;
            self.current = self
                .bucket
                .and_then(|next| self.chain.buckets.get(next))
                .and_then(|next| next.head);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Copy>(chain: &FrequencyChain<T>) -> Vec<T> {
        chain.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn inserts_share_the_frequency_one_bucket() {
        let mut chain = FrequencyChain::new();
        chain.insert("a");
        chain.insert("b");
        assert_eq!(chain.frequencies(), vec![1]);
        assert_eq!(chain.bucket_count(), 1);
        assert_eq!(values(&chain), vec!["a", "b"]);
        chain.debug_validate_invariants();
    }

    #[test]
    fn promote_creates_and_prunes_buckets() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert("a");

        assert_eq!(chain.promote(a), Some(2));
        assert_eq!(chain.frequencies(), vec![2]);
        assert_eq!(chain.promote(a), Some(3));
        assert_eq!(chain.frequencies(), vec![3]);
        assert_eq!(chain.frequency(a), Some(3));
        chain.debug_validate_invariants();
    }

    #[test]
    fn promote_reuses_adjacent_bucket() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert("a");
        let b = chain.insert("b");
        chain.promote(a);
        assert_eq!(chain.frequencies(), vec![1, 2]);

        chain.promote(b);
        assert_eq!(chain.frequencies(), vec![2]);
        assert_eq!(chain.bucket_count(), 1);
        assert_eq!(values(&chain), vec!["a", "b"]);
        chain.debug_validate_invariants();
    }

    #[test]
    fn promote_splices_between_non_adjacent_buckets() {
        let mut chain = FrequencyChain::new();
        let hot = chain.insert("hot");
        let warm = chain.insert("warm");
        chain.insert("cold");
        for _ in 0..4 {
            chain.promote(hot);
        }
        assert_eq!(chain.frequencies(), vec![1, 5]);

        chain.promote(warm);
        assert_eq!(chain.frequencies(), vec![1, 2, 5]);
        assert_eq!(values(&chain), vec!["cold", "warm", "hot"]);
        chain.debug_validate_invariants();
    }

    #[test]
    fn new_insert_goes_ahead_of_promoted_buckets() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert("a");
        chain.promote(a);
        chain.promote(a);
        chain.insert("b");
        assert_eq!(chain.frequencies(), vec![1, 3]);
        assert_eq!(chain.lowest_frequency(), Some(1));
        chain.debug_validate_invariants();
    }

    #[test]
    fn lowest_members_in_join_order() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert('a');
        chain.insert('b');
        chain.insert('c');
        chain.requeue(a);
        let lowest: Vec<_> = chain.lowest_members().map(|(_, v)| *v).collect();
        assert_eq!(lowest, vec!['b', 'c', 'a']);
    }

    #[test]
    fn remove_prunes_emptied_bucket() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert(1);
        let b = chain.insert(2);
        chain.promote(b);
        assert_eq!(chain.remove(a), Some(1));
        assert_eq!(chain.frequencies(), vec![2]);
        assert_eq!(chain.remove(a), None);
        assert_eq!(chain.remove(b), Some(2));
        assert!(chain.is_empty());
        assert_eq!(chain.bucket_count(), 0);
        assert_eq!(chain.lowest_frequency(), None);
        chain.debug_validate_invariants();
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert(1);
        chain.remove(a);
        assert_eq!(chain.promote(a), None);
        assert!(!chain.requeue(a));
        assert_eq!(chain.frequency(a), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut chain = FrequencyChain::new();
        let a = chain.insert(1);
        chain.insert(2);
        chain.promote(a);
        chain.clear();
        assert!(chain.is_empty());
        assert!(chain.frequencies().is_empty());
        assert_eq!(chain.iter().count(), 0);
        chain.debug_validate_invariants();
    }
}
