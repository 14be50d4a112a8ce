//! A binary heap with dictionary semantics.
//!
//! [`HeapDict`] maps keys to priorities. Lookups go through a position
//! index, so `get` and `contains_key` are O(1) and a queued key can have its
//! priority changed in O(log n), which a plain binary heap cannot do.
//!
//! ```
//! use heapdict::HeapDict;
//!
//! let mut h = HeapDict::try_from_iter([("a", 5), ("b", 2), ("c", 8)]).unwrap();
//! assert_eq!(h.peek(), Ok((&"b", &2)));
//! h.set("a", 1);
//! assert_eq!(h.pop(), Ok(("a", 1)));
//! assert_eq!(h.pop(), Ok(("b", 2)));
//! ```
//!
//! Entries with equal priority leave in insertion order. Changing the
//! priority of a present key keeps its place in that order.
//!
//! `HeapDict` does no locking of its own. Wrap it in a mutex or keep it
//! behind a single owner when sharing it between threads.

mod error;
mod iter;
mod order;
#[cfg(feature = "serde")]
mod serde_impl;

pub use error::{Error, Result};
pub use iter::{DrainSorted, IntoIter, Iter, Keys, Values};
pub use order::{Compare, FnOrder, MaxFirst, MinFirst};
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::mem;

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, P> {
    pub(crate) key: K,
    pub(crate) priority: P,
    seq: u64,
}

/// Priority queue keyed by `K`, ordered by `C` (smallest first by default).
///
/// Invariants kept by every operation:
/// - the heap array is ordered by `(priority, seq)` under `C`;
/// - `index[k]` is the slot holding `k`, for every key in the heap;
/// - the index and the heap array have the same length.
#[derive(Clone)]
pub struct HeapDict<K, P, C = MinFirst> {
    heap: Vec<Entry<K, P>>,
    index: FxHashMap<K, usize>,
    order: C,
    next_seq: u64,
}

impl<K, P> HeapDict<K, P> {
    pub fn new() -> Self {
        Self::with_order(MinFirst)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_order(capacity, MinFirst)
    }
}

impl<K: Hash + Eq + Clone, P: Ord> HeapDict<K, P> {
    /// Builds a heapdict from `(key, priority)` pairs in O(n).
    ///
    /// Fails with [`Error::DuplicateKey`] if a key occurs twice.
    pub fn try_from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Result<Self> {
        Self::try_from_iter_with_order(iter, MinFirst)
    }
}

impl<K, P, C> HeapDict<K, P, C> {
    pub fn with_order(order: C) -> Self {
        Self::with_capacity_and_order(0, order)
    }

    pub fn with_capacity_and_order(capacity: usize, order: C) -> Self {
        HeapDict {
            heap: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order,
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn order(&self) -> &C {
        &self.order
    }

    /// The entry that would be popped next.
    pub fn peek(&self) -> Result<(&K, &P)> {
        self.heap
            .first()
            .map(|e| (&e.key, &e.priority))
            .ok_or(Error::Empty)
    }

    /// Entries in heap-array order, which is not sorted order.
    pub fn iter(&self) -> Iter<'_, K, P> {
        Iter(self.heap.iter())
    }

    pub fn keys(&self) -> Keys<'_, K, P> {
        Keys(self.heap.iter())
    }

    pub fn values(&self) -> Values<'_, K, P> {
        Values(self.heap.iter())
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
        self.next_seq = 0;
    }
}

impl<K: Hash + Eq + Clone, P, C: Compare<P>> HeapDict<K, P, C> {
    /// Like [`HeapDict::try_from_iter`] with an explicit ordering.
    pub fn try_from_iter_with_order<I: IntoIterator<Item = (K, P)>>(
        iter: I,
        order: C,
    ) -> Result<Self> {
        let iter = iter.into_iter();
        let mut dict = Self::with_capacity_and_order(iter.size_hint().0, order);
        for (position, (key, priority)) in iter.enumerate() {
            if dict.index.insert(key.clone(), position).is_some() {
                return Err(Error::DuplicateKey { position });
            }
            dict.heap.push(Entry {
                key,
                priority,
                seq: position as u64,
            });
        }
        dict.next_seq = dict.heap.len() as u64;
        dict.heapify();
        Ok(dict)
    }

    pub fn get<Q>(&self, key: &Q) -> Result<&P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &pos = self.index.get(key).ok_or(Error::KeyNotFound)?;
        Ok(&self.heap[pos].priority)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Inserts `key` or changes its priority, returning the old priority.
    pub fn set(&mut self, key: K, priority: P) -> Option<P> {
        if let Some(&pos) = self.index.get(&key) {
            let old = mem::replace(&mut self.heap[pos].priority, priority);
            match self.order.compare(&self.heap[pos].priority, &old) {
                Ordering::Less => {
                    self.sift_up(pos);
                }
                Ordering::Greater => {
                    self.sift_down(pos);
                }
                Ordering::Equal => (),
            }
            Some(old)
        } else {
            self.push(key, priority);
            None
        }
    }

    /// Inserts `key`, or moves it forward if `priority` comes strictly
    /// before its current one. Returns whether anything changed.
    ///
    /// This is the relax step of Dijkstra-style searches.
    pub fn improve(&mut self, key: K, priority: P) -> bool {
        match self.index.get(&key) {
            Some(&pos) => {
                if self
                    .order
                    .compare(&priority, &self.heap[pos].priority)
                    .is_lt()
                {
                    self.heap[pos].priority = priority;
                    self.sift_up(pos);
                    true
                } else {
                    false
                }
            }
            None => {
                self.push(key, priority);
                true
            }
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Result<(K, P)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.index.remove(key).ok_or(Error::KeyNotFound)?;
        Ok(self.take(pos))
    }

    pub fn pop(&mut self) -> Result<(K, P)> {
        let root = self.heap.first().ok_or(Error::Empty)?;
        self.index.remove(&root.key);
        Ok(self.take(0))
    }

    /// Pops every entry in priority order. Entries the iterator has not
    /// reached when it is dropped are kept.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, K, P, C> {
        DrainSorted { dict: self }
    }

    pub fn into_sorted_vec(mut self) -> Vec<(K, P)> {
        self.drain_sorted().collect()
    }

    /// Keeps the entries for which `keep` returns true. O(n).
    pub fn retain<F: FnMut(&K, &P) -> bool>(&mut self, mut keep: F) {
        let before = self.heap.len();
        self.heap.retain(|e| keep(&e.key, &e.priority));
        if self.heap.len() == before {
            return;
        }
        self.index.clear();
        for (pos, e) in self.heap.iter().enumerate() {
            self.index.insert(e.key.clone(), pos);
        }
        self.heapify();
    }

    fn push(&mut self, key: K, priority: P) {
        let pos = self.heap.len();
        self.index.insert(key.clone(), pos);
        self.heap.push(Entry {
            key,
            priority,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.sift_up(pos);
    }

    // The key at `pos` must already be gone from the index.
    fn take(&mut self, pos: usize) -> (K, P) {
        let entry = self.heap.swap_remove(pos);
        if pos < self.heap.len() {
            self.reindex(pos);
            if self.sift_up(pos) == pos {
                self.sift_down(pos);
            }
        }
        (entry.key, entry.priority)
    }

    fn heapify(&mut self) {
        for pos in (0..self.heap.len() / 2).rev() {
            self.sift_down(pos);
        }
    }

    fn sorts_before(&self, i: usize, j: usize) -> bool {
        let (a, b) = (&self.heap[i], &self.heap[j]);
        self.order
            .compare(&a.priority, &b.priority)
            .then_with(|| a.seq.cmp(&b.seq))
            .is_lt()
    }

    /// Swaps two heap slots and both of their index entries.
    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.reindex(a);
        self.reindex(b);
    }

    fn reindex(&mut self, pos: usize) {
        if let Some(slot) = self.index.get_mut(&self.heap[pos].key) {
            *slot = pos;
        }
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.sorts_before(pos, parent) {
                break;
            }
            self.swap_slots(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) -> usize {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.sorts_before(right, left) {
                right
            } else {
                left
            };
            if !self.sorts_before(child, pos) {
                break;
            }
            self.swap_slots(pos, child);
            pos = child;
        }
        pos
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        assert_eq!(self.index.len(), self.heap.len());
        for (pos, e) in self.heap.iter().enumerate() {
            assert_eq!(self.index.get(&e.key), Some(&pos));
            if pos > 0 {
                assert!(!self.sorts_before(pos, (pos - 1) / 2), "heap order at {pos}");
            }
        }
    }
}

impl<K, P> Default for HeapDict<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, P: Debug, C> Debug for HeapDict<K, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Clone, P, C: Compare<P>> Extend<(K, P)> for HeapDict<K, P, C> {
    fn extend<I: IntoIterator<Item = (K, P)>>(&mut self, iter: I) {
        for (key, priority) in iter {
            self.set(key, priority);
        }
    }
}

impl<K: Hash + Eq + Clone, P, C: Compare<P> + Default> TryFrom<Vec<(K, P)>>
    for HeapDict<K, P, C>
{
    type Error = Error;

    fn try_from(entries: Vec<(K, P)>) -> Result<Self> {
        Self::try_from_iter_with_order(entries, C::default())
    }
}
