use crate::order::Compare;
use crate::{Entry, HeapDict};
use std::hash::Hash;
use std::iter::FusedIterator;
use std::{slice, vec};

/// Entries in heap-array order, see [`HeapDict::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K, P>(pub(crate) slice::Iter<'a, Entry<K, P>>);

impl<'a, K, P> Iterator for Iter<'a, K, P> {
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| (&e.key, &e.priority))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, P> DoubleEndedIterator for Iter<'_, K, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|e| (&e.key, &e.priority))
    }
}

impl<K, P> ExactSizeIterator for Iter<'_, K, P> {}
impl<K, P> FusedIterator for Iter<'_, K, P> {}

#[derive(Debug, Clone)]
pub struct Keys<'a, K, P>(pub(crate) slice::Iter<'a, Entry<K, P>>);

impl<'a, K, P> Iterator for Keys<'a, K, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| &e.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, P> DoubleEndedIterator for Keys<'_, K, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|e| &e.key)
    }
}

impl<K, P> ExactSizeIterator for Keys<'_, K, P> {}
impl<K, P> FusedIterator for Keys<'_, K, P> {}

#[derive(Debug, Clone)]
pub struct Values<'a, K, P>(pub(crate) slice::Iter<'a, Entry<K, P>>);

impl<'a, K, P> Iterator for Values<'a, K, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| &e.priority)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, P> DoubleEndedIterator for Values<'_, K, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|e| &e.priority)
    }
}

impl<K, P> ExactSizeIterator for Values<'_, K, P> {}
impl<K, P> FusedIterator for Values<'_, K, P> {}

/// Owned entries in heap-array order.
#[derive(Debug)]
pub struct IntoIter<K, P>(pub(crate) vec::IntoIter<Entry<K, P>>);

impl<K, P> Iterator for IntoIter<K, P> {
    type Item = (K, P);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| (e.key, e.priority))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, P> DoubleEndedIterator for IntoIter<K, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|e| (e.key, e.priority))
    }
}

impl<K, P> ExactSizeIterator for IntoIter<K, P> {}
impl<K, P> FusedIterator for IntoIter<K, P> {}

/// Pops entries in priority order, see [`HeapDict::drain_sorted`].
///
/// Entries not yet yielded when the iterator is dropped stay in the heapdict.
#[derive(Debug)]
pub struct DrainSorted<'a, K, P, C> {
    pub(crate) dict: &'a mut HeapDict<K, P, C>,
}

impl<K: Hash + Eq + Clone, P, C: Compare<P>> Iterator for DrainSorted<'_, K, P, C> {
    type Item = (K, P);

    fn next(&mut self) -> Option<Self::Item> {
        self.dict.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.dict.len();
        (n, Some(n))
    }
}

impl<K: Hash + Eq + Clone, P, C: Compare<P>> ExactSizeIterator for DrainSorted<'_, K, P, C> {}
impl<K: Hash + Eq + Clone, P, C: Compare<P>> FusedIterator for DrainSorted<'_, K, P, C> {}

impl<'a, K, P, C> IntoIterator for &'a HeapDict<K, P, C> {
    type Item = (&'a K, &'a P);
    type IntoIter = Iter<'a, K, P>;

    fn into_iter(self) -> Self::IntoIter {
        Iter(self.heap.iter())
    }
}

impl<K, P, C> IntoIterator for HeapDict<K, P, C> {
    type Item = (K, P);
    type IntoIter = IntoIter<K, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.heap.into_iter())
    }
}
