use std::cmp::Ordering;
use std::fmt;

/// Ordering strategy for priorities.
///
/// The entry whose priority compares `Less` leaves the heap first.
pub trait Compare<P: ?Sized> {
    fn compare(&self, a: &P, b: &P) -> Ordering;
}

/// Smallest priority first, by `Ord`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MinFirst;

impl<P: Ord + ?Sized> Compare<P> for MinFirst {
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a.cmp(b)
    }
}

/// Largest priority first, by `Ord`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaxFirst;

impl<P: Ord + ?Sized> Compare<P> for MaxFirst {
    fn compare(&self, a: &P, b: &P) -> Ordering {
        b.cmp(a)
    }
}

/// Ordering given by a closure.
///
/// ```
/// use heapdict::{FnOrder, HeapDict};
///
/// let by_len = FnOrder(|a: &String, b: &String| a.len().cmp(&b.len()));
/// let mut h = HeapDict::with_order(by_len);
/// h.set(1, "three".to_string());
/// h.set(2, "a".to_string());
/// assert_eq!(h.pop(), Ok((2, "a".to_string())));
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnOrder<F>(pub F);

impl<P: ?Sized, F: Fn(&P, &P) -> Ordering> Compare<P> for FnOrder<F> {
    fn compare(&self, a: &P, b: &P) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnOrder")
    }
}

impl<P: ?Sized, C: Compare<P> + ?Sized> Compare<P> for &C {
    fn compare(&self, a: &P, b: &P) -> Ordering {
        (**self).compare(a, b)
    }
}
