//! Flattened traversal across every bucket, lowest priority value first.

use std::collections::{btree_map, vec_deque};
use std::iter::FusedIterator;

use super::{Bucket, Priority};

/// Borrowing iterator over a [`PriorityQueue`](super::PriorityQueue) in
/// dequeue order.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    levels: btree_map::Values<'a, Priority, Bucket<T>>,
    current: Option<vec_deque::Iter<'a, T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(levels: btree_map::Values<'a, Priority, Bucket<T>>, len: usize) -> Self {
        Self {
            levels,
            current: None,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(item);
            }
            self.current = Some(self.levels.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
