//! Ordered storage for the items pending at one priority level.

use std::collections::VecDeque;

use crate::error::{Error, Result};

/// The pending items sharing a single priority level, in queue order.
///
/// FIFO falls out of callers appending at the back and dequeuing from the
/// front; the bucket itself only preserves sequence order.
#[derive(Debug, Clone)]
pub struct Bucket<T> {
    items: VecDeque<T>,
}

impl<T> Bucket<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn append(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Insert `item` so that it ends up at `index`. Valid indices are
    /// `0..=len`; anything past the end is rejected without touching the bucket.
    pub fn insert_at(&mut self, index: usize, item: T) -> Result<()> {
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.items.insert(index, item);
        Ok(())
    }

    /// Insert at `index`, or at the back if `index` is past the end.
    pub(crate) fn insert_clamped(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub fn insert_front(&mut self, item: T) {
        self.items.push_front(item);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        self.items.remove(index)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn peek_front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Indices of every item matching `pred`, ascending.
    pub(crate) fn matching_indices<F>(&self, mut pred: F) -> Vec<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| pred(item).then_some(i))
            .collect()
    }
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_of(items: &[&'static str]) -> Bucket<&'static str> {
        let mut bucket = Bucket::new();
        for item in items {
            bucket.append(*item);
        }
        bucket
    }

    fn contents(bucket: &Bucket<&'static str>) -> Vec<&'static str> {
        bucket.iter().copied().collect()
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let bucket = bucket_of(&["a", "b", "c"]);
        assert_eq!(contents(&bucket), vec!["a", "b", "c"]);
        assert_eq!(bucket.peek_front(), Some(&"a"));
        assert_eq!(bucket.len(), 3);
    }

    #[test]
    fn test_insert_at_middle_and_end() {
        let mut bucket = bucket_of(&["a", "c"]);
        bucket.insert_at(1, "b").unwrap();
        bucket.insert_at(3, "d").unwrap();
        assert_eq!(contents(&bucket), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_insert_at_past_end_is_rejected() {
        let mut bucket = bucket_of(&["a"]);
        let err = bucket.insert_at(2, "z").unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 2, len: 1 }));
        assert_eq!(contents(&bucket), vec!["a"]);
    }

    #[test]
    fn test_insert_front_and_remove_at() {
        let mut bucket = bucket_of(&["b", "c"]);
        bucket.insert_front("a");
        assert_eq!(bucket.remove_at(1), Some("b"));
        assert_eq!(bucket.remove_at(5), None);
        assert_eq!(contents(&bucket), vec!["a", "c"]);
    }

    #[test]
    fn test_matching_indices_ascending() {
        let bucket = bucket_of(&["x", "a", "x", "b", "x"]);
        assert_eq!(bucket.matching_indices(|s| *s == "x"), vec![0, 2, 4]);
        assert!(bucket.matching_indices(|s| *s == "q").is_empty());
    }

    #[test]
    fn test_empty_bucket() {
        let mut bucket: Bucket<i32> = Bucket::default();
        assert!(bucket.is_empty());
        assert_eq!(bucket.peek_front(), None);
        assert_eq!(bucket.pop_front(), None);
    }
}
