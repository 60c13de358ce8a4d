//! Bucketed priority queue.
//!
//! Items are grouped into one [`Bucket`] per priority level. Lower priority
//! values dequeue first; within a level items dequeue in insertion order
//! unless placed explicitly. Levels live in a `BTreeMap`, so traversal is
//! by ascending key no matter in which order levels come and go.
//!
//! The queue is a plain owned value with no interior locking. Callers that
//! share it across threads must wrap the whole queue in their own mutex.

mod bucket;
mod iter;

pub use bucket::Bucket;
pub use iter::Iter;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Priority level. Lower values are dequeued sooner.
pub type Priority = i32;

/// Reserved for [`PriorityQueue::enqueue_front`]; sorts before every other level.
pub const MIN_PRIORITY: Priority = Priority::MIN;

/// Level used by plain [`PriorityQueue::enqueue`].
pub const MAX_PRIORITY: Priority = Priority::MAX;

/// A FIFO queue with priority levels, positional insertion and in-place
/// deduplication.
///
/// Invariants maintained by every operation:
/// - a level is present in `levels` iff its bucket holds at least one item;
/// - `count` equals the sum of all bucket lengths.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    levels: BTreeMap<Priority, Bucket<T>>,
    count: usize,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            count: 0,
        }
    }

    /// Number of pending items across all levels.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Always `false`: the queue performs no synchronization of its own.
    pub fn is_synchronized(&self) -> bool {
        false
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.count = 0;
    }

    /// Active priority levels, ascending.
    pub fn priorities(&self) -> impl Iterator<Item = Priority> + '_ {
        self.levels.keys().copied()
    }

    /// The bucket for `priority`, if that level has pending items.
    pub fn bucket(&self, priority: Priority) -> Option<&Bucket<T>> {
        self.levels.get(&priority)
    }

    /// Number of items pending at `priority`.
    pub fn len_at(&self, priority: Priority) -> usize {
        self.levels.get(&priority).map_or(0, Bucket::len)
    }

    // -----------------------------------------------------------------------
    // Enqueue
    // -----------------------------------------------------------------------

    /// Append `item` behind everything else, at [`MAX_PRIORITY`].
    pub fn enqueue(&mut self, item: T) {
        self.enqueue_at_priority(item, MAX_PRIORITY);
    }

    /// Append `item` to the end of the `priority` level.
    pub fn enqueue_at_priority(&mut self, item: T, priority: Priority) {
        self.levels.entry(priority).or_default().append(item);
        self.count += 1;
    }

    /// Insert `item` at `position` within the `priority` level.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `position` is greater than the current
    /// length of that level. The queue is left unchanged.
    pub fn enqueue_at_priority_position(
        &mut self,
        item: T,
        priority: Priority,
        position: usize,
    ) -> Result<()> {
        match self.levels.get_mut(&priority) {
            Some(bucket) => bucket.insert_at(position, item)?,
            None => {
                if position != 0 {
                    return Err(Error::IndexOutOfRange {
                        index: position,
                        len: 0,
                    });
                }
                let mut bucket = Bucket::new();
                bucket.append(item);
                self.levels.insert(priority, bucket);
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Place `item` ahead of every pending item, including earlier
    /// front-of-queue items.
    pub fn enqueue_front(&mut self, item: T) {
        self.levels.entry(MIN_PRIORITY).or_default().insert_front(item);
        self.count += 1;
    }

    /// Remove every pending item matching `remove`, then enqueue `item` in
    /// the slot the earliest of them occupied. Falls back to the end of
    /// [`MAX_PRIORITY`] when nothing matched.
    ///
    /// Returns the number of items removed.
    pub fn enqueue_remove<F>(&mut self, item: T, remove: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.enqueue_remove_at(item, remove, MAX_PRIORITY, false)
    }

    /// Remove every pending item matching `remove`, then enqueue `item`.
    ///
    /// Placement:
    /// - `deduplicate_to_end`: end of the `priority` level;
    /// - no item matched: end of the `priority` level;
    /// - otherwise: the lowest level that had a match, at the smallest index
    ///   a match occupied there before removal.
    ///
    /// Returns the number of items removed.
    pub fn enqueue_remove_at<F>(
        &mut self,
        item: T,
        mut remove: F,
        priority: Priority,
        deduplicate_to_end: bool,
    ) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        // Scan before touching anything so a panicking predicate leaves the
        // queue as it was. Levels are visited ascending, so the first hit is
        // at the lowest matching level.
        let matches: Vec<(Priority, Vec<usize>)> = self
            .levels
            .iter()
            .map(|(&level, bucket)| (level, bucket.matching_indices(&mut remove)))
            .filter(|(_, indices)| !indices.is_empty())
            .collect();

        let slot = matches.first().map(|(level, indices)| (*level, indices[0]));
        let mut removed = 0;

        for (level, indices) in matches {
            let Some(bucket) = self.levels.get_mut(&level) else {
                continue;
            };
            for &index in indices.iter().rev() {
                bucket.remove_at(index);
            }
            removed += indices.len();

            if bucket.is_empty() {
                self.levels.remove(&level);
                trace!(priority = level, "retired drained bucket");
            }
        }
        self.count -= removed;

        match slot {
            Some((level, index)) if !deduplicate_to_end => {
                // Everything ahead of `index` survived the removal, so the
                // bucket is at least `index` long again.
                self.levels
                    .entry(level)
                    .or_default()
                    .insert_clamped(index, item);
                self.count += 1;
                debug!(removed, priority = level, index, "replaced pending duplicates in place");
            }
            _ => {
                self.enqueue_at_priority(item, priority);
                if removed > 0 {
                    debug!(removed, priority, "moved deduplicated item to end of level");
                }
            }
        }

        removed
    }

    // -----------------------------------------------------------------------
    // Dequeue
    // -----------------------------------------------------------------------

    /// Remove and return the next item.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nothing is pending.
    pub fn dequeue(&mut self) -> Result<T> {
        self.try_dequeue().ok_or(Error::Empty)
    }

    /// Remove and return the next item, or `None` if nothing is pending.
    pub fn try_dequeue(&mut self) -> Option<T> {
        loop {
            let mut entry = self.levels.first_entry()?;
            let item = entry.get_mut().pop_front();

            if entry.get().is_empty() {
                let level = entry.remove_entry().0;
                trace!(priority = level, "retired drained bucket");
            }

            if let Some(item) = item {
                self.count -= 1;
                return Some(item);
            }
        }
    }

    /// Level and in-level index of the first item, in dequeue order,
    /// matching `pred`.
    pub fn find<F>(&self, mut pred: F) -> Option<(Priority, usize)>
    where
        F: FnMut(&T) -> bool,
    {
        self.levels.iter().find_map(|(&level, bucket)| {
            bucket
                .iter()
                .position(&mut pred)
                .map(|index| (level, index))
        })
    }

    /// The item the next [`dequeue`](Self::dequeue) would return.
    pub fn peek(&self) -> Option<&T> {
        self.levels.values().find_map(Bucket::peek_front)
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Every pending item in dequeue order. Does not mutate the queue.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.levels.values(), self.count)
    }

    /// Clone the pending items, in dequeue order, into `target[start..]`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `target` cannot hold `len()` items from
    /// `start`. Nothing is written in that case.
    pub fn copy_to(&self, target: &mut [T], start: usize) -> Result<()>
    where
        T: Clone,
    {
        let end = start.saturating_add(self.count);
        if end > target.len() {
            return Err(Error::IndexOutOfRange {
                index: end,
                len: target.len(),
            });
        }
        for (slot, item) in target[start..end].iter_mut().zip(self.iter()) {
            slot.clone_from(item);
        }
        Ok(())
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for PriorityQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<'a, T> IntoIterator for &'a PriorityQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
