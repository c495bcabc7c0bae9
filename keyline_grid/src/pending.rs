// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Throttling of navigation input during animated scrolls.

use alloc::collections::VecDeque;
use core::num::NonZeroUsize;

/// Remaining offsets at or below this magnitude count as satisfied.
const SATISFIED_EPSILON: f64 = 0.5;

/// Bounded FIFO of in-flight alignment scrolls.
///
/// Each entry is the scroll offset still needed to satisfy one accepted alignment request.
/// Scroll progress is credited to the entries in order with [`PendingAlignmentQueue::consume`].
#[derive(Clone, Debug, Default)]
pub struct PendingAlignmentQueue {
    entries: VecDeque<f64>,
    capacity: Option<NonZeroUsize>,
}

impl PendingAlignmentQueue {
    /// Creates an empty queue; `None` is unbounded.
    #[must_use]
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Maximum number of entries, if bounded.
    #[must_use]
    pub const fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Changes the capacity. Entries beyond it are kept until they drain.
    pub fn set_capacity(&mut self, capacity: Option<NonZeroUsize>) {
        self.capacity = capacity;
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if no further entry can be queued.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity
            .is_some_and(|capacity| self.entries.len() >= capacity.get())
    }

    /// Drops satisfied entries, and entries heading the other way than `offset`, from the head.
    pub fn prune(&mut self, offset: f64) {
        while let Some(&head) = self.entries.front() {
            let satisfied = head.abs() <= SATISFIED_EPSILON;
            let reversed = head.signum() != offset.signum();
            if !satisfied && !reversed {
                break;
            }
            self.entries.pop_front();
        }
    }

    /// Prunes, then queues `offset` unless the queue is full.
    ///
    /// Returns `false` if the request was not queued.
    pub fn try_push(&mut self, offset: f64) -> bool {
        self.prune(offset);
        if self.is_full() {
            log::debug!(
                "pending alignment queue full ({} entries), request of {offset} not queued",
                self.entries.len()
            );
            return false;
        }
        self.entries.push_back(offset);
        true
    }

    /// Credits `scrolled` to the entries from the head.
    pub fn consume(&mut self, scrolled: f64) {
        let mut left = scrolled;
        for entry in &mut self.entries {
            if left == 0.0 || entry.signum() != left.signum() {
                break;
            }
            let taken = if entry.abs() < left.abs() { *entry } else { left };
            *entry -= taken;
            left -= taken;
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Net count of single-position moves waiting for their target to come into view.
///
/// Positive counts move toward later positions. A move in the opposite direction cancels an
/// outstanding one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingMoves {
    count: isize,
    capacity: Option<NonZeroUsize>,
}

impl PendingMoves {
    /// Creates an empty counter; `None` is unbounded.
    #[must_use]
    pub const fn new(capacity: Option<NonZeroUsize>) -> Self {
        Self { count: 0, capacity }
    }

    /// Net outstanding moves.
    #[must_use]
    pub const fn count(&self) -> isize {
        self.count
    }

    /// Returns `true` if nothing is outstanding.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Changes the capacity.
    pub fn set_capacity(&mut self, capacity: Option<NonZeroUsize>) {
        self.capacity = capacity;
    }

    /// Records a move. Returns `false` if the counter is already at capacity in that direction.
    pub fn push(&mut self, forward: bool) -> bool {
        let next = if forward {
            self.count + 1
        } else {
            self.count - 1
        };
        let within = self
            .capacity
            .is_none_or(|capacity| next.unsigned_abs() <= capacity.get());
        if within {
            self.count = next;
        }
        within
    }

    /// Takes one outstanding move; `Some(true)` heads toward later positions.
    pub fn take(&mut self) -> Option<bool> {
        match self.count {
            0 => None,
            c if c > 0 => {
                self.count -= 1;
                Some(true)
            }
            _ => {
                self.count += 1;
                Some(false)
            }
        }
    }

    /// Drops every outstanding move.
    pub fn clear(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use super::{PendingAlignmentQueue, PendingMoves};

    #[test]
    fn full_queue_rejects_same_direction_requests() {
        let mut queue = PendingAlignmentQueue::new(NonZeroUsize::new(1));
        assert!(queue.try_push(300.0));
        assert!(!queue.try_push(300.0));
        assert!(queue.is_full());

        // A request the other way supersedes the in-flight one.
        assert!(queue.try_push(-300.0));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn scrolling_drains_entries_in_order() {
        let mut queue = PendingAlignmentQueue::new(NonZeroUsize::new(2));
        assert!(queue.try_push(100.0));
        assert!(queue.try_push(100.0));
        assert!(!queue.try_push(100.0));

        queue.consume(150.0);
        // The head is satisfied and pruned; the second entry has 50 left.
        assert!(queue.try_push(100.0));
        assert_eq!(queue.len(), 2);

        queue.consume(-10.0);
        assert_eq!(queue.len(), 2);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn unbounded_queue_always_accepts() {
        let mut queue = PendingAlignmentQueue::default();
        for _ in 0..100 {
            assert!(queue.try_push(10.0));
        }
        assert_eq!(queue.len(), 100);
    }

    #[test]
    fn moves_cancel_and_respect_capacity() {
        let mut moves = PendingMoves::new(NonZeroUsize::new(2));
        assert!(moves.push(true));
        assert!(moves.push(true));
        assert!(!moves.push(true));
        assert!(moves.push(false));
        assert_eq!(moves.count(), 1);
        assert_eq!(moves.take(), Some(true));
        assert_eq!(moves.take(), None);
        assert!(moves.push(false));
        assert_eq!(moves.take(), Some(false));
        assert!(moves.is_empty());
    }
}
