// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Remembered columns per span group.

use hashbrown::HashMap;

/// Remembers which span focus came from when it entered a span group.
///
/// When focus crosses into a row whose item has a different span size (for example, from a
/// regular cell into a full-width header), the column it came from is stored for that row.
/// Leaving the row again along the scroll axis resumes from the stored column, provided the
/// focused item still covers it. Entries are keyed by span group index and must be dropped with
/// [`SpanFocusCache::invalidate`] whenever the collection changes structurally.
#[derive(Clone, Debug, Default)]
pub struct SpanFocusCache {
    columns: HashMap<usize, usize>,
}

impl SpanFocusCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembered span for `group`, if any.
    #[must_use]
    pub fn get(&self, group: usize) -> Option<usize> {
        self.columns.get(&group).copied()
    }

    /// Remembers `span` for `group`.
    pub fn insert(&mut self, group: usize, span: usize) {
        self.columns.insert(group, span);
    }

    /// Forgets the entry for `group`.
    pub fn remove(&mut self, group: usize) -> Option<usize> {
        self.columns.remove(&group)
    }

    /// Forgets every entry.
    pub fn invalidate(&mut self) {
        if !self.columns.is_empty() {
            log::trace!("span focus cache cleared ({} rows)", self.columns.len());
        }
        self.columns.clear();
    }

    /// Number of remembered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
