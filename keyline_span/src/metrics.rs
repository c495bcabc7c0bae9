// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position to span lookups backed by a sparse checkpoint cache.

use alloc::vec::Vec;
use core::num::NonZeroUsize;
use core::ops::Range;

use crate::{ItemSource, SpanError};

/// Distance between checkpoints recorded while scanning forward.
const CHECKPOINT_STRIDE: usize = 64;

/// Span placement of a single item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpanInfo {
    /// Position of the item.
    pub position: usize,
    /// First span occupied by the item, in `0..span_count`.
    pub span_index: usize,
    /// Number of spans occupied by the item.
    pub span_size: usize,
    /// Index of the span group (row or column) containing the item.
    pub group: usize,
}

impl SpanInfo {
    /// One past the last span occupied by the item.
    #[must_use]
    pub const fn span_end(&self) -> usize {
        self.span_index + self.span_size
    }

    /// Returns `true` if `span` lies within the spans occupied by the item.
    #[must_use]
    pub const fn covers(&self, span: usize) -> bool {
        span >= self.span_index && span < self.span_end()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Checkpoint {
    position: usize,
    span_index: usize,
    group: usize,
}

/// Maps positions onto spans and span groups.
///
/// Span placement depends on every item before a position, so lookups scan forward from the
/// nearest cached checkpoint. Checkpoints are append-only and strictly increasing in position:
/// one is recorded every few dozen positions while scanning, plus one for the furthest position
/// looked up so far. Lookups binary search the checkpoints, so repeated queries near the
/// current layout window stay cheap no matter how far the collection has been scrolled.
///
/// The cache does not observe the item provider. Callers must call
/// [`SpanMetrics::invalidate`] whenever the collection changes structurally or span sizes
/// change.
#[derive(Clone, Debug)]
pub struct SpanMetrics {
    span_count: NonZeroUsize,
    checkpoints: Vec<Checkpoint>,
}

impl SpanMetrics {
    /// Creates metrics for a grid with `span_count` spans.
    #[must_use]
    pub fn new(span_count: NonZeroUsize) -> Self {
        Self {
            span_count,
            checkpoints: Vec::new(),
        }
    }

    /// Creates metrics from an unchecked span count.
    ///
    /// Returns [`SpanError::ZeroSpanCount`] when `span_count` is zero.
    pub fn try_new(span_count: usize) -> Result<Self, SpanError> {
        NonZeroUsize::new(span_count)
            .map(Self::new)
            .ok_or(SpanError::ZeroSpanCount)
    }

    /// Returns the number of spans per group.
    #[must_use]
    pub const fn span_count(&self) -> usize {
        self.span_count.get()
    }

    /// Changes the number of spans per group and drops all cached placements.
    pub fn set_span_count(&mut self, span_count: NonZeroUsize) {
        if span_count != self.span_count {
            self.span_count = span_count;
            self.invalidate();
        }
    }

    /// Drops all cached placements.
    pub fn invalidate(&mut self) {
        if !self.checkpoints.is_empty() {
            log::trace!(
                "span cache invalidated ({} checkpoints)",
                self.checkpoints.len()
            );
        }
        self.checkpoints.clear();
    }

    /// Returns the validated span size of `position`.
    pub fn span_size<I: ItemSource + ?Sized>(
        &self,
        items: &I,
        position: usize,
    ) -> Result<usize, SpanError> {
        let item_count = items.item_count();
        if position >= item_count {
            return Err(SpanError::PositionOutOfBounds {
                position,
                item_count,
            });
        }
        let span_size = items.span_size(position);
        if span_size == 0 {
            return Err(SpanError::ZeroSpanSize { position });
        }
        if span_size > self.span_count() {
            return Err(SpanError::SpanSizeExceedsCount {
                position,
                span_size,
                span_count: self.span_count(),
            });
        }
        Ok(span_size)
    }

    /// Returns the span placement of `position`.
    pub fn span_info<I: ItemSource + ?Sized>(
        &mut self,
        items: &I,
        position: usize,
    ) -> Result<SpanInfo, SpanError> {
        let span_size = self.span_size(items, position)?;
        if self.span_count() == 1 {
            return Ok(SpanInfo {
                position,
                span_index: 0,
                span_size,
                group: position,
            });
        }

        if self.checkpoints.is_empty() {
            // Position 0 always starts the first group; its size was validated above when
            // `position == 0`, and is validated by the scan otherwise.
            self.checkpoints.push(Checkpoint {
                position: 0,
                span_index: 0,
                group: 0,
            });
        }

        let idx = self.checkpoints.partition_point(|c| c.position <= position);
        let mut current = self.checkpoints[idx - 1];
        let mut current_size = self.span_size(items, current.position)?;
        while current.position < position {
            let next = current.position + 1;
            let next_size = self.span_size(items, next)?;
            let end = current.span_index + current_size;
            current = if end + next_size > self.span_count() {
                Checkpoint {
                    position: next,
                    span_index: 0,
                    group: current.group + 1,
                }
            } else {
                Checkpoint {
                    position: next,
                    span_index: end,
                    group: current.group,
                }
            };
            current_size = next_size;
            if next % CHECKPOINT_STRIDE == 0 {
                self.record(current);
            }
        }
        self.record(current);

        Ok(SpanInfo {
            position,
            span_index: current.span_index,
            span_size: current_size,
            group: current.group,
        })
    }

    /// Returns the first span occupied by `position`.
    pub fn span_index<I: ItemSource + ?Sized>(
        &mut self,
        items: &I,
        position: usize,
    ) -> Result<usize, SpanError> {
        self.span_info(items, position).map(|info| info.span_index)
    }

    /// Returns the index of the span group containing `position`.
    pub fn span_group_index<I: ItemSource + ?Sized>(
        &mut self,
        items: &I,
        position: usize,
    ) -> Result<usize, SpanError> {
        self.span_info(items, position).map(|info| info.group)
    }

    /// Returns the positions of the span group containing `position`.
    pub fn group_range<I: ItemSource + ?Sized>(
        &mut self,
        items: &I,
        position: usize,
    ) -> Result<Range<usize>, SpanError> {
        let info = self.span_info(items, position)?;
        let mut start = position;
        let mut span_index = info.span_index;
        while span_index > 0 {
            start -= 1;
            span_index = self.span_index(items, start)?;
        }
        let item_count = items.item_count();
        let mut end = position + 1;
        while end < item_count && self.span_index(items, end)? != 0 {
            end += 1;
        }
        Ok(start..end)
    }

    /// Returns the number of span groups in the collection.
    pub fn group_count<I: ItemSource + ?Sized>(&mut self, items: &I) -> Result<usize, SpanError> {
        match items.item_count() {
            0 => Ok(0),
            count => self.span_group_index(items, count - 1).map(|group| group + 1),
        }
    }

    /// Returns `true` if every group holds exactly one item.
    #[must_use]
    pub const fn is_single_span(&self) -> bool {
        self.span_count.get() == 1
    }

    fn record(&mut self, checkpoint: Checkpoint) {
        let is_new = self
            .checkpoints
            .last()
            .is_none_or(|last| last.position < checkpoint.position);
        if is_new {
            self.checkpoints.push(checkpoint);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::NonZeroUsize;

    use proptest::prelude::*;

    use super::{SpanInfo, SpanMetrics};
    use crate::{FnItems, SpanError, UniformItems};

    fn metrics(span_count: usize) -> SpanMetrics {
        SpanMetrics::new(NonZeroUsize::new(span_count).unwrap())
    }

    /// Reference placement computed with a plain scan from position 0.
    fn naive(spans: &[usize], span_count: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut end = 0;
        let mut group = 0;
        for (position, &size) in spans.iter().enumerate() {
            let span_index = if position > 0 && end + size > span_count {
                group += 1;
                0
            } else {
                end
            };
            out.push((span_index, group));
            end = span_index + size;
        }
        out
    }

    #[test]
    fn uniform_items_fill_rows_in_order() {
        let items = UniformItems::new(10);
        let mut metrics = metrics(4);
        assert_eq!(
            metrics.span_info(&items, 5).unwrap(),
            SpanInfo {
                position: 5,
                span_index: 1,
                span_size: 1,
                group: 1,
            }
        );
        assert_eq!(metrics.span_group_index(&items, 9).unwrap(), 2);
        assert_eq!(metrics.group_count(&items).unwrap(), 3);
    }

    #[test]
    fn item_that_does_not_fit_starts_a_new_group() {
        // [1, 1, 1] then a 2-span item that cannot fit in the last span.
        let spans = [1, 1, 1, 2, 1, 4];
        let items = FnItems::new(spans.len(), |p| spans[p]);
        let mut metrics = metrics(4);
        assert_eq!(metrics.span_info(&items, 3).unwrap().span_index, 0);
        assert_eq!(metrics.span_info(&items, 3).unwrap().group, 1);
        assert_eq!(metrics.span_info(&items, 4).unwrap().span_index, 2);
        assert_eq!(metrics.span_info(&items, 5).unwrap().group, 2);
        assert_eq!(metrics.group_range(&items, 4).unwrap(), 3..5);
        assert_eq!(metrics.group_range(&items, 1).unwrap(), 0..3);
    }

    #[test]
    fn oversized_span_is_a_configuration_error() {
        let items = FnItems::new(4, |p| if p == 2 { 5 } else { 1 });
        let mut metrics = metrics(4);
        assert_eq!(metrics.span_index(&items, 1).unwrap(), 1);
        assert_eq!(
            metrics.span_index(&items, 3),
            Err(SpanError::SpanSizeExceedsCount {
                position: 2,
                span_size: 5,
                span_count: 4,
            })
        );
    }

    #[test]
    fn zero_span_and_out_of_bounds_are_rejected() {
        let items = FnItems::new(2, |p| p);
        let mut metrics = metrics(2);
        assert_eq!(
            metrics.span_info(&items, 0),
            Err(SpanError::ZeroSpanSize { position: 0 })
        );
        assert_eq!(
            metrics.span_info(&UniformItems::new(2), 2),
            Err(SpanError::PositionOutOfBounds {
                position: 2,
                item_count: 2,
            })
        );
        assert_eq!(SpanMetrics::try_new(0).err(), Some(SpanError::ZeroSpanCount));
    }

    #[test]
    fn single_span_grid_maps_positions_to_groups() {
        let items = UniformItems::new(1000);
        let mut metrics = metrics(1);
        assert!(metrics.is_single_span());
        assert_eq!(metrics.span_group_index(&items, 999).unwrap(), 999);
        assert_eq!(metrics.group_range(&items, 10).unwrap(), 10..11);
    }

    #[test]
    fn invalidate_picks_up_new_span_sizes() {
        let mut wide = false;
        let mut metrics = metrics(3);
        {
            let items = FnItems::new(6, |_| if wide { 3 } else { 1 });
            assert_eq!(metrics.span_group_index(&items, 5).unwrap(), 1);
        }
        wide = true;
        let items = FnItems::new(6, |_| if wide { 3 } else { 1 });
        metrics.invalidate();
        assert_eq!(metrics.span_group_index(&items, 5).unwrap(), 5);
    }

    #[test]
    fn long_scans_leave_sparse_checkpoints() {
        let items = UniformItems::new(10_000);
        let mut metrics = metrics(3);
        assert_eq!(metrics.span_group_index(&items, 9_999).unwrap(), 3_333);
        assert!(metrics.checkpoints.len() > 100);
        assert!(metrics.checkpoints.len() < 200);
        assert!(
            metrics
                .checkpoints
                .windows(2)
                .all(|w| w[0].position < w[1].position),
            "checkpoints must stay strictly increasing"
        );
        // Lookups behind the furthest checkpoint reuse the cache instead of appending.
        let before = metrics.checkpoints.len();
        assert_eq!(metrics.span_index(&items, 100).unwrap(), 1);
        assert_eq!(metrics.checkpoints.len(), before);
    }

    proptest! {
        #[test]
        fn cached_lookups_match_a_full_scan(
            spans in proptest::collection::vec(1_usize..=4, 1..300),
            queries in proptest::collection::vec(any::<prop::sample::Index>(), 1..40),
        ) {
            let items = FnItems::new(spans.len(), |p| spans[p]);
            let expected = naive(&spans, 4);
            let mut metrics = metrics(4);
            for query in queries {
                let position = query.index(spans.len());
                let info = metrics.span_info(&items, position).unwrap();
                prop_assert_eq!((info.span_index, info.group), expected[position]);
                prop_assert!(info.span_end() <= 4);
            }
        }
    }
}
