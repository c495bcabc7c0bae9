// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing consecutive items into a single span group.

use core::ops::Range;

use crate::{ItemSource, SpanError, SpanMetrics};

/// Direction in which [`pack_row`] consumes items.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PackDirection {
    /// Consume items at increasing positions, starting with the first item of the row.
    Forward,
    /// Consume items at decreasing positions, starting with the last item of the row.
    Backward,
}

/// A packed row: a contiguous run of items sharing one span group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpanRow {
    /// Span group index of the row.
    pub group: usize,
    /// Positions in the row, in ascending order.
    pub positions: Range<usize>,
    /// Total number of spans occupied by the row.
    pub spans_used: usize,
}

impl SpanRow {
    /// Returns `true` if the row holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of items in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Position at the edge of the row that faces `direction`.
    ///
    /// This is the last position for [`PackDirection::Forward`] and the first one for
    /// [`PackDirection::Backward`], i.e. the item next to where the following row is packed.
    #[must_use]
    pub fn leading_position(&self, direction: PackDirection) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(match direction {
            PackDirection::Forward => self.positions.end - 1,
            PackDirection::Backward => self.positions.start,
        })
    }
}

/// Packs items into one row, starting at `start` and moving in `direction`.
///
/// Items are consumed while they stay in the span group of `start` and while their cumulative
/// span size fits in `available_spans` (clamped to the span count). Packing forward from the
/// first item of a group therefore yields the whole group, which is maximal: the next item
/// either starts a new group because it does not fit, or does not exist. Packing backward from
/// the last item of a group yields the same group.
///
/// If `start` itself is wider than `available_spans`, the returned row is empty. An item wider
/// than the grid is a [`SpanError::SpanSizeExceedsCount`] error.
pub fn pack_row<I: ItemSource + ?Sized>(
    metrics: &mut SpanMetrics,
    items: &I,
    start: usize,
    direction: PackDirection,
    available_spans: usize,
) -> Result<SpanRow, SpanError> {
    let available = available_spans.min(metrics.span_count());
    let first = metrics.span_info(items, start)?;
    if first.span_size > available {
        return Ok(SpanRow {
            group: first.group,
            positions: start..start,
            spans_used: 0,
        });
    }

    let mut used = first.span_size;
    let mut positions = start..start + 1;
    match direction {
        PackDirection::Forward => {
            let item_count = items.item_count();
            while positions.end < item_count {
                let next = metrics.span_info(items, positions.end)?;
                if next.group != first.group || used + next.span_size > available {
                    break;
                }
                used += next.span_size;
                positions.end += 1;
            }
        }
        PackDirection::Backward => {
            while positions.start > 0 {
                let prev = metrics.span_info(items, positions.start - 1)?;
                if prev.group != first.group || used + prev.span_size > available {
                    break;
                }
                used += prev.span_size;
                positions.start -= 1;
            }
        }
    }

    Ok(SpanRow {
        group: first.group,
        positions,
        spans_used: used,
    })
}
