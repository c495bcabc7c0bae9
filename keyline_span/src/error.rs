// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors raised while resolving spans.

/// A span configuration error.
///
/// These are caller configuration errors: they are reported as soon as the offending position
/// is looked up and are not retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    /// The grid was configured with zero spans.
    #[error("span count must be at least 1")]
    ZeroSpanCount,
    /// The item provider reported a span size of zero.
    #[error("item at position {position} has a span size of 0")]
    ZeroSpanSize {
        /// Offending position.
        position: usize,
    },
    /// The item provider reported an item wider than the grid.
    #[error("item at position {position} spans {span_size} spans but the grid only has {span_count}")]
    SpanSizeExceedsCount {
        /// Offending position.
        position: usize,
        /// Span size reported by the item provider.
        span_size: usize,
        /// Configured span count.
        span_count: usize,
    },
    /// A position outside `0..item_count` was looked up.
    #[error("position {position} is out of bounds for {item_count} items")]
    PositionOutOfBounds {
        /// Requested position.
        position: usize,
        /// Item count at the time of the lookup.
        item_count: usize,
    },
}
