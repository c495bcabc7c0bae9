// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item providers.

use core::fmt;

/// The item provider consulted by span lookups, layout and focus search.
///
/// Positions are dense: every position in `0..item_count()` is a valid item.
pub trait ItemSource {
    /// Number of items in the collection.
    fn item_count(&self) -> usize;

    /// Number of spans occupied by the item at `position`.
    ///
    /// The default implementation gives every item a single span. Values must lie in
    /// `1..=span_count`; anything else is reported as a [`SpanError`](crate::SpanError).
    fn span_size(&self, position: usize) -> usize {
        let _ = position;
        1
    }
}

impl<T: ItemSource + ?Sized> ItemSource for &T {
    fn item_count(&self) -> usize {
        (**self).item_count()
    }

    fn span_size(&self, position: usize) -> usize {
        (**self).span_size(position)
    }
}

/// An [`ItemSource`] where every item occupies a single span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformItems {
    /// Number of items.
    pub count: usize,
}

impl UniformItems {
    /// Creates a provider with `count` single-span items.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }
}

impl ItemSource for UniformItems {
    fn item_count(&self) -> usize {
        self.count
    }
}

/// An [`ItemSource`] backed by an item count and a span size function.
pub struct FnItems<F> {
    count: usize,
    span_size: F,
}

impl<F: Fn(usize) -> usize> FnItems<F> {
    /// Creates a provider with `count` items whose span sizes come from `span_size`.
    pub fn new(count: usize, span_size: F) -> Self {
        Self { count, span_size }
    }

    /// Changes the number of items.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }
}

impl<F> fmt::Debug for FnItems<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnItems")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<F: Fn(usize) -> usize> ItemSource for FnItems<F> {
    fn item_count(&self) -> usize {
        self.count
    }

    fn span_size(&self, position: usize) -> usize {
        (self.span_size)(position)
    }
}
