// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyline Span: span metrics and row packing for span-based grids.
//!
//! A span grid divides the cross axis of a scrolling container into `span_count` equal
//! *spans*. Every item occupies between `1` and `span_count` consecutive spans, and items are
//! flowed into *span groups* (rows in a vertical grid, columns in a horizontal one): an item
//! that does not fit in the remaining spans of the current group starts a new group.
//!
//! The core concepts are:
//!
//! - [`ItemSource`]: the item provider, reporting the item count and each item's span size.
//! - [`SpanMetrics`]: maps a position to its [`SpanInfo`] (span index, span size, span group),
//!   backed by a sparse checkpoint cache so repeated lookups are cheap.
//! - [`pack_row`]: packs consecutive items into one [`SpanRow`] in either [`PackDirection`].
//!
//! Span sizes are validated on every lookup. An item with a span size of zero, or one that is
//! wider than the grid, is a configuration error ([`SpanError`]) and is never silently skipped,
//! since continuing would corrupt every group index that follows it.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::num::NonZeroUsize;
//! use keyline_span::{FnItems, PackDirection, SpanMetrics, pack_row};
//!
//! // A full-width header followed by single-span items in a 4-span grid.
//! let items = FnItems::new(9, |position| if position == 0 { 4 } else { 1 });
//! let mut metrics = SpanMetrics::new(NonZeroUsize::new(4).unwrap());
//!
//! let info = metrics.span_info(&items, 5).unwrap();
//! assert_eq!(info.group, 2);
//! assert_eq!(info.span_index, 0);
//!
//! let row = pack_row(&mut metrics, &items, 1, PackDirection::Forward, 4).unwrap();
//! assert_eq!(row.positions, 1..5);
//! assert_eq!(row.spans_used, 4);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod items;
mod metrics;
mod packer;

pub use error::SpanError;
pub use items::{FnItems, ItemSource, UniformItems};
pub use metrics::{SpanInfo, SpanMetrics};
pub use packer::{PackDirection, SpanRow, pack_row};
