// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyline Focus: span-aware directional focus search.
//!
//! This crate decides which item of a span grid should take focus when a directional input
//! arrives:
//! - **Directions** ([`FocusDirection`]) are resolved into logical [`Movement`]s for the
//!   grid's [`Orientation`] and reversal: to the next or previous row (span group), column
//!   (span within a group), or position.
//! - **Strategies** ([`FocusStrategy`]) pick the target: the adjacent row, the next row that has
//!   a focusable item in the requested column, or wrapping within a row.
//! - A **remembered column** ([`SpanFocusCache`]) lets focus pass through a full-width row and
//!   come out in the column it entered from.
//!
//! Focusability and geometry come from the host through [`FocusCandidates`]; span placement
//! comes from [`keyline_span::SpanMetrics`].
//!
//! ## Minimal example
//!
//! A 4-column grid with a full-width header at position 0:
//!
//! ```rust
//! use core::num::NonZeroUsize;
//!
//! use keyline_focus::{FocusCandidates, FocusDirection, FocusSearchEngine};
//! use keyline_span::{FnItems, SpanMetrics};
//!
//! struct AllFocusable;
//!
//! impl FocusCandidates for AllFocusable {
//!     fn is_focusable(&mut self, _position: usize) -> bool {
//!         true
//!     }
//! }
//!
//! let items = FnItems::new(9, |p| if p == 0 { 4 } else { 1 });
//! let mut metrics = SpanMetrics::new(NonZeroUsize::new(4).unwrap());
//! let mut engine = FocusSearchEngine::default();
//!
//! // From the third column of the first regular row, Up lands on the header.
//! let target = engine
//!     .find_target(&mut metrics, &items, &mut AllFocusable, 3, FocusDirection::Up)
//!     .unwrap();
//! assert_eq!(target, Some(0));
//!
//! // Down from the header returns to the column focus came from.
//! let back = engine
//!     .find_target(&mut metrics, &items, &mut AllFocusable, 0, FocusDirection::Down)
//!     .unwrap();
//! assert_eq!(back, Some(3));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod cache;
mod direction;
mod score;
mod search;

pub use cache::SpanFocusCache;
pub use direction::{FocusDirection, Movement, Orientation};
pub use search::{
    FocusCandidates, FocusConfig, FocusSearchEngine, FocusStrategy, WrapMode,
};
