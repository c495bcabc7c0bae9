// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyline Grid: a pivot-anchored virtualized span grid driven by directional input.
//!
//! A [`GridController`] lays out rows of a span grid around the *selected* item, keeps that
//! item aligned to a keyline inside the viewport, and moves the selection in response to
//! directional key presses. Only the rows covering the viewport (plus an optional look-ahead)
//! are laid out; views are acquired from and recycled to a host.
//!
//! - [`LayoutHost`]: the view system. It binds, measures, places and scrolls views, and reports
//!   focusability and sub-position anchors.
//! - [`PivotLayoutEngine`]: incremental row layout outward from the pivot, with scroll limits
//!   from [`keyline_align`].
//! - [`GridController`]: the entry points a host calls for layout passes, key presses,
//!   scrolling, animation settling and collection changes.
//! - [`SelectionState`]: the selected position and how it follows insertions, removals and
//!   moves until the next layout pass.
//! - [`PendingAlignmentQueue`] and [`PendingMoves`]: input throttling while an animated
//!   scroll is running ([`ScrollMode`]).
//!
//! Span sizes come from a [`keyline_span::ItemSource`]; focus targets from
//! [`keyline_focus::FocusSearchEngine`].
//!
//! ## Minimal example
//!
//! A host whose views are just the positions they show, every item 100 units tall:
//!
//! ```rust
//! use keyline_focus::FocusDirection;
//! use keyline_grid::{GridConfig, GridController, LayoutHost, LayoutViewport};
//! use keyline_span::{PackDirection, UniformItems};
//! use kurbo::{Rect, Size, Vec2};
//!
//! #[derive(Default)]
//! struct Host {
//!     focused: Option<usize>,
//! }
//!
//! impl LayoutHost for Host {
//!     type View = usize;
//!
//!     fn acquire_view(&mut self, position: usize, _: PackDirection) -> usize {
//!         position
//!     }
//!     fn recycle(&mut self, _: usize) {}
//!     fn measure(&mut self, _: &usize, constraints: Size) -> Size {
//!         Size::new(constraints.width, 100.0)
//!     }
//!     fn place(&mut self, _: &usize, _: Rect) {}
//!     fn offset_views(&mut self, _: Vec2) {}
//!     fn smooth_scroll_by(&mut self, _: f64) {}
//!     fn request_focus(&mut self, view: &usize) {
//!         self.focused = Some(*view);
//!     }
//! }
//!
//! let config = GridConfig {
//!     span_count: 4,
//!     ..GridConfig::default()
//! };
//! let mut grid = GridController::new(config).unwrap();
//! let mut host = Host::default();
//! let items = UniformItems::new(200);
//!
//! grid.on_layout_pass(&mut host, &items, LayoutViewport::new(Size::new(400.0, 1000.0)))
//!     .unwrap();
//! assert_eq!(grid.selected_position(), Some(0));
//!
//! for _ in 0..5 {
//!     grid.on_directional_input(&mut host, &items, FocusDirection::Next)
//!         .unwrap();
//! }
//! assert_eq!(grid.selected_position(), Some(5));
//! assert_eq!(host.focused, Some(5));
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

mod config;
mod controller;
mod error;
mod host;
mod layout;
mod pending;
mod selection;

#[cfg(test)]
mod testing;

pub use config::{AlignmentOverflow, GridConfig, LayoutViewport, ScrollMode};
pub use controller::GridController;
pub use error::LayoutError;
pub use host::{LayoutHost, SelectionListener, SubPositions};
pub use layout::{LaidOutRow, PivotLayoutEngine};
pub use pending::{PendingAlignmentQueue, PendingMoves};
pub use selection::{SavedState, SelectionState};
