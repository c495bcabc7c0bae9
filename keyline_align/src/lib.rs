// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyline Align: keyline alignment and scroll limits.
//!
//! A pivot-anchored container keeps its selected item aligned to a *keyline*: a line inside
//! the viewport derived from a fixed offset and a fraction of the viewport extent. This crate
//! computes that keyline, the anchor of an item (or of a sub-element inside it), and how far
//! the container has to scroll so the anchor lands on the keyline without scrolling past a
//! known edge of the collection.
//!
//! - [`ParentAlignment`]: keyline configuration for the viewport, including which [`Edge`]s
//!   items may be pinned to.
//! - [`ChildAlignment`] and [`SubPositionAlignment`]: anchor configuration for items and for
//!   alignable sub-elements within them.
//! - [`LayoutAlignment`]: keyline and anchor math plus [`LayoutAlignment::scroll_offset`].
//! - [`ScrollLimiter`]: start/end [`ScrollLimits`] derived from the outermost laid-out items;
//!   a side is unknown until the collection boundary on that side has been laid out.
//!
//! All coordinates live in *flow space*: a 1D axis along the scroll direction where position 0
//! comes first. Reversed layouts are handled once, by mirroring into flow space
//! ([`AxisViewport::to_flow`]), so every formula here is written for a single direction.
//! A positive scroll delta moves the content toward later positions.
//!
//! ## Minimal example
//!
//! ```rust
//! use keyline_align::{
//!     AxisViewport, Boundary, ChildAlignment, ItemExtent, LayoutAlignment, ParentAlignment,
//!     ScrollLimiter,
//! };
//!
//! let mut alignment = LayoutAlignment::new(ParentAlignment::default(), ChildAlignment::default());
//! alignment.set_viewport(AxisViewport::new(1000.0));
//! assert_eq!(alignment.keyline(), 500.0);
//!
//! // An item laid out at 900..1000 has its center anchor 450 past the keyline.
//! let item = ItemExtent::new(900.0, 1000.0);
//! let anchor = alignment.anchor(&item);
//!
//! // Nothing is known about the collection edges yet, so the offset is unclamped.
//! let limiter = ScrollLimiter::new();
//! assert_eq!(alignment.scroll_offset(anchor, &limiter.limits()), 450.0);
//!
//! // Once the last item is laid out, the end edge caps the scroll.
//! let mut limiter = ScrollLimiter::new();
//! limiter.update(&alignment, None, Some(Boundary { edge: 1200.0, anchor: 1150.0 }));
//! assert_eq!(alignment.scroll_offset(anchor, &limiter.limits()), 200.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate std;

mod alignment;
mod config;
mod limits;
mod viewport;

pub use alignment::{LayoutAlignment, calculate_keyline};
pub use config::{ChildAlignment, Edge, ElementId, ParentAlignment, SubPositionAlignment};
pub use limits::{Boundary, ScrollLimiter, ScrollLimits};
pub use viewport::{AxisViewport, ItemExtent};
