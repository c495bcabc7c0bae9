// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use core::num::NonZeroUsize;

use keyline_align::{AxisViewport, ChildAlignment, ParentAlignment};
use keyline_focus::{FocusStrategy, Orientation, WrapMode};
use kurbo::{Insets, Size};

use crate::layout::DEFAULT_SEARCH_REACH;

/// How alignment scrolls are applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollMode {
    /// Scroll synchronously by the full alignment offset.
    #[default]
    Immediate,
    /// Ask the host to animate the scroll; inputs that arrive during the animation are
    /// throttled by the pending alignment queue.
    Smooth,
    /// Like [`ScrollMode::Smooth`], but in single-span lists inputs that arrive during the
    /// animation are queued as pending moves and applied as their targets come into view.
    SmoothUntilSurfaced,
}

/// What to do with an input when the pending alignment queue is full.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignmentOverflow {
    /// Ignore the input: selection stays where it is.
    #[default]
    DropInput,
    /// Move the selection without queueing another scroll; the selection is aligned once the
    /// running animation settles.
    FocusWithoutScroll,
}

/// Configuration of a [`GridController`](crate::GridController).
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Spans per row. Zero is rejected when the controller is built.
    pub span_count: usize,
    /// Axis along which rows are stacked.
    pub orientation: Orientation,
    /// Focus search strategy.
    pub focus_strategy: FocusStrategy,
    /// Wrap behavior at the ends of the collection.
    pub wrap: WrapMode,
    /// Extra extent laid out before the viewport.
    pub look_ahead_start: f64,
    /// Extra extent laid out after the viewport.
    pub look_ahead_end: f64,
    /// Keyline configuration.
    pub parent_alignment: ParentAlignment,
    /// Item anchor configuration.
    pub child_alignment: ChildAlignment,
    /// How alignment scrolls are applied.
    pub scroll_mode: ScrollMode,
    /// Capacity of the pending alignment queue; `None` is unbounded.
    pub max_pending_alignments: Option<NonZeroUsize>,
    /// Capacity of the pending move counter; `None` is unbounded.
    pub max_pending_moves: Option<NonZeroUsize>,
    /// Behavior when the pending alignment queue is full.
    pub alignment_overflow: AlignmentOverflow,
    /// How far past the look-ahead a focus search may lay out items, in viewport extents.
    ///
    /// Items further away are treated as unable to take focus.
    pub search_reach: f64,
    /// Most rows a [`FocusStrategy::Continuous`] search visits; `None` searches to the ends of
    /// the collection.
    pub continuous_row_limit: Option<NonZeroUsize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            span_count: 1,
            orientation: Orientation::Vertical,
            focus_strategy: FocusStrategy::Default,
            wrap: WrapMode::Never,
            look_ahead_start: 0.0,
            look_ahead_end: 0.0,
            parent_alignment: ParentAlignment::default(),
            child_alignment: ChildAlignment::default(),
            scroll_mode: ScrollMode::Immediate,
            max_pending_alignments: None,
            max_pending_moves: NonZeroUsize::new(10),
            alignment_overflow: AlignmentOverflow::DropInput,
            search_reach: DEFAULT_SEARCH_REACH,
            continuous_row_limit: None,
        }
    }
}

/// Viewport handed to [`GridController::on_layout_pass`](crate::GridController::on_layout_pass).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayoutViewport {
    /// Size of the container.
    pub size: Size,
    /// Padding inside the container, in visual terms.
    pub padding: Insets,
    /// Whether position 0 sits at the visual end of the scroll axis (bottom or right).
    pub reversed: bool,
}

impl LayoutViewport {
    /// Unpadded, non-reversed viewport.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            padding: Insets::ZERO,
            reversed: false,
        }
    }

    /// Sets the padding.
    #[must_use]
    pub const fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Sets whether the layout is reversed.
    #[must_use]
    pub const fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// The scroll axis of this viewport in flow space.
    #[must_use]
    pub fn axis(&self, orientation: Orientation) -> AxisViewport {
        let (extent, before, after) = match orientation {
            Orientation::Vertical => (self.size.height, self.padding.y0, self.padding.y1),
            Orientation::Horizontal => (self.size.width, self.padding.x0, self.padding.x1),
        };
        let (start, end) = if self.reversed {
            (after, before)
        } else {
            (before, after)
        };
        AxisViewport::new(extent)
            .with_padding(start, end)
            .with_reversed(self.reversed)
    }

    /// Start and extent of the padded cross axis.
    #[must_use]
    pub fn cross(&self, orientation: Orientation) -> (f64, f64) {
        let (extent, before, after) = match orientation {
            Orientation::Vertical => (self.size.width, self.padding.x0, self.padding.x1),
            Orientation::Horizontal => (self.size.height, self.padding.y0, self.padding.y1),
        };
        (before, (extent - before - after).max(0.0))
    }
}
