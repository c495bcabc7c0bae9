// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-axis geometry in flow space.

/// The viewport along the scroll axis.
///
/// `padding_start` is the padding on the side where position 0 is laid out, which is the
/// visual end of the axis for reversed layouts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisViewport {
    /// Extent of the viewport along the scroll axis, padding included.
    pub extent: f64,
    /// Padding before the content, in flow order.
    pub padding_start: f64,
    /// Padding after the content, in flow order.
    pub padding_end: f64,
    /// Whether position 0 is laid out at the visual end of the axis.
    pub reversed: bool,
}

impl Default for AxisViewport {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AxisViewport {
    /// Unpadded, non-reversed viewport of the given extent.
    #[must_use]
    pub const fn new(extent: f64) -> Self {
        Self {
            extent,
            padding_start: 0.0,
            padding_end: 0.0,
            reversed: false,
        }
    }

    /// Sets the flow-order padding.
    #[must_use]
    pub const fn with_padding(mut self, padding_start: f64, padding_end: f64) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    /// Sets whether the layout is reversed.
    #[must_use]
    pub const fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Start of the padded content area.
    #[must_use]
    pub const fn content_start(&self) -> f64 {
        self.padding_start
    }

    /// End of the padded content area.
    #[must_use]
    pub fn content_end(&self) -> f64 {
        (self.extent - self.padding_end).max(self.padding_start)
    }

    /// Extent of the padded content area.
    #[must_use]
    pub fn available(&self) -> f64 {
        self.content_end() - self.content_start()
    }

    /// Converts a visual coordinate on the scroll axis to flow space.
    ///
    /// The mapping is its own inverse, so it also converts flow coordinates back.
    #[must_use]
    pub fn to_flow(&self, visual: f64) -> f64 {
        if self.reversed {
            self.extent - visual
        } else {
            visual
        }
    }
}

/// Placement of a laid-out item along the scroll axis, in flow space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemExtent {
    /// Start of the item bounds.
    pub start: f64,
    /// End of the item bounds.
    pub end: f64,
    /// Decoration before the item.
    pub inset_start: f64,
    /// Decoration after the item.
    pub inset_end: f64,
}

impl ItemExtent {
    /// Undecorated item between `start` and `end`.
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            inset_start: 0.0,
            inset_end: 0.0,
        }
    }

    /// Sets the decorations before and after the item.
    #[must_use]
    pub const fn with_insets(mut self, inset_start: f64, inset_end: f64) -> Self {
        self.inset_start = inset_start;
        self.inset_end = inset_end;
        self
    }

    /// Start of the decorated bounds.
    #[must_use]
    pub fn decorated_start(&self) -> f64 {
        self.start - self.inset_start
    }

    /// End of the decorated bounds.
    #[must_use]
    pub fn decorated_end(&self) -> f64 {
        self.end + self.inset_end
    }

    /// Extent of the undecorated item.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.end - self.start
    }

    /// Returns the extent moved by `delta` along the axis.
    #[must_use]
    pub fn offset(mut self, delta: f64) -> Self {
        self.start += delta;
        self.end += delta;
        self
    }
}
