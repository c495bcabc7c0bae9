// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll limits derived from the collection boundaries.

use crate::{Edge, LayoutAlignment};

/// The outermost laid-out item on one side of the collection.
///
/// Only pass a boundary to [`ScrollLimiter::update`] when the item really is the first or last
/// item of the collection; an item that merely happens to be the outermost one laid out says
/// nothing about how far the container may scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    /// Outer decorated edge of the item, in flow space: the start of the first item or the end
    /// of the last item.
    pub edge: f64,
    /// Anchor of the item under the current child alignment.
    pub anchor: f64,
}

/// Bounds on the scroll delta the container may apply.
///
/// A side is `None` while the collection boundary on that side has not been laid out; unknown
/// sides do not clamp. Known limits satisfy `start <= end`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollLimits {
    /// Most negative delta allowed.
    pub start: Option<f64>,
    /// Most positive delta allowed.
    pub end: Option<f64>,
}

impl ScrollLimits {
    /// Clamps `delta` to the known limits.
    #[must_use]
    pub fn clamp(&self, delta: f64) -> f64 {
        let mut delta = delta;
        if let Some(end) = self.end {
            delta = delta.min(end);
        }
        if let Some(start) = self.start {
            delta = delta.max(start);
        }
        delta
    }

    /// Returns `true` if neither side is known.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Tracks [`ScrollLimits`] across layout passes.
#[derive(Clone, Debug, Default)]
pub struct ScrollLimiter {
    limits: ScrollLimits,
}

impl ScrollLimiter {
    /// Creates a limiter with both sides unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current limits.
    #[must_use]
    pub const fn limits(&self) -> ScrollLimits {
        self.limits
    }

    /// Clamps `delta` to the current limits.
    #[must_use]
    pub fn clamp(&self, delta: f64) -> f64 {
        self.limits.clamp(delta)
    }

    /// Forgets both limits.
    pub fn invalidate(&mut self) {
        self.limits = ScrollLimits::default();
    }

    /// Recomputes the limits from the collection boundaries that are currently laid out.
    ///
    /// With an edge enabled, the limit on that side pins the boundary item's outer edge to the
    /// padded viewport edge. With the edge disabled, the boundary item may scroll up to the
    /// keyline. When the collection is too short for both edges to be pinned at once, the
    /// content either aligns the boundary anchors to the keyline
    /// ([`ParentAlignment::prefer_keyline_over_edge`](crate::ParentAlignment)) or stays pinned to
    /// the start edge.
    pub fn update(
        &mut self,
        alignment: &LayoutAlignment,
        first: Option<Boundary>,
        last: Option<Boundary>,
    ) -> ScrollLimits {
        let parent = alignment.parent();
        let viewport = alignment.viewport();
        let keyline = alignment.keyline();

        let mut start = first.map(|first| {
            if parent.edge.contains(Edge::START) {
                first.edge - viewport.content_start()
            } else {
                first.anchor - keyline
            }
        });
        let mut end = last.map(|last| {
            if parent.edge.contains(Edge::END) {
                last.edge - viewport.content_end()
            } else {
                last.anchor - keyline
            }
        });

        if let (Some(first), Some(last), Some(s), Some(e)) = (first, last, start, end)
            && s > e
        {
            if parent.prefer_keyline_over_edge {
                let s = first.anchor - keyline;
                start = Some(s);
                end = Some((last.anchor - keyline).max(s));
            } else {
                end = Some(s);
            }
        }

        let limits = ScrollLimits { start, end };
        if limits != self.limits {
            log::trace!("scroll limits {:?} -> {:?}", self.limits, limits);
        }
        self.limits = limits;
        limits
    }
}
