// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyline, anchor and scroll offset math.

use crate::{
    AxisViewport, ChildAlignment, ItemExtent, ParentAlignment, ScrollLimits, SubPositionAlignment,
};

/// Computes the keyline of `alignment` in visual coordinates.
///
/// The keyline is `offset + fraction * available` measured from the start of the padded
/// viewport in flow order. For reversed layouts that distance is measured from the visual end
/// of the viewport, i.e. the keyline is mirrored.
#[must_use]
pub fn calculate_keyline(alignment: &ParentAlignment, viewport: &AxisViewport) -> f64 {
    viewport.to_flow(flow_keyline(alignment, viewport))
}

fn flow_keyline(alignment: &ParentAlignment, viewport: &AxisViewport) -> f64 {
    let fraction = alignment.fraction.clamp(0.0, 1.0);
    viewport.content_start() + alignment.offset + fraction * viewport.available()
}

/// Keyline and anchor math for one container.
///
/// The keyline is cached and recomputed whenever the viewport or the parent alignment
/// changes.
#[derive(Clone, Debug)]
pub struct LayoutAlignment {
    parent: ParentAlignment,
    child: ChildAlignment,
    viewport: AxisViewport,
    keyline: f64,
}

impl Default for LayoutAlignment {
    fn default() -> Self {
        Self::new(ParentAlignment::default(), ChildAlignment::default())
    }
}

impl LayoutAlignment {
    /// Creates the alignment math for an empty viewport.
    #[must_use]
    pub fn new(parent: ParentAlignment, child: ChildAlignment) -> Self {
        let viewport = AxisViewport::default();
        Self {
            keyline: flow_keyline(&parent, &viewport),
            parent,
            child,
            viewport,
        }
    }

    /// Returns the parent alignment.
    #[must_use]
    pub const fn parent(&self) -> &ParentAlignment {
        &self.parent
    }

    /// Returns the child alignment.
    #[must_use]
    pub const fn child(&self) -> &ChildAlignment {
        &self.child
    }

    /// Returns the viewport.
    #[must_use]
    pub const fn viewport(&self) -> &AxisViewport {
        &self.viewport
    }

    /// Replaces the parent alignment.
    pub fn set_parent(&mut self, parent: ParentAlignment) {
        self.parent = parent;
        self.refresh();
    }

    /// Replaces the child alignment.
    pub fn set_child(&mut self, child: ChildAlignment) {
        self.child = child;
    }

    /// Replaces the viewport. Returns `true` if the keyline moved.
    pub fn set_viewport(&mut self, viewport: AxisViewport) -> bool {
        self.viewport = viewport;
        let previous = self.keyline;
        self.refresh();
        previous != self.keyline
    }

    /// Keyline in flow space.
    #[must_use]
    pub const fn keyline(&self) -> f64 {
        self.keyline
    }

    /// Keyline in visual coordinates.
    #[must_use]
    pub fn visual_keyline(&self) -> f64 {
        self.viewport.to_flow(self.keyline)
    }

    /// Anchor of `item` under the child alignment.
    #[must_use]
    pub fn anchor(&self, item: &ItemExtent) -> f64 {
        let (start, end) = if self.child.include_insets {
            (item.decorated_start(), item.decorated_end())
        } else {
            (item.start, item.end)
        };
        start + self.child.offset + self.child.fraction.clamp(0.0, 1.0) * (end - start)
    }

    /// Anchor of a sub-position.
    ///
    /// `element` is the flow-space span of the sub-position's element, or `None` when the
    /// sub-position is measured on the item itself.
    #[must_use]
    pub fn sub_anchor(
        &self,
        item: &ItemExtent,
        element: Option<(f64, f64)>,
        alignment: &SubPositionAlignment,
    ) -> f64 {
        let (start, end) = element.unwrap_or((item.start, item.end));
        start + alignment.offset + alignment.fraction.clamp(0.0, 1.0) * (end - start)
    }

    /// Scroll delta that brings `anchor` to the keyline, clamped to `limits`.
    ///
    /// When the anchor lies between the keyline and a known, edge-aligned boundary, the limit
    /// wins and the content is pinned to that edge instead. Unknown limits do not clamp.
    #[must_use]
    pub fn scroll_offset(&self, anchor: f64, limits: &ScrollLimits) -> f64 {
        limits.clamp(anchor - self.keyline)
    }

    /// Scroll delta for sub-position `sub_position` of an item whose sub-position anchors are
    /// `anchors`.
    ///
    /// The first anchor is the scroll basis and is clamped like any item anchor; further
    /// sub-positions add their fixed distance from it. An empty `anchors` slice yields `0.0`.
    #[must_use]
    pub fn sub_position_offset(
        &self,
        anchors: &[f64],
        sub_position: usize,
        limits: &ScrollLimits,
    ) -> f64 {
        let Some(&basis) = anchors.first() else {
            return 0.0;
        };
        let target = anchors
            .get(sub_position)
            .or_else(|| anchors.last())
            .copied()
            .unwrap_or(basis);
        self.scroll_offset(basis, limits) + (target - basis)
    }

    fn refresh(&mut self) {
        self.keyline = flow_keyline(&self.parent, &self.viewport);
    }
}
