// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alignment configuration for the viewport, for items and for sub-elements.

bitflags::bitflags! {
    /// Collection edges that items may be pinned to instead of the keyline.
    ///
    /// When an edge is enabled and the collection boundary on that side is laid out, the
    /// container never scrolls further than what pins that boundary to the viewport edge.
    /// When it is disabled, the outermost item on that side can still reach the keyline.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Edge: u8 {
        /// The edge where position 0 lives.
        const START = 0b0000_0001;
        /// The edge where the last position lives.
        const END   = 0b0000_0010;
        /// Both edges.
        const BOTH  = Self::START.bits() | Self::END.bits();
    }
}

impl Default for Edge {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Keyline configuration of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParentAlignment {
    /// Edges the content may be pinned to.
    pub edge: Edge,
    /// Fixed distance of the keyline from the start of the padded viewport.
    pub offset: f64,
    /// Fraction of the padded viewport extent added to `offset`, in `0.0..=1.0`.
    pub fraction: f64,
    /// Align to the keyline rather than to an edge when the collection is too short to span
    /// the viewport while edge-aligned.
    pub prefer_keyline_over_edge: bool,
}

impl Default for ParentAlignment {
    fn default() -> Self {
        Self {
            edge: Edge::BOTH,
            offset: 0.0,
            fraction: 0.5,
            prefer_keyline_over_edge: true,
        }
    }
}

impl ParentAlignment {
    /// Keyline at a fixed `offset` from the start of the viewport, with no fractional part.
    #[must_use]
    pub fn at_offset(offset: f64) -> Self {
        Self {
            offset,
            fraction: 0.0,
            ..Self::default()
        }
    }
}

/// Anchor configuration of an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildAlignment {
    /// Fixed distance of the anchor from the start of the item.
    pub offset: f64,
    /// Fraction of the item extent added to `offset`, in `0.0..=1.0`.
    pub fraction: f64,
    /// Measure the anchor from the decorated bounds (item plus insets) instead of the item.
    pub include_insets: bool,
}

impl Default for ChildAlignment {
    fn default() -> Self {
        Self {
            offset: 0.0,
            fraction: 0.5,
            include_insets: false,
        }
    }
}

/// Host-chosen identifier of an alignable element inside an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Anchor configuration of one sub-position of an item.
///
/// Items that expose several independently focusable regions describe each one with a
/// `SubPositionAlignment`. The anchor is measured on the bounds of `element` when it is set and
/// resolvable, and on the item itself otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubPositionAlignment {
    /// Element the anchor is measured on.
    pub element: Option<ElementId>,
    /// Fixed distance of the anchor from the start of the element.
    pub offset: f64,
    /// Fraction of the element extent added to `offset`, in `0.0..=1.0`.
    pub fraction: f64,
}

impl SubPositionAlignment {
    /// Anchor at the start of `element`.
    #[must_use]
    pub const fn element_start(element: ElementId) -> Self {
        Self {
            element: Some(element),
            offset: 0.0,
            fraction: 0.0,
        }
    }
}

impl Default for SubPositionAlignment {
    fn default() -> Self {
        Self {
            element: None,
            offset: 0.0,
            fraction: 0.0,
        }
    }
}
