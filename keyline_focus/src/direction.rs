// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional inputs and their logical meaning in a span grid.

/// A discrete navigation input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    /// Move up on screen.
    Up,
    /// Move down on screen.
    Down,
    /// Move left on screen.
    Left,
    /// Move right on screen.
    Right,
    /// Move to the next position (for example, Tab).
    Next,
    /// Move to the previous position (for example, Shift+Tab).
    Previous,
}

/// Axis along which span groups are stacked and the container scrolls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Span groups are rows stacked top to bottom; the container scrolls along y.
    #[default]
    Vertical,
    /// Span groups are columns stacked left to right; the container scrolls along x.
    Horizontal,
}

/// What a [`FocusDirection`] means for a grid with a given orientation.
///
/// "Row" always refers to a span group, whatever the orientation: moving to the next row moves
/// along the scroll axis, moving to the next column moves between spans of the same group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Movement {
    /// To the span group after the current one.
    NextRow,
    /// To the span group before the current one.
    PreviousRow,
    /// To the next span within the current group.
    NextColumn,
    /// To the previous span within the current group.
    PreviousColumn,
    /// To the next position.
    NextItem,
    /// To the previous position.
    PreviousItem,
}

impl Movement {
    /// Resolves `direction` for a layout with `orientation`.
    ///
    /// `reversed` layouts put position 0 at the visual end of the scroll axis, so the row
    /// movements swap; movement between spans is unaffected.
    #[must_use]
    pub fn resolve(direction: FocusDirection, orientation: Orientation, reversed: bool) -> Self {
        let along = match (orientation, direction) {
            (_, FocusDirection::Next) => return Self::NextItem,
            (_, FocusDirection::Previous) => return Self::PreviousItem,
            (Orientation::Vertical, FocusDirection::Left) => return Self::PreviousColumn,
            (Orientation::Vertical, FocusDirection::Right) => return Self::NextColumn,
            (Orientation::Horizontal, FocusDirection::Up) => return Self::PreviousColumn,
            (Orientation::Horizontal, FocusDirection::Down) => return Self::NextColumn,
            (Orientation::Vertical, FocusDirection::Down)
            | (Orientation::Horizontal, FocusDirection::Right) => true,
            (Orientation::Vertical, FocusDirection::Up)
            | (Orientation::Horizontal, FocusDirection::Left) => false,
        };
        if along != reversed {
            Self::NextRow
        } else {
            Self::PreviousRow
        }
    }

    /// Returns `true` for movements along the scroll axis.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::NextRow | Self::PreviousRow)
    }

    /// Returns `true` if the movement heads toward later positions.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::NextRow | Self::NextColumn | Self::NextItem)
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusDirection, Movement, Orientation};

    #[test]
    fn vertical_layouts_scroll_with_up_and_down() {
        let resolve = |d| Movement::resolve(d, Orientation::Vertical, false);
        assert_eq!(resolve(FocusDirection::Down), Movement::NextRow);
        assert_eq!(resolve(FocusDirection::Up), Movement::PreviousRow);
        assert_eq!(resolve(FocusDirection::Right), Movement::NextColumn);
        assert_eq!(resolve(FocusDirection::Left), Movement::PreviousColumn);
        assert_eq!(resolve(FocusDirection::Next), Movement::NextItem);
    }

    #[test]
    fn horizontal_layouts_scroll_with_left_and_right() {
        let resolve = |d| Movement::resolve(d, Orientation::Horizontal, false);
        assert_eq!(resolve(FocusDirection::Right), Movement::NextRow);
        assert_eq!(resolve(FocusDirection::Left), Movement::PreviousRow);
        assert_eq!(resolve(FocusDirection::Down), Movement::NextColumn);
        assert_eq!(resolve(FocusDirection::Up), Movement::PreviousColumn);
    }

    #[test]
    fn reversal_only_swaps_row_movement() {
        let resolve = |d| Movement::resolve(d, Orientation::Vertical, true);
        assert_eq!(resolve(FocusDirection::Up), Movement::NextRow);
        assert_eq!(resolve(FocusDirection::Down), Movement::PreviousRow);
        assert_eq!(resolve(FocusDirection::Right), Movement::NextColumn);
        assert_eq!(resolve(FocusDirection::Previous), Movement::PreviousItem);
        assert!(Movement::NextRow.is_row());
        assert!(!Movement::PreviousColumn.is_forward());
    }
}
