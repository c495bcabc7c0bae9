// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selected position and how it follows structural changes.

/// Persisted selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SavedState {
    /// Selected position, if any.
    pub selected_position: Option<usize>,
}

/// The pivot: selected position, sub-position, and the positional shift accumulated by
/// structural changes since the last layout pass.
///
/// Mutations only touch the shift. [`SelectionState::reconcile`] folds it into the position at
/// the start of the next layout pass. Removing the selected item freezes the shift: the
/// selection stays at the first removed index and ignores further changes until reconciled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    position: Option<usize>,
    sub_position: usize,
    pending_shift: isize,
    frozen: bool,
}

impl SelectionState {
    /// No selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: None,
            sub_position: 0,
            pending_shift: 0,
            frozen: false,
        }
    }

    /// Selected position as of the last reconcile.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.position
    }

    /// Selected sub-position.
    #[must_use]
    pub const fn sub_position(&self) -> usize {
        self.sub_position
    }

    /// Accumulated shift not yet folded into the position.
    #[must_use]
    pub const fn pending_shift(&self) -> isize {
        self.pending_shift
    }

    /// Returns `true` once the selected item was removed and the shift stopped tracking.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Selects `position` / `sub_position` and drops any pending shift.
    pub fn select(&mut self, position: usize, sub_position: usize) {
        self.position = Some(position);
        self.sub_position = sub_position;
        self.pending_shift = 0;
        self.frozen = false;
    }

    /// Changes the sub-position of the current selection.
    pub fn set_sub_position(&mut self, sub_position: usize) {
        self.sub_position = sub_position;
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Position including the pending shift.
    #[must_use]
    pub fn effective_position(&self) -> Option<usize> {
        self.position
            .map(|position| position.saturating_add_signed(self.pending_shift))
    }

    /// `count` items were inserted at `start`.
    pub fn on_items_added(&mut self, start: usize, count: usize) {
        let Some(position) = self.effective_position() else {
            return;
        };
        if self.frozen || count == 0 {
            return;
        }
        if start <= position {
            self.pending_shift += to_shift(count);
        }
    }

    /// `count` items starting at `start` were removed.
    pub fn on_items_removed(&mut self, start: usize, count: usize) {
        let Some(position) = self.effective_position() else {
            return;
        };
        if self.frozen || count == 0 {
            return;
        }
        if start + count <= position {
            self.pending_shift -= to_shift(count);
        } else if start <= position {
            self.position = Some(start);
            self.pending_shift = 0;
            self.frozen = true;
            self.sub_position = 0;
        }
    }

    /// `count` items moved from `from` so that the first of them now sits at `to`.
    pub fn on_items_moved(&mut self, from: usize, to: usize, count: usize) {
        let Some(position) = self.effective_position() else {
            return;
        };
        if self.frozen || count == 0 || from == to {
            return;
        }
        if (from..from + count).contains(&position) {
            self.pending_shift += to_shift(to) - to_shift(from);
            return;
        }
        let mut shifted = position;
        if from + count <= shifted {
            shifted -= count;
        }
        if to <= shifted {
            shifted += count;
        }
        self.pending_shift += to_shift(shifted) - to_shift(position);
    }

    /// Folds the pending shift into the position and clamps it to `item_count`.
    ///
    /// Returns the reconciled position; an empty collection clears the selection.
    pub fn reconcile(&mut self, item_count: usize) -> Option<usize> {
        let position = self.effective_position();
        self.pending_shift = 0;
        self.frozen = false;
        match (position, item_count) {
            (_, 0) | (None, _) => {
                self.position = None;
                self.sub_position = 0;
            }
            (Some(position), count) => {
                if position >= count {
                    log::debug!("selection {position} clamped to {}", count - 1);
                    self.sub_position = 0;
                }
                self.position = Some(position.min(count - 1));
            }
        }
        self.position
    }

    /// Snapshot for persistence.
    #[must_use]
    pub fn save(&self) -> SavedState {
        SavedState {
            selected_position: self.effective_position(),
        }
    }
}

fn to_shift(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX)
}
