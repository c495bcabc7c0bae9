// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces implemented by the host view system.

use keyline_align::{ElementId, SubPositionAlignment};
use keyline_span::PackDirection;
use kurbo::{Insets, Rect, Size, Vec2};
use smallvec::SmallVec;

/// Sub-position alignments of one item.
pub type SubPositions = SmallVec<[SubPositionAlignment; 2]>;

/// The view system a [`GridController`](crate::GridController) lays out.
///
/// The controller decides which positions are attached and where they go; the host owns the
/// views, measures them and moves them on screen. All geometry handed to the host is in the
/// container's visual coordinate space.
pub trait LayoutHost {
    /// Handle to an attached item view.
    type View;

    /// Binds a view to `position`. `direction` is the direction the layout is growing in.
    fn acquire_view(&mut self, position: usize, direction: PackDirection) -> Self::View;

    /// Returns a view that left the laid-out window.
    fn recycle(&mut self, view: Self::View);

    /// Measures `view`. `constraints` bounds the cross axis; the scroll axis is unbounded.
    fn measure(&mut self, view: &Self::View, constraints: Size) -> Size;

    /// Decorations around `view`, in visual terms.
    fn insets(&mut self, view: &Self::View) -> Insets {
        let _ = view;
        Insets::ZERO
    }

    /// Moves `view` to `bounds`.
    fn place(&mut self, view: &Self::View, bounds: Rect);

    /// Moves every attached view by `delta`.
    fn offset_views(&mut self, delta: Vec2);

    /// Starts an animated scroll by `delta` along the scroll axis, in flow terms: positive
    /// deltas reveal later positions.
    ///
    /// The host drives the animation by calling
    /// [`GridController::scroll_by`](crate::GridController::scroll_by) for every frame and
    /// [`GridController::on_scroll_settled`](crate::GridController::on_scroll_settled) once it
    /// stops. A new call supersedes any animation still running.
    fn smooth_scroll_by(&mut self, delta: f64);

    /// Returns `true` if `view` can take focus.
    fn is_focusable(&self, view: &Self::View) -> bool {
        let _ = view;
        true
    }

    /// Moves input focus to `view`.
    fn request_focus(&mut self, view: &Self::View);

    /// Alignable regions inside `view`, in navigation order.
    fn sub_position_alignments(&self, view: &Self::View) -> SubPositions {
        let _ = view;
        SubPositions::new()
    }

    /// Bounds of `element` inside `view`, relative to the view's own origin.
    fn element_bounds(&self, view: &Self::View, element: ElementId) -> Option<Rect> {
        let _ = (view, element);
        None
    }
}

/// Observer of selection changes.
pub trait SelectionListener {
    /// The selection moved to `position` / `sub_position`.
    fn on_selected(&mut self, position: usize, sub_position: usize);

    /// The selection at `position` / `sub_position` finished aligning to the keyline.
    fn on_selected_and_aligned(&mut self, position: usize, sub_position: usize) {
        let _ = (position, sub_position);
    }
}
