// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The controller tying layout, alignment, focus search and selection together.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;
use core::ops::Range;

use keyline_align::{ElementId, ScrollLimits};
use keyline_focus::{FocusCandidates, FocusConfig, FocusDirection, FocusSearchEngine, Movement};
use keyline_span::{ItemSource, SpanError, SpanMetrics};
use kurbo::Rect;

use crate::layout::ALIGNED_EPSILON;
use crate::{
    AlignmentOverflow, GridConfig, LaidOutRow, LayoutError, LayoutHost, LayoutViewport,
    PendingAlignmentQueue, PendingMoves, PivotLayoutEngine, SavedState, ScrollMode,
    SelectionListener, SelectionState,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScrollRequest {
    /// Scroll synchronously.
    Immediate,
    /// Animate, bypassing the pending alignment queue.
    Smooth,
    /// Animate if the pending alignment queue accepts the request.
    Throttled,
}

/// Focus candidates answered by the layout, which lays out more rows on demand.
struct LayoutCandidates<'a, H: LayoutHost, I: ?Sized> {
    layout: &'a mut PivotLayoutEngine<H::View>,
    host: &'a mut H,
    items: &'a I,
    error: Option<LayoutError>,
}

impl<H: LayoutHost, I: ItemSource + ?Sized> FocusCandidates for LayoutCandidates<'_, H, I> {
    fn is_focusable(&mut self, position: usize) -> bool {
        match self.layout.ensure_laid_out(self.host, self.items, position) {
            Ok(true) => self
                .layout
                .view(position)
                .is_some_and(|view| self.host.is_focusable(view)),
            Ok(false) => false,
            Err(error) => {
                self.error.get_or_insert(error);
                false
            }
        }
    }

    fn bounds(&mut self, position: usize) -> Option<Rect> {
        self.layout.bounds(position)
    }
}

/// Drives a virtualized span grid from directional input.
///
/// The controller owns everything but the views: the [`PivotLayoutEngine`] that lays out rows
/// around the selected position, the focus search, the selection and the input throttling.
/// The host calls in at a handful of points:
///
/// - [`GridController::on_layout_pass`] whenever the container is laid out;
/// - [`GridController::on_directional_input`] for every key press;
/// - [`GridController::scroll_by`] for user scrolls and for every frame of an animation started
///   through [`LayoutHost::smooth_scroll_by`], then [`GridController::on_scroll_settled`];
/// - the `on_items_*` methods when the collection changes.
///
/// Span sizes and the item count are read from an [`ItemSource`] passed to each call.
pub struct GridController<V> {
    config: GridConfig,
    layout: PivotLayoutEngine<V>,
    focus: FocusSearchEngine,
    // The focus search resolves spans while the layout is borrowed by the candidates.
    focus_metrics: SpanMetrics,
    selection: SelectionState,
    alignments: PendingAlignmentQueue,
    moves: PendingMoves,
    listeners: Vec<Box<dyn SelectionListener>>,
    viewport: Option<LayoutViewport>,
    smooth_scrolling: bool,
    realign_on_settle: bool,
    announced: Option<(usize, usize)>,
}

impl<V> fmt::Debug for GridController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridController")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .field("selection", &self.selection)
            .field("alignments", &self.alignments)
            .field("moves", &self.moves)
            .field("listeners", &self.listeners.len())
            .field("smooth_scrolling", &self.smooth_scrolling)
            .finish_non_exhaustive()
    }
}

fn focus_config(config: &GridConfig, reversed: bool) -> FocusConfig {
    FocusConfig {
        strategy: config.focus_strategy,
        wrap: config.wrap,
        orientation: config.orientation,
        reversed,
        continuous_row_limit: config.continuous_row_limit,
    }
}

impl<V> GridController<V> {
    /// Creates a controller. Fails if `config.span_count` is zero.
    pub fn new(config: GridConfig) -> Result<Self, LayoutError> {
        let span_count = NonZeroUsize::new(config.span_count).ok_or(SpanError::ZeroSpanCount)?;
        let mut layout = PivotLayoutEngine::new(
            span_count,
            config.orientation,
            config.parent_alignment,
            config.child_alignment,
        );
        layout.set_look_ahead(config.look_ahead_start, config.look_ahead_end);
        layout.set_search_reach(config.search_reach);
        Ok(Self {
            layout,
            focus: FocusSearchEngine::new(focus_config(&config, false)),
            focus_metrics: SpanMetrics::new(span_count),
            selection: SelectionState::new(),
            alignments: PendingAlignmentQueue::new(config.max_pending_alignments),
            moves: PendingMoves::new(config.max_pending_moves),
            listeners: Vec::new(),
            viewport: None,
            smooth_scrolling: false,
            realign_on_settle: false,
            announced: None,
            config,
        })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect at the next layout pass.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), LayoutError> {
        let span_count = NonZeroUsize::new(config.span_count).ok_or(SpanError::ZeroSpanCount)?;
        self.layout.set_span_count(span_count);
        if self.focus_metrics.span_count() != span_count.get() {
            self.focus_metrics.set_span_count(span_count);
            self.focus.invalidate();
        }
        self.layout.set_orientation(config.orientation);
        self.layout
            .set_alignment(config.parent_alignment, config.child_alignment);
        self.layout
            .set_look_ahead(config.look_ahead_start, config.look_ahead_end);
        self.layout.set_search_reach(config.search_reach);
        let reversed = self.viewport.is_some_and(|viewport| viewport.reversed);
        self.focus.set_config(focus_config(&config, reversed));
        self.alignments.set_capacity(config.max_pending_alignments);
        self.moves.set_capacity(config.max_pending_moves);
        self.config = config;
        Ok(())
    }

    /// The layout engine.
    #[must_use]
    pub fn layout(&self) -> &PivotLayoutEngine<V> {
        &self.layout
    }

    /// The focus search engine, including its remembered columns.
    #[must_use]
    pub fn focus(&self) -> &FocusSearchEngine {
        &self.focus
    }

    /// Selection state.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selected position, if any.
    #[must_use]
    pub fn selected_position(&self) -> Option<usize> {
        self.selection.position()
    }

    /// Selected sub-position.
    #[must_use]
    pub fn selected_sub_position(&self) -> usize {
        self.selection.sub_position()
    }

    /// In-flight alignment scrolls.
    #[must_use]
    pub fn pending_alignments(&self) -> &PendingAlignmentQueue {
        &self.alignments
    }

    /// Moves waiting for their target to come into view.
    #[must_use]
    pub fn pending_moves(&self) -> PendingMoves {
        self.moves
    }

    /// Returns `true` while an animation requested by the controller is running.
    #[must_use]
    pub fn is_smooth_scrolling(&self) -> bool {
        self.smooth_scrolling
    }

    /// Laid-out rows, head first.
    pub fn rows(&self) -> impl Iterator<Item = &LaidOutRow> + '_ {
        self.layout.rows()
    }

    /// Positions of the rows that intersect the viewport.
    #[must_use]
    pub fn visible_positions(&self) -> Range<usize> {
        self.layout.visible_positions()
    }

    /// Keyline in visual coordinates along the scroll axis.
    #[must_use]
    pub fn keyline(&self) -> f64 {
        self.layout.keyline()
    }

    /// Current scroll limits.
    #[must_use]
    pub fn scroll_limits(&self) -> ScrollLimits {
        self.layout.scroll_limits()
    }

    /// Registers a selection listener.
    pub fn add_listener(&mut self, listener: Box<dyn SelectionListener>) {
        self.listeners.push(listener);
    }

    /// Removes every selection listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Snapshot of the selection for persistence.
    #[must_use]
    pub fn save_state(&self) -> SavedState {
        self.selection.save()
    }

    /// Restores a snapshot taken with [`GridController::save_state`].
    ///
    /// The restored position is clamped and aligned at the next layout pass.
    pub fn restore_state(&mut self, state: SavedState) {
        match state.selected_position {
            Some(position) => self.selection.select(position, 0),
            None => self.selection.clear(),
        }
        self.layout.invalidate();
    }

    /// `count` items were inserted at `start`.
    pub fn on_items_added(&mut self, start: usize, count: usize) {
        self.selection.on_items_added(start, count);
        self.invalidate_structure();
    }

    /// `count` items starting at `start` were removed.
    pub fn on_items_removed(&mut self, start: usize, count: usize) {
        self.selection.on_items_removed(start, count);
        self.invalidate_structure();
    }

    /// `count` items moved from `from` to `to`.
    pub fn on_items_moved(&mut self, from: usize, to: usize, count: usize) {
        self.selection.on_items_moved(from, to, count);
        self.invalidate_structure();
    }

    /// The collection changed in ways not described by the other mutation calls, including
    /// span size changes.
    pub fn on_items_changed(&mut self) {
        self.invalidate_structure();
    }

    fn invalidate_structure(&mut self) {
        self.layout.invalidate();
        self.focus_metrics.invalidate();
        self.focus.invalidate();
        self.moves.clear();
    }

    fn announce(&mut self) -> bool {
        let Some(position) = self.selection.position() else {
            return false;
        };
        let key = (position, self.selection.sub_position());
        if self.announced == Some(key) {
            return false;
        }
        self.announced = Some(key);
        log::debug!("selected {position} (sub-position {})", key.1);
        for listener in &mut self.listeners {
            listener.on_selected(key.0, key.1);
        }
        true
    }

    fn announce_aligned(&mut self) {
        let Some(position) = self.selection.position() else {
            return;
        };
        let sub_position = self.selection.sub_position();
        for listener in &mut self.listeners {
            listener.on_selected_and_aligned(position, sub_position);
        }
    }

    fn input_scroll(&self) -> ScrollRequest {
        match self.config.scroll_mode {
            ScrollMode::Immediate => ScrollRequest::Immediate,
            ScrollMode::Smooth | ScrollMode::SmoothUntilSurfaced => ScrollRequest::Throttled,
        }
    }
}

impl<V> GridController<V> {
    /// Lays out the grid for `viewport` around the selection.
    ///
    /// Structural changes reported since the previous pass are folded into the selection
    /// first. A non-empty collection always ends up with a selection.
    pub fn on_layout_pass<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        viewport: LayoutViewport,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        if self
            .viewport
            .is_none_or(|current| current.reversed != viewport.reversed)
        {
            self.focus
                .set_config(focus_config(&self.config, viewport.reversed));
        }
        self.viewport = Some(viewport);
        self.layout.set_viewport(viewport);

        let count = items.item_count();
        let position = match self.selection.reconcile(count) {
            Some(position) => position,
            None if count > 0 => {
                self.selection.select(0, 0);
                0
            }
            None => {
                self.announced = None;
                return self.layout.layout(host, items, 0, 0);
            }
        };
        self.layout
            .layout(host, items, position, self.selection.sub_position())?;
        self.clamp_sub_position(host, position);
        if self.announce() && self.is_aligned(host) {
            self.announce_aligned();
        }
        Ok(())
    }

    /// Handles a directional key press.
    ///
    /// Returns the newly selected position, which equals the current one when only the
    /// sub-position moved, or `None` if the input had no effect.
    pub fn on_directional_input<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        direction: FocusDirection,
    ) -> Result<Option<usize>, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        if self.viewport.is_none() {
            return Ok(None);
        }
        let Some(mut position) = self.selection.position() else {
            return Ok(None);
        };
        if position >= items.item_count()
            || self.selection.pending_shift() != 0
            || self.selection.is_frozen()
            || self.layout.is_stale()
        {
            log::warn!("selection {position} is out of date, re-running layout before searching");
            self.relayout(host, items)?;
            let Some(reconciled) = self.selection.position() else {
                return Ok(None);
            };
            position = reconciled;
        } else if !self.layout.is_laid_out(position) {
            log::debug!("selection {position} was scrolled away, re-running layout");
            self.relayout(host, items)?;
        }

        let reversed = self.viewport.is_some_and(|viewport| viewport.reversed);
        let movement = Movement::resolve(direction, self.config.orientation, reversed);
        if self.config.scroll_mode == ScrollMode::SmoothUntilSurfaced
            && self.smooth_scrolling
            && self.layout.metrics().is_single_span()
            && !matches!(movement, Movement::NextColumn | Movement::PreviousColumn)
        {
            if !self.moves.push(movement.is_forward()) {
                log::debug!("pending moves at capacity, input dropped");
            }
            return Ok(None);
        }

        if movement.is_row() {
            let subs = self.layout.sub_position_count(host, position);
            let sub = self.selection.sub_position();
            let next = if movement.is_forward() {
                (sub + 1 < subs).then_some(sub + 1)
            } else {
                sub.checked_sub(1)
            };
            if let Some(next) = next {
                let request = self.input_scroll();
                let moved = self.apply_selection(host, items, position, next, request, false)?;
                return Ok(moved.then_some(position));
            }
        }

        let Some(target) = self.search(host, items, position, direction)? else {
            return Ok(None);
        };
        // Entering an item backwards lands on its last sub-position.
        let sub = if movement.is_row() && !movement.is_forward() {
            self.layout
                .sub_position_count(host, target)
                .saturating_sub(1)
        } else {
            0
        };
        let request = self.input_scroll();
        let moved = self.apply_selection(host, items, target, sub, request, true)?;
        Ok(moved.then_some(target))
    }

    /// The host moved focus to `position`, for example after a touch. `element` is the focused
    /// element inside the item, if known; it selects the matching sub-position.
    pub fn on_child_focused<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        position: usize,
        element: Option<ElementId>,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        if position >= items.item_count() || !self.layout.is_laid_out(position) {
            log::warn!("focus reported for {position}, which is not laid out");
            return Ok(());
        }
        let sub = element
            .and_then(|element| {
                let view = self.layout.view(position)?;
                host.sub_position_alignments(view)
                    .iter()
                    .position(|sub| sub.element == Some(element))
            })
            .unwrap_or(0);
        if self.selection.position() == Some(position) && self.selection.sub_position() == sub {
            return Ok(());
        }
        let request = match self.config.scroll_mode {
            ScrollMode::Immediate => ScrollRequest::Immediate,
            ScrollMode::Smooth | ScrollMode::SmoothUntilSurfaced => ScrollRequest::Smooth,
        };
        self.apply_selection(host, items, position, sub, request, false)?;
        Ok(())
    }

    /// Selects `position` at `sub_position`, both clamped to what exists.
    ///
    /// Positions outside the laid-out window are reached by laying out around them instead of
    /// scrolling. Before the first layout pass the selection is only recorded.
    pub fn set_selected_position<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        position: usize,
        sub_position: usize,
        smooth: bool,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let count = items.item_count();
        if count == 0 {
            return Ok(());
        }
        let position = position.min(count - 1);
        if self.viewport.is_none() || self.layout.is_stale() {
            self.selection.select(position, sub_position);
            return Ok(());
        }
        if !self.layout.is_laid_out(position) {
            log::debug!("jumping to {position}");
            self.selection.select(position, sub_position);
            self.layout.layout(host, items, position, sub_position)?;
            self.clamp_sub_position(host, position);
            if let Some(view) = self.layout.view(position) {
                host.request_focus(view);
            }
            if self.announce() && self.is_aligned(host) {
                self.announce_aligned();
            }
            return Ok(());
        }
        let subs = self.layout.sub_position_count(host, position);
        let sub_position = sub_position.min(subs.saturating_sub(1));
        let request = if smooth {
            ScrollRequest::Smooth
        } else {
            ScrollRequest::Immediate
        };
        self.apply_selection(host, items, position, sub_position, request, true)?;
        Ok(())
    }

    /// Moves the selection to `sub_position` of the selected item.
    pub fn set_selected_sub_position<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        sub_position: usize,
        smooth: bool,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        match self.selection.position() {
            Some(position) => {
                self.set_selected_position(host, items, position, sub_position, smooth)
            }
            None => Ok(()),
        }
    }

    /// Scrolls by `delta` along the scroll axis, clamped to the scroll limits.
    ///
    /// Hosts call this for user scrolls and for every frame of an animation. Returns the
    /// applied delta.
    pub fn scroll_by<H, I>(&mut self, host: &mut H, items: &I, delta: f64) -> Result<f64, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        if self.layout.is_stale() {
            log::debug!("scroll of {delta} ignored until the next layout pass");
            return Ok(0.0);
        }
        let applied = self.layout.scroll_by(host, items, delta)?;
        if self.smooth_scrolling {
            self.alignments.consume(applied);
            self.surface_pending_moves(host, items)?;
        }
        Ok(applied)
    }

    /// The animation started through [`LayoutHost::smooth_scroll_by`] stopped.
    pub fn on_scroll_settled<H, I>(&mut self, host: &mut H, items: &I) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        self.smooth_scrolling = false;
        self.alignments.clear();

        // Moves whose target never surfaced are applied one at a time, each with its own
        // animation.
        while !self.smooth_scrolling
            && let Some(forward) = self.moves.take()
        {
            let Some(position) = self.selection.position() else {
                self.moves.clear();
                break;
            };
            let direction = if forward {
                FocusDirection::Next
            } else {
                FocusDirection::Previous
            };
            match self.search(host, items, position, direction)? {
                Some(target) => {
                    self.apply_selection(host, items, target, 0, ScrollRequest::Smooth, true)?;
                }
                None => self.moves.clear(),
            }
        }
        if self.smooth_scrolling {
            return Ok(());
        }

        if self.realign_on_settle {
            self.realign_on_settle = false;
            if let Some(position) = self.selection.position()
                && let Some(offset) =
                    self.layout
                        .alignment_offset(host, position, self.selection.sub_position())
                && offset.abs() > ALIGNED_EPSILON
            {
                self.smooth_scrolling = true;
                host.smooth_scroll_by(offset);
                return Ok(());
            }
        }
        if self.is_aligned(host) {
            self.announce_aligned();
        }
        Ok(())
    }

    /// Recycles every view. The next layout pass starts from scratch.
    pub fn detach<H: LayoutHost<View = V>>(&mut self, host: &mut H) {
        self.layout.recycle_all(host);
        self.layout.invalidate();
        self.alignments.clear();
        self.moves.clear();
        self.smooth_scrolling = false;
    }

    fn relayout<H, I>(&mut self, host: &mut H, items: &I) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        match self.viewport {
            Some(viewport) => self.on_layout_pass(host, items, viewport),
            None => Ok(()),
        }
    }

    fn search<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        position: usize,
        direction: FocusDirection,
    ) -> Result<Option<usize>, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let mut candidates = LayoutCandidates {
            layout: &mut self.layout,
            host: &mut *host,
            items,
            error: None,
        };
        let target = self.focus.find_target(
            &mut self.focus_metrics,
            items,
            &mut candidates,
            position,
            direction,
        );
        if let Some(error) = candidates.error {
            return Err(error);
        }
        let target = target?;
        // Rows laid out only to answer the search go back to the host.
        self.layout
            .recycle_outside(host, Some(target.unwrap_or(position)));
        Ok(target)
    }

    /// Selects `position` and scrolls it into alignment as `request` says.
    ///
    /// Returns `false` if the input was dropped by the pending alignment queue.
    fn apply_selection<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        position: usize,
        sub_position: usize,
        request: ScrollRequest,
        focus: bool,
    ) -> Result<bool, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        self.layout.ensure_laid_out(host, items, position)?;
        let offset = self
            .layout
            .alignment_offset(host, position, sub_position)
            .unwrap_or(0.0);
        let aligned = offset.abs() <= ALIGNED_EPSILON;

        if request == ScrollRequest::Immediate {
            self.select(host, position, sub_position, focus);
            if !aligned {
                self.layout.scroll_by(host, items, offset)?;
            }
            self.announce_aligned();
            return Ok(true);
        }
        if aligned {
            self.select(host, position, sub_position, focus);
            if !self.smooth_scrolling {
                self.announce_aligned();
            }
            return Ok(true);
        }
        if request == ScrollRequest::Throttled && !self.alignments.try_push(offset) {
            match self.config.alignment_overflow {
                AlignmentOverflow::DropInput => {
                    log::debug!("input toward {position} dropped, alignment queue is full");
                    self.layout.recycle_outside(host, self.selection.position());
                    return Ok(false);
                }
                AlignmentOverflow::FocusWithoutScroll => {
                    self.select(host, position, sub_position, focus);
                    self.realign_on_settle = true;
                    return Ok(true);
                }
            }
        }
        self.select(host, position, sub_position, focus);
        self.realign_on_settle = false;
        self.smooth_scrolling = true;
        host.smooth_scroll_by(offset);
        Ok(true)
    }

    fn select<H: LayoutHost<View = V>>(
        &mut self,
        host: &mut H,
        position: usize,
        sub_position: usize,
        focus: bool,
    ) {
        self.selection.select(position, sub_position);
        if focus && let Some(view) = self.layout.view(position) {
            host.request_focus(view);
        }
        self.announce();
    }

    fn surface_pending_moves<H, I>(&mut self, host: &mut H, items: &I) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        while !self.moves.is_empty() {
            let Some(position) = self.selection.position() else {
                self.moves.clear();
                break;
            };
            let direction = if self.moves.count() > 0 {
                FocusDirection::Next
            } else {
                FocusDirection::Previous
            };
            let Some(target) = self.search(host, items, position, direction)? else {
                self.moves.clear();
                break;
            };
            if !self.layout.is_visible(target) {
                break;
            }
            self.moves.take();
            let offset = self.layout.alignment_offset(host, target, 0).unwrap_or(0.0);
            log::trace!("pending move surfaced at {target}");
            self.select(host, target, 0, true);
            if offset.abs() > ALIGNED_EPSILON {
                host.smooth_scroll_by(offset);
            }
        }
        Ok(())
    }

    fn clamp_sub_position<H: LayoutHost<View = V>>(&mut self, host: &H, position: usize) {
        let subs = self.layout.sub_position_count(host, position);
        let sub = self.selection.sub_position();
        if sub >= subs.max(1) {
            self.selection.set_sub_position(subs.saturating_sub(1));
        }
    }

    fn is_aligned<H: LayoutHost<View = V>>(&self, host: &H) -> bool {
        self.selection.position().is_some_and(|position| {
            self.layout
                .alignment_offset(host, position, self.selection.sub_position())
                .is_some_and(|offset| offset.abs() <= ALIGNED_EPSILON)
        })
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use keyline_align::{ElementId, ParentAlignment, SubPositionAlignment};
    use keyline_focus::FocusDirection;
    use keyline_span::{FnItems, SpanError, UniformItems};
    use kurbo::{Rect, Size};

    use super::GridController;
    use crate::testing::TestHost;
    use crate::{AlignmentOverflow, GridConfig, LayoutError, LayoutViewport, ScrollMode};

    fn viewport() -> LayoutViewport {
        LayoutViewport::new(Size::new(400.0, 1000.0))
    }

    #[test]
    fn zero_spans_are_rejected() {
        let config = GridConfig {
            span_count: 0,
            ..GridConfig::default()
        };
        let error = GridController::<usize>::new(config).unwrap_err();
        assert_eq!(error, LayoutError::Span(SpanError::ZeroSpanCount));
    }

    #[test]
    fn first_layout_selects_the_first_position() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(50);
        let mut grid = GridController::new(GridConfig::default()).unwrap();
        grid.on_layout_pass(&mut host, &items, viewport()).unwrap();
        assert_eq!(grid.selected_position(), Some(0));

        let empty = UniformItems::new(0);
        grid.on_items_removed(0, 50);
        grid.on_layout_pass(&mut host, &empty, viewport()).unwrap();
        assert_eq!(grid.selected_position(), None);
        assert_eq!(host.attached(), 0);
    }

    #[test]
    fn immediate_moves_align_the_target() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(50);
        let mut grid = GridController::new(GridConfig::default()).unwrap();
        grid.on_layout_pass(&mut host, &items, viewport()).unwrap();

        for _ in 0..8 {
            grid.on_directional_input(&mut host, &items, FocusDirection::Down)
                .unwrap();
        }
        assert_eq!(grid.selected_position(), Some(8));
        assert_eq!(host.focused, Some(8));
        // Item 8 is centered on the keyline at 500.
        assert_eq!(grid.layout().bounds(8), Some(Rect::new(0.0, 450.0, 400.0, 550.0)));
        assert_eq!(host.placed.get(&8), Some(&Rect::new(0.0, 450.0, 400.0, 550.0)));
    }

    #[test]
    fn sub_positions_are_visited_before_leaving_an_item() {
        let mut host = TestHost::new(100.0);
        host.sub_positions.insert(
            1,
            [
                SubPositionAlignment::element_start(ElementId(1)),
                SubPositionAlignment::element_start(ElementId(2)),
            ]
            .into_iter()
            .collect(),
        );
        host.elements
            .insert((1, ElementId(2)), Rect::new(0.0, 60.0, 400.0, 80.0));
        let items = UniformItems::new(10);
        let mut grid = GridController::new(GridConfig::default()).unwrap();
        grid.on_layout_pass(&mut host, &items, viewport()).unwrap();

        let down = FocusDirection::Down;
        assert_eq!(grid.on_directional_input(&mut host, &items, down).unwrap(), Some(1));
        assert_eq!(grid.selected_sub_position(), 0);
        assert_eq!(grid.on_directional_input(&mut host, &items, down).unwrap(), Some(1));
        assert_eq!(grid.selected_sub_position(), 1);
        assert_eq!(grid.on_directional_input(&mut host, &items, down).unwrap(), Some(2));

        // Coming back enters item 1 at its last sub-position.
        let up = FocusDirection::Up;
        assert_eq!(grid.on_directional_input(&mut host, &items, up).unwrap(), Some(1));
        assert_eq!(grid.selected_sub_position(), 1);
    }

    #[test]
    fn full_queue_focuses_without_scrolling_when_asked() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(100);
        let config = GridConfig {
            scroll_mode: ScrollMode::Smooth,
            max_pending_alignments: NonZeroUsize::new(1),
            alignment_overflow: AlignmentOverflow::FocusWithoutScroll,
            ..GridConfig::default()
        };
        let mut grid = GridController::new(config).unwrap();
        grid.on_layout_pass(&mut host, &items, viewport()).unwrap();
        grid.set_selected_position(&mut host, &items, 50, 0, false)
            .unwrap();
        host.smooth.clear();

        let down = FocusDirection::Down;
        grid.on_directional_input(&mut host, &items, down).unwrap();
        grid.on_directional_input(&mut host, &items, down).unwrap();
        assert_eq!(grid.selected_position(), Some(52));
        assert_eq!(host.smooth, [100.0]);

        // Running the animation leaves 52 one row short; settling realigns it.
        assert_eq!(grid.scroll_by(&mut host, &items, 100.0).unwrap(), 100.0);
        grid.on_scroll_settled(&mut host, &items).unwrap();
        assert_eq!(host.smooth, [100.0, 100.0]);
    }

    #[test]
    fn resizing_realigns_the_selection_to_the_new_keyline() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(100);
        let mut grid = GridController::new(GridConfig::default()).unwrap();
        grid.on_layout_pass(&mut host, &items, viewport()).unwrap();
        grid.set_selected_position(&mut host, &items, 50, 0, false)
            .unwrap();
        assert_eq!(grid.layout().bounds(50), Some(Rect::new(0.0, 450.0, 400.0, 550.0)));

        let small = LayoutViewport::new(Size::new(400.0, 400.0));
        grid.on_layout_pass(&mut host, &items, small).unwrap();
        assert_eq!(grid.keyline(), 200.0);
        assert_eq!(grid.layout().bounds(50), Some(Rect::new(0.0, 150.0, 400.0, 250.0)));
        assert_eq!(host.placed.get(&50), Some(&Rect::new(0.0, 150.0, 400.0, 250.0)));
        assert!(grid.visible_positions().contains(&50));

        // A new keyline fraction takes effect at the next pass too.
        let config = GridConfig {
            parent_alignment: ParentAlignment {
                fraction: 0.25,
                ..ParentAlignment::default()
            },
            ..GridConfig::default()
        };
        grid.set_config(config).unwrap();
        grid.on_layout_pass(&mut host, &items, small).unwrap();
        assert_eq!(grid.keyline(), 100.0);
        assert_eq!(grid.layout().bounds(50), Some(Rect::new(0.0, 50.0, 400.0, 150.0)));
    }

    #[test]
    fn fruitless_searches_leave_only_the_window_attached() {
        let mut host = TestHost::new(100.0);
        host.unfocusable.extend(1..5000);
        let items = UniformItems::new(5000);
        let mut grid = GridController::new(GridConfig::default()).unwrap();
        grid.on_layout_pass(&mut host, &items, viewport()).unwrap();
        assert_eq!(host.attached(), 10);

        let next = FocusDirection::Next;
        assert_eq!(grid.on_directional_input(&mut host, &items, next).unwrap(), None);
        assert_eq!(grid.selected_position(), Some(0));
        // The row starting exactly at the end of the viewport is kept.
        assert_eq!(grid.layout().laid_out_positions(), 0..11);
        assert_eq!(host.attached(), 11);
    }

    #[test]
    fn out_of_range_spans_surface_as_errors() {
        let mut host = TestHost::new(100.0);
        let items = FnItems::new(10, |p| if p == 3 { 5 } else { 1 });
        let config = GridConfig {
            span_count: 2,
            ..GridConfig::default()
        };
        let mut grid = GridController::new(config).unwrap();
        let error = grid
            .on_layout_pass(&mut host, &items, viewport())
            .unwrap_err();
        assert!(matches!(
            error,
            LayoutError::Span(SpanError::SpanSizeExceedsCount { position: 3, .. })
        ));
    }
}
