// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pivot-anchored incremental layout.

use alloc::collections::VecDeque;
use core::fmt;
use core::num::NonZeroUsize;
use core::ops::Range;

use hashbrown::HashMap;
use keyline_align::{
    AxisViewport, Boundary, ChildAlignment, ItemExtent, LayoutAlignment, ParentAlignment,
    ScrollLimiter, ScrollLimits,
};
use keyline_focus::Orientation;
use keyline_span::{ItemSource, PackDirection, SpanMetrics, SpanRow, pack_row};
use kurbo::{Insets, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::{LayoutError, LayoutHost, LayoutViewport};

/// Upper bound on alignment corrections within one layout pass.
const MAX_CORRECTIONS: usize = 4;

/// Offsets at or below this magnitude are treated as aligned.
pub(crate) const ALIGNED_EPSILON: f64 = 1e-6;

/// Default reach of a focus search past the look-ahead, in viewport extents.
pub(crate) const DEFAULT_SEARCH_REACH: f64 = 2.0;

type Scrap<V> = HashMap<usize, V>;

/// Geometry of one laid-out row, in flow space.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutRow {
    /// Span group index.
    pub group: usize,
    /// Positions in the row.
    pub positions: Range<usize>,
    /// Start of the row along the scroll axis.
    pub start: f64,
    /// End of the row along the scroll axis.
    pub end: f64,
}

struct Cell<V> {
    position: usize,
    extent: ItemExtent,
    bounds: Rect,
    view: V,
}

struct Row<V> {
    info: LaidOutRow,
    cells: SmallVec<[Cell<V>; 4]>,
}

struct Measured<V> {
    position: usize,
    view: V,
    insets: AxisInsets,
    cross: (f64, f64),
}

#[derive(Copy, Clone, Default)]
struct AxisInsets {
    start: f64,
    end: f64,
    cross_before: f64,
    cross_after: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    PivotRow,
    FillTowardStart,
    FillTowardEnd,
    Align,
    Done,
}

#[derive(Copy, Clone)]
enum RowEdge {
    Start(f64),
    End(f64),
}

/// Lays out rows outward from a pivot item and keeps the laid-out window filled while
/// scrolling.
///
/// The window is a contiguous run of rows, from a head row to a tail row, that covers the
/// viewport plus the look-ahead on both sides. Rows are values: filling pushes new rows at
/// either end and recycling pops them, so the head and tail are always whatever sits at the
/// ends of the queue.
///
/// All row geometry is kept in flow space (see [`keyline_align`]); views are handed to the
/// host in visual coordinates.
pub struct PivotLayoutEngine<V> {
    metrics: SpanMetrics,
    orientation: Orientation,
    alignment: LayoutAlignment,
    limiter: ScrollLimiter,
    viewport: LayoutViewport,
    axis: AxisViewport,
    look_ahead_start: f64,
    look_ahead_end: f64,
    search_reach: f64,
    rows: VecDeque<Row<V>>,
    stale: bool,
    // The keyline, viewport or alignment changed since the last pass.
    realign: bool,
}

impl<V> fmt::Debug for PivotLayoutEngine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PivotLayoutEngine")
            .field("orientation", &self.orientation)
            .field("viewport", &self.viewport)
            .field("limits", &self.limiter.limits())
            .field("rows", &self.rows.len())
            .field("stale", &self.stale)
            .field("realign", &self.realign)
            .finish_non_exhaustive()
    }
}

impl<V> PivotLayoutEngine<V> {
    pub(crate) fn new(
        span_count: NonZeroUsize,
        orientation: Orientation,
        parent: ParentAlignment,
        child: ChildAlignment,
    ) -> Self {
        Self {
            metrics: SpanMetrics::new(span_count),
            orientation,
            alignment: LayoutAlignment::new(parent, child),
            limiter: ScrollLimiter::new(),
            viewport: LayoutViewport::default(),
            axis: AxisViewport::default(),
            look_ahead_start: 0.0,
            look_ahead_end: 0.0,
            search_reach: DEFAULT_SEARCH_REACH,
            rows: VecDeque::new(),
            stale: true,
            realign: false,
        }
    }

    /// Span lookups used by the layout.
    #[must_use]
    pub fn metrics(&self) -> &SpanMetrics {
        &self.metrics
    }

    /// Keyline and anchor math.
    #[must_use]
    pub fn alignment(&self) -> &LayoutAlignment {
        &self.alignment
    }

    /// Keyline in visual coordinates along the scroll axis.
    #[must_use]
    pub fn keyline(&self) -> f64 {
        self.alignment.visual_keyline()
    }

    /// Scroll limits as of the last layout pass or scroll.
    #[must_use]
    pub fn scroll_limits(&self) -> ScrollLimits {
        self.limiter.limits()
    }

    /// Laid-out rows, head first.
    pub fn rows(&self) -> impl Iterator<Item = &LaidOutRow> + '_ {
        self.rows.iter().map(|row| &row.info)
    }

    /// Positions that are laid out, including the look-ahead.
    #[must_use]
    pub fn laid_out_positions(&self) -> Range<usize> {
        match (self.rows.front(), self.rows.back()) {
            (Some(head), Some(tail)) => head.info.positions.start..tail.info.positions.end,
            _ => 0..0,
        }
    }

    /// Positions of the rows that intersect the viewport.
    #[must_use]
    pub fn visible_positions(&self) -> Range<usize> {
        let extent = self.axis.extent;
        let mut visible = self
            .rows
            .iter()
            .filter(|row| row.info.end > 0.0 && row.info.start < extent);
        let Some(first) = visible.next() else {
            return 0..0;
        };
        let end = visible.last().unwrap_or(first).info.positions.end;
        first.info.positions.start..end
    }

    /// Returns `true` if `position` is laid out.
    #[must_use]
    pub fn is_laid_out(&self, position: usize) -> bool {
        self.cell(position).is_some()
    }

    /// Returns `true` if `position` is laid out and intersects the viewport.
    #[must_use]
    pub fn is_visible(&self, position: usize) -> bool {
        self.cell(position)
            .is_some_and(|cell| cell.extent.end > 0.0 && cell.extent.start < self.axis.extent)
    }

    /// Visual bounds of `position`, if laid out.
    #[must_use]
    pub fn bounds(&self, position: usize) -> Option<Rect> {
        self.cell(position).map(|cell| cell.bounds)
    }

    /// Flow-space extent of `position`, if laid out.
    #[must_use]
    pub fn item_extent(&self, position: usize) -> Option<ItemExtent> {
        self.cell(position).map(|cell| cell.extent)
    }

    /// View bound to `position`, if laid out.
    #[must_use]
    pub fn view(&self, position: usize) -> Option<&V> {
        self.cell(position).map(|cell| &cell.view)
    }

    fn cell(&self, position: usize) -> Option<&Cell<V>> {
        let index = self
            .rows
            .partition_point(|row| row.info.positions.end <= position);
        let row = self.rows.get(index)?;
        if !row.info.positions.contains(&position) {
            return None;
        }
        row.cells.get(position - row.info.positions.start)
    }

    /// Returns `true` if attached views may be bound to outdated positions.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Drops span caches and limits, and discards every view at the next layout pass.
    pub(crate) fn invalidate(&mut self) {
        self.metrics.invalidate();
        self.limiter.invalidate();
        self.stale = true;
    }

    pub(crate) fn set_span_count(&mut self, span_count: NonZeroUsize) {
        if span_count.get() != self.metrics.span_count() {
            self.metrics.set_span_count(span_count);
            self.invalidate();
        }
    }

    pub(crate) fn set_orientation(&mut self, orientation: Orientation) {
        if orientation != self.orientation {
            self.orientation = orientation;
            self.set_viewport(self.viewport);
            self.invalidate();
        }
    }

    pub(crate) fn set_alignment(&mut self, parent: ParentAlignment, child: ChildAlignment) {
        if *self.alignment.parent() != parent || *self.alignment.child() != child {
            self.alignment.set_parent(parent);
            self.alignment.set_child(child);
            self.realign = true;
        }
    }

    pub(crate) fn set_look_ahead(&mut self, start: f64, end: f64) {
        self.look_ahead_start = start.max(0.0);
        self.look_ahead_end = end.max(0.0);
    }

    pub(crate) fn set_search_reach(&mut self, viewports: f64) {
        self.search_reach = if viewports.is_finite() {
            viewports.max(0.0)
        } else {
            DEFAULT_SEARCH_REACH
        };
    }

    pub(crate) fn set_viewport(&mut self, viewport: LayoutViewport) {
        let resized = viewport != self.viewport;
        self.viewport = viewport;
        self.axis = viewport.axis(self.orientation);
        let moved = self.alignment.set_viewport(self.axis);
        if moved {
            log::trace!("keyline moved to {}", self.alignment.keyline());
        }
        self.realign |= moved || resized;
    }

    /// Hands every attached view back to the host.
    pub(crate) fn recycle_all<H: LayoutHost<View = V>>(&mut self, host: &mut H) {
        for row in self.rows.drain(..) {
            for cell in row.cells {
                host.recycle(cell.view);
            }
        }
    }

    /// Lays out the window around `pivot`.
    ///
    /// If the pivot's row survives from the previous pass and neither the viewport nor the
    /// alignment changed since, the row keeps its place and only scroll limits are enforced.
    /// Otherwise the pivot is aligned to the keyline.
    pub(crate) fn layout<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        pivot: usize,
        sub_position: usize,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let count = items.item_count();
        if count == 0 {
            self.recycle_all(host);
            self.limiter.invalidate();
            self.stale = false;
            log::debug!("layout pass: empty collection");
            return Ok(());
        }
        let pivot = pivot.min(count - 1);
        let kept_start = if self.stale || self.realign {
            None
        } else {
            self.row_containing(pivot).map(|row| row.info.start)
        };
        self.realign = false;

        let mut scrap = Scrap::new();
        for row in self.rows.drain(..) {
            for cell in row.cells {
                if self.stale {
                    host.recycle(cell.view);
                } else {
                    scrap.insert(cell.position, cell.view);
                }
            }
        }
        self.stale = false;

        let result = self.run_phases(host, items, &mut scrap, pivot, sub_position, kept_start);
        for (_, view) in scrap.drain() {
            host.recycle(view);
        }
        if result.is_err() {
            self.recycle_all(host);
            self.limiter.invalidate();
            self.stale = true;
        }
        result
    }

    fn run_phases<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        scrap: &mut Scrap<V>,
        pivot: usize,
        sub_position: usize,
        kept_start: Option<f64>,
    ) -> Result<(), LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let count = items.item_count();
        let mut phase = Phase::PivotRow;
        while phase != Phase::Done {
            log::trace!("layout phase {phase:?}");
            phase = match phase {
                Phase::PivotRow => {
                    let first = self.metrics.group_range(items, pivot)?.start;
                    let span_count = self.metrics.span_count();
                    let packed = pack_row(
                        &mut self.metrics,
                        items,
                        first,
                        PackDirection::Forward,
                        span_count,
                    )?;
                    let edge = RowEdge::Start(kept_start.unwrap_or(0.0));
                    let row =
                        self.build_row(host, items, scrap, packed, PackDirection::Forward, edge)?;
                    self.rows.push_back(row);
                    Phase::FillTowardStart
                }
                Phase::FillTowardStart => {
                    self.fill_toward_start(host, items, scrap, 0.0)?;
                    Phase::FillTowardEnd
                }
                Phase::FillTowardEnd => {
                    self.fill_toward_end(host, items, scrap, 0.0)?;
                    Phase::Align
                }
                Phase::Align => {
                    for _ in 0..MAX_CORRECTIONS {
                        self.update_limits(count);
                        let delta = match kept_start {
                            Some(_) => self.limiter.clamp(0.0),
                            None => self
                                .alignment_offset(host, pivot, sub_position)
                                .unwrap_or(0.0),
                        };
                        if delta.abs() <= ALIGNED_EPSILON {
                            break;
                        }
                        self.shift(-delta);
                        self.fill_toward_start(host, items, scrap, 0.0)?;
                        self.fill_toward_end(host, items, scrap, 0.0)?;
                        self.recycle_outside(host, Some(pivot));
                    }
                    self.update_limits(count);
                    Phase::Done
                }
                Phase::Done => Phase::Done,
            };
        }

        for row in &self.rows {
            for cell in &row.cells {
                host.place(&cell.view, cell.bounds);
            }
        }
        log::debug!(
            "layout pass: pivot {pivot}, {} rows, positions {:?}, limits {:?}",
            self.rows.len(),
            self.laid_out_positions(),
            self.limiter.limits()
        );
        Ok(())
    }

    /// Scrolls by `delta` along the scroll axis, clamped to the known limits.
    ///
    /// Returns the applied delta.
    pub(crate) fn scroll_by<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        delta: f64,
    ) -> Result<f64, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        if self.rows.is_empty() || delta == 0.0 || !delta.is_finite() {
            return Ok(0.0);
        }
        let count = items.item_count();
        let mut scrap = Scrap::new();

        // Lay out what the scroll is about to reveal so the limits on that side are current.
        if delta > 0.0 {
            let added = self.fill_toward_end(host, items, &mut scrap, delta)?;
            self.place_back(host, added);
        } else {
            let added = self.fill_toward_start(host, items, &mut scrap, -delta)?;
            self.place_front(host, added);
        }
        self.update_limits(count);

        let limits = self.limiter.limits();
        let applied = if delta > 0.0 {
            limits.end.map_or(delta, |end| delta.min(end)).max(0.0)
        } else {
            limits.start.map_or(delta, |start| delta.max(start)).min(0.0)
        };
        if applied != delta {
            log::trace!("scroll of {delta} clamped to {applied}");
        }
        if applied != 0.0 {
            self.shift(-applied);
            host.offset_views(self.visual_offset(-applied));
        }

        self.recycle_outside(host, None);
        let added = self.fill_toward_start(host, items, &mut scrap, 0.0)?;
        self.place_front(host, added);
        let added = self.fill_toward_end(host, items, &mut scrap, 0.0)?;
        self.place_back(host, added);
        self.update_limits(count);
        Ok(applied)
    }

    /// Extends the window until it includes `position`.
    ///
    /// The window grows at most the search reach past the look-ahead on either side. Returns
    /// `false` if nothing is laid out, `position` does not exist or it lies beyond that reach.
    pub(crate) fn ensure_laid_out<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        position: usize,
    ) -> Result<bool, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let count = items.item_count();
        if position >= count || self.rows.is_empty() {
            return Ok(false);
        }
        let span_count = self.metrics.span_count();
        let reach = self.axis.extent * self.search_reach;
        let (low, high) = (
            -self.look_ahead_start - reach,
            self.axis.extent + self.look_ahead_end + reach,
        );
        let mut scrap = Scrap::new();
        while let Some(tail) = self.rows.back() {
            let (next, end) = (tail.info.positions.end, tail.info.end);
            if next > position || next >= count || end >= high {
                break;
            }
            let packed = pack_row(
                &mut self.metrics,
                items,
                next,
                PackDirection::Forward,
                span_count,
            )?;
            if packed.is_empty() {
                break;
            }
            let row = self.build_row(
                host,
                items,
                &mut scrap,
                packed,
                PackDirection::Forward,
                RowEdge::Start(end),
            )?;
            self.rows.push_back(row);
            self.place_back(host, 1);
        }
        while let Some(head) = self.rows.front() {
            let (first, start) = (head.info.positions.start, head.info.start);
            if first <= position || first == 0 || start <= low {
                break;
            }
            let packed = pack_row(
                &mut self.metrics,
                items,
                first - 1,
                PackDirection::Backward,
                span_count,
            )?;
            if packed.is_empty() {
                break;
            }
            let row = self.build_row(
                host,
                items,
                &mut scrap,
                packed,
                PackDirection::Backward,
                RowEdge::End(start),
            )?;
            self.rows.push_front(row);
            self.place_front(host, 1);
        }
        if !scrap.is_empty() {
            log::warn!("{} views left over while extending the layout", scrap.len());
            for (_, view) in scrap.drain() {
                host.recycle(view);
            }
        }
        self.update_limits(count);
        let laid_out = self.is_laid_out(position);
        if !laid_out {
            log::trace!("{position} is beyond the search reach {low}..{high}");
        }
        Ok(laid_out)
    }

    /// Scroll delta that aligns `position` (at `sub_position`) to the keyline.
    ///
    /// `None` if `position` is not laid out.
    pub(crate) fn alignment_offset<H: LayoutHost<View = V>>(
        &self,
        host: &H,
        position: usize,
        sub_position: usize,
    ) -> Option<f64> {
        let cell = self.cell(position)?;
        let limits = self.limiter.limits();
        let subs = host.sub_position_alignments(&cell.view);
        if subs.is_empty() {
            let anchor = self.alignment.anchor(&cell.extent);
            return Some(self.alignment.scroll_offset(anchor, &limits));
        }
        let anchors: SmallVec<[f64; 4]> = subs
            .iter()
            .map(|sub| {
                let element = sub
                    .element
                    .and_then(|id| host.element_bounds(&cell.view, id))
                    .map(|local| self.element_span(cell, local));
                self.alignment.sub_anchor(&cell.extent, element, sub)
            })
            .collect();
        Some(
            self.alignment
                .sub_position_offset(&anchors, sub_position, &limits),
        )
    }

    /// Number of sub-positions of `position`; zero if it has none or is not laid out.
    pub(crate) fn sub_position_count<H: LayoutHost<View = V>>(
        &self,
        host: &H,
        position: usize,
    ) -> usize {
        self.cell(position)
            .map_or(0, |cell| host.sub_position_alignments(&cell.view).len())
    }

    fn row_containing(&self, position: usize) -> Option<&Row<V>> {
        self.rows
            .iter()
            .find(|row| row.info.positions.contains(&position))
    }

    fn fill_toward_start<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        scrap: &mut Scrap<V>,
        extra: f64,
    ) -> Result<usize, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let limit = -self.look_ahead_start - extra;
        let span_count = self.metrics.span_count();
        let mut added = 0;
        while let Some(head) = self.rows.front() {
            let (first, start) = (head.info.positions.start, head.info.start);
            if start <= limit || first == 0 {
                break;
            }
            let packed = pack_row(
                &mut self.metrics,
                items,
                first - 1,
                PackDirection::Backward,
                span_count,
            )?;
            if packed.is_empty() {
                break;
            }
            let row = self.build_row(
                host,
                items,
                scrap,
                packed,
                PackDirection::Backward,
                RowEdge::End(start),
            )?;
            self.rows.push_front(row);
            added += 1;
        }
        Ok(added)
    }

    fn fill_toward_end<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        scrap: &mut Scrap<V>,
        extra: f64,
    ) -> Result<usize, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        let limit = self.axis.extent + self.look_ahead_end + extra;
        let count = items.item_count();
        let span_count = self.metrics.span_count();
        let mut added = 0;
        while let Some(tail) = self.rows.back() {
            let (next, end) = (tail.info.positions.end, tail.info.end);
            if end >= limit || next >= count {
                break;
            }
            let packed = pack_row(
                &mut self.metrics,
                items,
                next,
                PackDirection::Forward,
                span_count,
            )?;
            if packed.is_empty() {
                break;
            }
            let row = self.build_row(
                host,
                items,
                scrap,
                packed,
                PackDirection::Forward,
                RowEdge::Start(end),
            )?;
            self.rows.push_back(row);
            added += 1;
        }
        Ok(added)
    }

    fn build_row<H, I>(
        &mut self,
        host: &mut H,
        items: &I,
        scrap: &mut Scrap<V>,
        packed: SpanRow,
        direction: PackDirection,
        edge: RowEdge,
    ) -> Result<Row<V>, LayoutError>
    where
        H: LayoutHost<View = V>,
        I: ItemSource + ?Sized,
    {
        // Resolve every span first so a configuration error never strands acquired views.
        let mut spans: SmallVec<[(usize, usize, usize); 4]> = SmallVec::new();
        for position in packed.positions.clone() {
            let info = self.metrics.span_info(items, position)?;
            spans.push((position, info.span_index, info.span_size));
        }

        let (cross_start, cross_extent) = self.viewport.cross(self.orientation);
        let span_width = cross_extent / self.metrics.span_count() as f64;
        let mut extent: f64 = 0.0;
        let mut measured: SmallVec<[Measured<V>; 4]> = SmallVec::new();
        for (position, span_index, span_size) in spans {
            let view = scrap
                .remove(&position)
                .unwrap_or_else(|| host.acquire_view(position, direction));
            let insets = self.axis_insets(host.insets(&view));
            let c0 = cross_start + span_index as f64 * span_width + insets.cross_before;
            let c1 = (cross_start + (span_index + span_size) as f64 * span_width
                - insets.cross_after)
                .max(c0);
            let size = host.measure(&view, self.constraints(c1 - c0));
            let main = match self.orientation {
                Orientation::Vertical => size.height,
                Orientation::Horizontal => size.width,
            };
            extent = extent.max(insets.start + main.max(0.0) + insets.end);
            measured.push(Measured {
                position,
                view,
                insets,
                cross: (c0, c1),
            });
        }

        let (start, end) = match edge {
            RowEdge::Start(start) => (start, start + extent),
            RowEdge::End(end) => (end - extent, end),
        };
        let cells = measured
            .into_iter()
            .map(|m| {
                // Shorter items are stretched to the row extent.
                let item = ItemExtent::new(start + m.insets.start, end - m.insets.end)
                    .with_insets(m.insets.start, m.insets.end);
                Cell {
                    position: m.position,
                    bounds: self.visual_rect(item.start, item.end, m.cross),
                    extent: item,
                    view: m.view,
                }
            })
            .collect();
        log::trace!(
            "row {} packed {:?} ({} spans) at {start}..{end}",
            packed.group,
            packed.positions,
            packed.spans_used
        );
        Ok(Row {
            info: LaidOutRow {
                group: packed.group,
                positions: packed.positions,
                start,
                end,
            },
            cells,
        })
    }

    fn place_front<H: LayoutHost<View = V>>(&self, host: &mut H, rows: usize) {
        for row in self.rows.iter().take(rows) {
            for cell in &row.cells {
                host.place(&cell.view, cell.bounds);
            }
        }
    }

    fn place_back<H: LayoutHost<View = V>>(&self, host: &mut H, rows: usize) {
        let skip = self.rows.len().saturating_sub(rows);
        for row in self.rows.iter().skip(skip) {
            for cell in &row.cells {
                host.place(&cell.view, cell.bounds);
            }
        }
    }

    /// Recycles rows outside the viewport and look-ahead, except the row holding `keep` and
    /// the rows between it and the viewport.
    pub(crate) fn recycle_outside<H: LayoutHost<View = V>>(
        &mut self,
        host: &mut H,
        keep: Option<usize>,
    ) {
        let low = -self.look_ahead_start;
        let high = self.axis.extent + self.look_ahead_end;
        let outside = |row: &Row<V>, beyond: bool| {
            beyond && keep.is_none_or(|keep| !row.info.positions.contains(&keep))
        };
        let mut recycled = 0;
        while self.rows.len() > 1
            && self
                .rows
                .front()
                .is_some_and(|row| outside(row, row.info.end < low))
        {
            if let Some(row) = self.rows.pop_front() {
                recycled += row.cells.len();
                row.cells.into_iter().for_each(|cell| host.recycle(cell.view));
            }
        }
        while self.rows.len() > 1
            && self
                .rows
                .back()
                .is_some_and(|row| outside(row, row.info.start > high))
        {
            if let Some(row) = self.rows.pop_back() {
                recycled += row.cells.len();
                row.cells.into_iter().for_each(|cell| host.recycle(cell.view));
            }
        }
        if recycled > 0 {
            log::trace!("recycled {recycled} views outside {low}..{high}");
        }
    }

    fn update_limits(&mut self, count: usize) {
        let first = self
            .rows
            .front()
            .filter(|row| row.info.positions.start == 0)
            .and_then(|row| row.cells.first())
            .map(|cell| Boundary {
                edge: cell.extent.decorated_start(),
                anchor: self.alignment.anchor(&cell.extent),
            });
        let last = self
            .rows
            .back()
            .filter(|row| row.info.positions.end == count)
            .and_then(|row| row.cells.last())
            .map(|cell| Boundary {
                edge: cell.extent.decorated_end(),
                anchor: self.alignment.anchor(&cell.extent),
            });
        self.limiter.update(&self.alignment, first, last);
    }

    /// Moves every row by `delta` in flow space.
    fn shift(&mut self, delta: f64) {
        let visual = self.visual_offset(delta);
        for row in &mut self.rows {
            row.info.start += delta;
            row.info.end += delta;
            for cell in &mut row.cells {
                cell.extent = cell.extent.offset(delta);
                cell.bounds = cell.bounds + visual;
            }
        }
    }

    fn visual_offset(&self, delta: f64) -> Vec2 {
        let main = if self.axis.reversed { -delta } else { delta };
        match self.orientation {
            Orientation::Vertical => Vec2::new(0.0, main),
            Orientation::Horizontal => Vec2::new(main, 0.0),
        }
    }

    fn visual_rect(&self, start: f64, end: f64, cross: (f64, f64)) -> Rect {
        let (a, b) = (self.axis.to_flow(start), self.axis.to_flow(end));
        let (v0, v1) = (a.min(b), a.max(b));
        match self.orientation {
            Orientation::Vertical => Rect::new(cross.0, v0, cross.1, v1),
            Orientation::Horizontal => Rect::new(v0, cross.0, v1, cross.1),
        }
    }

    fn element_span(&self, cell: &Cell<V>, local: Rect) -> (f64, f64) {
        let (origin, l0, l1) = match self.orientation {
            Orientation::Vertical => (cell.bounds.y0, local.y0, local.y1),
            Orientation::Horizontal => (cell.bounds.x0, local.x0, local.x1),
        };
        let (a, b) = (self.axis.to_flow(origin + l0), self.axis.to_flow(origin + l1));
        (a.min(b), a.max(b))
    }

    fn axis_insets(&self, insets: Insets) -> AxisInsets {
        let (before, after, cross_before, cross_after) = match self.orientation {
            Orientation::Vertical => (insets.y0, insets.y1, insets.x0, insets.x1),
            Orientation::Horizontal => (insets.x0, insets.x1, insets.y0, insets.y1),
        };
        let (start, end) = if self.axis.reversed {
            (after, before)
        } else {
            (before, after)
        };
        AxisInsets {
            start,
            end,
            cross_before,
            cross_after,
        }
    }

    fn constraints(&self, cross: f64) -> Size {
        match self.orientation {
            Orientation::Vertical => Size::new(cross, f64::INFINITY),
            Orientation::Horizontal => Size::new(f64::INFINITY, cross),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use keyline_align::{ChildAlignment, Edge, ParentAlignment};
    use keyline_focus::Orientation;
    use keyline_span::{FnItems, UniformItems};
    use kurbo::{Rect, Size};

    use super::PivotLayoutEngine;
    use crate::LayoutViewport;
    use crate::testing::TestHost;

    fn engine(span_count: usize, viewport: LayoutViewport) -> PivotLayoutEngine<usize> {
        let mut engine = PivotLayoutEngine::new(
            NonZeroUsize::new(span_count).unwrap(),
            Orientation::Vertical,
            ParentAlignment::default(),
            ChildAlignment::default(),
        );
        engine.set_viewport(viewport);
        engine
    }

    fn assert_rows_are_contiguous(engine: &PivotLayoutEngine<usize>) {
        let rows: std::vec::Vec<_> = engine.rows().cloned().collect();
        for row in &rows {
            assert!(row.start <= row.end, "row {row:?} is inverted");
        }
        for pair in rows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "rows must not overlap or leave gaps");
            assert_eq!(pair[0].positions.end, pair[1].positions.start);
        }
    }

    #[test]
    fn first_pass_fills_the_viewport_from_the_start_edge() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(100);
        let mut engine = engine(4, LayoutViewport::new(Size::new(400.0, 1000.0)));
        engine.layout(&mut host, &items, 0, 0).unwrap();

        // Position 0 would sit at the keyline, but the start edge pins it to the top.
        assert_eq!(engine.bounds(0), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(engine.bounds(5), Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert_eq!(engine.laid_out_positions(), 0..40);
        assert_eq!(engine.visible_positions(), 0..40);
        assert_eq!(engine.scroll_limits().start, Some(0.0));
        assert_eq!(engine.scroll_limits().end, None);
        assert_eq!(host.attached(), 40);
        assert_rows_are_contiguous(&engine);
    }

    #[test]
    fn pivot_far_from_the_start_sits_on_the_keyline() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(1000);
        let mut engine = engine(1, LayoutViewport::new(Size::new(400.0, 1000.0)));
        engine.layout(&mut host, &items, 500, 0).unwrap();

        assert_eq!(engine.item_extent(500).map(|e| e.start), Some(450.0));
        assert_eq!(engine.laid_out_positions(), 495..506);
        assert!(engine.scroll_limits().is_unknown());
        assert_rows_are_contiguous(&engine);
    }

    #[test]
    fn scrolling_recycles_and_refills_rows() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(20);
        let mut engine = engine(1, LayoutViewport::new(Size::new(400.0, 300.0)));
        engine.set_look_ahead(0.0, 100.0);
        engine.layout(&mut host, &items, 0, 0).unwrap();
        assert_eq!(engine.laid_out_positions(), 0..4);

        assert_eq!(engine.scroll_by(&mut host, &items, 250.0).unwrap(), 250.0);
        assert_eq!(engine.laid_out_positions(), 2..7);
        assert_eq!(engine.bounds(3), Some(Rect::new(0.0, 50.0, 400.0, 150.0)));
        assert_eq!(host.attached(), 5);
        assert_rows_are_contiguous(&engine);

        // The end is 2000 - 300 = 1700 away from the top at most.
        let applied = engine.scroll_by(&mut host, &items, 10_000.0).unwrap();
        assert_eq!(applied, 1450.0);
        assert_eq!(engine.scroll_limits().end, Some(0.0));
        assert_eq!(engine.laid_out_positions().end, 20);
        assert_eq!(engine.scroll_by(&mut host, &items, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn short_rows_are_stretched_to_the_tallest_item() {
        let mut host = TestHost::new(100.0);
        host.heights.insert(1, 180.0);
        let items = FnItems::new(6, |p| if p == 2 { 2 } else { 1 });
        let mut engine = engine(3, LayoutViewport::new(Size::new(300.0, 1000.0)));
        // The collection is shorter than the viewport; pin it to the start edge.
        engine.set_alignment(
            ParentAlignment {
                prefer_keyline_over_edge: false,
                ..ParentAlignment::default()
            },
            ChildAlignment::default(),
        );
        engine.layout(&mut host, &items, 0, 0).unwrap();

        assert_eq!(engine.bounds(0), Some(Rect::new(0.0, 0.0, 100.0, 180.0)));
        assert_eq!(engine.bounds(2), Some(Rect::new(0.0, 180.0, 200.0, 280.0)));
        assert_rows_are_contiguous(&engine);
    }

    #[test]
    fn reversed_layouts_start_at_the_bottom() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(50);
        let viewport = LayoutViewport::new(Size::new(200.0, 1000.0)).with_reversed(true);
        let mut engine = engine(2, viewport);
        engine.layout(&mut host, &items, 0, 0).unwrap();

        assert_eq!(engine.bounds(0), Some(Rect::new(0.0, 900.0, 100.0, 1000.0)));
        assert_eq!(engine.bounds(3), Some(Rect::new(100.0, 800.0, 200.0, 900.0)));
        assert_eq!(engine.keyline(), 500.0);

        engine.scroll_by(&mut host, &items, 100.0).unwrap();
        assert_eq!(engine.bounds(3), Some(Rect::new(100.0, 900.0, 200.0, 1000.0)));
    }

    #[test]
    fn disabled_edges_keep_the_pivot_on_the_keyline() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(10);
        let mut engine = engine(1, LayoutViewport::new(Size::new(100.0, 1000.0)));
        engine.set_alignment(
            ParentAlignment {
                edge: Edge::empty(),
                ..ParentAlignment::default()
            },
            ChildAlignment::default(),
        );
        engine.layout(&mut host, &items, 0, 0).unwrap();
        assert_eq!(engine.item_extent(0).map(|e| e.start), Some(450.0));
        assert_eq!(engine.scroll_limits().start, Some(0.0));
    }

    #[test]
    fn span_errors_abort_the_pass_without_leaking_views() {
        let mut host = TestHost::new(100.0);
        let items = FnItems::new(10, |p| if p == 6 { 3 } else { 1 });
        let mut engine = engine(2, LayoutViewport::new(Size::new(200.0, 1000.0)));
        assert!(engine.layout(&mut host, &items, 0, 0).is_err());
        assert_eq!(host.attached(), 0);
        assert_eq!(engine.laid_out_positions(), 0..0);
    }

    #[test]
    fn ensure_laid_out_extends_past_the_look_ahead() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(100);
        let mut engine = engine(1, LayoutViewport::new(Size::new(100.0, 300.0)));
        engine.layout(&mut host, &items, 0, 0).unwrap();
        assert!(!engine.is_laid_out(5));
        assert!(engine.ensure_laid_out(&mut host, &items, 5).unwrap());
        assert_eq!(engine.bounds(5), Some(Rect::new(0.0, 500.0, 100.0, 600.0)));
        assert!(!engine.is_visible(5));
        assert!(!engine.ensure_laid_out(&mut host, &items, 100).unwrap());
    }

    #[test]
    fn searches_only_extend_the_window_within_reach() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(5000);
        let mut engine = engine(1, LayoutViewport::new(Size::new(100.0, 300.0)));
        engine.layout(&mut host, &items, 0, 0).unwrap();

        // Two viewports past the end of the window: rows up to 900.
        assert!(!engine.ensure_laid_out(&mut host, &items, 4000).unwrap());
        assert_eq!(engine.laid_out_positions(), 0..9);
        assert_eq!(host.attached(), 9);

        engine.set_search_reach(0.0);
        assert!(!engine.ensure_laid_out(&mut host, &items, 9).unwrap());

        // Trimming keeps the row of the kept position and everything up to the window.
        engine.recycle_outside(&mut host, Some(6));
        assert_eq!(engine.laid_out_positions(), 0..7);
        engine.recycle_outside(&mut host, None);
        assert_eq!(engine.laid_out_positions(), 0..4);
        assert_eq!(host.attached(), 4);
        assert_rows_are_contiguous(&engine);
    }

    #[test]
    fn a_resized_viewport_realigns_the_surviving_pivot() {
        let mut host = TestHost::new(100.0);
        let items = UniformItems::new(100);
        let mut engine = engine(1, LayoutViewport::new(Size::new(400.0, 1000.0)));
        engine.layout(&mut host, &items, 50, 0).unwrap();
        assert_eq!(engine.bounds(50), Some(Rect::new(0.0, 450.0, 400.0, 550.0)));

        // Same viewport: the row stays where it is, even after a scroll.
        engine.scroll_by(&mut host, &items, 30.0).unwrap();
        engine.set_viewport(LayoutViewport::new(Size::new(400.0, 1000.0)));
        engine.layout(&mut host, &items, 50, 0).unwrap();
        assert_eq!(engine.bounds(50), Some(Rect::new(0.0, 420.0, 400.0, 520.0)));

        engine.set_viewport(LayoutViewport::new(Size::new(400.0, 400.0)));
        engine.layout(&mut host, &items, 50, 0).unwrap();
        assert_eq!(engine.keyline(), 200.0);
        assert_eq!(engine.bounds(50), Some(Rect::new(0.0, 150.0, 400.0, 250.0)));
        assert!(engine.is_visible(50));
    }
}
