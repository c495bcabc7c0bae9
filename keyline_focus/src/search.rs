// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus target search.

use core::num::NonZeroUsize;
use core::ops::Range;

use keyline_span::{ItemSource, SpanError, SpanInfo, SpanMetrics};
use kurbo::Rect;
use smallvec::SmallVec;

use crate::score::directional_score;
use crate::{FocusDirection, Movement, Orientation, SpanFocusCache};

/// The host's view of which positions can take focus.
///
/// Queries may be answered lazily: a grid can lay out more items to answer them.
pub trait FocusCandidates {
    /// Returns `true` if the item at `position` can take focus.
    fn is_focusable(&mut self, position: usize) -> bool;

    /// Visual bounds of the item at `position`, if it is laid out.
    fn bounds(&mut self, position: usize) -> Option<Rect> {
        let _ = position;
        None
    }
}

/// How focus moves between rows and within rows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusStrategy {
    /// Move to the adjacent row; if the item in the requested column cannot take focus, pick
    /// the nearest focusable item of that row.
    #[default]
    Default,
    /// Like [`FocusStrategy::Default`] across rows, but skip whole rows until one has a
    /// focusable item in the requested column.
    Continuous,
    /// Like [`FocusStrategy::Default`], but moving past the end of a row wraps to its other
    /// end.
    Circular,
}

/// Wrap behavior at the ends of the collection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Reaching either end yields no target.
    #[default]
    Never,
    /// Stepping past the last position continues at the first one and vice versa.
    ///
    /// Applies to [`Movement::NextItem`]/[`Movement::PreviousItem`] and to row movement in
    /// single-span lists.
    Collection,
}

/// Configuration of a [`FocusSearchEngine`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusConfig {
    /// Search strategy.
    pub strategy: FocusStrategy,
    /// Wrap behavior at the ends of the collection.
    pub wrap: WrapMode,
    /// Orientation used to resolve directions.
    pub orientation: Orientation,
    /// Whether position 0 sits at the visual end of the scroll axis.
    pub reversed: bool,
    /// Most rows [`FocusStrategy::Continuous`] visits in one search. `None` searches up to
    /// the ends of the collection.
    pub continuous_row_limit: Option<NonZeroUsize>,
}

/// Finds the next focus target for a directional input.
#[derive(Clone, Debug, Default)]
pub struct FocusSearchEngine {
    config: FocusConfig,
    cache: SpanFocusCache,
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

impl FocusSearchEngine {
    /// Creates an engine with an empty [`SpanFocusCache`].
    #[must_use]
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            cache: SpanFocusCache::new(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: FocusConfig) {
        if config.orientation != self.config.orientation {
            self.cache.invalidate();
        }
        self.config = config;
    }

    /// Remembered columns.
    #[must_use]
    pub const fn cache(&self) -> &SpanFocusCache {
        &self.cache
    }

    /// Drops the remembered columns.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Returns the position that should take focus when `direction` is pressed while
    /// `current` is focused, or `None` if focus should stay where it is.
    ///
    /// Fails only on span configuration errors reported by `metrics`.
    pub fn find_target<I, C>(
        &mut self,
        metrics: &mut SpanMetrics,
        items: &I,
        candidates: &mut C,
        current: usize,
        direction: FocusDirection,
    ) -> Result<Option<usize>, SpanError>
    where
        I: ItemSource + ?Sized,
        C: FocusCandidates + ?Sized,
    {
        let count = items.item_count();
        if count == 0 {
            return Ok(None);
        }
        if current >= count {
            return Err(SpanError::PositionOutOfBounds {
                position: current,
                item_count: count,
            });
        }

        let movement =
            Movement::resolve(direction, self.config.orientation, self.config.reversed);
        let target = match movement {
            Movement::NextItem => self.sequential(candidates, count, current, Step::Forward),
            Movement::PreviousItem => self.sequential(candidates, count, current, Step::Backward),
            Movement::NextColumn | Movement::PreviousColumn => {
                self.within_row(metrics, items, candidates, current, movement)?
            }
            Movement::NextRow | Movement::PreviousRow if metrics.is_single_span() => {
                self.list_step(candidates, count, current, movement)
            }
            Movement::NextRow | Movement::PreviousRow => {
                self.across_rows(metrics, items, candidates, current, movement, direction)?
            }
        };
        log::trace!("focus search {current} {direction:?} -> {target:?}");
        Ok(target)
    }

    fn step(&self, position: usize, count: usize, step: Step) -> Option<usize> {
        let wrap = self.config.wrap == WrapMode::Collection;
        match step {
            Step::Forward if position + 1 < count => Some(position + 1),
            Step::Backward if position > 0 => Some(position - 1),
            Step::Forward if wrap => Some(0),
            Step::Backward if wrap => Some(count - 1),
            Step::Forward | Step::Backward => None,
        }
    }

    fn sequential<C: FocusCandidates + ?Sized>(
        &self,
        candidates: &mut C,
        count: usize,
        current: usize,
        step: Step,
    ) -> Option<usize> {
        let mut position = current;
        for _ in 1..count {
            position = self.step(position, count, step)?;
            if candidates.is_focusable(position) {
                return Some(position);
            }
        }
        None
    }

    fn list_step<C: FocusCandidates + ?Sized>(
        &self,
        candidates: &mut C,
        count: usize,
        current: usize,
        movement: Movement,
    ) -> Option<usize> {
        let step = if movement.is_forward() {
            Step::Forward
        } else {
            Step::Backward
        };
        if self.config.strategy == FocusStrategy::Continuous {
            return self.sequential(candidates, count, current, step);
        }
        self.step(current, count, step)
            .filter(|&position| position != current && candidates.is_focusable(position))
    }

    fn within_row<I, C>(
        &self,
        metrics: &mut SpanMetrics,
        items: &I,
        candidates: &mut C,
        current: usize,
        movement: Movement,
    ) -> Result<Option<usize>, SpanError>
    where
        I: ItemSource + ?Sized,
        C: FocusCandidates + ?Sized,
    {
        if metrics.is_single_span() {
            return Ok(None);
        }
        let info = metrics.span_info(items, current)?;
        let row = metrics.group_range(items, current)?;
        let circular = self.config.strategy == FocusStrategy::Circular
            && info.span_size < metrics.span_count();

        let target = if movement.is_forward() {
            match (current + 1..row.end).find(|&p| candidates.is_focusable(p)) {
                None if circular => (row.start..current).find(|&p| candidates.is_focusable(p)),
                found => found,
            }
        } else {
            match (row.start..current).rev().find(|&p| candidates.is_focusable(p)) {
                None if circular => (current + 1..row.end)
                    .rev()
                    .find(|&p| candidates.is_focusable(p)),
                found => found,
            }
        };
        Ok(target)
    }

    fn across_rows<I, C>(
        &mut self,
        metrics: &mut SpanMetrics,
        items: &I,
        candidates: &mut C,
        current: usize,
        movement: Movement,
        direction: FocusDirection,
    ) -> Result<Option<usize>, SpanError>
    where
        I: ItemSource + ?Sized,
        C: FocusCandidates + ?Sized,
    {
        let count = items.item_count();
        let origin = metrics.span_info(items, current)?;
        let column = self
            .cache
            .get(origin.group)
            .filter(|&span| origin.covers(span))
            .unwrap_or(origin.span_index);

        let rows = if self.config.strategy == FocusStrategy::Continuous {
            self.config.continuous_row_limit.map_or(usize::MAX, NonZeroUsize::get)
        } else {
            1
        };
        let mut row = metrics.group_range(items, current)?;
        for visited in 0..rows {
            row = if movement.is_forward() {
                if row.end >= count {
                    return Ok(None);
                }
                metrics.group_range(items, row.end)?
            } else {
                if row.start == 0 {
                    return Ok(None);
                }
                metrics.group_range(items, row.start - 1)?
            };

            let target = column_match(metrics, items, row.clone(), column)?;
            if candidates.is_focusable(target.position) {
                if target.span_size != origin.span_size {
                    self.cache.insert(target.group, column);
                }
                return Ok(Some(target.position));
            }
            if self.config.strategy != FocusStrategy::Continuous {
                return nearest_focusable(metrics, items, candidates, current, direction, row, column);
            }
            if visited + 1 == rows {
                log::debug!("continuous search from {current} gave up after {rows} rows");
            }
        }
        Ok(None)
    }
}

/// The item of `row` covering `column`, or the one whose first span is closest to it.
fn column_match<I: ItemSource + ?Sized>(
    metrics: &mut SpanMetrics,
    items: &I,
    row: Range<usize>,
    column: usize,
) -> Result<SpanInfo, SpanError> {
    let mut best: Option<SpanInfo> = None;
    for position in row {
        let info = metrics.span_info(items, position)?;
        if info.covers(column) {
            return Ok(info);
        }
        let closer = best.is_none_or(|best| {
            info.span_index.abs_diff(column) < best.span_index.abs_diff(column)
        });
        if closer {
            best = Some(info);
        }
    }
    // Rows are never empty, so `best` is set unless `row` was.
    best.ok_or(SpanError::PositionOutOfBounds {
        position: 0,
        item_count: items.item_count(),
    })
}

/// Picks the focusable item of `row` closest to the origin.
///
/// Geometry decides when the origin and the candidates are laid out; span distance to `column`
/// decides otherwise.
fn nearest_focusable<I, C>(
    metrics: &mut SpanMetrics,
    items: &I,
    candidates: &mut C,
    current: usize,
    direction: FocusDirection,
    row: Range<usize>,
    column: usize,
) -> Result<Option<usize>, SpanError>
where
    I: ItemSource + ?Sized,
    C: FocusCandidates + ?Sized,
{
    let focusable: SmallVec<[usize; 8]> = row
        .filter(|&position| candidates.is_focusable(position))
        .collect();

    if let Some(origin) = candidates.bounds(current) {
        let mut best: Option<(f64, usize)> = None;
        for &position in &focusable {
            let Some(score) = candidates
                .bounds(position)
                .and_then(|bounds| directional_score(origin, bounds, direction))
            else {
                continue;
            };
            if best.is_none_or(|(best, _)| score < best) {
                best = Some((score, position));
            }
        }
        if let Some((_, position)) = best {
            return Ok(Some(position));
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for position in focusable {
        let distance = metrics.span_info(items, position)?.span_index.abs_diff(column);
        if best.is_none_or(|(best, _)| distance < best) {
            best = Some((distance, position));
        }
    }
    Ok(best.map(|(_, position)| position))
}
