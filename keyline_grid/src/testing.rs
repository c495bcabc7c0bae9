// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host for unit tests. Views are the positions they are bound to.

use std::vec::Vec;

use hashbrown::{HashMap, HashSet};
use keyline_align::ElementId;
use keyline_span::PackDirection;
use kurbo::{Rect, Size, Vec2};

use crate::{LayoutHost, SubPositions};

#[derive(Debug, Default)]
pub(crate) struct TestHost {
    pub(crate) default_height: f64,
    pub(crate) heights: HashMap<usize, f64>,
    pub(crate) live: HashSet<usize>,
    pub(crate) placed: HashMap<usize, Rect>,
    pub(crate) smooth: Vec<f64>,
    pub(crate) focused: Option<usize>,
    pub(crate) unfocusable: HashSet<usize>,
    pub(crate) sub_positions: HashMap<usize, SubPositions>,
    pub(crate) elements: HashMap<(usize, ElementId), Rect>,
}

impl TestHost {
    pub(crate) fn new(default_height: f64) -> Self {
        Self {
            default_height,
            ..Self::default()
        }
    }

    pub(crate) fn attached(&self) -> usize {
        self.live.len()
    }
}

impl LayoutHost for TestHost {
    type View = usize;

    fn acquire_view(&mut self, position: usize, _direction: PackDirection) -> usize {
        assert!(self.live.insert(position), "{position} acquired twice");
        position
    }

    fn recycle(&mut self, view: usize) {
        assert!(self.live.remove(&view), "{view} recycled while detached");
        self.placed.remove(&view);
    }

    fn measure(&mut self, view: &usize, constraints: Size) -> Size {
        let main = self.heights.get(view).copied().unwrap_or(self.default_height);
        if constraints.height.is_infinite() {
            Size::new(constraints.width, main)
        } else {
            Size::new(main, constraints.height)
        }
    }

    fn place(&mut self, view: &usize, bounds: Rect) {
        self.placed.insert(*view, bounds);
    }

    fn offset_views(&mut self, delta: Vec2) {
        for bounds in self.placed.values_mut() {
            *bounds = *bounds + delta;
        }
    }

    fn smooth_scroll_by(&mut self, delta: f64) {
        self.smooth.push(delta);
    }

    fn is_focusable(&self, view: &usize) -> bool {
        !self.unfocusable.contains(view)
    }

    fn request_focus(&mut self, view: &usize) {
        self.focused = Some(*view);
    }

    fn sub_position_alignments(&self, view: &usize) -> SubPositions {
        self.sub_positions.get(view).cloned().unwrap_or_default()
    }

    fn element_bounds(&self, view: &usize, element: ElementId) -> Option<Rect> {
        self.elements.get(&(*view, element)).copied()
    }
}
