// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional navigation through a sectioned grid with animated scrolling.
//!
//! This example shows how a host wires up:
//! - `keyline_span` item sources with full-width section headers,
//! - `keyline_grid` for layout, selection and throttled smooth scrolling,
//! - `keyline_align` for a keyline placed a third of the way into the viewport.
//!
//! Run:
//! - `cargo run -p keyline_demos --example grid_walkthrough`

use std::collections::BTreeMap;

use keyline_align::ParentAlignment;
use keyline_focus::{FocusDirection, FocusStrategy};
use keyline_grid::{GridConfig, GridController, LayoutHost, LayoutViewport, ScrollMode};
use keyline_span::{FnItems, PackDirection};
use kurbo::{Rect, Size, Vec2};

const SPANS: usize = 4;
const SECTION: usize = 13;

/// A section header every `SECTION` positions, spanning the whole row.
fn span_size(position: usize) -> usize {
    if position % SECTION == 0 { SPANS } else { 1 }
}

/// Views are plain positions; the host keeps their on-screen rectangles.
#[derive(Default)]
struct TextHost {
    views: BTreeMap<usize, Rect>,
    focused: Option<usize>,
    animation: Option<f64>,
}

impl LayoutHost for TextHost {
    type View = usize;

    fn acquire_view(&mut self, position: usize, _direction: PackDirection) -> usize {
        position
    }

    fn recycle(&mut self, view: usize) {
        self.views.remove(&view);
    }

    fn measure(&mut self, view: &usize, constraints: Size) -> Size {
        let height = if span_size(*view) == SPANS { 40.0 } else { 120.0 };
        Size::new(constraints.width, height)
    }

    fn place(&mut self, view: &usize, bounds: Rect) {
        self.views.insert(*view, bounds);
    }

    fn offset_views(&mut self, delta: Vec2) {
        for bounds in self.views.values_mut() {
            *bounds = *bounds + delta;
        }
    }

    fn smooth_scroll_by(&mut self, delta: f64) {
        self.animation = Some(delta);
    }

    fn request_focus(&mut self, view: &usize) {
        self.focused = Some(*view);
    }
}

/// Plays the pending animation in eight frames.
fn animate(
    grid: &mut GridController<usize>,
    host: &mut TextHost,
    items: &FnItems<fn(usize) -> usize>,
) {
    while let Some(total) = host.animation.take() {
        for _ in 0..8 {
            grid.scroll_by(host, items, total / 8.0).unwrap();
            if host.animation.is_some() {
                break;
            }
        }
    }
    grid.on_scroll_settled(host, items).unwrap();
}

fn report(label: &str, grid: &GridController<usize>, host: &TextHost) {
    let selected = grid.selected_position().unwrap_or_default();
    let bounds = host.views.get(&selected).copied().unwrap_or(Rect::ZERO);
    println!(
        "{label:>12}: selected {selected:>3} at y {:>6.1}..{:<6.1} visible {:?}",
        bounds.y0,
        bounds.y1,
        grid.visible_positions()
    );
}

fn main() {
    let items: FnItems<fn(usize) -> usize> = FnItems::new(120, span_size);
    let config = GridConfig {
        span_count: SPANS,
        focus_strategy: FocusStrategy::Default,
        parent_alignment: ParentAlignment {
            fraction: 1.0 / 3.0,
            ..ParentAlignment::default()
        },
        scroll_mode: ScrollMode::Smooth,
        max_pending_alignments: core::num::NonZeroUsize::new(2),
        ..GridConfig::default()
    };
    let mut grid = GridController::new(config).unwrap();
    let mut host = TextHost::default();
    let viewport = LayoutViewport::new(Size::new(800.0, 600.0));

    grid.on_layout_pass(&mut host, &items, viewport).unwrap();
    report("initial", &grid, &host);

    for _ in 0..3 {
        grid.on_directional_input(&mut host, &items, FocusDirection::Down)
            .unwrap();
        animate(&mut grid, &mut host, &items);
        report("down", &grid, &host);
    }

    grid.on_directional_input(&mut host, &items, FocusDirection::Right)
        .unwrap();
    animate(&mut grid, &mut host, &items);
    report("right", &grid, &host);

    // A burst of key presses during one animation is throttled by the pending queue.
    for _ in 0..6 {
        grid.on_directional_input(&mut host, &items, FocusDirection::Down)
            .unwrap();
    }
    animate(&mut grid, &mut host, &items);
    report("burst", &grid, &host);

    // Crossing a section header and coming back keeps the column.
    for direction in [FocusDirection::Up, FocusDirection::Up, FocusDirection::Down] {
        grid.on_directional_input(&mut host, &items, direction)
            .unwrap();
        animate(&mut grid, &mut host, &items);
        report(&format!("{direction:?}").to_lowercase(), &grid, &host);
    }

    grid.set_selected_position(&mut host, &items, 100, 0, false)
        .unwrap();
    report("jump", &grid, &host);
    println!("scroll limits: {:?}", grid.scroll_limits());
}
