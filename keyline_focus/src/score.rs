// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric scoring of directional focus candidates.

use kurbo::Rect;

use crate::FocusDirection;

/// Distance score of `candidate` seen from `origin` when moving in `direction`.
///
/// Candidates outside the forward half-plane score `None`. Lower is better: the distance along
/// the direction plus a heavy penalty for off-axis motion.
pub(crate) fn directional_score(
    origin: Rect,
    candidate: Rect,
    direction: FocusDirection,
) -> Option<f64> {
    let oc = origin.center();
    let cc = candidate.center();
    let dx = cc.x - oc.x;
    let dy = cc.y - oc.y;

    let (primary, secondary, forward_sign) = match direction {
        FocusDirection::Right => (dx, dy, 1.0),
        FocusDirection::Left => (dx, dy, -1.0),
        FocusDirection::Down => (dy, dx, 1.0),
        FocusDirection::Up => (dy, dx, -1.0),
        FocusDirection::Next | FocusDirection::Previous => return None,
    };

    if forward_sign * primary <= 0.0 {
        return None;
    }

    let score = primary.abs() + 4.0 * secondary.abs();
    score.is_finite().then_some(score)
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::directional_score;
    use crate::FocusDirection;

    #[test]
    fn prefers_aligned_candidates() {
        let origin = Rect::new(0.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 20.0, 10.0, 30.0);
        let diagonal = Rect::new(20.0, 20.0, 30.0, 30.0);
        let above = Rect::new(0.0, -20.0, 10.0, -10.0);

        let straight = directional_score(origin, below, FocusDirection::Down);
        let skewed = directional_score(origin, diagonal, FocusDirection::Down);
        assert!(straight < skewed, "aligned candidate should score lower");
        assert_eq!(directional_score(origin, above, FocusDirection::Down), None);
        assert_eq!(directional_score(origin, below, FocusDirection::Next), None);
    }
}
