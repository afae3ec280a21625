// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate selector: canonical corner order, size plausibility, and the
// largest-survivor fold.

use imageproc::point::Point as PixelPoint;
use kantenwerk_core::config::SelectionConfig;
use kantenwerk_core::{Point, Quadrilateral};
use tracing::debug;

use crate::scan::candidate::Candidate;

/// Sort four corners into `[top_left, top_right, bottom_left, bottom_right]`.
///
/// Points are ordered by y, then the upper pair and the lower pair are each
/// ordered by x. The sorts are stable, so ties keep their incoming order.
pub fn canonical_order(points: [PixelPoint<i32>; 4]) -> Quadrilateral {
    let mut sorted = points.map(|p| Point::new(p.x, p.y));
    sorted.sort_by_key(|p| p.y);
    sorted[..2].sort_by_key(|p| p.x);
    sorted[2..].sort_by_key(|p| p.x);
    Quadrilateral::new(sorted)
}

/// Size window a selected quadrilateral has to fall into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: f64,
    pub max_height: f64,
}

impl SizeLimits {
    pub fn for_image(width: u32, height: u32, config: &SelectionConfig) -> Self {
        let divisor = config.min_size_divisor.max(1);
        Self {
            min_width: width / divisor,
            min_height: height / divisor,
            max_width: f64::from(width) * config.max_size_ratio,
            max_height: f64::from(height) * config.max_size_ratio,
        }
    }

    /// Too small to be the document, or indistinguishable from the frame.
    pub fn admits(&self, quad: &Quadrilateral) -> bool {
        let (w, h) = (quad.width(), quad.height());
        if w < self.min_width || h < self.min_height {
            return false;
        }
        !(f64::from(w) > self.max_width || f64::from(h) > self.max_height)
    }
}

/// Pick the largest plausible candidate, or `None` if nothing survives.
///
/// Candidates must arrive in scan order; on an exact `width * height` tie the
/// earlier one is kept.
pub fn select_best<I>(candidates: I, limits: &SizeLimits) -> Option<Quadrilateral>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut considered = 0usize;
    let best = candidates
        .into_iter()
        .inspect(|_| considered += 1)
        .map(|candidate| canonical_order(candidate.points))
        .filter(|quad| limits.admits(quad))
        .fold(None, |best: Option<Quadrilateral>, quad| match best {
            Some(kept) if kept.extent_area() >= quad.extent_area() => Some(kept),
            _ => Some(quad),
        });
    debug!(
        considered,
        selected = best.is_some(),
        "Candidate selection finished"
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(raw: [(i32, i32); 4]) -> Candidate {
        Candidate {
            points: raw.map(|(x, y)| PixelPoint::new(x, y)),
            area: 0.0,
            max_cosine: 0.0,
        }
    }

    fn limits_1000() -> SizeLimits {
        SizeLimits::for_image(1000, 1000, &SelectionConfig::default())
    }

    #[test]
    fn canonical_order_is_winding_independent() {
        let expected = Quadrilateral::new([
            Point::new(100, 100),
            Point::new(900, 120),
            Point::new(90, 880),
            Point::new(880, 900),
        ]);
        let clockwise = [(100, 100), (900, 120), (880, 900), (90, 880)];
        let counter = [(90, 880), (880, 900), (900, 120), (100, 100)];
        let shuffled = [(880, 900), (100, 100), (90, 880), (900, 120)];
        for raw in [clockwise, counter, shuffled] {
            assert_eq!(canonical_order(candidate(raw).points), expected);
        }
    }

    #[test]
    fn canonical_order_satisfies_layout_invariant() {
        let quad = canonical_order(candidate([(50, 300), (400, 10), (20, 40), (380, 320)]).points);
        let [tl, tr, bl, br] = quad.points;
        assert!(tl.x <= tr.x && bl.x <= br.x);
        assert!(tl.y.max(tr.y) <= bl.y.min(br.y));
    }

    #[test]
    fn limits_follow_image_size() {
        let limits = SizeLimits::for_image(1003, 501, &SelectionConfig::default());
        assert_eq!(limits.min_width, 200);
        assert_eq!(limits.min_height, 100);
        assert!((limits.max_width - 992.97).abs() < 1e-9);
        assert!((limits.max_height - 495.99).abs() < 1e-9);
    }

    #[test]
    fn too_small_and_full_frame_are_rejected() {
        let limits = limits_1000();
        let tiny = canonical_order(candidate([(0, 0), (150, 0), (150, 500), (0, 500)]).points);
        assert!(!limits.admits(&tiny));
        let border = canonical_order(candidate([(0, 0), (995, 0), (995, 995), (0, 995)]).points);
        assert!(!limits.admits(&border));
        let edge = canonical_order(candidate([(0, 0), (200, 0), (200, 980), (0, 980)]).points);
        assert!(limits.admits(&edge));
    }

    #[test]
    fn largest_plausible_wins() {
        let picks = vec![
            candidate([(100, 100), (500, 100), (100, 500), (500, 500)]),
            candidate([(0, 0), (999, 0), (0, 999), (999, 999)]),
            candidate([(50, 50), (800, 50), (50, 800), (800, 800)]),
            candidate([(10, 10), (60, 10), (10, 60), (60, 60)]),
        ];
        let best = select_best(picks, &limits_1000()).expect("one survives");
        assert_eq!(best.top_left(), Point::new(50, 50));
        assert_eq!(best.bottom_right(), Point::new(800, 800));
    }

    #[test]
    fn first_wins_on_exact_tie() {
        let picks = vec![
            candidate([(100, 100), (600, 100), (100, 600), (600, 600)]),
            candidate([(200, 200), (700, 200), (200, 700), (700, 700)]),
        ];
        let best = select_best(picks, &limits_1000()).expect("both survive");
        assert_eq!(best.top_left(), Point::new(100, 100));
    }

    #[test]
    fn nothing_survives() {
        assert_eq!(select_best(Vec::new(), &limits_1000()), None);
        let only_tiny = vec![candidate([(0, 0), (10, 0), (0, 10), (10, 10)])];
        assert_eq!(select_best(only_tiny, &limits_1000()), None);
    }
}
