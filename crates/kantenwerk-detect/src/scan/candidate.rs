// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate filter: reduce raw contours to near-rectangular convex
// quadrilaterals. Anything else is dropped silently.

use imageproc::geometry::arc_length;
use imageproc::point::Point;
use kantenwerk_core::config::FilterConfig;
use tracing::trace;

use crate::geometry::{approximate_closed_polygon, is_convex, max_corner_cosine, polygon_area};
use crate::scan::sweep::EdgePass;

/// A simplified four-vertex polygon that passed every shape test.
///
/// Points keep the order produced by the simplification; the selector
/// canonicalizes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub points: [Point<i32>; 4],
    /// Unsigned polygon area in px².
    pub area: f64,
    /// Largest |cos| over the four corners.
    pub max_cosine: f64,
}

/// Simplify `contour` and accept it if it is a plausible document outline.
pub fn filter_candidate(contour: &[Point<i32>], config: &FilterConfig) -> Option<Candidate> {
    if contour.len() < 4 {
        return None;
    }
    let epsilon = arc_length(contour, true) * config.approx_epsilon_ratio;
    if epsilon <= 0.0 {
        return None;
    }

    let polygon = approximate_closed_polygon(contour, epsilon);
    let points: [Point<i32>; 4] = polygon.as_slice().try_into().ok()?;

    let area = polygon_area(&points);
    if area <= config.min_area || !is_convex(&points) {
        return None;
    }

    let max_cosine = max_corner_cosine(&points);
    if max_cosine >= config.max_corner_cosine {
        trace!(max_cosine, "Quadrilateral rejected on corner angle");
        return None;
    }

    Some(Candidate {
        points,
        area,
        max_cosine,
    })
}

/// Every candidate in one edge pass, in contour order.
pub fn collect_candidates(pass: &EdgePass, config: &FilterConfig) -> Vec<Candidate> {
    pass.contours
        .iter()
        .filter_map(|contour| filter_candidate(contour, config))
        .collect()
}
