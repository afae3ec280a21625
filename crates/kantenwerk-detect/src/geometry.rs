// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon geometry for candidate filtering: closed-curve Douglas-Peucker
// simplification, area, convexity and corner-angle cosines.

use imageproc::geometry::contour_area;
use imageproc::point::Point;

/// Guards the corner cosine denominator against zero-length edges.
const CORNER_COSINE_EPSILON: f64 = 1e-10;

/// Simplify a closed contour with the Douglas-Peucker algorithm.
///
/// The curve is first split at two mutually distant anchor points so the
/// result does not depend on where the tracer happened to start the contour.
/// Each half is then simplified as an open polyline and the halves are joined.
/// Returns the contour unchanged if it has fewer than three points.
pub fn approximate_closed_polygon(contour: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = contour.len();
    if n < 3 {
        return contour.to_vec();
    }

    let first = farthest_from(contour, contour[0]);
    let second = farthest_from(contour, contour[first]);
    if contour[first] == contour[second] {
        // Every point coincides.
        return vec![contour[first]];
    }

    let (start, split) = (first.min(second), first.max(second));
    let rotated: Vec<Point<i32>> = contour[start..]
        .iter()
        .chain(&contour[..start])
        .copied()
        .collect();
    let split = split - start;

    let mut closing: Vec<Point<i32>> = rotated[split..].to_vec();
    closing.push(rotated[0]);

    let mut polygon = simplify_open(&rotated[..=split], epsilon);
    polygon.pop();
    let mut tail = simplify_open(&closing, epsilon);
    tail.pop();
    polygon.extend(tail);
    polygon
}

/// Douglas-Peucker on an open polyline; both endpoints are always kept.
fn simplify_open(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let last = points.len().saturating_sub(1);
    if last < 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut index = start;
        let mut max_dist = 0.0;
        for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
            let dist = distance_to_line(*p, points[start], points[end]);
            if dist > max_dist {
                index = i;
                max_dist = dist;
            }
        }
        if max_dist > epsilon {
            keep[index] = true;
            stack.push((index, end));
            stack.push((start, index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Index of the point farthest from `origin` (first one on ties).
fn farthest_from(points: &[Point<i32>], origin: Point<i32>) -> usize {
    let mut best = 0;
    let mut best_dist = -1;
    for (i, p) in points.iter().enumerate() {
        let dx = i64::from(p.x - origin.x);
        let dy = i64::from(p.y - origin.y);
        let dist = dx * dx + dy * dy;
        if dist > best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Perpendicular distance from `p` to the line through `a` and `b`, or the
/// plain distance to `a` when the two coincide.
fn distance_to_line(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (dx, dy) = (f64::from(b.x - a.x), f64::from(b.y - a.y));
    let (px, py) = (f64::from(p.x - a.x), f64::from(p.y - a.y));
    let len = dx.hypot(dy);
    if len == 0.0 {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / len
}

/// Unsigned polygon area in px², either winding.
pub fn polygon_area(polygon: &[Point<i32>]) -> f64 {
    contour_area(polygon)
}

/// True if every turn along the closed polygon has the same strict
/// orientation. Collinear or reflex vertices make the polygon non-convex.
pub fn is_convex(polygon: &[Point<i32>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut orientation = 0i64;
    for i in 0..n {
        let (a, b, c) = (polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]);
        let cross = i64::from(b.x - a.x) * i64::from(c.y - b.y)
            - i64::from(b.y - a.y) * i64::from(c.x - b.x);
        if cross == 0 {
            return false;
        }
        let sign = cross.signum();
        if orientation == 0 {
            orientation = sign;
        } else if sign != orientation {
            return false;
        }
    }
    true
}

/// Cosine of the angle at `vertex` between the edges towards `prev` and
/// `next`.
pub fn corner_cosine(prev: Point<i32>, vertex: Point<i32>, next: Point<i32>) -> f64 {
    let (dx1, dy1) = (f64::from(prev.x - vertex.x), f64::from(prev.y - vertex.y));
    let (dx2, dy2) = (f64::from(next.x - vertex.x), f64::from(next.y - vertex.y));
    (dx1 * dx2 + dy1 * dy2)
        / ((dx1 * dx1 + dy1 * dy1) * (dx2 * dx2 + dy2 * dy2) + CORNER_COSINE_EPSILON).sqrt()
}

/// Largest |cos| over every corner of a closed polygon.
pub fn max_corner_cosine(polygon: &[Point<i32>]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let prev = polygon[(i + n - 1) % n];
            let next = polygon[(i + 1) % n];
            corner_cosine(prev, polygon[i], next).abs()
        })
        .fold(0.0, f64::max)
}
