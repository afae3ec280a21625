// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for document boundary detection.

use serde::{Deserialize, Serialize};

/// Integer pixel position in source-image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Four corners of a detected document in pixel coordinates.
///
/// Corners are stored in the canonical order
/// `[top_left, top_right, bottom_left, bottom_right]`. The all-zero value is
/// the "no detection" sentinel, never a detection at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub points: [Point; 4],
}

impl Quadrilateral {
    /// The "no detection" result.
    pub const SENTINEL: Quadrilateral = Quadrilateral {
        points: [Point::ORIGIN; 4],
    };

    /// Wrap four points that are already in canonical order.
    pub const fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// The whole frame of a `width` x `height` image.
    pub fn full_frame(width: u32, height: u32) -> Self {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        Self::new([
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(0, h),
            Point::new(w, h),
        ])
    }

    pub fn is_sentinel(&self) -> bool {
        self.points.iter().all(|p| *p == Point::ORIGIN)
    }

    pub fn top_left(&self) -> Point {
        self.points[0]
    }

    pub fn top_right(&self) -> Point {
        self.points[1]
    }

    pub fn bottom_left(&self) -> Point {
        self.points[2]
    }

    pub fn bottom_right(&self) -> Point {
        self.points[3]
    }

    /// Horizontal extent: the larger of the two diagonal-pair projections.
    ///
    /// Only meaningful once the points are in canonical order.
    pub fn width(&self) -> u32 {
        let [tl, tr, bl, br] = self.points;
        tl.x.abs_diff(br.x).max(tr.x.abs_diff(bl.x))
    }

    /// Vertical extent: the larger of the two diagonal-pair projections.
    pub fn height(&self) -> u32 {
        let [tl, tr, bl, br] = self.points;
        tl.y.abs_diff(br.y).max(tr.y.abs_diff(bl.y))
    }

    /// Bounding size used to rank candidates (`width * height`).
    pub fn extent_area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

/// A corner in normalized image coordinates, `[0, 1]` on both axes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Externally visible detection result with normalized corners.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub top_left: Coordinate,
    pub top_right: Coordinate,
    pub bottom_left: Coordinate,
    pub bottom_right: Coordinate,
}

impl DetectionResult {
    /// The all-zero "no detection" result.
    pub const SENTINEL: DetectionResult = DetectionResult {
        top_left: Coordinate::new(0.0, 0.0),
        top_right: Coordinate::new(0.0, 0.0),
        bottom_left: Coordinate::new(0.0, 0.0),
        bottom_right: Coordinate::new(0.0, 0.0),
    };

    /// Normalize a pixel-space quadrilateral against the image dimensions.
    ///
    /// Zero dimensions yield the sentinel.
    pub fn normalize(quad: &Quadrilateral, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::SENTINEL;
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let norm = |p: Point| Coordinate::new(f64::from(p.x) / w, f64::from(p.y) / h);
        Self {
            top_left: norm(quad.top_left()),
            top_right: norm(quad.top_right()),
            bottom_left: norm(quad.bottom_left()),
            bottom_right: norm(quad.bottom_right()),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.corners()
            .iter()
            .all(|c| c.x == 0.0 && c.y == 0.0)
    }

    /// Corners in canonical order.
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// Scale the normalized corners back to pixel positions for a
    /// `width` x `height` image, in canonical order.
    pub fn denormalize(&self, width: u32, height: u32) -> [(f32, f32); 4] {
        let (w, h) = (f64::from(width), f64::from(height));
        self.corners()
            .map(|c| ((c.x * w) as f32, (c.y * h) as f32))
    }
}
