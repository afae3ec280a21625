// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// kantenwerk-detect: Document boundary detection for Kantenwerk.
//
// Provides the quadrilateral search (multi-pass edge-map sweep, candidate
// filtering and selection), a diagnostic overlay, image I/O helpers, and the
// perspective crop that consumes detected corners.

pub mod geometry;
pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `kantenwerk_detect::EdgeDetector` etc.
pub use scan::{Candidate, Detection, EdgeDetector, SweepStats};
