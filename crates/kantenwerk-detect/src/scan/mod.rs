// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document boundary search: edge-map sweep, candidate filter, candidate
// selector and the diagnostic overlay.

pub mod candidate;
pub mod debug;
pub mod detector;
pub mod select;
pub mod sweep;

pub use candidate::Candidate;
pub use detector::{Detection, EdgeDetector, SweepStats};
