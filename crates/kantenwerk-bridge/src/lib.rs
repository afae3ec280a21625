// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Kantenwerk: boundary layer between host applications and the detector.
//!
//! Hosts hand over packed pixel buffers and file paths; they get back owned,
//! normalized `DetectionResult`s and plain byte buffers. Nothing in here
//! exposes raw memory.

pub mod native;
pub mod traits;

pub use native::NativeBridge;
pub use traits::{DebugSquaresResult, EdgeBridge};

/// Bridge backed by the default detector configuration.
///
/// RETURNS: A boxed trait object so hosts stay decoupled from the detector
/// type and its configuration.
pub fn edge_bridge() -> Box<dyn traits::EdgeBridge> {
    Box::new(NativeBridge::default())
}
