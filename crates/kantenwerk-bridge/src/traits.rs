// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for the capabilities a host can call into.

use std::path::Path;

use kantenwerk_core::DetectionResult;
use kantenwerk_core::error::Result;
use serde::{Deserialize, Serialize};

/// Unified bridge that groups every host-facing capability.
pub trait EdgeBridge: DocumentDetection + DocumentCrop + DetectionDiagnostics {
    /// Human-readable backend name for logs and host diagnostics.
    fn backend_name(&self) -> &str;
}

/// Locate a document in a packed RGB buffer.
pub trait DocumentDetection {
    /// Detect the document corners in a `width` x `height` RGB image.
    ///
    /// Returns normalized corners, or `DetectionResult::SENTINEL` when no
    /// document was found or either dimension is zero.
    fn detect_edges(&self, data: &[u8], width: u32, height: u32) -> Result<DetectionResult>;
}

/// Apply a detection to an image file on disk.
pub trait DocumentCrop {
    /// Load `path`, perspective-crop it to `detection`, and overwrite it.
    /// Fails with `NoDocumentDetected` for the sentinel.
    fn process_image(&self, path: &Path, detection: &DetectionResult) -> Result<()>;
}

/// Debug rendering for tuning the detector.
pub trait DetectionDiagnostics {
    /// Render the candidate overlay for a packed RGB buffer.
    fn debug_squares(&self, data: &[u8], width: u32, height: u32) -> Result<DebugSquaresResult>;
}

/// Packed RGB overlay image handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugSquaresResult {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}
