// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process bridge implementation backed by `EdgeDetector`.

use std::path::Path;

use kantenwerk_core::error::Result;
use kantenwerk_core::{DetectionResult, DetectorConfig};
use kantenwerk_detect::EdgeDetector;
use kantenwerk_detect::image::{crop_detection, image_from_raw, open_image, save_image};
use tracing::{debug, info, instrument};

use crate::traits::{
    DebugSquaresResult, DetectionDiagnostics, DocumentCrop, DocumentDetection, EdgeBridge,
};

/// Channel count of host-supplied buffers (packed RGB).
const RGB_CHANNELS: u8 = 3;

/// Runs detection in the calling thread.
#[derive(Debug, Clone, Default)]
pub struct NativeBridge {
    detector: EdgeDetector,
}

impl NativeBridge {
    /// Bridge with a custom, validated detector configuration.
    pub fn with_config(config: DetectorConfig) -> Result<Self> {
        Ok(Self {
            detector: EdgeDetector::new(config)?,
        })
    }

    pub fn detector(&self) -> &EdgeDetector {
        &self.detector
    }
}

impl EdgeBridge for NativeBridge {
    fn backend_name(&self) -> &str {
        "native"
    }
}

impl DocumentDetection for NativeBridge {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    fn detect_edges(&self, data: &[u8], width: u32, height: u32) -> Result<DetectionResult> {
        if width == 0 || height == 0 {
            debug!("Zero-sized buffer; returning sentinel");
            return Ok(DetectionResult::SENTINEL);
        }
        let image = image_from_raw(data, width, height, RGB_CHANNELS)?;
        Ok(self.detector.detect_normalized(&image))
    }
}

impl DocumentCrop for NativeBridge {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn process_image(&self, path: &Path, detection: &DetectionResult) -> Result<()> {
        let image = open_image(path)?;
        let cropped = crop_detection(&image, detection)?;
        // JPEG and friends cannot hold alpha; the warp never produces any.
        save_image(&cropped.to_rgb8().into(), path)?;
        info!(
            width = cropped.width(),
            height = cropped.height(),
            "Cropped document written"
        );
        Ok(())
    }
}

impl DetectionDiagnostics for NativeBridge {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    fn debug_squares(&self, data: &[u8], width: u32, height: u32) -> Result<DebugSquaresResult> {
        let image = image_from_raw(data, width, height, RGB_CHANNELS)?;
        let overlay = self.detector.debug_squares(&image);
        let (width, height) = overlay.dimensions();
        Ok(DebugSquaresResult {
            data: overlay.into_raw(),
            width,
            height,
        })
    }
}
