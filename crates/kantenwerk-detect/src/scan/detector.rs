// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document edge detector: runs the edge-map sweep, filters quadrilateral
// candidates and selects the best one.

use image::{DynamicImage, RgbImage};
use kantenwerk_core::config::NoDetectionFallback;
use kantenwerk_core::error::Result;
use kantenwerk_core::{DetectionResult, DetectorConfig, Quadrilateral};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::scan::candidate::{Candidate, collect_candidates};
use crate::scan::debug::render_candidates;
use crate::scan::select::{SizeLimits, select_best};
use crate::scan::sweep::{sweep, to_grayscale};

/// Counters gathered over one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStats {
    pub edge_maps: usize,
    pub contours: usize,
    pub candidates: usize,
}

/// Outcome of one detection run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Selected corners in pixel coordinates, or the sentinel.
    pub quad: Quadrilateral,
    /// True only when `quad` came from a real candidate.
    pub found: bool,
    pub stats: SweepStats,
}

/// Finds the most plausible document quadrilateral in a photograph.
///
/// Detection is a pure function of the image and the configuration: the same
/// input always yields the same corners.
///
/// ```ignore
/// let detector = EdgeDetector::new(DetectorConfig::default())?;
/// let corners = detector.detect_normalized(&image::open("receipt.jpg")?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    config: DetectorConfig,
}

impl EdgeDetector {
    // -- Construction ---------------------------------------------------------

    /// Create a detector after validating `config`.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    // -- Detection ------------------------------------------------------------

    /// Corners of the best candidate in pixel coordinates, in canonical order.
    pub fn detect(&self, image: &DynamicImage) -> Quadrilateral {
        self.detect_with_report(image).quad
    }

    /// Corners of the best candidate normalized to `[0, 1]`.
    pub fn detect_normalized(&self, image: &DynamicImage) -> DetectionResult {
        let quad = self.detect(image);
        DetectionResult::normalize(&quad, image.width(), image.height())
    }

    /// Full detection with sweep counters.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect_with_report(&self, image: &DynamicImage) -> Detection {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            warn!("Empty image; skipping detection");
            return Detection {
                quad: Quadrilateral::SENTINEL,
                found: false,
                stats: SweepStats::default(),
            };
        }

        let (candidates, stats) = self.sweep_candidates(image);
        let limits = SizeLimits::for_image(width, height, &self.config.selection);
        let selected = select_best(candidates, &limits);

        let found = selected.is_some();
        let quad = selected.unwrap_or_else(|| self.fallback(width, height));
        if found {
            info!(
                candidates = stats.candidates,
                top_left = ?quad.top_left(),
                bottom_right = ?quad.bottom_right(),
                "Document quadrilateral selected"
            );
        } else {
            info!(
                candidates = stats.candidates,
                fallback = ?self.config.selection.fallback,
                "No plausible document quadrilateral"
            );
        }
        Detection { quad, found, stats }
    }

    /// Every shape-filtered candidate across the sweep, in scan order,
    /// before size rules are applied.
    pub fn find_candidates(&self, image: &DynamicImage) -> Vec<Candidate> {
        if image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }
        self.sweep_candidates(image).0
    }

    /// Diagnostic overlay of candidates on the configured debug edge map.
    /// An empty image yields an empty overlay.
    pub fn debug_squares(&self, image: &DynamicImage) -> RgbImage {
        if image.width() == 0 || image.height() == 0 {
            warn!("Empty image; skipping debug overlay");
            return RgbImage::new(image.width(), image.height());
        }
        render_candidates(&to_grayscale(image), &self.config)
    }

    // -- Internals ------------------------------------------------------------

    fn sweep_candidates(&self, image: &DynamicImage) -> (Vec<Candidate>, SweepStats) {
        let gray = to_grayscale(image);
        let filter = &self.config.filter;

        let per_pass = sweep(&gray, &self.config.sweep, |pass| {
            (pass.contours.len(), collect_candidates(&pass, filter))
        });

        let mut stats = SweepStats {
            edge_maps: per_pass.len(),
            ..SweepStats::default()
        };
        let mut candidates = Vec::new();
        for (contours, found) in per_pass {
            stats.contours += contours;
            stats.candidates += found.len();
            candidates.extend(found);
        }
        debug!(
            edge_maps = stats.edge_maps,
            contours = stats.contours,
            candidates = stats.candidates,
            "Sweep complete"
        );
        (candidates, stats)
    }

    fn fallback(&self, width: u32, height: u32) -> Quadrilateral {
        match self.config.selection.fallback {
            NoDetectionFallback::Sentinel => Quadrilateral::SENTINEL,
            NoDetectionFallback::FullFrame => Quadrilateral::full_frame(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;
    use kantenwerk_core::KantenwerkError;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Small sweep so unit tests stay quick.
    fn quick_config() -> DetectorConfig {
        let mut config = DetectorConfig::default();
        config.sweep.blur_levels = vec![5];
        config.sweep.threshold_levels = vec![50, 130];
        config
    }

    fn document(width: u32, height: u32, corners: &[(i32, i32)]) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
        let poly: Vec<Point<i32>> = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
        draw_polygon_mut(&mut img, &poly, Rgb([255, 255, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = DetectorConfig::default();
        config.sweep.blur_levels = vec![4];
        assert!(matches!(
            EdgeDetector::new(config),
            Err(KantenwerkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_sized_image_is_sentinel() {
        let detector = EdgeDetector::default();
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let detection = detector.detect_with_report(&empty);
        assert!(detection.quad.is_sentinel());
        assert!(!detection.found);
        assert_eq!(detection.stats, SweepStats::default());
        assert!(detector.detect_normalized(&empty).is_sentinel());
        assert!(detector.find_candidates(&empty).is_empty());
    }

    #[test]
    fn blank_image_is_sentinel() {
        init_tracing();
        let detector = EdgeDetector::new(quick_config()).expect("valid");
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 150, Luma([180u8])));
        let detection = detector.detect_with_report(&blank);
        assert!(detection.quad.is_sentinel());
        assert_eq!(detection.stats.edge_maps, 2);
        assert_eq!(detection.stats.candidates, 0);

        let json = serde_json::to_value(detection.stats).expect("serialize");
        assert_eq!(json["edge_maps"], 2);
    }

    #[test]
    fn full_frame_fallback_is_opt_in() {
        let mut config = quick_config();
        config.selection.fallback = NoDetectionFallback::FullFrame;
        let detector = EdgeDetector::new(config).expect("valid");
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(120, 80, Luma([10u8])));
        let detection = detector.detect_with_report(&blank);
        assert!(!detection.found);
        assert_eq!(detection.quad, Quadrilateral::full_frame(120, 80));
    }

    #[test]
    fn detects_rectangle_document() {
        init_tracing();
        let detector = EdgeDetector::new(quick_config()).expect("valid");
        let image = document(400, 300, &[(60, 50), (340, 50), (340, 250), (60, 250)]);
        let detection = detector.detect_with_report(&image);
        assert!(detection.found);

        let [tl, tr, bl, br] = detection.quad.points;
        for (got, want) in [(tl, (60, 50)), (tr, (340, 50)), (bl, (60, 250)), (br, (340, 250))] {
            assert!(
                (got.x - want.0).abs() <= 6 && (got.y - want.1).abs() <= 6,
                "corner {:?} too far from {:?}",
                got,
                want
            );
        }
    }

    #[test]
    fn detection_is_deterministic() {
        let detector = EdgeDetector::new(quick_config()).expect("valid");
        let image = document(320, 240, &[(50, 40), (270, 50), (260, 200), (45, 195)]);
        let first = detector.detect(&image);
        let second = detector.detect(&image);
        assert_eq!(first, second);
    }

    #[test]
    fn find_candidates_includes_unsized_shapes() {
        let detector = EdgeDetector::new(quick_config()).expect("valid");
        // 40x40 square: passes the 1000 px² area floor but not the 1/5 size floor.
        let image = document(400, 400, &[(20, 20), (60, 20), (60, 60), (20, 60)]);
        assert!(!detector.find_candidates(&image).is_empty());
        assert!(detector.detect(&image).is_sentinel());
    }

    #[test]
    fn debug_squares_matches_input_size() {
        let detector = EdgeDetector::new(quick_config()).expect("valid");
        let image = document(200, 160, &[(30, 30), (170, 30), (170, 130), (30, 130)]);
        let overlay = detector.debug_squares(&image);
        assert_eq!(overlay.dimensions(), (200, 160));
    }

    #[test]
    fn debug_squares_on_empty_image_is_empty() {
        let detector = EdgeDetector::default();
        for (w, h) in [(0, 0), (0, 7), (7, 0)] {
            let empty = DynamicImage::ImageRgb8(RgbImage::new(w, h));
            assert_eq!(detector.debug_squares(&empty).dimensions(), (w, h));
        }
    }

    #[test]
    fn tiny_images_are_sentinel() {
        let detector = EdgeDetector::new(quick_config()).expect("valid");
        for (w, h) in [(1, 1), (2, 2), (1, 5), (5, 1), (3, 3)] {
            let tiny = DynamicImage::ImageRgb8(RgbImage::new(w, h));
            assert!(detector.detect(&tiny).is_sentinel(), "{}x{}", w, h);
        }
    }
}
