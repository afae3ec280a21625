// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagnostic overlay: the rotated bounding box of every shape-filtered
// candidate, drawn over a single edge map.

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::geometry::min_area_rect;
use kantenwerk_core::DetectorConfig;
use tracing::{debug, instrument};

use crate::scan::candidate::collect_candidates;
use crate::scan::sweep::{EdgePass, edge_map_for, extract_contours};

const OUTLINE_COLOUR: Rgb<u8> = Rgb([0, 0, 255]);

/// Render the debug edge map (see `DebugConfig`) in colour with every
/// candidate's minimum-area rectangle outlined in blue.
///
/// Candidates are not size-filtered, so frame-border and tiny shapes show up
/// too. Nothing here feeds the selector.
#[instrument(skip_all, fields(
    blur = config.debug.blur_level,
    threshold = config.debug.threshold_level,
))]
pub fn render_candidates(gray: &GrayImage, config: &DetectorConfig) -> RgbImage {
    if gray.width() == 0 || gray.height() == 0 {
        debug!("Empty image; nothing to render");
        return RgbImage::new(gray.width(), gray.height());
    }
    let (blur, threshold) = (config.debug.blur_level, config.debug.threshold_level);
    let edges = edge_map_for(gray, blur, threshold, config.sweep.high_threshold_ratio);

    let pass = EdgePass {
        blur,
        threshold,
        contours: extract_contours(&edges),
    };
    let candidates = collect_candidates(&pass, &config.filter);
    debug!(
        contours = pass.contours.len(),
        candidates = candidates.len(),
        "Debug edge map traced"
    );

    let mut canvas = DynamicImage::ImageLuma8(edges).to_rgb8();
    for candidate in &candidates {
        let rect = min_area_rect(&candidate.points);
        for i in 0..4 {
            let (a, b) = (rect[i], rect[(i + 1) % 4]);
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                OUTLINE_COLOUR,
            );
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn overlay_has_input_dimensions_and_blue_outline() {
        let mut gray = GrayImage::from_pixel(300, 200, Luma([0u8]));
        draw_filled_rect_mut(&mut gray, Rect::at(60, 40).of_size(180, 120), Luma([255u8]));

        let overlay = render_candidates(&gray, &DetectorConfig::default());
        assert_eq!(overlay.dimensions(), (300, 200));
        assert!(overlay.pixels().any(|p| *p == OUTLINE_COLOUR));
        // Edge pixels survive as white.
        assert!(overlay.pixels().any(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn empty_input_renders_empty_overlay() {
        for (w, h) in [(0, 0), (0, 7), (7, 0)] {
            let overlay = render_candidates(&GrayImage::new(w, h), &DetectorConfig::default());
            assert_eq!(overlay.dimensions(), (w, h));
        }
    }

    #[test]
    fn blank_input_renders_black() {
        let gray = GrayImage::from_pixel(64, 64, Luma([90u8]));
        let overlay = render_candidates(&gray, &DetectorConfig::default());
        assert!(overlay.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
