// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective crop: warp the region inside four detected corners onto an
// upright rectangle.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use kantenwerk_core::error::{KantenwerkError, Result};
use kantenwerk_core::{DetectionResult, Quadrilateral};
use tracing::{debug, info, instrument, warn};

/// Crop and rectify the region bounded by `corners`.
///
/// `corners` are pixel positions in canonical order
/// `[top_left, top_right, bottom_left, bottom_right]`. The output width is the
/// longer of the top and bottom edges, the height the longer of the left and
/// right edges.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn crop_and_transform(image: &DynamicImage, corners: [(f32, f32); 4]) -> Result<DynamicImage> {
    if corners.iter().any(|&(x, y)| !(x.is_finite() && y.is_finite())) {
        return Err(KantenwerkError::ImageError(format!(
            "crop corners must be finite, got {:?}",
            corners
        )));
    }
    let [tl, tr, bl, br] = corners;

    let out_w = distance(tl, tr).max(distance(bl, br)).round();
    let out_h = distance(tl, bl).max(distance(tr, br)).round();
    if !(out_w >= 1.0 && out_h >= 1.0) {
        warn!(out_w, out_h, "Degenerate crop region");
        return Err(KantenwerkError::ImageError(format!(
            "crop region collapses to {}x{}",
            out_w, out_h
        )));
    }
    // No edge between in-image corners is longer than the diagonal.
    let limit = (image.width() as f32).hypot(image.height() as f32).ceil();
    if out_w > limit || out_h > limit {
        warn!(out_w, out_h, limit, "Crop region exceeds source image");
        return Err(KantenwerkError::ImageError(format!(
            "crop region {}x{} exceeds the {}x{} source",
            out_w,
            out_h,
            image.width(),
            image.height()
        )));
    }
    let (out_w, out_h) = (out_w as u32, out_h as u32);

    // Projection maps source corners onto the output rectangle.
    let src = [tl, tr, br, bl];
    let dest: [(f32, f32); 4] = [
        (0.0, 0.0),
        (out_w as f32, 0.0),
        (out_w as f32, out_h as f32),
        (0.0, out_h as f32),
    ];
    let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
        KantenwerkError::ImageError("failed to compute projective transform".into())
    })?;
    debug!(out_w, out_h, "Projective transform computed");

    let rgba_input = image.to_rgba8();
    let default_pixel = Rgba([255u8, 255, 255, 255]);
    let mut output = RgbaImage::new(out_w, out_h);
    warp_into(
        &rgba_input,
        &projection,
        Interpolation::Bilinear,
        default_pixel,
        &mut output,
    );

    info!(out_w, out_h, "Perspective crop applied");
    Ok(DynamicImage::ImageRgba8(output))
}

/// Crop using a pixel-space detection. Refuses the sentinel.
pub fn crop_quadrilateral(image: &DynamicImage, quad: &Quadrilateral) -> Result<DynamicImage> {
    if quad.is_sentinel() {
        return Err(KantenwerkError::NoDocumentDetected);
    }
    let corners = quad.points.map(|p| (p.x as f32, p.y as f32));
    crop_and_transform(image, corners)
}

/// Crop using normalized corners scaled to this image. Refuses the sentinel
/// and any coordinate outside `[0, 1]`, NaN included.
pub fn crop_detection(image: &DynamicImage, detection: &DetectionResult) -> Result<DynamicImage> {
    if detection.is_sentinel() {
        return Err(KantenwerkError::NoDocumentDetected);
    }
    if let Some(corner) = detection
        .corners()
        .into_iter()
        .find(|c| !((0.0..=1.0).contains(&c.x) && (0.0..=1.0).contains(&c.y)))
    {
        return Err(KantenwerkError::ImageError(format!(
            "normalized corner ({}, {}) lies outside [0, 1]",
            corner.x, corner.y
        )));
    }
    crop_and_transform(image, detection.denormalize(image.width(), image.height()))
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
