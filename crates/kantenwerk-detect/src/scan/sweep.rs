// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-map sweep: one binary edge map per (median blur, Canny threshold)
// pair, each reduced to a flat list of traced contours.

use image::{DynamicImage, GrayImage};
use imageproc::contours::find_contours;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::median_filter;
use imageproc::morphology::dilate;
use imageproc::point::Point;
use kantenwerk_core::config::SweepConfig;
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

/// A closed boundary traced from an edge map.
pub type Contour = Vec<Point<i32>>;

/// The contours of one edge map, tagged with the parameters that produced it.
#[derive(Debug, Clone)]
pub struct EdgePass {
    pub blur: u32,
    pub threshold: u32,
    pub contours: Vec<Contour>,
}

/// Grayscale working copy shared by every sweep iteration.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Median blur with an odd `kernel` size (5 → 5x5 window).
pub fn median_blur(gray: &GrayImage, kernel: u32) -> GrayImage {
    if gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    let radius = kernel / 2;
    median_filter(gray, radius, radius)
}

/// Canny edges on an already blurred image, closed with one 3x3 dilation.
///
/// The result is binary: 255 on (thickened) edges, 0 elsewhere. An empty
/// input yields an empty map.
pub fn edge_map(blurred: &GrayImage, low: f32, high: f32) -> GrayImage {
    if blurred.width() == 0 || blurred.height() == 0 {
        return GrayImage::new(blurred.width(), blurred.height());
    }
    let edges = canny(blurred, low, high);
    dilate(&edges, Norm::LInf, 1)
}

/// Full single-pair pipeline: blur, Canny with `high = low * ratio`, dilate.
pub fn edge_map_for(gray: &GrayImage, blur: u32, threshold: u32, ratio: f32) -> GrayImage {
    let low = threshold as f32;
    edge_map(&median_blur(gray, blur), low, low * ratio)
}

/// Trace every border in a binary map, outer and hole alike, as a flat list.
pub fn extract_contours(edges: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(edges)
        .into_iter()
        .map(|contour| contour.points)
        .collect()
}

/// Run the sweep over `gray` and hand every edge pass to `visit`.
///
/// Results come back in scan order (blur-major, then threshold, as listed in
/// `config`) whether or not the passes ran in parallel.
#[instrument(skip_all, fields(
    width = gray.width(),
    height = gray.height(),
    blurs = config.blur_levels.len(),
    thresholds = config.threshold_levels.len(),
))]
pub fn sweep<T, F>(gray: &GrayImage, config: &SweepConfig, visit: F) -> Vec<T>
where
    T: Send,
    F: Fn(EdgePass) -> T + Sync,
{
    let blur_once = |&blur: &u32| (blur, median_blur(gray, blur));
    let blurred: Vec<(u32, GrayImage)> = if config.parallel {
        config.blur_levels.par_iter().map(blur_once).collect()
    } else {
        config.blur_levels.iter().map(blur_once).collect()
    };
    debug!(levels = blurred.len(), "Median blur levels prepared");

    let passes: Vec<(&(u32, GrayImage), u32)> = blurred
        .iter()
        .flat_map(|level| config.threshold_levels.iter().map(move |&t| (level, t)))
        .collect();

    let run = |&(level, threshold): &(&(u32, GrayImage), u32)| {
        let (blur, blurred) = (level.0, &level.1);
        let low = threshold as f32;
        let edges = edge_map(blurred, low, low * config.high_threshold_ratio);
        let contours = extract_contours(&edges);
        trace!(blur, threshold, contours = contours.len(), "Edge pass traced");
        visit(EdgePass {
            blur,
            threshold,
            contours,
        })
    };

    if config.parallel {
        passes.par_iter().map(run).collect()
    } else {
        passes.iter().map(run).collect()
    }
}
