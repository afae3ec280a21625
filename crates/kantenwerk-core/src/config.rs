// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detector configuration: sweep tables, candidate filter limits, selection
// size rules and the diagnostic edge map parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KantenwerkError, Result};

/// Full set of tunables for one detection run.
///
/// The defaults reproduce the production sweep of 4 blur strengths by 5
/// threshold levels. Tests and benchmarks usually shrink the sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub sweep: SweepConfig,
    pub filter: FilterConfig,
    pub selection: SelectionConfig,
    pub debug: DebugConfig,
}

/// Parameter space of the edge-map sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Median blur kernel sizes (odd), scanned in this order.
    pub blur_levels: Vec<u32>,
    /// Low Canny thresholds, scanned in this order for every blur level.
    pub threshold_levels: Vec<u32>,
    /// High Canny threshold as a multiple of the low one.
    pub high_threshold_ratio: f32,
    /// Compute edge maps on the rayon pool. Merge order is unaffected.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            blur_levels: vec![5, 11, 15, 21],
            threshold_levels: vec![50, 70, 90, 110, 130],
            high_threshold_ratio: 3.0,
            parallel: true,
        }
    }
}

impl SweepConfig {
    /// Every (blur, threshold) pair in scan order: blur-major, both ascending
    /// as listed.
    pub fn pairs(&self) -> Vec<(u32, u32)> {
        self.blur_levels
            .iter()
            .flat_map(|&blur| self.threshold_levels.iter().map(move |&t| (blur, t)))
            .collect()
    }
}

/// Geometric acceptance rules for polygon candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_ratio: f64,
    /// Polygon area (px²) that a candidate must exceed.
    pub min_area: f64,
    /// Largest |cos| allowed at any corner.
    pub max_corner_cosine: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            approx_epsilon_ratio: 0.02,
            min_area: 1000.0,
            max_corner_cosine: 0.3,
        }
    }
}

/// What to return when no candidate survives selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDetectionFallback {
    /// The all-zero quadrilateral.
    #[default]
    Sentinel,
    /// The four image corners.
    FullFrame,
}

/// Size plausibility rules for the candidate selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Candidates narrower than `image_width / min_size_divisor` (integer
    /// division) are dropped; same for height.
    pub min_size_divisor: u32,
    /// Candidates wider than this fraction of the image width are dropped as
    /// frame-border artifacts; same for height.
    pub max_size_ratio: f64,
    pub fallback: NoDetectionFallback,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_size_divisor: 5,
            max_size_ratio: 0.99,
            fallback: NoDetectionFallback::Sentinel,
        }
    }
}

/// The single edge map rendered by the diagnostic visualizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub blur_level: u32,
    pub threshold_level: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            blur_level: 11,
            threshold_level: 130,
        }
    }
}

impl DetectorConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reject parameter combinations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let sweep = &self.sweep;
        if sweep.blur_levels.is_empty() {
            return Err(invalid("blur_levels must not be empty"));
        }
        if sweep.threshold_levels.is_empty() {
            return Err(invalid("threshold_levels must not be empty"));
        }
        for &blur in sweep.blur_levels.iter().chain(std::iter::once(&self.debug.blur_level)) {
            check_blur(blur)?;
        }
        if sweep
            .threshold_levels
            .iter()
            .chain(std::iter::once(&self.debug.threshold_level))
            .any(|&t| t == 0)
        {
            return Err(invalid("threshold levels must be positive"));
        }
        if !(sweep.high_threshold_ratio.is_finite() && sweep.high_threshold_ratio >= 1.0) {
            return Err(invalid(format!(
                "high_threshold_ratio must be >= 1, got {}",
                sweep.high_threshold_ratio
            )));
        }

        let filter = &self.filter;
        if !(filter.approx_epsilon_ratio > 0.0 && filter.approx_epsilon_ratio < 1.0) {
            return Err(invalid(format!(
                "approx_epsilon_ratio must be in (0, 1), got {}",
                filter.approx_epsilon_ratio
            )));
        }
        if !(filter.min_area.is_finite() && filter.min_area >= 0.0) {
            return Err(invalid("min_area must be a non-negative number"));
        }
        if !(filter.max_corner_cosine > 0.0 && filter.max_corner_cosine <= 1.0) {
            return Err(invalid(format!(
                "max_corner_cosine must be in (0, 1], got {}",
                filter.max_corner_cosine
            )));
        }

        let selection = &self.selection;
        if selection.min_size_divisor == 0 {
            return Err(invalid("min_size_divisor must be at least 1"));
        }
        if !(selection.max_size_ratio > 0.0 && selection.max_size_ratio <= 1.0) {
            return Err(invalid(format!(
                "max_size_ratio must be in (0, 1], got {}",
                selection.max_size_ratio
            )));
        }
        Ok(())
    }
}

fn check_blur(blur: u32) -> Result<()> {
    if blur < 3 || blur % 2 == 0 {
        return Err(invalid(format!(
            "blur level {blur} must be an odd kernel size >= 3"
        )));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> KantenwerkError {
    KantenwerkError::InvalidConfig(msg.into())
}
