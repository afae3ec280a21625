// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kantenwerk.
//
// The detection core itself never fails (an undetected document is the
// all-zero sentinel quadrilateral). These errors cover the surfaces around it:
// raw buffers, image I/O, configuration and the perspective crop.

use thiserror::Error;

/// Top-level error type for all Kantenwerk operations.
#[derive(Debug, Error)]
pub enum KantenwerkError {
    // -- Input errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    // -- Configuration --
    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),

    // -- Crop --
    #[error("no document detected; refusing to transform with sentinel corners")]
    NoDocumentDetected,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KantenwerkError>;
