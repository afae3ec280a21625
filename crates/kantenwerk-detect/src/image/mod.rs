// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: decoding, raw buffer wrapping, saving, and the perspective
// crop applied once corners are known.

pub mod crop;
pub mod io;

pub use crop::{crop_and_transform, crop_detection, crop_quadrilateral};
pub use io::{decode_image, encode_png, image_from_raw, open_image, save_image};
