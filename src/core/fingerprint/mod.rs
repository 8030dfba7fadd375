//! # Fingerprint Engine
//!
//! Turns a pixel grid into a fixed-length, content-derived fingerprint
//! suitable for near-duplicate indexing.
//!
//! ## How It Works
//! 1. Grayscale the image and lay an 11x11 sampling grid over it
//! 2. Average the luminance of the 8-pixel-radius block around each cell
//!    center (121 grid means)
//! 3. Rescale the means to [-2, 2] and encode each cell's signed difference
//!    against its 8 compass neighbors (968-entry signature vector)
//! 4. Clamp and quantize to the ternary domain {0, 1, 2}
//! 5. Pack 63 overlapping 16-entry windows with base-3 positional weights
//! 6. Hex-encode the windows' code-point byte representation
//!
//! The result is a deterministic function of the input pixels only. The
//! zero-value grid produces the empty-string sentinel.

use super::grid::PixelGrid;
use super::hasher::{self, HashAlgorithm};
use super::stats;
use crate::error::HashError;
use image::DynamicImage;

/// Name the engine's results are keyed by in the output document.
pub const SIGNATURE_NAME: &str = "signature";

/// Cells per side of the sampling grid.
const GRID_SIZE: usize = 11;
/// Pixel radius of the block averaged around each cell center.
const NEIGHBOR_RADIUS: i64 = 8;
/// Entries per packed window.
const WINDOW_LEN: usize = 16;
/// Offset between consecutive window starts; windows overlap by 6 entries.
const WINDOW_STRIDE: usize = 10;
/// Number of packed windows. The last window starts at 620 and ends at 636,
/// inside the 968-entry vector by construction.
const WINDOW_COUNT: usize = 63;

/// Base-3 positional weights, `3^0 .. 3^15`.
const POWERS_OF_THREE: [i64; WINDOW_LEN] = [
    1, 3, 9, 27, 81, 243, 729, 2187, 6561, 19683, 59049, 177147, 531441, 1594323, 4782969,
    14348907,
];

/// Compass neighbors in fixed encoding order: top-left, top, top-right,
/// left, right, bottom-left, bottom, bottom-right.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Compute the hex fingerprint string for a grid.
pub fn compute_fingerprint(grid: &PixelGrid) -> String {
    hasher::to_hex(&compute_fingerprint_bytes(grid))
}

/// Compute the raw fingerprint bytes (the pre-hex byte sequence).
pub fn compute_fingerprint_bytes(grid: &PixelGrid) -> Vec<u8> {
    if grid.is_empty() {
        return Vec::new();
    }
    let means = grid_means(grid);
    let scaled = rescale_means(&means);
    let signature = signature_vector(&scaled);
    let quantized = quantize(&clamp_signature(&signature));
    pack_to_bytes(&pack_windows(&quantized))
}

/// Mean luminance of the block around each of the 121 cell centers.
///
/// Cell centers sit at `(m * x_pad + x_pad, k * y_pad + y_pad)` where the
/// pads are `(side / 11) - 1`. Blocks that fall outside the image (which
/// happens for images smaller than 99 px per side) contribute a mean of 0
/// instead of dividing by an empty pixel count.
pub(crate) fn grid_means(grid: &PixelGrid) -> Vec<f64> {
    let gray = grid.grayscale();
    let x_pad = (grid.width() as i64 / GRID_SIZE as i64) - 1;
    let y_pad = (grid.height() as i64 / GRID_SIZE as i64) - 1;
    let mut means = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    for k in 0..GRID_SIZE as i64 {
        let y = k * y_pad + y_pad;
        for m in 0..GRID_SIZE as i64 {
            let x = m * x_pad + x_pad;
            let block = gray.subregion(
                x - NEIGHBOR_RADIUS,
                y - NEIGHBOR_RADIUS,
                x + NEIGHBOR_RADIUS,
                y + NEIGHBOR_RADIUS,
            );
            let values = block.to_luminance_sequence();
            means.push(stats::mean(&values).unwrap_or(0.0));
        }
    }
    means
}

/// Rescale grid means from [0, 255] to [-2, 2], rounded to nearest.
///
/// The 8-bit domain constant is kept even though the luminance values are
/// computed from 16-bit-scale channel intensities; existing fingerprints
/// depend on the resulting saturation, so the constant must not be
/// "corrected" to the wider range.
pub(crate) fn rescale_means(means: &[f64]) -> Vec<i64> {
    means
        .iter()
        .map(|&mean| ((4.0 / 255.0) * (mean - 255.0) + 2.0).round() as i64)
        .collect()
}

/// Signed difference (neighbor - self) against each compass neighbor.
///
/// One entry per (cell, neighbor) pair in row-major cell order, 0 whenever
/// the neighbor falls outside the 11x11 grid.
pub(crate) fn signature_vector(means: &[i64]) -> Vec<i64> {
    let side = GRID_SIZE as i64;
    let mut vector = Vec::with_capacity(GRID_SIZE * GRID_SIZE * NEIGHBOR_OFFSETS.len());
    for y in 0..side {
        for x in 0..side {
            let center = means[(y * side + x) as usize];
            for (dy, dx) in NEIGHBOR_OFFSETS {
                let ny = y + dy;
                let nx = x + dx;
                if ny < 0 || nx < 0 || ny >= side || nx >= side {
                    vector.push(0);
                } else {
                    vector.push(means[(ny * side + nx) as usize] - center);
                }
            }
        }
    }
    vector
}

/// Clamp every signature entry to [-2, 2].
pub(crate) fn clamp_signature(signature: &[i64]) -> Vec<i64> {
    signature.iter().map(|&v| v.clamp(-2, 2)).collect()
}

/// Map clamped entries into the ternary domain {0, 1, 2}.
///
/// -2 folds to -1 and 2 folds to 1 before the +1 shift, so the extremes
/// land on the same values as the adjacent steps.
pub(crate) fn quantize(clamped: &[i64]) -> Vec<i64> {
    clamped
        .iter()
        .map(|&v| {
            let folded = match v {
                -2 => -1,
                2 => 1,
                other => other,
            };
            folded + 1
        })
        .collect()
}

/// Pack the quantized vector into 63 window values.
///
/// Window `j` covers the 16 entries starting at `10 * j` and is dotted with
/// the base-3 weights, yielding one integer in `[0, 3^16 - 1]` per window.
pub(crate) fn pack_windows(quantized: &[i64]) -> Vec<i64> {
    let mut packed = Vec::with_capacity(WINDOW_COUNT);
    for j in 0..WINDOW_COUNT {
        let start = j * WINDOW_STRIDE;
        let window = &quantized[start..start + WINDOW_LEN];
        packed.push(stats::integer_dot(&POWERS_OF_THREE, window).unwrap_or(0));
    }
    packed
}

/// Serialize packed window values to bytes.
///
/// Each window value is interpreted as a single Unicode code point and
/// UTF-8 encoded; values that are not valid scalar values (surrogates, and
/// everything above U+10FFFF - which most window values exceed, since they
/// range up to 3^16 - 1) encode as U+FFFD. The mapping is lossy, but it is
/// the byte layout existing fingerprint consumers index on, so it is
/// reproduced rather than widened.
pub(crate) fn pack_to_bytes(packed: &[i64]) -> Vec<u8> {
    let mut text = String::with_capacity(packed.len() * 4);
    for &value in packed {
        let code_point = u32::try_from(value).ok().and_then(char::from_u32);
        text.push(code_point.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    text.into_bytes()
}

/// The fingerprint engine as a registrable hash algorithm.
pub struct SignatureHasher;

impl HashAlgorithm for SignatureHasher {
    fn name(&self) -> &'static str {
        SIGNATURE_NAME
    }

    fn compute(&self, image: &DynamicImage) -> Result<Vec<u8>, HashError> {
        let grid = PixelGrid::from_image(image.clone());
        Ok(compute_fingerprint_bytes(&grid))
    }
}
