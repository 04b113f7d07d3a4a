//! Dominant hue analysis.
//!
//! Builds a circular hue histogram over the chromatic pixels of an image,
//! smooths it, and returns the peak hues ordered by pixel mass. The result
//! is used upstream of a fill to propose seed colors; it never touches a
//! repaint mask.
//!
//! ## Supported Formats
//!
//! - **RGB (3 channels)** and **RGBA (4 channels)**; alpha is ignored
//! - Grayscale input is rejected (hue is undefined)

use ndarray::parallel::prelude::*;
use ndarray::{ArrayView3, Axis};

use crate::error::{RepaintError, Result};

/// Number of histogram bins (one per degree).
pub const HUE_BINS: usize = 360;

// ============================================================================
// Color Space Conversion
// ============================================================================

/// Convert RGB to HSV.
/// Input: r, g, b in 0.0-1.0
/// Output: (h, s, v) where h is 0.0-360.0, s and v are 0.0-1.0
#[inline]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let v = max;

    if d.abs() < 1e-6 {
        return (0.0, 0.0, v);
    }

    let s = if max > 0.0 { d / max } else { 0.0 };

    let h = if (max - r).abs() < 1e-6 {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h * 60.0
    } else if (max - g).abs() < 1e-6 {
        ((b - r) / d + 2.0) * 60.0
    } else {
        ((r - g) / d + 4.0) * 60.0
    };

    (h, s, v)
}

// ============================================================================
// Options
// ============================================================================

/// Tuning for [`find_hues_with`].
#[derive(Debug, Clone)]
pub struct HueOptions {
    /// Pixels below this saturation are treated as achromatic and skipped
    pub min_saturation: f32,
    /// Pixels below this value (brightness) are skipped
    pub min_value: f32,
    /// Half-width of the circular box filter, in bins
    pub smoothing_radius: usize,
    /// Peaks holding less than this fraction of chromatic pixels are dropped
    pub min_fraction: f32,
    /// Maximum number of hues returned
    pub max_hues: usize,
}

impl Default for HueOptions {
    fn default() -> Self {
        Self {
            min_saturation: 0.15,
            min_value: 0.15,
            smoothing_radius: 2,
            min_fraction: 0.01,
            max_hues: 8,
        }
    }
}

impl HueOptions {
    pub fn with_min_saturation(mut self, min_saturation: f32) -> Self {
        self.min_saturation = min_saturation;
        self
    }

    pub fn with_min_value(mut self, min_value: f32) -> Self {
        self.min_value = min_value;
        self
    }

    pub fn with_smoothing_radius(mut self, smoothing_radius: usize) -> Self {
        self.smoothing_radius = smoothing_radius;
        self
    }

    pub fn with_min_fraction(mut self, min_fraction: f32) -> Self {
        self.min_fraction = min_fraction;
        self
    }

    pub fn with_max_hues(mut self, max_hues: usize) -> Self {
        self.max_hues = max_hues;
        self
    }
}

// ============================================================================
// Histogram
// ============================================================================

/// Count chromatic pixels per integer hue degree.
pub fn hue_histogram(image: ArrayView3<u8>, options: &HueOptions) -> Result<Vec<u64>> {
    let channels = image.dim().2;
    if channels != 3 && channels != 4 {
        return Err(RepaintError::InvalidChannel {
            expected: "3 (RGB) or 4 (RGBA)",
            actual: channels,
        });
    }

    let histogram = image
        .axis_iter(Axis(0))
        .into_par_iter()
        .fold(
            || vec![0u64; HUE_BINS],
            |mut hist, row| {
                for px in row.outer_iter() {
                    let r = px[0] as f32 / 255.0;
                    let g = px[1] as f32 / 255.0;
                    let b = px[2] as f32 / 255.0;
                    let (h, s, v) = rgb_to_hsv(r, g, b);
                    if s < options.min_saturation || v < options.min_value {
                        continue;
                    }
                    hist[(h.round() as usize) % HUE_BINS] += 1;
                }
                hist
            },
        )
        .reduce(
            || vec![0u64; HUE_BINS],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );

    Ok(histogram)
}

/// Circular box filter over a hue histogram.
pub fn smooth_histogram(histogram: &[u64], radius: usize) -> Vec<u64> {
    let n = histogram.len();
    if n == 0 || radius == 0 {
        return histogram.to_vec();
    }
    let r = radius.min(n / 2) as isize;

    (0..n as isize)
        .map(|i| {
            (-r..=r)
                .map(|k| histogram[(i + k).rem_euclid(n as isize) as usize])
                .sum()
        })
        .collect()
}

#[inline]
fn circular_distance(a: usize, b: usize) -> usize {
    let d = a.abs_diff(b);
    d.min(HUE_BINS - d)
}

// ============================================================================
// Dominant Hues
// ============================================================================

/// Dominant hues of an image with default options.
///
/// # Returns
/// Integer hues in degrees (0-359), most frequent first. Empty when the
/// image has no chromatic pixels.
pub fn find_hues(image: ArrayView3<u8>) -> Result<Vec<i32>> {
    find_hues_with(image, &HueOptions::default())
}

/// Dominant hues of an image.
///
/// Peaks are picked greedily from the smoothed histogram: the heaviest bin
/// wins (ties go to the larger raw count, then the lower hue) and suppresses
/// every bin within twice the smoothing radius.
pub fn find_hues_with(image: ArrayView3<u8>, options: &HueOptions) -> Result<Vec<i32>> {
    let raw = hue_histogram(image, options)?;
    let chromatic: u64 = raw.iter().sum();
    if chromatic == 0 {
        return Ok(Vec::new());
    }

    let smoothed = smooth_histogram(&raw, options.smoothing_radius);

    let mut order: Vec<usize> = (0..HUE_BINS).filter(|&i| smoothed[i] > 0).collect();
    order.sort_by(|&a, &b| {
        smoothed[b]
            .cmp(&smoothed[a])
            .then(raw[b].cmp(&raw[a]))
            .then(a.cmp(&b))
    });

    let suppress = 2 * options.smoothing_radius;
    let min_mass = options.min_fraction.max(0.0) as f64 * chromatic as f64;
    let mut peaks: Vec<usize> = Vec::new();

    for bin in order {
        if peaks.len() >= options.max_hues {
            break;
        }
        if (smoothed[bin] as f64) < min_mass {
            break;
        }
        if peaks.iter().any(|&p| circular_distance(p, bin) <= suppress) {
            continue;
        }
        peaks.push(bin);
    }

    log::debug!(
        "find_hues: {} chromatic pixels, {} peaks {:?}",
        chromatic,
        peaks.len(),
        peaks
    );

    Ok(peaks.into_iter().map(|h| h as i32).collect())
}
