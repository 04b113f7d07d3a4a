//! WebAssembly exports for the repaint engine.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images travel as flat, row-major byte arrays of length
//! `width * height * channels`, with `channels` 3 (RGB) or 4 (RGBA).
//! Masks travel as flat `width * height` arrays, 255 = set.
//! Seeds travel as flat `[x, y, threshold, x, y, threshold, ...]` triples;
//! a negative threshold means "use the default".

use ndarray::{Array2, Array3, ArrayViewMut3};
use wasm_bindgen::prelude::*;

use crate::filters::{alpha, hue};
use crate::paint_mask::RepaintMask;
use crate::selection::{self, ExclusionMask, FillConfig, SeedCollection, SeedPoint};

fn image_from(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Array3<u8>, JsValue> {
    Array3::from_shape_vec((height, width, channels), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("invalid image buffer: {e}")))
}

fn seeds_from(seeds: &[f64]) -> Result<SeedCollection, JsValue> {
    if seeds.len() % 3 != 0 {
        return Err(JsValue::from_str("seeds must be (x, y, threshold) triples"));
    }
    Ok(seeds
        .chunks_exact(3)
        .map(|s| {
            if s[2] < 0.0 {
                SeedPoint::at(s[0], s[1])
            } else {
                SeedPoint::new(s[0], s[1], s[2] as f32)
            }
        })
        .collect())
}

fn exclusion_from(data: &[u8], width: usize, height: usize) -> Result<Option<ExclusionMask>, JsValue> {
    if data.is_empty() {
        return Ok(None);
    }
    let mask = Array2::from_shape_vec((height, width), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("invalid exclusion buffer: {e}")))?;
    Ok(Some(ExclusionMask::from_mask(mask)))
}

// ============================================================================
// Mask Computation
// ============================================================================

/// Union of the flood regions of all seeds, minus the exclusion mask.
///
/// # Arguments
/// * `data` - Flat RGB/RGBA bytes
/// * `width`, `height`, `channels` - Image shape
/// * `seeds` - Flat (x, y, threshold) triples
/// * `exclusion` - Flat `width * height` mask, or empty for none
///
/// # Returns
/// Flat `width * height` mask, 255 = selected
#[wasm_bindgen]
pub fn compute_mask_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    seeds: &[f64],
    exclusion: &[u8],
) -> Result<Vec<u8>, JsValue> {
    let image = image_from(data, width, height, channels)?;
    let seeds = seeds_from(seeds)?;
    let exclusion = exclusion_from(exclusion, width, height)?;

    let mask = selection::compute_mask(image.view(), &seeds, exclusion.as_ref(), &FillConfig::default())?;
    Ok(mask.into_raw_vec_and_offset().0)
}

/// Fill and paint in one call.
///
/// # Arguments
/// * `color` - Packed ARGB (0xAARRGGBB); alpha 0 paints opaque
/// * `freehand` - Flat `width * height` mask unioned with the fill, or empty
///
/// # Returns
/// Flat image bytes, same layout as the input
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn repaint_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    seeds: &[f64],
    exclusion: &[u8],
    freehand: &[u8],
    color: u32,
) -> Result<Vec<u8>, JsValue> {
    let mut paint = RepaintMask::new(image_from(data, width, height, channels)?)?;
    paint.set_areas(seeds_from(seeds)?)?;
    paint.set_exclusion_mask(exclusion_from(exclusion, width, height)?)?;
    if !freehand.is_empty() {
        let mask = Array2::from_shape_vec((height, width), freehand.to_vec())
            .map_err(|e| JsValue::from_str(&format!("invalid freehand buffer: {e}")))?;
        paint.set_freehand_mask(mask)?;
    }
    paint.set_color(color);

    let composed = paint.flood_image().to_owned();
    Ok(composed.into_raw_vec_and_offset().0)
}

// ============================================================================
// Mask Utilities
// ============================================================================

/// Exclusion mask from image content (alpha > 0, or non-black for RGB).
#[wasm_bindgen]
pub fn exclusion_mask_from_image_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsValue> {
    let image = image_from(data, width, height, channels)?;
    let mask = selection::exclusion_mask_from_image(image.view())?;
    Ok(mask.into_raw_vec_and_offset().0)
}

/// Invert alpha in place; `channels` must be 4 or 1.
#[wasm_bindgen]
pub fn invert_alpha_wasm(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), JsValue> {
    let view = ArrayViewMut3::from_shape((height, width, channels), data)
        .map_err(|e| JsValue::from_str(&format!("invalid image buffer: {e}")))?;
    alpha::invert_alpha(view)?;
    Ok(())
}

/// Foreground bounding rect as `[x, y, width, height]`; all zero if empty.
#[wasm_bindgen]
pub fn find_contour_rect_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u32>, JsValue> {
    let image = image_from(data, width, height, channels)?;
    let rect = selection::find_contour_rect(image.view())?;
    Ok(vec![rect.x as u32, rect.y as u32, rect.width as u32, rect.height as u32])
}

// ============================================================================
// Color Analysis
// ============================================================================

/// Dominant hues in integer degrees, most prominent first.
#[wasm_bindgen]
pub fn find_hues_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<i32>, JsValue> {
    let image = image_from(data, width, height, channels)?;
    Ok(hue::find_hues(image.view())?)
}
