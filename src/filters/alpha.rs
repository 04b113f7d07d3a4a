//! Alpha channel utilities: inversion, foreground masks and
//! "over" compositing.
//!
//! ## Supported Formats
//!
//! - **Alpha mask (1 channel)**: the single channel is the alpha
//! - **RGB (3 channels)**: no alpha; foreground is any non-black pixel
//! - **RGBA (4 channels)**: channel 3 is the alpha

use ndarray::{Array2, ArrayView3, ArrayViewMut3, Axis, Zip};

use crate::error::{RepaintError, Result};

/// Invert the alpha channel in place (`a -> 255 - a`).
///
/// Flips "protect" and "allow" semantics of a hand-drawn mask. Applying it
/// twice restores the original buffer exactly.
pub fn invert_alpha(mut image: ArrayViewMut3<u8>) -> Result<()> {
    let channels = image.dim().2;
    let alpha_index = match channels {
        4 => 3,
        1 => 0,
        _ => {
            return Err(RepaintError::InvalidChannel {
                expected: "4 (RGBA) or 1 (alpha)",
                actual: channels,
            })
        }
    };

    image
        .index_axis_mut(Axis(2), alpha_index)
        .mapv_inplace(|a| 255 - a);
    Ok(())
}

/// Binary plane marking the "on" pixels of an image (255 = on).
///
/// RGBA and 1-channel buffers use alpha > 0; RGB buffers use any channel > 0.
pub fn foreground_mask(image: ArrayView3<u8>) -> Result<Array2<u8>> {
    let (height, width, channels) = image.dim();
    let mut mask = Array2::<u8>::zeros((height, width));

    match channels {
        1 | 4 => {
            let alpha = image.index_axis(Axis(2), channels - 1);
            Zip::from(&mut mask).and(&alpha).for_each(|m, &a| {
                if a > 0 {
                    *m = 255;
                }
            });
        }
        3 => {
            Zip::from(&mut mask)
                .and(image.lanes(Axis(2)))
                .for_each(|m, px| {
                    if px.iter().any(|&v| v > 0) {
                        *m = 255;
                    }
                });
        }
        _ => {
            return Err(RepaintError::InvalidChannel {
                expected: "1, 3 or 4",
                actual: channels,
            })
        }
    }

    Ok(mask)
}

/// Blend color onto an RGBA pixel using alpha.
///
/// Uses Porter-Duff "over" compositing.
#[inline]
pub fn blend_over_u8(dst: &mut [u8], src_r: u8, src_g: u8, src_b: u8, src_a: u8) {
    if src_a == 0 {
        return;
    }
    if src_a == 255 {
        dst[0] = src_r;
        dst[1] = src_g;
        dst[2] = src_b;
        dst[3] = 255;
        return;
    }

    let src_af = src_a as f32 / 255.0;
    let dst_af = dst[3] as f32 / 255.0;
    let out_a = src_af + dst_af * (1.0 - src_af);

    if out_a > 0.0 {
        dst[0] = ((src_r as f32 * src_af + dst[0] as f32 * dst_af * (1.0 - src_af)) / out_a).round() as u8;
        dst[1] = ((src_g as f32 * src_af + dst[1] as f32 * dst_af * (1.0 - src_af)) / out_a).round() as u8;
        dst[2] = ((src_b as f32 * src_af + dst[2] as f32 * dst_af * (1.0 - src_af)) / out_a).round() as u8;
        dst[3] = (out_a * 255.0).round() as u8;
    }
}

/// Blend color onto an opaque RGB pixel.
#[inline]
pub fn blend_rgb_u8(dst: &mut [u8], src_r: u8, src_g: u8, src_b: u8, src_a: u8) {
    if src_a == 0 {
        return;
    }
    if src_a == 255 {
        dst[0] = src_r;
        dst[1] = src_g;
        dst[2] = src_b;
        return;
    }

    let t = src_a as f32 / 255.0;
    dst[0] = (src_r as f32 * t + dst[0] as f32 * (1.0 - t)).round() as u8;
    dst[1] = (src_g as f32 * t + dst[1] as f32 * (1.0 - t)).round() as u8;
    dst[2] = (src_b as f32 * t + dst[2] as f32 * (1.0 - t)).round() as u8;
}
