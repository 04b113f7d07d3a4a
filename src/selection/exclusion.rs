//! Exclusion masks: pixels that must never be painted.
//!
//! An exclusion mask is read-only once built and is shared by reference
//! counting, so several repaint layers over the same photo can hold one
//! mask without copying it.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2, ArrayView3, Zip};

use crate::error::{RepaintError, Result};
use crate::filters::alpha::foreground_mask;

/// Derive an exclusion mask from an image's own content.
///
/// RGBA and 1-channel buffers exclude where alpha > 0 (already painted or
/// protected areas); RGB buffers exclude wherever any channel is non-zero.
///
/// # Returns
/// Mask shaped (height, width) with 255 = excluded
pub fn exclusion_mask_from_image(image: ArrayView3<u8>) -> Result<Array2<u8>> {
    foreground_mask(image)
}

/// Shared, immutable binary mask aligned to a working image.
#[derive(Debug, Clone)]
pub struct ExclusionMask {
    mask: Arc<Array2<u8>>,
}

impl ExclusionMask {
    /// Wrap a (height, width) plane; any non-zero value means excluded.
    pub fn from_mask(mask: Array2<u8>) -> Self {
        Self {
            mask: Arc::new(mask),
        }
    }

    /// Build from an image via [`exclusion_mask_from_image`].
    pub fn from_image(image: ArrayView3<u8>) -> Result<Self> {
        Ok(Self::from_mask(exclusion_mask_from_image(image)?))
    }

    pub fn width(&self) -> usize {
        self.mask.dim().1
    }

    pub fn height(&self) -> usize {
        self.mask.dim().0
    }

    /// True for a zero-sized mask, which hosts use to mean "no exclusion".
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.mask.view()
    }

    #[inline]
    pub fn is_excluded(&self, x: usize, y: usize) -> bool {
        self.mask[[y, x]] > 0
    }

    pub fn excluded_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v > 0).count()
    }

    /// Fail unless this mask is exactly `width x height`.
    pub fn check_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if self.width() != width || self.height() != height {
            return Err(RepaintError::InvalidDimensions {
                expected: (width, height),
                actual: (self.width(), self.height()),
            });
        }
        Ok(())
    }

    /// Clear every excluded pixel from `mask`.
    pub fn apply(&self, mask: &mut Array2<u8>) -> Result<()> {
        let (height, width) = mask.dim();
        self.check_dimensions(width, height)?;
        self.clear_from(mask);
        Ok(())
    }

    /// [`apply`](Self::apply) for a mask already known to match in size.
    pub(crate) fn clear_from(&self, mask: &mut Array2<u8>) {
        Zip::from(mask).and(&*self.mask).for_each(|m, &e| {
            if e > 0 {
                *m = 0;
            }
        });
    }

    /// Whether two handles point at the same shared buffer.
    pub fn shares_buffer_with(&self, other: &ExclusionMask) -> bool {
        Arc::ptr_eq(&self.mask, &other.mask)
    }
}

impl From<Array2<u8>> for ExclusionMask {
    fn from(mask: Array2<u8>) -> Self {
        Self::from_mask(mask)
    }
}
