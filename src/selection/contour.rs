//! Mask post-processing: bounding rectangles and coverage.
//!
//! An empty region is a normal result here: the zero rectangle and zero
//! coverage, never an error.

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

use crate::error::Result;
use crate::filters::alpha::foreground_mask;

/// Axis-aligned integer rectangle; `Rect::ZERO` means "no region".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Bounding rectangle of the non-zero pixels of a 2-D mask.
pub fn find_mask_rect(mask: ArrayView2<u8>) -> Rect {
    let (height, width) = mask.dim();

    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (y, row) in mask.axis_iter(Axis(0)).enumerate() {
        let mut first = None;
        let mut last = 0;
        for (x, &v) in row.iter().enumerate() {
            if v > 0 {
                first.get_or_insert(x);
                last = x;
            }
        }
        if let Some(first) = first {
            any = true;
            min_x = min_x.min(first);
            max_x = max_x.max(last);
            min_y = min_y.min(y);
            max_y = y;
        }
    }

    if !any {
        return Rect::ZERO;
    }
    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Bounding rectangle of the foreground of an image or mask buffer.
///
/// RGBA and 1-channel buffers count pixels with alpha > 0; RGB buffers count
/// any non-black pixel.
pub fn find_contour_rect(image: ArrayView3<u8>) -> Result<Rect> {
    let mask = foreground_mask(image)?;
    Ok(find_mask_rect(mask.view()))
}

/// Number of selected pixels in a mask.
pub fn selected_count(mask: ArrayView2<u8>) -> usize {
    mask.iter().filter(|&&v| v > 0).count()
}

/// Fraction of mask pixels that are selected, 0.0-1.0.
pub fn mask_coverage(mask: ArrayView2<u8>) -> f32 {
    let total = mask.len();
    if total == 0 {
        return 0.0;
    }
    (selected_count(mask) as f64 / total as f64) as f32
}

/// Union `b` into `a`; any non-zero pixel of `b` becomes 255.
pub fn union_masks(mut a: Array2<u8>, b: ArrayView2<u8>) -> Array2<u8> {
    a.zip_mut_with(&b, |o, &v| {
        if v > 0 {
            *o = 255;
        }
    });
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_empty_mask() {
        let mask = Array2::<u8>::zeros((10, 10));
        assert_eq!(find_mask_rect(mask.view()), Rect::ZERO);
        assert!(Rect::ZERO.is_empty());
        assert_eq!(mask_coverage(mask.view()), 0.0);
    }

    #[test]
    fn test_full_mask() {
        let mask = Array2::<u8>::from_elem((10, 10), 255);
        assert_eq!(find_mask_rect(mask.view()), Rect::new(0, 0, 10, 10));
        assert_eq!(mask_coverage(mask.view()), 1.0);
    }

    #[test]
    fn test_single_pixel() {
        let mut mask = Array2::<u8>::zeros((5, 5));
        mask[[3, 1]] = 255;
        assert_eq!(find_mask_rect(mask.view()), Rect::new(1, 3, 1, 1));
    }

    #[test]
    fn test_rectangle() {
        // 10x10 mask with 4x3 rectangle
        let mut mask = Array2::<u8>::zeros((10, 10));
        for y in 2..5 {
            for x in 3..7 {
                mask[[y, x]] = 255;
            }
        }
        let rect = find_mask_rect(mask.view());
        assert_eq!(rect, Rect::new(3, 2, 4, 3));
        assert!(rect.contains(6, 4));
        assert!(!rect.contains(7, 4));
    }

    #[test]
    fn test_scattered_pixels() {
        let mut mask = Array2::<u8>::zeros((8, 8));
        mask[[1, 6]] = 1;
        mask[[5, 2]] = 1;
        assert_eq!(find_mask_rect(mask.view()), Rect::new(2, 1, 5, 5));
    }

    #[test]
    fn test_transparent_image() {
        let mut img = Array3::<u8>::zeros((4, 4, 4));
        // Color without alpha is not foreground
        img[[0, 0, 0]] = 255;
        assert_eq!(find_contour_rect(img.view()).unwrap(), Rect::ZERO);

        img[[2, 3, 3]] = 10;
        assert_eq!(find_contour_rect(img.view()).unwrap(), Rect::new(3, 2, 1, 1));
    }

    #[test]
    fn test_union() {
        let mut a = Array2::<u8>::zeros((2, 2));
        let mut b = Array2::<u8>::zeros((2, 2));
        a[[0, 0]] = 255;
        b[[1, 1]] = 7;
        let u = union_masks(a, b.view());
        assert_eq!(selected_count(u.view()), 2);
        assert_eq!(u[[1, 1]], 255);
    }
}
