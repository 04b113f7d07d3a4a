//! Recolor Rust Extensions
//!
//! Selective-region repaint: tap seeds on a photo, grow color-similar
//! regions from them, keep protected pixels out, and paint the result.
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Working images are u8 arrays shaped (height, width, channels):
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Masks are (height, width) u8 planes, 255 = selected / excluded, 0 = not.
//! Single-channel (height, width, 1) buffers are accepted wherever an
//! alpha-like mask is read.
//!
//! ## Pipeline
//! 1. [`selection::SeedCollection`] holds taps, each with optional tolerance
//! 2. [`selection::compute_mask`] unions the flood regions of all seeds
//! 3. An [`selection::ExclusionMask`] clears protected pixels
//! 4. [`RepaintMask`] caches the mask and composites the paint color

pub mod error;
pub mod filters;
pub mod paint_mask;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{RepaintError, Result};
pub use paint_mask::{suggested_coverage, MaskState, RepaintMask};
pub use selection::{
    compute_mask, exclusion_mask_from_image, find_contour_rect, ExclusionMask, FillConfig,
    Rect, SeedCollection, SeedPoint,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3, PyReadwriteArray3};
    use pyo3::prelude::*;

    use crate::filters::alpha;
    use crate::filters::hue;
    use crate::paint_mask::{self, RepaintMask};
    use crate::selection::{self, ExclusionMask, Rect, SeedCollection, SeedPoint};

    fn rect_tuple(rect: Rect) -> (usize, usize, usize, usize) {
        (rect.x, rect.y, rect.width, rect.height)
    }

    // ========================================================================
    // Paint Mask
    // ========================================================================

    /// Stateful repaint of one RGB or RGBA image.
    ///
    /// Seeds are `(x, y, threshold)` tuples in pixel coordinates; the
    /// threshold is 0.0-1.0, where 0 selects only the tapped pixel.
    #[pyclass(name = "PaintMask")]
    pub struct PyPaintMask {
        inner: RepaintMask,
    }

    #[pymethods]
    impl PyPaintMask {
        #[new]
        pub fn new(image: PyReadonlyArray3<'_, u8>) -> PyResult<Self> {
            let inner = RepaintMask::new(image.as_array().to_owned())?;
            Ok(Self { inner })
        }

        /// Replace all seeds. Raises ValueError if any seed is off-image.
        pub fn set_areas(&mut self, areas: Vec<(f64, f64, f32)>) -> PyResult<()> {
            let seeds: SeedCollection = areas
                .into_iter()
                .map(|(x, y, t)| SeedPoint::new(x, y, t))
                .collect();
            self.inner.set_areas(seeds)?;
            Ok(())
        }

        /// Current seeds; `None` threshold means "use the default".
        pub fn areas(&self) -> Vec<(f64, f64, Option<f32>)> {
            self.inner
                .areas()
                .iter()
                .map(|s| (s.x, s.y, s.threshold()))
                .collect()
        }

        #[pyo3(signature = (x, y, threshold=None))]
        pub fn add_area(&mut self, x: f64, y: f64, threshold: Option<f32>) -> PyResult<()> {
            let seed = match threshold {
                Some(t) => SeedPoint::new(x, y, t),
                None => SeedPoint::at(x, y),
            };
            self.inner.push_area(seed)?;
            Ok(())
        }

        /// Paint color as packed ARGB (0xAARRGGBB).
        #[getter]
        pub fn get_color(&self) -> u32 {
            self.inner.color()
        }

        #[setter]
        pub fn set_color(&mut self, color: u32) {
            self.inner.set_color(color);
        }

        #[getter]
        pub fn get_coverage(&mut self) -> f32 {
            self.inner.coverage()
        }

        #[setter]
        pub fn set_coverage(&mut self, coverage: f32) {
            self.inner.set_coverage(coverage);
        }

        /// Protect pixels from painting; `None` or an empty array clears it.
        ///
        /// Accepts (H, W, 1|3|4) arrays, read the same way as
        /// `exclusion_mask_from_image`.
        #[pyo3(signature = (mask=None))]
        pub fn set_exclusion_mask(&mut self, mask: Option<PyReadonlyArray3<'_, u8>>) -> PyResult<()> {
            let exclusion = match mask {
                Some(mask) => Some(ExclusionMask::from_image(mask.as_array())?),
                None => None,
            };
            self.inner.set_exclusion_mask(exclusion)?;
            Ok(())
        }

        pub fn set_exclusion_mask_disabled(&mut self, disabled: bool) {
            self.inner.set_exclusion_mask_disabled(disabled);
        }

        /// Union a drawn layer with the fill; `None` or empty clears it.
        #[pyo3(signature = (image=None))]
        pub fn set_freehand_image(&mut self, image: Option<PyReadonlyArray3<'_, u8>>) -> PyResult<()> {
            match image {
                Some(image) => self.inner.set_freehand_image(image.as_array())?,
                None => self.inner.clear_freehand_image(),
            }
            Ok(())
        }

        #[getter]
        pub fn get_allow_repaint(&self) -> bool {
            self.inner.allow_repaint()
        }

        #[setter]
        pub fn set_allow_repaint(&mut self, allow: bool) {
            self.inner.set_allow_repaint(allow);
        }

        #[getter]
        pub fn did_repaint(&self) -> bool {
            self.inner.did_repaint()
        }

        #[pyo3(signature = (x, y, threshold=None))]
        pub fn will_do_repaint_for_area(&self, x: f64, y: f64, threshold: Option<f32>) -> PyResult<bool> {
            let seed = match threshold {
                Some(t) => SeedPoint::new(x, y, t),
                None => SeedPoint::at(x, y),
            };
            Ok(self.inner.will_do_repaint_for_area(&seed)?)
        }

        /// Composite the paint color over the selection and return the image.
        pub fn flood_image<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.flood_image().to_owned().into_pyarray(py)
        }

        /// Last composed image, or the source if nothing was composed.
        pub fn image<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.image().to_owned().into_pyarray(py)
        }

        /// The image this mask was built from, before any paint.
        pub fn source_image<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.source_image().to_owned().into_pyarray(py)
        }

        /// Current selection as (H, W) u8, 255 = selected.
        pub fn mask<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray2<u8>> {
            self.inner.mask().to_owned().into_pyarray(py)
        }

        /// RGBA layer: paint color on the selection, transparent elsewhere.
        pub fn overlay<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.overlay().into_pyarray(py)
        }

        /// Bounding rect of the current selection as (x, y, width, height).
        pub fn selection_rect(&mut self) -> (usize, usize, usize, usize) {
            rect_tuple(selection::find_mask_rect(self.inner.mask()))
        }
    }

    // ========================================================================
    // Mask Utilities
    // ========================================================================

    /// Exclusion mask from an image: alpha > 0 (RGBA, 1ch) or non-black (RGB).
    ///
    /// # Returns
    /// (H, W) u8 mask, 255 = excluded
    #[pyfunction]
    pub fn exclusion_mask_from_image<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let mask = selection::exclusion_mask_from_image(image.as_array())?;
        Ok(mask.into_pyarray(py))
    }

    /// Invert the alpha channel in place (RGBA or single-channel).
    #[pyfunction]
    pub fn invert_alpha(mut image: PyReadwriteArray3<'_, u8>) -> PyResult<()> {
        alpha::invert_alpha(image.as_array_mut())?;
        Ok(())
    }

    /// Bounding rect of an image's foreground as (x, y, width, height).
    ///
    /// An empty foreground returns (0, 0, 0, 0).
    #[pyfunction]
    pub fn find_contour_rect(image: PyReadonlyArray3<'_, u8>) -> PyResult<(usize, usize, usize, usize)> {
        Ok(rect_tuple(selection::find_contour_rect(image.as_array())?))
    }

    // ========================================================================
    // Color Analysis
    // ========================================================================

    /// Dominant hues of an RGB/RGBA image, integer degrees, most prominent first.
    #[pyfunction]
    #[pyo3(signature = (image, min_saturation=0.15, min_value=0.15, max_hues=8))]
    pub fn find_hues(
        image: PyReadonlyArray3<'_, u8>,
        min_saturation: f32,
        min_value: f32,
        max_hues: usize,
    ) -> PyResult<Vec<i32>> {
        let options = hue::HueOptions::default()
            .with_min_saturation(min_saturation)
            .with_min_value(min_value)
            .with_max_hues(max_hues);
        Ok(hue::find_hues_with(image.as_array(), &options)?)
    }

    /// Default opacity hint for a packed ARGB paint color.
    #[pyfunction]
    pub fn suggested_coverage(color: u32) -> f32 {
        paint_mask::suggested_coverage(color)
    }

    // ========================================================================
    // Module Registration
    // ========================================================================

    #[pymodule]
    pub fn recolor_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PyPaintMask>()?;

        // Mask utilities
        m.add_function(wrap_pyfunction!(exclusion_mask_from_image, m)?)?;
        m.add_function(wrap_pyfunction!(invert_alpha, m)?)?;
        m.add_function(wrap_pyfunction!(find_contour_rect, m)?)?;

        // Color analysis
        m.add_function(wrap_pyfunction!(find_hues, m)?)?;
        m.add_function(wrap_pyfunction!(suggested_coverage, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::recolor_rust;
