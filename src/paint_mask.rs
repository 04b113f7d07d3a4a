//! Repaint mask: the stateful facade over selection and compositing.
//!
//! A [`RepaintMask`] owns one working image, the seeds the user tapped, an
//! optional caller-drawn freehand mask and a shared exclusion mask. Edits are
//! cheap: the selection is recomputed lazily on the next query, so a burst of
//! UI changes costs one fill.
//!
//! ## Compositing
//!
//! The paint color is a packed ARGB integer (`0xAARRGGBB`). It is blended
//! "over" the source pixels inside the mask using its own alpha; an alpha
//! byte of 0 means the color carries no alpha and is painted opaque.
//! Every compose starts from the untouched source image, so composing twice
//! with the same state yields identical bytes.

use std::time::Instant;

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{RepaintError, Result};
use crate::filters::alpha::{blend_over_u8, blend_rgb_u8, foreground_mask};
use crate::filters::hue::rgb_to_hsv;
use crate::selection::contour::{mask_coverage, selected_count, union_masks};
use crate::selection::exclusion::ExclusionMask;
use crate::selection::flood_fill::{check_channels, union_seed_regions, would_select, FillConfig, ResolvedSeed};
use crate::selection::seed::{SeedCollection, SeedPoint};

// ============================================================================
// Paint Color
// ============================================================================

/// Unpack an ARGB color into RGBA bytes, treating alpha 0 as opaque.
#[inline]
pub fn unpack_argb(color: u32) -> [u8; 4] {
    let a = (color >> 24) as u8;
    let r = (color >> 16) as u8;
    let g = (color >> 8) as u8;
    let b = color as u8;
    [r, g, b, if a == 0 { 255 } else { a }]
}

/// Pack RGBA bytes into ARGB.
#[inline]
pub fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Opacity hint for a paint color, from its HSV value.
///
/// Dark paints get a stronger default than light ones:
/// `min(1, (1 - v)^(1/2.2) / 1.2 + 0.05)`, truncated to three decimals.
pub fn suggested_coverage(color: u32) -> f32 {
    let [r, g, b, _] = unpack_argb(color);
    let (_, _, v) = rgb_to_hsv(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let raw = ((1.0 - v as f64).powf(1.0 / 2.2) / 1.2 + 0.05).min(1.0);
    ((raw * 1000.0).trunc() / 1000.0) as f32
}

// ============================================================================
// Repaint Mask
// ============================================================================

/// Lifecycle of a [`RepaintMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskState {
    /// No seeds and no compose yet
    Clean,
    /// Inputs changed since the last compose
    Dirty,
    /// Compose ran; `did_repaint` and coverage match the current inputs
    Composed,
}

/// Stateful repaint of one image layer.
///
/// Cloning deep-copies the image, seeds and freehand mask; the exclusion
/// mask stays shared.
#[derive(Debug, Clone)]
pub struct RepaintMask {
    source: Array3<u8>,
    composed: Option<Array3<u8>>,
    seeds: SeedCollection,
    resolved: Vec<ResolvedSeed>,
    exclusion: Option<ExclusionMask>,
    exclusion_disabled: bool,
    freehand: Option<Array2<u8>>,
    color: u32,
    coverage: f32,
    coverage_override: Option<f32>,
    allow_repaint: bool,
    did_repaint: bool,
    config: FillConfig,
    mask: Option<Array2<u8>>,
    state: MaskState,
}

impl RepaintMask {
    /// Take ownership of an RGB or RGBA image with default fill settings.
    pub fn new(image: Array3<u8>) -> Result<Self> {
        Self::with_config(image, FillConfig::default())
    }

    pub fn with_config(image: Array3<u8>, config: FillConfig) -> Result<Self> {
        check_channels(&image.view())?;
        let (height, width, _) = image.dim();
        if width == 0 || height == 0 {
            return Err(RepaintError::InvalidDimensions {
                expected: (width.max(1), height.max(1)),
                actual: (width, height),
            });
        }

        Ok(Self {
            source: image.as_standard_layout().into_owned(),
            composed: None,
            seeds: SeedCollection::new(),
            resolved: Vec::new(),
            exclusion: None,
            exclusion_disabled: false,
            freehand: None,
            color: 0xFF00_0000,
            coverage: 0.0,
            coverage_override: None,
            allow_repaint: true,
            did_repaint: false,
            config,
            mask: None,
            state: MaskState::Clean,
        })
    }

    pub fn width(&self) -> usize {
        self.source.dim().1
    }

    pub fn height(&self) -> usize {
        self.source.dim().0
    }

    pub fn state(&self) -> MaskState {
        self.state
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Swap fill settings; seeds are re-resolved against the new default.
    pub fn set_config(&mut self, config: FillConfig) -> Result<()> {
        self.resolved = self.resolve(&self.seeds, &config)?;
        self.config = config;
        self.invalidate_mask();
        Ok(())
    }

    /// Working image: the last composed result, or the source if none.
    pub fn image(&self) -> ArrayView3<'_, u8> {
        match &self.composed {
            Some(img) => img.view(),
            None => self.source.view(),
        }
    }

    /// The untouched image this mask was built from.
    pub fn source_image(&self) -> ArrayView3<'_, u8> {
        self.source.view()
    }

    // ------------------------------------------------------------------------
    // Seeds
    // ------------------------------------------------------------------------

    /// Replace the seed collection.
    ///
    /// Every seed is checked against the image now, so a bad tap is
    /// rejected before any fill runs and the previous seeds stay in place.
    pub fn set_areas(&mut self, seeds: SeedCollection) -> Result<()> {
        self.resolved = self.resolve(&seeds, &self.config)?;
        self.seeds = seeds;
        self.invalidate_mask();
        Ok(())
    }

    pub fn areas(&self) -> &SeedCollection {
        &self.seeds
    }

    /// Append one seed.
    pub fn push_area(&mut self, seed: SeedPoint) -> Result<()> {
        let resolved = ResolvedSeed::resolve(&seed, self.width(), self.height(), &self.config)?;
        self.seeds.push(seed);
        self.resolved.push(resolved);
        self.invalidate_mask();
        Ok(())
    }

    fn resolve(&self, seeds: &SeedCollection, config: &FillConfig) -> Result<Vec<ResolvedSeed>> {
        let (width, height) = (self.width(), self.height());
        seeds
            .iter()
            .map(|seed| ResolvedSeed::resolve(seed, width, height, config))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Color and coverage
    // ------------------------------------------------------------------------

    /// Set the packed ARGB paint color.
    ///
    /// The selection is kept, but a coverage override is dropped so the
    /// next read reports the mask's own coverage.
    pub fn set_color(&mut self, color: u32) {
        if color != self.color {
            self.color = color;
            self.coverage_override = None;
            self.mark_dirty();
        }
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// Override the reported coverage, clamped to `[0, 1]`.
    ///
    /// The override holds until the seeds, paint color, freehand mask or
    /// exclusion state change, after which coverage is derived from the mask again.
    pub fn set_coverage(&mut self, coverage: f32) {
        let coverage = if coverage.is_nan() { 0.0 } else { coverage.clamp(0.0, 1.0) };
        self.coverage_override = Some(coverage);
        self.mark_dirty();
    }

    /// Last set or computed coverage, recomputing the mask if stale.
    pub fn coverage(&mut self) -> f32 {
        if let Some(coverage) = self.coverage_override {
            return coverage;
        }
        self.current_mask();
        self.coverage
    }

    // ------------------------------------------------------------------------
    // Exclusion and freehand inputs
    // ------------------------------------------------------------------------

    /// Install or clear the exclusion mask.
    ///
    /// An empty (zero-sized) mask clears it, like `None`.
    pub fn set_exclusion_mask(&mut self, exclusion: Option<ExclusionMask>) -> Result<()> {
        let exclusion = match exclusion {
            Some(ex) if ex.is_empty() => None,
            Some(ex) => {
                ex.check_dimensions(self.width(), self.height())?;
                Some(ex)
            }
            None => None,
        };
        self.exclusion = exclusion;
        self.invalidate_mask();
        Ok(())
    }

    pub fn exclusion_mask(&self) -> Option<&ExclusionMask> {
        self.exclusion.as_ref()
    }

    /// Ignore the exclusion mask without dropping it.
    pub fn set_exclusion_mask_disabled(&mut self, disabled: bool) {
        if disabled != self.exclusion_disabled {
            self.exclusion_disabled = disabled;
            self.invalidate_mask();
        }
    }

    pub fn is_exclusion_mask_disabled(&self) -> bool {
        self.exclusion_disabled
    }

    fn active_exclusion(&self) -> Option<&ExclusionMask> {
        if self.exclusion_disabled {
            None
        } else {
            self.exclusion.as_ref()
        }
    }

    /// Union a caller-drawn mask with the fill result.
    ///
    /// Pixels are "drawn" where alpha > 0 (RGBA and 1-channel) or any
    /// channel is non-zero (RGB). A zero-sized image clears the freehand mask.
    pub fn set_freehand_image(&mut self, image: ArrayView3<u8>) -> Result<()> {
        let (height, width, _) = image.dim();
        if width == 0 || height == 0 {
            self.clear_freehand_image();
            return Ok(());
        }
        self.check_size(width, height)?;
        self.freehand = Some(foreground_mask(image)?);
        self.invalidate_mask();
        Ok(())
    }

    /// [`set_freehand_image`](Self::set_freehand_image) for a ready 2-D mask.
    pub fn set_freehand_mask(&mut self, mask: Array2<u8>) -> Result<()> {
        let (height, width) = mask.dim();
        if width == 0 || height == 0 {
            self.clear_freehand_image();
            return Ok(());
        }
        self.check_size(width, height)?;
        self.freehand = Some(mask);
        self.invalidate_mask();
        Ok(())
    }

    pub fn clear_freehand_image(&mut self) {
        if self.freehand.take().is_some() {
            self.invalidate_mask();
        }
    }

    fn check_size(&self, width: usize, height: usize) -> Result<()> {
        if width != self.width() || height != self.height() {
            return Err(RepaintError::InvalidDimensions {
                expected: (self.width(), self.height()),
                actual: (width, height),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Repaint gate
    // ------------------------------------------------------------------------

    /// Global kill-switch; while false, composing returns the source image.
    pub fn set_allow_repaint(&mut self, allow: bool) {
        if allow != self.allow_repaint {
            self.allow_repaint = allow;
            self.mark_dirty();
        }
    }

    pub fn allow_repaint(&self) -> bool {
        self.allow_repaint
    }

    /// Whether the last compose painted anything.
    pub fn did_repaint(&self) -> bool {
        self.allow_repaint && self.did_repaint
    }

    /// Dry run: would this seed alone select anything after exclusion?
    ///
    /// Evaluated against the image and the active exclusion state only; the
    /// current seeds and the repaint gate play no part.
    pub fn will_do_repaint_for_area(&self, seed: &SeedPoint) -> Result<bool> {
        would_select(self.source.view(), seed, self.active_exclusion(), &self.config)
    }

    // ------------------------------------------------------------------------
    // Mask and compose
    // ------------------------------------------------------------------------

    fn mark_dirty(&mut self) {
        self.state = MaskState::Dirty;
    }

    fn invalidate_mask(&mut self) {
        self.mask = None;
        self.coverage_override = None;
        self.mark_dirty();
    }

    fn build_mask(&self) -> Array2<u8> {
        let mut mask = union_seed_regions(self.source.view(), &self.resolved, &self.config);
        if let Some(freehand) = &self.freehand {
            mask = union_masks(mask, freehand.view());
        }
        if let Some(ex) = self.active_exclusion() {
            ex.clear_from(&mut mask);
        }
        mask
    }

    /// Cached mask, or a freshly built one with coverage updated.
    fn take_mask(&mut self) -> Array2<u8> {
        match self.mask.take() {
            Some(mask) => mask,
            None => {
                let mask = self.build_mask();
                self.coverage = mask_coverage(mask.view());
                mask
            }
        }
    }

    fn current_mask(&mut self) -> &Array2<u8> {
        let mask = self.take_mask();
        self.mask.insert(mask)
    }

    /// Post-exclusion selection (255 = selected), recomputed if stale.
    pub fn mask(&mut self) -> ArrayView2<'_, u8> {
        self.current_mask().view()
    }

    /// Fill, then paint the color over the selection.
    ///
    /// Updates coverage and `did_repaint`. With repaint disallowed the
    /// source image comes back unmodified.
    pub fn flood_image(&mut self) -> ArrayView3<'_, u8> {
        let start = Instant::now();
        let rgba = unpack_argb(self.color);
        let allow = self.allow_repaint;

        let mask = self.take_mask();
        let selected = selected_count(mask.view());
        let composed = if allow && selected > 0 {
            Some(composite(self.source.view(), &mask, rgba))
        } else {
            None
        };

        self.mask = Some(mask);
        self.did_repaint = allow && selected > 0;
        self.composed = composed;
        self.state = MaskState::Composed;

        log::debug!(
            "flood_image: {} seeds, {} px selected, coverage {:.4}, repaint {} in {:?}",
            self.seeds.len(),
            selected,
            self.coverage,
            self.did_repaint,
            start.elapsed()
        );

        self.image()
    }

    /// RGBA layer with the paint color on the selection, transparent elsewhere.
    ///
    /// This is what a host stacks above the photo. Fully transparent while
    /// repaint is disallowed.
    pub fn overlay(&mut self) -> Array3<u8> {
        let (height, width) = (self.height(), self.width());
        let rgba = unpack_argb(self.color);
        let mut layer = Array3::<u8>::zeros((height, width, 4));
        if !self.allow_repaint {
            return layer;
        }

        let mask = self.current_mask();
        layer
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(mask.axis_iter(Axis(0)).into_par_iter())
            .for_each(|(mut row, mask_row)| {
                for (x, &m) in mask_row.iter().enumerate() {
                    if m > 0 {
                        for c in 0..4 {
                            row[[x, c]] = rgba[c];
                        }
                    }
                }
            });
        layer
    }
}

/// Blend `rgba` over `source` wherever `mask` is set.
fn composite(source: ArrayView3<u8>, mask: &Array2<u8>, rgba: [u8; 4]) -> Array3<u8> {
    let mut out = source.to_owned();
    let channels = out.dim().2;
    let [r, g, b, a] = rgba;

    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(mask.axis_iter(Axis(0)).into_par_iter())
        .for_each(|(mut row, mask_row)| {
            for (x, &m) in mask_row.iter().enumerate() {
                if m == 0 {
                    continue;
                }
                if channels == 4 {
                    let mut px = [row[[x, 0]], row[[x, 1]], row[[x, 2]], row[[x, 3]]];
                    blend_over_u8(&mut px, r, g, b, a);
                    for c in 0..4 {
                        row[[x, c]] = px[c];
                    }
                } else {
                    let mut px = [row[[x, 0]], row[[x, 1]], row[[x, 2]]];
                    blend_rgb_u8(&mut px, r, g, b, a);
                    for c in 0..3 {
                        row[[x, c]] = px[c];
                    }
                }
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::contour::find_mask_rect;
    use crate::selection::contour::Rect;

    fn solid(height: usize, width: usize, rgb: [u8; 3]) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((height, width, 3));
        for y in 0..height {
            for x in 0..width {
                for c in 0..3 {
                    img[[y, x, c]] = rgb[c];
                }
            }
        }
        img
    }

    fn one_seed(x: f64, y: f64, t: f32) -> SeedCollection {
        vec![SeedPoint::new(x, y, t)].into()
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert!(matches!(
            RepaintMask::new(Array3::zeros((4, 4, 1))),
            Err(RepaintError::InvalidChannel { actual: 1, .. })
        ));
        assert!(matches!(
            RepaintMask::new(Array3::zeros((0, 4, 3))),
            Err(RepaintError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_state_machine() {
        let mut pm = RepaintMask::new(solid(4, 4, [1, 2, 3])).unwrap();
        assert_eq!(pm.state(), MaskState::Clean);

        pm.set_areas(one_seed(0.0, 0.0, 0.1)).unwrap();
        assert_eq!(pm.state(), MaskState::Dirty);

        pm.flood_image();
        assert_eq!(pm.state(), MaskState::Composed);

        pm.set_color(0xFF00FF00);
        assert_eq!(pm.state(), MaskState::Dirty);
        pm.flood_image();
        pm.set_allow_repaint(false);
        assert_eq!(pm.state(), MaskState::Dirty);

        pm.flood_image();
        pm.set_coverage(0.9);
        assert_eq!(pm.state(), MaskState::Dirty);
    }

    #[test]
    fn test_paints_selection_opaque() {
        let mut img = solid(2, 2, [10, 10, 10]);
        img[[1, 1, 0]] = 200;
        let mut pm = RepaintMask::new(img).unwrap();
        pm.set_color(0xFF0000FF);
        pm.set_areas(one_seed(0.0, 0.0, 0.05)).unwrap();

        let out = pm.flood_image().to_owned();
        assert_eq!(&out.as_slice().unwrap()[0..3], &[0, 0, 255]);
        assert_eq!(out[[1, 1, 0]], 200); // Outside the region
        assert!(pm.did_repaint());
        assert_eq!(pm.coverage(), 0.75);
    }

    #[test]
    fn test_color_without_alpha_is_opaque() {
        let mut pm = RepaintMask::new(solid(1, 1, [0, 0, 0])).unwrap();
        pm.set_color(0x00FF8000);
        pm.set_areas(one_seed(0.0, 0.0, 0.0)).unwrap();
        let out = pm.flood_image();
        assert_eq!([out[[0, 0, 0]], out[[0, 0, 1]], out[[0, 0, 2]]], [255, 128, 0]);
    }

    #[test]
    fn test_translucent_color_blends() {
        let mut pm = RepaintMask::new(solid(1, 1, [0, 0, 0])).unwrap();
        pm.set_color(pack_argb(200, 0, 0, 128));
        pm.set_areas(one_seed(0.0, 0.0, 0.0)).unwrap();
        let out = pm.flood_image();
        assert!((out[[0, 0, 0]] as i32 - 100).abs() <= 1);
    }

    #[test]
    fn test_compose_is_idempotent() {
        let mut pm = RepaintMask::new(solid(6, 6, [40, 90, 10])).unwrap();
        pm.set_color(pack_argb(250, 250, 0, 90));
        pm.set_areas(one_seed(2.0, 3.0, 0.2)).unwrap();
        let first = pm.flood_image().to_owned();
        let second = pm.flood_image().to_owned();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gate_returns_source() {
        let source = solid(3, 3, [7, 8, 9]);
        let mut pm = RepaintMask::new(source.clone()).unwrap();
        pm.set_color(0xFFFF0000);
        pm.set_areas(one_seed(1.0, 1.0, 1.0)).unwrap();
        pm.set_allow_repaint(false);

        assert_eq!(pm.flood_image(), source.view());
        assert!(!pm.did_repaint());
        assert!(pm.overlay().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_did_repaint_follows_gate_after_compose() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_areas(one_seed(0.0, 0.0, 0.5)).unwrap();
        pm.flood_image();
        assert!(pm.did_repaint());
        pm.set_allow_repaint(false);
        assert!(!pm.did_repaint());
    }

    #[test]
    fn test_exclusion_disable_toggle() {
        let mut pm = RepaintMask::new(solid(4, 4, [0, 0, 0])).unwrap();
        let mut ex = Array2::<u8>::zeros((4, 4));
        ex.row_mut(0).fill(255);
        pm.set_exclusion_mask(Some(ExclusionMask::from_mask(ex))).unwrap();
        pm.set_areas(one_seed(0.0, 3.0, 0.1)).unwrap();

        assert_eq!(pm.coverage(), 0.75);
        pm.set_exclusion_mask_disabled(true);
        assert_eq!(pm.coverage(), 1.0);
        assert!(pm.exclusion_mask().is_some());
        pm.set_exclusion_mask_disabled(false);
        assert_eq!(pm.coverage(), 0.75);
    }

    #[test]
    fn test_exclusion_size_rejected() {
        let mut pm = RepaintMask::new(solid(4, 4, [0, 0, 0])).unwrap();
        let bad = ExclusionMask::from_mask(Array2::zeros((3, 4)));
        assert!(matches!(
            pm.set_exclusion_mask(Some(bad)),
            Err(RepaintError::InvalidDimensions { .. })
        ));
        // Empty mask means "none"
        pm.set_exclusion_mask(Some(ExclusionMask::from_mask(Array2::zeros((0, 0)))))
            .unwrap();
        assert!(pm.exclusion_mask().is_none());
    }

    #[test]
    fn test_bad_seed_keeps_previous_areas() {
        let mut pm = RepaintMask::new(solid(4, 4, [0, 0, 0])).unwrap();
        pm.set_areas(one_seed(1.0, 1.0, 0.1)).unwrap();
        let err = pm.set_areas(one_seed(9.0, 1.0, 0.1)).unwrap_err();
        assert!(matches!(err, RepaintError::OutOfBounds { .. }));
        assert_eq!(pm.areas().len(), 1);
        assert_eq!(pm.areas()[0].x, 1.0);
        assert!(pm.push_area(SeedPoint::new(-1.0, 0.0, 0.1)).is_err());
    }

    #[test]
    fn test_freehand_union() {
        let mut img = solid(4, 4, [0, 0, 0]);
        img[[3, 3, 0]] = 255;
        let mut pm = RepaintMask::new(img).unwrap();
        pm.set_areas(one_seed(0.0, 0.0, 0.0)).unwrap();

        let mut drawn = Array3::<u8>::zeros((4, 4, 4));
        drawn[[3, 3, 3]] = 255;
        pm.set_freehand_image(drawn.view()).unwrap();
        assert_eq!(find_mask_rect(pm.mask()), Rect::new(0, 0, 4, 4));
        assert_eq!(pm.coverage(), 2.0 / 16.0);

        pm.set_freehand_image(Array3::<u8>::zeros((0, 0, 4)).view()).unwrap();
        assert_eq!(pm.coverage(), 1.0 / 16.0);
    }

    #[test]
    fn test_freehand_respects_exclusion() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_freehand_mask(Array2::from_elem((2, 2), 255)).unwrap();
        let mut ex = Array2::<u8>::zeros((2, 2));
        ex[[0, 0]] = 255;
        pm.set_exclusion_mask(Some(ExclusionMask::from_mask(ex))).unwrap();
        assert_eq!(pm.mask()[[0, 0]], 0);
        assert_eq!(pm.coverage(), 0.75);
    }

    #[test]
    fn test_coverage_override() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_areas(one_seed(0.0, 0.0, 0.0)).unwrap();
        pm.set_coverage(0.4);
        assert_eq!(pm.coverage(), 0.4);
        pm.flood_image();
        assert_eq!(pm.coverage(), 0.4);

        // Changing inputs drops the override
        pm.set_areas(one_seed(0.0, 0.0, 0.5)).unwrap();
        assert_eq!(pm.coverage(), 1.0);
        pm.set_coverage(7.0);
        assert_eq!(pm.coverage(), 1.0);
    }

    #[test]
    fn test_color_change_drops_coverage_override() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_areas(one_seed(0.0, 0.0, 0.0)).unwrap();
        pm.set_coverage(0.9);
        pm.set_color(0xFF00FF00);
        assert_eq!(pm.coverage(), 0.25);

        // Same color again is not a change
        pm.set_coverage(0.9);
        pm.set_color(0xFF00FF00);
        assert_eq!(pm.coverage(), 0.9);
    }

    #[test]
    fn test_translucent_over_rgba() {
        // Same RGB, half-transparent and fully transparent alpha
        let mut img = Array3::<u8>::zeros((1, 2, 4));
        img[[0, 0, 2]] = 200;
        img[[0, 0, 3]] = 128;
        img[[0, 1, 2]] = 200;
        let mut pm = RepaintMask::new(img).unwrap();
        pm.set_color(pack_argb(255, 0, 0, 128));
        pm.set_areas(one_seed(0.0, 0.0, 0.1)).unwrap();

        let out = pm.flood_image().to_owned();
        assert!(pm.did_repaint());

        let close = |a: u8, b: u8| (a as i32 - b as i32).abs() <= 1;
        // Over a half-transparent pixel: both colors contribute
        assert!(close(out[[0, 0, 0]], 170));
        assert_eq!(out[[0, 0, 1]], 0);
        assert!(close(out[[0, 0, 2]], 66));
        assert!(close(out[[0, 0, 3]], 192));
        // Over a transparent pixel: paint color at its own alpha
        assert_eq!([out[[0, 1, 0]], out[[0, 1, 1]], out[[0, 1, 2]]], [255, 0, 0]);
        assert_eq!(out[[0, 1, 3]], 128);
    }

    #[test]
    fn test_empty_freehand_mask_clears() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_freehand_mask(Array2::from_elem((2, 2), 1)).unwrap();
        assert_eq!(pm.coverage(), 1.0);
        assert_eq!(pm.mask()[[1, 1]], 255);

        pm.set_freehand_mask(Array2::zeros((0, 0))).unwrap();
        assert_eq!(pm.coverage(), 0.0);
        assert!(pm.set_freehand_mask(Array2::zeros((3, 2))).is_err());
    }

    #[test]
    fn test_will_do_repaint_ignores_current_seeds() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_exclusion_mask(Some(ExclusionMask::from_mask(Array2::from_elem((2, 2), 255))))
            .unwrap();
        pm.set_areas(one_seed(0.0, 0.0, 1.0)).unwrap();
        assert!(!pm.will_do_repaint_for_area(&SeedPoint::new(1.0, 1.0, 1.0)).unwrap());

        pm.set_exclusion_mask_disabled(true);
        assert!(pm.will_do_repaint_for_area(&SeedPoint::new(1.0, 1.0, 1.0)).unwrap());
        assert!(pm.will_do_repaint_for_area(&SeedPoint::new(2.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_overlay() {
        let mut img = solid(1, 2, [0, 0, 0]);
        img[[0, 1, 1]] = 255;
        let mut pm = RepaintMask::new(img).unwrap();
        pm.set_color(0xFF112233);
        pm.set_areas(one_seed(0.0, 0.0, 0.1)).unwrap();
        let layer = pm.overlay();
        assert_eq!(layer.dim(), (1, 2, 4));
        assert_eq!(
            [layer[[0, 0, 0]], layer[[0, 0, 1]], layer[[0, 0, 2]], layer[[0, 0, 3]]],
            [0x11, 0x22, 0x33, 0xFF]
        );
        assert_eq!(layer[[0, 1, 3]], 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut pm = RepaintMask::new(solid(2, 2, [0, 0, 0])).unwrap();
        pm.set_exclusion_mask(Some(ExclusionMask::from_mask(Array2::zeros((2, 2)))))
            .unwrap();
        pm.set_areas(one_seed(0.0, 0.0, 0.1)).unwrap();

        let mut copy = pm.clone();
        copy.set_areas(SeedCollection::new()).unwrap();
        assert_eq!(pm.areas().len(), 1);
        assert!(copy
            .exclusion_mask()
            .unwrap()
            .shares_buffer_with(pm.exclusion_mask().unwrap()));
    }

    #[test]
    fn test_suggested_coverage() {
        assert_eq!(suggested_coverage(0xFF000000), 0.883);
        assert_eq!(suggested_coverage(0xFFFFFFFF), 0.05);
    }

    #[test]
    fn test_pack_roundtrip() {
        let c = pack_argb(1, 2, 3, 4);
        assert_eq!(c, 0x04010203);
        assert_eq!(unpack_argb(c), [1, 2, 3, 4]);
    }
}
