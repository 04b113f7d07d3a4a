//! Multi-seed threshold flood fill.
//!
//! Each seed grows its own connected region: a neighbor joins when its color
//! distance to the *seed pixel's* color is within that seed's tolerance.
//! Per-seed regions are unioned and the exclusion mask is applied last, so
//! the result does not depend on seed order.
//!
//! ## Color metric
//!
//! Distance is the maximum absolute difference over the R, G and B bytes
//! (alpha is ignored). A threshold `t` in `[0, 1]` maps to the byte
//! tolerance `round(t * 255)`. A threshold of 0 selects only the seed pixel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use ndarray::{Array2, ArrayView3, Zip};
use rayon::prelude::*;

use crate::error::{RepaintError, Result};
use crate::selection::exclusion::ExclusionMask;
use crate::selection::seed::{SeedCollection, SeedPoint};

/// Threshold used for seeds created without one.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Neighborhood used while growing a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-way connectivity (N, S, E, W)
    #[default]
    FourWay,
    /// 8-way connectivity (N, S, E, W, NE, NW, SE, SW)
    EightWay,
}

const FOUR_WAY: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const EIGHT_WAY: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::FourWay => &FOUR_WAY,
            Connectivity::EightWay => &EIGHT_WAY,
        }
    }
}

/// Options for mask computation.
#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Neighborhood for region growth
    pub connectivity: Connectivity,
    /// Threshold for seeds built with [`SeedPoint::at`]
    pub default_threshold: f32,
    /// Grow independent seeds on the rayon pool
    pub parallel: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::FourWay,
            default_threshold: DEFAULT_THRESHOLD,
            parallel: true,
        }
    }
}

impl FillConfig {
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_default_threshold(mut self, default_threshold: f32) -> Self {
        self.default_threshold = default_threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// A seed mapped onto the pixel grid with its byte tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSeed {
    pub x: usize,
    pub y: usize,
    /// `None` selects the seed pixel alone
    pub tolerance: Option<u8>,
}

impl ResolvedSeed {
    pub fn resolve(seed: &SeedPoint, width: usize, height: usize, config: &FillConfig) -> Result<Self> {
        let (x, y) = seed.pixel(width, height)?;
        let threshold = seed.resolved_threshold(config.default_threshold);
        Ok(Self {
            x,
            y,
            tolerance: tolerance_for(threshold),
        })
    }
}

/// Byte tolerance for a `[0, 1]` threshold; `None` when it is not positive.
#[inline]
pub fn tolerance_for(threshold: f32) -> Option<u8> {
    if threshold.is_nan() || threshold <= 0.0 {
        return None;
    }
    Some((threshold.min(1.0) * 255.0).round() as u8)
}

/// Max-channel RGB distance between two pixels.
#[inline]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> u8 {
    let dr = a[0].abs_diff(b[0]);
    let dg = a[1].abs_diff(b[1]);
    let db = a[2].abs_diff(b[2]);
    dr.max(dg).max(db)
}

#[inline]
fn rgb_at(image: &ArrayView3<u8>, x: usize, y: usize) -> [u8; 3] {
    [image[[y, x, 0]], image[[y, x, 1]], image[[y, x, 2]]]
}

pub(crate) fn check_channels(image: &ArrayView3<u8>) -> Result<()> {
    let channels = image.dim().2;
    if channels != 3 && channels != 4 {
        return Err(RepaintError::InvalidChannel {
            expected: "3 (RGB) or 4 (RGBA)",
            actual: channels,
        });
    }
    Ok(())
}

/// Grow one seed's region.
///
/// Uses an explicit queue and a visited bitmap, so every pixel is examined
/// at most once and stack depth stays constant.
///
/// # Returns
/// Mask shaped (height, width) with 255 = selected
pub fn grow_region(image: ArrayView3<u8>, seed: ResolvedSeed, connectivity: Connectivity) -> Array2<u8> {
    let (height, width, _) = image.dim();
    let mut mask = Array2::<u8>::zeros((height, width));

    let tol = match seed.tolerance {
        Some(tol) => tol,
        None => {
            mask[[seed.y, seed.x]] = 255;
            return mask;
        }
    };

    let reference = rgb_at(&image, seed.x, seed.y);
    let offsets = connectivity.offsets();

    let mut queue = VecDeque::new();
    let mut visited = vec![false; width * height];

    queue.push_back((seed.x, seed.y));
    visited[seed.y * width + seed.x] = true;

    while let Some((x, y)) = queue.pop_front() {
        if color_distance(rgb_at(&image, x, y), reference) > tol {
            continue;
        }
        mask[[y, x]] = 255;

        for &(dx, dy) in offsets {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let nidx = ny * width + nx;
            if !visited[nidx] {
                visited[nidx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    mask
}

/// OR `other` into `acc`.
fn union_into(mut acc: Array2<u8>, other: Array2<u8>) -> Array2<u8> {
    Zip::from(&mut acc).and(&other).for_each(|a, &b| *a |= b);
    acc
}

fn check_cancel(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        return Err(RepaintError::Cancelled);
    }
    Ok(())
}

fn grow_logged(image: ArrayView3<u8>, seed: ResolvedSeed, config: &FillConfig) -> Array2<u8> {
    log::trace!("growing seed at ({}, {}) tol {:?}", seed.x, seed.y, seed.tolerance);
    grow_region(image, seed, config.connectivity)
}

/// Grow every pre-resolved seed and union the regions.
///
/// Seeds must already lie inside `image`; [`ResolvedSeed::resolve`]
/// guarantees that.
pub fn union_seed_regions(image: ArrayView3<u8>, seeds: &[ResolvedSeed], config: &FillConfig) -> Array2<u8> {
    let (height, width, _) = image.dim();
    let empty = || Array2::<u8>::zeros((height, width));

    if config.parallel && seeds.len() > 1 {
        seeds
            .par_iter()
            .map(|&seed| grow_logged(image, seed, config))
            .reduce(empty, union_into)
    } else {
        seeds
            .iter()
            .fold(empty(), |acc, &seed| union_into(acc, grow_logged(image, seed, config)))
    }
}

fn union_seed_regions_cancellable(
    image: ArrayView3<u8>,
    seeds: &[ResolvedSeed],
    config: &FillConfig,
    cancel: &AtomicBool,
) -> Result<Array2<u8>> {
    let (height, width, _) = image.dim();
    let empty = || Array2::<u8>::zeros((height, width));

    if config.parallel && seeds.len() > 1 {
        seeds
            .par_iter()
            .map(|&seed| {
                check_cancel(cancel)?;
                Ok(grow_logged(image, seed, config))
            })
            .try_reduce(empty, |a, b| Ok(union_into(a, b)))
    } else {
        let mut acc = empty();
        for &seed in seeds {
            check_cancel(cancel)?;
            acc = union_into(acc, grow_logged(image, seed, config));
        }
        Ok(acc)
    }
}

fn compute_mask_inner(
    image: ArrayView3<u8>,
    seeds: &SeedCollection,
    exclusion: Option<&ExclusionMask>,
    config: &FillConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Array2<u8>> {
    check_channels(&image)?;
    let (height, width, _) = image.dim();
    if let Some(ex) = exclusion {
        ex.check_dimensions(width, height)?;
    }

    let resolved = seeds
        .iter()
        .map(|seed| ResolvedSeed::resolve(seed, width, height, config))
        .collect::<Result<Vec<_>>>()?;

    let start = Instant::now();
    let mut mask = match cancel {
        Some(flag) => union_seed_regions_cancellable(image, &resolved, config, flag)?,
        None => union_seed_regions(image, &resolved, config),
    };
    if let Some(ex) = exclusion {
        ex.clear_from(&mut mask);
    }

    log::debug!(
        "compute_mask: {} seeds over {}x{} -> {} px in {:?}",
        resolved.len(),
        width,
        height,
        mask.iter().filter(|&&v| v > 0).count(),
        start.elapsed()
    );

    Ok(mask)
}

/// Compute the unified region mask for a set of seeds.
///
/// # Arguments
/// * `image` - RGB or RGBA image (height, width, channels)
/// * `seeds` - Seeds to grow; order does not affect the result
/// * `exclusion` - Pixels cleared from the result unconditionally
/// * `config` - Connectivity, default threshold and parallelism
///
/// # Returns
/// Mask shaped (height, width) with 255 = selected
pub fn compute_mask(
    image: ArrayView3<u8>,
    seeds: &SeedCollection,
    exclusion: Option<&ExclusionMask>,
    config: &FillConfig,
) -> Result<Array2<u8>> {
    compute_mask_inner(image, seeds, exclusion, config, None)
}

/// [`compute_mask`] with a cooperative cancel flag.
///
/// The flag is checked before each seed's growth starts, never inside one,
/// so a region is either fully grown or not started.
pub fn compute_mask_cancellable(
    image: ArrayView3<u8>,
    seeds: &SeedCollection,
    exclusion: Option<&ExclusionMask>,
    config: &FillConfig,
    cancel: &AtomicBool,
) -> Result<Array2<u8>> {
    let result = compute_mask_inner(image, seeds, exclusion, config, Some(cancel));
    if matches!(result, Err(RepaintError::Cancelled)) {
        log::warn!("compute_mask cancelled with {} seeds pending", seeds.len());
    }
    result
}

/// Whether a single seed would select anything once exclusion is applied.
pub fn would_select(
    image: ArrayView3<u8>,
    seed: &SeedPoint,
    exclusion: Option<&ExclusionMask>,
    config: &FillConfig,
) -> Result<bool> {
    check_channels(&image)?;
    let (height, width, _) = image.dim();
    let resolved = ResolvedSeed::resolve(seed, width, height, config)?;
    if let Some(ex) = exclusion {
        ex.check_dimensions(width, height)?;
    }

    let region = grow_region(image, resolved, config.connectivity);
    let Some(ex) = exclusion else {
        return Ok(true);
    };

    let excluded = ex.view();
    Ok(Zip::from(&region)
        .and(&excluded)
        .fold(false, |found, &m, &e| found || (m > 0 && e == 0)))
}
