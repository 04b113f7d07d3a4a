//! Seed points and the ordered collection that anchors a repaint.
//!
//! A seed is a sub-pixel location plus a color tolerance. Locations are
//! mapped to the pixel grid by flooring, so pixel `(i, j)` owns the square
//! `[i, i + 1) x [j, j + 1)`.

use std::ops::Index;

use crate::error::{RepaintError, Result};

/// A tap location with its color tolerance.
///
/// The threshold lives on `[0, 1]`, where 1 accepts every color. Seeds built
/// with [`SeedPoint::at`] carry no threshold and are resolved against the
/// fill configuration's default at fill time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    pub x: f64,
    pub y: f64,
    threshold: Option<f32>,
}

impl SeedPoint {
    /// Seed with an explicit threshold. Values are clamped to `[0, 1]`.
    pub fn new(x: f64, y: f64, threshold: f32) -> Self {
        Self {
            x,
            y,
            threshold: Some(clamp_threshold(threshold)),
        }
    }

    /// Seed whose threshold is left to the caller's default.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            threshold: None,
        }
    }

    /// Explicit threshold, if one was given.
    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    /// Threshold to fill with, falling back to `default`.
    pub fn resolved_threshold(&self, default: f32) -> f32 {
        self.threshold.unwrap_or_else(|| clamp_threshold(default))
    }

    /// Same location with a new threshold.
    pub fn with_threshold(self, threshold: f32) -> Self {
        Self::new(self.x, self.y, threshold)
    }

    /// Integer pixel this seed starts from.
    ///
    /// Coordinates are floored. Non-finite values and locations outside
    /// `width x height` are rejected rather than clamped.
    pub fn pixel(&self, width: usize, height: usize) -> Result<(usize, usize)> {
        let out_of_bounds = || RepaintError::OutOfBounds {
            x: self.x,
            y: self.y,
            width,
            height,
        };

        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(out_of_bounds());
        }

        let px = self.x.floor();
        let py = self.y.floor();
        if px < 0.0 || py < 0.0 || px >= width as f64 || py >= height as f64 {
            return Err(out_of_bounds());
        }

        Ok((px as usize, py as usize))
    }
}

/// Clamp a threshold into `[0, 1]`; NaN becomes 0.
#[inline]
pub fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        0.0
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

/// Ordered list of seeds whose regions are unioned.
///
/// Order is kept for the caller's benefit (the last seed is the one being
/// edited) but never changes the computed mask.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedCollection {
    seeds: Vec<SeedPoint>,
}

impl SeedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seeds: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, seed: SeedPoint) {
        self.seeds.push(seed);
    }

    /// Replace the seed at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, seed: SeedPoint) -> Result<SeedPoint> {
        let len = self.seeds.len();
        match self.seeds.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, seed)),
            None => Err(RepaintError::IndexOutOfRange { index, len }),
        }
    }

    pub fn get(&self, index: usize) -> Option<&SeedPoint> {
        self.seeds.get(index)
    }

    pub fn last(&self) -> Option<&SeedPoint> {
        self.seeds.last()
    }

    pub fn clear(&mut self) {
        self.seeds.clear();
    }

    /// Remove seeds in `start..end`.
    pub fn remove_range(&mut self, start: usize, end: usize) -> Result<()> {
        let len = self.seeds.len();
        if start > end || end > len {
            return Err(RepaintError::InvalidRange { start, end, len });
        }
        self.seeds.drain(start..end);
        Ok(())
    }

    pub fn reserve(&mut self, additional: usize) {
        self.seeds.reserve(additional);
    }

    pub fn capacity(&self) -> usize {
        self.seeds.capacity()
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeedPoint> {
        self.seeds.iter()
    }

    pub fn as_slice(&self) -> &[SeedPoint] {
        &self.seeds
    }
}

impl Index<usize> for SeedCollection {
    type Output = SeedPoint;

    fn index(&self, index: usize) -> &SeedPoint {
        &self.seeds[index]
    }
}

impl From<Vec<SeedPoint>> for SeedCollection {
    fn from(seeds: Vec<SeedPoint>) -> Self {
        Self { seeds }
    }
}

impl FromIterator<SeedPoint> for SeedCollection {
    fn from_iter<I: IntoIterator<Item = SeedPoint>>(iter: I) -> Self {
        Self {
            seeds: iter.into_iter().collect(),
        }
    }
}

impl Extend<SeedPoint> for SeedCollection {
    fn extend<I: IntoIterator<Item = SeedPoint>>(&mut self, iter: I) {
        self.seeds.extend(iter);
    }
}

impl IntoIterator for SeedCollection {
    type Item = SeedPoint;
    type IntoIter = std::vec::IntoIter<SeedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.seeds.into_iter()
    }
}

impl<'a> IntoIterator for &'a SeedCollection {
    type Item = &'a SeedPoint;
    type IntoIter = std::slice::Iter<'a, SeedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.seeds.iter()
    }
}
