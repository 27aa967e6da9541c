//! Fixed-size intensity and mask buffers for one generated image.
//!
//! Both buffers are row-major (`y * width + x`) and zero-initialised.
use glam::IVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::noise::{PixelOverflow, PixelSampler};

/// Intensity buffer plus a parallel mask buffer of the same dimensions.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    intensity: Vec<u8>,
    mask: Vec<u8>,
}

impl Canvas {
    /// Creates a zero-filled canvas. Fails if either dimension is zero.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas dimensions must be > 0, got {width}x{height}"
            )));
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            intensity: vec![0; len],
            mask: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn intensity(&self) -> &[u8] {
        &self.intensity
    }

    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Consumes the canvas, returning `(intensity, mask)`.
    pub fn into_buffers(self) -> (Vec<u8>, Vec<u8>) {
        (self.intensity, self.mask)
    }

    /// Whether the pixel lies inside `[0, width) x [0, height)`.
    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn intensity_at(&self, x: u32, y: u32) -> u8 {
        self.intensity[self.index(x, y)]
    }

    pub fn mask_at(&self, x: u32, y: u32) -> u8 {
        self.mask[self.index(x, y)]
    }

    #[inline]
    pub fn set_intensity(&mut self, x: u32, y: u32, value: u8) {
        let idx = self.index(x, y);
        self.intensity[idx] = value;
    }

    #[inline]
    pub fn set_mask(&mut self, x: u32, y: u32, value: u8) {
        let idx = self.index(x, y);
        self.mask[idx] = value;
    }

    /// Resets every mask cell to background.
    pub fn clear_mask(&mut self) {
        self.mask.fill(0);
    }

    /// Overwrites every intensity cell with an independent draw. The mask is untouched.
    pub fn fill_background<R: RngCore>(
        &mut self,
        sampler: &PixelSampler,
        overflow: PixelOverflow,
        rng: &mut R,
    ) {
        for px in self.intensity.iter_mut() {
            *px = overflow.to_u8(sampler.sample(rng));
        }
    }
}
