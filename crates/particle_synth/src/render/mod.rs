//! Painting accepted particles into a [`Canvas`].
//!
//! Rendering happens in two passes:
//! 1. [`paint_particle_interior`] per particle, in acceptance order (last writer wins).
//! 2. [`paint_particle_edges`] once all interiors are done, so boundary pixels always
//!    take precedence over interior fill.
//!
//! The resulting mask has three classes: [`MASK_BACKGROUND`], [`MASK_INTERIOR`] and
//! [`MASK_EDGE`].
use std::ops::Range;

use glam::IVec2;
use rand::RngCore;

use crate::canvas::Canvas;
use crate::noise::{PixelOverflow, PixelSampler};
use crate::placement::Particle;

pub mod perimeter;

pub use perimeter::circle_perimeter_aa;

pub const MASK_BACKGROUND: u8 = 0;
pub const MASK_INTERIOR: u8 = 127;
pub const MASK_EDGE: u8 = 255;

/// Fills every canvas pixel strictly inside `particle` with a fresh noise draw and marks
/// it as interior in the mask. Returns the number of pixels painted.
///
/// Only the particle's clipped bounding box is visited.
pub fn paint_particle_interior<R: RngCore>(
    canvas: &mut Canvas,
    particle: &Particle,
    sampler: &PixelSampler,
    overflow: PixelOverflow,
    rng: &mut R,
) -> usize {
    let Some((min, max)) = particle.clipped_bounds(canvas.width(), canvas.height()) else {
        return 0;
    };

    let mut painted = 0;
    for y in min.y..=max.y {
        for x in min.x..=max.x {
            if !particle.contains(IVec2::new(x, y)) {
                continue;
            }
            let value = overflow.to_u8(sampler.sample(rng));
            canvas.set_intensity(x as u32, y as u32, value);
            canvas.set_mask(x as u32, y as u32, MASK_INTERIOR);
            painted += 1;
        }
    }
    painted
}

/// Radius offsets of a stroke `stroke_width` pixels wide, centred on the boundary.
///
/// Width 3 gives `-1..2`, width 2 gives `-1..1`, width 1 gives `0..1`.
pub fn stroke_offsets(stroke_width: u32) -> Range<i32> {
    let width = i32::try_from(stroke_width).unwrap_or(i32::MAX);
    let lo = -(width / 2);
    lo..lo + width
}

/// Marks a `stroke_width`-wide ring at each particle's boundary as [`MASK_EDGE`].
///
/// Particles whose radius does not fit an `i32` are skipped. Returns the number of mask
/// writes that landed on the canvas.
pub fn paint_particle_edges(
    canvas: &mut Canvas,
    particles: &[Particle],
    stroke_width: u32,
) -> usize {
    let mut written = 0;
    for particle in particles {
        let Ok(base) = i32::try_from(particle.radius) else {
            continue;
        };
        for delta in stroke_offsets(stroke_width) {
            let radius = base.saturating_add(delta);
            for p in circle_perimeter_aa(particle.center, radius) {
                if canvas.contains(p) {
                    canvas.set_mask(p.x as u32, p.y as u32, MASK_EDGE);
                    written += 1;
                }
            }
        }
    }
    written
}
