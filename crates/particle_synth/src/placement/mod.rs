//! Particle geometry and the rejection-sampling placement engine.
//!
//! A [`Particle`] is a disk with an integer center and radius. The [`PlacementEngine`]
//! holds the ordered particles accepted so far for one image and decides whether a
//! proposed candidate may join them using [`conflicts`].
use glam::IVec2;

use crate::error::{Error, Result};

pub mod engine;

pub use engine::{PlacementEngine, Proposal};

/// Largest radius accepted by [`RadiusRange::validate`].
pub const MAX_RADIUS: u32 = 1 << 16;

/// Area `pi * r^2` of a disk of radius `radius`.
#[inline]
pub fn disk_area(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius
}

/// A disk-shaped particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Particle {
    /// Center in pixel coordinates, `x` in `[1, width]`, `y` in `[1, height]`.
    pub center: IVec2,
    /// Radius in pixels.
    pub radius: u32,
}

impl Particle {
    pub fn new(x: i32, y: i32, radius: u32) -> Self {
        Self {
            center: IVec2::new(x, y),
            radius,
        }
    }

    /// Strict disk membership: `dx^2 + dy^2 < r^2`.
    #[inline]
    pub fn contains(&self, pixel: IVec2) -> bool {
        let d = (pixel - self.center).as_i64vec2();
        let r = self.radius as i64;
        d.x * d.x + d.y * d.y < r * r
    }

    /// Disk area `pi * r^2`.
    pub fn area(&self) -> f64 {
        disk_area(self.radius as f64)
    }

    /// Inclusive pixel bounding box of the disk clipped to a `width x height` canvas.
    ///
    /// Returns `None` when the disk covers no canvas pixel.
    pub fn clipped_bounds(&self, width: u32, height: u32) -> Option<(IVec2, IVec2)> {
        if self.radius == 0 || width == 0 || height == 0 {
            return None;
        }
        let reach = i32::try_from(self.radius - 1).unwrap_or(i32::MAX);
        let last = IVec2::new(
            i32::try_from(width - 1).unwrap_or(i32::MAX),
            i32::try_from(height - 1).unwrap_or(i32::MAX),
        );
        let min = self.center.saturating_sub(IVec2::splat(reach)).max(IVec2::ZERO);
        let max = self.center.saturating_add(IVec2::splat(reach)).min(last);
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some((min, max))
    }
}

/// Inclusive radius range for drawn particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadiusRange {
    pub min: u32,
    pub max: u32,
}

impl RadiusRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min == 0 {
            return Err(Error::InvalidConfig("rad_min must be > 0".into()));
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "rad_min ({}) must be <= rad_max ({})",
                self.min, self.max
            )));
        }
        if self.max > MAX_RADIUS {
            return Err(Error::InvalidConfig(format!(
                "rad_max ({}) must be <= {MAX_RADIUS}",
                self.max
            )));
        }
        Ok(())
    }
}

/// Geometric constraints applied to every candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRules {
    /// Radius range for drawn candidates.
    pub radius: RadiusRange,
    /// Fraction in `[0, 1)` of the summed radii that two particles may overlap.
    pub overlap_tolerance: f64,
}

impl PlacementRules {
    pub fn new(radius: RadiusRange, overlap_tolerance: f64) -> Self {
        Self {
            radius,
            overlap_tolerance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.radius.validate()?;
        if !(0.0..1.0).contains(&self.overlap_tolerance) {
            return Err(Error::InvalidConfig(format!(
                "overlap_tolerance must be in [0, 1), got {}",
                self.overlap_tolerance
            )));
        }
        Ok(())
    }
}

/// Whether `a` and `b` overlap by more than `tolerance` allows.
///
/// Two particles conflict when `dist^2 <= (1 - tolerance) * (ra + rb)^2`.
#[inline]
pub fn conflicts(a: &Particle, b: &Particle, tolerance: f64) -> bool {
    let d = (a.center - b.center).as_i64vec2();
    let dist_sq = (d.x * d.x + d.y * d.y) as f64;
    let reach = (a.radius as f64) + (b.radius as f64);
    dist_sq <= (1.0 - tolerance) * reach * reach
}
