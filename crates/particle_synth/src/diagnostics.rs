//! Area distribution of logged particle radii.
use crate::error::{Error, Result};
use crate::placement::disk_area;

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Equal-width histogram of particle areas (`pi * r^2`).
#[derive(Clone, Debug, PartialEq)]
pub struct AreaHistogram {
    /// Lower edge of the first bin.
    pub min_area: f64,
    /// Upper edge of the last bin.
    pub max_area: f64,
    /// Count per bin; the last bin is closed on the right.
    pub counts: Vec<usize>,
}

impl AreaHistogram {
    /// Bins the areas of `radii` over `[min, max]`.
    ///
    /// When every area is identical the range is widened to `area +/- 0.5`.
    pub fn from_radii(radii: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidConfig("histogram bins must be > 0".into()));
        }
        if radii.is_empty() {
            return Err(Error::Other("no radii to bin".into()));
        }
        if let Some(bad) = radii.iter().find(|r| !r.is_finite()) {
            return Err(Error::Other(format!("non-finite radius {bad}")));
        }

        let areas: Vec<f64> = radii.iter().map(|r| disk_area(*r)).collect();
        let mut min_area = areas.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max_area = areas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max_area - min_area <= f64::EPSILON * max_area.abs().max(1.0) {
            min_area -= 0.5;
            max_area += 0.5;
        }

        let width = (max_area - min_area) / bins as f64;
        let mut counts = vec![0usize; bins];
        for area in areas {
            let idx = (((area - min_area) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self {
            min_area,
            max_area,
            counts,
        })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.max_area - self.min_area) / self.counts.len() as f64
    }

    /// `(lower, upper)` edges of bin `idx`.
    pub fn bin_edges(&self, idx: usize) -> (f64, f64) {
        let w = self.bin_width();
        let lo = self.min_area + w * idx as f64;
        (lo, lo + w)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
