//! Pixel noise models used for background and particle fill.
//!
//! Three models are supported:
//! - [`NoiseModel::Uniform`]: `mean + U{-spread..=spread}` (integer offset).
//! - [`NoiseModel::LogNormal`]: lognormal draw whose *linear-space* mean and standard
//!   deviation equal `mean` and `spread` (see [`lognormal_params`]).
//! - [`NoiseModel::Gaussian`]: plain normal draw `N(mean, spread)`.
//!
//! Drawn values are `f64`; [`PixelOverflow`] decides how they land in an 8-bit buffer.
use rand::{Rng, RngCore};
use rand_distr::{Distribution, LogNormal, Normal};

use crate::error::{Error, Result};

/// Distribution family for a pixel intensity sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum NoiseModel {
    Uniform,
    LogNormal,
    Gaussian,
}

/// A noise model together with its mean/spread pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelNoise {
    /// Distribution family.
    pub model: NoiseModel,
    /// Target mean intensity.
    pub mean: f64,
    /// Offset bound (uniform) or standard deviation (lognormal, gaussian).
    pub spread: f64,
}

impl PixelNoise {
    pub fn uniform(mean: f64, spread: f64) -> Self {
        Self {
            model: NoiseModel::Uniform,
            mean,
            spread,
        }
    }

    pub fn lognormal(mean: f64, spread: f64) -> Self {
        Self {
            model: NoiseModel::LogNormal,
            mean,
            spread,
        }
    }

    pub fn gaussian(mean: f64, spread: f64) -> Self {
        Self {
            model: NoiseModel::Gaussian,
            mean,
            spread,
        }
    }

    /// Validates the parameters, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() || !self.spread.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "{:?} noise parameters must be finite (mean={}, spread={})",
                self.model, self.mean, self.spread
            )));
        }
        if self.spread < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{:?} noise spread must be >= 0, got {}",
                self.model, self.spread
            )));
        }
        if self.model == NoiseModel::LogNormal && self.mean <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "lognormal noise mean must be > 0, got {}",
                self.mean
            )));
        }
        Ok(())
    }

    /// Builds a reusable sampler for these parameters.
    pub fn sampler(&self) -> Result<PixelSampler> {
        self.validate()?;
        match self.model {
            NoiseModel::Uniform => Ok(PixelSampler::Uniform {
                mean: self.mean.round() as i64,
                spread: self.spread.round() as i64,
            }),
            NoiseModel::LogNormal => {
                let (normal_mean, normal_std) = lognormal_params(self.mean, self.spread)?;
                LogNormal::new(normal_mean, normal_std)
                    .map(PixelSampler::LogNormal)
                    .map_err(|e| Error::InvalidConfig(format!("lognormal noise: {e}")))
            }
            NoiseModel::Gaussian => Normal::new(self.mean, self.spread)
                .map(PixelSampler::Gaussian)
                .map_err(|e| Error::InvalidConfig(format!("gaussian noise: {e}"))),
        }
    }
}

/// Pre-built distribution for repeated per-pixel draws.
#[derive(Clone, Debug)]
pub enum PixelSampler {
    Uniform { mean: i64, spread: i64 },
    LogNormal(LogNormal<f64>),
    Gaussian(Normal<f64>),
}

impl PixelSampler {
    /// Draws one intensity value.
    #[inline]
    pub fn sample<R: RngCore>(&self, rng: &mut R) -> f64 {
        match self {
            PixelSampler::Uniform { mean, spread } => sample_uniform(*mean, *spread, rng) as f64,
            PixelSampler::LogNormal(dist) => dist.sample(rng),
            PixelSampler::Gaussian(dist) => dist.sample(rng),
        }
    }
}

/// How a drawn value is stored into an 8-bit pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PixelOverflow {
    /// Round to nearest and saturate to `[0, 255]`.
    #[default]
    Clamp,
    /// Truncate toward zero and wrap modulo 256.
    Wrap,
}

impl PixelOverflow {
    #[inline]
    pub fn to_u8(self, value: f64) -> u8 {
        if !value.is_finite() {
            return 0;
        }
        match self {
            PixelOverflow::Clamp => value.round().clamp(0.0, 255.0) as u8,
            PixelOverflow::Wrap => (value.trunc() as i64).rem_euclid(256) as u8,
        }
    }
}

/// Returns `mean + k` with `k` drawn uniformly from `-spread..=spread`.
///
/// The result is not clamped beyond `i64` saturation; a negative `spread` is treated as zero.
pub fn sample_uniform<R: RngCore>(mean: i64, spread: i64, rng: &mut R) -> i64 {
    let spread = spread.max(0);
    mean.saturating_add(rng.random_range(-spread..=spread))
}

/// Converts a linear-space mean/std pair into the parameters of the underlying normal.
///
/// `normal_std = sqrt(ln(1 + (spread/mean)^2))`, `normal_mean = ln(mean) - normal_std^2 / 2`.
pub fn lognormal_params(mean: f64, spread: f64) -> Result<(f64, f64)> {
    if !mean.is_finite() || mean <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "lognormal mean must be a finite value > 0, got {mean}"
        )));
    }
    if !spread.is_finite() || spread < 0.0 {
        return Err(Error::InvalidConfig(format!(
            "lognormal spread must be a finite value >= 0, got {spread}"
        )));
    }
    let ratio = spread / mean;
    let normal_std = (1.0 + ratio * ratio).ln().sqrt();
    let normal_mean = mean.ln() - normal_std * normal_std / 2.0;
    Ok((normal_mean, normal_std))
}

/// Draws one lognormal sample with linear-space mean `mean` and std `spread`.
pub fn sample_lognormal<R: RngCore>(mean: f64, spread: f64, rng: &mut R) -> Result<f64> {
    Ok(PixelNoise::lognormal(mean, spread).sampler()?.sample(rng))
}

/// Draws one normal sample `N(mean, spread)`.
pub fn sample_gaussian<R: RngCore>(mean: f64, spread: f64, rng: &mut R) -> Result<f64> {
    Ok(PixelNoise::gaussian(mean, spread).sampler()?.sample(rng))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn mean_and_std(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn uniform_stays_within_offset_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..5_000 {
            let v = sample_uniform(200, 25, &mut rng);
            assert!((175..=225).contains(&v));
            seen_low |= v == 175;
            seen_high |= v == 225;
        }
        assert!(seen_low && seen_high, "both bounds are inclusive");
    }

    #[test]
    fn uniform_zero_spread_returns_mean() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_uniform(42, 0, &mut rng), 42);
        assert_eq!(sample_uniform(42, -3, &mut rng), 42);
    }

    #[test]
    fn lognormal_params_match_closed_form() {
        let (mu, sigma) = lognormal_params(230.0, 5.0).unwrap();
        let expected_sigma = (1.0f64 + (5.0f64 / 230.0).powi(2)).ln().sqrt();
        assert!((sigma - expected_sigma).abs() < 1e-12);
        assert!((mu - (230.0f64.ln() - expected_sigma * expected_sigma / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn lognormal_rejects_non_positive_mean() {
        assert!(matches!(
            lognormal_params(0.0, 5.0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            lognormal_params(-1.0, 5.0),
            Err(Error::InvalidConfig(_))
        ));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sample_lognormal(0.0, 1.0, &mut rng).is_err());
    }

    #[test]
    fn lognormal_samples_hit_linear_mean_and_std() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for &(mean, spread) in &[(230.0, 5.0), (30.0, 10.0), (100.0, 40.0)] {
            let sampler = PixelNoise::lognormal(mean, spread).sampler().unwrap();
            let values: Vec<f64> = (0..20_000).map(|_| sampler.sample(&mut rng)).collect();
            let (m, s) = mean_and_std(&values);
            assert!(
                (m - mean).abs() / mean < 0.05,
                "mean {m} too far from {mean}"
            );
            assert!(
                (s - spread).abs() / spread < 0.05,
                "std {s} too far from {spread}"
            );
            assert!(values.iter().all(|v| *v > 0.0));
        }
    }

    #[test]
    fn gaussian_samples_hit_mean_and_std() {
        let mut rng = StdRng::seed_from_u64(11);
        let values: Vec<f64> = (0..20_000)
            .map(|_| sample_gaussian(30.0, 10.0, &mut rng).unwrap())
            .collect();
        let (m, s) = mean_and_std(&values);
        assert!((m - 30.0).abs() < 0.5);
        assert!((s - 10.0).abs() < 0.5);
    }

    #[test]
    fn validate_rejects_negative_or_non_finite_spread() {
        assert!(PixelNoise::gaussian(10.0, -1.0).validate().is_err());
        assert!(PixelNoise::uniform(10.0, f64::NAN).validate().is_err());
        assert!(PixelNoise::uniform(f64::INFINITY, 1.0).validate().is_err());
        assert!(PixelNoise::uniform(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn overflow_clamp_saturates_and_rounds() {
        assert_eq!(PixelOverflow::Clamp.to_u8(-12.0), 0);
        assert_eq!(PixelOverflow::Clamp.to_u8(300.0), 255);
        assert_eq!(PixelOverflow::Clamp.to_u8(127.6), 128);
        assert_eq!(PixelOverflow::Clamp.to_u8(f64::NAN), 0);
    }

    #[test]
    fn overflow_wrap_matches_legacy_truncation() {
        assert_eq!(PixelOverflow::Wrap.to_u8(256.0), 0);
        assert_eq!(PixelOverflow::Wrap.to_u8(460.9), 204);
        assert_eq!(PixelOverflow::Wrap.to_u8(-1.0), 255);
        assert_eq!(PixelOverflow::Wrap.to_u8(99.99), 99);
    }

    #[test]
    fn uniform_saturates_at_extreme_means() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            assert!(sample_uniform(i64::MAX, 10, &mut rng) >= i64::MAX - 10);
            assert!(sample_uniform(i64::MIN, 10, &mut rng) <= i64::MIN + 10);
        }
        let sampler = PixelNoise::uniform(9.3e18, 10.0).sampler().unwrap();
        let v = sampler.sample(&mut rng);
        assert_eq!(PixelOverflow::Clamp.to_u8(v), 255);
    }

    #[test]
    fn sampler_is_deterministic_for_seed() {
        let sampler = PixelNoise::uniform(100.0, 25.0).sampler().unwrap();
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let va: Vec<f64> = (0..32).map(|_| sampler.sample(&mut a)).collect();
        let vb: Vec<f64> = (0..32).map(|_| sampler.sample(&mut b)).collect();
        assert_eq!(va, vb);
    }
}
