//! Generation settings shared by every image of a batch.
use crate::error::{Error, Result};
use crate::noise::{PixelNoise, PixelOverflow};
use crate::placement::{PlacementRules, RadiusRange, MAX_RADIUS};

/// Which buffers are handed to the image sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum OutputMode {
    /// Intensity image only.
    ImageOnly,
    /// Intensity image and the three-class mask.
    #[default]
    ImageAndMask,
}

impl OutputMode {
    pub fn writes_mask(self) -> bool {
        matches!(self, OutputMode::ImageAndMask)
    }
}

/// Configuration for a batch of generated images.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GeneratorConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Noise used for every background pixel.
    pub background: PixelNoise,
    /// Noise used for every particle interior pixel.
    pub particle: PixelNoise,
    /// Inclusive radius range of drawn particles.
    pub radius: RadiusRange,
    /// Fraction in `[0, 1)` of summed radii two particles may overlap.
    pub overlap_tolerance: f64,
    /// Menu of particle-count targets; one is picked uniformly per image.
    pub target_counts: Vec<usize>,
    /// Width in pixels of the boundary ring drawn into the mask.
    pub stroke_width: u32,
    /// Which buffers are persisted.
    pub output_mode: OutputMode,
    /// How out-of-range draws are stored into 8-bit pixels.
    pub overflow: PixelOverflow,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            background: PixelNoise::gaussian(60.0, 10.0),
            particle: PixelNoise::lognormal(230.0, 5.0),
            radius: RadiusRange::new(20, 40),
            overlap_tolerance: 0.5,
            target_counts: vec![100, 10, 1],
            stroke_width: 3,
            output_mode: OutputMode::ImageAndMask,
            overflow: PixelOverflow::Clamp,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new [`GeneratorConfig`] with the given canvas size and default settings.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Image-only preset with uniform background and particle noise.
    pub fn image_only_uniform() -> Self {
        Self {
            background: PixelNoise::uniform(100.0, 25.0),
            particle: PixelNoise::uniform(200.0, 25.0),
            overlap_tolerance: 0.05,
            target_counts: vec![100],
            output_mode: OutputMode::ImageOnly,
            ..Default::default()
        }
    }

    /// Sets the canvas size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the background noise.
    pub fn with_background(mut self, background: PixelNoise) -> Self {
        self.background = background;
        self
    }

    /// Sets the particle interior noise.
    pub fn with_particle_noise(mut self, particle: PixelNoise) -> Self {
        self.particle = particle;
        self
    }

    /// Sets the inclusive radius range.
    pub fn with_radius(mut self, min: u32, max: u32) -> Self {
        self.radius = RadiusRange::new(min, max);
        self
    }

    /// Sets the overlap tolerance.
    pub fn with_overlap_tolerance(mut self, overlap_tolerance: f64) -> Self {
        self.overlap_tolerance = overlap_tolerance;
        self
    }

    /// Sets the particle-count target menu.
    pub fn with_target_counts(mut self, target_counts: Vec<usize>) -> Self {
        self.target_counts = target_counts;
        self
    }

    /// Sets the mask boundary stroke width.
    pub fn with_stroke_width(mut self, stroke_width: u32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Sets the output mode.
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    /// Sets the pixel overflow policy.
    pub fn with_overflow(mut self, overflow: PixelOverflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Placement rules derived from this configuration.
    pub fn placement_rules(&self) -> PlacementRules {
        PlacementRules::new(self.radius, self.overlap_tolerance)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas dimensions must be > 0, got {}x{}",
                self.width, self.height
            )));
        }
        self.placement_rules().validate()?;
        let longest = self.width.max(self.height);
        if self.radius.max > longest {
            return Err(Error::InvalidConfig(format!(
                "rad_max ({}) must not exceed the longest canvas side ({longest})",
                self.radius.max
            )));
        }
        if self.target_counts.is_empty() {
            return Err(Error::InvalidConfig("target_counts must not be empty".into()));
        }
        if self.target_counts.contains(&0) {
            return Err(Error::InvalidConfig(
                "every target count must be >= 1".into(),
            ));
        }
        if self.stroke_width == 0 || self.stroke_width > MAX_RADIUS {
            return Err(Error::InvalidConfig(format!(
                "stroke_width must be in 1..={MAX_RADIUS}, got {}",
                self.stroke_width
            )));
        }
        self.background.validate()?;
        self.particle.validate()?;
        Ok(())
    }
}
