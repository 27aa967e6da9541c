//! Single-attempt rejection sampling of particles for one image.
use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::placement::{conflicts, Particle, PlacementRules};

/// Outcome of proposing one additional particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proposal {
    /// Candidate was appended to the particle list.
    Accepted(Particle),
    /// Candidate conflicted with the existing particle at `conflicts_with` and was discarded.
    Rejected {
        candidate: Particle,
        conflicts_with: usize,
    },
}

impl Proposal {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Proposal::Accepted(_))
    }
}

/// Holds the ordered particles accepted for one image.
///
/// Insertion order is acceptance order; later candidates are tested against every
/// earlier particle. A rejected candidate is not retried.
#[derive(Clone, Debug)]
pub struct PlacementEngine {
    width: u32,
    height: u32,
    rules: PlacementRules,
    particles: Vec<Particle>,
}

impl PlacementEngine {
    /// Creates an empty engine for a `width x height` canvas.
    pub fn try_new(width: u32, height: u32, rules: PlacementRules) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "canvas dimensions must be > 0, got {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::InvalidConfig(format!(
                "canvas dimensions exceed i32 range: {width}x{height}"
            )));
        }
        rules.validate()?;
        Ok(Self {
            width,
            height,
            rules,
            particles: Vec::new(),
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Draws a candidate with center in `[1, width] x [1, height]` and radius in the rule range.
    pub fn draw_candidate<R: RngCore>(&self, rng: &mut R) -> Particle {
        let x = rng.random_range(1..=self.width as i32);
        let y = rng.random_range(1..=self.height as i32);
        let radius = rng.random_range(self.rules.radius.min..=self.rules.radius.max);
        Particle::new(x, y, radius)
    }

    /// Places the mandatory first particle unconditionally.
    pub fn propose_first<R: RngCore>(&mut self, rng: &mut R) -> Result<Particle> {
        if !self.particles.is_empty() {
            return Err(Error::InvalidState(format!(
                "first particle already placed ({} particles present)",
                self.particles.len()
            )));
        }
        let particle = self.draw_candidate(rng);
        self.particles.push(particle);
        Ok(particle)
    }

    /// Draws one candidate and accepts it unless it conflicts with any existing particle.
    pub fn propose_additional<R: RngCore>(&mut self, rng: &mut R) -> Proposal {
        let candidate = self.draw_candidate(rng);
        self.try_place(candidate)
    }

    /// Index of the first existing particle that `candidate` conflicts with.
    pub fn first_conflict(&self, candidate: &Particle) -> Option<usize> {
        self.particles
            .iter()
            .position(|p| conflicts(candidate, p, self.rules.overlap_tolerance))
    }

    /// Tests `candidate` against the existing particles and appends it when clear.
    pub fn try_place(&mut self, candidate: Particle) -> Proposal {
        match self.first_conflict(&candidate) {
            Some(conflicts_with) => Proposal::Rejected {
                candidate,
                conflicts_with,
            },
            None => {
                self.particles.push(candidate);
                Proposal::Accepted(candidate)
            }
        }
    }
}
