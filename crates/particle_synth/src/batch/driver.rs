//! Batch driver: generates, renders and persists a sequence of images.
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::batch::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::batch::seed::seed_for_image;
use crate::batch::{GeneratorConfig, ImageSink};
use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::noise::PixelSampler;
use crate::placement::{Particle, PlacementEngine, Proposal};
use crate::render::{paint_particle_edges, paint_particle_interior};
use crate::size_log::SizeLog;

/// A fully rendered image together with the particles it contains.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Position of the image within its batch; used to name output files.
    pub index: usize,
    /// Particle-count target drawn for this image.
    pub target_count: usize,
    /// Rendered intensity and mask buffers.
    pub canvas: Canvas,
    /// Accepted particles in acceptance order.
    pub particles: Vec<Particle>,
    /// Candidates discarded by the overlap test.
    pub candidates_rejected: usize,
}

/// Step of image generation at which an image was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureStage {
    FirstParticle,
    AdditionalParticles,
    Persist,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureStage::FirstParticle => "first particle",
            FailureStage::AdditionalParticles => "additional particles",
            FailureStage::Persist => "persist",
        };
        f.write_str(s)
    }
}

/// An abandoned image, with the cause preserved.
#[derive(Debug, thiserror::Error)]
#[error("image {index} failed at {stage}: {source}")]
pub struct ImageFailure {
    pub index: usize,
    pub stage: FailureStage,
    #[source]
    pub source: Error,
}

impl ImageFailure {
    fn new(index: usize, stage: FailureStage, source: Error) -> Self {
        Self {
            index,
            stage,
            source,
        }
    }
}

/// Summary of a batch run.
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of images requested.
    pub requested: usize,
    /// Number of images handed to the image sink successfully.
    pub persisted: usize,
    /// Abandoned images, in index order.
    pub failures: Vec<ImageFailure>,
    /// Radii appended to the size log, including those of abandoned images.
    pub particles_accepted: usize,
    /// Candidates discarded across the batch.
    pub candidates_rejected: usize,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every requested image was persisted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.persisted == self.requested
    }
}

/// Counts successful appends on behalf of the report.
struct CountingLog<'a> {
    inner: &'a mut dyn SizeLog,
    appended: usize,
}

impl SizeLog for CountingLog<'_> {
    fn append(&mut self, radius: u32) -> Result<()> {
        self.inner.append(radius)?;
        self.appended += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

/// Generates batches of images from a validated [`GeneratorConfig`].
pub struct BatchDriver {
    config: GeneratorConfig,
    background: PixelSampler,
    particle: PixelSampler,
}

impl BatchDriver {
    /// Validates `config` and prepares the pixel samplers.
    ///
    /// All configuration errors surface here, before anything is drawn.
    pub fn try_new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let background = config.background.sampler()?;
        let particle = config.particle.sampler()?;
        Ok(Self {
            config,
            background,
            particle,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Picks a particle-count target uniformly from the configured menu.
    pub fn pick_target<R: RngCore>(&self, rng: &mut R) -> usize {
        let menu = &self.config.target_counts;
        menu[rng.random_range(0..menu.len())]
    }

    /// Generates and renders one image.
    ///
    /// Every accepted particle, the mandatory first one included, is appended to
    /// `size_log` as soon as it is accepted. Radii logged before a failure stay logged.
    pub fn generate_image<R: RngCore>(
        &self,
        index: usize,
        rng: &mut R,
        size_log: &mut dyn SizeLog,
        events: &mut dyn EventSink,
    ) -> std::result::Result<GeneratedImage, ImageFailure> {
        let cfg = &self.config;
        let target_count = self.pick_target(rng);
        if events.wants(GenerationEventKind::ImageStarted) {
            events.send(GenerationEvent::ImageStarted {
                index,
                target_count,
            });
        }

        let first_failed = |e: Error| ImageFailure::new(index, FailureStage::FirstParticle, e);
        let mut canvas = Canvas::try_new(cfg.width, cfg.height).map_err(first_failed)?;
        canvas.fill_background(&self.background, cfg.overflow, rng);

        let mut engine = PlacementEngine::try_new(cfg.width, cfg.height, cfg.placement_rules())
            .map_err(first_failed)?;
        let first = engine.propose_first(rng).map_err(first_failed)?;
        size_log.append(first.radius).map_err(first_failed)?;
        if events.wants(GenerationEventKind::ParticleAccepted) {
            events.send(GenerationEvent::ParticleAccepted {
                index,
                particle: first,
            });
        }

        let mut candidates_rejected = 0;
        for _ in 1..target_count {
            match engine.propose_additional(rng) {
                Proposal::Accepted(particle) => {
                    size_log.append(particle.radius).map_err(|e| {
                        ImageFailure::new(index, FailureStage::AdditionalParticles, e)
                    })?;
                    if events.wants(GenerationEventKind::ParticleAccepted) {
                        events.send(GenerationEvent::ParticleAccepted { index, particle });
                    }
                }
                Proposal::Rejected {
                    candidate,
                    conflicts_with,
                } => {
                    candidates_rejected += 1;
                    if events.wants(GenerationEventKind::CandidateRejected) {
                        events.send(GenerationEvent::CandidateRejected {
                            index,
                            candidate,
                            conflicts_with,
                        });
                    }
                }
            }
        }

        let particles = engine.into_particles();
        for particle in &particles {
            paint_particle_interior(&mut canvas, particle, &self.particle, cfg.overflow, rng);
        }
        paint_particle_edges(&mut canvas, &particles, cfg.stroke_width);

        Ok(GeneratedImage {
            index,
            target_count,
            canvas,
            particles,
            candidates_rejected,
        })
    }

    /// Generates `count` images, seeding image `i` with `seed_for_image(base_seed, i)`.
    ///
    /// A failing image is recorded in the report and skipped. The only batch-level error
    /// is a failure to flush `size_log` once all images are done.
    pub fn run(
        &self,
        count: usize,
        base_seed: u64,
        images: &mut dyn ImageSink,
        size_log: &mut dyn SizeLog,
        events: &mut dyn EventSink,
    ) -> Result<BatchReport> {
        info!(
            count,
            base_seed,
            width = self.config.width,
            height = self.config.height,
            "Starting particle batch."
        );
        if events.wants(GenerationEventKind::BatchStarted) {
            events.send(GenerationEvent::BatchStarted { count, base_seed });
        }

        let mut log = CountingLog {
            inner: size_log,
            appended: 0,
        };
        let mut report = BatchReport {
            requested: count,
            ..Default::default()
        };

        for index in 0..count {
            let mut rng = StdRng::seed_from_u64(seed_for_image(base_seed, index));
            let outcome = self
                .generate_image(index, &mut rng, &mut log, events)
                .and_then(|image| {
                    report.candidates_rejected += image.candidates_rejected;
                    images
                        .persist(&image, self.config.output_mode)
                        .map(|()| image.particles.len())
                        .map_err(|e| ImageFailure::new(index, FailureStage::Persist, e))
                });

            match outcome {
                Ok(particle_count) => {
                    report.persisted += 1;
                    debug!(index, particle_count, "Image persisted.");
                    if events.wants(GenerationEventKind::ImagePersisted) {
                        events.send(GenerationEvent::ImagePersisted {
                            index,
                            particle_count,
                        });
                    }
                }
                Err(failure) => {
                    warn!(index, stage = %failure.stage, "Skipping image: {}.", failure.source);
                    if events.wants(GenerationEventKind::ImageFailed) {
                        events.send(GenerationEvent::ImageFailed {
                            index,
                            stage: failure.stage,
                            message: failure.source.to_string(),
                        });
                    }
                    report.failures.push(failure);
                }
            }

            if let Err(e) = log.flush() {
                warn!("Failed to flush size log after image {}: {}.", index, e);
            }
        }

        log.flush()?;
        report.particles_accepted = log.appended;

        info!(
            persisted = report.persisted,
            failed = report.failed(),
            particles = report.particles_accepted,
            "Particle batch finished."
        );
        if events.wants(GenerationEventKind::BatchFinished) {
            events.send(GenerationEvent::BatchFinished {
                persisted: report.persisted,
                failed: report.failed(),
                particles_accepted: report.particles_accepted,
            });
        }
        Ok(report)
    }
}
