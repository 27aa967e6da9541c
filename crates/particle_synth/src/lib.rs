#![forbid(unsafe_code)]
//! particle_synth: Synthetic particle images and segmentation masks.
//!
//! Modules:
//! - noise: pixel noise models (uniform, lognormal, gaussian) and 8-bit conversion
//! - canvas: intensity and mask buffers
//! - placement: particles, overlap rules and single-attempt rejection sampling
//! - render: interior fill and anti-aliased boundary strokes
//! - batch: configuration, batch driver, image sinks, events, per-image seeds
//! - size_log: append-only log of accepted radii
//! - diagnostics: area histogram over a size log
//!
//! For the command-line tools, see the `particle_synth_tools` crate.
pub mod batch;
pub mod canvas;
pub mod diagnostics;
pub mod error;
pub mod noise;
pub mod placement;
pub mod render;
pub mod size_log;

/// Convenient re-exports for common types. Import with `use particle_synth::prelude::*;`.
pub mod prelude {
    pub use crate::batch::events::{
        EventSink, FnSink, GenerationEvent, GenerationEventKind, VecSink,
    };
    pub use crate::batch::seed::seed_for_image;
    pub use crate::batch::{
        BatchDriver, BatchReport, FailureStage, GeneratedImage, GeneratorConfig, ImageFailure,
        ImageSink, MemorySink, OutputMode,
    };
    pub use crate::canvas::Canvas;
    pub use crate::diagnostics::{AreaHistogram, DEFAULT_HISTOGRAM_BINS};
    pub use crate::error::{Error, Result};
    pub use crate::noise::{NoiseModel, PixelNoise, PixelOverflow, PixelSampler};
    pub use crate::placement::{
        conflicts, Particle, PlacementEngine, PlacementRules, Proposal, RadiusRange,
    };
    pub use crate::render::{
        circle_perimeter_aa, paint_particle_edges, paint_particle_interior, MASK_BACKGROUND,
        MASK_EDGE, MASK_INTERIOR,
    };
    pub use crate::size_log::{read_size_log, CsvSizeLog, SizeLog};
}
