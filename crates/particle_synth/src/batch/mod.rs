//! Batch generation of particle images: configuration, per-image seeding, sinks and events.
pub mod config;
pub mod driver;
pub mod events;
pub mod seed;
pub mod sink;

pub use config::{GeneratorConfig, OutputMode};
pub use driver::{BatchDriver, BatchReport, FailureStage, GeneratedImage, ImageFailure};
pub use sink::{ImageSink, MemorySink};
