//! Event types and sinks for observing batch generation.
//!
//! This module defines [`GenerationEvent`] and a set of sinks to emit, collect, or
//! forward events while a [`crate::batch::BatchDriver`] runs.
use crate::batch::FailureStage;
use crate::placement::Particle;

/// Describes events emitted during generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Emitted once before the first image.
    BatchStarted {
        /// Number of images requested.
        count: usize,
        /// Seed from which per-image seeds are derived.
        base_seed: u64,
    },

    /// Emitted when an image starts, after its target count was drawn.
    ImageStarted { index: usize, target_count: usize },

    /// Emitted for every accepted particle, including the first.
    ParticleAccepted { index: usize, particle: Particle },

    /// Emitted when a candidate is discarded by the overlap test.
    CandidateRejected {
        index: usize,
        candidate: Particle,
        /// Position of the conflicting particle in acceptance order.
        conflicts_with: usize,
    },

    /// Emitted after the image sink stored the image.
    ImagePersisted { index: usize, particle_count: usize },

    /// Emitted when an image is abandoned.
    ImageFailed {
        index: usize,
        stage: FailureStage,
        message: String,
    },

    /// Emitted once after the last image.
    BatchFinished {
        persisted: usize,
        failed: usize,
        particles_accepted: usize,
    },
}

/// Discriminant of [`GenerationEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    BatchStarted,
    ImageStarted,
    ParticleAccepted,
    CandidateRejected,
    ImagePersisted,
    ImageFailed,
    BatchFinished,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::BatchStarted { .. } => GenerationEventKind::BatchStarted,
            GenerationEvent::ImageStarted { .. } => GenerationEventKind::ImageStarted,
            GenerationEvent::ParticleAccepted { .. } => GenerationEventKind::ParticleAccepted,
            GenerationEvent::CandidateRejected { .. } => GenerationEventKind::CandidateRejected,
            GenerationEvent::ImagePersisted { .. } => GenerationEventKind::ImagePersisted,
            GenerationEvent::ImageFailed { .. } => GenerationEventKind::ImageFailed,
            GenerationEvent::BatchFinished { .. } => GenerationEventKind::BatchFinished,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
    only: Option<Vec<GenerationEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only events whose kind is listed.
    pub fn only(kinds: &[GenerationEventKind]) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.to_vec()),
        }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: GenerationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.only.as_ref().is_none_or(|k| k.contains(&kind))
    }
}
