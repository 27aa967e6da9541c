//! Destinations for finished images.
use crate::batch::{GeneratedImage, OutputMode};
use crate::error::Result;

/// Stores a finished image and, depending on `mode`, its mask.
///
/// An error abandons only the image being persisted; the batch continues.
pub trait ImageSink {
    fn persist(&mut self, image: &GeneratedImage, mode: OutputMode) -> Result<()>;
}

/// Discards every image.
impl ImageSink for () {
    #[inline]
    fn persist(&mut self, _image: &GeneratedImage, _mode: OutputMode) -> Result<()> {
        Ok(())
    }
}

/// Keeps persisted images in memory.
///
/// With [`OutputMode::ImageOnly`] the stored copy has its mask cleared to background.
#[derive(Default)]
pub struct MemorySink {
    images: Vec<GeneratedImage>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn into_images(self) -> Vec<GeneratedImage> {
        self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSink for MemorySink {
    fn persist(&mut self, image: &GeneratedImage, mode: OutputMode) -> Result<()> {
        let mut stored = image.clone();
        if !mode.writes_mask() {
            stored.canvas.clear_mask();
        }
        self.images.push(stored);
        Ok(())
    }
}
