//! TIFF persistence of generated images and masks.
use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat};
use particle_synth::batch::{GeneratedImage, ImageSink, OutputMode};
use particle_synth::error::{Error, Result};
use tracing::debug;

/// File name shared by an image and its mask.
pub fn particle_file_name(index: usize) -> String {
    format!("particles{index}.tif")
}

/// Writes 8-bit greyscale TIFFs named `particles<index>.tif`.
///
/// Masks go to a separate directory under the same name.
#[derive(Debug, Clone)]
pub struct TiffDirectorySink {
    image_dir: PathBuf,
    mask_dir: Option<PathBuf>,
}

impl TiffDirectorySink {
    /// Creates the output directories if they are missing.
    pub fn create(image_dir: impl Into<PathBuf>, mask_dir: Option<PathBuf>) -> Result<Self> {
        let image_dir = image_dir.into();
        create_dir(&image_dir)?;
        if let Some(dir) = &mask_dir {
            create_dir(dir)?;
        }
        Ok(Self {
            image_dir,
            mask_dir,
        })
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn image_path(&self, index: usize) -> PathBuf {
        self.image_dir.join(particle_file_name(index))
    }

    pub fn mask_path(&self, index: usize) -> Option<PathBuf> {
        self.mask_dir
            .as_ref()
            .map(|dir| dir.join(particle_file_name(index)))
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::persist(dir, e))
}

fn write_gray(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<()> {
    let img = GrayImage::from_raw(width, height, pixels.to_vec()).ok_or_else(|| {
        Error::persist(
            path,
            format!("buffer of {} bytes does not fit {width}x{height}", pixels.len()),
        )
    })?;
    img.save_with_format(path, ImageFormat::Tiff)
        .map_err(|e| Error::persist(path, e))
}

impl ImageSink for TiffDirectorySink {
    fn persist(&mut self, image: &GeneratedImage, mode: OutputMode) -> Result<()> {
        let canvas = &image.canvas;
        let (width, height) = (canvas.width(), canvas.height());

        let image_path = self.image_path(image.index);
        write_gray(&image_path, width, height, canvas.intensity())?;
        debug!("Wrote {}.", image_path.display());

        if mode.writes_mask() {
            let mask_path = self.mask_path(image.index).ok_or_else(|| {
                Error::InvalidConfig("mask output requested but no mask directory set".into())
            })?;
            write_gray(&mask_path, width, height, canvas.mask())?;
            debug!("Wrote {}.", mask_path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use particle_synth::canvas::Canvas;
    use particle_synth::placement::Particle;

    use super::*;

    fn generated(index: usize) -> GeneratedImage {
        let mut canvas = Canvas::try_new(8, 6).unwrap();
        canvas.set_intensity(2, 3, 200);
        canvas.set_mask(2, 3, 127);
        GeneratedImage {
            index,
            target_count: 1,
            canvas,
            particles: vec![Particle::new(2, 3, 1)],
            candidates_rejected: 0,
        }
    }

    #[test]
    fn file_names_are_keyed_by_index() {
        assert_eq!(particle_file_name(0), "particles0.tif");
        assert_eq!(particle_file_name(17), "particles17.tif");
    }

    #[test]
    fn writes_image_and_mask() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TiffDirectorySink::create(
            dir.path().join("images"),
            Some(dir.path().join("masks")),
        )
        .unwrap();
        sink.persist(&generated(4), OutputMode::ImageAndMask).unwrap();

        let img = image::open(sink.image_path(4)).unwrap().into_luma8();
        assert_eq!(img.dimensions(), (8, 6));
        assert_eq!(img.get_pixel(2, 3).0, [200]);
        let mask = image::open(sink.mask_path(4).unwrap()).unwrap().into_luma8();
        assert_eq!(mask.get_pixel(2, 3).0, [127]);
        assert_eq!(mask.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn image_only_skips_mask() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink =
            TiffDirectorySink::create(dir.path(), Some(dir.path().join("masks"))).unwrap();
        sink.persist(&generated(1), OutputMode::ImageOnly).unwrap();
        assert!(sink.image_path(1).exists());
        assert!(!sink.mask_path(1).unwrap().exists());
    }

    #[test]
    fn mask_without_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TiffDirectorySink::create(dir.path(), None).unwrap();
        let err = sink
            .persist(&generated(0), OutputMode::ImageAndMask)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn unwritable_path_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TiffDirectorySink::create(dir.path().join("images"), None).unwrap();
        std::fs::remove_dir(sink.image_dir()).unwrap();
        let err = sink
            .persist(&generated(9), OutputMode::ImageOnly)
            .unwrap_err();
        assert!(matches!(err, Error::Persist { .. }));
        assert!(err.to_string().contains("particles9.tif"));
    }
}
