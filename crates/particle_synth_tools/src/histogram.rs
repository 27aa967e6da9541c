//! Area histogram of a size log, rendered as a PNG bar chart.
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{ImageFormat, Rgb, RgbImage};
use particle_synth::diagnostics::AreaHistogram;
use particle_synth::error::{Error, Result};
use particle_synth::size_log::read_size_log;
use tracing::info;

/// `chrono` format used for timestamped output names, e.g. `18-Oct-2026_14.03.59`.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y_%H.%M.%S";

const MARGIN: u32 = 24;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);
const BAR_GAP: u32 = 1;

/// Builds `<dir>/<prefix>_<local timestamp>.<ext>`.
pub fn timestamped_path(dir: impl AsRef<Path>, prefix: &str, ext: &str) -> PathBuf {
    let stamp = Local::now().format(TIMESTAMP_FORMAT);
    dir.as_ref().join(format!("{prefix}_{stamp}.{ext}"))
}

/// Draws `histogram` as a bar chart of `size.0 x size.1` pixels and saves it as PNG.
pub fn render_histogram_png(
    histogram: &AreaHistogram,
    path: impl AsRef<Path>,
    size: (u32, u32),
) -> Result<()> {
    let (width, height) = size;
    let bins = histogram.bins() as u32;
    let plot_w = width.saturating_sub(2 * MARGIN);
    let plot_h = height.saturating_sub(2 * MARGIN);
    if plot_w < bins || plot_h == 0 {
        return Err(Error::InvalidConfig(format!(
            "histogram image {width}x{height} too small for {bins} bins"
        )));
    }

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let base_y = MARGIN + plot_h;
    let max_count = histogram.max_count().max(1) as f64;

    for (i, &count) in histogram.counts.iter().enumerate() {
        let x0 = MARGIN + plot_w * i as u32 / bins;
        let x1 = MARGIN + plot_w * (i as u32 + 1) / bins;
        let bar_h = ((count as f64 / max_count) * plot_h as f64).round() as u32;
        let right = if x1 - x0 > BAR_GAP { x1 - BAR_GAP } else { x1 };
        for x in x0..right {
            for y in (base_y - bar_h)..base_y {
                img.put_pixel(x, y, BAR);
            }
        }
    }

    for x in MARGIN..MARGIN + plot_w {
        img.put_pixel(x, base_y, AXIS);
    }
    for y in MARGIN..=base_y {
        img.put_pixel(MARGIN - 1, y, AXIS);
    }

    let path = path.as_ref();
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| Error::persist(path, e))
}

/// Reads a size log, bins the particle areas and writes the chart.
///
/// Without `out`, the chart goes to a timestamped `size_histogram_*.png` in the current
/// directory. Returns the path written.
pub fn plot_size_log(log: &Path, bins: usize, out: Option<PathBuf>) -> Result<PathBuf> {
    let radii = read_size_log(log)?;
    let histogram = AreaHistogram::from_radii(&radii, bins)?;
    info!(
        particles = histogram.total(),
        min_area = histogram.min_area,
        max_area = histogram.max_area,
        "Binned particle areas from {}.",
        log.display()
    );
    for (i, count) in histogram.counts.iter().enumerate() {
        let (lo, hi) = histogram.bin_edges(i);
        info!("area {:>9.1} .. {:>9.1}: {}", lo, hi, count);
    }

    let path = out.unwrap_or_else(|| timestamped_path(".", "size_histogram", "png"));
    render_histogram_png(&histogram, &path, (640, 480))?;
    info!("Wrote histogram to {}.", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamped_name_has_expected_shape() {
        let path = timestamped_path("logs", "sizes", "csv");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("sizes_"));
        assert!(name.ends_with(".csv"));
        // sizes_dd-Mon-YYYY_HH.MM.SS.csv
        assert_eq!(name.len(), "sizes_".len() + 20 + ".csv".len());
        assert!(path.starts_with("logs"));
    }

    #[test]
    fn renders_bars_proportional_to_counts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("hist.png");
        let histogram = AreaHistogram::from_radii(&[10.0, 10.0, 20.0], 2).unwrap();
        render_histogram_png(&histogram, &out, (100, 80)).unwrap();

        let img = image::open(&out).unwrap().into_rgb8();
        assert_eq!(img.dimensions(), (100, 80));
        // first bin is full height, second half height
        assert_eq!(*img.get_pixel(30, MARGIN), BAR);
        assert_eq!(*img.get_pixel(60, MARGIN), BACKGROUND);
        assert_eq!(*img.get_pixel(60, 80 - MARGIN - 2), BAR);
    }

    #[test]
    fn too_small_image_is_rejected() {
        let histogram = AreaHistogram::from_radii(&[1.0, 2.0], 20).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = render_histogram_png(&histogram, dir.path().join("x.png"), (50, 50));
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn plot_size_log_writes_requested_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("sizes.csv");
        std::fs::write(&log, "20\n25\n40\n").unwrap();
        let out = dir.path().join("areas.png");
        let written = plot_size_log(&log, 20, Some(out.clone())).unwrap();
        assert_eq!(written, out);
        assert!(out.exists());
    }
}
