//! Argument parsing for the binaries.
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use particle_synth::batch::GeneratorConfig;
use particle_synth::diagnostics::DEFAULT_HISTOGRAM_BINS;

use crate::histogram::timestamped_path;

pub const GENERATE_USAGE: &str =
    "Usage: generate-particles [number of images/masks to generate]";

/// Built-in generation presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Gaussian background, lognormal particles, image and mask.
    #[default]
    Mask,
    /// Uniform noise throughout, image only.
    ImageOnly,
}

impl Variant {
    pub fn config(self) -> GeneratorConfig {
        match self {
            Variant::Mask => GeneratorConfig::default(),
            Variant::ImageOnly => GeneratorConfig::image_only_uniform(),
        }
    }
}

/// Generate synthetic particle images and segmentation masks.
#[derive(Debug, Parser)]
#[command(name = "generate-particles", version)]
pub struct GenerateArgs {
    /// Number of images/masks to generate.
    pub count: usize,

    /// Base seed; a random one is drawn and logged when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Generation preset.
    #[arg(long, value_enum, default_value_t = Variant::Mask)]
    pub variant: Variant,

    /// JSON generator configuration; replaces the preset.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for intensity images.
    #[arg(long, value_name = "DIR", default_value = "Out")]
    pub image_dir: PathBuf,

    /// Directory for masks.
    #[arg(long, value_name = "DIR", default_value = "Out/masks")]
    pub mask_dir: PathBuf,

    /// Size log to append accepted radii to.
    #[arg(long, value_name = "FILE", default_value = "sizes.csv")]
    pub size_log: PathBuf,

    /// Log to `sizes_<timestamp>.csv` next to `--size-log` instead.
    #[arg(long)]
    pub timestamped_log: bool,

    /// Render the area histogram of the size log after the batch.
    #[arg(long)]
    pub histogram: bool,
}

impl GenerateArgs {
    /// Parses the process arguments. Help and version exit normally; any other parse
    /// failure prints [`GENERATE_USAGE`] and exits with status 1.
    pub fn parse_or_usage() -> Self {
        match Self::try_parse() {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                eprintln!("{e}");
                println!("\n{GENERATE_USAGE}\n");
                std::process::exit(1);
            }
        }
    }

    /// Configuration from `--config` if given, else from the selected variant.
    pub fn load_config(&self) -> anyhow::Result<GeneratorConfig> {
        let Some(path) = &self.config else {
            return Ok(self.variant.config());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let config: GeneratorConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config '{}'", path.display()))?;
        Ok(config)
    }

    /// Resolved size-log path.
    pub fn size_log_path(&self) -> PathBuf {
        if !self.timestamped_log {
            return self.size_log.clone();
        }
        let dir = self
            .size_log
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let prefix = self
            .size_log
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sizes");
        timestamped_path(dir, prefix, "csv")
    }
}

/// Plot the particle-area histogram of a size log.
#[derive(Debug, Parser)]
#[command(name = "size-histogram", version)]
pub struct HistogramArgs {
    /// Size log with one radius per line.
    pub log: PathBuf,

    /// Number of equal-width bins.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Output PNG; defaults to a timestamped file in the current directory.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use particle_synth::batch::OutputMode;
    use particle_synth::noise::NoiseModel;

    use super::*;

    #[test]
    fn count_is_required_and_numeric() {
        assert!(GenerateArgs::try_parse_from(["generate-particles"]).is_err());
        assert!(GenerateArgs::try_parse_from(["generate-particles", "ten"]).is_err());
        assert!(GenerateArgs::try_parse_from(["generate-particles", "-3"]).is_err());

        let args = GenerateArgs::try_parse_from(["generate-particles", "10"]).unwrap();
        assert_eq!(args.count, 10);
        assert_eq!(args.variant, Variant::Mask);
        assert_eq!(args.size_log_path(), PathBuf::from("sizes.csv"));
        assert!(args.seed.is_none());
    }

    #[test]
    fn variants_select_presets() {
        let args = GenerateArgs::try_parse_from([
            "generate-particles",
            "2",
            "--variant",
            "image-only",
            "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        let cfg = args.load_config().unwrap();
        assert_eq!(cfg.output_mode, OutputMode::ImageOnly);
        assert_eq!(cfg.background.model, NoiseModel::Uniform);

        let cfg = Variant::Mask.config();
        assert_eq!(cfg.output_mode, OutputMode::ImageAndMask);
    }

    #[test]
    fn config_file_overrides_variant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(
            &path,
            r#"{ "width": 64, "height": 48, "target_counts": [5],
                 "background": { "model": "uniform", "mean": 40.0, "spread": 3.0 } }"#,
        )
        .unwrap();
        let args = GenerateArgs::try_parse_from([
            "generate-particles",
            "1",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let cfg = args.load_config().unwrap();
        assert_eq!((cfg.width, cfg.height), (64, 48));
        assert_eq!(cfg.target_counts, vec![5]);
        assert_eq!(cfg.background.model, NoiseModel::Uniform);
        assert_eq!(cfg.particle.model, NoiseModel::LogNormal);
        cfg.validate().unwrap();
    }

    #[test]
    fn timestamped_log_keeps_directory_and_stem() {
        let args = GenerateArgs::try_parse_from([
            "generate-particles",
            "1",
            "--size-log",
            "logs/radii.csv",
            "--timestamped-log",
        ])
        .unwrap();
        let path = args.size_log_path();
        assert!(path.starts_with("logs"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("radii_") && name.ends_with(".csv"));
    }

    #[test]
    fn histogram_args_default_bins() {
        let args = HistogramArgs::try_parse_from(["size-histogram", "sizes.csv"]).unwrap();
        assert_eq!(args.bins, DEFAULT_HISTOGRAM_BINS);
        assert!(args.out.is_none());
    }
}
