use anyhow::Context;
use particle_synth::prelude::*;
use particle_synth_tools::{init_tracing, plot_size_log, GenerateArgs, TiffDirectorySink};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = GenerateArgs::parse_or_usage();

    let driver = BatchDriver::try_new(args.load_config()?)?;
    let mask_dir = driver
        .config()
        .output_mode
        .writes_mask()
        .then(|| args.mask_dir.clone());
    let mut images = TiffDirectorySink::create(&args.image_dir, mask_dir)?;

    let log_path = args.size_log_path();
    let mut size_log = CsvSizeLog::append_to(&log_path)
        .with_context(|| format!("failed to open size log '{}'", log_path.display()))?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "Writing images to {}.", images.image_dir().display());

    let mut progress = FnSink::new(|event| {
        if let GenerationEvent::ImageStarted {
            index,
            target_count,
        } = event
        {
            info!("Iteration {}: targeting {} particles.", index, target_count);
        }
    });
    let report = driver.run(args.count, seed, &mut images, &mut size_log, &mut progress)?;

    for failure in &report.failures {
        warn!("{}", failure);
    }
    info!(
        "Persisted {}/{} images, {} particles logged to {}.",
        report.persisted,
        report.requested,
        report.particles_accepted,
        log_path.display()
    );

    if args.histogram {
        size_log.flush()?;
        plot_size_log(&log_path, DEFAULT_HISTOGRAM_BINS, None)?;
    }
    Ok(())
}
