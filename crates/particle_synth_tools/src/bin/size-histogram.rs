use clap::Parser;
use particle_synth_tools::{init_tracing, plot_size_log, HistogramArgs};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = HistogramArgs::parse();
    plot_size_log(&args.log, args.bins, args.out)?;
    Ok(())
}
