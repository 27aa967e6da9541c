#![forbid(unsafe_code)]
//! Command-line front end for `particle_synth`: TIFF output, size-log histograms and
//! argument handling shared by the `generate-particles` and `size-histogram` binaries.

mod cli;
mod histogram;
mod logging;
mod output;

pub use cli::{GenerateArgs, HistogramArgs, Variant, GENERATE_USAGE};
pub use histogram::{plot_size_log, render_histogram_png, timestamped_path, TIMESTAMP_FORMAT};
pub use logging::init_tracing;
pub use output::{particle_file_name, TiffDirectorySink};
