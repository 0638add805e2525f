//! Trains a Zstandard dictionary from a directory of sample files and
//! reports the run to the Pushgateway.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use zstd_corpus_tools::{codec, metrics, samples};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input directory with sample data
    #[arg(long = "in", default_value = "output")]
    input: PathBuf,

    /// Output directory for dictionaries
    #[arg(long, default_value = "dict-out")]
    out: PathBuf,

    /// Full output file path; overrides --out
    #[arg(long = "out-file")]
    out_file: Option<PathBuf>,

    /// Dictionary size in bytes
    #[arg(long = "dict-size", default_value_t = 128 * 1024)]
    dict_size: usize,

    /// Maximum number of samples to use
    #[arg(long = "max-samples", default_value_t = 1000)]
    max_samples: usize,

    /// Maximum bytes to read per sample
    #[arg(long = "max-sample-bytes", default_value_t = 32 * 1024)]
    max_sample_bytes: usize,

    /// Training speed preference (0=default, 1=fastest .. 4=best)
    #[arg(long = "zstd-level", default_value_t = 0)]
    zstd_level: u32,

    /// Pushgateway base URL
    #[arg(long, default_value = metrics::DEFAULT_PUSHGATEWAY)]
    pushgateway: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.dict_size == 0 {
        bail!("dict-size must be positive");
    }
    if args.max_samples == 0 {
        bail!("max-samples must be positive");
    }
    if args.max_sample_bytes == 0 {
        bail!("max-sample-bytes must be positive");
    }
    if args.zstd_level > 4 {
        bail!("zstd-level must be between 0 and 4");
    }

    let output_path = match &args.out_file {
        Some(path) => path.clone(),
        None => args.out.join(format!(
            "zstd_dict_{}.zdict",
            Local::now().format("%Y%m%d_%H%M%S")
        )),
    };

    let start = Instant::now();
    let (sample_set, stats) =
        samples::collect_samples(&args.input, args.max_samples, args.max_sample_bytes)?;

    if args.zstd_level > 0 {
        // The bound trainer exposes no speed knob; the request is surfaced in
        // the log only.
        info!(level = args.zstd_level, "zstd-level requested");
    }

    let trained = codec::train_dictionary(&sample_set, args.dict_size)?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    fs::write(&output_path, &trained)
        .with_context(|| format!("writing dictionary {}", output_path.display()))?;

    let duration = start.elapsed();
    let source = metrics::source_label(&args.input, "output");
    metrics::push_train(
        &args.pushgateway,
        &stats,
        trained.len(),
        args.dict_size,
        duration,
        &source,
    )?;

    println!(
        "trained dictionary {} ({} bytes) from {} samples",
        output_path.display(),
        trained.len(),
        stats.samples
    );
    Ok(())
}
