//! Compresses every file under a directory tree into mirrored `.zst`
//! siblings and reports the run to the Pushgateway.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use zstd_corpus_tools::codec::ZstdCodec;
use zstd_corpus_tools::{metrics, pipeline, walker};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input directory with files to compress
    #[arg(long = "in", default_value = "output")]
    input: PathBuf,

    /// Output directory for compressed files
    #[arg(long, default_value = "compressed")]
    out: PathBuf,

    /// Zstd compression level (0=default, 1..22 supported)
    #[arg(long, default_value_t = 0)]
    level: i32,

    /// Enable dictionary compression
    #[arg(long = "use-dict")]
    use_dict: bool,

    /// Path to zstd dictionary file
    #[arg(long)]
    dict: Option<PathBuf>,

    /// Pushgateway base URL
    #[arg(long, default_value = metrics::DEFAULT_PUSHGATEWAY)]
    pushgateway: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let dict_path = match (args.use_dict, &args.dict) {
        (true, Some(path)) => Some(path.clone()),
        (true, None) => bail!("--dict is required when --use-dict is set"),
        (false, _) => None,
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output dir {}", args.out.display()))?;

    let paths = walker::list_files(&args.input).context("listing input files")?;
    if paths.is_empty() {
        bail!("no files found in {}", args.input.display());
    }

    let dict_bytes = match &dict_path {
        Some(path) => Some(
            fs::read(path).with_context(|| format!("reading dict {}", path.display()))?,
        ),
        None => None,
    };

    let mut codec = ZstdCodec::new(args.level, dict_bytes.as_deref())?;

    let start = Instant::now();
    let stats = pipeline::compress_tree(&paths, &args.input, &args.out, &mut codec)?;
    let duration = start.elapsed();

    info!(
        files = stats.files_processed,
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        "compression finished"
    );

    let source = metrics::source_label(&args.input, "output");
    metrics::push_compress(
        &args.pushgateway,
        &stats,
        duration,
        &source,
        args.level,
        args.use_dict,
    )?;

    println!(
        "compressed {} files ({} bytes -> {} bytes) into {}",
        stats.files_processed,
        stats.input_bytes,
        stats.output_bytes,
        args.out.display()
    );
    Ok(())
}
