//! Decompresses a tree of `.zst` files back into plain siblings and reports
//! the run to the Pushgateway.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use zstd_corpus_tools::codec::ZstdCodec;
use zstd_corpus_tools::{metrics, pipeline, walker};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input directory with .zst files to decompress
    #[arg(long = "in", default_value = "compressed")]
    input: PathBuf,

    /// Output directory for decompressed files
    #[arg(long, default_value = "decompressed")]
    out: PathBuf,

    /// Enable dictionary decompression
    #[arg(long = "use-dict")]
    use_dict: bool,

    /// Path to zstd dictionary file
    #[arg(long)]
    dict: Option<PathBuf>,

    /// Run identifier for metrics grouping; defaults to a timestamp
    #[arg(long = "run-id")]
    run_id: Option<String>,

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

    let mut codec = ZstdCodec::new(0, dict_bytes.as_deref())?;

    let start = Instant::now();
    let stats = pipeline::decompress_tree(&paths, &args.input, &args.out, &mut codec)?;
    let duration = start.elapsed();

    info!(
        files = stats.files_processed,
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        "decompression finished"
    );

    let run_id = match args.run_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => Local::now().format("%Y%m%d_%H%M%S").to_string(),
    };

    let source = metrics::source_label(&args.input, "compressed");
    metrics::push_decompress(
        &args.pushgateway,
        &stats,
        duration,
        &source,
        args.use_dict,
        &run_id,
    )?;

    println!(
        "decompressed {} files ({} bytes -> {} bytes) into {}",
        stats.files_processed,
        stats.input_bytes,
        stats.output_bytes,
        args.out.display()
    );
    Ok(())
}
