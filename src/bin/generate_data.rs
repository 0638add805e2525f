//! Generates synthetic JSON corpora (movies, books, people) for compression
//! experiments and reports the run to the Pushgateway.

use std::fs;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use zstd_corpus_tools::datagen::{self, RecordKind};
use zstd_corpus_tools::{metrics, prompt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Data type to generate: movies, books, people (prompted if omitted)
    #[arg(short = 't', long = "type")]
    data_type: Option<String>,

    /// Number of records to generate (prompted if omitted)
    #[arg(short = 'n', long = "count")]
    count: Option<u64>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// RNG seed for reproducible corpora; defaults to wall-clock nanoseconds
    #[arg(long)]
    seed: Option<u64>,

    /// Pushgateway base URL
    #[arg(long, default_value = metrics::DEFAULT_PUSHGATEWAY)]
    pushgateway: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let kind: RecordKind = match &args.data_type {
        Some(raw) => raw.parse()?,
        None => prompt::prompt_line("Select type (movies, books, people): ")?.parse()?,
    };
    let count = match args.count {
        Some(n) if n > 0 => n,
        _ => prompt::prompt_count("How many items do you want to generate? ")?,
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output dir {}", args.out.display()))?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let output_file = args
        .out
        .join(format!("{kind}_{}.json", Local::now().format("%Y%m%d_%H%M%S")));

    let start = Instant::now();
    datagen::generate_into(&output_file, kind, count, &mut rng)?;
    let duration = start.elapsed();

    info!(count, %kind, file = %output_file.display(), "generation finished");
    metrics::push_generate(&args.pushgateway, &kind.to_string(), count, duration)?;

    println!("generated {} {} into {}", count, kind, output_file.display());
    Ok(())
}
