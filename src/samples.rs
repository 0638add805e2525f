//! Sample extraction for dictionary training.
//!
//! Input files are cut into bounded chunks, whitespace-trimmed, and capped by
//! a global sample budget before being handed to the external trainer.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::walker;

/// Minimum number of non-empty samples training needs. A single sample gives
/// the trainer nothing to generalize over, so anything below two is rejected
/// before the external library ever runs.
pub const MIN_SAMPLES: usize = 2;

/// Aggregate counters for one sample-collection pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampleStats {
    /// Files that contributed at least one sample.
    pub files_scanned: usize,
    pub samples: usize,
    /// Total trimmed bytes across all samples.
    pub sample_bytes: u64,
}

/// Walks `root` and chunks every non-empty file into samples of at most
/// `max_sample_bytes`, stopping once `max_samples` have been collected.
pub fn collect_samples(
    root: &Path,
    max_samples: usize,
    max_sample_bytes: usize,
) -> Result<(Vec<Vec<u8>>, SampleStats)> {
    let paths = walker::list_files(root)?;
    if paths.is_empty() {
        bail!("no files found in {}", root.display());
    }

    let mut samples: Vec<Vec<u8>> = Vec::with_capacity(max_samples.min(paths.len()));
    let mut stats = SampleStats::default();

    for path in &paths {
        if samples.len() >= max_samples {
            break;
        }
        let budget = max_samples - samples.len();
        let (chunks, trimmed_bytes) = read_samples_from_file(path, max_sample_bytes, budget)
            .with_context(|| format!("sampling {}", path.display()))?;
        if chunks.is_empty() {
            continue;
        }
        stats.files_scanned += 1;
        stats.samples += chunks.len();
        stats.sample_bytes += trimmed_bytes;
        samples.extend(chunks);
    }

    if stats.samples < MIN_SAMPLES {
        bail!(
            "not enough samples to train (got {}); add more data or lower max-sample-bytes to create more chunks",
            stats.samples
        );
    }

    info!(
        files = stats.files_scanned,
        samples = stats.samples,
        bytes = stats.sample_bytes,
        "collected training samples"
    );
    Ok((samples, stats))
}

fn read_samples_from_file(
    path: &Path,
    max_bytes: usize,
    budget: usize,
) -> Result<(Vec<Vec<u8>>, u64)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = vec![0u8; max_bytes];
    let mut chunks = Vec::new();
    let mut trimmed_bytes = 0u64;

    while chunks.len() < budget {
        let n = read_chunk(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        let trimmed = buf[..n].trim_ascii();
        if !trimmed.is_empty() {
            trimmed_bytes += trimmed.len() as u64;
            chunks.push(trimmed.to_vec());
        }
        // A short read means the file is exhausted.
        if n < max_bytes {
            break;
        }
    }

    Ok((chunks, trimmed_bytes))
}

/// Fills `buf` as far as the reader allows; a short count means end of input.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
