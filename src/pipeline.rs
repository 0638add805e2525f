//! Batch tree transforms: mirror a directory while compressing or
//! decompressing every file through a [`ContentCodec`].
//!
//! A run is all-or-nothing: the first I/O or codec error aborts the loop,
//! leaving whatever siblings were already written on disk.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::codec::ContentCodec;

/// Extension appended to compressed siblings.
pub const COMPRESSED_EXT: &str = "zst";
/// Marker appended when a decompression input lacks the expected extension.
pub const FALLBACK_EXT: &str = "out";

/// Aggregate counters for one compress or decompress run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub files_processed: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl RunStats {
    /// Output/input size ratio; `None` until any input bytes are counted.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes as f64 / self.input_bytes as f64)
    }
}

/// Compresses every file in `paths` into a mirrored tree under `out_dir`,
/// appending `.zst` to each file name.
pub fn compress_tree<C: ContentCodec>(
    paths: &[PathBuf],
    base_dir: &Path,
    out_dir: &Path,
    codec: &mut C,
) -> Result<RunStats> {
    let mut stats = RunStats::default();

    for path in paths {
        let rel = relative_to(path, base_dir)?;
        let mut out_name = OsString::from(out_dir.join(rel));
        out_name.push(".");
        out_name.push(COMPRESSED_EXT);
        let out_path = PathBuf::from(out_name);

        let input = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let output = codec
            .compress(&input)
            .with_context(|| format!("compressing {}", path.display()))?;
        write_output(&out_path, &output)?;

        stats.files_processed += 1;
        stats.input_bytes += input.len() as u64;
        stats.output_bytes += output.len() as u64;
    }

    Ok(stats)
}

/// Inverse of [`compress_tree`]: strips the `.zst` extension to derive each
/// output path. An input that lacks the extension is still processed, but
/// gets a `.out` marker appended and a warning instead of a silent rename.
pub fn decompress_tree<C: ContentCodec>(
    paths: &[PathBuf],
    base_dir: &Path,
    out_dir: &Path,
    codec: &mut C,
) -> Result<RunStats> {
    let mut stats = RunStats::default();

    for path in paths {
        let rel = relative_to(path, base_dir)?;
        let out_rel = if rel.extension() == Some(OsStr::new(COMPRESSED_EXT)) {
            rel.with_extension("")
        } else {
            warn!(
                file = %rel.display(),
                "input lacks the .{} suffix; writing with a .{} marker",
                COMPRESSED_EXT,
                FALLBACK_EXT
            );
            let mut name = OsString::from(rel);
            name.push(".");
            name.push(FALLBACK_EXT);
            PathBuf::from(name)
        };
        let out_path = out_dir.join(out_rel);

        let input = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let output = codec
            .decompress(&input)
            .with_context(|| format!("decompressing {}", path.display()))?;
        write_output(&out_path, &output)?;

        stats.files_processed += 1;
        stats.input_bytes += input.len() as u64;
        stats.output_bytes += output.len() as u64;
    }

    Ok(stats)
}

fn relative_to<'a>(path: &'a Path, base_dir: &Path) -> Result<&'a Path> {
    path.strip_prefix(base_dir)
        .with_context(|| format!("{} is outside {}", path.display(), base_dir.display()))
}

fn write_output(out_path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    fs::write(out_path, data).with_context(|| format!("writing {}", out_path.display()))
}
