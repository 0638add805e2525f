//! Narrow boundary over the external Zstandard implementation.
//!
//! The batch pipelines only ever see [`ContentCodec`], so they can be
//! exercised against a stub without invoking real compression. All of the
//! actual entropy coding, match finding, and dictionary construction lives in
//! the `zstd` library.

use std::io::Read;

use anyhow::{Context, Result};
use zstd::bulk::Compressor;

/// Byte-level compress/decompress interface the pipelines run against.
pub trait ContentCodec {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Real Zstandard codec.
///
/// The compression context is built once (level plus optional dictionary) and
/// reused for every file in a run. Decompression streams each input against
/// the same dictionary, which both sides must agree on.
pub struct ZstdCodec {
    compressor: Compressor<'static>,
    dict: Option<Vec<u8>>,
}

impl ZstdCodec {
    /// `level` 0 selects the library default.
    pub fn new(level: i32, dict: Option<&[u8]>) -> Result<Self> {
        let compressor = match dict {
            Some(d) => Compressor::with_dictionary(level, d)
                .context("initializing zstd compressor with dictionary")?,
            None => Compressor::new(level).context("initializing zstd compressor")?,
        };
        Ok(Self {
            compressor,
            dict: dict.map(<[u8]>::to_vec),
        })
    }
}

impl ContentCodec for ZstdCodec {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.compressor
            .compress(input)
            .context("zstd compression failed")
    }

    fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self.dict.as_deref() {
            Some(d) => {
                let mut decoder = zstd::stream::read::Decoder::with_dictionary(input, d)
                    .context("initializing zstd decoder with dictionary")?;
                decoder
                    .read_to_end(&mut out)
                    .context("zstd decompression failed")?;
            }
            None => {
                let mut decoder = zstd::stream::read::Decoder::new(input)
                    .context("initializing zstd decoder")?;
                decoder
                    .read_to_end(&mut out)
                    .context("zstd decompression failed")?;
            }
        }
        Ok(out)
    }
}

/// Trains a dictionary blob from the collected samples. Failures from the
/// external trainer (for example insufficient sample diversity) propagate
/// unchanged; no fallback dictionary is synthesized.
pub fn train_dictionary(samples: &[Vec<u8>], dict_size: usize) -> Result<Vec<u8>> {
    zstd::dict::from_samples(samples, dict_size).context("dictionary training failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_without_dictionary() {
        let payload = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let mut codec = ZstdCodec::new(3, None).unwrap();
        let compressed = codec.compress(&payload).unwrap();
        assert!(compressed.len() < payload.len());
        assert_eq!(codec.decompress(&compressed).unwrap(), payload);
    }

    #[test]
    fn round_trip_with_shared_dictionary() {
        // A blob without the zstd dictionary magic acts as a raw prefix
        // dictionary; encoder and decoder only need to agree on it.
        let dict = br#"{"id":0,"title":"","genre":"","year":2000,"rating":0.0}"#.repeat(32);
        let payload = br#"{"id":7,"title":"Northbound","genre":"Drama","year":1999}"#.repeat(20);

        let mut codec = ZstdCodec::new(3, Some(&dict[..])).unwrap();
        let compressed = codec.compress(&payload).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), payload);
    }

    #[test]
    fn decompressing_garbage_is_an_error() {
        let mut codec = ZstdCodec::new(0, None).unwrap();
        assert!(codec.decompress(b"definitely not a zstd frame").is_err());
    }
}
