//! zstd_corpus_tools: Batch Zstandard compression tooling.
//!
//! Four standalone binaries share the modules here: `generate_data` writes
//! synthetic JSON corpora, `train_dict` builds a Zstandard dictionary from
//! sample files, and `compress`/`decompress` mirror a directory tree through
//! the codec. Every run ends by pushing its counters to a Prometheus
//! Pushgateway.

pub mod codec;
pub mod datagen;
pub mod metrics;
pub mod pipeline;
pub mod prompt;
pub mod samples;
pub mod walker;
