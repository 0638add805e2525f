//! Full pipeline: generate a corpus, train a dictionary on it, then compress
//! and decompress the tree with that dictionary.

use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use zstd_corpus_tools::codec::{self, ZstdCodec};
use zstd_corpus_tools::datagen::{self, RecordKind};
use zstd_corpus_tools::{pipeline, samples, walker};

#[test]
fn generate_train_compress_decompress() {
    let work = tempdir().unwrap();
    let corpus = work.path().join("output");
    fs::create_dir_all(&corpus).unwrap();

    // Several files of people records so the trainer sees a healthy number
    // of distinct samples.
    let mut rng = StdRng::seed_from_u64(7);
    for file_idx in 0..12 {
        let path = corpus.join(format!("people_{file_idx:02}.json"));
        datagen::generate_into(&path, RecordKind::People, 400, &mut rng).unwrap();
    }

    let (sample_set, stats) = samples::collect_samples(&corpus, 1000, 4096).unwrap();
    assert!(stats.samples >= samples::MIN_SAMPLES);
    assert_eq!(stats.files_scanned, 12);

    let dict = codec::train_dictionary(&sample_set, 16 * 1024).unwrap();
    assert!(!dict.is_empty());

    let compressed = work.path().join("compressed");
    let restored = work.path().join("decompressed");

    let paths = walker::list_files(&corpus).unwrap();
    let mut zstd_codec = ZstdCodec::new(3, Some(&dict[..])).unwrap();
    let run = pipeline::compress_tree(&paths, &corpus, &compressed, &mut zstd_codec).unwrap();
    assert_eq!(run.files_processed, 12);
    assert!(run.output_bytes < run.input_bytes, "corpus should shrink");

    let compressed_paths = walker::list_files(&compressed).unwrap();
    let mut zstd_codec = ZstdCodec::new(0, Some(&dict[..])).unwrap();
    let back =
        pipeline::decompress_tree(&compressed_paths, &compressed, &restored, &mut zstd_codec)
            .unwrap();
    assert_eq!(back.files_processed, 12);

    for path in &paths {
        let rel = path.strip_prefix(&corpus).unwrap();
        assert_eq!(
            fs::read(path).unwrap(),
            fs::read(restored.join(rel)).unwrap(),
            "restored file differs from original: {}",
            rel.display()
        );
    }
}

#[test]
fn generated_counts_are_exact() {
    let work = tempdir().unwrap();
    let path = work.path().join("people.json");

    let mut rng = StdRng::seed_from_u64(3);
    datagen::generate_into(&path, RecordKind::People, 50, &mut rng).unwrap();

    let parsed: Vec<serde_json::Value> =
        serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(parsed.len(), 50);
    for (i, record) in parsed.iter().enumerate() {
        assert_eq!(record["id"].as_u64().unwrap(), i as u64 + 1);
    }
}
