//! Pushgateway emission.
//!
//! Every tool builds a fresh registry per run, sets a fixed set of gauges,
//! and pushes them under its own job name and grouping labels. A failed push
//! is fatal even though the substantive work already finished; the operator
//! sees the run as failed rather than silently unreported.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use prometheus::{Gauge, IntCounter, Opts, Registry};

use crate::pipeline::RunStats;
use crate::samples::SampleStats;

/// Default gateway address baked into every tool's `--pushgateway` flag.
pub const DEFAULT_PUSHGATEWAY: &str = "http://localhost:9091";

/// Label for an input directory: its final path component, or `fallback`
/// when the path has none (e.g. `.` or `/`).
pub fn source_label(dir: &Path, fallback: &str) -> String {
    dir.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_owned())
}

pub fn push_generate(url: &str, kind: &str, count: u64, duration: Duration) -> Result<()> {
    let registry = generate_registry(count, duration)?;
    let grouping = HashMap::from([("type".to_owned(), kind.to_owned())]);
    push(url, "generate-data", grouping, &registry)
}

pub fn push_train(
    url: &str,
    stats: &SampleStats,
    output_bytes: usize,
    dict_size: usize,
    duration: Duration,
    source: &str,
) -> Result<()> {
    let registry = train_registry(stats, output_bytes, dict_size, duration)?;
    let grouping = HashMap::from([
        ("source".to_owned(), source.to_owned()),
        ("dict_size".to_owned(), dict_size.to_string()),
    ]);
    push(url, "train-dict", grouping, &registry)
}

pub fn push_compress(
    url: &str,
    stats: &RunStats,
    duration: Duration,
    source: &str,
    level: i32,
    use_dict: bool,
) -> Result<()> {
    let registry = transform_registry("compress", "compression", stats, duration)?;
    let level_label = if level == 0 {
        "default".to_owned()
    } else {
        level.to_string()
    };
    let grouping = HashMap::from([
        ("source".to_owned(), source.to_owned()),
        ("use_dict".to_owned(), use_dict.to_string()),
        ("level".to_owned(), level_label),
    ]);
    push(url, "compress", grouping, &registry)
}

pub fn push_decompress(
    url: &str,
    stats: &RunStats,
    duration: Duration,
    source: &str,
    use_dict: bool,
    run_id: &str,
) -> Result<()> {
    let registry = transform_registry("decompress", "decompression", stats, duration)?;
    let grouping = HashMap::from([
        ("source".to_owned(), source.to_owned()),
        ("use_dict".to_owned(), use_dict.to_string()),
        ("run_id".to_owned(), run_id.to_owned()),
    ]);
    push(url, "decompress", grouping, &registry)
}

fn generate_registry(count: u64, duration: Duration) -> Result<Registry> {
    let registry = Registry::new();

    let items = IntCounter::with_opts(Opts::new(
        "generated_items_total",
        "Total number of generated items by type.",
    ))?;
    registry.register(Box::new(items.clone()))?;
    items.inc_by(count);

    gauge(
        &registry,
        "generate_duration_seconds",
        "Duration of the last generation run in seconds by type.",
    )?
    .set(duration.as_secs_f64());
    gauge(
        &registry,
        "last_run_timestamp_seconds",
        "Unix timestamp of the last generation run by type.",
    )?
    .set(Utc::now().timestamp() as f64);

    Ok(registry)
}

fn train_registry(
    stats: &SampleStats,
    output_bytes: usize,
    dict_size: usize,
    duration: Duration,
) -> Result<Registry> {
    let registry = Registry::new();

    gauge(
        &registry,
        "dict_train_duration_seconds",
        "Duration of the last dictionary training run in seconds.",
    )?
    .set(duration.as_secs_f64());
    gauge(
        &registry,
        "dict_samples_count",
        "Number of samples used in the last dictionary training run.",
    )?
    .set(stats.samples as f64);
    gauge(
        &registry,
        "dict_sample_bytes",
        "Total bytes of samples used in the last dictionary training run.",
    )?
    .set(stats.sample_bytes as f64);
    gauge(
        &registry,
        "dict_files_scanned",
        "Number of files scanned in the last dictionary training run.",
    )?
    .set(stats.files_scanned as f64);
    gauge(
        &registry,
        "dict_output_bytes",
        "Size of the generated dictionary in bytes.",
    )?
    .set(output_bytes as f64);
    gauge(
        &registry,
        "dict_target_size_bytes",
        "Target dictionary size requested for training.",
    )?
    .set(dict_size as f64);
    gauge(
        &registry,
        "dict_last_run_timestamp_seconds",
        "Unix timestamp of the last dictionary training run.",
    )?
    .set(Utc::now().timestamp() as f64);

    Ok(registry)
}

/// Shared shape for the compress/decompress runs; `prefix` selects the
/// metric family names and `noun` the run name in help text.
fn transform_registry(
    prefix: &str,
    noun: &str,
    stats: &RunStats,
    duration: Duration,
) -> Result<Registry> {
    let registry = Registry::new();

    gauge(
        &registry,
        &format!("{prefix}_duration_seconds"),
        &format!("Duration of the last {noun} run in seconds."),
    )?
    .set(duration.as_secs_f64());
    gauge(
        &registry,
        &format!("{prefix}_files_processed"),
        &format!("Number of files processed in the last {noun} run."),
    )?
    .set(stats.files_processed as f64);
    gauge(
        &registry,
        &format!("{prefix}_input_bytes"),
        &format!("Total input bytes {prefix}ed in the last run."),
    )?
    .set(stats.input_bytes as f64);
    gauge(
        &registry,
        &format!("{prefix}_output_bytes"),
        "Total output bytes produced in the last run.",
    )?
    .set(stats.output_bytes as f64);

    let ratio = gauge(
        &registry,
        &format!("{prefix}_ratio"),
        &format!("Output/input size ratio for the last {noun} run."),
    )?;
    if let Some(value) = stats.ratio() {
        ratio.set(value);
    }

    gauge(
        &registry,
        &format!("{prefix}_last_run_timestamp_seconds"),
        &format!("Unix timestamp of the last {noun} run."),
    )?
    .set(Utc::now().timestamp() as f64);

    Ok(registry)
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<Gauge> {
    let gauge = Gauge::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn push(
    url: &str,
    job: &str,
    grouping: HashMap<String, String>,
    registry: &Registry,
) -> Result<()> {
    prometheus::push_metrics(job, grouping, url, registry.gather(), None)
        .with_context(|| format!("pushing {job} metrics to {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family_names(registry: &Registry) -> Vec<String> {
        let mut names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn generate_registry_exposes_fixed_families() {
        let registry = generate_registry(42, Duration::from_millis(1500)).unwrap();
        assert_eq!(
            family_names(&registry),
            vec![
                "generate_duration_seconds",
                "generated_items_total",
                "last_run_timestamp_seconds",
            ]
        );

        let families = registry.gather();
        let items = families
            .iter()
            .find(|f| f.get_name() == "generated_items_total")
            .unwrap();
        assert_eq!(items.get_metric()[0].get_counter().get_value(), 42.0);
    }

    #[test]
    fn train_registry_exposes_fixed_families() {
        let stats = SampleStats {
            files_scanned: 3,
            samples: 12,
            sample_bytes: 4096,
        };
        let registry = train_registry(&stats, 700, 131072, Duration::from_secs(2)).unwrap();
        assert_eq!(
            family_names(&registry),
            vec![
                "dict_files_scanned",
                "dict_last_run_timestamp_seconds",
                "dict_output_bytes",
                "dict_sample_bytes",
                "dict_samples_count",
                "dict_target_size_bytes",
                "dict_train_duration_seconds",
            ]
        );
    }

    #[test]
    fn transform_registry_exposes_fixed_families() {
        let registry = transform_registry(
            "compress",
            "compression",
            &RunStats::default(),
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(
            family_names(&registry),
            vec![
                "compress_duration_seconds",
                "compress_files_processed",
                "compress_input_bytes",
                "compress_last_run_timestamp_seconds",
                "compress_output_bytes",
                "compress_ratio",
            ]
        );
    }

    #[test]
    fn transform_registry_sets_ratio_only_with_input() {
        let stats = RunStats {
            files_processed: 2,
            input_bytes: 100,
            output_bytes: 25,
        };
        let registry =
            transform_registry("compress", "compression", &stats, Duration::from_secs(1)).unwrap();
        let families = registry.gather();
        let ratio = families
            .iter()
            .find(|f| f.get_name() == "compress_ratio")
            .unwrap();
        assert_eq!(ratio.get_metric()[0].get_gauge().get_value(), 0.25);

        let empty = transform_registry(
            "decompress",
            "decompression",
            &RunStats::default(),
            Duration::ZERO,
        )
        .unwrap();
        let families = empty.gather();
        let ratio = families
            .iter()
            .find(|f| f.get_name() == "decompress_ratio")
            .unwrap();
        assert_eq!(ratio.get_metric()[0].get_gauge().get_value(), 0.0);
    }

    #[test]
    fn source_label_falls_back_for_bare_paths() {
        assert_eq!(source_label(Path::new("data/output"), "output"), "output");
        assert_eq!(source_label(Path::new("."), "output"), "output");
        assert_eq!(source_label(Path::new("/"), "compressed"), "compressed");
    }
}
