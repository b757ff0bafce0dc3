//! Output formatting and persistence for aggregates and dataset profiles.
//!
//! Supports pretty-printing, JSON serialization (optionally gzip-compressed),
//! and CSV append.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::stats::SurveyStats;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Logs the coverage of every referenced column as one structured event.
pub fn log_profile(stats: &SurveyStats) {
    info!(
        source = stats.source.as_deref().unwrap_or("-"),
        total_rows = stats.total_rows,
        gender_pct = stats.coverage_pct(stats.with_gender),
        education_pct = stats.coverage_pct(stats.with_education),
        occupation_pct = stats.coverage_pct(stats.with_occupation),
        political_view_pct = stats.coverage_pct(stats.with_political_view),
        minutes_pct = stats.coverage_pct(stats.with_minutes_per_day),
        shares_pct = stats.coverage_pct(stats.with_shares_per_week),
        verification_pct = stats.coverage_pct(stats.with_verification_importance),
        "Dataset profile"
    );
}

/// Serializes `value` as JSON into `path`, gzip-compressed when `gzip` is set.
///
/// Parent directories are created as needed. Returns the number of bytes
/// written to disk.
pub fn write_json(path: &Path, value: &impl Serialize, gzip: bool) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    let bytes = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body)?;
        encoder.finish()?
    } else {
        body
    };

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;

    debug!(path = %path.display(), bytes = bytes.len(), gzip, "JSON written");
    Ok(bytes.len())
}

/// Appends a [`SurveyStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, stats: &SurveyStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}
