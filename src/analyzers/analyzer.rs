use crate::analyzers::aggregate::aggregate_dashboard;
use crate::analyzers::types::{Dashboard, ReportIndex, ReportIndexEntry};
use crate::config::DashboardConfig;
use crate::output::write_json;
use crate::parser::{Dataset, parse_survey};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads and parses one survey CSV.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let dataset =
        parse_survey(&bytes).with_context(|| format!("failed to parse {}", path.display()))?;

    info!(rows = dataset.len(), columns = dataset.headers.len(), "Dataset loaded");
    Ok(dataset)
}

/// Loads `source`, aggregates every chart and writes the dashboard JSON to `output`.
pub fn analyze(
    source: &Path,
    output: &Path,
    config: &DashboardConfig,
    gzip: bool,
) -> Result<Dashboard> {
    let dataset = load_dataset(source)?;
    let dashboard = aggregate_dashboard(&dataset, Some(&source.display().to_string()), config);

    let bytes = write_json(output, &dashboard, gzip)?;
    info!(output = %output.display(), bytes, "Dashboard written");

    Ok(dashboard)
}

/// Aggregates every `*.csv` in `input_dir` into `<output_dir>/<stem>.json`
/// (or `.json.gz`) and writes an `index.json` listing them.
///
/// Files that fail to load are skipped with a warning. Returns the index.
pub fn analyze_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: &DashboardConfig,
    gzip: bool,
) -> Result<ReportIndex> {
    let sources = load_csv_paths(input_dir)?;
    info!(count = sources.len(), dir = %input_dir.display(), "CSV files found");

    let mut entries = Vec::new();

    for source in sources {
        let Some(stem) = source.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let report_name = if gzip {
            format!("{stem}.json.gz")
        } else {
            format!("{stem}.json")
        };
        let report_path = output_dir.join(&report_name);

        let dashboard = match analyze(&source, &report_path, config, gzip) {
            Ok(d) => d,
            Err(e) => {
                warn!(source = %source.display(), error = %e, "Skipping dataset");
                continue;
            }
        };

        entries.push(ReportIndexEntry {
            dataset: stem.to_string(),
            report: report_name,
            total_rows: dashboard.profile.total_rows,
            respondents_with_gender: dashboard.gender.counts.total,
        });
    }

    let index = ReportIndex {
        generated_at: chrono::Utc::now(),
        reports: entries,
    };
    write_json(&output_dir.join("index.json"), &index, false)?;

    info!(reports = index.reports.len(), "Batch complete");
    Ok(index)
}

fn load_csv_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();

        let is_csv = path.extension().and_then(|e| e.to_str()) == Some("csv");
        if entry.file_type()?.is_file() && is_csv {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}
