//! CLI entry point for the survey chart aggregator.
//!
//! Provides subcommands for building a full dashboard from one CSV, printing a
//! single chart's aggregate, profiling column coverage, and batch-processing a
//! directory of survey exports.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use survey_charts::analyzers::aggregate::{
    education_by_gender, gender_distribution, occupation_by_gender, political_views,
    usage_vs_sharing, verification_by_view,
};
use survey_charts::analyzers::analyzer::{analyze, analyze_dir, load_dataset};
use survey_charts::{
    config::DashboardConfig,
    output::{append_record, log_profile, print_json, print_pretty},
    stats::SurveyStats,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "survey_charts")]
#[command(about = "Aggregates survey CSV exports into chart-ready JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Chart {
    Gender,
    Education,
    Occupation,
    PoliticalView,
    UsageSharing,
    Verification,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every chart for a survey CSV into one dashboard JSON file
    Report {
        /// Path to the survey CSV
        #[arg(value_name = "CSV")]
        source: String,

        /// File to write the dashboard JSON to
        #[arg(short, long, default_value = "dashboard.json")]
        output: String,

        /// Optional: JSON config with column names and bin count
        #[arg(short, long)]
        config: Option<String>,

        /// Gzip compress the output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print the aggregate of a single chart to stdout
    Chart {
        /// Path to the survey CSV
        #[arg(value_name = "CSV")]
        source: String,

        /// Chart to aggregate
        #[arg(value_enum)]
        chart: Chart,

        /// Optional: JSON config with column names and bin count
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Log per-column coverage of a survey CSV
    Profile {
        /// Path to the survey CSV
        #[arg(value_name = "CSV")]
        source: String,

        /// Optional: CSV file to append the profile to
        #[arg(short, long)]
        output: Option<String>,

        /// Optional: JSON config with column names
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Aggregate every CSV in a directory and write an index
    Batch {
        /// Directory containing survey CSVs
        #[arg(short = 'd', long, default_value = "data")]
        input_dir: String,

        /// Directory to write dashboards and index.json to
        #[arg(short, long, default_value = "reports")]
        output_dir: String,

        /// Optional: JSON config with column names and bin count
        #[arg(short, long)]
        config: Option<String>,

        /// Gzip compress each dashboard
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/survey_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_charts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            output,
            config,
            gzip,
        } => {
            let config = load_config(config)?;
            let dashboard = analyze(Path::new(&source), Path::new(&output), &config, gzip)?;
            info!(
                source = %source,
                output = %output,
                respondents = dashboard.profile.total_rows,
                "Report complete"
            );
        }
        Commands::Chart {
            source,
            chart,
            config,
        } => {
            let config = load_config(config)?;
            let dataset = load_dataset(Path::new(&source))?;

            match chart {
                Chart::Gender => print_json(&gender_distribution(&dataset, &config))?,
                Chart::Education => print_json(&education_by_gender(&dataset, &config))?,
                Chart::Occupation => print_json(&occupation_by_gender(&dataset, &config))?,
                Chart::PoliticalView => print_json(&political_views(&dataset, &config))?,
                Chart::UsageSharing => print_json(&usage_vs_sharing(&dataset, &config))?,
                Chart::Verification => print_json(&verification_by_view(&dataset, &config))?,
            }
        }
        Commands::Profile {
            source,
            output,
            config,
        } => {
            let config = load_config(config)?;
            let dataset = load_dataset(Path::new(&source))?;
            let stats = SurveyStats::from_rows(&dataset.rows, &config.columns).with_source(&source);

            log_profile(&stats);
            print_pretty(&stats);

            if let Some(path) = output {
                append_record(&path, &stats)?;
                info!(path = %path, "Profile appended");
            }
        }
        Commands::Batch {
            input_dir,
            output_dir,
            config,
            gzip,
        } => {
            let config = load_config(config)?;
            analyze_dir(Path::new(&input_dir), Path::new(&output_dir), &config, gzip)?;
        }
    }

    Ok(())
}

/// Resolves the config from `--config`, then `SURVEY_CONFIG_PATH`, then defaults.
fn load_config(path: Option<String>) -> Result<DashboardConfig> {
    let path = path.or_else(|| std::env::var("SURVEY_CONFIG_PATH").ok());
    let config = DashboardConfig::load_or_default(path.as_deref())?;

    if let Some(p) = &path {
        info!(path = %p, bin_count = config.bin_count, "Config loaded");
    }
    Ok(config)
}
