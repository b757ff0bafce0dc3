use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::utility::round_half_up;
use crate::config::ColumnNames;
use crate::parser::SurveyRow;

/// Column coverage for one loaded dataset: how many rows carry a non-blank
/// value in each column the dashboard reads.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SurveyStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub total_rows: usize,

    // categorical columns
    pub with_gender: usize,
    pub with_education: usize,
    pub with_occupation: usize,
    pub with_political_view: usize,

    // numeric columns, counted only when they parse
    pub with_minutes_per_day: usize,
    pub with_shares_per_week: usize,
    pub with_verification_importance: usize,
    pub with_trustworthiness: usize,
    pub with_verification_level: usize,
}

impl SurveyStats {
    pub fn from_rows(rows: &[SurveyRow], columns: &ColumnNames) -> Self {
        let mut s = SurveyStats {
            timestamp: Utc::now(),
            total_rows: rows.len(),
            ..Default::default()
        };

        for row in rows {
            if row.text(&columns.gender).is_some() {
                s.with_gender += 1;
            }

            if row.text(&columns.education).is_some() {
                s.with_education += 1;
            }

            if row.text(&columns.occupation).is_some() {
                s.with_occupation += 1;
            }

            if row.text(&columns.political_view).is_some() {
                s.with_political_view += 1;
            }

            if row.number(&columns.minutes_per_day).is_some() {
                s.with_minutes_per_day += 1;
            }

            if row.number(&columns.shares_per_week).is_some() {
                s.with_shares_per_week += 1;
            }

            if row.number(&columns.verification_importance).is_some() {
                s.with_verification_importance += 1;
            }

            if row.number(&columns.trustworthiness).is_some() {
                s.with_trustworthiness += 1;
            }

            if row.number(&columns.verification_level).is_some() {
                s.with_verification_level += 1;
            }
        }

        s
    }

    /// Percentage of `part` over `total`; 0.0 when `total` is zero.
    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of rows carrying `part`, as a percentage of [`Self::total_rows`].
    pub fn coverage_pct(&self, part: usize) -> f64 {
        Self::pct(part, self.total_rows)
    }

    /// Set the dataset name (file path or label)
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}

/// Formats `part / total * 100` with one decimal place ("66.7").
///
/// Ties round up (1 of 16 is "6.3"). A zero `total` yields "0.0" rather than
/// NaN or infinity.
pub fn format_pct(part: usize, total: usize) -> String {
    let tenths = round_half_up(SurveyStats::pct(part, total) * 10.0);
    format!("{:.1}", tenths / 10.0)
}
