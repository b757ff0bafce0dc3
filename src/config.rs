//! Dashboard configuration.
//!
//! Stored as a JSON object on disk; every key is optional:
//! ```json
//! {
//!   "bin_count": 5,
//!   "pictograph_units": 100,
//!   "columns": { "gender": "sex", "political_view": "politics" }
//! }
//! ```

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Column names the charts read from each row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub gender: String,
    pub education: String,
    pub occupation: String,
    pub political_view: String,
    pub minutes_per_day: String,
    pub shares_per_week: String,
    pub verification_importance: String,
    pub trustworthiness: String,
    pub verification_level: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            gender: "gender".into(),
            education: "education_qualifications".into(),
            occupation: "current_occupation".into(),
            political_view: "political_view".into(),
            minutes_per_day: "minute_per_day".into(),
            shares_per_week: "share_per_week".into(),
            verification_importance: "verification_importance".into(),
            trustworthiness: "trustworthiness".into(),
            verification_level: "verification_level".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub columns: ColumnNames,
    /// Number of equal-width bins for the usage/sharing box plot.
    pub bin_count: usize,
    /// Number of icons in the gender pictograph.
    pub pictograph_units: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            bin_count: 5,
            pictograph_units: 100,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `path` when given, the defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.bin_count >= 1, "bin_count must be at least 1");
        ensure!(
            self.pictograph_units >= 1,
            "pictograph_units must be at least 1"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.bin_count, 5);
        assert_eq!(config.pictograph_units, 100);
        assert_eq!(config.columns.minutes_per_day, "minute_per_day");
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_column_override() {
        let config =
            DashboardConfig::from_json(r#"{"bin_count": 4, "columns": {"gender": "sex"}}"#)
                .unwrap();

        assert_eq!(config.bin_count, 4);
        assert_eq!(config.columns.gender, "sex");
        assert_eq!(config.columns.political_view, "political_view");
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(DashboardConfig::from_json(r#"{"bin_count": 0}"#).is_err());
        assert!(DashboardConfig::from_json(r#"{"pictograph_units": 0}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load("/nonexistent/survey_charts.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/survey_charts.json"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = DashboardConfig::load_or_default(None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
