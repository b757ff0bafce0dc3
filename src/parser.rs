//! CSV parser for survey exports.

use anyhow::Result;
use std::collections::HashMap;

/// One survey respondent: column name to raw text value.
///
/// Columns missing from a short record are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyRow {
    fields: HashMap<String, String>,
}

impl SurveyRow {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of `field`, untrimmed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Trimmed value of `field`, or `None` if it is missing or blank.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Value of `field` parsed as a finite number.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.text(field)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// An immutable set of rows produced by a single load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<SurveyRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decodes a header-first CSV document into a [`Dataset`].
///
/// Records may be shorter or longer than the header row; surplus fields are
/// dropped and missing ones are left absent.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV (e.g. invalid UTF-8).
pub fn parse_survey(bytes: &[u8]) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = SurveyRow::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string())),
        );
        rows.push(row);
    }

    Ok(Dataset { headers, rows })
}
