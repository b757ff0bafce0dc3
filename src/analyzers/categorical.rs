use std::collections::HashMap;

use tracing::debug;

use crate::analyzers::labels::Label;
use crate::analyzers::types::{CategoryCount, CategoryCounts, UnitAllocation};
use crate::parser::SurveyRow;
use crate::stats::{SurveyStats, format_pct};

/// Counts rows per normalized `key` label.
///
/// Categories appear in order of first encounter. The total is the number of
/// input rows; rows whose `key` is blank normalize to an empty label and are
/// still counted, so callers should pass rows already cleaned on `key`.
pub fn count_categories(rows: &[&SurveyRow], key: &str, label: Label) -> CategoryCounts {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<(String, usize)> = Vec::new();

    for row in rows {
        let name = label.apply(row.get(key).unwrap_or_default());
        match index.get(&name) {
            Some(&i) => tallies[i].1 += 1,
            None => {
                index.insert(name.clone(), tallies.len());
                tallies.push((name, 1));
            }
        }
    }

    let total = rows.len();
    let categories = tallies
        .into_iter()
        .map(|(label, count)| CategoryCount {
            percentage: format_pct(count, total),
            label,
            count,
        })
        .collect::<Vec<_>>();

    debug!(key, total, categories = categories.len(), "Categories counted");

    CategoryCounts { total, categories }
}

impl CategoryCounts {
    /// Reorders categories by descending count; ties keep encounter order.
    pub fn sorted_by_count(mut self) -> Self {
        self.categories.sort_by(|a, b| b.count.cmp(&a.count));
        self
    }

    pub fn get(&self, label: &str) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.label == label)
    }
}

/// Splits `units` pictograph icons across categories in their current order.
///
/// Each category gets `round(count / total * units)` icons, truncated once the
/// running total reaches `units`.
pub fn allocate_units(counts: &CategoryCounts, units: usize) -> Vec<UnitAllocation> {
    let mut assigned = 0usize;
    let mut out = Vec::with_capacity(counts.categories.len());

    for category in &counts.categories {
        let share = (SurveyStats::pct(category.count, counts.total) / 100.0 * units as f64).round();
        let wanted = share as usize;
        let given = wanted.min(units - assigned);
        assigned += given;
        out.push(UnitAllocation {
            label: category.label.clone(),
            units: given,
        });
    }

    out
}
