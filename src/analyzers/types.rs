//! Data types produced by the aggregation pipeline and consumed by the
//! chart renderers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stats::SurveyStats;

/// One category of a categorical count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// `count / total * 100`, one decimal place.
    pub percentage: String,
}

/// Result of counting one categorical column over a cleaned row set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

/// Number of pictograph icons assigned to a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitAllocation {
    pub label: String,
    pub units: usize,
}

/// Count of one secondary value inside a two-level group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryCount {
    pub label: String,
    pub count: usize,
    /// Share of the group total.
    pub percentage: String,
}

/// A primary category broken down by a secondary key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoLevelGroup {
    pub key: String,
    pub total: usize,
    pub secondary: Vec<SecondaryCount>,
    /// Share of the grand total.
    pub total_percentage: String,
}

impl TwoLevelGroup {
    pub fn count_of(&self, label: &str) -> usize {
        self.secondary
            .iter()
            .find(|s| s.label == label)
            .map_or(0, |s| s.count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TwoLevelGroups {
    pub total: usize,
    pub groups: Vec<TwoLevelGroup>,
}

/// Node of a gender-partitioned hierarchy (root, secondary bucket, leaf).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub name: String,
    pub value: usize,
    pub percentage: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

/// Five-number summary over the non-outlier values of a bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSummary {
    /// 1-based position of the bin among all bins, empty ones included.
    pub group: usize,
    pub label: String,
    pub range: [f64; 2],
    pub count: usize,
    pub quartiles: Quartiles,
    pub outliers: Vec<f64>,
    /// Member values, ascending.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BinnedSummary {
    pub total: usize,
    pub bins: Vec<BinSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAverage {
    pub axis: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub group: String,
    pub count: usize,
    /// One entry per requested metric, in request order.
    pub metrics: Vec<MetricAverage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupAverages {
    pub total: usize,
    pub groups: Vec<GroupAverage>,
}

/// Gender pictograph: counts in encounter order plus icon allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderChart {
    pub counts: CategoryCounts,
    pub units: Vec<UnitAllocation>,
}

/// Occupation sunburst: flat groups plus the nested hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationChart {
    pub groups: TwoLevelGroups,
    pub hierarchy: HierarchyNode,
}

/// Every chart's aggregate for one dataset, written as one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub profile: SurveyStats,
    pub gender: GenderChart,
    pub education: TwoLevelGroups,
    pub occupation: OccupationChart,
    pub political_view: CategoryCounts,
    pub usage_sharing: BinnedSummary,
    pub verification: GroupAverages,
}

/// Summary entry for the batch index listing.
#[derive(Debug, Serialize)]
pub struct ReportIndexEntry {
    pub dataset: String,
    pub report: String,
    pub total_rows: usize,
    pub respondents_with_gender: usize,
}

/// Top-level index of all datasets in a batch, written as `index.json`.
#[derive(Debug, Serialize)]
pub struct ReportIndex {
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<ReportIndexEntry>,
}
