use chrono::Utc;
use tracing::debug;

use crate::analyzers::averages::{Metric, average_metrics};
use crate::analyzers::bins::summarize_bins;
use crate::analyzers::categorical::{allocate_units, count_categories};
use crate::analyzers::clean::clean;
use crate::analyzers::labels::Label;
use crate::analyzers::two_level::{GroupKey, group_two_level, partition_by_secondary};
use crate::analyzers::types::{
    BinnedSummary, CategoryCounts, Dashboard, GenderChart, GroupAverages, OccupationChart,
    TwoLevelGroups,
};
use crate::config::DashboardConfig;
use crate::parser::Dataset;
use crate::stats::SurveyStats;

/// Bumped whenever the serialized [`Dashboard`] layout changes.
pub const SCHEMA_VERSION: u8 = 1;

/// Secondary domain of the gender breakdowns, in display order.
pub const GENDER_DOMAIN: &[&str] = &["Male", "Female"];

pub const SUNBURST_ROOT: &str = "Survey Respondents";

pub const AXIS_VERIFICATION_IMPORTANCE: &str = "Verification Importance";
pub const AXIS_TRUSTWORTHINESS: &str = "Trustworthiness";
pub const AXIS_VERIFICATION_LEVEL: &str = "Verification Level";

pub fn gender_distribution(dataset: &Dataset, config: &DashboardConfig) -> GenderChart {
    let gender = config.columns.gender.as_str();
    let cleaned = clean(&dataset.rows, &[gender], &[]);

    let counts = count_categories(&cleaned, gender, Label::Gender);
    let units = allocate_units(&counts, config.pictograph_units);

    GenderChart { counts, units }
}

pub fn education_by_gender(dataset: &Dataset, config: &DashboardConfig) -> TwoLevelGroups {
    let columns = &config.columns;
    let cleaned = clean(
        &dataset.rows,
        &[columns.education.as_str(), columns.gender.as_str()],
        &[],
    );

    group_two_level(
        &cleaned,
        GroupKey::new(&columns.education, Label::Trimmed),
        GroupKey::new(&columns.gender, Label::Gender),
        GENDER_DOMAIN,
    )
}

pub fn occupation_by_gender(dataset: &Dataset, config: &DashboardConfig) -> OccupationChart {
    let columns = &config.columns;
    let cleaned = clean(
        &dataset.rows,
        &[columns.occupation.as_str(), columns.gender.as_str()],
        &[],
    );

    let groups = group_two_level(
        &cleaned,
        GroupKey::new(&columns.occupation, Label::CamelCase),
        GroupKey::new(&columns.gender, Label::Gender),
        GENDER_DOMAIN,
    );
    let hierarchy = partition_by_secondary(&groups, SUNBURST_ROOT, GENDER_DOMAIN);

    OccupationChart { groups, hierarchy }
}

pub fn political_views(dataset: &Dataset, config: &DashboardConfig) -> CategoryCounts {
    let view = config.columns.political_view.as_str();
    let cleaned = clean(&dataset.rows, &[view], &[]);

    count_categories(&cleaned, view, Label::Trimmed).sorted_by_count()
}

pub fn usage_vs_sharing(dataset: &Dataset, config: &DashboardConfig) -> BinnedSummary {
    let columns = &config.columns;
    let fields = [
        columns.minutes_per_day.as_str(),
        columns.shares_per_week.as_str(),
    ];
    let cleaned = clean(&dataset.rows, &fields, &fields);

    summarize_bins(
        &cleaned,
        &columns.minutes_per_day,
        &columns.shares_per_week,
        config.bin_count,
    )
}

pub fn verification_by_view(dataset: &Dataset, config: &DashboardConfig) -> GroupAverages {
    let columns = &config.columns;
    let metrics = [
        Metric::new(&columns.verification_importance, AXIS_VERIFICATION_IMPORTANCE),
        Metric::new(&columns.trustworthiness, AXIS_TRUSTWORTHINESS),
        Metric::new(&columns.verification_level, AXIS_VERIFICATION_LEVEL),
    ];
    let numeric: Vec<&str> = metrics.iter().map(|m| m.field).collect();
    let mut required = vec![columns.political_view.as_str()];
    required.extend(&numeric);

    let cleaned = clean(&dataset.rows, &required, &numeric);

    average_metrics(&cleaned, &columns.political_view, Label::Trimmed, &metrics)
}

/// Runs every chart aggregation over `dataset` and bundles the results.
///
/// Each chart applies its own cleaning filter, so chart totals can differ
/// from each other and from the raw row count.
pub fn aggregate_dashboard(
    dataset: &Dataset,
    source: Option<&str>,
    config: &DashboardConfig,
) -> Dashboard {
    let mut profile = SurveyStats::from_rows(&dataset.rows, &config.columns);
    if let Some(name) = source {
        profile = profile.with_source(name);
    }

    let dashboard = Dashboard {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: source.map(str::to_string),
        profile,
        gender: gender_distribution(dataset, config),
        education: education_by_gender(dataset, config),
        occupation: occupation_by_gender(dataset, config),
        political_view: political_views(dataset, config),
        usage_sharing: usage_vs_sharing(dataset, config),
        verification: verification_by_view(dataset, config),
    };

    debug!(
        rows = dataset.len(),
        gender = dashboard.gender.counts.total,
        education = dashboard.education.total,
        occupation = dashboard.occupation.groups.total,
        political_view = dashboard.political_view.total,
        usage_sharing = dashboard.usage_sharing.total,
        verification = dashboard.verification.total,
        "Dashboard aggregated"
    );

    dashboard
}
