use std::collections::HashMap;

use tracing::debug;

use crate::analyzers::labels::Label;
use crate::analyzers::types::{GroupAverage, GroupAverages, MetricAverage};
use crate::analyzers::utility::mean;
use crate::parser::SurveyRow;

/// A numeric column to average and the axis label it is reported under.
#[derive(Debug, Clone, Copy)]
pub struct Metric<'a> {
    pub field: &'a str,
    pub axis: &'a str,
}

impl<'a> Metric<'a> {
    pub fn new(field: &'a str, axis: &'a str) -> Self {
        Self { field, axis }
    }
}

/// Groups rows by the normalized `group_key` label and averages each metric
/// within every group.
///
/// Metrics come back in the order given. A row whose metric value does not
/// parse contributes nothing to that metric's mean; an empty series averages
/// to 0.0. Groups are sorted by descending row count; ties keep encounter
/// order.
pub fn average_metrics(
    rows: &[&SurveyRow],
    group_key: &str,
    label: Label,
    metrics: &[Metric<'_>],
) -> GroupAverages {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut series: Vec<(String, usize, Vec<Vec<f64>>)> = Vec::new();

    for row in rows {
        let name = label.apply(row.get(group_key).unwrap_or_default());
        let i = *index.entry(name.clone()).or_insert_with(|| {
            series.push((name, 0, vec![Vec::new(); metrics.len()]));
            series.len() - 1
        });

        let (_, count, values) = &mut series[i];
        *count += 1;
        for (metric, column) in metrics.iter().zip(values.iter_mut()) {
            if let Some(v) = row.number(metric.field) {
                column.push(v);
            }
        }
    }

    let mut groups: Vec<GroupAverage> = series
        .into_iter()
        .map(|(group, count, values)| GroupAverage {
            group,
            count,
            metrics: metrics
                .iter()
                .zip(values.iter())
                .map(|(metric, column)| MetricAverage {
                    axis: metric.axis.to_string(),
                    value: mean(column),
                })
                .collect(),
        })
        .collect();

    groups.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(group_key, total = rows.len(), groups = groups.len(), "Metric averages computed");

    GroupAverages {
        total: rows.len(),
        groups,
    }
}
