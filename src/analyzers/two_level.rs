use std::collections::HashMap;

use tracing::debug;

use crate::analyzers::labels::Label;
use crate::analyzers::types::{HierarchyNode, SecondaryCount, TwoLevelGroup, TwoLevelGroups};
use crate::parser::SurveyRow;
use crate::stats::format_pct;

/// Column and normalization for one level of a two-level grouping.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey<'a> {
    pub field: &'a str,
    pub label: Label,
}

impl<'a> GroupKey<'a> {
    pub fn new(field: &'a str, label: Label) -> Self {
        Self { field, label }
    }

    fn of(&self, row: &SurveyRow) -> String {
        self.label.apply(row.get(self.field).unwrap_or_default())
    }
}

/// Tallies rows per primary label, broken down by secondary label.
///
/// Every group lists the `domain` values first (zero counts included) and then
/// any other secondary values in encounter order, so a group's total always
/// equals the sum of its secondary counts. Groups are sorted by descending
/// total; ties keep encounter order.
pub fn group_two_level(
    rows: &[&SurveyRow],
    primary: GroupKey<'_>,
    secondary: GroupKey<'_>,
    domain: &[&str],
) -> TwoLevelGroups {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut tallies: Vec<(String, Vec<(String, usize)>)> = Vec::new();

    for row in rows {
        let key = primary.of(row);
        let sub = secondary.of(row);

        let i = *index.entry(key.clone()).or_insert_with(|| {
            let seeded = domain.iter().map(|d| (d.to_string(), 0)).collect();
            tallies.push((key, seeded));
            tallies.len() - 1
        });

        let counts = &mut tallies[i].1;
        match counts.iter_mut().find(|(label, _)| *label == sub) {
            Some((_, n)) => *n += 1,
            None => counts.push((sub, 1)),
        }
    }

    let grand_total = rows.len();
    let mut groups: Vec<TwoLevelGroup> = tallies
        .into_iter()
        .map(|(key, counts)| {
            let total: usize = counts.iter().map(|(_, n)| n).sum();
            TwoLevelGroup {
                key,
                total,
                secondary: counts
                    .into_iter()
                    .map(|(label, count)| SecondaryCount {
                        percentage: format_pct(count, total),
                        label,
                        count,
                    })
                    .collect(),
                total_percentage: format_pct(total, grand_total),
            }
        })
        .collect();

    groups.sort_by(|a, b| b.total.cmp(&a.total));

    debug!(
        primary = primary.field,
        secondary = secondary.field,
        total = grand_total,
        groups = groups.len(),
        "Two-level groups built"
    );

    TwoLevelGroups {
        total: grand_total,
        groups,
    }
}

/// Re-nests two-level groups under their secondary values.
///
/// The root carries the grand total, including respondents whose secondary
/// value is outside `domain`. It has one child per `domain` value with at
/// least one member, in domain order. Each of those holds one leaf per
/// primary group with a non-zero count, sorted by descending count. Every
/// percentage is taken against the grand total.
pub fn partition_by_secondary(groups: &TwoLevelGroups, root: &str, domain: &[&str]) -> HierarchyNode {
    let grand_total = groups.total;

    let mut children = Vec::new();
    for bucket in domain {
        let mut leaves: Vec<HierarchyNode> = groups
            .groups
            .iter()
            .filter_map(|g| {
                let count = g.count_of(bucket);
                (count > 0).then(|| HierarchyNode {
                    name: g.key.clone(),
                    value: count,
                    percentage: format_pct(count, grand_total),
                    children: Vec::new(),
                })
            })
            .collect();

        if leaves.is_empty() {
            continue;
        }
        leaves.sort_by(|a, b| b.value.cmp(&a.value));

        let value: usize = leaves.iter().map(|l| l.value).sum();
        children.push(HierarchyNode {
            name: bucket.to_string(),
            value,
            percentage: format_pct(value, grand_total),
            children: leaves,
        });
    }

    HierarchyNode {
        name: root.to_string(),
        value: grand_total,
        percentage: format_pct(grand_total, grand_total),
        children,
    }
}
