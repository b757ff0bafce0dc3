use tracing::debug;

use crate::analyzers::types::{BinSummary, BinnedSummary, Quartiles};
use crate::analyzers::utility::{quantile_sorted, round_half_up, sort_ascending};
use crate::parser::SurveyRow;

/// Splits the `[min, max]` range of `bin_field` into `bin_count` equal-width
/// bins and summarizes the `value_field` values of each bin's members.
///
/// Membership is inclusive at both ends (`lower <= x <= upper`), so a value
/// lying exactly on an interior edge belongs to both adjacent bins. The last
/// bin's upper edge is pinned to the observed maximum. Empty bins are left
/// out, but each summary keeps its 1-based position among all bins.
pub fn summarize_bins(
    rows: &[&SurveyRow],
    bin_field: &str,
    value_field: &str,
    bin_count: usize,
) -> BinnedSummary {
    let points: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|row| Some((row.number(bin_field)?, row.number(value_field)?)))
        .collect();

    let total = points.len();
    if total == 0 || bin_count == 0 {
        return BinnedSummary {
            total,
            bins: Vec::new(),
        };
    }

    let bin_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let bin_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let span = bin_max - bin_min;
    let edge = |i: usize| {
        if span.is_finite() {
            bin_min + i as f64 * (span / bin_count as f64)
        } else {
            // the range itself overflows f64, so interpolate between the ends
            let t = i as f64 / bin_count as f64;
            bin_min * (1.0 - t) + bin_max * t
        }
    };

    let mut bins = Vec::new();
    for i in 0..bin_count {
        let lower = edge(i);
        let upper = if i == bin_count - 1 {
            bin_max
        } else {
            edge(i + 1)
        };

        let mut values: Vec<f64> = points
            .iter()
            .filter(|(x, _)| *x >= lower && *x <= upper)
            .map(|(_, v)| *v)
            .collect();

        if values.is_empty() {
            continue;
        }
        sort_ascending(&mut values);

        let (quartiles, outliers) = box_stats(&values);
        bins.push(BinSummary {
            group: i + 1,
            label: format!(
                "{}-{} min",
                round_half_up(lower),
                round_half_up(upper)
            ),
            range: [lower, upper],
            count: values.len(),
            quartiles,
            outliers,
            values,
        });
    }

    debug!(
        bin_field,
        value_field,
        total,
        bin_min,
        bin_max,
        bins = bins.len(),
        "Bins summarized"
    );

    BinnedSummary { total, bins }
}

/// Quartiles and 1.5 * IQR outliers of ascending, non-empty `sorted` values.
///
/// `min`/`max` span the non-outlier values, falling back to the full range if
/// every value is an outlier. They never cut into the box: an interpolated
/// quartile can lie outside the nearest non-outlier value.
pub fn box_stats(sorted: &[f64]) -> (Quartiles, Vec<f64>) {
    let q1 = quantile_sorted(sorted, 0.25);
    let median = quantile_sorted(sorted, 0.5);
    let q3 = quantile_sorted(sorted, 0.75);

    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
        .iter()
        .partition(|v| **v >= lower_fence && **v <= upper_fence);

    let (min, max) = match (inside.first(), inside.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => (
            sorted.first().copied().unwrap_or_default(),
            sorted.last().copied().unwrap_or_default(),
        ),
    };

    (
        Quartiles {
            min: min.min(q1),
            q1,
            median,
            q3,
            max: max.max(q3),
        },
        outliers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_edge_value_lands_in_both_bins() {
        let rows = create_rows(&[(0.0, 1.0), (10.0, 2.0), (20.0, 3.0), (30.0, 4.0), (40.0, 5.0), (50.0, 6.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);

        let ranges: Vec<[f64; 2]> = result.bins.iter().map(|b| b.range).collect();
        assert_eq!(
            ranges,
            vec![[0.0, 10.0], [10.0, 20.0], [20.0, 30.0], [30.0, 40.0], [40.0, 50.0]]
        );

        let second = result.bins.iter().find(|b| b.label == "10-20 min").unwrap();
        let third = result.bins.iter().find(|b| b.label == "20-30 min").unwrap();
        // minute_per_day = 20 carries share_per_week = 3.0
        assert!(second.values.contains(&3.0));
        assert!(third.values.contains(&3.0));
        assert_eq!(second.count, 2);
        assert_eq!(third.count, 2);

        let memberships: usize = result.bins.iter().map(|b| b.count).sum();
        assert_eq!(memberships, 10);
        assert_eq!(result.total, 6);
    }

    #[test]
    fn test_last_edge_pinned_to_max() {
        let rows = create_rows(&[(0.0, 1.0), (0.3, 1.0), (1.0, 2.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 3);
        let last = result.bins.last().unwrap();

        assert_eq!(last.range[1], 1.0);
        assert_eq!(last.group, 3);
        assert!(last.values.contains(&2.0));
    }

    #[test]
    fn test_empty_bins_omitted() {
        let rows = create_rows(&[(0.0, 1.0), (1.0, 2.0), (100.0, 3.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);
        let groups: Vec<usize> = result.bins.iter().map(|b| b.group).collect();

        assert_eq!(groups, vec![1, 5]);
        assert_eq!(result.bins[0].label, "0-20 min");
        assert_eq!(result.bins[1].label, "80-100 min");
    }

    #[test]
    fn test_every_row_covered() {
        let rows = create_rows(&[(3.0, 1.0), (7.5, 4.0), (12.0, 2.0), (18.2, 9.0), (21.0, 3.0), (44.0, 8.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);

        for (x, _) in [(3.0, 1.0), (7.5, 4.0), (12.0, 2.0), (18.2, 9.0), (21.0, 3.0), (44.0, 8.0)] {
            assert!(
                result.bins.iter().any(|b| x >= b.range[0] && x <= b.range[1]),
                "{x} not covered"
            );
        }
    }

    #[test]
    fn test_quantile_monotonicity() {
        let rows = create_rows(&[
            (1.0, 5.0),
            (2.0, 1.0),
            (3.0, 100.0),
            (4.0, 3.0),
            (5.0, 2.0),
            (6.0, 4.0),
            (7.0, 7.0),
            (8.0, 0.0),
            (9.0, 6.0),
            (10.0, 60.0),
        ]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 2);

        for bin in &result.bins {
            let q = bin.quartiles;
            assert!(q.min <= q.q1, "{q:?}");
            assert!(q.q1 <= q.median, "{q:?}");
            assert!(q.median <= q.q3, "{q:?}");
            assert!(q.q3 <= q.max, "{q:?}");
        }
    }

    #[test]
    fn test_box_stats_outliers() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 100.0];
        let (q, outliers) = box_stats(&sorted);

        assert_eq!(q.q1, 2.0);
        assert_eq!(q.median, 3.0);
        assert_eq!(q.q3, 4.0);
        assert_eq!(outliers, vec![100.0]);
        assert_eq!(q.min, 1.0);
        assert_eq!(q.max, 4.0);
    }

    #[test]
    fn test_box_stats_whiskers_never_inside_box() {
        // q1 interpolates to 7.5 while the lowest non-outlier is 10
        let (q, outliers) = box_stats(&[0.0, 10.0, 10.0, 10.0]);

        assert_eq!(outliers, vec![0.0]);
        assert_eq!(q.q1, 7.5);
        assert_eq!(q.min, 7.5);
        assert_eq!(q.max, 10.0);
    }

    #[test]
    fn test_box_stats_single_value() {
        let (q, outliers) = box_stats(&[5.0]);
        assert_eq!(q.min, 5.0);
        assert_eq!(q.max, 5.0);
        assert_eq!(q.median, 5.0);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_identical_bin_values_fill_every_bin() {
        let rows = create_rows(&[(10.0, 1.0), (10.0, 2.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);

        assert_eq!(result.bins.len(), 5);
        assert!(result.bins.iter().all(|b| b.count == 2 && b.label == "10-10 min"));
    }

    #[test]
    fn test_empty_input() {
        let result = summarize_bins(&[], "minute_per_day", "share_per_week", 5);
        assert_eq!(result.total, 0);
        assert!(result.bins.is_empty());
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let rows = create_rows(&[(1.0, 2.0), (5.0, 3.0), (9.0, 1.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let a = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);
        let b = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_range_wider_than_f64_keeps_every_row() {
        let rows = create_rows(&[(-1e308, 1.0), (1e308, 2.0), (0.0, 3.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();

        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 5);

        assert_eq!(result.total, 3);
        let groups: Vec<usize> = result.bins.iter().map(|b| b.group).collect();
        assert_eq!(groups, vec![1, 3, 5]);
        assert!(result.bins.iter().all(|b| b.count == 1));
        assert_eq!(result.bins[0].range[0], -1e308);
        assert_eq!(result.bins[2].range[1], 1e308);
        assert!(
            result
                .bins
                .iter()
                .all(|b| b.range[0].is_finite() && b.range[1].is_finite())
        );
    }

    #[test]
    fn test_labels_round_ties_up_without_negative_zero() {
        let rows = create_rows(&[(-0.4, 1.0), (4.6, 2.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();
        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 1);
        assert_eq!(result.bins[0].label, "0-5 min");

        let rows = create_rows(&[(-2.5, 1.0), (1.0, 2.0)]);
        let refs: Vec<&SurveyRow> = rows.iter().collect();
        let result = summarize_bins(&refs, "minute_per_day", "share_per_week", 1);
        assert_eq!(result.bins[0].label, "-2-1 min");
    }

    // Helper functions for tests
    fn create_rows(points: &[(f64, f64)]) -> Vec<SurveyRow> {
        points
            .iter()
            .map(|(m, s)| {
                SurveyRow::from_pairs([
                    ("minute_per_day", m.to_string()),
                    ("share_per_week", s.to_string()),
                ])
            })
            .collect()
    }
}
