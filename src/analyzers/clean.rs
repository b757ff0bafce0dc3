use tracing::debug;

use crate::parser::SurveyRow;

/// Keeps the rows where every `required` field is present and non-blank
/// after trimming, and every `numeric` field parses as a finite number.
///
/// Rows failing the predicate are dropped without error. The returned rows
/// are borrowed unchanged from the input, in input order.
pub fn clean<'a>(
    rows: &'a [SurveyRow],
    required: &[&str],
    numeric: &[&str],
) -> Vec<&'a SurveyRow> {
    let cleaned: Vec<&SurveyRow> = rows
        .iter()
        .filter(|row| required.iter().all(|f| row.text(f).is_some()))
        .filter(|row| numeric.iter().all(|f| row.number(f).is_some()))
        .collect();

    debug!(
        input = rows.len(),
        kept = cleaned.len(),
        dropped = rows.len() - cleaned.len(),
        ?required,
        "Rows cleaned"
    );

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_drops_missing_and_blank() {
        let rows = vec![
            create_row(&[("political_view", "Liberal")]),
            create_row(&[("political_view", "   ")]),
            create_row(&[("gender", "male")]),
            create_row(&[("political_view", " Conservative ")]),
        ];

        let cleaned = clean(&rows, &["political_view"], &[]);

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].get("political_view"), Some("Liberal"));
        // shape is unchanged: the value is not trimmed in place
        assert_eq!(cleaned[1].get("political_view"), Some(" Conservative "));
    }

    #[test]
    fn test_clean_requires_numeric_parse() {
        let rows = vec![
            create_row(&[("minute_per_day", "30"), ("share_per_week", "2")]),
            create_row(&[("minute_per_day", "thirty"), ("share_per_week", "2")]),
            create_row(&[("minute_per_day", "15"), ("share_per_week", "inf")]),
            create_row(&[("minute_per_day", "15")]),
        ];

        let fields = ["minute_per_day", "share_per_week"];
        let cleaned = clean(&rows, &fields, &fields);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].number("minute_per_day"), Some(30.0));
    }

    #[test]
    fn test_clean_no_requirements_keeps_everything() {
        let rows = vec![create_row(&[]), create_row(&[("gender", "male")])];
        assert_eq!(clean(&rows, &[], &[]).len(), 2);
    }

    #[test]
    fn test_clean_no_valid_rows() {
        let rows = vec![
            create_row(&[("political_view", "")]),
            create_row(&[("political_view", "\t")]),
        ];
        assert!(clean(&rows, &["political_view"], &[]).is_empty());
    }

    // Helper functions for tests
    fn create_row(pairs: &[(&str, &str)]) -> SurveyRow {
        SurveyRow::from_pairs(pairs.iter().copied())
    }
}
