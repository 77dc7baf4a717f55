//! Row selection and reshaping: turns the rows matching a
//! (country, indicator) pair into a single ordered time series.

use crate::common::error::CoreError;
use crate::common::period;
use crate::common::types::{IndicatorRow, IndicatorTable, TimeSeries};

fn matches(row: &IndicatorRow, country: &str, indicator: &str) -> bool {
    row.country.eq_ignore_ascii_case(country) && row.indicator.eq_ignore_ascii_case(indicator)
}

/// Extract the series for the first row matching (country, indicator).
///
/// Matching is case-insensitive. When several rows match (same pair with
/// different adjustment/unit), the first in table order is the documented
/// tie-break; callers that need a specific variant should pre-filter rows.
///
/// Zero matching rows -> `NoMatchingData`; rows exist but every quarter
/// value is absent -> `AllValuesMissing`. Both are explicit outcomes the
/// caller renders as text, not crashes.
pub fn extract_first(
    table: &IndicatorTable,
    country: &str,
    indicator: &str,
) -> Result<TimeSeries, CoreError> {
    let row = table
        .rows
        .iter()
        .find(|r| matches(r, country, indicator))
        .ok_or_else(|| CoreError::NoMatchingData {
            country: country.to_string(),
            indicator: indicator.to_string(),
        })?;

    let labeled: Vec<(&str, f64)> = table.labeled_values(row).collect();
    if labeled.is_empty() {
        return Err(CoreError::AllValuesMissing {
            country: country.to_string(),
            indicator: indicator.to_string(),
        });
    }
    period::aggregate(labeled)
}

/// Extract one series across every row matching (country, indicator),
/// averaging values that land on the same quarter.
///
/// This is the forecasting path: duplicate rows (different adjustment/unit)
/// all contribute, with per-date means taken during normalization.
pub fn extract_merged(
    table: &IndicatorTable,
    country: &str,
    indicator: &str,
) -> Result<TimeSeries, CoreError> {
    let mut matched = false;
    let mut labeled: Vec<(&str, f64)> = Vec::new();
    for row in table.rows.iter().filter(|r| matches(r, country, indicator)) {
        matched = true;
        labeled.extend(table.labeled_values(row));
    }

    if !matched {
        return Err(CoreError::NoMatchingData {
            country: country.to_string(),
            indicator: indicator.to_string(),
        });
    }
    if labeled.is_empty() {
        return Err(CoreError::AllValuesMissing {
            country: country.to_string(),
            indicator: indicator.to_string(),
        });
    }
    period::aggregate(labeled)
}

/// Distinct indicator values for a country, in table encounter order.
/// Country matching is case-insensitive; the returned names keep their
/// table casing.
pub fn indicators_for(table: &IndicatorTable, country: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for row in &table.rows {
        if row.country.eq_ignore_ascii_case(country)
            && !seen.iter().any(|s| s == &row.indicator)
        {
            seen.push(row.indicator.clone());
        }
    }
    seen
}

/// Distinct country values in table encounter order.
pub fn countries(table: &IndicatorTable) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for row in &table.rows {
        if !seen.iter().any(|s| s == &row.country) {
            seen.push(row.country.clone());
        }
    }
    seen
}

/// Distinct indicator values in table encounter order.
pub fn indicators(table: &IndicatorTable) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for row in &table.rows {
        if !seen.iter().any(|s| s == &row.indicator) {
            seen.push(row.indicator.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::IndicatorRow;
    use chrono::NaiveDate;

    fn row(country: &str, indicator: &str, unit: &str, values: Vec<Option<f64>>) -> IndicatorRow {
        IndicatorRow {
            country: country.to_string(),
            indicator: indicator.to_string(),
            seasonal_adjustment: "NSA".to_string(),
            unit: unit.to_string(),
            values,
        }
    }

    fn sample_table() -> IndicatorTable {
        IndicatorTable {
            periods: vec!["2020-Q1".into(), "2020-Q2".into(), "2020-Q3".into()],
            rows: vec![
                row("Singapore", "GDP", "USD", vec![Some(10.0), Some(20.0), Some(30.0)]),
                row("Singapore", "GDP", "SGD", vec![Some(30.0), Some(40.0), None]),
                row("Singapore", "CPI", "Index", vec![None, None, None]),
                row("Malaysia", "GDP", "USD", vec![Some(5.0), None, Some(7.0)]),
            ],
        }
    }

    #[test]
    fn test_no_matching_rows() {
        let table = sample_table();
        let err = extract_first(&table, "France", "GDP").unwrap_err();
        assert!(matches!(err, CoreError::NoMatchingData { .. }));
    }

    #[test]
    fn test_all_values_missing_is_distinct_outcome() {
        let table = sample_table();
        let err = extract_first(&table, "Singapore", "CPI").unwrap_err();
        assert!(matches!(err, CoreError::AllValuesMissing { .. }));
    }

    #[test]
    fn test_case_insensitive_match() {
        let table = sample_table();
        let series = extract_first(&table, "singapore", "gdp").unwrap();
        assert_eq!(series.values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_first_row_policy_on_duplicates() {
        let table = sample_table();
        // Two Singapore/GDP rows; the USD one comes first in table order.
        let series = extract_first(&table, "Singapore", "GDP").unwrap();
        assert_eq!(series.values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_merged_averages_duplicate_rows() {
        let table = sample_table();
        let series = extract_merged(&table, "Singapore", "GDP").unwrap();
        // Q1: mean(10, 30) = 20; Q2: mean(20, 40) = 30; Q3: only 30.
        assert_eq!(series.values, vec![20.0, 30.0, 30.0]);
        assert_eq!(
            series.dates[0],
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_missing_values_dropped_not_zeroed() {
        let table = sample_table();
        let series = extract_first(&table, "Malaysia", "GDP").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values, vec![5.0, 7.0]);
    }

    #[test]
    fn test_indicators_for_encounter_order() {
        let table = sample_table();
        assert_eq!(indicators_for(&table, "singapore"), vec!["GDP", "CPI"]);
        assert!(indicators_for(&table, "France").is_empty());
    }

    #[test]
    fn test_vocabularies() {
        let table = sample_table();
        assert_eq!(countries(&table), vec!["Singapore", "Malaysia"]);
        assert_eq!(indicators(&table), vec!["GDP", "CPI"]);
    }
}
