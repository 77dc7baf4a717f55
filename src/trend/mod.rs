//! Scale-normalized endpoint comparison and the human-readable trend
//! statement it produces.

use crate::common::error::CoreError;
use crate::common::types::{IndicatorTable, Scale, TimeSeries, TrendDirection, TrendStatement};
use crate::extract;

/// Summarize a non-empty series.
///
/// Every value is divided by `scale.divisor` before comparison and
/// reporting. Direction is the endpoint rule: first vs last scaled value,
/// with equality meaning `stable` regardless of what happens in between.
/// Min and max cover the full scaled series, not just the endpoints.
///
/// The extractor contract guarantees a non-empty series; an empty one never
/// reaches this function.
pub fn summarize(
    series: &TimeSeries,
    scale: &Scale,
    country: &str,
    indicator: &str,
) -> TrendStatement {
    debug_assert!(!series.is_empty(), "summarize requires a non-empty series");

    let scaled: Vec<f64> = series.values.iter().map(|v| v / scale.divisor).collect();
    let first = scaled[0];
    let last = scaled[scaled.len() - 1];
    let min = scaled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = scaled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    TrendStatement {
        country: country.to_string(),
        indicator: indicator.to_string(),
        direction: TrendDirection::of_endpoints(first, last),
        min,
        max,
        suffix: scale.suffix.clone(),
    }
}

/// Extract-and-summarize with the recovery boundary applied: data-shape
/// errors come back as their user-facing sentences instead of propagating.
/// This is what the router and the chart page consume.
pub fn summary_text(
    table: &IndicatorTable,
    country: &str,
    indicator: &str,
    scale: &Scale,
) -> String {
    match extract::extract_first(table, country, indicator) {
        Ok(series) => summarize(&series, scale, country, indicator).to_string(),
        Err(err) => err.to_string(),
    }
}

/// Same boundary for a typed result, used by callers that chart the series
/// alongside the statement.
pub fn summarize_indicator(
    table: &IndicatorTable,
    country: &str,
    indicator: &str,
    scale: &Scale,
) -> Result<(TimeSeries, TrendStatement), CoreError> {
    let series = extract::extract_first(table, country, indicator)?;
    let statement = summarize(&series, scale, country, indicator);
    Ok((series, statement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::IndicatorRow;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + chrono::Months::new(3 * i as u32))
            .collect();
        TimeSeries { dates, values }
    }

    fn unit_scale() -> Scale {
        Scale {
            divisor: 1.0,
            suffix: "B".to_string(),
        }
    }

    #[test]
    fn test_endpoint_rule_ignores_volatility() {
        // [5, 100, 5]: equal endpoints must report stable, not decreasing.
        let statement = summarize(&series(vec![5.0, 100.0, 5.0]), &unit_scale(), "SG", "GDP");
        assert_eq!(statement.direction, TrendDirection::Stable);
        assert_eq!(statement.min, 5.0);
        assert_eq!(statement.max, 100.0);
    }

    #[test]
    fn test_min_max_bound_every_scaled_value() {
        let values = vec![3.0, 9.0, 1.0, 7.0];
        let statement = summarize(&series(values.clone()), &unit_scale(), "SG", "GDP");
        for v in values {
            assert!(statement.min <= v && v <= statement.max);
        }
    }

    #[test]
    fn test_scaling_applied_before_reporting() {
        let statement = summarize(
            &series(vec![2_000_000_000.0, 4_000_000_000.0]),
            &Scale::billions(),
            "Singapore",
            "GDP",
        );
        assert_eq!(statement.direction, TrendDirection::Increasing);
        assert_eq!(statement.min, 2.0);
        assert_eq!(statement.max, 4.0);
    }

    #[test]
    fn test_rendered_sentence() {
        let statement = summarize(
            &series(vec![2_000_000_000.0, 4_000_000_000.0]),
            &Scale::billions(),
            "Singapore",
            "GDP",
        );
        assert_eq!(
            statement.to_string(),
            "GDP for Singapore shows a increasing trend, ranging from 2.00B to 4.00B over the period."
        );
    }

    #[test]
    fn test_summary_text_recovers_no_data() {
        let table = IndicatorTable {
            periods: vec!["2020-Q1".into()],
            rows: vec![IndicatorRow {
                country: "Singapore".into(),
                indicator: "GDP".into(),
                seasonal_adjustment: "NSA".into(),
                unit: "USD".into(),
                values: vec![None],
            }],
        };
        assert_eq!(
            summary_text(&table, "France", "GDP", &Scale::default()),
            "No data available for GDP in France."
        );
        assert_eq!(
            summary_text(&table, "Singapore", "GDP", &Scale::default()),
            "All values are missing for GDP in Singapore."
        );
    }
}
