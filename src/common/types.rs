use chrono::NaiveDate;
use serde::Serialize;

/// One row of a wide-format indicator table.
///
/// `values` is positionally aligned with the owning table's `periods`;
/// `None` marks a quarter with no reported value.
#[derive(Debug, Clone)]
pub struct IndicatorRow {
    pub country: String,
    pub indicator: String,
    pub seasonal_adjustment: String,
    pub unit: String,
    pub values: Vec<Option<f64>>,
}

/// A wide-format quarterly indicator table: one row per
/// (country, indicator, adjustment, unit), one column per calendar quarter.
///
/// The single shared `periods` vector enforces the invariant that every row
/// has the same period-label columns. The table is read-only once loaded;
/// schema validation is the loader's responsibility, not this crate's.
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    /// Period labels in column order, e.g. `["2019-Q1", "2019-Q2", ...]`.
    pub periods: Vec<String>,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate a row's non-missing values paired with their period labels.
    pub fn labeled_values<'a>(
        &'a self,
        row: &'a IndicatorRow,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.periods
            .iter()
            .zip(row.values.iter())
            .filter_map(|(label, value)| value.map(|v| (label.as_str(), v)))
    }
}

/// A single time series of (date, value) pairs as parallel vectors.
/// Dates are sorted ascending with no duplicates and no missing values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Returns the number of data points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series has no data points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the last observed date, or None if empty.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Returns a copy with every value divided by `divisor`.
    pub fn scaled(&self, divisor: f64) -> TimeSeries {
        TimeSeries {
            dates: self.dates.clone(),
            values: self.values.iter().map(|v| v / divisor).collect(),
        }
    }
}

/// Unit-normalization applied before comparison and reporting.
///
/// Indicators have different native units, so the divisor is configurable;
/// the default reports in billions.
#[derive(Debug, Clone, Serialize)]
pub struct Scale {
    pub divisor: f64,
    /// Magnitude suffix used when rendering scaled values, e.g. "B".
    pub suffix: String,
}

impl Scale {
    pub fn billions() -> Self {
        Scale {
            divisor: 1e9,
            suffix: "B".to_string(),
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::billions()
    }
}

/// Endpoint movement of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Classify by strict comparison of the first and last scaled values.
    /// Intentionally an endpoint rule, not a regression slope: intermediate
    /// volatility does not affect the result.
    pub fn of_endpoints(first: f64, last: f64) -> TrendDirection {
        if last > first {
            TrendDirection::Increasing
        } else if last < first {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        };
        f.write_str(s)
    }
}

/// The {subject, direction, min, max} summary of a series.
#[derive(Debug, Clone, Serialize)]
pub struct TrendStatement {
    pub country: String,
    pub indicator: String,
    pub direction: TrendDirection,
    /// Minimum of the scaled series (full series, not just endpoints).
    pub min: f64,
    /// Maximum of the scaled series.
    pub max: f64,
    /// Magnitude suffix carried from the scale used, e.g. "B".
    pub suffix: String,
}

impl std::fmt::Display for TrendStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} for {} shows a {} trend, ranging from {:.2}{} to {:.2}{} over the period.",
            self.indicator,
            self.country,
            self.direction,
            self.min,
            self.suffix,
            self.max,
            self.suffix
        )
    }
}

/// The result of extending a series `horizon` quarters past its last
/// observed date, reduced to a trend over just the future points.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutcome {
    /// Future dates, each exactly one quarter apart, the first one quarter
    /// after the last observed date.
    pub dates: Vec<NaiveDate>,
    /// Point forecasts, already in the caller's scaled units.
    pub points: Vec<f64>,
    /// Lower prediction interval bounds.
    pub lower_bounds: Vec<f64>,
    /// Upper prediction interval bounds.
    pub upper_bounds: Vec<f64>,
    /// Endpoint comparison of the first vs last point forecast.
    pub direction: TrendDirection,
    /// Minimum of the point forecasts.
    pub min: f64,
    /// Maximum of the point forecasts.
    pub max: f64,
}
