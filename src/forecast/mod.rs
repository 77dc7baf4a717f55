//! Horizon extension: fits a trend/seasonality model on a normalized
//! quarterly series and projects it forward, reducing the projection to a
//! trend over just the future points.

pub mod models;

use serde::Serialize;
use tracing::debug;

use crate::common::error::CoreError;
use crate::common::period;
use crate::common::types::{ForecastOutcome, IndicatorTable, Scale, TimeSeries, TrendDirection};
use crate::extract;
use crate::seasonality;

/// Confidence level used for prediction intervals.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// The closed set of substitutable forecasting models.
///
/// `Auto` picks for the data: seasonal ETS when the series carries an
/// annual cycle, non-seasonal ETS otherwise, linear as the last resort for
/// short histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    Auto,
    SeasonalEts,
    Ets,
    Exponential,
    Linear,
}

impl ForecastModel {
    fn as_str(&self) -> &'static str {
        match self {
            ForecastModel::Auto => "auto",
            ForecastModel::SeasonalEts => "seasonal_ets",
            ForecastModel::Ets => "ets",
            ForecastModel::Exponential => "exponential",
            ForecastModel::Linear => "linear",
        }
    }
}

/// Extend a series by exactly `horizon` future quarters.
///
/// Input values are expected pre-scaled (the same convention the trend
/// summarizer uses) so the model operates on human-readable magnitudes.
/// Future dates continue the quarterly cadence: each point one quarter
/// apart, the first one quarter after the last observed date.
///
/// A zero horizon is `InvalidHorizon`, fewer than 2 observed points is
/// `InsufficientHistory`; any fit failure
/// surfaces as `ForecastFitFailure` rather than a silent flat forecast.
/// No model caching: every call refits. (If caching is ever added, the key
/// must be (country, indicator, series content hash, horizon).)
pub fn forecast(
    series: &TimeSeries,
    horizon: usize,
    model: ForecastModel,
) -> Result<ForecastOutcome, CoreError> {
    if horizon == 0 {
        return Err(CoreError::InvalidHorizon);
    }
    if series.len() < 2 {
        return Err(CoreError::InsufficientHistory { got: series.len() });
    }

    let values = &series.values;
    let fitted = match model {
        ForecastModel::Auto => auto(values, horizon)?,
        ForecastModel::SeasonalEts => models::seasonal_ets(
            values,
            horizon,
            DEFAULT_CONFIDENCE,
            period::QUARTERS_PER_YEAR,
        )?,
        ForecastModel::Ets => models::ets(values, horizon, DEFAULT_CONFIDENCE)?,
        ForecastModel::Exponential => models::exponential(values, horizon, DEFAULT_CONFIDENCE)?,
        ForecastModel::Linear => models::linear(values, horizon, DEFAULT_CONFIDENCE)?,
    };

    let last = series.last_date().ok_or_else(|| {
        CoreError::ForecastFitFailure("series has no observed dates".to_string())
    })?;
    let mut dates = Vec::with_capacity(horizon);
    let mut cursor = last;
    for _ in 0..horizon {
        cursor = period::next_quarter(cursor);
        dates.push(cursor);
    }

    let first = fitted.points[0];
    let final_point = fitted.points[fitted.points.len() - 1];
    let min = fitted.points.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = fitted
        .points
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(ForecastOutcome {
        dates,
        points: fitted.points,
        lower_bounds: fitted.lower_bounds,
        upper_bounds: fitted.upper_bounds,
        direction: TrendDirection::of_endpoints(first, final_point),
        min,
        max,
    })
}

/// Model selection for quarterly data: seasonal ETS when an annual cycle is
/// present, then non-seasonal ETS, then linear for short histories. Each
/// fallback is logged; the final candidate's failure propagates.
fn auto(values: &[f64], horizon: usize) -> Result<models::ModelForecast, CoreError> {
    let n = values.len();

    if n >= 2 * period::QUARTERS_PER_YEAR && seasonality::has_quarterly_cycle(values) {
        match models::seasonal_ets(values, horizon, DEFAULT_CONFIDENCE, period::QUARTERS_PER_YEAR)
        {
            Ok(fitted) => {
                debug!(model = ForecastModel::SeasonalEts.as_str(), n, "auto selection");
                return Ok(fitted);
            }
            Err(err) => {
                debug!(%err, "seasonal ETS failed, falling back to non-seasonal");
            }
        }
    }

    if n >= models::ETS_MIN_POINTS {
        match models::ets(values, horizon, DEFAULT_CONFIDENCE) {
            Ok(fitted) => {
                debug!(model = ForecastModel::Ets.as_str(), n, "auto selection");
                return Ok(fitted);
            }
            Err(err) => {
                debug!(%err, "ETS failed, falling back to linear");
            }
        }
    }

    debug!(model = ForecastModel::Linear.as_str(), n, "auto selection");
    models::linear(values, horizon, DEFAULT_CONFIDENCE)
}

/// End-to-end forecast for a (country, indicator) pair.
///
/// Duplicate rows for the pair are merged with per-quarter means before
/// fitting, and values are scaled by `scale.divisor` so the model and the
/// rendered summary both work in reporting units. Returns the outcome
/// together with its summary sentence.
pub fn forecast_indicator(
    table: &IndicatorTable,
    country: &str,
    indicator: &str,
    horizon: usize,
    scale: &Scale,
    model: ForecastModel,
) -> Result<(ForecastOutcome, String), CoreError> {
    let series = extract::extract_merged(table, country, indicator)?.scaled(scale.divisor);
    let outcome = forecast(&series, horizon, model)?;
    let summary = format!(
        "Forecast for {} in {} shows a {} trend over the next {} quarters, \
         with predicted values ranging from {:.2}{} to {:.2}{}.",
        indicator,
        country,
        outcome.direction,
        horizon,
        outcome.min,
        scale.suffix,
        outcome.max,
        scale.suffix
    );
    Ok((outcome, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::IndicatorRow;
    use chrono::NaiveDate;

    fn quarterly_series(values: Vec<f64>) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let dates = (0..values.len())
            .map(|i| start + chrono::Months::new(3 * i as u32))
            .collect();
        TimeSeries { dates, values }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_horizon_contract_quarterly_cadence() {
        // 8 observed quarters ending 2019-10-01; horizon 4 must produce
        // 2020-01-01, 2020-04-01, 2020-07-01, 2020-10-01.
        let series = quarterly_series((0..8).map(|i| 100.0 + i as f64).collect());
        let outcome = forecast(&series, 4, ForecastModel::Linear).unwrap();

        assert_eq!(outcome.points.len(), 4);
        assert_eq!(
            outcome.dates,
            vec![
                date(2020, 1, 1),
                date(2020, 4, 1),
                date(2020, 7, 1),
                date(2020, 10, 1),
            ]
        );
    }

    #[test]
    fn test_insufficient_history() {
        let series = quarterly_series(vec![5.0]);
        let err = forecast(&series, 4, ForecastModel::Linear).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientHistory { got: 1 }));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let series = quarterly_series(vec![1.0, 2.0, 3.0, 4.0]);
        let err = forecast(&series, 0, ForecastModel::Linear).unwrap_err();
        assert!(matches!(err, CoreError::InvalidHorizon));
    }

    #[test]
    fn test_trend_statement_covers_future_points_only() {
        // Observed data decreases, but the linear fit of the last stretch
        // still decides direction from the future endpoints alone.
        let series = quarterly_series(vec![10.0, 8.0, 6.0, 4.0]);
        let outcome = forecast(&series, 4, ForecastModel::Linear).unwrap();
        assert_eq!(outcome.direction, TrendDirection::Decreasing);
        assert_eq!(
            outcome.direction,
            TrendDirection::of_endpoints(outcome.points[0], outcome.points[3])
        );
    }

    #[test]
    fn test_auto_short_history_falls_back_to_linear() {
        let series = quarterly_series(vec![1.0, 2.0, 3.0]);
        let outcome = forecast(&series, 2, ForecastModel::Auto).unwrap();
        assert_eq!(outcome.points.len(), 2);
        assert_eq!(outcome.direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_auto_long_history_succeeds() {
        let values: Vec<f64> = (0..24)
            .map(|i| {
                let seasonal = 5.0 * (2.0 * std::f64::consts::PI * i as f64 / 4.0).sin();
                200.0 + 3.0 * i as f64 + seasonal
            })
            .collect();
        let series = quarterly_series(values);
        let outcome = forecast(&series, 8, ForecastModel::Auto).unwrap();
        assert_eq!(outcome.points.len(), 8);
        for p in &outcome.points {
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_auto_pure_seasonal_history_succeeds() {
        // A trendless annual cycle drives auto selection down the
        // seasonal path; the fit must come back usable, not abort.
        let values: Vec<f64> = (0..40)
            .map(|i| 50.0 + 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 4.0).sin())
            .collect();
        let series = quarterly_series(values);
        let outcome = forecast(&series, 4, ForecastModel::Auto).unwrap();
        assert_eq!(outcome.points.len(), 4);
        for p in &outcome.points {
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_forecast_indicator_merges_and_scales() {
        let periods: Vec<String> = (0..8)
            .map(|i| format!("{}-Q{}", 2018 + i / 4, i % 4 + 1))
            .collect();
        // Two rows for the same pair; per-quarter means feed the fit.
        let make_values = |offset: f64| {
            (0..8)
                .map(|i| Some((100.0 + offset + 10.0 * i as f64) * 1e9))
                .collect::<Vec<_>>()
        };
        let table = IndicatorTable {
            periods,
            rows: vec![
                IndicatorRow {
                    country: "Singapore".into(),
                    indicator: "GDP".into(),
                    seasonal_adjustment: "NSA".into(),
                    unit: "USD".into(),
                    values: make_values(0.0),
                },
                IndicatorRow {
                    country: "Singapore".into(),
                    indicator: "GDP".into(),
                    seasonal_adjustment: "SA".into(),
                    unit: "USD".into(),
                    values: make_values(20.0),
                },
            ],
        };

        let (outcome, summary) = forecast_indicator(
            &table,
            "singapore",
            "gdp",
            4,
            &Scale::billions(),
            ForecastModel::Linear,
        )
        .unwrap();

        assert_eq!(outcome.points.len(), 4);
        // Merged series is 110 + 10i in billions; the next point continues it.
        assert!((outcome.points[0] - 190.0).abs() < 1.0);
        assert!(summary.starts_with("Forecast for gdp in singapore shows a increasing trend"));
        assert!(summary.contains("next 4 quarters"));
    }

    #[test]
    fn test_fit_failure_surfaces() {
        // Exponential on non-positive values must error, not flatten.
        let series = quarterly_series(vec![-1.0, 2.0, 3.0, 4.0]);
        let err = forecast(&series, 4, ForecastModel::Exponential).unwrap_err();
        assert!(matches!(err, CoreError::ForecastFitFailure(_)));
    }
}
