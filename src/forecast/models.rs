//! The statistical model set behind the forecast extender.
//!
//! Every model shares one signature: pre-scaled values in, exactly `horizon`
//! point forecasts (with prediction intervals) out, or `ForecastFitFailure`.
//! Any of them is substitutable behind `ForecastModel`; callers depend only
//! on the point-estimate output shape.

use augurs_core::{Fit, Predict};
use augurs_ets::AutoETS;
use linregress::{FormulaRegressionBuilder, RegressionDataBuilder};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::common::error::CoreError;

/// Minimum points for an ETS fit.
pub const ETS_MIN_POINTS: usize = 4;

/// Point forecasts plus prediction interval bounds, one entry per future
/// quarter. Dates are attached by the caller.
#[derive(Debug, Clone)]
pub struct ModelForecast {
    pub points: Vec<f64>,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
}

fn fit_failure(msg: impl Into<String>) -> CoreError {
    CoreError::ForecastFitFailure(msg.into())
}

/// Non-seasonal automatic ETS.
pub fn ets(values: &[f64], horizon: usize, confidence_level: f64) -> Result<ModelForecast, CoreError> {
    if values.len() < ETS_MIN_POINTS {
        return Err(fit_failure(format!(
            "need at least {} points for ETS, got {}",
            ETS_MIN_POINTS,
            values.len()
        )));
    }

    let model = AutoETS::non_seasonal();
    let fitted = model
        .fit(values)
        .map_err(|e| fit_failure(format!("ETS model fitting failed: {e}")))?;
    let forecast = fitted
        .predict(horizon, confidence_level)
        .map_err(|e| fit_failure(format!("ETS prediction failed: {e}")))?;

    let (lower_bounds, upper_bounds) = match forecast.intervals {
        Some(intervals) => (intervals.lower, intervals.upper),
        // No intervals available - collapse to the point forecast.
        None => (forecast.point.clone(), forecast.point.clone()),
    };

    Ok(ModelForecast {
        points: forecast.point,
        lower_bounds,
        upper_bounds,
    })
}

/// ETS on a seasonally adjusted series, for a known season length (4 for
/// quarterly data). Requires two full cycles of history.
///
/// The seasonal component is estimated by classical additive
/// decomposition: detrend with OLS, average the detrended values per
/// phase, center the indices to sum to zero. The adjusted series goes
/// through the non-seasonal ETS search and the indices are added back to
/// the projected points and bounds. `AutoETS` itself is only ever run
/// non-seasonally; its seasonal component search is not usable here.
pub fn seasonal_ets(
    values: &[f64],
    horizon: usize,
    confidence_level: f64,
    season_length: usize,
) -> Result<ModelForecast, CoreError> {
    let n = values.len();
    if n < 2 * season_length {
        return Err(fit_failure(format!(
            "need at least {} points for seasonal ETS with season length {}, got {}",
            2 * season_length,
            season_length,
            n
        )));
    }

    let (intercept, slope, _) = fit_ols(values)?;

    // Phase means of the detrended series, centered so the seasonal
    // component carries no level.
    let mut seasonal = vec![0.0; season_length];
    let mut counts = vec![0usize; season_length];
    for (i, &v) in values.iter().enumerate() {
        let detrended = v - (intercept + slope * i as f64);
        seasonal[i % season_length] += detrended;
        counts[i % season_length] += 1;
    }
    for (s, &c) in seasonal.iter_mut().zip(counts.iter()) {
        *s /= c as f64;
    }
    let index_mean = seasonal.iter().sum::<f64>() / season_length as f64;
    for s in &mut seasonal {
        *s -= index_mean;
    }

    let adjusted: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| v - seasonal[i % season_length])
        .collect();

    let base = ets(&adjusted, horizon, confidence_level)?;

    let reseason = |series: Vec<f64>| -> Vec<f64> {
        series
            .into_iter()
            .enumerate()
            .map(|(k, v)| v + seasonal[(n + k) % season_length])
            .collect()
    };

    Ok(ModelForecast {
        points: reseason(base.points),
        lower_bounds: reseason(base.lower_bounds),
        upper_bounds: reseason(base.upper_bounds),
    })
}

/// Ordinary least squares on y = intercept + slope * x where x is the
/// 0-based observation index. Prediction intervals via the Student's
/// t-distribution. Works down to the 2-point floor.
pub fn linear(
    values: &[f64],
    horizon: usize,
    confidence_level: f64,
) -> Result<ModelForecast, CoreError> {
    let (intercept, slope, residual_se) = fit_ols(values)?;
    project_ols(
        values.len(),
        horizon,
        confidence_level,
        intercept,
        slope,
        residual_se,
        false,
    )
}

/// Exponential growth: OLS on ln(y), back-transformed. All values must be
/// strictly positive. Intervals computed in log space become naturally
/// asymmetric after back-transformation.
pub fn exponential(
    values: &[f64],
    horizon: usize,
    confidence_level: f64,
) -> Result<ModelForecast, CoreError> {
    if values.iter().any(|&v| v <= 0.0) {
        return Err(fit_failure(
            "exponential model requires all values to be strictly positive",
        ));
    }

    let log_values: Vec<f64> = values.iter().map(|v| v.ln()).collect();
    let (log_intercept, slope, residual_se) = fit_ols(&log_values)?;
    project_ols(
        values.len(),
        horizon,
        confidence_level,
        log_intercept,
        slope,
        residual_se,
        true,
    )
}

/// Fit y ~ x over 0-based indices; returns (intercept, slope, residual SE).
fn fit_ols(values: &[f64]) -> Result<(f64, f64, f64), CoreError> {
    let n = values.len();
    if n < 2 {
        return Err(fit_failure(format!(
            "need at least 2 points for regression, got {n}"
        )));
    }

    let x_vals: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let data = vec![
        ("Y".to_string(), values.to_vec()),
        ("X".to_string(), x_vals),
    ];

    let regression_data = RegressionDataBuilder::new()
        .build_from(data)
        .map_err(|e| fit_failure(format!("failed to build regression data: {e}")))?;
    let builder = FormulaRegressionBuilder::new()
        .data(&regression_data)
        .formula("Y ~ X");

    // Two points leave zero residual degrees of freedom: the line is exact,
    // so skip the statistics and report a zero residual SE.
    if n == 2 {
        let params = builder
            .fit_without_statistics()
            .map_err(|e| fit_failure(format!("regression fitting failed: {e}")))?;
        return Ok((params[0], params[1], 0.0));
    }

    let model = builder
        .fit()
        .map_err(|e| fit_failure(format!("regression fitting failed: {e}")))?;

    // parameters() returns [intercept, slope]; scale() is residual variance.
    let params = model.parameters();
    Ok((params[0], params[1], model.scale().sqrt()))
}

/// Project an OLS fit `horizon` steps past the last index, with Student-t
/// prediction intervals. `log_space` back-transforms through exp().
fn project_ols(
    n: usize,
    horizon: usize,
    confidence_level: f64,
    intercept: f64,
    slope: f64,
    residual_se: f64,
    log_space: bool,
) -> Result<ModelForecast, CoreError> {
    let x_vals: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let x_mean: f64 = x_vals.iter().sum::<f64>() / n as f64;
    let sum_sq_dev: f64 = x_vals.iter().map(|&x| (x - x_mean).powi(2)).sum();

    let back = |y: f64| if log_space { y.exp() } else { y };

    let mut points = Vec::with_capacity(horizon);
    let mut lower_bounds = Vec::with_capacity(horizon);
    let mut upper_bounds = Vec::with_capacity(horizon);

    // Constant or near-perfect fit: intervals collapse to the point
    // forecast instead of dividing by a ~zero deviation.
    if residual_se < 1e-10 || sum_sq_dev < 1e-10 {
        for i in 1..=horizon {
            let x_pred = (n - 1 + i) as f64;
            let y_hat = back(intercept + slope * x_pred);
            points.push(y_hat);
            lower_bounds.push(y_hat);
            upper_bounds.push(y_hat);
        }
        return Ok(ModelForecast {
            points,
            lower_bounds,
            upper_bounds,
        });
    }

    let df = (n as f64) - 2.0;
    if df <= 0.0 {
        return Err(fit_failure(
            "need more than 2 points for prediction intervals on noisy data",
        ));
    }
    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| fit_failure(format!("failed to create t-distribution: {e}")))?;
    let alpha = 1.0 - confidence_level;
    let t_value = t_dist.inverse_cdf(1.0 - alpha / 2.0);

    for i in 1..=horizon {
        let x_pred = (n - 1 + i) as f64;
        let y_hat = intercept + slope * x_pred;

        // PI = y_hat +/- t * se * sqrt(1 + 1/n + (x - x_mean)^2 / sum_sq_dev)
        let pi_width = t_value
            * residual_se
            * (1.0_f64 + 1.0 / n as f64 + (x_pred - x_mean).powi(2) / sum_sq_dev).sqrt();

        if y_hat.is_nan() || pi_width.is_nan() || pi_width.is_infinite() {
            return Err(fit_failure(
                "prediction interval computation produced invalid values",
            ));
        }

        points.push(back(y_hat));
        lower_bounds.push(back(y_hat - pi_width));
        upper_bounds.push(back(y_hat + pi_width));
    }

    Ok(ModelForecast {
        points,
        lower_bounds,
        upper_bounds,
    })
}
