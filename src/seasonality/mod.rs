//! Quarterly-cycle detection used to choose between the seasonal and
//! non-seasonal ETS models.

use augurs_seasons::PeriodogramDetector;

/// The one seasonal period quarterly data can carry: 4 quarters per year.
pub const QUARTERLY_PERIOD: u32 = 4;

/// Minimum points to observe two full annual cycles.
pub const MIN_SEASONALITY_POINTS: usize = 8;

/// Minimum spectral power (as fraction of max) to treat the annual period
/// as a candidate worth validating.
const PERIODOGRAM_POWER_THRESHOLD: f64 = 0.01;

/// Minimum autocorrelation strength to call the cycle real.
const MIN_CYCLE_STRENGTH: f64 = 0.3;

/// Strength of the annual cycle in a quarterly series, 0.0 to 1.0.
///
/// Two-stage: the periodogram must flag period 4 as a frequency-domain
/// candidate, then autocorrelation at lag 4 provides the interpretable
/// strength measure. Returns 0.0 for short or constant series.
pub fn quarterly_strength(values: &[f64]) -> f64 {
    if values.len() < MIN_SEASONALITY_POINTS {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    if variance < 1e-10 {
        return 0.0;
    }

    let max_period = (values.len() / 2) as u32;
    let detector = PeriodogramDetector::builder()
        .min_period(2)
        .max_period(max_period)
        .build();
    let periodogram = detector.periodogram(values);

    let max_power = periodogram
        .powers
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    if max_power <= 0.0 || !max_power.is_finite() {
        return 0.0;
    }

    let annual_is_candidate = periodogram
        .periods
        .iter()
        .zip(periodogram.powers.iter())
        .any(|(&period, &power)| {
            period == QUARTERLY_PERIOD && power > max_power * PERIODOGRAM_POWER_THRESHOLD
        });
    if !annual_is_candidate {
        return 0.0;
    }

    autocorrelation_at_lag(values, QUARTERLY_PERIOD as usize, mean, variance).clamp(0.0, 1.0)
}

/// Whether the series carries an annual cycle strong enough to justify the
/// seasonal ETS model.
pub fn has_quarterly_cycle(values: &[f64]) -> bool {
    quarterly_strength(values) > MIN_CYCLE_STRENGTH
}

/// Autocorrelation of the series at a specific lag: close to 1.0 means the
/// series strongly repeats at that lag.
fn autocorrelation_at_lag(values: &[f64], lag: usize, mean: f64, variance: f64) -> f64 {
    if lag >= values.len() || variance < 1e-10 {
        return 0.0;
    }

    let valid_pairs = (values.len() - lag) as f64;
    let covariance: f64 = values[..values.len() - lag]
        .iter()
        .zip(values[lag..].iter())
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum::<f64>()
        / valid_pairs;

    covariance / variance
}
