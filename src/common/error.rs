use thiserror::Error;

/// Error taxonomy for the core pipeline.
///
/// Display strings double as the user-facing explanations: data-shape errors
/// (`NoMatchingData`, `AllValuesMissing`, `MalformedPeriodLabel`,
/// `InsufficientHistory`) are recovered at component boundaries and rendered
/// as plain text, never shown as raw internal faults. `ForecastFitFailure`
/// is the one condition that surfaces as a hard failure to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested (country, indicator) pair has zero rows.
    #[error("No data available for {indicator} in {country}.")]
    NoMatchingData { country: String, indicator: String },

    /// Matching row(s) exist but every quarter value is absent.
    #[error("All values are missing for {indicator} in {country}.")]
    AllValuesMissing { country: String, indicator: String },

    /// A period column fails the `YYYY-Qn` grammar. Always propagated,
    /// never silently passed through as a pseudo-date.
    #[error("malformed period label '{0}': expected YYYY-Qn with quarter 1-4")]
    MalformedPeriodLabel(String),

    /// Fewer than 2 usable points: a trend model cannot be fit.
    #[error("need at least 2 observed points to fit a forecast, got {got}")]
    InsufficientHistory { got: usize },

    /// A forecast was requested for zero future quarters.
    #[error("forecast horizon must be at least 1 quarter")]
    InvalidHorizon,

    /// The forecasting model failed to converge or hit a numerical error.
    #[error("forecast model failed: {0}")]
    ForecastFitFailure(String),

    /// Capital-mix percentages do not sum to 100.
    #[error("allocation percentages must sum to 100, got {total}")]
    InvalidAllocation { total: i64 },
}
