//! Trend summarization and quarterly forecasting core for wide-format
//! economic indicator tables.
//!
//! The pipeline: a read-only [`IndicatorTable`] (one row per
//! country/indicator/adjustment/unit, one column per `YYYY-Qn` quarter) is
//! reshaped by [`extract`] into ordered time series, normalized to calendar
//! dates by [`common::period`], and consumed by [`trend`] (endpoint-rule
//! summaries) and [`forecast`] (ETS/regression horizon extension). The
//! [`query`] router dispatches free-text "summarize ..." questions into the
//! same pipeline.
//!
//! Dataset loading and chart rendering live outside this crate; everything
//! here returns plain data and strings.

pub mod allocation;
pub mod common;
pub mod extract;
pub mod forecast;
pub mod query;
pub mod seasonality;
pub mod trend;

pub use common::error::CoreError;
pub use common::types::{
    ForecastOutcome, IndicatorRow, IndicatorTable, Scale, TimeSeries, TrendDirection,
    TrendStatement,
};
pub use forecast::{forecast, forecast_indicator, ForecastModel};
pub use query::{route, SessionLog};
pub use trend::{summarize, summary_text};
