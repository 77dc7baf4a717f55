use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};

use crate::common::error::CoreError;
use crate::common::types::TimeSeries;

/// Quarters per year; the only periodicity this crate supports.
pub const QUARTERS_PER_YEAR: usize = 4;

/// Parse a `YYYY-Qn` period label into the first calendar day of its quarter:
/// Q1 -> Jan 1, Q2 -> Apr 1, Q3 -> Jul 1, Q4 -> Oct 1.
///
/// Anything outside the grammar (missing hyphen, non-4-digit year, quarter
/// outside 1-4) fails with `MalformedPeriodLabel` carrying the offending
/// label. There is no best-effort fallback.
pub fn parse_period_label(label: &str) -> Result<NaiveDate, CoreError> {
    let malformed = || CoreError::MalformedPeriodLabel(label.to_string());

    let (year_part, quarter_part) = label.split_once("-Q").ok_or_else(malformed)?;
    if year_part.len() != 4 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let year: i32 = year_part.parse().map_err(|_| malformed())?;

    let quarter: u32 = quarter_part.parse().map_err(|_| malformed())?;
    if !(1..=4).contains(&quarter) {
        return Err(malformed());
    }

    let month = (quarter - 1) * 3 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(malformed)
}

/// The quarter start immediately following `date`.
pub fn next_quarter(date: NaiveDate) -> NaiveDate {
    date + Months::new(3)
}

/// Normalize labeled values into a sorted time series.
///
/// Every label must parse (the first malformed one aborts the whole
/// aggregation). Values from different source rows that normalize to the
/// same date are averaged; a date with no contributing values simply never
/// appears. Output is sorted ascending by date.
pub fn aggregate<'a, I>(labeled: I) -> Result<TimeSeries, CoreError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    // BTreeMap keys give the ascending date order for free.
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for (label, value) in labeled {
        let date = parse_period_label(label)?;
        let entry = buckets.entry(date).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let mut dates = Vec::with_capacity(buckets.len());
    let mut values = Vec::with_capacity(buckets.len());
    for (date, (sum, count)) in buckets {
        dates.push(date);
        values.push(sum / count as f64);
    }

    Ok(TimeSeries { dates, values })
}
