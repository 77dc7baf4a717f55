//! Working-capital mix allocation: splits a capital amount across the four
//! standard buckets and renders the recommendation text.

use serde::Serialize;

use crate::common::error::CoreError;

/// A requested capital split, percentages per bucket.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRequest {
    pub country: String,
    /// Working capital in millions of USD.
    pub capital_musd: f64,
    pub cash_pct: u32,
    pub inventory_pct: u32,
    pub receivables_pct: u32,
    pub payables_pct: u32,
}

/// Allocated amounts per bucket, in millions of USD, rounded to cents.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationBreakdown {
    pub country: String,
    pub capital_musd: f64,
    pub cash: f64,
    pub inventory: f64,
    pub receivables: f64,
    pub payables: f64,
}

/// Split the capital across buckets. The four percentages must sum to
/// exactly 100; anything else is `InvalidAllocation`.
pub fn allocate(request: &AllocationRequest) -> Result<AllocationBreakdown, CoreError> {
    let total = request.cash_pct + request.inventory_pct + request.receivables_pct
        + request.payables_pct;
    if total != 100 {
        return Err(CoreError::InvalidAllocation {
            total: total as i64,
        });
    }

    let bucket = |pct: u32| round2(request.capital_musd * pct as f64 / 100.0);

    Ok(AllocationBreakdown {
        country: request.country.clone(),
        capital_musd: request.capital_musd,
        cash: bucket(request.cash_pct),
        inventory: bucket(request.inventory_pct),
        receivables: bucket(request.receivables_pct),
        payables: bucket(request.payables_pct),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl AllocationBreakdown {
    /// The multi-line recommendation text shown next to the breakdown.
    pub fn summary(&self) -> String {
        format!(
            "For {} with working capital {:.1}M USD:\n\
             - Cash: {:.2}M\n\
             - Inventory: {:.2}M\n\
             - Receivables: {:.2}M\n\
             - Payables: {:.2}M\n\
             \n\
             Recommendations:\n\
             - Ensure cash buffer is sufficient for short-term obligations.\n\
             - Optimize inventory to reduce holding costs while avoiding stockouts.\n\
             - Monitor receivables to improve cash flow.\n\
             - Consider negotiating payables terms to maintain liquidity.",
            self.country, self.capital_musd, self.cash, self.inventory, self.receivables,
            self.payables
        )
    }
}
