//! Period reports
//!
//! Deterministic filtering and summation of ledger records by calendar
//! period. Reports are derived values: recomputed per request, never stored.

pub mod render;

use crate::error::AssistantError;
use crate::models::{FinanceRecord, Timestamp};
use crate::Result;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

//
// ================= Period selection =================
//

/// Report granularity as named by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Day,
    Month,
    Quarter,
    Year,
}

impl ReportKind {
    /// Parse the classifier's `report_type` code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "ngay" => Some(Self::Day),
            "thang" => Some(Self::Month),
            "quy" => Some(Self::Quarter),
            "nam" => Some(Self::Year),
            _ => None,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportKind::Day => "day",
            ReportKind::Month => "month",
            ReportKind::Quarter => "quarter",
            ReportKind::Year => "year",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportPeriod {
    Day { date: NaiveDate },
    Month { month: u32, year: i32 },
    Quarter { quarter: u32, year: i32 },
    Year { year: i32 },
}

impl ReportPeriod {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportPeriod::Day { .. } => ReportKind::Day,
            ReportPeriod::Month { .. } => ReportKind::Month,
            ReportPeriod::Quarter { .. } => ReportKind::Quarter,
            ReportPeriod::Year { .. } => ReportKind::Year,
        }
    }

    /// Reject months outside 1..=12 and quarters outside 1..=4
    pub fn validate(&self) -> Result<()> {
        match *self {
            ReportPeriod::Month { month, .. } if !(1..=12).contains(&month) => Err(
                AssistantError::InvalidPeriod(format!("month must be 1-12, got {}", month)),
            ),
            ReportPeriod::Quarter { quarter, .. } if !(1..=4).contains(&quarter) => Err(
                AssistantError::InvalidPeriod(format!("quarter must be 1-4, got {}", quarter)),
            ),
            _ => Ok(()),
        }
    }

    /// First and last month of a quarter, inclusive. `None` outside 1..=4.
    pub fn quarter_months(quarter: u32) -> Option<(u32, u32)> {
        (1..=4)
            .contains(&quarter)
            .then(|| ((quarter - 1) * 3 + 1, quarter * 3))
    }

    /// Quarter containing the given month. Out-of-range months are clamped to 1..=12.
    pub fn quarter_of(month: u32) -> u32 {
        (month.clamp(1, 12) - 1) / 3 + 1
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        match *self {
            ReportPeriod::Day { date } => ts.date() == date,
            ReportPeriod::Month { month, year } => ts.month() == month && ts.year() == year,
            ReportPeriod::Quarter { quarter, year } => match Self::quarter_months(quarter) {
                Some((start, end)) => (start..=end).contains(&ts.month()) && ts.year() == year,
                None => false,
            },
            ReportPeriod::Year { year } => ts.year() == year,
        }
    }
}

//
// ================= Report values =================
//

/// Partial totals for one sub-period
///
/// Sums are widened to 128 bits so any number of `u64` amounts adds up exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub revenue: u128,
    pub cost: u128,
    pub transaction_count: usize,
}

impl PeriodTotals {
    fn add(&mut self, record: &FinanceRecord) {
        self.revenue = self.revenue.saturating_add(u128::from(record.revenue));
        self.cost = self.cost.saturating_add(u128::from(record.cost));
        self.transaction_count += 1;
    }

    pub fn profit(&self) -> i128 {
        signed_difference(self.revenue, self.cost)
    }
}

fn signed_difference(revenue: u128, cost: u128) -> i128 {
    if revenue >= cost {
        i128::try_from(revenue - cost).unwrap_or(i128::MAX)
    } else {
        i128::try_from(cost - revenue).map_or(i128::MIN, |d| -d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub total_revenue: u128,
    pub total_cost: u128,
    pub total_profit: i128,
    pub transaction_count: usize,
    /// Per-month totals, only for year reports. Keys are ascending month numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_period_breakdown: Option<BTreeMap<u32, PeriodTotals>>,
}

impl PeriodReport {
    /// Profit as a percentage of revenue. `None` when there is no revenue.
    pub fn profit_margin(&self) -> Option<f64> {
        if self.total_revenue == 0 {
            return None;
        }
        Some(self.total_profit as f64 / self.total_revenue as f64 * 100.0)
    }

    /// Margin rendered with two decimals, e.g. `"41.67%"`
    pub fn margin_display(&self) -> Option<String> {
        self.profit_margin().map(|m| format!("{:.2}%", m))
    }
}

//
// ================= Aggregation =================
//

pub struct ReportAggregator;

impl ReportAggregator {
    pub fn by_day(records: &[FinanceRecord], date: NaiveDate) -> PeriodReport {
        Self::aggregate(records, ReportPeriod::Day { date })
    }

    pub fn by_month(records: &[FinanceRecord], month: u32, year: i32) -> Result<PeriodReport> {
        Self::generate(records, ReportPeriod::Month { month, year })
    }

    pub fn by_quarter(records: &[FinanceRecord], quarter: u32, year: i32) -> Result<PeriodReport> {
        Self::generate(records, ReportPeriod::Quarter { quarter, year })
    }

    pub fn by_year(records: &[FinanceRecord], year: i32) -> PeriodReport {
        Self::aggregate(records, ReportPeriod::Year { year })
    }

    /// Validate the period, then aggregate
    pub fn generate(records: &[FinanceRecord], period: ReportPeriod) -> Result<PeriodReport> {
        period.validate()?;
        Ok(Self::aggregate(records, period))
    }

    fn aggregate(records: &[FinanceRecord], period: ReportPeriod) -> PeriodReport {
        let mut totals = PeriodTotals::default();
        let mut breakdown: Option<BTreeMap<u32, PeriodTotals>> =
            matches!(period, ReportPeriod::Year { .. }).then(BTreeMap::new);

        for record in records.iter().filter(|r| period.contains(&r.created_at)) {
            totals.add(record);
            if let Some(months) = breakdown.as_mut() {
                months
                    .entry(record.created_at.month())
                    .or_default()
                    .add(record);
            }
        }

        debug!(
            kind = %period.kind(),
            matched = totals.transaction_count,
            scanned = records.len(),
            "Report aggregated"
        );

        PeriodReport {
            period,
            total_revenue: totals.revenue,
            total_cost: totals.cost,
            total_profit: totals.profit(),
            transaction_count: totals.transaction_count,
            sub_period_breakdown: breakdown,
        }
    }
}
