//! Human-readable report rendering
//!
//! Column order for tables: period, revenue, cost, profit, transaction count.
//! Amounts use thousands separators.

use super::{PeriodReport, ReportPeriod};
use num_format::{Locale, ToFormattedString};
use std::fmt;

pub const CURRENCY: &str = "VND";

/// Integer with thousands separators, e.g. `1,250,000`
pub fn thousands<N: ToFormattedString>(value: N) -> String {
    value.to_formatted_string(&Locale::en)
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ReportPeriod::Day { date } => write!(f, "DAY {}", date.format("%d/%m/%Y")),
            ReportPeriod::Month { month, year } => write!(f, "MONTH {}/{}", month, year),
            ReportPeriod::Quarter { quarter, year } => {
                write!(f, "QUARTER {}/{}", quarter, year)?;
                match ReportPeriod::quarter_months(quarter) {
                    Some((start, end)) => write!(f, " (months {}-{})", start, end),
                    None => Ok(()),
                }
            }
            ReportPeriod::Year { year } => write!(f, "YEAR {}", year),
        }
    }
}

impl fmt::Display for PeriodReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== REPORT {} ===", self.period)?;
        writeln!(f, "Total revenue: {} {}", thousands(self.total_revenue), CURRENCY)?;
        writeln!(f, "Total cost:    {} {}", thousands(self.total_cost), CURRENCY)?;
        writeln!(f, "Profit:        {} {}", thousands(self.total_profit), CURRENCY)?;
        writeln!(f, "Transactions:  {}", self.transaction_count)?;
        if let Some(margin) = self.margin_display() {
            writeln!(f, "Profit margin: {}", margin)?;
        }

        if let Some(months) = &self.sub_period_breakdown {
            writeln!(f)?;
            writeln!(f, "Monthly breakdown:")?;
            writeln!(
                f,
                "{:<8} {:<15} {:<15} {:<15} {:<10}",
                "Month", "Revenue", "Cost", "Profit", "Txns"
            )?;
            writeln!(f, "{}", "-".repeat(70))?;
            for (month, totals) in months {
                writeln!(
                    f,
                    "{:<8} {:<15} {:<15} {:<15} {:<10}",
                    month,
                    thousands(totals.revenue),
                    thousands(totals.cost),
                    thousands(totals.profit()),
                    totals.transaction_count
                )?;
            }
        }

        write!(f, "{}", "=".repeat(40))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FinanceRecord, RecordId};
    use crate::report::ReportAggregator;
    use chrono::NaiveDate;

    fn record(m: u32, d: u32, revenue: u64, cost: u64) -> FinanceRecord {
        FinanceRecord {
            id: RecordId(1),
            revenue,
            cost,
            note: None,
            created_at: NaiveDate::from_ymd_opt(2025, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_250_000), "1,250,000");
        assert_eq!(thousands(-350_000), "-350,000");
    }

    #[test]
    fn test_thousands_is_exact_beyond_float_precision() {
        assert_eq!(thousands(9_007_199_254_740_993_i64), "9,007,199,254,740,993");
        assert_eq!(thousands(i64::MIN), "-9,223,372,036,854,775,808");
        assert_eq!(thousands(u64::MAX), "18,446,744,073,709,551,615");
        assert_eq!(thousands(-2 * i128::from(u64::MAX)), "-36,893,488,147,419,103,230");
    }

    #[test]
    fn test_extreme_totals_render_exactly() {
        let records = vec![record(3, 1, 9_007_199_254_740_993, 0), record(3, 2, 9_007_199_254_740_993, 1)];
        let text = ReportAggregator::by_month(&records, 3, 2025).unwrap().to_string();

        assert!(text.contains("Total revenue: 18,014,398,509,481,986 VND"));
        assert!(text.contains("Total cost:    1 VND"));
        assert!(text.contains("Profit:        18,014,398,509,481,985 VND"));
    }

    #[test]
    fn test_month_report_text() {
        let records = vec![record(7, 10, 500_000, 300_000), record(7, 20, 100_000, 50_000)];
        let text = ReportAggregator::by_month(&records, 7, 2025).unwrap().to_string();

        assert!(text.starts_with("=== REPORT MONTH 7/2025 ==="));
        assert!(text.contains("Total revenue: 600,000 VND"));
        assert!(text.contains("Profit:        250,000 VND"));
        assert!(text.contains("Transactions:  2"));
        assert!(text.contains("Profit margin: 41.67%"));
        assert!(!text.contains("Monthly breakdown"));
    }

    #[test]
    fn test_empty_report_omits_margin() {
        let text = ReportAggregator::by_quarter(&[], 2, 2025).unwrap().to_string();
        assert!(text.contains("QUARTER 2/2025 (months 4-6)"));
        assert!(!text.contains("margin"));
    }

    #[test]
    fn test_year_table_columns_in_order() {
        let records = vec![
            record(8, 2, 200_000, 100_000),
            record(7, 10, 500_000, 300_000),
            record(7, 20, 100_000, 50_000),
        ];
        let text = ReportAggregator::by_year(&records, 2025).to_string();

        let header = text.lines().find(|l| l.starts_with("Month ")).unwrap();
        let cols: Vec<&str> = header.split_whitespace().collect();
        assert_eq!(cols, vec!["Month", "Revenue", "Cost", "Profit", "Txns"]);

        let rows: Vec<Vec<&str>> = text
            .lines()
            .filter(|l| l.starts_with('7') || l.starts_with('8'))
            .map(|l| l.split_whitespace().collect())
            .collect();
        assert_eq!(rows[0], vec!["7", "600,000", "350,000", "250,000", "2"]);
        assert_eq!(rows[1], vec!["8", "200,000", "100,000", "100,000", "1"]);
    }
}
