//! Calendar-month spending totals with month-over-month change.

use crate::SpendingEntry;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
    /// Change against the previous month in the list; 0 for the first.
    pub change_percent: f64,
}

/// Relative change from `previous` to `current`, 0 when there is no baseline.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Buckets entries by calendar month, oldest first. Months with no entries
/// are not emitted.
pub fn monthly_totals(entries: &[SpendingEntry]) -> Vec<MonthTotal> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for entry in entries {
        *buckets.entry((entry.date.year(), entry.date.month())).or_insert(0.0) += entry.amount;
    }

    let mut previous: Option<f64> = None;
    buckets
        .into_iter()
        .map(|((year, month), total)| {
            let change_percent = previous.map(|p| percent_change(p, total)).unwrap_or(0.0);
            previous = Some(total);
            MonthTotal {
                month: format!("{:04}-{:02}", year, month),
                total,
                change_percent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::entry;

    #[test]
    fn test_buckets_and_orders_months() {
        let entries = vec![
            entry("x", None, 30.0, (2026, 3, 2)),
            entry("x", None, 100.0, (2026, 1, 31)),
            entry("x", None, 50.0, (2026, 1, 1)),
            entry("x", None, 75.0, (2026, 3, 28)),
        ];
        let totals = monthly_totals(&entries);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].month, "2026-01");
        assert_eq!(totals[0].total, 150.0);
        assert_eq!(totals[0].change_percent, 0.0);
        assert_eq!(totals[1].month, "2026-03");
        assert_eq!(totals[1].total, 105.0);
        assert!((totals[1].change_percent + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_year_boundary_sorts_chronologically() {
        let entries = vec![
            entry("x", None, 10.0, (2026, 1, 5)),
            entry("x", None, 10.0, (2025, 12, 5)),
        ];
        let months: Vec<String> = monthly_totals(&entries).into_iter().map(|m| m.month).collect();
        assert_eq!(months, vec!["2025-12", "2026-01"]);
    }

    #[test]
    fn test_percent_change_without_baseline() {
        assert_eq!(percent_change(0.0, 500.0), 0.0);
        assert_eq!(percent_change(200.0, 300.0), 50.0);
    }
}
