//! Spending analytics over plain expense/income values.
//!
//! Everything here is pure: callers fetch records, map them into
//! [`SpendingEntry`] values and get back freshly computed summaries. Nothing is
//! cached between calls, so the same input always yields the same output.
//!
//! Pipeline: [`aggregate`] groups by category and runs the [`trend`]
//! estimator per group, [`insights`] applies threshold rules to the result,
//! and [`report`] ties the two together.

pub mod aggregate;
pub mod insights;
pub mod monthly;
pub mod normalize;
pub mod recurring;
pub mod report;
pub mod trend;

use chrono::NaiveDate;
use serde::Serialize;

pub use aggregate::{CategorySummary, TimeOfMonth, aggregate_by_category};
pub use insights::{Insight, InsightKind, generate_insights};
pub use monthly::{MonthTotal, monthly_totals, percent_change};
pub use normalize::{Frequency, monthly_equivalent, monthly_total};
pub use recurring::{ExpenseKey, RecurringExpense, detect_recurring};
pub use report::{SpendingReport, build_spending_report};
pub use trend::{TrendEstimate, estimate_trend};

/// Label used when an expense has no resolvable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One expense as the analytics see it: dollars, a date, and an optional
/// resolved category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingEntry {
    pub name: String,
    pub category: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
}

impl SpendingEntry {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// Thresholds for the heuristics. These are fixed rules of thumb, not
/// statistical guarantees.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub window_days: u32,
    /// A category above this share of total spend gets a warning.
    pub high_share_percent: f64,
    pub rising_trend_percent: f64,
    pub falling_trend_percent: f64,
    /// Coefficient of variation below which a series counts as recurring.
    pub recurring_cv_threshold: f64,
    pub recurring_min_observations: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            high_share_percent: 30.0,
            rising_trend_percent: 50.0,
            falling_trend_percent: -20.0,
            recurring_cv_threshold: 0.3,
            recurring_min_observations: 3,
        }
    }
}

impl AnalyticsConfig {
    pub fn with_window_days(window_days: u32) -> Self {
        Self {
            window_days: window_days.max(1),
            ..Self::default()
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.window_days, 90);
        assert_eq!(cfg.high_share_percent, 30.0);
        assert_eq!(cfg.recurring_cv_threshold, 0.3);
        assert_eq!(cfg.recurring_min_observations, 3);
    }

    #[test]
    fn test_window_days_never_zero() {
        assert_eq!(AnalyticsConfig::with_window_days(0).window_days, 1);
        assert_eq!(AnalyticsConfig::with_window_days(30).window_days, 30);
    }

    #[test]
    fn test_missing_category_label() {
        let e = test_support::entry("Coffee", None, 3.0, (2026, 1, 1));
        assert_eq!(e.category_label(), UNCATEGORIZED);
    }
}
