//! Threshold rules that turn category summaries into readable observations.

use crate::AnalyticsConfig;
use crate::aggregate::CategorySummary;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The number the rule fired on (share, trend or daily average).
    pub value: f64,
}

impl Insight {
    fn high_spending(summary: &CategorySummary) -> Self {
        Self {
            kind: InsightKind::Warning,
            title: "High spending".to_string(),
            message: format!(
                "{} accounts for {:.1}% of your spending",
                summary.category, summary.share_percent
            ),
            category: Some(summary.category.clone()),
            value: summary.share_percent,
        }
    }

    fn increasing(summary: &CategorySummary) -> Self {
        Self {
            kind: InsightKind::Warning,
            title: "Increasing spending".to_string(),
            message: format!(
                "{} spending is up {:.0}% compared to earlier in the period",
                summary.category, summary.trend.trend_percent
            ),
            category: Some(summary.category.clone()),
            value: summary.trend.trend_percent,
        }
    }

    fn reduced(summary: &CategorySummary) -> Self {
        Self {
            kind: InsightKind::Success,
            title: "Reduced spending".to_string(),
            message: format!(
                "{} spending is down {:.0}% compared to earlier in the period",
                summary.category,
                summary.trend.trend_percent.abs()
            ),
            category: Some(summary.category.clone()),
            value: summary.trend.trend_percent,
        }
    }

    fn daily_average(average: f64, window_days: u32) -> Self {
        Self {
            kind: InsightKind::Info,
            title: "Daily average".to_string(),
            message: format!("You spend about ${:.2} per day over the last {} days", average, window_days),
            category: None,
            value: average,
        }
    }
}

/// Grand total spread evenly over the window, including days with no spend.
pub fn daily_average(grand_total: f64, cfg: &AnalyticsConfig) -> f64 {
    grand_total / cfg.window_days.max(1) as f64
}

/// Applies the rules to each summary in order. The daily-average insight is
/// always first; everything after it follows the order of `summaries`.
pub fn generate_insights(summaries: &[CategorySummary], grand_total: f64, cfg: &AnalyticsConfig) -> Vec<Insight> {
    let mut insights = vec![Insight::daily_average(daily_average(grand_total, cfg), cfg.window_days)];

    for summary in summaries {
        if summary.share_percent > cfg.high_share_percent {
            insights.push(Insight::high_spending(summary));
        }

        let trend = summary.trend.trend_percent;
        if trend > cfg.rising_trend_percent {
            insights.push(Insight::increasing(summary));
        } else if trend < cfg.falling_trend_percent {
            insights.push(Insight::reduced(summary));
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_by_category;
    use crate::test_support::entry;

    fn run(entries: &[crate::SpendingEntry]) -> Vec<Insight> {
        let cfg = AnalyticsConfig::default();
        let summaries = aggregate_by_category(entries, &cfg);
        let total: f64 = entries.iter().map(|e| e.amount).sum();
        generate_insights(&summaries, total, &cfg)
    }

    #[test]
    fn test_scenario_warns_on_groceries_share() {
        let insights = run(&[
            entry("Shop", Some("Groceries"), 100.0, (2026, 3, 1)),
            entry("Shop", Some("Groceries"), 120.0, (2026, 3, 15)),
            entry("Fuel", Some("Gas"), 50.0, (2026, 3, 5)),
        ]);

        assert_eq!(insights[0].kind, InsightKind::Info);
        assert_eq!(insights[0].title, "Daily average");
        assert!((insights[0].value - 3.0).abs() < 1e-9);

        let high: Vec<&Insight> = insights.iter().filter(|i| i.title == "High spending").collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].category.as_deref(), Some("Groceries"));
        assert!((high[0].value - 220.0 / 270.0 * 100.0).abs() < 1e-9);
        assert!(high[0].message.contains("81.5%"));
    }

    #[test]
    fn test_empty_input_only_has_daily_average() {
        let insights = run(&[]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].value, 0.0);
    }

    #[test]
    fn test_rising_trend_warns() {
        // Only category, so it also trips the share rule
        let insights = run(&[
            entry("Dinner", Some("Dining"), 20.0, (2026, 1, 2)),
            entry("Dinner", Some("Dining"), 20.0, (2026, 1, 9)),
            entry("Dinner", Some("Dining"), 60.0, (2026, 2, 2)),
            entry("Dinner", Some("Dining"), 60.0, (2026, 2, 9)),
        ]);
        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Daily average", "High spending", "Increasing spending"]);
        assert_eq!(insights[2].kind, InsightKind::Warning);
        assert!((insights[2].value - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_falling_trend_is_success() {
        let insights = run(&[
            entry("Taxi", Some("Transport"), 100.0, (2026, 1, 2)),
            entry("Taxi", Some("Transport"), 50.0, (2026, 2, 2)),
        ]);
        let reduced = insights.iter().find(|i| i.title == "Reduced spending").unwrap();
        assert_eq!(reduced.kind, InsightKind::Success);
        assert!((reduced.value + 50.0).abs() < 1e-9);
        assert!(reduced.message.contains("down 50%"));
    }

    #[test]
    fn test_moderate_trend_is_silent() {
        let insights = run(&[
            entry("Bus", Some("Transport"), 100.0, (2026, 1, 2)),
            entry("Bus", Some("Transport"), 110.0, (2026, 2, 2)),
        ]);
        assert!(!insights.iter().any(|i| i.title == "Increasing spending" || i.title == "Reduced spending"));
    }

    #[test]
    fn test_daily_average_uses_window() {
        let cfg = AnalyticsConfig::with_window_days(30);
        assert!((daily_average(300.0, &cfg) - 10.0).abs() < 1e-9);
    }
}
