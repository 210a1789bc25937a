use crate::aggregate::{CategorySummary, aggregate_by_category};
use crate::insights::{Insight, daily_average, generate_insights};
use crate::{AnalyticsConfig, SpendingEntry};
use serde::Serialize;

/// Everything the spending view shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingReport {
    pub window_days: u32,
    pub grand_total: f64,
    pub daily_average: f64,
    pub categories: Vec<CategorySummary>,
    pub insights: Vec<Insight>,
}

#[tracing::instrument(skip(entries, cfg), fields(entries = entries.len()))]
pub fn build_spending_report(entries: &[SpendingEntry], cfg: &AnalyticsConfig) -> SpendingReport {
    let grand_total: f64 = entries.iter().map(|e| e.amount).sum();
    let categories = aggregate_by_category(entries, cfg);
    let insights = generate_insights(&categories, grand_total, cfg);

    tracing::debug!(categories = categories.len(), insights = insights.len(), "Built spending report");

    SpendingReport {
        window_days: cfg.window_days,
        grand_total,
        daily_average: daily_average(grand_total, cfg),
        categories,
        insights,
    }
}
