//! Per-category spending summaries.

use crate::trend::{TrendEstimate, estimate_trend};
use crate::{AnalyticsConfig, SpendingEntry};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfMonth {
    /// Day 1 through 10
    Early,
    /// Day 11 through 20
    Mid,
    /// After the 20th
    Late,
    /// No single bucket dominates
    Consistent,
}

impl TimeOfMonth {
    /// The bucket with strictly the most hits wins; any tie at the top is
    /// `Consistent`.
    pub fn classify<I>(days: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let (mut early, mut mid, mut late) = (0_usize, 0_usize, 0_usize);
        for day in days {
            match day {
                0..=10 => early += 1,
                11..=20 => mid += 1,
                _ => late += 1,
            }
        }

        if early > mid && early > late {
            TimeOfMonth::Early
        } else if mid > early && mid > late {
            TimeOfMonth::Mid
        } else if late > early && late > mid {
            TimeOfMonth::Late
        } else {
            TimeOfMonth::Consistent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: f64,
    pub average: f64,
    pub count: usize,
    /// Transactions per weekday, index 0 is Sunday.
    pub day_of_week: [u32; 7],
    pub time_of_month: TimeOfMonth,
    pub share_percent: f64,
    pub trend: TrendEstimate,
}

struct Group<'a> {
    category: &'a str,
    entries: Vec<&'a SpendingEntry>,
}

/// Groups entries by resolved category name and summarises each group,
/// largest total first. Categories with equal totals keep first-seen order.
pub fn aggregate_by_category(entries: &[SpendingEntry], cfg: &AnalyticsConfig) -> Vec<CategorySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for entry in entries {
        let label = entry.category_label();
        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(Group { category: label, entries: Vec::new() });
            groups.len() - 1
        });
        groups[slot].entries.push(entry);
    }

    let grand_total: f64 = entries.iter().map(|e| e.amount).sum();

    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|mut group| {
            // Trend needs chronological order; the sort is stable so same-day
            // entries keep input order.
            group.entries.sort_by_key(|e| e.date);

            let amounts: Vec<f64> = group.entries.iter().map(|e| e.amount).collect();
            let total: f64 = amounts.iter().sum();
            let count = amounts.len();

            let mut day_of_week = [0_u32; 7];
            for e in &group.entries {
                day_of_week[e.date.weekday().num_days_from_sunday() as usize] += 1;
            }

            CategorySummary {
                category: group.category.to_string(),
                total,
                average: total / count as f64,
                count,
                day_of_week,
                time_of_month: TimeOfMonth::classify(group.entries.iter().map(|e| e.date.day())),
                share_percent: if grand_total > 0.0 { total / grand_total * 100.0 } else { 0.0 },
                trend: estimate_trend(&amounts, cfg),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total.total_cmp(&a.total));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::entry;

    fn scenario() -> Vec<SpendingEntry> {
        vec![
            entry("Weekly shop", Some("Groceries"), 100.0, (2026, 3, 1)),
            entry("Fill up", Some("Gas"), 50.0, (2026, 3, 5)),
            entry("Weekly shop", Some("Groceries"), 120.0, (2026, 3, 15)),
        ]
    }

    #[test]
    fn test_scenario_totals() {
        let summaries = aggregate_by_category(&scenario(), &AnalyticsConfig::default());
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].category, "Groceries");
        assert_eq!(summaries[0].total, 220.0);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].average, 110.0);

        assert_eq!(summaries[1].category, "Gas");
        assert_eq!(summaries[1].total, 50.0);
    }

    #[test]
    fn test_group_totals_sum_to_input_total() {
        let entries = vec![
            entry("a", Some("A"), 12.34, (2026, 1, 3)),
            entry("b", Some("B"), 0.66, (2026, 1, 4)),
            entry("c", None, 99.99, (2026, 1, 5)),
            entry("d", Some("A"), 7.01, (2026, 1, 6)),
            entry("e", Some("C"), 1000.0, (2026, 1, 7)),
            entry("f", None, 0.01, (2026, 1, 8)),
        ];
        let input_total: f64 = entries.iter().map(|e| e.amount).sum();
        let summaries = aggregate_by_category(&entries, &AnalyticsConfig::default());
        let group_total: f64 = summaries.iter().map(|s| s.total).sum();
        assert!((input_total - group_total).abs() < 1e-9);

        let share_total: f64 = summaries.iter().map(|s| s.share_percent).sum();
        assert!((share_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_category_groups_as_uncategorized() {
        let entries = vec![
            entry("Mystery", None, 5.0, (2026, 1, 1)),
            entry("Other mystery", None, 6.0, (2026, 1, 2)),
        ];
        let summaries = aggregate_by_category(&entries, &AnalyticsConfig::default());
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].category, crate::UNCATEGORIZED);
        assert_eq!(summaries[0].count, 2);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(aggregate_by_category(&[], &AnalyticsConfig::default()).is_empty());
    }

    #[test]
    fn test_day_of_week_histogram_starts_on_sunday() {
        // 2026-03-01 is a Sunday, 2026-03-07 a Saturday
        let entries = vec![
            entry("x", Some("A"), 1.0, (2026, 3, 1)),
            entry("x", Some("A"), 1.0, (2026, 3, 8)),
            entry("x", Some("A"), 1.0, (2026, 3, 7)),
        ];
        let summaries = aggregate_by_category(&entries, &AnalyticsConfig::default());
        assert_eq!(summaries[0].day_of_week, [2, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_trend_uses_chronological_order() {
        // Input is out of order; chronologically it goes 100 then 200.
        let entries = vec![
            entry("x", Some("A"), 200.0, (2026, 3, 20)),
            entry("x", Some("A"), 100.0, (2026, 3, 1)),
        ];
        let summaries = aggregate_by_category(&entries, &AnalyticsConfig::default());
        assert_eq!(summaries[0].trend.trend_percent, 100.0);
    }

    #[test]
    fn test_equal_totals_keep_first_seen_order() {
        let entries = vec![
            entry("x", Some("Zeta"), 10.0, (2026, 3, 1)),
            entry("x", Some("Alpha"), 10.0, (2026, 3, 2)),
        ];
        let names: Vec<String> = aggregate_by_category(&entries, &AnalyticsConfig::default())
            .into_iter()
            .map(|s| s.category)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_time_of_month_classification() {
        assert_eq!(TimeOfMonth::classify([1, 5, 25]), TimeOfMonth::Early);
        assert_eq!(TimeOfMonth::classify([11, 20, 3]), TimeOfMonth::Mid);
        assert_eq!(TimeOfMonth::classify([21, 31]), TimeOfMonth::Late);
        assert_eq!(TimeOfMonth::classify([10, 11]), TimeOfMonth::Consistent);
        assert_eq!(TimeOfMonth::classify([1, 12, 28]), TimeOfMonth::Consistent);
        assert_eq!(TimeOfMonth::classify(std::iter::empty::<u32>()), TimeOfMonth::Consistent);
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let entries = scenario();
        let cfg = AnalyticsConfig::default();
        assert_eq!(aggregate_by_category(&entries, &cfg), aggregate_by_category(&entries, &cfg));
    }
}
