//! Recurring bill detection across individually named expenses.

use crate::trend::{TrendEstimate, estimate_trend};
use crate::{AnalyticsConfig, SpendingEntry};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Grouping key for a named expense. Kept as two fields so names containing
/// separators never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExpenseKey {
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringExpense {
    #[serde(flatten)]
    pub key: ExpenseKey,
    pub average_amount: f64,
    pub occurrences: usize,
    pub last_date: NaiveDate,
    pub trend: TrendEstimate,
}

/// Groups by (name, category), runs the trend estimator on each group in
/// date order and keeps the groups classified as recurring, highest average
/// amount first.
pub fn detect_recurring(entries: &[SpendingEntry], cfg: &AnalyticsConfig) -> Vec<RecurringExpense> {
    let mut groups: HashMap<ExpenseKey, Vec<&SpendingEntry>> = HashMap::new();
    for entry in entries {
        let key = ExpenseKey {
            name: entry.name.trim().to_string(),
            category: entry.category_label().to_string(),
        };
        groups.entry(key).or_default().push(entry);
    }

    let mut found: Vec<RecurringExpense> = groups
        .into_iter()
        .filter_map(|(key, mut group)| {
            group.sort_by_key(|e| e.date);
            let amounts: Vec<f64> = group.iter().map(|e| e.amount).collect();
            let trend = estimate_trend(&amounts, cfg);
            if !trend.is_recurring {
                return None;
            }

            let last_date = group.last()?.date;
            Some(RecurringExpense {
                key,
                average_amount: amounts.iter().sum::<f64>() / amounts.len() as f64,
                occurrences: amounts.len(),
                last_date,
                trend,
            })
        })
        .collect();

    // HashMap iteration is unordered, so break ties on the key.
    found.sort_by(|a, b| {
        b.average_amount
            .total_cmp(&a.average_amount)
            .then_with(|| a.key.name.cmp(&b.key.name))
            .then_with(|| a.key.category.cmp(&b.key.category))
    });
    found
}
