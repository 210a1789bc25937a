use accounts::models::AccountSummary;
use analytics::SpendingEntry;
use budgets::models::BudgetProgress;
use categories::models::Category;
use expenses::models::Expense;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves each expense's category name. Expenses without a category, or
/// whose category is gone, carry `None` and group as uncategorized.
pub fn to_spending_entries(expenses: &[Expense], categories: &[Category]) -> Vec<SpendingEntry> {
    let names: HashMap<i64, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    expenses
        .iter()
        .map(|e| SpendingEntry {
            name: e.name.clone(),
            category: e
                .category_id
                .and_then(|id| names.get(&id))
                .map(|name| name.to_string()),
            amount: e.amount_dollars(),
            date: e.date,
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<u32>,
}

/// Headline figures for the current month.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub month: String,
    pub monthly_income: f64,
    pub month_expenses: f64,
    /// Monthly-equivalent income minus this month's expenses.
    pub net: f64,
    pub accounts: AccountSummary,
    pub budgets: Vec<BudgetProgress>,
}
