use common::money::{self, as_dollars};
use common::validation::finite_amount;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Budget for one calendar month. A new row is expected each month.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MonthlyBudget {
    pub id: i64,
    pub name: String,
    pub month: u32,
    pub year: i32,
    #[serde(serialize_with = "as_dollars")]
    pub budgeted_amount: i64, // Cents
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BudgetInput {
    #[validate(length(min = 1, message = "Budget name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: u32,
    #[validate(range(min = 1900, max = 9999, message = "Year is out of range"))]
    pub year: i32,
    #[validate(
        range(min = 0.0, message = "Budgeted amount cannot be negative"),
        custom(function = "finite_amount")
    )]
    pub budgeted_amount: f64,
    pub category_id: i64,
}

#[derive(Debug)]
pub struct CreateBudgetRequest {
    pub name: String,
    pub month: u32,
    pub year: i32,
    pub budgeted_amount: i64,
    pub category_id: i64,
}

impl CreateBudgetRequest {
    pub fn new(input: BudgetInput) -> Result<Self, String> {
        if input.name.trim().is_empty() {
            return Err("Budget name cannot be empty".to_string());
        }

        Ok(Self {
            name: input.name.trim().to_string(),
            month: input.month,
            year: input.year,
            budgeted_amount: money::to_cents(input.budgeted_amount),
            category_id: input.category_id,
        })
    }
}

/// A budget row with its spent-to-date figures.
#[derive(Debug, Serialize, Clone)]
pub struct BudgetProgress {
    pub budget: MonthlyBudget,
    #[serde(serialize_with = "as_dollars")]
    pub spent: i64,
    #[serde(serialize_with = "as_dollars")]
    pub remaining: i64,
    pub percent_used: f64,
    pub is_over_budget: bool,
}

impl BudgetProgress {
    pub fn new(budget: MonthlyBudget, spent: i64) -> Self {
        let remaining = budget.budgeted_amount - spent;
        let percent_used = if budget.budgeted_amount == 0 {
            0.0
        } else {
            spent as f64 / budget.budgeted_amount as f64 * 100.0
        };

        Self {
            is_over_budget: remaining < 0,
            budget,
            spent,
            remaining,
            percent_used,
        }
    }
}
