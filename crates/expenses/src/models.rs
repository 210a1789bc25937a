use chrono::NaiveDate;
use common::money::{self, as_dollars};
use common::validation::finite_amount;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "as_dollars")]
    pub amount: i64, // Cents
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub category_id: Option<i64>,
    pub budget_id: Option<i64>,
}

impl Expense {
    pub fn amount_dollars(&self) -> f64 {
        money::to_dollars(self.amount)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExpenseInput {
    #[validate(length(min = 1, message = "Expense name is required"))]
    pub name: String,
    #[validate(
        range(min = 0.0, message = "Amount cannot be negative"),
        custom(function = "finite_amount")
    )]
    pub amount: f64,
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    pub notes: Option<String>,
    pub category_id: Option<i64>,
    pub budget_id: Option<i64>,
}

#[derive(Debug)]
pub struct CreateExpenseRequest {
    name: String,
    amount: i64,
    date: NaiveDate,
    notes: Option<String>,
    category_id: Option<i64>,
    budget_id: Option<i64>,
}

impl CreateExpenseRequest {
    pub fn new(input: ExpenseInput) -> Result<Self, String> {
        if input.name.trim().is_empty() {
            return Err("Expense name cannot be empty".to_string());
        }

        let date = NaiveDate::parse_from_str(input.date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())?;

        let notes = input
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            name: input.name.trim().to_string(),
            amount: money::to_cents(input.amount),
            date,
            notes,
            category_id: input.category_id,
            budget_id: input.budget_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    pub fn budget_id(&self) -> Option<i64> {
        self.budget_id
    }
}

/// Optional narrowing for expense listings. Dates are inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    pub category_id: Option<i64>,
    pub budget_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}
