use analytics::{Frequency, monthly_equivalent};
use chrono::NaiveDate;
use common::money::{self, as_dollars};
use common::validation::finite_amount;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Income {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "as_dollars")]
    pub amount: i64, // Cents
    pub frequency: Frequency,
    pub date: NaiveDate,
    pub is_recurring: bool,
}

impl Income {
    pub fn amount_dollars(&self) -> f64 {
        money::to_dollars(self.amount)
    }

    pub fn monthly_amount(&self) -> f64 {
        monthly_equivalent(self.amount_dollars(), self.frequency)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct IncomeInput {
    #[validate(length(min = 1, message = "Income name is required"))]
    pub name: String,
    #[validate(
        range(min = 0.0, message = "Amount cannot be negative"),
        custom(function = "finite_amount")
    )]
    pub amount: f64,
    /// weekly, biweekly, monthly or annual. Anything else is stored as monthly.
    pub frequency: String,
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    pub is_recurring: Option<bool>,
}

#[derive(Debug)]
pub struct CreateIncomeRequest {
    name: String,
    amount: i64,
    frequency: Frequency,
    date: NaiveDate,
    is_recurring: bool,
}

impl CreateIncomeRequest {
    pub fn new(input: IncomeInput) -> Result<Self, String> {
        if input.name.trim().is_empty() {
            return Err("Income name cannot be empty".to_string());
        }

        let date = NaiveDate::parse_from_str(input.date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())?;

        Ok(Self {
            name: input.name.trim().to_string(),
            amount: money::to_cents(input.amount),
            frequency: Frequency::from_tag(&input.frequency),
            date,
            is_recurring: input.is_recurring.unwrap_or(true),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_recurring(&self) -> bool {
        self.is_recurring
    }
}

/// Sum of every income source expressed per month.
#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlyIncome {
    pub sources: usize,
    pub monthly_total: f64,
}
