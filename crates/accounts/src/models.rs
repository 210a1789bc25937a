use common::money::{self, as_dollars};
use common::validation::finite_amount;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Investment,
}

impl AccountType {
    /// Credit balances are amounts owed.
    pub fn is_liability(&self) -> bool {
        matches!(self, AccountType::Credit)
    }
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: AccountType,
    #[serde(serialize_with = "as_dollars")]
    pub balance: i64, // Cents
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AccountInput {
    #[validate(length(min = 1, message = "Account name is required"))]
    pub name: String,
    pub account_type: AccountType,
    #[validate(custom(function = "finite_amount"))]
    pub balance: f64,
    pub is_active: Option<bool>,
}

#[derive(Debug)]
pub struct CreateAccountRequest {
    pub name: String,
    pub account_type: AccountType,
    pub balance: i64,
    pub is_active: bool,
}

impl CreateAccountRequest {
    pub fn new(input: AccountInput) -> Result<Self, String> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err("Account name cannot be empty".to_string());
        }

        Ok(Self {
            name: name.to_string(),
            account_type: input.account_type,
            balance: money::to_cents(input.balance),
            is_active: input.is_active.unwrap_or(true),
        })
    }
}

/// Totals across active accounts.
#[derive(Debug, Serialize, PartialEq)]
pub struct AccountSummary {
    #[serde(serialize_with = "as_dollars")]
    pub assets: i64,
    #[serde(serialize_with = "as_dollars")]
    pub liabilities: i64,
    #[serde(serialize_with = "as_dollars")]
    pub net_worth: i64,
    pub active_accounts: usize,
}

impl AccountSummary {
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let mut assets = 0;
        let mut liabilities = 0;
        let mut active_accounts = 0;

        for account in accounts.iter().filter(|a| a.is_active) {
            active_accounts += 1;
            if account.account_type.is_liability() {
                liabilities += account.balance;
            } else {
                assets += account.balance;
            }
        }

        Self {
            assets,
            liabilities,
            net_worth: assets - liabilities,
            active_accounts,
        }
    }
}
