use crate::models::{DashboardSummary, to_spending_entries};
use accounts::service::{AccountError, AccountService};
use analytics::{
    AnalyticsConfig, MonthTotal, RecurringExpense, SpendingEntry, SpendingReport, build_spending_report,
    detect_recurring, monthly_totals,
};
use budgets::service::{BudgetError, BudgetService};
use categories::service::{CategoryError, CategoryService};
use chrono::{Datelike, Months, NaiveDate};
use database::Database;
use expenses::service::{ExpenseError, ExpenseService};
use income::service::{IncomeError, IncomeService};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
}

macro_rules! infrastructure_from {
    ($($err:ty),*) => {
        $(
            impl From<$err> for AnalyticsError {
                fn from(err: $err) -> Self {
                    AnalyticsError::Infrastructure(err.to_string())
                }
            }
        )*
    };
}

infrastructure_from!(ExpenseError, CategoryError, IncomeError, AccountError, BudgetError);

pub const MAX_WINDOW_DAYS: u32 = 3650;
pub const DEFAULT_TREND_MONTHS: u32 = 6;

pub struct DashboardService;

impl DashboardService {
    /// Window expenses with category names resolved, oldest first.
    async fn window_entries(
        db: &Database,
        user_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<SpendingEntry>, AnalyticsError> {
        let (expenses, categories) = tokio::try_join!(
            async { ExpenseService::list_window(db, user_id, today, days).await.map_err(AnalyticsError::from) },
            async { CategoryService::list_categories(db, user_id).await.map_err(AnalyticsError::from) },
        )?;

        Ok(to_spending_entries(&expenses, &categories))
    }

    fn check_window(cfg: &AnalyticsConfig) -> Result<(), AnalyticsError> {
        if cfg.window_days == 0 || cfg.window_days > MAX_WINDOW_DAYS {
            return Err(AnalyticsError::InvalidInput(format!(
                "Window must be between 1 and {} days",
                MAX_WINDOW_DAYS
            )));
        }
        Ok(())
    }

    #[instrument(skip(db, cfg), fields(window_days = cfg.window_days))]
    pub async fn spending_report(
        db: &Database,
        user_id: i64,
        today: NaiveDate,
        cfg: &AnalyticsConfig,
    ) -> Result<SpendingReport, AnalyticsError> {
        Self::check_window(cfg)?;
        let entries = Self::window_entries(db, user_id, today, cfg.window_days).await?;
        Ok(build_spending_report(&entries, cfg))
    }

    #[instrument(skip(db, cfg), fields(window_days = cfg.window_days))]
    pub async fn recurring_expenses(
        db: &Database,
        user_id: i64,
        today: NaiveDate,
        cfg: &AnalyticsConfig,
    ) -> Result<Vec<RecurringExpense>, AnalyticsError> {
        Self::check_window(cfg)?;
        let entries = Self::window_entries(db, user_id, today, cfg.window_days).await?;
        let found = detect_recurring(&entries, cfg);
        tracing::debug!("Found {} recurring expenses in {} entries", found.len(), entries.len());
        Ok(found)
    }

    /// Totals for the last `months` calendar months including the current
    /// one. Months without expenses are omitted.
    #[instrument(skip(db))]
    pub async fn monthly_trend(
        db: &Database,
        user_id: i64,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<MonthTotal>, AnalyticsError> {
        if months == 0 || months > 120 {
            return Err(AnalyticsError::InvalidInput("Months must be between 1 and 120".into()));
        }

        let from = first_of_month(today)
            .checked_sub_months(Months::new(months - 1))
            .ok_or_else(|| AnalyticsError::InvalidInput("Months reach before the calendar starts".into()))?;

        let expenses = ExpenseService::list_between(db, user_id, from, today).await?;
        let entries = to_spending_entries(&expenses, &[]);
        Ok(monthly_totals(&entries))
    }

    #[instrument(skip(db))]
    pub async fn summary(db: &Database, user_id: i64, today: NaiveDate) -> Result<DashboardSummary, AnalyticsError> {
        let month_start = first_of_month(today);

        let (income, expenses, accounts, budgets) = tokio::try_join!(
            async { IncomeService::monthly_total(db, user_id).await.map_err(AnalyticsError::from) },
            async { ExpenseService::list_between(db, user_id, month_start, today).await.map_err(AnalyticsError::from) },
            async { AccountService::summary(db, user_id).await.map_err(AnalyticsError::from) },
            async {
                BudgetService::list_with_progress(db, user_id, today.month(), today.year())
                    .await
                    .map_err(AnalyticsError::from)
            },
        )?;

        let month_expenses: f64 = expenses.iter().map(|e| e.amount_dollars()).sum();

        Ok(DashboardSummary {
            month: today.format("%Y-%m").to_string(),
            monthly_income: income.monthly_total,
            month_expenses,
            net: income.monthly_total - month_expenses,
            accounts,
            budgets,
        })
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.day0() as i64)
}
