use crate::models::{CreateExpenseRequest, Expense, ExpenseInput, ExpenseQuery};
use crate::repository::ExpenseRepository;
use budgets::service::{BudgetError, BudgetService};
use categories::service::{CategoryError, CategoryService};
use chrono::{Duration, NaiveDate};
use common::validation;
use database::{Direction, RepositoryError, Database};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Expense not found")]
    NotFound,
}

impl From<RepositoryError> for ExpenseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ExpenseError::NotFound,
            RepositoryError::CheckViolation(msg) => ExpenseError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => ExpenseError::Infrastructure(e.to_string()),
            _ => ExpenseError::Infrastructure(err.to_string()),
        }
    }
}

pub struct ExpenseService;

impl ExpenseService {
    async fn build_request(db: &Database, user_id: i64, input: ExpenseInput) -> Result<CreateExpenseRequest, ExpenseError> {
        validation::check(&input).map_err(ExpenseError::InvalidInput)?;

        if let Some(category_id) = input.category_id {
            CategoryService::get_category(db, user_id, category_id)
                .await
                .map_err(|e| match e {
                    CategoryError::NotFound => ExpenseError::InvalidInput("Invalid category ID".into()),
                    other => {
                        tracing::error!("Failed to get category for expense: {:?}", other);
                        ExpenseError::Infrastructure(other.to_string())
                    }
                })?;
        }

        if let Some(budget_id) = input.budget_id {
            BudgetService::get_budget(db, user_id, budget_id)
                .await
                .map_err(|e| match e {
                    BudgetError::NotFound => ExpenseError::InvalidInput("Invalid budget ID".into()),
                    other => {
                        tracing::error!("Failed to get budget for expense: {:?}", other);
                        ExpenseError::Infrastructure(other.to_string())
                    }
                })?;
        }

        CreateExpenseRequest::new(input).map_err(ExpenseError::InvalidInput)
    }

    #[instrument(skip(db))]
    pub async fn create_expense(
        db: &Database,
        user_id: i64,
        input: ExpenseInput,
    ) -> Result<Expense, ExpenseError> {
        let req = Self::build_request(db, user_id, input).await?;

        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        let id = repo.create(user_id, &req).await?;
        let expense = repo.find_by_id(user_id, id).await?
            .ok_or(ExpenseError::NotFound)?;

        uow.commit().await?;

        Ok(expense)
    }

    #[instrument(skip(db))]
    pub async fn update_expense(
        db: &Database,
        user_id: i64,
        id: i64,
        input: ExpenseInput,
    ) -> Result<Expense, ExpenseError> {
        let req = Self::build_request(db, user_id, input).await?;

        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        repo.update(user_id, id, &req).await?;

        let expense = repo.find_by_id(user_id, id).await?
            .ok_or(ExpenseError::NotFound)?;

        uow.commit().await?;

        Ok(expense)
    }

    #[instrument(skip(db))]
    pub async fn get_expense(db: &Database, user_id: i64, id: i64) -> Result<Expense, ExpenseError> {
        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        let expense = repo.find_by_id(user_id, id).await?
            .ok_or(ExpenseError::NotFound)?;

        Ok(expense)
    }

    /// Newest first.
    #[instrument(skip(db))]
    pub async fn list_expenses(
        db: &Database,
        user_id: i64,
        query: ExpenseQuery,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        let expenses = repo.list(user_id, &query, Direction::Desc).await?;

        Ok(expenses)
    }

    /// Expenses dated within `[today - days, today]`, oldest first.
    #[instrument(skip(db))]
    pub async fn list_window(
        db: &Database,
        user_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let query = ExpenseQuery {
            from: Some(today - Duration::days(days as i64)),
            to: Some(today),
            ..Default::default()
        };

        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        let expenses = repo.list(user_id, &query, Direction::Asc).await?;
        tracing::debug!("Fetched {} expenses for {} day window", expenses.len(), days);

        Ok(expenses)
    }

    /// Oldest first, within an inclusive date range.
    #[instrument(skip(db))]
    pub async fn list_between(
        db: &Database,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Expense>, ExpenseError> {
        let query = ExpenseQuery {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        };

        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        let expenses = repo.list(user_id, &query, Direction::Asc).await?;

        Ok(expenses)
    }

    #[instrument(skip(db))]
    pub async fn delete_expense(db: &Database, user_id: i64, id: i64) -> Result<(), ExpenseError> {
        let mut uow = db.begin().await?;
        let mut repo = ExpenseRepository::new(uow.connection());

        repo.delete(user_id, id).await?;

        uow.commit().await?;
        Ok(())
    }
}
