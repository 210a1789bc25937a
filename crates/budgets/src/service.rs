use crate::models::{BudgetInput, BudgetProgress, CreateBudgetRequest, MonthlyBudget};
use crate::repository::MonthlyBudgetRepository;
use categories::service::{CategoryError, CategoryService};
use common::validation;
use database::{RepositoryError, Database};
use tokio::task::JoinSet;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Budget not found")]
    NotFound,
}

impl From<RepositoryError> for BudgetError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => BudgetError::NotFound,
            RepositoryError::CheckViolation(msg) => BudgetError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => BudgetError::Infrastructure(e.to_string()),
            _ => BudgetError::Infrastructure(err.to_string()),
        }
    }
}

pub struct BudgetService;

impl BudgetService {
    async fn build_request(db: &Database, user_id: i64, input: BudgetInput) -> Result<CreateBudgetRequest, BudgetError> {
        validation::check(&input).map_err(BudgetError::InvalidInput)?;

        CategoryService::get_category(db, user_id, input.category_id)
            .await
            .map_err(|e| match e {
                CategoryError::NotFound => BudgetError::InvalidInput("Invalid category ID".into()),
                other => {
                    tracing::error!("Failed to get category for budget: {:?}", other);
                    BudgetError::Infrastructure(other.to_string())
                }
            })?;

        CreateBudgetRequest::new(input).map_err(BudgetError::InvalidInput)
    }

    #[instrument(skip(db))]
    pub async fn create_budget(
        db: &Database,
        user_id: i64,
        input: BudgetInput,
    ) -> Result<MonthlyBudget, BudgetError> {
        let req = Self::build_request(db, user_id, input).await?;

        let mut uow = db.begin().await?;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        let id = repo.create(user_id, &req).await?;
        let budget = repo.find_by_id(user_id, id).await?
            .ok_or(BudgetError::NotFound)?;

        uow.commit().await?;

        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn update_budget(
        db: &Database,
        user_id: i64,
        id: i64,
        input: BudgetInput,
    ) -> Result<MonthlyBudget, BudgetError> {
        let req = Self::build_request(db, user_id, input).await?;

        let mut uow = db.begin().await?;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        repo.update(user_id, id, &req).await?;
        let budget = repo.find_by_id(user_id, id).await?
            .ok_or(BudgetError::NotFound)?;

        uow.commit().await?;

        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn get_budget(db: &Database, user_id: i64, id: i64) -> Result<MonthlyBudget, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        let budget = repo.find_by_id(user_id, id).await?
            .ok_or(BudgetError::NotFound)?;

        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn list_budgets(
        db: &Database,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<MonthlyBudget>, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        let budgets = repo.list_for_period(user_id, month, year).await?;

        Ok(budgets)
    }

    #[instrument(skip(db))]
    pub async fn spent_to_date(db: &Database, user_id: i64, budget_id: i64) -> Result<i64, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        let spent = repo.spent_for_budget(user_id, budget_id).await?;

        Ok(spent)
    }

    /// Fetches spent-to-date for every row concurrently. Rows keep list order.
    #[instrument(skip(db))]
    pub async fn list_with_progress(
        db: &Database,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<BudgetProgress>, BudgetError> {
        let budgets = Self::list_budgets(db, user_id, month, year).await?;

        let mut tasks = JoinSet::new();
        for (idx, budget) in budgets.iter().enumerate() {
            let db = db.clone();
            let budget_id = budget.id;
            tasks.spawn(async move { (idx, Self::spent_to_date(&db, user_id, budget_id).await) });
        }

        let mut spent = vec![0_i64; budgets.len()];
        while let Some(joined) = tasks.join_next().await {
            let (idx, result) = joined.map_err(|e| {
                tracing::error!("Spent-to-date task failed: {}", e);
                BudgetError::Infrastructure(e.to_string())
            })?;
            spent[idx] = result?;
        }

        Ok(budgets
            .into_iter()
            .zip(spent)
            .map(|(budget, spent)| BudgetProgress::new(budget, spent))
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn delete_budget(db: &Database, user_id: i64, id: i64) -> Result<(), BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        repo.delete(user_id, id).await?;

        uow.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use categories::models::CategoryInput;
    use database::{create_test_user, get_test_db};

    async fn setup(db: &Database) -> (i64, i64) {
        let user_id = create_test_user(db, "budget-svc@example.com").await;
        let category = CategoryService::create_category(
            db,
            user_id,
            CategoryInput { name: "Food".into(), icon: None, color: None },
        )
        .await
        .unwrap();
        (user_id, category.id)
    }

    fn input(name: &str, amount: f64, category_id: i64) -> BudgetInput {
        BudgetInput {
            name: name.into(),
            month: 3,
            year: 2026,
            budgeted_amount: amount,
            category_id,
        }
    }

    async fn add_expense(db: &Database, user_id: i64, budget_id: i64, cents: i64) {
        sqlx::query("INSERT INTO expenses (user_id, name, amount, expense_date, budget_id) VALUES ($1, 'Shop', $2, '2026-03-10', $3)")
            .bind(user_id)
            .bind(cents)
            .bind(budget_id)
            .execute(&db.pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let db = get_test_db().await;
        let (user_id, _) = setup(&db).await;

        let err = BudgetService::create_budget(&db, user_id, input("Food", 100.0, 999)).await.unwrap_err();
        assert!(matches!(err, BudgetError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_category_lookup_failure_is_infrastructure() {
        let db = get_test_db().await;
        let (user_id, cat_id) = setup(&db).await;
        db.pool.close().await;

        let err = BudgetService::create_budget(&db, user_id, input("Groceries", 400.0, cat_id)).await.unwrap_err();
        assert!(matches!(err, BudgetError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_amount() {
        let db = get_test_db().await;
        let (user_id, cat_id) = setup(&db).await;

        let err = BudgetService::create_budget(&db, user_id, input("Food", -1.0, cat_id)).await.unwrap_err();
        assert!(matches!(err, BudgetError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_list_with_progress_keeps_row_order() {
        let db = get_test_db().await;
        let (user_id, cat_id) = setup(&db).await;

        let food = BudgetService::create_budget(&db, user_id, input("A Food", 400.0, cat_id)).await.unwrap();
        let fun = BudgetService::create_budget(&db, user_id, input("B Fun", 50.0, cat_id)).await.unwrap();
        let empty = BudgetService::create_budget(&db, user_id, input("C Empty", 10.0, cat_id)).await.unwrap();

        add_expense(&db, user_id, food.id, 10000).await;
        add_expense(&db, user_id, food.id, 2500).await;
        add_expense(&db, user_id, fun.id, 7500).await;

        let progress = BudgetService::list_with_progress(&db, user_id, 3, 2026).await.unwrap();
        let rows: Vec<(i64, i64, bool)> = progress
            .iter()
            .map(|p| (p.budget.id, p.spent, p.is_over_budget))
            .collect();

        assert_eq!(
            rows,
            vec![(food.id, 12500, false), (fun.id, 7500, true), (empty.id, 0, false)]
        );
    }

    #[tokio::test]
    async fn test_list_with_progress_empty_month() {
        let db = get_test_db().await;
        let (user_id, _) = setup(&db).await;

        let progress = BudgetService::list_with_progress(&db, user_id, 1, 2020).await.unwrap();
        assert!(progress.is_empty());
    }
}
