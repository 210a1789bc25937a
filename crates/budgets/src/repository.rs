use crate::models::{CreateBudgetRequest, MonthlyBudget};
use database::{self, Collection, Direction, Filter, QuerySpec, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct MonthlyBudgetRecord {
    id: i64,
    name: String,
    month: i64,
    year: i64,
    budgeted_amount: i64,
    category_id: Option<i64>,
}

impl From<MonthlyBudgetRecord> for MonthlyBudget {
    fn from(record: MonthlyBudgetRecord) -> Self {
        MonthlyBudget {
            id: record.id,
            name: record.name,
            month: record.month as u32,
            year: record.year as i32,
            budgeted_amount: record.budgeted_amount,
            category_id: record.category_id,
        }
    }
}

pub(crate) struct MonthlyBudgetRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> MonthlyBudgetRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, user_id: i64, req: &CreateBudgetRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO monthly_budgets (user_id, name, month, year, budgeted_amount, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&req.name)
        .bind(req.month as i64)
        .bind(req.year as i64)
        .bind(req.budgeted_amount)
        .bind(req.category_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn update(&mut self, user_id: i64, id: i64, req: &CreateBudgetRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE monthly_budgets
            SET name = $1, month = $2, year = $3, budgeted_amount = $4, category_id = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&req.name)
        .bind(req.month as i64)
        .bind(req.year as i64)
        .bind(req.budgeted_amount)
        .bind(req.category_id)
        .bind(id)
        .bind(user_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&mut self, user_id: i64, id: i64) -> Result<Option<MonthlyBudget>, RepositoryError> {
        let record = sqlx::query_as::<_, MonthlyBudgetRecord>(
            "SELECT id, name, month, year, budgeted_amount, category_id FROM monthly_budgets WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(|r| r.into()))
    }

    pub async fn list_for_period(&mut self, user_id: i64, month: u32, year: i32) -> Result<Vec<MonthlyBudget>, RepositoryError> {
        let records: Vec<MonthlyBudgetRecord> = QuerySpec::new(Collection::MonthlyBudgets)
            .filter(Filter::eq("user_id", user_id))
            .filter(Filter::eq("month", month))
            .filter(Filter::eq("year", year))
            .order_by("name", Direction::Asc)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn spent_for_budget(&mut self, user_id: i64, budget_id: i64) -> Result<i64, RepositoryError> {
        let spent: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE budget_id = $1 AND user_id = $2",
        )
        .bind(budget_id)
        .bind(user_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(spent)
    }

    pub async fn delete(&mut self, user_id: i64, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM monthly_budgets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{create_test_user, get_test_db};

    async fn setup_category(conn: &mut database::Connection, user_id: i64) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO expense_categories (user_id, name, icon, color) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user_id)
        .bind("Food")
        .bind("🍔")
        .bind("#000")
        .fetch_one(&mut *conn)
        .await
        .unwrap()
    }

    fn request(name: &str, month: u32, year: i32, cents: i64, category_id: i64) -> CreateBudgetRequest {
        CreateBudgetRequest {
            name: name.to_string(),
            month,
            year,
            budgeted_amount: cents,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_budget() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "budget@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = MonthlyBudgetRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Food", 3, 2026, 40000, cat_id)).await.unwrap();

        let budget = repo.find_by_id(user_id, id).await.unwrap().unwrap();
        assert_eq!(budget.month, 3);
        assert_eq!(budget.year, 2026);
        assert_eq!(budget.budgeted_amount, 40000);
        assert_eq!(budget.category_id, Some(cat_id));
    }

    #[tokio::test]
    async fn test_list_for_period_only_returns_that_month() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "budget@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = MonthlyBudgetRepository::new(uow.connection());
        repo.create(user_id, &request("Food", 3, 2026, 40000, cat_id)).await.unwrap();
        repo.create(user_id, &request("Fun", 3, 2026, 10000, cat_id)).await.unwrap();
        repo.create(user_id, &request("Food", 4, 2026, 40000, cat_id)).await.unwrap();
        repo.create(user_id, &request("Food", 3, 2025, 40000, cat_id)).await.unwrap();

        let march = repo.list_for_period(user_id, 3, 2026).await.unwrap();
        let names: Vec<&str> = march.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Fun"]);
    }

    #[tokio::test]
    async fn test_duplicate_category_period_is_allowed() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "budget@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = MonthlyBudgetRepository::new(uow.connection());
        repo.create(user_id, &request("Food", 3, 2026, 40000, cat_id)).await.unwrap();
        repo.create(user_id, &request("Food again", 3, 2026, 5000, cat_id)).await.unwrap();

        assert_eq!(repo.list_for_period(user_id, 3, 2026).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_spent_for_budget_sums_linked_expenses() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "budget@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = MonthlyBudgetRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Food", 3, 2026, 40000, cat_id)).await.unwrap();
        assert_eq!(repo.spent_for_budget(user_id, id).await.unwrap(), 0);

        for amount in [1250_i64, 3000] {
            sqlx::query("INSERT INTO expenses (user_id, name, amount, expense_date, budget_id) VALUES ($1, 'Shop', $2, '2026-03-02', $3)")
                .bind(user_id)
                .bind(amount)
                .bind(id)
                .execute(uow.connection())
                .await
                .unwrap();
        }

        let mut repo = MonthlyBudgetRepository::new(uow.connection());
        assert_eq!(repo.spent_for_budget(user_id, id).await.unwrap(), 4250);
    }

    #[tokio::test]
    async fn test_update_and_delete_budget() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "budget@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = MonthlyBudgetRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Food", 3, 2026, 40000, cat_id)).await.unwrap();

        repo.update(user_id, id, &request("Groceries", 3, 2026, 45000, cat_id)).await.unwrap();
        let budget = repo.find_by_id(user_id, id).await.unwrap().unwrap();
        assert_eq!(budget.name, "Groceries");
        assert_eq!(budget.budgeted_amount, 45000);

        repo.delete(user_id, id).await.unwrap();
        assert!(repo.find_by_id(user_id, id).await.unwrap().is_none());
        assert!(matches!(repo.delete(user_id, id).await, Err(RepositoryError::NotFound)));
    }
}
