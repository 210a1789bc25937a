use crate::models::{CreateExpenseRequest, Expense, ExpenseQuery};
use chrono::NaiveDate;
use database::{self, Collection, Direction, Filter, QuerySpec, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct ExpenseRecord {
    id: i64,
    name: String,
    amount: i64,
    expense_date: NaiveDate,
    notes: Option<String>,
    category_id: Option<i64>,
    budget_id: Option<i64>,
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Expense {
            id: record.id,
            name: record.name,
            amount: record.amount,
            date: record.expense_date,
            notes: record.notes,
            category_id: record.category_id,
            budget_id: record.budget_id,
        }
    }
}

pub(crate) struct ExpenseRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> ExpenseRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, user_id: i64, req: &CreateExpenseRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO expenses (user_id, name, amount, expense_date, notes, category_id, budget_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(req.name())
        .bind(req.amount())
        .bind(req.date())
        .bind(req.notes())
        .bind(req.category_id())
        .bind(req.budget_id())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn update(&mut self, user_id: i64, id: i64, req: &CreateExpenseRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET name = $1, amount = $2, expense_date = $3, notes = $4, category_id = $5, budget_id = $6
            WHERE id = $7 AND user_id = $8
            "#,
        )
        .bind(req.name())
        .bind(req.amount())
        .bind(req.date())
        .bind(req.notes())
        .bind(req.category_id())
        .bind(req.budget_id())
        .bind(id)
        .bind(user_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&mut self, user_id: i64, id: i64) -> Result<Option<Expense>, RepositoryError> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            "SELECT id, name, amount, expense_date, notes, category_id, budget_id FROM expenses WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(|r| r.into()))
    }

    pub async fn list(
        &mut self,
        user_id: i64,
        query: &ExpenseQuery,
        direction: Direction,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let records: Vec<ExpenseRecord> = QuerySpec::new(Collection::Expenses)
            .filter(Filter::eq("user_id", user_id))
            .filter_opt(query.category_id, |v| Filter::eq("category_id", v))
            .filter_opt(query.budget_id, |v| Filter::eq("budget_id", v))
            .filter_opt(query.from.map(|d| d.to_string()), |v| Filter::gte("expense_date", v))
            .filter_opt(query.to.map(|d| d.to_string()), |v| Filter::lte("expense_date", v))
            .order_by("expense_date", direction)
            .limit(query.limit)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn delete(&mut self, user_id: i64, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
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
    use crate::models::ExpenseInput;
    use database::{create_test_user, get_test_db};

    async fn setup_category(conn: &mut database::Connection, user_id: i64) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO expense_categories (user_id, name, icon, color) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user_id)
        .bind("Test Cat")
        .bind("📁")
        .bind("#000")
        .fetch_one(&mut *conn)
        .await
        .unwrap()
    }

    fn request(name: &str, amount: f64, date: &str, category_id: Option<i64>) -> CreateExpenseRequest {
        CreateExpenseRequest::new(ExpenseInput {
            name: name.into(),
            amount,
            date: date.into(),
            notes: None,
            category_id,
            budget_id: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_expense() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "exp@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = ExpenseRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Coffee", 10.0, "2026-01-01", Some(cat_id))).await.unwrap();
        assert!(id > 0);

        let e = repo.find_by_id(user_id, id).await.unwrap().unwrap();
        assert_eq!(e.amount, 1000);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(e.category_id, Some(cat_id));
    }

    #[tokio::test]
    async fn test_list_filters_by_range_and_category() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "exp@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = ExpenseRepository::new(uow.connection());
        repo.create(user_id, &request("Old", 1.0, "2025-12-31", Some(cat_id))).await.unwrap();
        repo.create(user_id, &request("Jan", 2.0, "2026-01-15", Some(cat_id))).await.unwrap();
        repo.create(user_id, &request("Feb", 3.0, "2026-02-01", None)).await.unwrap();
        repo.create(user_id, &request("Mar", 4.0, "2026-03-01", Some(cat_id))).await.unwrap();

        let query = ExpenseQuery {
            from: NaiveDate::from_ymd_opt(2026, 1, 1),
            to: NaiveDate::from_ymd_opt(2026, 2, 28),
            ..Default::default()
        };
        let names: Vec<String> = repo.list(user_id, &query, Direction::Asc).await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Jan", "Feb"]);

        let query = ExpenseQuery { category_id: Some(cat_id), ..Default::default() };
        let names: Vec<String> = repo.list(user_id, &query, Direction::Desc).await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Mar", "Jan", "Old"]);
    }

    #[tokio::test]
    async fn test_deleting_category_detaches_expenses() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "exp@example.com").await;
        let mut uow = db.begin().await.unwrap();
        let cat_id = setup_category(uow.connection(), user_id).await;

        let mut repo = ExpenseRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Coffee", 3.5, "2026-01-01", Some(cat_id))).await.unwrap();

        sqlx::query("DELETE FROM expense_categories WHERE id = $1")
            .bind(cat_id)
            .execute(uow.connection())
            .await
            .unwrap();

        let mut repo = ExpenseRepository::new(uow.connection());
        let e = repo.find_by_id(user_id, id).await.unwrap().unwrap();
        assert_eq!(e.category_id, None);
    }

    #[tokio::test]
    async fn test_update_expense() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "exp@example.com").await;
        let mut uow = db.begin().await.unwrap();

        let mut repo = ExpenseRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Coffee", 10.0, "2026-01-01", None)).await.unwrap();

        repo.update(user_id, id, &request("Tea", 20.0, "2026-01-02", None)).await.unwrap();

        let e = repo.find_by_id(user_id, id).await.unwrap().unwrap();
        assert_eq!(e.name, "Tea");
        assert_eq!(e.amount, 2000);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
    }

    #[tokio::test]
    async fn test_delete_expense() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "exp@example.com").await;
        let mut uow = db.begin().await.unwrap();

        let mut repo = ExpenseRepository::new(uow.connection());
        let id = repo.create(user_id, &request("Coffee", 10.0, "2026-01-01", None)).await.unwrap();

        assert!(repo.find_by_id(user_id, id).await.unwrap().is_some());
        repo.delete(user_id, id).await.unwrap();
        assert!(repo.find_by_id(user_id, id).await.unwrap().is_none());
    }
}
