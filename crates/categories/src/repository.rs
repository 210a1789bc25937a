use crate::models::{Category, CreateCategoryRequest};
use database::{self, Collection, Direction, Filter, QuerySpec, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct CategoryRecord {
    id: i64,
    name: String,
    icon: String,
    color: String,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category {
            id: record.id,
            name: record.name,
            icon: record.icon,
            color: record.color,
        }
    }
}

pub(crate) struct CategoryRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, user_id: i64, req: &CreateCategoryRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO expense_categories (user_id, name, icon, color) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user_id)
        .bind(&req.name)
        .bind(&req.icon)
        .bind(&req.color)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn list(&mut self, user_id: i64) -> Result<Vec<Category>, RepositoryError> {
        let records: Vec<CategoryRecord> = QuerySpec::new(Collection::ExpenseCategories)
            .filter(Filter::eq("user_id", user_id))
            .order_by("name", Direction::Asc)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn find_by_id(&mut self, user_id: i64, id: i64) -> Result<Option<Category>, RepositoryError> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, icon, color FROM expense_categories WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(|r| r.into()))
    }

    pub async fn update(&mut self, user_id: i64, id: i64, req: &CreateCategoryRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE expense_categories SET name = $1, icon = $2, color = $3 WHERE id = $4 AND user_id = $5",
        )
        .bind(&req.name)
        .bind(&req.icon)
        .bind(&req.color)
        .bind(id)
        .bind(user_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&mut self, user_id: i64, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expense_categories WHERE id = $1 AND user_id = $2")
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
