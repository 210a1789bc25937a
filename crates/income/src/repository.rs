use crate::models::{CreateIncomeRequest, Income};
use analytics::Frequency;
use chrono::NaiveDate;
use database::{self, Collection, Direction, Filter, QuerySpec, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct IncomeRecord {
    id: i64,
    name: String,
    amount: i64,
    frequency: String,
    income_date: NaiveDate,
    is_recurring: bool,
}

impl From<IncomeRecord> for Income {
    fn from(record: IncomeRecord) -> Self {
        Income {
            id: record.id,
            name: record.name,
            amount: record.amount,
            frequency: Frequency::from_tag(&record.frequency),
            date: record.income_date,
            is_recurring: record.is_recurring,
        }
    }
}

pub(crate) struct IncomeRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> IncomeRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, user_id: i64, req: &CreateIncomeRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO income (user_id, name, amount, frequency, income_date, is_recurring)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(req.name())
        .bind(req.amount())
        .bind(req.frequency().as_str())
        .bind(req.date())
        .bind(req.is_recurring())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn update(&mut self, user_id: i64, id: i64, req: &CreateIncomeRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE income
            SET name = $1, amount = $2, frequency = $3, income_date = $4, is_recurring = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(req.name())
        .bind(req.amount())
        .bind(req.frequency().as_str())
        .bind(req.date())
        .bind(req.is_recurring())
        .bind(id)
        .bind(user_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&mut self, user_id: i64, id: i64) -> Result<Option<Income>, RepositoryError> {
        let record = sqlx::query_as::<_, IncomeRecord>(
            "SELECT id, name, amount, frequency, income_date, is_recurring FROM income WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(|r| r.into()))
    }

    /// Newest first.
    pub async fn list(&mut self, user_id: i64) -> Result<Vec<Income>, RepositoryError> {
        let records: Vec<IncomeRecord> = QuerySpec::new(Collection::Income)
            .filter(Filter::eq("user_id", user_id))
            .order_by("income_date", Direction::Desc)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn delete(&mut self, user_id: i64, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM income WHERE id = $1 AND user_id = $2")
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
