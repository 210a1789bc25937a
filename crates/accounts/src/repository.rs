use crate::models::{Account, AccountType, CreateAccountRequest};
use database::{self, Collection, Direction, Filter, QuerySpec, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct AccountRecord {
    id: i64,
    name: String,
    account_type: AccountType,
    balance: i64,
    is_active: bool,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account {
            id: record.id,
            name: record.name,
            account_type: record.account_type,
            balance: record.balance,
            is_active: record.is_active,
        }
    }
}

pub(crate) struct AccountRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> AccountRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, user_id: i64, req: &CreateAccountRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO accounts (user_id, name, account_type, balance, is_active) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user_id)
        .bind(&req.name)
        .bind(req.account_type)
        .bind(req.balance)
        .bind(req.is_active)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn list(&mut self, user_id: i64) -> Result<Vec<Account>, RepositoryError> {
        self.query(QuerySpec::new(Collection::Accounts).filter(Filter::eq("user_id", user_id)))
            .await
    }

    pub async fn list_active(&mut self, user_id: i64) -> Result<Vec<Account>, RepositoryError> {
        self.query(
            QuerySpec::new(Collection::Accounts)
                .filter(Filter::eq("user_id", user_id))
                .filter(Filter::eq("is_active", true)),
        )
        .await
    }

    async fn query(&mut self, spec: QuerySpec) -> Result<Vec<Account>, RepositoryError> {
        let records: Vec<AccountRecord> = spec
            .order_by("name", Direction::Asc)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub async fn update(&mut self, user_id: i64, id: i64, req: &CreateAccountRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE accounts SET name = $1, account_type = $2, balance = $3, is_active = $4 WHERE id = $5 AND user_id = $6",
        )
        .bind(&req.name)
        .bind(req.account_type)
        .bind(req.balance)
        .bind(req.is_active)
        .bind(id)
        .bind(user_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&mut self, user_id: i64, id: i64) -> Result<Option<Account>, RepositoryError> {
        let record = sqlx::query_as::<_, AccountRecord>(
            "SELECT id, name, account_type, balance, is_active FROM accounts WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(|r| r.into()))
    }

    pub async fn delete(&mut self, user_id: i64, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1 AND user_id = $2")
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
