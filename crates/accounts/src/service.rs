use crate::models::{Account, AccountInput, AccountSummary, CreateAccountRequest};
use crate::repository::AccountRepository;
use common::validation;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Account not found")]
    NotFound,
}

impl From<RepositoryError> for AccountError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AccountError::NotFound,
            RepositoryError::CheckViolation(msg) => AccountError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => AccountError::Infrastructure(e.to_string()),
            _ => AccountError::Infrastructure(err.to_string()),
        }
    }
}

pub struct AccountService;

impl AccountService {
    fn build_request(input: AccountInput) -> Result<CreateAccountRequest, AccountError> {
        validation::check(&input).map_err(AccountError::InvalidInput)?;
        CreateAccountRequest::new(input).map_err(AccountError::InvalidInput)
    }

    #[instrument(skip(db))]
    pub async fn create_account(db: &Database, user_id: i64, input: AccountInput) -> Result<Account, AccountError> {
        let req = Self::build_request(input)?;

        let mut uow = db.begin().await?;
        let mut repo = AccountRepository::new(uow.connection());

        let id = repo.create(user_id, &req).await?;
        let account = repo.find_by_id(user_id, id).await?.ok_or(AccountError::NotFound)?;

        uow.commit().await?;
        Ok(account)
    }

    #[instrument(skip(db))]
    pub async fn list_accounts(db: &Database, user_id: i64) -> Result<Vec<Account>, AccountError> {
        let mut uow = db.begin().await?;
        let mut repo = AccountRepository::new(uow.connection());

        Ok(repo.list(user_id).await?)
    }

    #[instrument(skip(db))]
    pub async fn list_active_accounts(db: &Database, user_id: i64) -> Result<Vec<Account>, AccountError> {
        let mut uow = db.begin().await?;
        let mut repo = AccountRepository::new(uow.connection());

        Ok(repo.list_active(user_id).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_account(db: &Database, user_id: i64, id: i64) -> Result<Account, AccountError> {
        let mut uow = db.begin().await?;
        let mut repo = AccountRepository::new(uow.connection());

        repo.find_by_id(user_id, id).await?.ok_or(AccountError::NotFound)
    }

    #[instrument(skip(db))]
    pub async fn update_account(
        db: &Database,
        user_id: i64,
        id: i64,
        input: AccountInput,
    ) -> Result<Account, AccountError> {
        let req = Self::build_request(input)?;

        let mut uow = db.begin().await?;
        let mut repo = AccountRepository::new(uow.connection());

        repo.update(user_id, id, &req).await?;
        let account = repo.find_by_id(user_id, id).await?.ok_or(AccountError::NotFound)?;

        uow.commit().await?;
        Ok(account)
    }

    #[instrument(skip(db))]
    pub async fn summary(db: &Database, user_id: i64) -> Result<AccountSummary, AccountError> {
        let active = Self::list_active_accounts(db, user_id).await?;
        Ok(AccountSummary::from_accounts(&active))
    }

    #[instrument(skip(db))]
    pub async fn delete_account(db: &Database, user_id: i64, id: i64) -> Result<(), AccountError> {
        let mut uow = db.begin().await?;
        let mut repo = AccountRepository::new(uow.connection());

        repo.delete(user_id, id).await?;

        uow.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;
    use database::{create_test_user, get_test_db};

    fn input(name: &str, account_type: AccountType, balance: f64) -> AccountInput {
        AccountInput {
            name: name.into(),
            account_type,
            balance,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "acct-svc@example.com").await;

        let err = AccountService::create_account(&db, user_id, input("  ", AccountType::Checking, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_summary_net_worth() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "acct-svc@example.com").await;

        AccountService::create_account(&db, user_id, input("Checking", AccountType::Checking, 1500.0)).await.unwrap();
        AccountService::create_account(&db, user_id, input("Card", AccountType::Credit, 400.25)).await.unwrap();
        let closed = AccountService::create_account(&db, user_id, input("Closed", AccountType::Savings, 900.0))
            .await
            .unwrap();

        let mut deactivate = input("Closed", AccountType::Savings, 900.0);
        deactivate.is_active = Some(false);
        AccountService::update_account(&db, user_id, closed.id, deactivate).await.unwrap();

        let summary = AccountService::summary(&db, user_id).await.unwrap();
        assert_eq!(summary.assets, 150000);
        assert_eq!(summary.liabilities, 40025);
        assert_eq!(summary.net_worth, 109975);
        assert_eq!(summary.active_accounts, 2);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let db = get_test_db().await;
        let user_id = create_test_user(&db, "acct-svc@example.com").await;

        let account = AccountService::create_account(&db, user_id, input("Temp", AccountType::Savings, 0.0))
            .await
            .unwrap();
        AccountService::delete_account(&db, user_id, account.id).await.unwrap();

        let err = AccountService::get_account(&db, user_id, account.id).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }
}
