use crate::models::{CreateIncomeRequest, Income, IncomeInput, MonthlyIncome};
use crate::repository::IncomeRepository;
use common::validation;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum IncomeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Income not found")]
    NotFound,
}

impl From<RepositoryError> for IncomeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => IncomeError::NotFound,
            RepositoryError::CheckViolation(msg) => IncomeError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => IncomeError::Infrastructure(e.to_string()),
            _ => IncomeError::Infrastructure(err.to_string()),
        }
    }
}

pub struct IncomeService;

impl IncomeService {
    fn build_request(input: IncomeInput) -> Result<CreateIncomeRequest, IncomeError> {
        validation::check(&input).map_err(IncomeError::InvalidInput)?;
        CreateIncomeRequest::new(input).map_err(IncomeError::InvalidInput)
    }

    #[instrument(skip(db))]
    pub async fn create_income(db: &Database, user_id: i64, input: IncomeInput) -> Result<Income, IncomeError> {
        let req = Self::build_request(input)?;

        let mut uow = db.begin().await?;
        let mut repo = IncomeRepository::new(uow.connection());

        let id = repo.create(user_id, &req).await?;
        let income = repo.find_by_id(user_id, id).await?.ok_or(IncomeError::NotFound)?;

        uow.commit().await?;
        Ok(income)
    }

    #[instrument(skip(db))]
    pub async fn update_income(
        db: &Database,
        user_id: i64,
        id: i64,
        input: IncomeInput,
    ) -> Result<Income, IncomeError> {
        let req = Self::build_request(input)?;

        let mut uow = db.begin().await?;
        let mut repo = IncomeRepository::new(uow.connection());

        repo.update(user_id, id, &req).await?;
        let income = repo.find_by_id(user_id, id).await?.ok_or(IncomeError::NotFound)?;

        uow.commit().await?;
        Ok(income)
    }

    #[instrument(skip(db))]
    pub async fn get_income(db: &Database, user_id: i64, id: i64) -> Result<Income, IncomeError> {
        let mut uow = db.begin().await?;
        let mut repo = IncomeRepository::new(uow.connection());

        repo.find_by_id(user_id, id).await?.ok_or(IncomeError::NotFound)
    }

    #[instrument(skip(db))]
    pub async fn list_income(db: &Database, user_id: i64) -> Result<Vec<Income>, IncomeError> {
        let mut uow = db.begin().await?;
        let mut repo = IncomeRepository::new(uow.connection());

        Ok(repo.list(user_id).await?)
    }

    /// Every source normalised to a monthly amount and summed.
    #[instrument(skip(db))]
    pub async fn monthly_total(db: &Database, user_id: i64) -> Result<MonthlyIncome, IncomeError> {
        let sources = Self::list_income(db, user_id).await?;
        let monthly_total = analytics::monthly_total(
            sources.iter().map(|i| (i.amount_dollars(), i.frequency)),
        );

        tracing::debug!("Monthly income {:.2} from {} sources", monthly_total, sources.len());

        Ok(MonthlyIncome {
            sources: sources.len(),
            monthly_total,
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_income(db: &Database, user_id: i64, id: i64) -> Result<(), IncomeError> {
        let mut uow = db.begin().await?;
        let mut repo = IncomeRepository::new(uow.connection());

        repo.delete(user_id, id).await?;

        uow.commit().await?;
        Ok(())
    }
}
