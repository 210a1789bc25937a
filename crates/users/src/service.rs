use crate::models::{LoginInput, RegisterInput, normalize_email};
use crate::password;
use crate::repository::UserRepository;
use common::auth::CurrentUser;
use common::validation;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("Database error: {0}")]
    Infrastructure(String),
}

impl From<RepositoryError> for UserError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => UserError::NotFound,
            RepositoryError::UniqueViolation(_) => UserError::EmailTaken,
            RepositoryError::Infrastructure(e) => UserError::Infrastructure(e.to_string()),
            _ => UserError::Infrastructure(err.to_string()),
        }
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, input), fields(email = %input.email))]
    pub async fn register(db: &Database, mut input: RegisterInput) -> Result<CurrentUser, UserError> {
        input.email = normalize_email(&input.email);
        validation::check(&input).map_err(UserError::InvalidInput)?;

        let email = input.email.clone();
        let display_name = input.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(UserError::InvalidInput("Display name cannot be empty".into()));
        }

        // CPU bound, so it runs on the blocking pool.
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash(&password))
            .await
            .map_err(|e| UserError::Infrastructure(e.to_string()))?
            .map_err(|e| UserError::Infrastructure(e.to_string()))?;

        let mut uow = db.begin().await?;
        let mut repo = UserRepository::new(uow.connection());

        let id = repo.create(&email, &display_name, &password_hash).await?;
        uow.commit().await?;

        tracing::info!(user_id = id, "Registered user");

        Ok(CurrentUser {
            id,
            display_name,
            email,
        })
    }

    /// Unknown email and wrong password both report `InvalidCredentials`.
    #[instrument(skip(db, input), fields(email = %input.email))]
    pub async fn login(db: &Database, input: LoginInput) -> Result<CurrentUser, UserError> {
        let email = normalize_email(&input.email);

        let user = {
            let mut uow = db.begin().await?;
            let mut repo = UserRepository::new(uow.connection());
            repo.find_by_email(&email).await?
        };

        // Unknown emails still pay for one verification.
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let password = input.password;
        let verified = tokio::task::spawn_blocking(move || match stored {
            Some(stored) => password::verify(&password, &stored),
            None => password::verify_dummy(&password),
        })
        .await
        .map_err(|e| UserError::Infrastructure(e.to_string()))?;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                tracing::info!(user_id = user.id, "Login with wrong password");
                return Err(UserError::InvalidCredentials);
            }
            None => {
                tracing::info!("Login for unknown email");
                return Err(UserError::InvalidCredentials);
            }
        };

        Ok(user.into())
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &Database, id: i64) -> Result<CurrentUser, UserError> {
        let mut uow = db.begin().await?;
        let mut repo = UserRepository::new(uow.connection());

        let user = repo.find_by_id(id).await?.ok_or(UserError::NotFound)?;
        Ok(user.into())
    }
}
