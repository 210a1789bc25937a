use crate::models::{Category, CategoryInput, CreateCategoryRequest};
use crate::repository::CategoryRepository;
use common::validation;
use database::{RepositoryError, Database};
use tracing::instrument;
use rand::seq::SliceRandom;

const PASTEL_COLORS: [&str; 20] = [
    "#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF",
    "#E2F0CB", "#FDFD96", "#FFC3A0", "#FFD1DC", "#D4F0F0",
    "#CCE2CB", "#B6CFB6", "#97C1A9", "#FCB7AF", "#FFDAC1",
    "#E7FFAC", "#FFABAB", "#D5AAFF", "#85E3FF", "#B9F6CA",
];

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Category already exists: {0}")]
    Conflict(String),
    #[error("Category not found")]
    NotFound,
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CategoryError::NotFound,
            RepositoryError::UniqueViolation(msg) => CategoryError::Conflict(msg),
            RepositoryError::Infrastructure(e) => CategoryError::Infrastructure(e.to_string()),
            _ => CategoryError::Infrastructure(err.to_string()),
        }
    }
}

pub struct CategoryService;

impl CategoryService {
    fn get_random_pastel_color() -> String {
        let mut rng = rand::thread_rng();
        PASTEL_COLORS.choose(&mut rng).unwrap_or(&"#FFFFFF").to_string()
    }

    fn build_request(input: CategoryInput) -> Result<CreateCategoryRequest, CategoryError> {
        validation::check(&input).map_err(CategoryError::InvalidInput)?;

        let color = input
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(Self::get_random_pastel_color);

        CreateCategoryRequest::new(input.name, input.icon, color).map_err(CategoryError::InvalidInput)
    }

    #[instrument(skip(db))]
    pub async fn create_category(
        db: &Database,
        user_id: i64,
        input: CategoryInput,
    ) -> Result<Category, CategoryError> {
        let req = Self::build_request(input)?;

        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let id = repo.create(user_id, &req).await?;

        uow.commit().await?;

        Ok(Category {
            id,
            name: req.name,
            icon: req.icon,
            color: req.color,
        })
    }

    #[instrument(skip(db))]
    pub async fn update_category(
        db: &Database,
        user_id: i64,
        id: i64,
        input: CategoryInput,
    ) -> Result<Category, CategoryError> {
        let req = Self::build_request(input)?;

        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        repo.update(user_id, id, &req).await?;

        uow.commit().await?;
        Ok(Category {
            id,
            name: req.name,
            icon: req.icon,
            color: req.color,
        })
    }

    /// Expenses pointing at the category fall back to "Uncategorized".
    #[instrument(skip(db))]
    pub async fn delete_category(
        db: &Database,
        user_id: i64,
        id: i64,
    ) -> Result<(), CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        repo.delete(user_id, id).await?;

        uow.commit().await?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_categories(db: &Database, user_id: i64) -> Result<Vec<Category>, CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let categories = repo.list(user_id).await?;

        Ok(categories)
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &Database, user_id: i64, id: i64) -> Result<Category, CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let category = repo.find_by_id(user_id, id).await?
            .ok_or(CategoryError::NotFound)?;

        Ok(category)
    }
}
