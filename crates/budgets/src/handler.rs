use crate::models::{BudgetInput, BudgetProgress, MonthlyBudget};
use crate::service::{BudgetError, BudgetService};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use common::{
    AppState,
    auth::CurrentUser,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for BudgetError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            BudgetError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            BudgetError::NotFound => (StatusCode::NOT_FOUND, "Budget not found".to_string()),
            BudgetError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct PeriodQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    /// Missing parts default to the current local month.
    fn resolve(&self) -> (u32, i32) {
        let today = chrono::Local::now().date_naive();
        (
            self.month.unwrap_or_else(|| today.month()),
            self.year.unwrap_or_else(|| today.year()),
        )
    }
}

pub fn budgets_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route("/progress", get(list_progress))
        .route("/{id}", get(get_budget).put(update_budget).delete(delete_budget))
        .with_state(state)
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(period): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<MonthlyBudget>>, BudgetError> {
    let (month, year) = period.resolve();
    let budgets = BudgetService::list_budgets(&state.db, user.id, month, year).await?;
    Ok(Json(budgets))
}

async fn list_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(period): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<BudgetProgress>>, BudgetError> {
    let (month, year) = period.resolve();
    let progress = BudgetService::list_with_progress(&state.db, user.id, month, year).await?;
    Ok(Json(progress))
}

async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MonthlyBudget>, BudgetError> {
    let budget = BudgetService::get_budget(&state.db, user.id, id).await?;
    Ok(Json(budget))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<BudgetInput>,
) -> Result<impl IntoResponse, BudgetError> {
    let budget = BudgetService::create_budget(&state.db, user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BudgetInput>,
) -> Result<Json<MonthlyBudget>, BudgetError> {
    let budget = BudgetService::update_budget(&state.db, user.id, id, payload).await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, BudgetError> {
    BudgetService::delete_budget(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
