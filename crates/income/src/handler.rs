use crate::models::{Income, IncomeInput, MonthlyIncome};
use crate::service::{IncomeError, IncomeService};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use common::{
    AppState,
    auth::CurrentUser,
    extract::{ApiJson, ApiPath},
};
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for IncomeError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            IncomeError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            IncomeError::NotFound => (StatusCode::NOT_FOUND, "Income not found".to_string()),
            IncomeError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn income_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_income).post(create_income))
        .route("/monthly-total", get(monthly_total))
        .route("/{id}", get(get_income).put(update_income).delete(delete_income))
        .with_state(state)
}

async fn list_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Income>>, IncomeError> {
    let income = IncomeService::list_income(&state.db, user.id).await?;
    Ok(Json(income))
}

async fn monthly_total(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<MonthlyIncome>, IncomeError> {
    let total = IncomeService::monthly_total(&state.db, user.id).await?;
    Ok(Json(total))
}

async fn get_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Income>, IncomeError> {
    let income = IncomeService::get_income(&state.db, user.id, id).await?;
    Ok(Json(income))
}

async fn create_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<IncomeInput>,
) -> Result<impl IntoResponse, IncomeError> {
    let income = IncomeService::create_income(&state.db, user.id, payload).await.map_err(|e| {
        tracing::error!("create_income error: {:?}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(income)))
}

async fn update_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<IncomeInput>,
) -> Result<Json<Income>, IncomeError> {
    let income = IncomeService::update_income(&state.db, user.id, id, payload).await?;
    Ok(Json(income))
}

async fn delete_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, IncomeError> {
    IncomeService::delete_income(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
