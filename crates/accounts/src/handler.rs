use crate::models::{Account, AccountInput, AccountSummary};
use crate::service::{AccountError, AccountService};
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

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AccountError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AccountError::NotFound => (StatusCode::NOT_FOUND, "Account not found".to_string()),
            AccountError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn accounts_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/active", get(list_active_accounts))
        .route("/summary", get(summary))
        .route("/{id}", get(get_account).put(update_account).delete(delete_account))
        .with_state(state)
}

async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Account>>, AccountError> {
    let accounts = AccountService::list_accounts(&state.db, user.id).await?;
    Ok(Json(accounts))
}

async fn list_active_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Account>>, AccountError> {
    let accounts = AccountService::list_active_accounts(&state.db, user.id).await?;
    Ok(Json(accounts))
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<AccountSummary>, AccountError> {
    let summary = AccountService::summary(&state.db, user.id).await?;
    Ok(Json(summary))
}

async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Account>, AccountError> {
    let account = AccountService::get_account(&state.db, user.id, id).await?;
    Ok(Json(account))
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<AccountInput>,
) -> Result<impl IntoResponse, AccountError> {
    let account = AccountService::create_account(&state.db, user.id, payload).await.map_err(|e| {
        tracing::error!("create_account error: {:?}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(account)))
}

async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AccountInput>,
) -> Result<Json<Account>, AccountError> {
    let account = AccountService::update_account(&state.db, user.id, id, payload).await?;
    Ok(Json(account))
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AccountError> {
    AccountService::delete_account(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
