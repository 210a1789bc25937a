use crate::models::{Expense, ExpenseInput, ExpenseQuery};
use crate::service::{ExpenseError, ExpenseService};
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
    extract::{ApiJson, ApiPath, ApiQuery},
};
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ExpenseError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ExpenseError::NotFound => (StatusCode::NOT_FOUND, "Expense not found".to_string()),
            ExpenseError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn expenses_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route("/{id}", get(get_expense).put(update_expense).delete(delete_expense))
        .with_state(state)
}

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, ExpenseError> {
    let expenses = ExpenseService::list_expenses(&state.db, user.id, query).await?;
    Ok(Json(expenses))
}

async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Expense>, ExpenseError> {
    let expense = ExpenseService::get_expense(&state.db, user.id, id).await?;
    Ok(Json(expense))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<ExpenseInput>,
) -> Result<impl IntoResponse, ExpenseError> {
    let expense = ExpenseService::create_expense(&state.db, user.id, payload).await.map_err(|e| {
        tracing::error!("create_expense error: {:?}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(expense)))
}

async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ExpenseInput>,
) -> Result<Json<Expense>, ExpenseError> {
    let expense = ExpenseService::update_expense(&state.db, user.id, id, payload).await?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ExpenseError> {
    ExpenseService::delete_expense(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use common::testing::{empty_request, json_request, read_json, test_state};
    use database::{create_test_user, get_test_db};
    use serde_json::json;
    use tower::ServiceExt;

    async fn app_for(email: &str) -> (Router, Arc<AppState>, i64) {
        let state = test_state(get_test_db().await);
        let user_id = create_test_user(&state.db, email).await;
        let user = CurrentUser {
            id: user_id,
            display_name: "Pat".into(),
            email: email.into(),
        };
        let app: Router = expenses_router(state.clone())
            .layer(Extension(user))
            .with_state(state.clone());
        (app, state, user_id)
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let (app, _, _) = app_for("exp-http@example.com").await;

        let body = json!({ "name": "Coffee", "amount": 4.5, "date": "2026-03-02" });
        let response = app.oneshot(json_request("POST", "/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await;
        assert_eq!(created["name"], "Coffee");
        assert_eq!(created["amount"], 4.5);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400_json() {
        let (app, _, _) = app_for("exp-http@example.com").await;

        for body in [
            json!({ "name": "Coffee", "amount": "abc", "date": "2026-03-02" }),
            json!({ "name": "Coffee", "date": "2026-03-02" }),
        ] {
            let response = app.clone().oneshot(json_request("POST", "/", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(read_json(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_bad_query_and_path_are_400() {
        let (app, _, _) = app_for("exp-http@example.com").await;

        let response = app.clone().oneshot(empty_request("GET", "/?limit=many")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(empty_request("GET", "/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_other_users_expense_is_404() {
        let (app, state, _) = app_for("exp-http@example.com").await;
        let other = create_test_user(&state.db, "someone-else@example.com").await;
        let theirs = ExpenseService::create_expense(
            &state.db,
            other,
            ExpenseInput {
                name: "Rent".into(),
                amount: 900.0,
                date: "2026-03-01".into(),
                notes: None,
                category_id: None,
                budget_id: None,
            },
        )
        .await
        .unwrap();

        let response = app
            .oneshot(empty_request("GET", &format!("/{}", theirs.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["error"], "Expense not found");
    }
}
