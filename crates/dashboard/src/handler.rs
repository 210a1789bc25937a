use crate::models::{DashboardSummary, MonthsQuery, WindowQuery};
use crate::service::{AnalyticsError, DEFAULT_TREND_MONTHS, DashboardService};
use analytics::{AnalyticsConfig, MonthTotal, RecurringExpense, SpendingReport};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use common::{
    AppState,
    auth::CurrentUser,
    extract::ApiQuery,
};
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AnalyticsError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AnalyticsError::Infrastructure(e) => {
                tracing::error!("Analytics failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn analytics_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/spending", get(spending_report))
        .route("/recurring", get(recurring_expenses))
        .route("/monthly", get(monthly_trend))
        .route("/summary", get(summary))
        .with_state(state)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn config(state: &AppState, query: &WindowQuery) -> AnalyticsConfig {
    AnalyticsConfig {
        window_days: query.days.unwrap_or(state.config.analytics_window_days),
        ..AnalyticsConfig::default()
    }
}

async fn spending_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> Result<Json<SpendingReport>, AnalyticsError> {
    let cfg = config(&state, &query);
    let report = DashboardService::spending_report(&state.db, user.id, today(), &cfg).await?;
    Ok(Json(report))
}

async fn recurring_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> Result<Json<Vec<RecurringExpense>>, AnalyticsError> {
    let cfg = config(&state, &query);
    let found = DashboardService::recurring_expenses(&state.db, user.id, today(), &cfg).await?;
    Ok(Json(found))
}

async fn monthly_trend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<MonthsQuery>,
) -> Result<Json<Vec<MonthTotal>>, AnalyticsError> {
    let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    let trend = DashboardService::monthly_trend(&state.db, user.id, today(), months).await?;
    Ok(Json(trend))
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<DashboardSummary>, AnalyticsError> {
    let summary = DashboardService::summary(&state.db, user.id, today()).await?;
    Ok(Json(summary))
}
