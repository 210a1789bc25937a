use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{
    AppState,
    auth::{AUTH_SESSION_KEY, CurrentUser},
    extract::ApiJson,
};
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use users::models::{LoginInput, RegisterInput};
use users::service::{UserError, UserService};

pub struct AuthError(UserError);

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = match self.0 {
            UserError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            UserError::EmailTaken => (StatusCode::CONFLICT, UserError::EmailTaken.to_string()),
            UserError::InvalidCredentials | UserError::NotFound => (
                StatusCode::UNAUTHORIZED,
                UserError::InvalidCredentials.to_string(),
            ),
            UserError::Infrastructure(e) => {
                tracing::error!("Auth failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

async fn sign_in(session: &Session, user: &CurrentUser) -> Result<(), AuthError> {
    // New id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| UserError::Infrastructure(e.to_string()))?;
    session
        .insert(AUTH_SESSION_KEY, user)
        .await
        .map_err(|e| UserError::Infrastructure(e.to_string()))?;
    Ok(())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<RegisterInput>,
) -> Result<impl IntoResponse, AuthError> {
    let user = UserService::register(&state.db, payload).await?;
    sign_in(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<LoginInput>,
) -> Result<Json<CurrentUser>, AuthError> {
    let user = UserService::login(&state.db, payload).await?;
    sign_in(&session, &user).await?;
    Ok(Json(user))
}

pub async fn logout(session: Session) -> Result<StatusCode, AuthError> {
    session
        .flush()
        .await
        .map_err(|e| UserError::Infrastructure(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fresh from the database rather than the session copy.
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CurrentUser>, AuthError> {
    let user = UserService::get_user(&state.db, user.id).await?;
    Ok(Json(user))
}
