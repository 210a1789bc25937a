use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

pub const AUTH_SESSION_KEY: &str = "current_user";

/// Identity of the signed-in user, stored in the session at login and
/// handed to handlers as a request extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub display_name: String,
    pub email: String,
}

pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    match session.get::<CurrentUser>(AUTH_SESSION_KEY).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Failed to read session: {}", e);
            None
        }
    }
}

pub async fn auth_middleware(
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    match current_user(&session).await {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Not signed in" })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_request, read_json};
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    #[tokio::test]
    async fn test_request_without_session_is_401_json() {
        let app = Router::new()
            .route("/private", get(|| async { "secret" }))
            .layer(middleware::from_fn(auth_middleware))
            .layer(SessionManagerLayer::new(MemoryStore::default()));

        let response = app.oneshot(empty_request("GET", "/private")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Not signed in");
    }
}
