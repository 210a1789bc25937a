//! Helpers for driving routers in tests.
//! Not behind `#[cfg(test)]` so other crates' tests can use them.

use crate::{AppState, Config};
use axum::{
    body::Body,
    http::Request,
    response::Response,
};
use database::Database;
use std::sync::Arc;

pub fn test_state(db: Database) -> Arc<AppState> {
    Arc::new(AppState {
        db,
        config: Config {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            session_secure: false,
            analytics_window_days: 90,
        },
    })
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}
