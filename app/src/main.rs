use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use clap::Parser;
use common::{AppState, Config, auth::auth_middleware};
use database::Database;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real env vars and CLI flags still apply.
    dotenvy::dotenv().ok();

    // 1. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Load Config from CLI args / env
    let config = Config::parse();

    // 3. Initialize Database
    let db = Database::new(&config.database_url).await?;
    db.run_migrations().await?;

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // 4. Session Store
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store).with_secure(config.session_secure);

    // 5. Routing
    let app = router(state).layer(session_layer).layer(TraceLayer::new_for_http());

    // 6. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    if !config.session_secure {
        tracing::warn!("Session cookies are not marked Secure. Set SESSION_SECURE=true behind HTTPS.");
    }
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    // Everything here requires a signed-in user
    let protected_routes = Router::<Arc<AppState>>::new()
        .route("/me", get(handlers::auth::me))
        .nest("/categories", categories::handler::categories_router(state.clone()))
        .nest("/budgets", budgets::handler::budgets_router(state.clone()))
        .nest("/expenses", expenses::handler::expenses_router(state.clone()))
        .nest("/income", income::handler::income_router(state.clone()))
        .nest("/accounts", accounts::handler::accounts_router(state.clone()))
        .nest("/analytics", dashboard::handler::analytics_router(state.clone()))
        .layer(middleware::from_fn(auth_middleware));

    Router::<Arc<AppState>>::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .merge(protected_routes)
        .with_state(state)
}
