pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use study_core::{get_algorithm, Sm2, SpacedRepetitionAlgorithm};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StudyConfig};
use crate::db::Store;
use crate::services::review::CardLocks;
use crate::services::sessions::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub algorithm: Arc<dyn SpacedRepetitionAlgorithm>,
    pub card_locks: Arc<CardLocks>,
    pub sessions: Arc<SessionRegistry>,
    pub study: Arc<StudyConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, study: StudyConfig) -> Self {
        let algorithm = get_algorithm(&study.algorithm).unwrap_or_else(|| {
            tracing::warn!(algorithm = %study.algorithm, "unknown algorithm, falling back to sm2");
            Arc::new(Sm2::default())
        });
        Self {
            store,
            algorithm,
            card_locks: Arc::new(CardLocks::new()),
            sessions: Arc::new(SessionRegistry::new()),
            study: Arc::new(study),
        }
    }
}

/// Build the API router over the given state.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Card routes
        .route("/cards/deck/:deck_id/due", get(routes::cards::due))
        .route("/cards/:card_id/review", post(routes::cards::review))
        // Study routes
        .route("/study/flashcards/:deck_id", get(routes::study::flashcards))
        .route(
            "/study/multiple-choice/:deck_id/:card_id",
            get(routes::study::multiple_choice),
        )
        .route("/study/write/check", post(routes::study::write_check))
        .route("/study/match/:deck_id", get(routes::study::match_board))
        // Session routes
        .route("/study/session", post(routes::sessions::create))
        .route(
            "/study/session/:session_id",
            get(routes::sessions::get).delete(routes::sessions::cancel),
        )
        .route("/study/session/:session_id/answer", post(routes::sessions::answer))
        .route("/study/session/:session_id/finish", post(routes::sessions::finish))
        .route("/study/sessions", get(routes::sessions::list))
        // Deck routes
        .route("/decks/:deck_id/stats", get(routes::decks::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = db::open(config.database_url.as_deref()).await?;
    let state = AppState::new(store, config.study.clone());
    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
