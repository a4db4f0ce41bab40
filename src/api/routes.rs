use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use crate::auth::middleware::cors_layer;
use crate::auth::{jwt_auth_middleware, AuthService};
use crate::config::AppConfig;
use crate::services::{LlmClient, NutritionClient, PdfClient};

/// Shared state for the feature routers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
    pub llm: LlmClient,
    pub nutrition: NutritionClient,
    pub pdf: PdfClient,
}

pub fn create_routes(db: PgPool, config: &AppConfig) -> Router {
    let auth_service = AuthService::new(db.clone(), &config.jwt_secret);

    let state = AppState {
        db,
        auth_service: auth_service.clone(),
        llm: LlmClient::new(&config.integrations),
        nutrition: NutritionClient::new(&config.integrations),
        pdf: PdfClient::new(&config.integrations),
    };

    // Everything under /api except /api/auth requires a valid session
    let protected = Router::new()
        .nest("/profile", super::profile::router())
        .nest("/meals", super::meals::router())
        .nest("/progress", super::progress::router())
        .nest("/fasting", super::fasting::router())
        .nest("/supplements", super::supplements::router())
        .nest("/goals", super::daily_goals::router())
        .nest("/achievements", super::achievements::router())
        .nest("/mindfulness", super::mindfulness::router())
        .nest("/journey", super::journey::router())
        .nest("/coach", super::coach::router())
        .nest("/nutrition", super::nutrition::router())
        .nest("/reports", super::reports::router())
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", super::auth::auth_routes(auth_service))
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
