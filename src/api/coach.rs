use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::routes::AppState;
use super::{resolve_target_user, ApiError};
use crate::auth::UserSession;
use crate::models::{ChatRequest, ChatResponse, CoachMessage, InsightResponse};
use crate::services::CoachService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/history", get(history))
        .route("/insight", get(daily_insight))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
    user_id: Option<Uuid>,
}

/// Send a message to the coach and get the reply
#[tracing::instrument(skip(state, session, request))]
async fn chat(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = CoachService::new(state.db, state.llm)
        .chat(session.user_id, &request.message)
        .await?;

    Ok(Json(ChatResponse { reply }))
}

/// Recent conversation, newest first
#[tracing::instrument(skip(state, session))]
async fn history(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<CoachMessage>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let messages = CoachService::new(state.db, state.llm)
        .history(target, query.limit)
        .await?;

    Ok(Json(messages))
}

/// Daily coaching note built from the user's numbers
#[tracing::instrument(skip(state, session))]
async fn daily_insight(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<InsightResponse>, ApiError> {
    let insight = CoachService::new(state.db, state.llm)
        .daily_insight(session.user_id)
        .await?;

    Ok(Json(insight))
}
