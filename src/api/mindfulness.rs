use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{
    CreateEpisodeRequest, CreateSessionRequest, EatingEpisode, EpisodeSummary, MindfulnessSession,
};
use crate::services::mindfulness_service::{validate_episode_input, validate_session_input};
use crate::services::MindfulnessService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/episodes", get(list_episodes).post(create_episode))
        .route("/episodes/summary", get(episode_summary))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<i64>,
    user_id: Option<Uuid>,
}

/// Record a mindfulness session
#[tracing::instrument(skip(state, session, request))]
async fn create_session(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<MindfulnessSession>, ApiError> {
    validate_session_input(&request).map_err(ApiError::BadRequest)?;

    let created = MindfulnessService::new(state.db)
        .create_session(session.user_id, request)
        .await?;

    Ok(Json(created))
}

/// Recent mindfulness sessions
#[tracing::instrument(skip(state, session))]
async fn list_sessions(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<MindfulnessSession>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let sessions = MindfulnessService::new(state.db)
        .list_sessions(target, query.limit)
        .await?;

    Ok(Json(sessions))
}

/// Record an emotional-eating episode
#[tracing::instrument(skip(state, session, request))]
async fn create_episode(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateEpisodeRequest>,
) -> Result<Json<EatingEpisode>, ApiError> {
    validate_episode_input(&request).map_err(ApiError::BadRequest)?;

    let episode = MindfulnessService::new(state.db)
        .create_episode(session.user_id, request)
        .await?;

    Ok(Json(episode))
}

/// Recent episodes
#[tracing::instrument(skip(state, session))]
async fn list_episodes(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<EatingEpisode>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let episodes = MindfulnessService::new(state.db)
        .list_episodes(target, query.limit)
        .await?;

    Ok(Json(episodes))
}

/// 30-day episode counts and the dominant trigger
#[tracing::instrument(skip(state, session))]
async fn episode_summary(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<EpisodeSummary>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let summary = MindfulnessService::new(state.db)
        .episode_summary(target)
        .await?;

    Ok(Json(summary))
}
