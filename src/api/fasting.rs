use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{
    FastingLog, FastingSchedule, FastingSummary, LogFastRequest, PutFastingScheduleRequest,
};
use crate::services::fasting_service::validate_fast_input;
use crate::services::FastingService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schedule", get(get_schedule).put(put_schedule))
        .route("/logs", get(list_logs).post(log_fast))
        .route("/summary", get(summary))
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    limit: Option<i64>,
    user_id: Option<Uuid>,
}

/// The user's fasting schedule
#[tracing::instrument(skip(state, session))]
async fn get_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<FastingSchedule>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let schedule = FastingService::new(state.db)
        .get_schedule(target)
        .await?
        .ok_or_else(|| ApiError::not_found("Fasting schedule"))?;

    Ok(Json(schedule))
}

/// Set or replace the fasting schedule
#[tracing::instrument(skip(state, session, request))]
async fn put_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<PutFastingScheduleRequest>,
) -> Result<Json<FastingSchedule>, ApiError> {
    if !(0..24).contains(&request.eating_window_start_hour) {
        return Err(ApiError::BadRequest(
            "Eating window start hour must be between 0 and 23".to_string(),
        ));
    }

    let schedule = FastingService::new(state.db)
        .put_schedule(session.user_id, request)
        .await?;

    Ok(Json(schedule))
}

/// Log the fast for a day
#[tracing::instrument(skip(state, session, request))]
async fn log_fast(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<LogFastRequest>,
) -> Result<Json<FastingLog>, ApiError> {
    validate_fast_input(&request, Utc::now().date_naive()).map_err(ApiError::BadRequest)?;

    let log = FastingService::new(state.db)
        .log_fast(session.user_id, request)
        .await?;

    Ok(Json(log))
}

/// Recent fast logs, newest first
#[tracing::instrument(skip(state, session))]
async fn list_logs(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<FastingLog>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let logs = FastingService::new(state.db)
        .list_logs(target, query.limit)
        .await?;

    Ok(Json(logs))
}

/// Adherence and streak numbers for the fasting page
#[tracing::instrument(skip(state, session))]
async fn summary(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<FastingSummary>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let summary = FastingService::new(state.db).summary(target).await?;

    Ok(Json(summary))
}
