use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{ProgressLog, ProgressSummary, UpsertProgressRequest};
use crate::services::progress_service::validate_weigh_in;
use crate::services::ProgressService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_logs).post(upsert_log))
        .route("/summary", get(summary))
        .route("/:entry_date", axum::routing::delete(delete_log))
}

#[derive(Debug, Deserialize)]
struct ProgressListQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    user_id: Option<Uuid>,
}

/// Weigh-in history, newest first
#[tracing::instrument(skip(state, session))]
async fn list_logs(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<ProgressListQuery>,
) -> Result<Json<Vec<ProgressLog>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let logs = ProgressService::new(state.db)
        .list_logs(target, query.limit, query.offset)
        .await?;

    Ok(Json(logs))
}

/// Record (or overwrite) the weigh-in for a day
#[tracing::instrument(skip(state, session, request))]
async fn upsert_log(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<UpsertProgressRequest>,
) -> Result<Json<ProgressLog>, ApiError> {
    validate_weigh_in(&request, Utc::now().date_naive()).map_err(ApiError::BadRequest)?;

    let log = ProgressService::new(state.db)
        .upsert_log(session.user_id, request)
        .await?;

    Ok(Json(log))
}

/// Delete the weigh-in for a day
#[tracing::instrument(skip(state, session))]
async fn delete_log(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(entry_date): Path<NaiveDate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = ProgressService::new(state.db)
        .delete_log(session.user_id, entry_date)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Weigh-in"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Trend, streak and totals for the progress page
#[tracing::instrument(skip(state, session))]
async fn summary(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let summary = ProgressService::new(state.db).summary(target).await?;

    Ok(Json(summary))
}
