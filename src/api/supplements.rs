use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{
    CreateSupplementRequest, Supplement, SupplementDayEntry, ToggleIntakeRequest,
    UpdateSupplementRequest,
};
use crate::services::supplement_service::validate_supplement_input;
use crate::services::SupplementService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_supplements).post(create_supplement))
        .route(
            "/:supplement_id",
            axum::routing::put(update_supplement).delete(delete_supplement),
        )
        .route("/:supplement_id/intake", post(toggle_intake))
        .route("/day", get(day_view))
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<NaiveDate>,
    user_id: Option<Uuid>,
}

/// Active supplements
#[tracing::instrument(skip(state, session))]
async fn list_supplements(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<Vec<Supplement>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let supplements = SupplementService::new(state.db)
        .list_supplements(target)
        .await?;

    Ok(Json(supplements))
}

/// Add a supplement
#[tracing::instrument(skip(state, session, request))]
async fn create_supplement(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateSupplementRequest>,
) -> Result<Json<Supplement>, ApiError> {
    validate_supplement_input(&request).map_err(ApiError::BadRequest)?;

    let supplement = SupplementService::new(state.db)
        .create_supplement(session.user_id, request)
        .await?;

    Ok(Json(supplement))
}

/// Update a supplement (or archive it with active=false)
#[tracing::instrument(skip(state, session, request))]
async fn update_supplement(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(supplement_id): Path<Uuid>,
    Json(request): Json<UpdateSupplementRequest>,
) -> Result<Json<Supplement>, ApiError> {
    let supplement = SupplementService::new(state.db)
        .update_supplement(supplement_id, session.user_id, request)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplement"))?;

    Ok(Json(supplement))
}

/// Delete a supplement
#[tracing::instrument(skip(state, session))]
async fn delete_supplement(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(supplement_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = SupplementService::new(state.db)
        .delete_supplement(supplement_id, session.user_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Supplement"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Mark/unmark a supplement taken for a day
#[tracing::instrument(skip(state, session, request))]
async fn toggle_intake(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(supplement_id): Path<Uuid>,
    Json(request): Json<ToggleIntakeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let taken = SupplementService::new(state.db)
        .toggle_intake(supplement_id, session.user_id, request.entry_date)
        .await?;

    Ok(Json(serde_json::json!({ "taken": taken })))
}

/// Each active supplement with its taken state for a day
#[tracing::instrument(skip(state, session))]
async fn day_view(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<SupplementDayEntry>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let entries = SupplementService::new(state.db)
        .day_view(target, date)
        .await?;

    Ok(Json(entries))
}
