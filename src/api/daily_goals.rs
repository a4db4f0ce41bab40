use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::routes::AppState;
use super::{resolve_target_user, ApiError};
use crate::auth::UserSession;
use crate::models::{DailyGoal, DailyGoalsResponse, ToggleGoalRequest};
use crate::services::DailyGoalService;

pub fn router() -> Router<AppState> {
    Router::new().route("/daily", get(get_day).post(toggle_goal))
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<NaiveDate>,
    user_id: Option<Uuid>,
}

/// The day's goal checklist with completion percentage
#[tracing::instrument(skip(state, session))]
async fn get_day(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyGoalsResponse>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let response = DailyGoalService::new(state.db)
        .get_day(target, date)
        .await?;

    Ok(Json(response))
}

/// Toggle one goal kind for a day
#[tracing::instrument(skip(state, session, request))]
async fn toggle_goal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<ToggleGoalRequest>,
) -> Result<Json<DailyGoal>, ApiError> {
    let date = request.entry_date.unwrap_or_else(|| Utc::now().date_naive());

    let goal = DailyGoalService::new(state.db)
        .toggle(session.user_id, date, request.kind)
        .await?;

    Ok(Json(goal))
}
