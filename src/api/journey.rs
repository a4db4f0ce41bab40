use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{AdvanceResponse, JourneyResponse};
use crate::services::JourneyService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_journey))
        .route("/advance", post(advance))
}

/// Current phase, time in phase and advancement eligibility
#[tracing::instrument(skip(state, session))]
async fn get_journey(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<JourneyResponse>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let journey = JourneyService::new(state.db).journey(target).await?;

    Ok(Json(journey))
}

/// Advance to the next phase when the rule allows it
#[tracing::instrument(skip(state, session))]
async fn advance(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let result = JourneyService::new(state.db)
        .advance(session.user_id)
        .await?;

    Ok(Json(result))
}
