use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{AchievementStatus, UnlockCheckResponse};
use crate::services::AchievementService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_achievements))
        .route("/check", post(run_check))
}

/// Catalog with the user's unlock timestamps
#[tracing::instrument(skip(state, session))]
async fn list_achievements(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<Vec<AchievementStatus>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let achievements = AchievementService::new(state.db)
        .list_for_user(target)
        .await?;

    Ok(Json(achievements))
}

/// Run unlock rules against the user's data
#[tracing::instrument(skip(state, session))]
async fn run_check(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<UnlockCheckResponse>, ApiError> {
    let newly_unlocked = AchievementService::new(state.db)
        .run_unlock_check(session.user_id)
        .await?;

    Ok(Json(UnlockCheckResponse { newly_unlocked }))
}
