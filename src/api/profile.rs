use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::Utc;

use super::routes::AppState;
use super::{resolve_target_user, ApiError, TargetQuery};
use crate::auth::UserSession;
use crate::models::{EnergyResponse, Profile, UpsertProfileRequest};
use crate::services::profile_service::validate_profile_input;
use crate::services::ProfileService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(upsert_profile))
        .route("/energy", get(get_energy))
}

/// Get the user's profile
#[tracing::instrument(skip(state, session))]
async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<Profile>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let profile = ProfileService::new(state.db)
        .get_profile(target)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile"))?;

    Ok(Json(profile))
}

/// Create or replace the user's profile
#[tracing::instrument(skip(state, session, request))]
async fn upsert_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    validate_profile_input(&request, Utc::now().date_naive()).map_err(ApiError::BadRequest)?;

    let profile = ProfileService::new(state.db)
        .upsert_profile(session.user_id, request)
        .await?;

    Ok(Json(profile))
}

/// BMR / TDEE computed from the profile and latest weigh-in
#[tracing::instrument(skip(state, session))]
async fn get_energy(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<EnergyResponse>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let energy = ProfileService::new(state.db)
        .energy(target)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile"))?;

    Ok(Json(energy))
}
