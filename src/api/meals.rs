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
use super::{resolve_target_user, ApiError};
use crate::auth::UserSession;
use crate::models::{CreateMealRequest, DailyNutritionSummary, Meal, UpdateMealRequest};
use crate::services::meal_service::validate_meal_input;
use crate::services::MealService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route(
            "/:meal_id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
        .route("/daily-summary", get(daily_summary))
}

#[derive(Debug, Deserialize)]
struct MealListQuery {
    date: Option<NaiveDate>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<NaiveDate>,
    user_id: Option<Uuid>,
}

/// List meals for a day or date range (defaults to today)
#[tracing::instrument(skip(state, session))]
async fn list_meals(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<MealListQuery>,
) -> Result<Json<Vec<Meal>>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;

    let today = Utc::now().date_naive();
    let (from, to) = match (query.date, query.from, query.to) {
        (Some(date), _, _) => (date, date),
        (None, Some(from), Some(to)) => (from, to),
        (None, Some(from), None) => (from, today),
        _ => (today, today),
    };

    if from > to {
        return Err(ApiError::BadRequest(
            "Range start must not be after range end".to_string(),
        ));
    }

    let meals = MealService::new(state.db)
        .list_meals(target, from, to)
        .await?;

    Ok(Json(meals))
}

/// Log a meal
#[tracing::instrument(skip(state, session, request))]
async fn create_meal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateMealRequest>,
) -> Result<Json<Meal>, ApiError> {
    validate_meal_input(&request, Utc::now().date_naive()).map_err(ApiError::BadRequest)?;

    let meal = MealService::new(state.db)
        .create_meal(session.user_id, request)
        .await?;

    Ok(Json(meal))
}

/// Get a single meal
#[tracing::instrument(skip(state, session))]
async fn get_meal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(meal_id): Path<Uuid>,
) -> Result<Json<Meal>, ApiError> {
    let meal = MealService::new(state.db)
        .get_meal(meal_id, session.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal"))?;

    Ok(Json(meal))
}

/// Update a meal
#[tracing::instrument(skip(state, session, request))]
async fn update_meal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(meal_id): Path<Uuid>,
    Json(request): Json<UpdateMealRequest>,
) -> Result<Json<Meal>, ApiError> {
    let meal = MealService::new(state.db)
        .update_meal(meal_id, session.user_id, request)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal"))?;

    Ok(Json(meal))
}

/// Delete a meal
#[tracing::instrument(skip(state, session))]
async fn delete_meal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(meal_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = MealService::new(state.db)
        .delete_meal(meal_id, session.user_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Meal"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Macro totals and percent-of-target for one day
#[tracing::instrument(skip(state, session))]
async fn daily_summary(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyNutritionSummary>, ApiError> {
    let target = resolve_target_user(&session, query.user_id)?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let summary = MealService::new(state.db)
        .daily_summary(target, date)
        .await?;

    Ok(Json(summary))
}
