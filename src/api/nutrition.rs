use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;

use super::routes::AppState;
use super::ApiError;
use crate::auth::UserSession;
use crate::services::NutritionItem;

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

/// Proxy a food search to the nutrition provider
#[tracing::instrument(skip(state, _session))]
async fn search(
    State(state): State<AppState>,
    Extension(_session): Extension<UserSession>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<NutritionItem>>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Search query cannot be empty".to_string(),
        ));
    }

    let items = state.nutrition.search(query.q.trim()).await?;

    Ok(Json(items))
}
