use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Extension, Router,
};

use super::routes::AppState;
use super::ApiError;
use crate::auth::UserSession;
use crate::services::ReportService;

pub fn router() -> Router<AppState> {
    Router::new().route("/progress", post(progress_report))
}

/// Generate the progress report PDF
#[tracing::instrument(skip(state, session))]
async fn progress_report(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Response, ApiError> {
    let pdf = ReportService::new(state.db, state.pdf)
        .progress_report_pdf(session.user_id)
        .await?;

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"metabalance-progress.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response();

    Ok(response)
}
