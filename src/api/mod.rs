// API routes and handlers

pub mod achievements;
pub mod auth;
pub mod coach;
pub mod daily_goals;
pub mod fasting;
pub mod health;
pub mod meals;
pub mod mindfulness;
pub mod journey;
pub mod nutrition;
pub mod profile;
pub mod progress;
pub mod reports;
pub mod routes;
pub mod supplements;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{UserRole, UserSession};
use crate::services::{
    CoachChatError, FastingError, LlmError, NutritionError, PdfError, ReportError,
    SupplementError,
};

/// Error type for the feature handlers. Auth endpoints use AuthError.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }
}

/// Optional target user for read endpoints. Coaches and admins may read
/// members' data; members only their own.
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub user_id: Option<Uuid>,
}

/// Resolves which user's data a read request addresses. Absent or self,
/// the caller's own id; another user's id requires coach or admin role.
pub(crate) fn resolve_target_user(
    session: &UserSession,
    requested: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    match requested {
        None => Ok(session.user_id),
        Some(id) if id == session.user_id => Ok(id),
        Some(id) => {
            if session.role.can_access(&UserRole::Coach) {
                Ok(id)
            } else {
                Err(ApiError::Forbidden)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Upstream service error"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable"),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unconfigured => ApiError::Unavailable("Coach is not configured".to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<NutritionError> for ApiError {
    fn from(err: NutritionError) -> Self {
        match err {
            NutritionError::Unconfigured => {
                ApiError::Unavailable("Nutrition lookup is not configured".to_string())
            }
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<CoachChatError> for ApiError {
    fn from(err: CoachChatError) -> Self {
        match err {
            CoachChatError::EmptyMessage => ApiError::BadRequest(err.to_string()),
            CoachChatError::Llm(llm) => llm.into(),
            CoachChatError::Internal(inner) => ApiError::Internal(inner),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::RendererUnavailable => ApiError::Unavailable(err.to_string()),
            ReportError::Pdf(PdfError::Unconfigured) => ApiError::Unavailable(err.to_string()),
            ReportError::Pdf(other) => ApiError::Upstream(other.to_string()),
            ReportError::Internal(inner) => ApiError::Internal(inner),
        }
    }
}

impl From<FastingError> for ApiError {
    fn from(err: FastingError) -> Self {
        match err {
            FastingError::ScheduleMissing => {
                ApiError::NotFound("No fasting schedule configured".to_string())
            }
            FastingError::UnknownProtocol(_) => ApiError::Internal(anyhow::Error::new(err)),
            FastingError::Database(inner) => ApiError::Internal(inner.into()),
        }
    }
}

impl From<SupplementError> for ApiError {
    fn from(err: SupplementError) -> Self {
        match err {
            SupplementError::NotFound => ApiError::not_found("Supplement"),
            SupplementError::Database(inner) => ApiError::Internal(inner.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: UserRole) -> UserSession {
        UserSession {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            jti: "jti-1".to_string(),
        }
    }

    #[test]
    fn test_resolve_target_defaults_to_caller() {
        let member = session(UserRole::Member);
        assert_eq!(
            resolve_target_user(&member, None).unwrap(),
            member.user_id
        );
        assert_eq!(
            resolve_target_user(&member, Some(member.user_id)).unwrap(),
            member.user_id
        );
    }

    #[test]
    fn test_member_cannot_read_other_users() {
        let member = session(UserRole::Member);
        let other = Uuid::new_v4();
        assert!(matches!(
            resolve_target_user(&member, Some(other)),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_coach_and_admin_can_read_other_users() {
        let other = Uuid::new_v4();
        let coach = session(UserRole::Coach);
        assert_eq!(resolve_target_user(&coach, Some(other)).unwrap(), other);

        let admin = session(UserRole::Admin);
        assert_eq!(resolve_target_user(&admin, Some(other)).unwrap(), other);
    }
}
