use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{extract_bearer_token, AuthError, AuthService};

/// JWT authentication middleware. Validates the bearer token and stores the
/// session in request extensions for downstream handlers.
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_bearer_token(auth_header)?;
    let session = auth_service.validate_session(token).await?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// CORS configuration for the API
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use crate::auth::UserRole;

    #[test]
    fn test_user_role_permissions() {
        let admin = UserRole::Admin;
        let coach = UserRole::Coach;
        let member = UserRole::Member;

        assert!(admin.can_access(&admin));
        assert!(admin.can_access(&coach));
        assert!(admin.can_access(&member));

        assert!(coach.can_access(&coach));
        assert!(coach.can_access(&member));
        assert!(!coach.can_access(&admin));

        assert!(member.can_access(&member));
        assert!(!member.can_access(&coach));
        assert!(!member.can_access(&admin));
    }
}
