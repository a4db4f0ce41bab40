use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::password::{
    generate_reset_token, hash_password, validate_email, verify_password,
};
use crate::auth::{
    AuthError, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest,
    ForgotPasswordResponse, JwtService, LoginRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, ResetPasswordRequest, TokenResponse, UpdateAccountRequest, UserInfo,
    UserRole, UserSession,
};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        if !validate_email(&request.email) {
            return Err(AuthError::EmailValidation(
                "Email address is not valid".to_string(),
            ));
        }

        if self.get_user_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, display_name, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, email, password_hash, display_name, role, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.display_name)
        .bind(UserRole::Member.as_str())
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(AuthError::Database)?;

        self.issue_tokens(user).await
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .get_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(user).await
    }

    /// Refresh access token
    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let claims = self.jwt_service.validate_token(&request.refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        if !self.is_refresh_token_valid(user_id, &claims.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        let access_token =
            self.jwt_service
                .create_access_token(user_id, &claims.email, claims.role)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
        })
    }

    /// Logout user: blacklist the access token, revoke refresh tokens
    pub async fn logout(&self, token: &str) -> Result<MessageResponse, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.blacklist_token(&claims.jti, claims.exp as i64).await?;
        self.revoke_user_refresh_tokens(user_id).await?;

        Ok(MessageResponse {
            message: "Successfully logged out".to_string(),
        })
    }

    /// Start the password-reset flow. The message is the same whether or not
    /// the email exists; without an email integration the token itself is
    /// returned so the reset endpoint stays reachable.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<ForgotPasswordResponse, AuthError> {
        let mut reset_token = None;

        if let Some(user) = self.get_user_by_email(&request.email).await? {
            let token = generate_reset_token();
            let expires_at = Utc::now() + chrono::Duration::hours(1);

            sqlx::query(
                "INSERT INTO password_reset_tokens (user_id, token, expires_at, used)
                 VALUES ($1, $2, $3, false)",
            )
            .bind(user.id)
            .bind(&token)
            .bind(expires_at)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

            tracing::info!(user_id = %user.id, "password reset token issued");
            reset_token = Some(token);
        }

        Ok(ForgotPasswordResponse {
            message: "If the email exists, a reset token has been issued".to_string(),
            reset_token,
        })
    }

    /// Complete the password-reset flow
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        let row = sqlx::query(
            "SELECT user_id FROM password_reset_tokens
             WHERE token = $1 AND expires_at > NOW() AND NOT used",
        )
        .bind(&request.token)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::InvalidToken)?;

        let user_id: Uuid = row.get("user_id");
        let password_hash = hash_password(&request.new_password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        sqlx::query("UPDATE password_reset_tokens SET used = true WHERE token = $1")
            .bind(&request.token)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        self.revoke_user_refresh_tokens(user_id).await?;

        Ok(MessageResponse {
            message: "Password has been reset".to_string(),
        })
    }

    /// Change password for an authenticated user
    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        let user = self.get_user_by_id(user_id).await?;

        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        Ok(MessageResponse {
            message: "Password changed".to_string(),
        })
    }

    /// Update account email / display name
    pub async fn update_account(
        &self,
        user_id: Uuid,
        request: UpdateAccountRequest,
    ) -> Result<UserInfo, AuthError> {
        if let Some(email) = &request.email {
            if !validate_email(email) {
                return Err(AuthError::EmailValidation(
                    "Email address is not valid".to_string(),
                ));
            }
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET email = COALESCE($2, email),
                 display_name = COALESCE($3, display_name),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING id, email, password_hash, display_name, role, created_at, updated_at",
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(&request.display_name)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::UserNotFound)?;

        Ok(user_info(user))
    }

    pub async fn get_account(&self, user_id: Uuid) -> Result<UserInfo, AuthError> {
        let user = self.get_user_by_id(user_id).await?;
        Ok(user_info(user))
    }

    /// Check if token is blacklisted
    pub async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, AuthError> {
        let result =
            sqlx::query("SELECT 1 FROM token_blacklist WHERE jti = $1 AND expires_at > NOW()")
                .bind(jti)
                .fetch_optional(&self.db)
                .await
                .map_err(AuthError::Database)?;

        Ok(result.is_some())
    }

    /// Validate user session from token
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let session = self.jwt_service.extract_user_session(token)?;

        if self.is_token_blacklisted(&session.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        Ok(session)
    }

    // Private helper methods

    async fn issue_tokens(&self, user: User) -> Result<AuthResponse, AuthError> {
        let role = UserRole::from_str(&user.role).unwrap_or(UserRole::Member);

        let (access_token, refresh_token) =
            self.jwt_service
                .create_token_pair(user.id, &user.email, role.clone())?;

        self.store_refresh_token(user.id, &refresh_token).await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: UserInfo {
                id: user.id,
                email: user.email,
                display_name: user.display_name,
                role,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, role, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, role, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }

    // Refresh tokens are tracked by their JTI, so revocation is a lookup
    // rather than a hash comparison.
    async fn store_refresh_token(&self, user_id: Uuid, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.jwt_service.validate_token(refresh_token)?;
        let expires_at =
            chrono::DateTime::from_timestamp(claims.exp as i64, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, jti, expires_at, revoked)
             VALUES ($1, $2, $3, $4, false)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&claims.jti)
        .bind(expires_at)
        .execute(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(())
    }

    async fn is_refresh_token_valid(&self, user_id: Uuid, jti: &str) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "SELECT 1 FROM refresh_tokens
             WHERE user_id = $1 AND jti = $2 AND expires_at > NOW() AND NOT revoked",
        )
        .bind(user_id)
        .bind(jti)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(result.is_some())
    }

    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> Result<(), AuthError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = true WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        Ok(())
    }

    async fn blacklist_token(&self, jti: &str, exp: i64) -> Result<(), AuthError> {
        let expires_at =
            chrono::DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(())
    }
}

fn user_info(user: User) -> UserInfo {
    let role = UserRole::from_str(&user.role).unwrap_or(UserRole::Member);
    UserInfo {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}
